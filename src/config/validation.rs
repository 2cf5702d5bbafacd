//! Configuration validation logic.

use crate::errors::Error;
use crate::index::distance::MAX_DISTANCE;
use std::path::PathBuf;

/// Validates configuration values.
pub struct ConfigValidator {
    /// Directory holding the cache store.
    pub store_path: PathBuf,
    /// HuggingFace embedding model identifier.
    pub embedding_model: String,
    /// Maximum squared-L2 distance for a cache hit.
    pub distance_threshold: f64,
}

impl ConfigValidator {
    /// Validate all configuration values for correctness and constraints.
    ///
    /// Checks that:
    /// - Distance threshold is between 0.0 and 4.0 (the range of squared-L2
    ///   distance between unit vectors)
    /// - No NaN or infinite threshold
    /// - Embedding model is not empty
    /// - Store path is not empty
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if any validation check fails.
    pub fn validate(&self) -> Result<(), Error> {
        validate_distance_threshold(self.distance_threshold)?;
        self.validate_embedding_model()?;
        self.validate_store_path()?;

        Ok(())
    }

    fn validate_embedding_model(&self) -> Result<(), Error> {
        if self.embedding_model.trim().is_empty() {
            return Err(Error::Config("Embedding model cannot be empty".to_string()));
        }

        Ok(())
    }

    fn validate_store_path(&self) -> Result<(), Error> {
        if self.store_path.as_os_str().is_empty() {
            return Err(Error::Config("Store path cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Check a distance threshold is finite and within `[0.0, 4.0]`.
pub fn validate_distance_threshold(threshold: f64) -> Result<(), Error> {
    if threshold.is_nan() || threshold.is_infinite() {
        return Err(Error::Config(
            "Invalid distance threshold: NaN and infinity are not allowed".into(),
        ));
    }

    if !(0.0..=MAX_DISTANCE).contains(&threshold) {
        return Err(Error::Config(format!(
            "Invalid distance threshold: {} (must be between 0.0 and {})",
            threshold, MAX_DISTANCE
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator(distance_threshold: f64) -> ConfigValidator {
        ConfigValidator {
            store_path: PathBuf::from("/test"),
            embedding_model: "test/model".to_string(),
            distance_threshold,
        }
    }

    #[test]
    fn test_default_threshold_valid() {
        assert!(validator(0.05).validate().is_ok());
    }

    #[test]
    fn test_valid_threshold_bounds() {
        assert!(validator(0.0).validate().is_ok());
        assert!(validator(4.0).validate().is_ok());
    }

    #[test]
    fn test_threshold_out_of_range() {
        assert!(matches!(validator(4.5).validate(), Err(Error::Config(_))));
        assert!(matches!(validator(-0.1).validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_threshold_nan_rejected() {
        assert!(matches!(
            validator(f64::NAN).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_threshold_infinity_rejected() {
        assert!(matches!(
            validator(f64::INFINITY).validate(),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut v = validator(0.05);
        v.embedding_model = "  ".to_string();
        assert!(matches!(v.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_empty_store_path_rejected() {
        let mut v = validator(0.05);
        v.store_path = PathBuf::new();
        assert!(matches!(v.validate(), Err(Error::Config(_))));
    }
}
