//! Embedding validation and squared-L2 distance.
//!
//! Stored and query vectors are unit length, so the distance is
//! `2 - 2 * cosine` and lies in `[0.0, 4.0]`. Smaller means more similar.

use crate::errors::Error;

/// Largest possible squared-L2 distance between two unit vectors.
pub const MAX_DISTANCE: f64 = 4.0;

/// Check that a vector can take part in distance computations.
///
/// # Errors
///
/// - `Error::InvalidEmbedding` if the vector is empty, contains NaN or
///   infinite values, or has zero norm.
pub fn validate_embedding(vec: &[f32]) -> Result<(), Error> {
    if vec.is_empty() {
        return Err(Error::InvalidEmbedding("Vector is empty".to_string()));
    }
    if vec.iter().any(|x| !x.is_finite()) {
        return Err(Error::InvalidEmbedding(
            "Vector contains NaN or infinite values".to_string(),
        ));
    }
    if vec.iter().all(|&x| x == 0.0) {
        return Err(Error::InvalidEmbedding("Vector has zero norm".to_string()));
    }
    Ok(())
}

/// Squared Euclidean distance between two vectors of equal length.
///
/// Accumulates in f64 so that near-identical unit vectors produce a
/// distance close to zero rather than f32 rounding noise.
///
/// # Errors
///
/// Returns `Error::DimensionMismatch` if the lengths differ.
pub fn squared_l2(a: &[f32], b: &[f32]) -> Result<f64, Error> {
    if a.len() != b.len() {
        return Err(Error::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    Ok(a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = (*x as f64) - (*y as f64);
            d * d
        })
        .sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::l2_normalize;

    #[test]
    fn test_identical_vectors_distance_zero() {
        let v = l2_normalize(&[1.0, 2.0, 3.0]);
        assert!(squared_l2(&v, &v).unwrap() < 1e-12);
    }

    #[test]
    fn test_orthogonal_unit_vectors_distance_two() {
        let d = squared_l2(&[1.0, 0.0], &[0.0, 1.0]).unwrap();
        assert!((d - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_opposite_unit_vectors_distance_max() {
        let d = squared_l2(&[1.0, 0.0], &[-1.0, 0.0]).unwrap();
        assert!((d - MAX_DISTANCE).abs() < 1e-9);
    }

    #[test]
    fn test_distance_matches_cosine_identity() {
        let a = l2_normalize(&[0.3, 0.9, -0.2]);
        let b = l2_normalize(&[0.5, 0.1, 0.4]);
        let cos: f64 = a.iter().zip(&b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
        let d = squared_l2(&a, &b).unwrap();
        assert!((d - (2.0 - 2.0 * cos)).abs() < 1e-6);
    }

    #[test]
    fn test_mismatched_dimensions() {
        assert!(matches!(
            squared_l2(&[1.0, 0.0], &[1.0, 0.0, 0.0]),
            Err(Error::DimensionMismatch {
                expected: 2,
                actual: 3
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(
            validate_embedding(&[]),
            Err(Error::InvalidEmbedding(_))
        ));
    }

    #[test]
    fn test_validate_rejects_nan_and_infinity() {
        assert!(validate_embedding(&[f32::NAN, 1.0]).is_err());
        assert!(validate_embedding(&[f32::INFINITY, 1.0]).is_err());
    }

    #[test]
    fn test_validate_rejects_zero_norm() {
        assert!(validate_embedding(&[0.0; 8]).is_err());
    }

    #[test]
    fn test_validate_accepts_regular_vector() {
        assert!(validate_embedding(&[0.1, -0.2, 0.3]).is_ok());
    }
}
