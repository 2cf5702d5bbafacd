//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Environment variables read by `Config::load`.
pub const ENV_VARS: [&str; 4] = [
    "SEMCACHE_STORE_PATH",
    "SEMCACHE_EMBEDDING_MODEL",
    "SEMCACHE_MODEL_CACHE",
    "SEMCACHE_DISTANCE_THRESHOLD",
];

/// Set an environment variable. Callers must hold `ENV_MUTEX`.
pub fn set_env(name: &str, value: &str) {
    // SAFETY: env-mutating tests serialize on ENV_MUTEX.
    unsafe { std::env::set_var(name, value) };
}

/// Clean up environment variables used by semcache config.
pub fn cleanup_env_vars() {
    for var in ENV_VARS {
        // SAFETY: env-mutating tests serialize on ENV_MUTEX.
        unsafe { std::env::remove_var(var) };
    }
}
