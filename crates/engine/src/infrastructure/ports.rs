//! Testability ports for injecting randomness.

// =============================================================================
// Testability Ports
// =============================================================================

/// Source of every random draw the simulation makes.
#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`. Returns `min` when `max < min`.
    fn gen_range(&self, min: i32, max: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn gen_unit(&self) -> f64;
}
