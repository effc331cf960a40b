//! Numerical constants shared by the simulator and validation.

/// Constants used throughout the crate
pub mod qaoa_constants {
    /// Used for rotation and phase angles.
    pub const PI: f64 = std::f64::consts::PI;
    /// Allowed deviation of the squared state norm from 1.
    pub const NORM_TOLERANCE: f64 = 1e-9;
    /// Squared amplitudes below this are treated as zero.
    pub const AMPLITUDE_TOLERANCE: f64 = 1e-12;
}
