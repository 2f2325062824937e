//! Shared utilities.

/// Frame pacing and smoothed FPS measurement.
pub mod frame_timing;
