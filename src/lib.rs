//! Petal Nav - an orbiting "flower" navigation widget
//!
//! Core modules:
//! - `sim`: Deterministic engine (geometry, orbit motion, unlock gate, section transitions)
//! - `platform`: Render target / content panel contracts and the browser binding
//! - `tuning`: Data-driven per-petal constants and timings
//! - `error`: Initialization errors

pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::WidgetError;
pub use sim::{Effect, Flower, Input, Section, WidgetState};
pub use tuning::Tuning;

use glam::Vec2;

/// Widget timing and tolerance constants
pub mod consts {
    /// Duration of the docking and return transitions (ms)
    pub const TRANSITION_MS: f64 = 900.0;
    /// Duration of the outward snap when a petal is unlocked in sequence (ms)
    pub const SNAP_MS: f64 = 600.0;
    /// Interval between center label swaps (ms)
    pub const LABEL_INTERVAL_MS: f64 = 5000.0;
    /// Delay between label fade-out and text swap (ms)
    pub const LABEL_SWAP_DELAY_MS: f64 = 420.0;

    /// Largest frame delta fed to perimeter motion (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;
    /// Tolerance for classifying a point onto a rectangle edge (px)
    pub const PERIMETER_EPSILON: f32 = 1.0;
    /// Display-refresh ticks to wait after overlay promotion before docking
    pub const DOCK_DELAY_FRAMES: u32 = 2;

    /// Layout defaults
    pub const VIEWPORT_MARGIN: f32 = 24.0;
    pub const CENTER_RADIUS: f32 = 140.0;
    pub const PETAL_RADIUS: f32 = 42.0;
    pub const RING_GAP: f32 = 10.0;

    /// Base orbit rate in revolutions per minute
    pub const BASE_RPM: f32 = 0.9;
    /// Perimeter speed of a petal with speed factor 1.0 (px/s)
    pub const BASE_PERIMETER_SPEED: f32 = 90.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
///
/// Screen space: y grows downward, so increasing theta turns clockwise.
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_polar_points_up_at_minus_half_pi() {
        let p = polar_to_cartesian(50.0, -PI / 2.0);
        assert!(p.x.abs() < 1e-4);
        assert!((p.y + 50.0).abs() < 1e-4);

        let q = polar_to_cartesian(50.0, 0.0);
        assert!((q - Vec2::new(50.0, 0.0)).length() < 1e-4);
    }
}
