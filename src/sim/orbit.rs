//! Continuous petal motion
//!
//! Two mutually exclusive regimes:
//! - Center orbit: each petal circles the widget center at its own radius and
//!   angular velocity, timed from the moment the mode started.
//! - Perimeter orbit: each petal walks the inset viewport rectangle at its own
//!   linear speed, integrated from capped per-frame deltas.
//!
//! The step functions are pure over the petal slice; `OrbitScheduler` only
//! decides which one runs and with what time input. At most one motion driver
//! writes petal positions at a time, and keeping it that way (stop before
//! start) is the caller's job.

use glam::Vec2;

use super::geometry::{PerimeterRect, wrap_distance};
use super::petal::{Layout, Petal};

/// Advance every petal around the center to `elapsed_secs` since orbit start
pub fn center_orbit_step(petals: &mut [Petal], center: Vec2, elapsed_secs: f32) {
    for petal in petals.iter_mut() {
        let angle = petal.base_angle + petal.angular_velocity * elapsed_secs;
        petal.set_polar(center, petal.orbit_radius, angle);
    }
}

/// Advance every petal `dt` seconds along the rectangle perimeter
pub fn perimeter_orbit_step(petals: &mut [Petal], rect: &PerimeterRect, dt: f32) {
    let length = rect.perimeter_length();
    for petal in petals.iter_mut() {
        petal.perimeter_distance =
            wrap_distance(petal.perimeter_distance + petal.perimeter_speed * dt, length);
        petal.pos = rect.point_at(petal.perimeter_distance);
    }
}

/// Which motion regime is active
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OrbitMode {
    Idle,
    /// Circular orbit; `origin_ms` is the time origin of this activation
    Center { origin_ms: f64 },
    /// Perimeter walk; `last_ms` is the previous frame time
    Perimeter { last_ms: f64 },
}

#[derive(Debug, Clone)]
pub struct OrbitScheduler {
    mode: OrbitMode,
    max_frame_dt: f32,
}

impl OrbitScheduler {
    pub fn new(max_frame_dt: f32) -> Self {
        Self {
            mode: OrbitMode::Idle,
            max_frame_dt,
        }
    }

    pub fn mode(&self) -> OrbitMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode != OrbitMode::Idle
    }

    pub fn is_center(&self) -> bool {
        matches!(self.mode, OrbitMode::Center { .. })
    }

    pub fn is_perimeter(&self) -> bool {
        matches!(self.mode, OrbitMode::Perimeter { .. })
    }

    /// Start circular orbit with a fresh time origin
    ///
    /// Returns false (no-op) when center orbit is already running.
    pub fn start_center(&mut self, now_ms: f64) -> bool {
        match self.mode {
            OrbitMode::Center { .. } => false,
            OrbitMode::Perimeter { .. } => {
                log::warn!("Center orbit started while perimeter orbit still running");
                self.mode = OrbitMode::Center { origin_ms: now_ms };
                true
            }
            OrbitMode::Idle => {
                self.mode = OrbitMode::Center { origin_ms: now_ms };
                true
            }
        }
    }

    /// Start perimeter motion; the first frame integrates from `now_ms`
    pub fn start_perimeter(&mut self, now_ms: f64) -> bool {
        match self.mode {
            OrbitMode::Perimeter { .. } => false,
            OrbitMode::Center { .. } => {
                log::warn!("Perimeter orbit started while center orbit still running");
                self.mode = OrbitMode::Perimeter { last_ms: now_ms };
                true
            }
            OrbitMode::Idle => {
                self.mode = OrbitMode::Perimeter { last_ms: now_ms };
                true
            }
        }
    }

    /// Stop center orbit; idempotent, leaves perimeter motion alone
    pub fn stop_center(&mut self) -> bool {
        if self.is_center() {
            self.mode = OrbitMode::Idle;
            true
        } else {
            false
        }
    }

    /// Stop perimeter motion; idempotent, leaves center orbit alone
    pub fn stop_perimeter(&mut self) -> bool {
        if self.is_perimeter() {
            self.mode = OrbitMode::Idle;
            true
        } else {
            false
        }
    }

    /// Run one display-refresh tick
    ///
    /// Returns true when petal positions were written. Nothing is written
    /// while idle, so a stopped mode can never move a petal.
    pub fn frame(&mut self, now_ms: f64, petals: &mut [Petal], layout: &Layout) -> bool {
        match self.mode {
            OrbitMode::Idle => false,
            OrbitMode::Center { origin_ms } => {
                let elapsed = ((now_ms - origin_ms) / 1000.0).max(0.0) as f32;
                center_orbit_step(petals, layout.center, elapsed);
                true
            }
            OrbitMode::Perimeter { last_ms } => {
                let dt = (((now_ms - last_ms) / 1000.0) as f32).clamp(0.0, self.max_frame_dt);
                self.mode = OrbitMode::Perimeter { last_ms: now_ms };
                perimeter_orbit_step(petals, &layout.rect, dt);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_FRAME_DT;
    use crate::sim::geometry::{Viewport, ring_position};
    use crate::sim::petal::build_petals;
    use crate::tuning::Tuning;

    fn setup() -> (Vec<Petal>, Layout) {
        let layout = Layout::new(Viewport::new(1000.0, 800.0), 24.0);
        let petals = build_petals(&Tuning::default(), layout.center);
        (petals, layout)
    }

    #[test]
    fn test_center_step_at_zero_is_base_angle() {
        let (mut petals, layout) = setup();
        center_orbit_step(&mut petals, layout.center, 0.0);
        for petal in &petals {
            let expected = ring_position(layout.center, petal.orbit_radius, petal.base_angle);
            assert!((petal.pos - expected).length() < 1e-3);
        }
    }

    #[test]
    fn test_center_step_uses_per_petal_velocity() {
        let (mut petals, layout) = setup();
        center_orbit_step(&mut petals, layout.center, 10.0);
        for petal in &petals {
            let expected = petal.base_angle + petal.angular_velocity * 10.0;
            assert!((petal.angle - expected).abs() < 1e-5);
            assert_eq!(petal.radius, petal.orbit_radius);
        }
    }

    #[test]
    fn test_perimeter_step_wraps() {
        let (mut petals, layout) = setup();
        let length = layout.rect.perimeter_length();
        petals[0].perimeter_distance = length - 1.0;
        perimeter_orbit_step(&mut petals, &layout.rect, 0.05);
        assert!(petals[0].perimeter_distance < length);
        assert!(petals[0].perimeter_distance >= 0.0);
        assert!(layout.rect.on_boundary(petals[0].pos, 1.0));
    }

    #[test]
    fn test_center_time_origin_resets_on_restart() {
        let (mut petals, layout) = setup();
        let mut orbit = OrbitScheduler::new(MAX_FRAME_DT);

        assert!(orbit.start_center(1000.0));
        orbit.frame(3000.0, &mut petals, &layout);
        let advanced = petals[0].angle;
        assert!(advanced > petals[0].base_angle);

        orbit.stop_center();
        assert!(orbit.start_center(5000.0));
        orbit.frame(5000.0, &mut petals, &layout);
        assert!((petals[0].angle - petals[0].base_angle).abs() < 1e-6);
    }

    #[test]
    fn test_second_start_is_noop() {
        let mut orbit = OrbitScheduler::new(MAX_FRAME_DT);
        assert!(orbit.start_center(100.0));
        assert!(!orbit.start_center(900.0));
        assert_eq!(orbit.mode(), OrbitMode::Center { origin_ms: 100.0 });
    }

    #[test]
    fn test_perimeter_dt_is_capped() {
        let (mut petals, layout) = setup();
        let mut orbit = OrbitScheduler::new(MAX_FRAME_DT);
        orbit.start_perimeter(0.0);

        // A 10 second gap (suspended tab) only advances by the cap
        orbit.frame(10_000.0, &mut petals, &layout);
        let expected = petals[0].perimeter_speed * MAX_FRAME_DT;
        assert!((petals[0].perimeter_distance - expected).abs() < 1e-3);
    }

    #[test]
    fn test_stop_perimeter_twice_is_noop() {
        let (mut petals, layout) = setup();
        let mut orbit = OrbitScheduler::new(MAX_FRAME_DT);
        orbit.start_perimeter(0.0);
        orbit.frame(16.0, &mut petals, &layout);

        assert!(orbit.stop_perimeter());
        let frozen: Vec<Vec2> = petals.iter().map(|p| p.pos).collect();
        assert!(!orbit.stop_perimeter());

        assert!(!orbit.frame(32.0, &mut petals, &layout));
        let after: Vec<Vec2> = petals.iter().map(|p| p.pos).collect();
        assert_eq!(frozen, after);
    }

    #[test]
    fn test_stop_only_affects_its_own_mode() {
        let mut orbit = OrbitScheduler::new(MAX_FRAME_DT);
        orbit.start_center(0.0);
        assert!(!orbit.stop_perimeter());
        assert!(orbit.is_center());
        assert!(orbit.stop_center());
        assert!(!orbit.is_running());
    }
}
