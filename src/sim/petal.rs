//! Petal entities and widget layout
//!
//! Petals are created once and never destroyed. Their constants (base angle,
//! radii, speeds) are fixed at construction; only position, perimeter
//! distance, expansion and layer change afterwards.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};

use super::geometry::{PerimeterRect, Viewport, ring_position};
use crate::tuning::Tuning;

/// Which render layer a petal currently lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Layer {
    /// Inside the flower cluster, under the overlay
    #[default]
    Cluster,
    /// Promoted above the content overlay
    Overlay,
}

/// Resting angle of petal `i` of `n`: evenly spaced, clockwise from the top
#[inline]
pub fn base_angle(i: usize, n: usize) -> f32 {
    -FRAC_PI_2 + (i as f32 / n as f32) * TAU
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Petal {
    pub index: usize,
    pub base_angle: f32,
    /// Resting distance from center before expansion
    pub ring_radius: f32,
    /// Distance from center once expanded / orbiting
    pub orbit_radius: f32,
    /// rad/s
    pub angular_velocity: f32,
    /// px/s along the perimeter
    pub perimeter_speed: f32,
    /// Position along the perimeter, wrapped before every use
    pub perimeter_distance: f32,
    pub expanded: bool,
    /// Live polar state around the center (valid in the home state)
    pub angle: f32,
    pub radius: f32,
    /// Last position written to the render target
    pub pos: Vec2,
    pub layer: Layer,
}

impl Petal {
    /// Radius the petal rests at in the home state
    pub fn home_radius(&self) -> f32 {
        if self.expanded {
            self.orbit_radius
        } else {
            self.ring_radius
        }
    }

    /// Resting position at the base angle
    pub fn home_position(&self, center: Vec2) -> Vec2 {
        ring_position(center, self.home_radius(), self.base_angle)
    }

    /// Reset the live polar state to the resting one and return the position
    pub fn reset_to_home(&mut self, center: Vec2) -> Vec2 {
        self.set_polar(center, self.home_radius(), self.base_angle)
    }

    /// Move to a polar position around `center`, returning the new point
    pub fn set_polar(&mut self, center: Vec2, radius: f32, angle: f32) -> Vec2 {
        self.radius = radius;
        self.angle = angle;
        self.pos = ring_position(center, radius, angle);
        self.pos
    }
}

/// Build the petal set from the tuning table
pub fn build_petals(tuning: &Tuning, center: Vec2) -> Vec<Petal> {
    let n = tuning.petal_count();
    let ring_radius = tuning.ring_radius();
    let base_omega = tuning.base_omega();

    tuning
        .petals
        .iter()
        .enumerate()
        .map(|(index, spec)| {
            let mut petal = Petal {
                index,
                base_angle: base_angle(index, n),
                ring_radius,
                orbit_radius: ring_radius + spec.outward_offset,
                angular_velocity: base_omega * spec.speed_factor,
                perimeter_speed: tuning.base_perimeter_speed * spec.speed_factor,
                perimeter_distance: 0.0,
                expanded: false,
                angle: 0.0,
                radius: 0.0,
                pos: Vec2::ZERO,
                layer: Layer::Cluster,
            };
            petal.reset_to_home(center);
            petal
        })
        .collect()
}

/// Geometry derived from the viewport, recomputed on resize
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub viewport: Viewport,
    pub center: Vec2,
    pub rect: PerimeterRect,
}

impl Layout {
    pub fn new(viewport: Viewport, margin: f32) -> Self {
        Self {
            viewport,
            center: viewport.center(),
            rect: PerimeterRect::from_viewport(viewport, margin),
        }
    }
}
