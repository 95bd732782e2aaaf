//! Deterministic widget engine
//!
//! All widget logic lives here. This module must stay pure:
//! - Time is always passed in, never read
//! - Petals are iterated in index order
//! - No DOM or platform dependencies

pub mod flower;
pub mod geometry;
pub mod label;
pub mod orbit;
pub mod petal;
pub mod section;
pub mod unlock;

pub use flower::{Effect, Flower, Input};
pub use geometry::{Edge, PerimeterRect, Viewport, ring_position, tangent, wrap_distance};
pub use label::{LabelCycler, LabelEffect};
pub use orbit::{OrbitMode, OrbitScheduler, center_orbit_step, perimeter_orbit_step};
pub use petal::{Layer, Layout, Petal, base_angle, build_petals};
pub use section::{DockTarget, Section, SectionMachine, WidgetState, dock_target};
pub use unlock::{Activation, UnlockSequencer};
