//! Ring and perimeter geometry
//!
//! Two coordinate systems meet here: polar positions around the widget center
//! (resting ring and circular orbit) and arc-length positions along the inset
//! viewport rectangle (section-state orbit). Perimeter distance is measured
//! clockwise from the top-left corner: top edge, right edge, bottom edge, left
//! edge.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::polar_to_cartesian;

/// Point on a circle of `radius` around `center` at `angle`
#[inline]
pub fn ring_position(center: Vec2, radius: f32, angle: f32) -> Vec2 {
    center + polar_to_cartesian(radius, angle)
}

/// Unit tangent at `angle`, pointing in the direction of increasing angle
/// (clockwise on screen)
#[inline]
pub fn tangent(angle: f32) -> Vec2 {
    Vec2::new(-angle.sin(), angle.cos())
}

/// Wrap a perimeter distance into `[0, length)`
#[inline]
pub fn wrap_distance(d: f32, length: f32) -> f32 {
    if length <= 0.0 {
        return 0.0;
    }
    let wrapped = d.rem_euclid(length);
    // rem_euclid can round up to `length` for tiny negative inputs
    if wrapped >= length { 0.0 } else { wrapped }
}

/// Size of the display area
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// The rectangle petals travel along in the section state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerimeterRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

/// Edge of a [`PerimeterRect`], in clockwise walking order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl PerimeterRect {
    /// Inset the viewport by `margin` on every side
    ///
    /// A viewport smaller than twice the margin collapses to a point at its
    /// center rather than inverting.
    pub fn from_viewport(viewport: Viewport, margin: f32) -> Self {
        let center = viewport.center();
        let left = margin.min(center.x);
        let top = margin.min(center.y);
        Self {
            left,
            top,
            right: (viewport.width - margin).max(left),
            bottom: (viewport.height - margin).max(top),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn perimeter_length(&self) -> f32 {
        2.0 * (self.width() + self.height())
    }

    /// Whether `p` lies inside or on the rectangle (with tolerance)
    pub fn contains(&self, p: Vec2, epsilon: f32) -> bool {
        p.x >= self.left - epsilon
            && p.x <= self.right + epsilon
            && p.y >= self.top - epsilon
            && p.y <= self.bottom + epsilon
    }

    /// Whether `p` lies on the boundary (with tolerance)
    pub fn on_boundary(&self, p: Vec2, epsilon: f32) -> bool {
        self.contains(p, epsilon) && self.classify(p, epsilon).is_some()
    }

    /// Priority-ordered edge test: top, right, bottom, left
    ///
    /// A point near a corner resolves to whichever edge matches first.
    pub fn classify(&self, p: Vec2, epsilon: f32) -> Option<Edge> {
        if (p.y - self.top).abs() <= epsilon {
            Some(Edge::Top)
        } else if (p.x - self.right).abs() <= epsilon {
            Some(Edge::Right)
        } else if (p.y - self.bottom).abs() <= epsilon {
            Some(Edge::Bottom)
        } else if (p.x - self.left).abs() <= epsilon {
            Some(Edge::Left)
        } else {
            None
        }
    }

    /// Edge closest to `p`, ties broken in clockwise priority order
    fn nearest_edge(&self, p: Vec2) -> Edge {
        let candidates = [
            (Edge::Top, (p.y - self.top).abs()),
            (Edge::Right, (p.x - self.right).abs()),
            (Edge::Bottom, (p.y - self.bottom).abs()),
            (Edge::Left, (p.x - self.left).abs()),
        ];
        let mut best = candidates[0];
        for candidate in &candidates[1..] {
            if candidate.1 < best.1 {
                best = *candidate;
            }
        }
        best.0
    }

    /// Arc-length distance of a boundary point from the top-left corner
    ///
    /// Points off the boundary (layout jitter beyond `epsilon`) are attributed
    /// to the nearest edge and clamped into that edge's range.
    pub fn distance_along(&self, p: Vec2, epsilon: f32) -> f32 {
        let w = self.width();
        let h = self.height();
        let edge = self
            .classify(p, epsilon)
            .unwrap_or_else(|| self.nearest_edge(p));

        match edge {
            Edge::Top => (p.x - self.left).clamp(0.0, w),
            Edge::Right => w + (p.y - self.top).clamp(0.0, h),
            Edge::Bottom => w + h + (self.right - p.x).clamp(0.0, w),
            Edge::Left => w + h + w + (self.bottom - p.y).clamp(0.0, h),
        }
    }

    /// Boundary point at perimeter distance `d`; `d` must be in `[0, length)`
    pub fn point_at(&self, d: f32) -> Vec2 {
        let w = self.width();
        let h = self.height();

        if d < w {
            Vec2::new(self.left + d, self.top)
        } else if d < w + h {
            Vec2::new(self.right, self.top + (d - w))
        } else if d < w + h + w {
            Vec2::new(self.right - (d - w - h), self.bottom)
        } else {
            Vec2::new(self.left, self.bottom - (d - w - h - w))
        }
    }

    /// Nearest boundary point hit by the ray `origin + t * direction`, `t > 0`
    ///
    /// Only the edges the ray can cross (by the sign of each direction
    /// component) are tested. A degenerate direction, or a ray that never hits
    /// the boundary, returns `origin` unchanged. Hits are kept when they lie
    /// within `epsilon` of the rectangle.
    pub fn ray_to_edge(&self, origin: Vec2, direction: Vec2, epsilon: f32) -> Vec2 {
        if !direction.is_finite() || !origin.is_finite() {
            return origin;
        }

        let mut candidates = [None; 2];
        if direction.x > 0.0 {
            candidates[0] = Some((self.right - origin.x) / direction.x);
        } else if direction.x < 0.0 {
            candidates[0] = Some((self.left - origin.x) / direction.x);
        }
        if direction.y > 0.0 {
            candidates[1] = Some((self.bottom - origin.y) / direction.y);
        } else if direction.y < 0.0 {
            candidates[1] = Some((self.top - origin.y) / direction.y);
        }

        candidates
            .into_iter()
            .flatten()
            .filter(|t| *t > 0.0)
            .map(|t| origin + direction * t)
            .filter(|p| self.contains(*p, epsilon))
            .min_by(|a, b| {
                a.distance_squared(origin)
                    .partial_cmp(&b.distance_squared(origin))
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(origin)
    }
}
