//! Home / section transitions
//!
//! `home → opening` promotes the petals above the overlay, waits two display
//! refreshes so the promotion is painted, then docks every petal onto the
//! viewport rectangle along its orbit tangent. `opening → section` follows
//! after the docking transition and hands the petals to perimeter motion.
//! `section → home` flies them back to the ring and, after the same delay,
//! returns them to the cluster layer.
//!
//! Each multi-phase step is an explicit pending phase with a deadline (or a
//! frame count) instead of nested timers, so a transition in flight is always
//! visible and cancellable.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{PerimeterRect, ring_position, tangent, wrap_distance};
use super::petal::Petal;
use crate::consts::DOCK_DELAY_FRAMES;

/// Content sections reachable from the center label or the address fragment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Section {
    #[default]
    Work,
    About,
    Contact,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Work, Section::About, Section::Contact];

    /// Identifier used for fragments and panel lookup
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Work => "work",
            Section::About => "about",
            Section::Contact => "contact",
        }
    }

    /// Parse a navigation identifier (`work`, `#about`, ...); unknown ids give None
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().trim_start_matches('#').to_lowercase().as_str() {
            "work" => Some(Section::Work),
            "about" => Some(Section::About),
            "contact" => Some(Section::Contact),
            _ => None,
        }
    }

    /// Section named by the center label, defaulting to Work
    pub fn from_label(text: Option<&str>) -> Self {
        text.and_then(Self::from_id).unwrap_or_default()
    }
}

/// Process-wide widget state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WidgetState {
    #[default]
    Home,
    Opening,
    Section,
}

impl WidgetState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetState::Home => "home",
            WidgetState::Opening => "opening",
            WidgetState::Section => "section",
        }
    }
}

/// A transition step waiting to run
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pending {
    /// Waiting for display refreshes before docking
    Dock { frames_left: u32 },
    /// Docking in flight; perimeter motion starts at `at`
    EnterSection { at: f64 },
    /// Return flight in progress; petals rejoin the cluster at `at`
    ReturnHome { at: f64 },
}

/// A pending step that has come due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Due {
    Dock,
    EnterSection,
    ReturnHome,
}

#[derive(Debug, Clone)]
pub struct SectionMachine {
    state: WidgetState,
    open: Option<Section>,
    pending: Option<Pending>,
    transition_ms: f64,
}

impl SectionMachine {
    pub fn new(transition_ms: f64) -> Self {
        Self {
            state: WidgetState::Home,
            open: None,
            pending: None,
            transition_ms,
        }
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn open_section(&self) -> Option<Section> {
        self.open
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    /// Home with nothing in flight
    pub fn is_settled(&self) -> bool {
        self.state == WidgetState::Home && self.pending.is_none()
    }

    /// `home → opening`; rejected unless settled at home
    pub fn begin_open(&mut self, section: Section) -> bool {
        if !self.is_settled() {
            return false;
        }
        self.state = WidgetState::Opening;
        self.open = Some(section);
        self.pending = Some(Pending::Dock {
            frames_left: DOCK_DELAY_FRAMES,
        });
        true
    }

    /// `section → home`; rejected unless in the section state
    pub fn begin_close(&mut self, now_ms: f64) -> bool {
        if self.state != WidgetState::Section {
            return false;
        }
        self.state = WidgetState::Home;
        self.open = None;
        self.pending = Some(Pending::ReturnHome {
            at: now_ms + self.transition_ms,
        });
        true
    }

    /// Whether a step is counting display refreshes
    pub fn wants_frames(&self) -> bool {
        matches!(self.pending, Some(Pending::Dock { .. }))
    }

    pub fn next_deadline(&self) -> Option<f64> {
        match self.pending {
            Some(Pending::EnterSection { at }) | Some(Pending::ReturnHome { at }) => Some(at),
            _ => None,
        }
    }

    /// Count one display refresh; returns `Due::Dock` on the last one
    pub fn on_frame(&mut self, now_ms: f64) -> Option<Due> {
        let Some(Pending::Dock { frames_left }) = self.pending else {
            return None;
        };
        if frames_left > 1 {
            self.pending = Some(Pending::Dock {
                frames_left: frames_left - 1,
            });
            return None;
        }
        self.pending = Some(Pending::EnterSection {
            at: now_ms + self.transition_ms,
        });
        Some(Due::Dock)
    }

    /// Fire a timed step whose deadline has passed
    pub fn advance(&mut self, now_ms: f64) -> Option<Due> {
        match self.pending {
            Some(Pending::EnterSection { at }) if at <= now_ms => {
                self.pending = None;
                self.state = WidgetState::Section;
                Some(Due::EnterSection)
            }
            Some(Pending::ReturnHome { at }) if at <= now_ms => {
                self.pending = None;
                Some(Due::ReturnHome)
            }
            _ => None,
        }
    }
}

/// Where a petal docks on the rectangle, and its perimeter distance there
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DockTarget {
    pub to: Vec2,
    pub perimeter_distance: f32,
}

/// Cast a ray from the petal's live ring position along its orbit tangent
///
/// The same live angle feeds both the visual target and the perimeter
/// distance, so motion resumes exactly where the petal lands.
pub fn dock_target(petal: &Petal, center: Vec2, rect: &PerimeterRect, epsilon: f32) -> DockTarget {
    let origin = ring_position(center, petal.radius, petal.angle);
    let to = rect.ray_to_edge(origin, tangent(petal.angle), epsilon);
    let length = rect.perimeter_length();
    DockTarget {
        to,
        perimeter_distance: wrap_distance(rect.distance_along(to, epsilon), length),
    }
}
