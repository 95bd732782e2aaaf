//! The widget controller
//!
//! `Flower` owns every piece of widget state and is the only thing that
//! mutates petals. Hosts feed it inputs and clock ticks with an explicit
//! timestamp and get back an ordered list of effects to apply to the render
//! target and content panel. Nothing here touches a browser.

use glam::Vec2;

use super::geometry::{Viewport, ring_position, wrap_distance};
use super::label::{LabelCycler, LabelEffect};
use super::orbit::{OrbitMode, OrbitScheduler};
use super::petal::{Layer, Layout, Petal, build_petals};
use super::section::{Due, Section, SectionMachine, WidgetState, dock_target};
use super::unlock::{Activation, UnlockSequencer};
use crate::error::WidgetError;
use crate::tuning::Tuning;

/// Something that happened on the page
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Petal (or its pulse button) clicked
    PetalActivated(usize),
    /// A petal's position transition finished
    TransitionEnd(usize),
    /// Center label clicked or keyboard-activated
    CenterActivated,
    /// External request to open a section by id
    Navigate(String),
    /// Close button or cancellation key
    Close,
    VisibilityChanged(bool),
    Resize(Viewport),
}

/// Instruction for the render target or content panel, applied in order
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Put a petal at an absolute point without interpolation
    PlaceAt { petal: usize, at: Vec2 },
    /// Interpolate a petal to a point
    AnimateTo {
        petal: usize,
        to: Vec2,
        duration_ms: f64,
    },
    SetExpanded { petal: usize },
    /// Guidance highlight on the next petal to click (None clears it)
    HighlightTarget(Option<usize>),
    /// Lift a petal above the overlay, pinned at its current point
    PromoteToOverlay { petal: usize, at: Vec2 },
    /// Return a petal to the cluster layer
    RestoreLayer { petal: usize },
    ShowContent(Section),
    HideContent,
    FocusContent,
    LabelFadeOut,
    LabelFadeIn,
    SetLabel { text: String, gradient: String },
    StateChanged(WidgetState),
    Unlocked,
}

impl From<LabelEffect> for Effect {
    fn from(effect: LabelEffect) -> Self {
        match effect {
            LabelEffect::FadeOut => Effect::LabelFadeOut,
            LabelEffect::FadeIn => Effect::LabelFadeIn,
            LabelEffect::Swap { text, gradient } => Effect::SetLabel { text, gradient },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Flower {
    tuning: Tuning,
    layout: Layout,
    petals: Vec<Petal>,
    unlock: UnlockSequencer,
    orbit: OrbitScheduler,
    labels: LabelCycler,
    section: SectionMachine,
    visible: bool,
}

impl Flower {
    pub fn new(tuning: Tuning, viewport: Viewport) -> Result<Self, WidgetError> {
        tuning.validate()?;

        let layout = Layout::new(viewport, tuning.margin);
        let petals = build_petals(&tuning, layout.center);
        let unlock = UnlockSequencer::new(petals.len());
        let orbit = OrbitScheduler::new(tuning.max_frame_dt);
        let labels = LabelCycler::new(
            tuning.labels.clone(),
            tuning.label_interval_ms,
            tuning.label_swap_delay_ms,
        );
        let section = SectionMachine::new(tuning.transition_ms);

        log::info!(
            "Flower ready: {} petals, viewport {}x{}",
            petals.len(),
            viewport.width,
            viewport.height
        );

        Ok(Self {
            tuning,
            layout,
            petals,
            unlock,
            orbit,
            labels,
            section,
            visible: true,
        })
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn petals(&self) -> &[Petal] {
        &self.petals
    }

    pub fn state(&self) -> WidgetState {
        self.section.state()
    }

    pub fn open_section(&self) -> Option<Section> {
        self.section.open_section()
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlock.is_unlocked()
    }

    pub fn target_index(&self) -> Option<usize> {
        self.unlock.highlighted()
    }

    pub fn orbit_mode(&self) -> OrbitMode {
        self.orbit.mode()
    }

    pub fn label_text(&self) -> Option<&str> {
        self.labels.current_text()
    }

    /// Effects that draw the initial resting ring
    pub fn initial_effects(&self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .petals
            .iter()
            .map(|p| Effect::PlaceAt {
                petal: p.index,
                at: p.pos,
            })
            .collect();
        effects.push(Effect::HighlightTarget(self.unlock.highlighted()));
        effects.push(Effect::StateChanged(self.state()));
        effects
    }

    /// Whether the host should keep requesting display-refresh ticks
    pub fn wants_frames(&self) -> bool {
        self.orbit.is_running() || self.section.wants_frames()
    }

    /// Earliest pending timer, for the host's fixed-delay scheduler
    pub fn next_deadline(&self) -> Option<f64> {
        match (self.labels.next_deadline(), self.section.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn handle(&mut self, input: Input, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        match input {
            Input::PetalActivated(index) => self.activate_petal(index, &mut effects),
            Input::TransitionEnd(index) => self.finish_transition(index, now_ms, &mut effects),
            Input::CenterActivated => {
                let section = Section::from_label(self.labels.current_text());
                self.open(section, &mut effects);
            }
            Input::Navigate(id) => match Section::from_id(&id) {
                Some(section) => self.open(section, &mut effects),
                None => log::debug!("Ignoring navigation to unknown section {:?}", id),
            },
            Input::Close => self.close(now_ms, &mut effects),
            Input::VisibilityChanged(visible) => self.set_visible(visible, now_ms),
            Input::Resize(viewport) => self.resize(viewport, now_ms, &mut effects),
        }
        effects
    }

    /// Display-refresh tick: motion first, then transition steps and timers
    pub fn frame(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects = Vec::new();

        if self.orbit.frame(now_ms, &mut self.petals, &self.layout) {
            effects.extend(self.petals.iter().map(|p| Effect::PlaceAt {
                petal: p.index,
                at: p.pos,
            }));
        }

        if self.section.on_frame(now_ms) == Some(Due::Dock) {
            self.dock(&mut effects);
        }

        effects.extend(self.advance(now_ms));
        effects
    }

    /// Fire fixed-delay timers that are due
    pub fn advance(&mut self, now_ms: f64) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self
            .labels
            .advance(now_ms)
            .into_iter()
            .map(Effect::from)
            .collect();

        match self.section.advance(now_ms) {
            Some(Due::EnterSection) => {
                self.orbit.start_perimeter(now_ms);
                effects.push(Effect::FocusContent);
                effects.push(Effect::StateChanged(WidgetState::Section));
                log::info!("Section open, petals on perimeter");
            }
            Some(Due::ReturnHome) => {
                for petal in &mut self.petals {
                    petal.layer = Layer::Cluster;
                    effects.push(Effect::RestoreLayer { petal: petal.index });
                }
                self.resume_home_motion(now_ms, &mut effects);
                log::info!("Back home");
            }
            Some(Due::Dock) | None => {}
        }
        effects
    }

    fn activate_petal(&mut self, index: usize, effects: &mut Vec<Effect>) {
        if !self.section.is_settled() {
            log::debug!("Ignoring petal {} outside the home state", index);
            return;
        }

        let center = self.layout.center;
        let snap_ms = self.tuning.snap_ms;
        match self.unlock.activate(index, &mut self.petals) {
            Activation::Ignored => {
                log::debug!("Ignoring petal {} (target is {})", index, self.unlock.target_index());
            }
            Activation::Advanced { expanded, next } => {
                let to = self.petals[expanded].reset_to_home(center);
                effects.push(Effect::SetExpanded { petal: expanded });
                effects.push(Effect::AnimateTo {
                    petal: expanded,
                    to,
                    duration_ms: snap_ms,
                });
                effects.push(Effect::HighlightTarget(Some(next)));
            }
            Activation::Armed { expanded } => {
                let to = self.petals[expanded].reset_to_home(center);
                effects.push(Effect::SetExpanded { petal: expanded });
                effects.push(Effect::AnimateTo {
                    petal: expanded,
                    to,
                    duration_ms: snap_ms,
                });
                log::debug!("All petals expanded, waiting for petal {} to settle", expanded);
            }
        }
    }

    fn finish_transition(&mut self, index: usize, now_ms: f64, effects: &mut Vec<Effect>) {
        if !self.unlock.finish(index) {
            return;
        }
        log::info!("Orbit unlocked");
        effects.push(Effect::Unlocked);
        effects.push(Effect::HighlightTarget(None));

        // Opened mid-snap: motion starts when the widget comes home
        if self.section.is_settled() {
            self.resume_home_motion(now_ms, effects);
        }
    }

    /// Restart center orbit and label cycling after unlock or a return home
    fn resume_home_motion(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        if !self.unlock.is_unlocked() {
            return;
        }
        if self.visible {
            self.orbit.start_center(now_ms);
        }
        effects.extend(self.labels.start(now_ms).into_iter().map(Effect::from));
    }

    fn open(&mut self, section: Section, effects: &mut Vec<Effect>) {
        if !self.section.begin_open(section) {
            log::debug!("Ignoring open of {} in state {:?}", section.as_str(), self.state());
            return;
        }
        log::info!("Opening section {}", section.as_str());

        self.orbit.stop_center();
        effects.extend(self.labels.stop().into_iter().map(Effect::from));
        effects.push(Effect::ShowContent(section));
        effects.push(Effect::StateChanged(WidgetState::Opening));

        let center = self.layout.center;
        for petal in &mut self.petals {
            // Live polar state, whether resting, expanded or mid-orbit
            let at = petal.set_polar(center, petal.radius, petal.angle);
            petal.layer = Layer::Overlay;
            effects.push(Effect::PromoteToOverlay {
                petal: petal.index,
                at,
            });
        }
    }

    /// Fly each petal along its tangent onto the rectangle
    fn dock(&mut self, effects: &mut Vec<Effect>) {
        let center = self.layout.center;
        let rect = self.layout.rect;
        let epsilon = self.tuning.perimeter_epsilon;
        for petal in &mut self.petals {
            let target = dock_target(petal, center, &rect, epsilon);
            petal.perimeter_distance = target.perimeter_distance;
            petal.pos = target.to;
            effects.push(Effect::AnimateTo {
                petal: petal.index,
                to: target.to,
                duration_ms: self.tuning.transition_ms,
            });
        }
    }

    fn close(&mut self, now_ms: f64, effects: &mut Vec<Effect>) {
        if !self.section.begin_close(now_ms) {
            log::debug!("Ignoring close in state {:?}", self.state());
            return;
        }
        log::info!("Closing section");

        self.orbit.stop_perimeter();
        let center = self.layout.center;
        for petal in &mut self.petals {
            let to = petal.reset_to_home(center);
            effects.push(Effect::AnimateTo {
                petal: petal.index,
                to,
                duration_ms: self.tuning.transition_ms,
            });
        }
        // Overlay hides alongside the return flight
        effects.push(Effect::HideContent);
        effects.push(Effect::StateChanged(WidgetState::Home));
    }

    /// Hidden pages stop center orbit; visibility restarts it with a fresh
    /// time origin, so petals jump back to their base angles.
    fn set_visible(&mut self, visible: bool, now_ms: f64) {
        self.visible = visible;
        if !visible {
            if self.orbit.stop_center() {
                log::debug!("Center orbit suspended (page hidden)");
            }
        } else if self.unlock.is_unlocked()
            && self.section.is_settled()
            && self.orbit.start_center(now_ms)
        {
            log::debug!("Center orbit resumed");
        }
    }

    fn resize(&mut self, viewport: Viewport, now_ms: f64, effects: &mut Vec<Effect>) {
        self.layout = Layout::new(viewport, self.tuning.margin);
        let center = self.layout.center;
        let rect = self.layout.rect;
        let length = rect.perimeter_length();

        match self.state() {
            WidgetState::Home => {
                // A running orbit picks the new center up on its next frame
                if self.orbit.is_center() {
                    return;
                }
                for petal in &mut self.petals {
                    let at = ring_position(center, petal.radius, petal.angle);
                    petal.pos = at;
                    effects.push(Effect::PlaceAt {
                        petal: petal.index,
                        at,
                    });
                }
            }
            WidgetState::Opening if self.section.wants_frames() => {
                // Docking not computed yet; it will use the new layout
                return;
            }
            WidgetState::Opening | WidgetState::Section => {
                for petal in &mut self.petals {
                    petal.perimeter_distance = wrap_distance(petal.perimeter_distance, length);
                    let at = rect.point_at(petal.perimeter_distance);
                    petal.pos = at;
                    effects.push(Effect::PlaceAt {
                        petal: petal.index,
                        at,
                    });
                }
            }
        }

        // Placement cuts any running transition short, so the final snap will
        // never report its end
        if let Some(index) = self.unlock.armed() {
            self.finish_transition(index, now_ms, effects);
        }
    }
}
