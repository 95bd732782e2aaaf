//! Platform abstraction layer
//!
//! The engine only needs two collaborators:
//! - a render target that can place, animate and re-layer petals and restyle
//!   the center label
//! - a content panel that can show, hide and focus a section
//!
//! `apply_effects` feeds engine output to them in order. The browser binding
//! lives in `web` (wasm32 only).

use glam::Vec2;

use crate::sim::{Effect, Section, WidgetState};

#[cfg(target_arch = "wasm32")]
pub mod web;

/// Something that can draw petals and the center label
pub trait RenderTarget {
    /// Absolute placement, sub-pixel precise, no interpolation
    fn place(&mut self, petal: usize, at: Vec2);
    /// Interpolated move; completion is reported back as `Input::TransitionEnd`
    fn animate(&mut self, petal: usize, to: Vec2, duration_ms: f64);
    fn set_expanded(&mut self, petal: usize);
    fn highlight(&mut self, petal: Option<usize>);
    fn promote(&mut self, petal: usize, at: Vec2);
    fn restore(&mut self, petal: usize);
    fn fade_label(&mut self, out: bool);
    fn set_label(&mut self, text: &str, gradient: &str);
    /// State flags for styling and assistive tech
    fn set_state(&mut self, state: WidgetState);
    fn set_unlocked(&mut self);
}

/// The full-screen content overlay
pub trait ContentPanel {
    fn show(&mut self, section: Section);
    fn hide(&mut self);
    fn focus(&mut self);
}

/// Apply engine effects in order
pub fn apply_effects<R, P>(effects: &[Effect], target: &mut R, panel: &mut P)
where
    R: RenderTarget + ?Sized,
    P: ContentPanel + ?Sized,
{
    for effect in effects {
        match effect {
            Effect::PlaceAt { petal, at } => target.place(*petal, *at),
            Effect::AnimateTo {
                petal,
                to,
                duration_ms,
            } => target.animate(*petal, *to, *duration_ms),
            Effect::SetExpanded { petal } => target.set_expanded(*petal),
            Effect::HighlightTarget(petal) => target.highlight(*petal),
            Effect::PromoteToOverlay { petal, at } => target.promote(*petal, *at),
            Effect::RestoreLayer { petal } => target.restore(*petal),
            Effect::ShowContent(section) => panel.show(*section),
            Effect::HideContent => panel.hide(),
            Effect::FocusContent => panel.focus(),
            Effect::LabelFadeOut => target.fade_label(true),
            Effect::LabelFadeIn => target.fade_label(false),
            Effect::SetLabel { text, gradient } => target.set_label(text, gradient),
            Effect::StateChanged(state) => target.set_state(*state),
            Effect::Unlocked => target.set_unlocked(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Flower, Input, Viewport};
    use crate::tuning::Tuning;

    /// Render target that keeps the last written state
    #[derive(Default)]
    struct Target {
        positions: Vec<Option<Vec2>>,
        overlay: Vec<bool>,
        label: Option<String>,
        label_hidden: bool,
        state: Option<WidgetState>,
        unlocked: bool,
        highlighted: Option<usize>,
    }

    impl Target {
        fn new(n: usize) -> Self {
            Self {
                positions: vec![None; n],
                overlay: vec![false; n],
                ..Default::default()
            }
        }
    }

    impl RenderTarget for Target {
        fn place(&mut self, petal: usize, at: Vec2) {
            self.positions[petal] = Some(at);
        }
        fn animate(&mut self, petal: usize, to: Vec2, _duration_ms: f64) {
            self.positions[petal] = Some(to);
        }
        fn set_expanded(&mut self, _petal: usize) {}
        fn highlight(&mut self, petal: Option<usize>) {
            self.highlighted = petal;
        }
        fn promote(&mut self, petal: usize, at: Vec2) {
            self.overlay[petal] = true;
            self.positions[petal] = Some(at);
        }
        fn restore(&mut self, petal: usize) {
            self.overlay[petal] = false;
        }
        fn fade_label(&mut self, out: bool) {
            self.label_hidden = out;
        }
        fn set_label(&mut self, text: &str, _gradient: &str) {
            self.label = Some(text.to_string());
        }
        fn set_state(&mut self, state: WidgetState) {
            self.state = Some(state);
        }
        fn set_unlocked(&mut self) {
            self.unlocked = true;
        }
    }

    #[derive(Default)]
    struct Panel {
        shown: Option<Section>,
        focused: bool,
    }

    impl ContentPanel for Panel {
        fn show(&mut self, section: Section) {
            self.shown = Some(section);
        }
        fn hide(&mut self) {
            self.shown = None;
            self.focused = false;
        }
        fn focus(&mut self) {
            self.focused = true;
        }
    }

    #[test]
    fn test_session_drives_collaborators() {
        let mut flower = Flower::new(Tuning::default(), Viewport::new(1000.0, 800.0)).unwrap();
        let mut target = Target::new(flower.petals().len());
        let mut panel = Panel::default();

        apply_effects(&flower.initial_effects(), &mut target, &mut panel);
        assert!(target.positions.iter().all(|p| p.is_some()));
        assert_eq!(target.highlighted, Some(0));
        assert_eq!(target.state, Some(WidgetState::Home));

        for i in 0..8 {
            let effects = flower.handle(Input::PetalActivated(i), 0.0);
            apply_effects(&effects, &mut target, &mut panel);
        }
        let effects = flower.handle(Input::TransitionEnd(7), 600.0);
        apply_effects(&effects, &mut target, &mut panel);
        assert!(target.unlocked);
        assert_eq!(target.highlighted, None);
        assert!(target.label_hidden);

        apply_effects(&flower.advance(1020.0), &mut target, &mut panel);
        assert_eq!(target.label.as_deref(), Some("Work"));
        assert!(!target.label_hidden);

        let effects = flower.handle(Input::CenterActivated, 2000.0);
        apply_effects(&effects, &mut target, &mut panel);
        assert_eq!(panel.shown, Some(Section::Work));
        assert!(target.overlay.iter().all(|&o| o));

        apply_effects(&flower.frame(2016.0), &mut target, &mut panel);
        apply_effects(&flower.frame(2032.0), &mut target, &mut panel);
        apply_effects(&flower.advance(2932.0), &mut target, &mut panel);
        assert!(panel.focused);
        assert_eq!(target.state, Some(WidgetState::Section));
        let rect = flower.layout().rect;
        assert!(target.positions.iter().flatten().all(|p| rect.on_boundary(*p, 1.0)));

        let effects = flower.handle(Input::Close, 3000.0);
        apply_effects(&effects, &mut target, &mut panel);
        assert_eq!(panel.shown, None);
        apply_effects(&flower.advance(3900.0), &mut target, &mut panel);
        assert!(target.overlay.iter().all(|&o| !o));
        assert_eq!(target.state, Some(WidgetState::Home));
    }
}
