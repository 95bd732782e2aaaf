//! Browser binding: DOM render target and content overlay
//!
//! Petals are `position: fixed` at the viewport origin and moved purely by
//! transform, so re-parenting between the cluster and the overlay layer never
//! shifts them visually.

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use super::{ContentPanel, RenderTarget};
use crate::error::WidgetError;
use crate::sim::{Section, WidgetState};

const TRANSITION_EASING: &str = "cubic-bezier(.2,.8,.2,1)";

fn element_by_id(document: &Document, id: &str) -> Result<HtmlElement, WidgetError> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| WidgetError::MissingElement(format!("#{}", id)))
}

fn petal_transform(at: Vec2) -> String {
    format!(
        "translate({:.3}px, {:.3}px) translate(-50%, -50%)",
        at.x, at.y
    )
}

/// The flower: cluster, center label and petals
pub struct DomWidget {
    pub cluster: HtmlElement,
    pub center: HtmlElement,
    pub label: HtmlElement,
    pub petals: Vec<HtmlElement>,
    /// Pulse button inside each petal, if the page has one
    pub buttons: Vec<Option<Element>>,
    /// Layer stacked above the overlay that hosts petals in the section state
    pub overlay_layer: HtmlElement,
}

/// The content overlay and its per-section panels
pub struct DomPanel {
    pub overlay: HtmlElement,
    pub close_button: Option<HtmlElement>,
    panels: Vec<(Section, HtmlElement)>,
}

impl DomWidget {
    /// Look up every element up front so a broken page fails here, not mid-transition
    pub fn bind(document: &Document, petal_count: usize) -> Result<Self, WidgetError> {
        let cluster = element_by_id(document, "cluster")?;
        let center = element_by_id(document, "center")?;
        let label = element_by_id(document, "centerLabel")?;
        let overlay_layer = element_by_id(document, "overlay-layer")?;

        let nodes = document
            .query_selector_all(".petal")
            .map_err(|_| WidgetError::MissingElement(".petal".into()))?;
        let petals: Vec<HtmlElement> = (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect();
        if petals.len() != petal_count {
            return Err(WidgetError::PetalCountMismatch {
                expected: petal_count,
                found: petals.len(),
            });
        }
        let buttons = petals
            .iter()
            .map(|p| p.query_selector(".pulse-btn").ok().flatten())
            .collect();

        for petal in &petals {
            let style = petal.style();
            let _ = style.set_property("position", "fixed");
            let _ = style.set_property("left", "0");
            let _ = style.set_property("top", "0");
        }

        Ok(Self {
            cluster,
            center,
            label,
            petals,
            buttons,
            overlay_layer,
        })
    }

    fn petal(&self, index: usize) -> Option<&HtmlElement> {
        self.petals.get(index)
    }
}

impl RenderTarget for DomWidget {
    fn place(&mut self, petal: usize, at: Vec2) {
        if let Some(el) = self.petal(petal) {
            let style = el.style();
            let _ = style.set_property("transition", "none");
            let _ = style.set_property("transform", &petal_transform(at));
        }
    }

    fn animate(&mut self, petal: usize, to: Vec2, duration_ms: f64) {
        if let Some(el) = self.petal(petal) {
            let style = el.style();
            let transition = format!("transform {}ms {}", duration_ms.round(), TRANSITION_EASING);
            let _ = style.set_property("transition", &transition);
            let _ = style.set_property("transform", &petal_transform(to));
        }
    }

    fn set_expanded(&mut self, petal: usize) {
        if let Some(el) = self.petal(petal) {
            let _ = el.set_attribute("data-expanded", "true");
            let _ = el.set_attribute("aria-pressed", "true");
        }
    }

    fn highlight(&mut self, petal: Option<usize>) {
        for (i, button) in self.buttons.iter().enumerate() {
            if let Some(button) = button {
                let _ = button.class_list().toggle_with_force("active", petal == Some(i));
            }
        }
    }

    fn promote(&mut self, petal: usize, at: Vec2) {
        let Some(el) = self.petal(petal).cloned() else {
            return;
        };
        self.place(petal, at);
        let _ = self.overlay_layer.append_child(&el);
        let _ = el.class_list().add_1("in-overlay");
    }

    fn restore(&mut self, petal: usize) {
        if let Some(el) = self.petal(petal) {
            let _ = self.cluster.append_child(el);
            let _ = el.class_list().remove_1("in-overlay");
        }
    }

    fn fade_label(&mut self, out: bool) {
        let style = self.label.style();
        if out {
            let _ = style.set_property("filter", "blur(6px)");
            let _ = style.set_property("opacity", "0");
        } else {
            let _ = style.set_property("filter", "blur(0px)");
            let _ = style.set_property("opacity", "1");
        }
    }

    fn set_label(&mut self, text: &str, gradient: &str) {
        let classes = self.label.class_list();
        let _ = classes.remove_1("title-gradient");
        let _ = classes.add_1("gradient-text");
        self.label.set_text_content(Some(text));
        let _ = self.label.style().set_property("background-image", gradient);
        let _ = self
            .center
            .set_attribute("aria-label", &format!("Open {}", text));
    }

    fn set_state(&mut self, state: WidgetState) {
        let _ = self.cluster.set_attribute("data-state", state.as_str());
        let _ = self
            .cluster
            .set_attribute("aria-hidden", if state == WidgetState::Home { "false" } else { "true" });
    }

    fn set_unlocked(&mut self) {
        let _ = self.cluster.class_list().add_1("unlocked");
    }
}

impl DomPanel {
    pub fn bind(document: &Document) -> Result<Self, WidgetError> {
        let overlay = element_by_id(document, "overlay")?;
        let close_button = element_by_id(document, "overlay-close").ok();

        let mut panels = Vec::new();
        for section in Section::ALL {
            let selector = format!("[data-section=\"{}\"]", section.as_str());
            let panel = document
                .query_selector(&selector)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                .ok_or(WidgetError::MissingElement(selector))?;
            panels.push((section, panel));
        }

        Ok(Self {
            overlay,
            close_button,
            panels,
        })
    }
}

impl ContentPanel for DomPanel {
    fn show(&mut self, section: Section) {
        for (id, panel) in &self.panels {
            panel.set_hidden(*id != section);
        }
        let _ = self.overlay.class_list().add_1("open");
        let _ = self.overlay.set_attribute("aria-hidden", "false");
    }

    fn hide(&mut self) {
        let _ = self.overlay.class_list().remove_1("open");
        let _ = self.overlay.set_attribute("aria-hidden", "true");
    }

    fn focus(&mut self) {
        let _ = self.overlay.focus();
    }
}
