//! Initialization errors
//!
//! Runtime input never fails; bad clicks and unknown sections are ignored.
//! Everything here is raised while building the widget, so a broken page
//! fails fast instead of half-working.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("no browser window available")]
    NoWindow,

    #[error("no document attached to window")]
    NoDocument,

    #[error("required element missing: {0}")]
    MissingElement(String),

    #[error("page has {found} petals but tuning defines {expected}")]
    PetalCountMismatch { expected: usize, found: usize },

    #[error("invalid tuning JSON: {0}")]
    TuningJson(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),
}
