//! Data-driven widget tuning
//!
//! Per-petal constants live in a table rather than scattered literals, so
//! changing the petal count or speeds is a data change. The whole struct can
//! be overridden from JSON (the page may embed it in `data-tuning`).

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::WidgetError;

/// Constants for one petal, indexed 1:1 with petal order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PetalSpec {
    /// Extra distance beyond the ring radius once expanded (px)
    pub outward_offset: f32,
    /// Multiplier on the base angular and perimeter speed
    pub speed_factor: f32,
}

/// One entry of the center label cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    pub text: String,
    /// CSS background used for the gradient text
    pub gradient: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Layout ===
    pub center_radius: f32,
    pub petal_radius: f32,
    pub ring_gap: f32,
    /// Inset of the perimeter path from the viewport edges
    pub margin: f32,

    // === Motion ===
    pub base_rpm: f32,
    pub base_perimeter_speed: f32,
    pub max_frame_dt: f32,
    pub perimeter_epsilon: f32,

    // === Timing (ms) ===
    pub transition_ms: f64,
    pub snap_ms: f64,
    pub label_interval_ms: f64,
    pub label_swap_delay_ms: f64,

    pub labels: Vec<LabelSpec>,
    pub petals: Vec<PetalSpec>,
}

const DEFAULT_OFFSETS: [f32; 8] = [60.0, 85.0, 110.0, 75.0, 100.0, 90.0, 120.0, 70.0];
const DEFAULT_SPEED_FACTORS: [f32; 8] = [0.65, 0.8, 0.95, 1.15, 1.35, 0.72, 1.25, 1.0];

impl Default for Tuning {
    fn default() -> Self {
        let label = |text: &str, gradient: &str| LabelSpec {
            text: text.to_string(),
            gradient: gradient.to_string(),
        };

        Self {
            center_radius: CENTER_RADIUS,
            petal_radius: PETAL_RADIUS,
            ring_gap: RING_GAP,
            margin: VIEWPORT_MARGIN,

            base_rpm: BASE_RPM,
            base_perimeter_speed: BASE_PERIMETER_SPEED,
            max_frame_dt: MAX_FRAME_DT,
            perimeter_epsilon: PERIMETER_EPSILON,

            transition_ms: TRANSITION_MS,
            snap_ms: SNAP_MS,
            label_interval_ms: LABEL_INTERVAL_MS,
            label_swap_delay_ms: LABEL_SWAP_DELAY_MS,

            labels: vec![
                label("Work", "linear-gradient(135deg,#ff6b6b,#ffb199)"),
                label("About", "linear-gradient(135deg,#4facfe,#00f2fe)"),
                label("Contact", "linear-gradient(135deg,#43e97b,#38f9d7)"),
            ],
            petals: DEFAULT_OFFSETS
                .iter()
                .zip(DEFAULT_SPEED_FACTORS)
                .map(|(&outward_offset, speed_factor)| PetalSpec {
                    outward_offset,
                    speed_factor,
                })
                .collect(),
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, WidgetError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), WidgetError> {
        if self.petals.is_empty() {
            return Err(WidgetError::InvalidTuning("petal table is empty".into()));
        }
        if self.labels.is_empty() {
            return Err(WidgetError::InvalidTuning("label table is empty".into()));
        }
        if self.transition_ms <= 0.0 || self.snap_ms <= 0.0 || self.label_interval_ms <= 0.0 {
            return Err(WidgetError::InvalidTuning(
                "durations must be positive".into(),
            ));
        }
        if self.label_swap_delay_ms < 0.0 {
            return Err(WidgetError::InvalidTuning(
                "label swap delay must not be negative".into(),
            ));
        }
        if self.label_swap_delay_ms >= self.label_interval_ms {
            return Err(WidgetError::InvalidTuning(
                "label swap delay must be shorter than the cycle interval".into(),
            ));
        }
        if self.max_frame_dt <= 0.0 || self.perimeter_epsilon < 0.0 {
            return Err(WidgetError::InvalidTuning(
                "frame cap and epsilon must be non-negative".into(),
            ));
        }
        Ok(())
    }

    pub fn petal_count(&self) -> usize {
        self.petals.len()
    }

    /// Radius of the resting ring (petals touching the center with a gap)
    pub fn ring_radius(&self) -> f32 {
        self.center_radius + self.petal_radius + self.ring_gap
    }

    /// Base angular velocity in rad/s
    pub fn base_omega(&self) -> f32 {
        self.base_rpm * std::f32::consts::TAU / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let tuning = Tuning::default();
        assert_eq!(tuning.petal_count(), 8);
        assert_eq!(tuning.labels.len(), 3);
        assert_eq!(tuning.ring_radius(), 192.0);
        assert!(tuning.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "margin": 32.0 }"#).unwrap();
        assert_eq!(tuning.margin, 32.0);
        assert_eq!(tuning.petal_count(), 8);
        assert_eq!(tuning.transition_ms, TRANSITION_MS);
    }

    #[test]
    fn test_custom_petal_table() {
        let json = r#"{
            "petals": [
                { "outward_offset": 50.0, "speed_factor": 1.0 },
                { "outward_offset": 70.0, "speed_factor": 2.0 },
                { "outward_offset": 90.0, "speed_factor": 0.5 }
            ]
        }"#;
        let tuning = Tuning::from_json(json).unwrap();
        assert_eq!(tuning.petal_count(), 3);
        assert_eq!(tuning.petals[1].speed_factor, 2.0);
    }

    #[test]
    fn test_rejects_empty_petals() {
        let err = Tuning::from_json(r#"{ "petals": [] }"#).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidTuning(_)));
    }

    #[test]
    fn test_rejects_negative_timings() {
        for json in [
            r#"{ "snap_ms": -600.0 }"#,
            r#"{ "snap_ms": 0.0 }"#,
            r#"{ "label_swap_delay_ms": -1.0 }"#,
        ] {
            let err = Tuning::from_json(json).unwrap_err();
            assert!(matches!(err, WidgetError::InvalidTuning(_)), "{}", json);
        }
        assert!(Tuning::from_json(r#"{ "label_swap_delay_ms": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_rejects_bad_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, WidgetError::TuningJson(_)));
    }
}
