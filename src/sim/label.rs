//! Center label rotation
//!
//! Every interval the label fades out (blurred), then after a short swap delay
//! the text changes and fades back in. Timing runs on the injected clock, so
//! tests drive it with plain numbers.

use crate::tuning::LabelSpec;

/// Visual instruction for the center label
#[derive(Debug, Clone, PartialEq)]
pub enum LabelEffect {
    FadeOut,
    Swap { text: String, gradient: String },
    FadeIn,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Stopped,
    Running {
        next_cycle_at: f64,
        /// Pending text swap while faded out
        swap_at: Option<f64>,
    },
}

#[derive(Debug, Clone)]
pub struct LabelCycler {
    labels: Vec<LabelSpec>,
    interval_ms: f64,
    swap_delay_ms: f64,
    next_index: usize,
    current: Option<usize>,
    phase: Phase,
}

impl LabelCycler {
    pub fn new(labels: Vec<LabelSpec>, interval_ms: f64, swap_delay_ms: f64) -> Self {
        Self {
            labels,
            interval_ms,
            swap_delay_ms,
            next_index: 0,
            current: None,
            phase: Phase::Stopped,
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase != Phase::Stopped
    }

    /// Text currently shown, if the cycle has swapped in a label yet
    pub fn current_text(&self) -> Option<&str> {
        self.current.map(|i| self.labels[i].text.as_str())
    }

    /// Start cycling; the first fade begins immediately. No-op if running.
    pub fn start(&mut self, now_ms: f64) -> Vec<LabelEffect> {
        if self.is_running() || self.labels.is_empty() {
            return Vec::new();
        }
        self.phase = Phase::Running {
            next_cycle_at: now_ms + self.interval_ms,
            swap_at: Some(now_ms + self.swap_delay_ms),
        };
        vec![LabelEffect::FadeOut]
    }

    /// Stop cycling. A label caught mid-fade is faded back in. No-op if stopped.
    pub fn stop(&mut self) -> Vec<LabelEffect> {
        let Phase::Running { swap_at, .. } = self.phase else {
            return Vec::new();
        };
        self.phase = Phase::Stopped;
        if swap_at.is_some() {
            vec![LabelEffect::FadeIn]
        } else {
            Vec::new()
        }
    }

    /// Time of the next fade or swap
    pub fn next_deadline(&self) -> Option<f64> {
        match self.phase {
            Phase::Stopped => None,
            Phase::Running {
                next_cycle_at,
                swap_at,
            } => Some(swap_at.map_or(next_cycle_at, |s| s.min(next_cycle_at))),
        }
    }

    /// Fire everything due at `now_ms`, in time order
    pub fn advance(&mut self, now_ms: f64) -> Vec<LabelEffect> {
        let mut effects = Vec::new();
        while let Phase::Running {
            next_cycle_at,
            swap_at,
        } = self.phase
        {
            match swap_at {
                Some(at) if at <= now_ms && at <= next_cycle_at => {
                    let index = self.next_index % self.labels.len();
                    let label = &self.labels[index];
                    effects.push(LabelEffect::Swap {
                        text: label.text.clone(),
                        gradient: label.gradient.clone(),
                    });
                    effects.push(LabelEffect::FadeIn);
                    self.current = Some(index);
                    self.next_index = index + 1;
                    self.phase = Phase::Running {
                        next_cycle_at,
                        swap_at: None,
                    };
                }
                _ if next_cycle_at <= now_ms => {
                    // A stalled timer (throttled background tab) runs one
                    // cycle from now instead of replaying every missed one
                    let cycle_at = if now_ms - next_cycle_at >= self.interval_ms {
                        now_ms
                    } else {
                        next_cycle_at
                    };
                    effects.push(LabelEffect::FadeOut);
                    self.phase = Phase::Running {
                        next_cycle_at: cycle_at + self.interval_ms,
                        swap_at: Some(cycle_at + self.swap_delay_ms),
                    };
                }
                _ => break,
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn cycler() -> LabelCycler {
        LabelCycler::new(Tuning::default().labels, 5000.0, 420.0)
    }

    fn swapped_text(effects: &[LabelEffect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                LabelEffect::Swap { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_start_fades_then_swaps() {
        let mut labels = cycler();
        assert_eq!(labels.start(0.0), vec![LabelEffect::FadeOut]);
        assert_eq!(labels.next_deadline(), Some(420.0));

        assert!(labels.advance(419.0).is_empty());
        let effects = labels.advance(420.0);
        assert_eq!(swapped_text(&effects), vec!["Work"]);
        assert_eq!(effects.last(), Some(&LabelEffect::FadeIn));
        assert_eq!(labels.current_text(), Some("Work"));
        assert_eq!(labels.next_deadline(), Some(5000.0));
    }

    #[test]
    fn test_cycles_in_order_and_wraps() {
        let mut labels = cycler();
        labels.start(0.0);
        let mut effects = Vec::new();
        while let Some(at) = labels.next_deadline() {
            if at > 20_500.0 {
                break;
            }
            effects.extend(labels.advance(at));
        }
        assert_eq!(
            swapped_text(&effects),
            vec!["Work", "About", "Contact", "Work", "About"]
        );
    }

    #[test]
    fn test_slightly_late_timer_keeps_cadence() {
        let mut labels = cycler();
        labels.start(0.0);
        labels.advance(420.0);
        // Cycle and swap both overdue, but less than an interval late
        let effects = labels.advance(5600.0);
        assert_eq!(swapped_text(&effects), vec!["About"]);
        assert_eq!(labels.next_deadline(), Some(10_000.0));
    }

    #[test]
    fn test_stalled_timer_runs_a_single_cycle() {
        let mut labels = cycler();
        labels.start(0.0);
        let effects = labels.advance(86_400_000.0);
        assert_eq!(
            effects,
            vec![
                LabelEffect::Swap {
                    text: "Work".into(),
                    gradient: labels.labels[0].gradient.clone(),
                },
                LabelEffect::FadeIn,
                LabelEffect::FadeOut,
            ]
        );
        assert_eq!(labels.next_deadline(), Some(86_400_420.0));

        let effects = labels.advance(86_400_420.0);
        assert_eq!(swapped_text(&effects), vec!["About"]);
        assert_eq!(labels.next_deadline(), Some(86_405_000.0));
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let mut labels = cycler();
        labels.start(0.0);
        assert!(labels.start(100.0).is_empty());
        assert_eq!(labels.next_deadline(), Some(420.0));

        // Stopped mid-fade: the label is restored
        assert_eq!(labels.stop(), vec![LabelEffect::FadeIn]);
        assert!(labels.stop().is_empty());
        assert!(!labels.is_running());
        assert_eq!(labels.next_deadline(), None);
        assert!(labels.advance(10_000.0).is_empty());
    }

    #[test]
    fn test_resume_continues_sequence() {
        let mut labels = cycler();
        labels.start(0.0);
        labels.advance(500.0);
        assert!(labels.stop().is_empty());

        labels.start(8000.0);
        let effects = labels.advance(8420.0);
        assert_eq!(swapped_text(&effects), vec!["About"]);
    }
}
