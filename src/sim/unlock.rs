//! Guided unlock gate
//!
//! Petals must be activated one at a time, clockwise from the top. Each
//! accepted activation snaps that petal out to its orbit radius. The last one
//! arms the unlock, which only takes effect once the snap animation finishes
//! (`finish`), so orbit never starts mid-transition.

use super::petal::Petal;

/// Outcome of activating a petal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// Not the target, or already unlocked; nothing changed
    Ignored,
    /// Petal expanded; `next` is the new target
    Advanced { expanded: usize, next: usize },
    /// Final petal expanded; unlock waits for its snap to finish
    Armed { expanded: usize },
}

#[derive(Debug, Clone)]
pub struct UnlockSequencer {
    count: usize,
    target_index: usize,
    /// Petal whose snap completion will unlock the orbit
    armed: Option<usize>,
    unlocked: bool,
}

impl UnlockSequencer {
    pub fn new(count: usize) -> Self {
        Self {
            count,
            target_index: 0,
            armed: None,
            unlocked: false,
        }
    }

    pub fn target_index(&self) -> usize {
        self.target_index
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    pub fn armed(&self) -> Option<usize> {
        self.armed
    }

    /// Petal that should carry the guidance highlight, if any
    pub fn highlighted(&self) -> Option<usize> {
        if self.unlocked {
            None
        } else {
            Some(self.target_index)
        }
    }

    /// Activate petal `index`; only the current target is accepted
    pub fn activate(&mut self, index: usize, petals: &mut [Petal]) -> Activation {
        if self.unlocked || self.armed.is_some() || index != self.target_index {
            return Activation::Ignored;
        }
        let Some(petal) = petals.get_mut(index) else {
            return Activation::Ignored;
        };
        petal.expanded = true;

        if petals.iter().all(|p| p.expanded) {
            self.armed = Some(index);
            Activation::Armed { expanded: index }
        } else {
            self.target_index = (self.target_index + 1) % self.count;
            Activation::Advanced {
                expanded: index,
                next: self.target_index,
            }
        }
    }

    /// Complete the unlock once `index`'s snap animation has ended
    ///
    /// Returns true exactly once: the first time the armed petal finishes.
    pub fn finish(&mut self, index: usize) -> bool {
        if self.unlocked || self.armed != Some(index) {
            return false;
        }
        self.armed = None;
        self.unlocked = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::petal::build_petals;
    use crate::tuning::Tuning;
    use glam::Vec2;

    fn petals() -> Vec<Petal> {
        build_petals(&Tuning::default(), Vec2::ZERO)
    }

    #[test]
    fn test_in_order_unlocks_exactly_once() {
        let mut petals = petals();
        let mut seq = UnlockSequencer::new(petals.len());

        for i in 0..7 {
            assert_eq!(
                seq.activate(i, &mut petals),
                Activation::Advanced {
                    expanded: i,
                    next: i + 1
                }
            );
            assert!(!seq.is_unlocked());
        }
        assert_eq!(seq.activate(7, &mut petals), Activation::Armed { expanded: 7 });
        // Logical acceptance alone does not unlock
        assert!(!seq.is_unlocked());
        assert_eq!(seq.highlighted(), Some(7));

        assert!(seq.finish(7));
        assert!(seq.is_unlocked());
        assert!(!seq.finish(7));
        assert_eq!(seq.highlighted(), None);
    }

    #[test]
    fn test_out_of_order_is_ignored() {
        let mut petals = petals();
        let mut seq = UnlockSequencer::new(petals.len());

        assert_eq!(seq.activate(3, &mut petals), Activation::Ignored);
        assert_eq!(seq.target_index(), 0);
        assert!(petals.iter().all(|p| !p.expanded));

        seq.activate(0, &mut petals);
        assert_eq!(seq.activate(0, &mut petals), Activation::Ignored);
        assert_eq!(seq.activate(5, &mut petals), Activation::Ignored);
        assert_eq!(seq.target_index(), 1);
        assert_eq!(petals.iter().filter(|p| p.expanded).count(), 1);
    }

    #[test]
    fn test_finish_ignores_other_petals() {
        let mut petals = petals();
        let mut seq = UnlockSequencer::new(petals.len());
        for i in 0..8 {
            seq.activate(i, &mut petals);
        }
        assert!(!seq.finish(3));
        assert!(!seq.is_unlocked());
        assert!(seq.finish(7));
    }

    #[test]
    fn test_clicks_after_unlock_are_ignored() {
        let mut petals = petals();
        let mut seq = UnlockSequencer::new(petals.len());
        for i in 0..8 {
            seq.activate(i, &mut petals);
        }
        seq.finish(7);
        for i in 0..8 {
            assert_eq!(seq.activate(i, &mut petals), Activation::Ignored);
        }
        assert!(seq.is_unlocked());
    }

    #[test]
    fn test_out_of_range_index() {
        let mut petals = petals();
        let mut seq = UnlockSequencer::new(petals.len());
        assert_eq!(seq.activate(42, &mut petals), Activation::Ignored);
        assert_eq!(seq.target_index(), 0);
    }
}
