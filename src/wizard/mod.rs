//! Step gating for the dataset-registration wizards
//!
//! A wizard is a fixed ordered list of steps; each step is shown only while
//! its predicate over the draft holds. The add request can only be built
//! when the final step is visible.

pub mod bids;
pub mod medical_folder;

pub use bids::BidsStep;
pub use medical_folder::MedicalFolderStep;

use std::fmt::Debug;

/// Step metadata shared by both wizards
pub trait WizardStep: Copy + Eq + Debug + 'static {
    /// All steps, in display order
    const ALL: &'static [Self];

    /// 1-based position shown next to the step
    fn number(&self) -> usize;
    fn description(&self) -> &'static str;
}

/// Visibility predicates over a draft
pub trait WizardFlow {
    type Step: WizardStep;

    fn is_visible(&self, step: Self::Step) -> bool;

    fn visible_steps(&self) -> Vec<Self::Step> {
        Self::Step::ALL
            .iter()
            .copied()
            .filter(|step| self.is_visible(*step))
            .collect()
    }

    /// Last visible step, where the operator is expected to act
    fn current_step(&self) -> Self::Step {
        self.visible_steps()
            .last()
            .copied()
            .unwrap_or(Self::Step::ALL[0])
    }

    /// The add request may only be issued from the final step
    fn can_submit(&self) -> bool {
        Self::Step::ALL
            .last()
            .is_some_and(|last| self.is_visible(*last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{BidsState, MedicalFolderState};

    /// First step always shown, visible steps keep display order
    fn assert_ordered<W: WizardFlow>(draft: &W) {
        let visible = draft.visible_steps();
        assert_eq!(visible.first(), W::Step::ALL.first());
        let numbers: Vec<usize> = visible.iter().map(|s| s.number()).collect();
        assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_empty_drafts_only_show_first_step() {
        let bids = BidsState::default();
        assert_eq!(bids.visible_steps(), vec![BidsStep::Root]);
        assert!(!bids.can_submit());
        assert_ordered(&bids);

        let mf = MedicalFolderState::default();
        assert_eq!(mf.visible_steps(), vec![MedicalFolderStep::Root]);
        assert_eq!(mf.current_step(), MedicalFolderStep::Root);
        assert_ordered(&mf);
    }
}
