//! Mastery status computation from cross-mode practice history.
//!
//! Every practice mode funnels its judgments through [`compute`], so the
//! cross-mode rules live in exactly one place:
//!
//! - a correct answer adds the mode to the passed set;
//! - a wrong answer removes the mode, and a wrong quiz or recall answer also
//!   revokes flashcard credit;
//! - the status is derived from the size of the resulting set.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::{MasteryStatus, PracticeMode};

/// Passed modes and status after one judgment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasteryOutcome {
    pub passed_modes: BTreeSet<PracticeMode>,
    pub status: MasteryStatus,
}

/// Apply one judgment in `mode` to the passed-mode set.
pub fn compute(
    passed_before: &BTreeSet<PracticeMode>,
    mode: PracticeMode,
    correct: bool,
) -> MasteryOutcome {
    let mut passed_modes = passed_before.clone();

    if correct {
        passed_modes.insert(mode);
    } else {
        passed_modes.remove(&mode);
        passed_modes.remove(&PracticeMode::Flashcard);
    }

    let status = status_for(&passed_modes);
    MasteryOutcome {
        passed_modes,
        status,
    }
}

/// Derive the status from a passed-mode set.
pub fn status_for(passed_modes: &BTreeSet<PracticeMode>) -> MasteryStatus {
    match passed_modes.len() {
        0 => MasteryStatus::New,
        1 | 2 => MasteryStatus::Learning,
        _ => MasteryStatus::Learned,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(modes: &[PracticeMode]) -> BTreeSet<PracticeMode> {
        modes.iter().copied().collect()
    }

    #[test]
    fn test_status_for_every_subset() {
        for mask in 0u8..8 {
            let modes: BTreeSet<PracticeMode> = PracticeMode::ALL
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, m)| *m)
                .collect();
            let expected = match modes.len() {
                0 => MasteryStatus::New,
                1 | 2 => MasteryStatus::Learning,
                _ => MasteryStatus::Learned,
            };
            assert_eq!(status_for(&modes), expected, "subset {:?}", modes);
        }
    }

    #[test]
    fn test_correct_adds_mode() {
        let outcome = compute(&set(&[]), PracticeMode::Quiz, true);
        assert_eq!(outcome.passed_modes, set(&[PracticeMode::Quiz]));
        assert_eq!(outcome.status, MasteryStatus::Learning);
    }

    #[test]
    fn test_correct_is_idempotent() {
        let before = set(&[PracticeMode::Quiz]);
        let outcome = compute(&before, PracticeMode::Quiz, true);
        assert_eq!(outcome.passed_modes, before);
    }

    #[test]
    fn test_all_three_is_learned() {
        let before = set(&[PracticeMode::Flashcard, PracticeMode::Quiz]);
        let outcome = compute(&before, PracticeMode::Recall, true);
        assert_eq!(outcome.status, MasteryStatus::Learned);
    }

    #[test]
    fn test_wrong_quiz_revokes_flashcard() {
        let outcome = compute(&set(&[PracticeMode::Flashcard]), PracticeMode::Quiz, false);
        assert!(outcome.passed_modes.is_empty());
        assert_eq!(outcome.status, MasteryStatus::New);
    }

    #[test]
    fn test_wrong_recall_revokes_recall_and_flashcard() {
        let before = set(&PracticeMode::ALL);
        let outcome = compute(&before, PracticeMode::Recall, false);
        assert_eq!(outcome.passed_modes, set(&[PracticeMode::Quiz]));
        assert_eq!(outcome.status, MasteryStatus::Learning);
    }

    #[test]
    fn test_wrong_flashcard_revokes_only_flashcard() {
        let before = set(&[PracticeMode::Flashcard, PracticeMode::Quiz]);
        let outcome = compute(&before, PracticeMode::Flashcard, false);
        assert_eq!(outcome.passed_modes, set(&[PracticeMode::Quiz]));
        assert_eq!(outcome.status, MasteryStatus::Learning);
    }
}
