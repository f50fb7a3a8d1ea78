use thiserror::Error;

use super::state::{StateRegistry, TransitionName, WorkState};
use super::work::WorkItem;

/// Why a guard refused a transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuardFailure {
    /// No edge leaves the current state under the requested name.
    #[error("cannot {requested} a work in state {current}")]
    InvalidTransition {
        current: WorkState,
        requested: TransitionName,
    },

    /// `assign_translator` was requested before a translator was chosen.
    #[error("select a translator before {requested} (work is {current})")]
    MissingTranslator {
        current: WorkState,
        requested: TransitionName,
    },
}

impl GuardFailure {
    pub fn current(&self) -> WorkState {
        match self {
            GuardFailure::InvalidTransition { current, .. }
            | GuardFailure::MissingTranslator { current, .. } => *current,
        }
    }

    pub fn requested(&self) -> TransitionName {
        match self {
            GuardFailure::InvalidTransition { requested, .. }
            | GuardFailure::MissingTranslator { requested, .. } => *requested,
        }
    }

    /// Name of the unmet precondition, if the edge itself was valid.
    pub fn precondition(&self) -> Option<&'static str> {
        match self {
            GuardFailure::InvalidTransition { .. } => None,
            GuardFailure::MissingTranslator { .. } => Some("translator"),
        }
    }

    /// HTTP-equivalent status: conflict for a bad edge, bad request for an
    /// unmet precondition.
    pub fn status_code(&self) -> u16 {
        match self {
            GuardFailure::InvalidTransition { .. } => 409,
            GuardFailure::MissingTranslator { .. } => 400,
        }
    }
}

/// Decides whether a transition may run against a work. Never mutates, so
/// it is safe to call speculatively (e.g. to decide which actions to offer).
pub struct TransitionGuard;

impl TransitionGuard {
    /// Returns the target state when `transition` is allowed from the
    /// work's current state.
    ///
    /// The edge check runs first; transition-specific preconditions only
    /// apply once the edge is known to exist.
    pub fn check(work: &WorkItem, transition: TransitionName) -> Result<WorkState, GuardFailure> {
        let current = work.state();
        let edge = StateRegistry::edge_for(current, transition).ok_or(
            GuardFailure::InvalidTransition {
                current,
                requested: transition,
            },
        )?;

        match transition {
            TransitionName::AssignTranslator if !work.has_translator() => {
                Err(GuardFailure::MissingTranslator {
                    current,
                    requested: transition,
                })
            }
            TransitionName::Approve
            | TransitionName::AssignTranslator
            | TransitionName::StartTrial => Ok(edge.to),
        }
    }

    /// Transitions that would pass [`check`](Self::check) right now.
    pub fn available_transitions(work: &WorkItem) -> Vec<TransitionName> {
        TransitionName::ALL
            .into_iter()
            .filter(|t| Self::check(work, *t).is_ok())
            .collect()
    }

    /// Short description of what a transition requires.
    pub fn description(transition: TransitionName) -> &'static str {
        match transition {
            TransitionName::Approve => "Work must be a draft",
            TransitionName::AssignTranslator => {
                "Work must be approved and have a translator selected"
            }
            TransitionName::StartTrial => "Work must have a translator assigned",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn work_in(state: WorkState, translator: Option<&str>) -> WorkItem {
        let mut work = WorkItem::new("Thiền uyển tập anh");
        work.translator = translator.map(str::to_string);
        if state != WorkState::Draft {
            work.enter_state(state);
        }
        work
    }

    #[test]
    fn approve_allowed_from_draft() {
        let work = WorkItem::new("Draft");
        assert_eq!(
            TransitionGuard::check(&work, TransitionName::Approve),
            Ok(WorkState::Approved)
        );
    }

    #[test]
    fn wrong_source_state_is_invalid_transition() {
        let work = work_in(WorkState::TrialTranslation, Some("T1"));
        let err = TransitionGuard::check(&work, TransitionName::Approve).unwrap_err();
        assert_eq!(
            err,
            GuardFailure::InvalidTransition {
                current: WorkState::TrialTranslation,
                requested: TransitionName::Approve,
            }
        );
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.precondition(), None);
    }

    #[test]
    fn assign_requires_translator() {
        let work = work_in(WorkState::Approved, None);
        let err = TransitionGuard::check(&work, TransitionName::AssignTranslator).unwrap_err();
        assert!(matches!(err, GuardFailure::MissingTranslator { .. }));
        assert_eq!(err.precondition(), Some("translator"));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn edge_check_runs_before_precondition() {
        // Draft with no translator: the edge is missing, so the precondition is never consulted.
        let work = WorkItem::new("Draft");
        let err = TransitionGuard::check(&work, TransitionName::AssignTranslator).unwrap_err();
        assert!(matches!(err, GuardFailure::InvalidTransition { .. }));
    }

    #[test]
    fn available_transitions_follow_state() {
        let draft = WorkItem::new("Draft");
        assert_eq!(
            TransitionGuard::available_transitions(&draft),
            vec![TransitionName::Approve]
        );

        let approved = work_in(WorkState::Approved, None);
        assert!(TransitionGuard::available_transitions(&approved).is_empty());

        let approved = work_in(WorkState::Approved, Some("T1"));
        assert_eq!(
            TransitionGuard::available_transitions(&approved),
            vec![TransitionName::AssignTranslator]
        );

        let trial = work_in(WorkState::TrialTranslation, Some("T1"));
        assert!(TransitionGuard::available_transitions(&trial).is_empty());
    }

    #[test]
    fn check_does_not_mutate() {
        let work = work_in(WorkState::Approved, None);
        let before = work.clone();
        let _ = TransitionGuard::check(&work, TransitionName::AssignTranslator);
        let _ = TransitionGuard::check(&work, TransitionName::StartTrial);
        assert_eq!(work, before);
    }

    #[test]
    fn failure_display_names_state_and_transition() {
        let err = GuardFailure::InvalidTransition {
            current: WorkState::TrialTranslation,
            requested: TransitionName::Approve,
        };
        assert_eq!(err.to_string(), "cannot approve a work in state trial_translation");
    }
}
