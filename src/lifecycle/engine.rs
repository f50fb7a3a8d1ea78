use thiserror::Error;
use tracing::{debug, info};

use super::guard::{GuardFailure, TransitionGuard};
use super::state::{TransitionName, WorkState};
use super::work::WorkItem;
use crate::error::FailureKind;

/// A rejected transition. Carries the guard's reason and the work it was
/// rejected for; the work itself is never partially changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("work {work_id}: {reason}")]
pub struct TransitionError {
    pub work_id: String,
    pub reason: GuardFailure,
}

impl TransitionError {
    pub fn current(&self) -> WorkState {
        self.reason.current()
    }

    pub fn requested(&self) -> TransitionName {
        self.reason.requested()
    }

    pub fn status_code(&self) -> u16 {
        self.reason.status_code()
    }

    /// Rejections are business-rule outcomes, never infrastructure faults.
    pub fn kind(&self) -> FailureKind {
        FailureKind::Business
    }
}

/// Moves a [`WorkItem`] along the lifecycle.
///
/// The engine performs no I/O. It works on a copy of the work and hands the
/// updated copy back, so the caller persists state and progress in a single
/// save.
pub struct LifecycleEngine;

impl LifecycleEngine {
    /// Run `transition` against `work`.
    ///
    /// - The [`TransitionGuard`] decides first; a refusal becomes a
    ///   [`TransitionError`] and `work` is left untouched.
    /// - On success the returned copy has the target state, the registry's
    ///   progress for it, and the old state appended to its history.
    pub fn apply_transition(
        work: &WorkItem,
        transition: TransitionName,
    ) -> Result<WorkItem, TransitionError> {
        let target = match TransitionGuard::check(work, transition) {
            Ok(target) => target,
            Err(reason) => {
                debug!(
                    work_id = %work.id,
                    from = %work.state(),
                    %transition,
                    %reason,
                    "transition rejected"
                );
                return Err(TransitionError {
                    work_id: work.id.clone(),
                    reason,
                });
            }
        };

        let mut updated = work.clone();
        updated.enter_state(target);
        info!(
            work_id = %updated.id,
            from = %work.state(),
            to = %target,
            %transition,
            progress = updated.progress_percent(),
            "transition applied"
        );
        Ok(updated)
    }

    pub fn approve(work: &WorkItem) -> Result<WorkItem, TransitionError> {
        Self::apply_transition(work, TransitionName::Approve)
    }

    /// Assign a translator and advance to `translator_assigned`.
    ///
    /// When `translator_id` is given it becomes the work's translator as
    /// part of the same transition. Without one, the work must already
    /// carry a translator. On failure neither the translator nor the state
    /// of `work` changes.
    pub fn assign_translator(
        work: &WorkItem,
        translator_id: Option<&str>,
    ) -> Result<WorkItem, TransitionError> {
        match translator_id {
            Some(id) => {
                let mut candidate = work.clone();
                candidate.translator = Some(id.to_string());
                Self::apply_transition(&candidate, TransitionName::AssignTranslator)
            }
            None => Self::apply_transition(work, TransitionName::AssignTranslator),
        }
    }

    pub fn start_trial(work: &WorkItem) -> Result<WorkItem, TransitionError> {
        Self::apply_transition(work, TransitionName::StartTrial)
    }
}
