use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The lifecycle stages of a translation work.
///
/// A work flows: DRAFT → APPROVED → TRANSLATOR_ASSIGNED → TRIAL_TRANSLATION →
/// ... → COMPLETED. `Cancelled` can sit beside any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkState {
    Draft,
    Approved,
    TranslatorAssigned,
    TrialTranslation,
    TrialReviewed,
    ContractSigned,
    InProgress,
    ProgressChecked,
    FinalTranslation,
    ExpertReviewed,
    ProjectAccepted,
    Completed,
    Cancelled,
}

impl WorkState {
    /// Every state, in pipeline order.
    pub const ALL: [WorkState; 13] = [
        WorkState::Draft,
        WorkState::Approved,
        WorkState::TranslatorAssigned,
        WorkState::TrialTranslation,
        WorkState::TrialReviewed,
        WorkState::ContractSigned,
        WorkState::InProgress,
        WorkState::ProgressChecked,
        WorkState::FinalTranslation,
        WorkState::ExpertReviewed,
        WorkState::ProjectAccepted,
        WorkState::Completed,
        WorkState::Cancelled,
    ];

    /// The snake_case code used in storage and on the command line.
    pub fn code(&self) -> &'static str {
        match self {
            WorkState::Draft => "draft",
            WorkState::Approved => "approved",
            WorkState::TranslatorAssigned => "translator_assigned",
            WorkState::TrialTranslation => "trial_translation",
            WorkState::TrialReviewed => "trial_reviewed",
            WorkState::ContractSigned => "contract_signed",
            WorkState::InProgress => "in_progress",
            WorkState::ProgressChecked => "progress_checked",
            WorkState::FinalTranslation => "final_translation",
            WorkState::ExpertReviewed => "expert_reviewed",
            WorkState::ProjectAccepted => "project_accepted",
            WorkState::Completed => "completed",
            WorkState::Cancelled => "cancelled",
        }
    }

    /// Human-readable label for listings.
    pub fn label(&self) -> &'static str {
        match self {
            WorkState::Draft => "Planned",
            WorkState::Approved => "Approved",
            WorkState::TranslatorAssigned => "Translator assigned",
            WorkState::TrialTranslation => "Trial translation",
            WorkState::TrialReviewed => "Trial reviewed",
            WorkState::ContractSigned => "Contract signed",
            WorkState::InProgress => "Translating",
            WorkState::ProgressChecked => "Progress checked",
            WorkState::FinalTranslation => "Final translation",
            WorkState::ExpertReviewed => "Expert reviewed",
            WorkState::ProjectAccepted => "Project accepted",
            WorkState::Completed => "Completed",
            WorkState::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for WorkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for WorkState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkState::ALL
            .into_iter()
            .find(|state| state.code() == s)
            .ok_or_else(|| format!("Invalid work state: {s}"))
    }
}

/// Named, guarded operations that move a work along the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionName {
    Approve,
    AssignTranslator,
    StartTrial,
}

impl TransitionName {
    pub const ALL: [TransitionName; 3] = [
        TransitionName::Approve,
        TransitionName::AssignTranslator,
        TransitionName::StartTrial,
    ];
}

impl fmt::Display for TransitionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitionName::Approve => write!(f, "approve"),
            TransitionName::AssignTranslator => write!(f, "assign_translator"),
            TransitionName::StartTrial => write!(f, "start_trial"),
        }
    }
}

/// A directed edge of the lifecycle graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub from: WorkState,
    pub to: WorkState,
    pub name: TransitionName,
}

const EDGES: [Edge; 3] = [
    Edge {
        from: WorkState::Draft,
        to: WorkState::Approved,
        name: TransitionName::Approve,
    },
    Edge {
        from: WorkState::Approved,
        to: WorkState::TranslatorAssigned,
        name: TransitionName::AssignTranslator,
    },
    Edge {
        from: WorkState::TranslatorAssigned,
        to: WorkState::TrialTranslation,
        name: TransitionName::StartTrial,
    },
];

const PROGRESS: [(WorkState, u8); 13] = [
    (WorkState::Draft, 0),
    (WorkState::Approved, 10),
    (WorkState::TranslatorAssigned, 15),
    (WorkState::TrialTranslation, 20),
    (WorkState::TrialReviewed, 30),
    (WorkState::ContractSigned, 40),
    (WorkState::InProgress, 50),
    (WorkState::ProgressChecked, 60),
    (WorkState::FinalTranslation, 70),
    (WorkState::ExpertReviewed, 85),
    (WorkState::ProjectAccepted, 95),
    (WorkState::Completed, 100),
    (WorkState::Cancelled, 0),
];

/// Read-only tables for the lifecycle: the transition graph and the
/// state → progress mapping.
pub struct StateRegistry;

impl StateRegistry {
    /// Progress percentage shown for a state. Unknown states read as 0.
    pub fn progress_for(state: WorkState) -> u8 {
        PROGRESS
            .iter()
            .find(|(s, _)| *s == state)
            .map(|(_, pct)| *pct)
            .unwrap_or(0)
    }

    pub fn edge_exists(from: WorkState, to: WorkState) -> bool {
        EDGES.iter().any(|e| e.from == from && e.to == to)
    }

    /// The edge leaving `from` under `name`, if one is wired.
    pub fn edge_for(from: WorkState, name: TransitionName) -> Option<&'static Edge> {
        EDGES.iter().find(|e| e.from == from && e.name == name)
    }

    pub fn edges() -> &'static [Edge] {
        &EDGES
    }
}
