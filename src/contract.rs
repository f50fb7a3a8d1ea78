//! Translation contracts between the project and a translator.
//!
//! A contract is drafted for one work and the translator assigned to it,
//! submitted for signature, signed, carried out and closed. The total is
//! paid in up to two advances and a final settlement, all held in minor
//! units like [`Payment`](crate::payment::Payment) amounts.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::FailureKind;
use crate::lifecycle::WorkItem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    #[default]
    Draft,
    Pending,
    Signed,
    Active,
    Completed,
    Cancelled,
}

impl ContractStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::Draft => "Draft",
            ContractStatus::Pending => "Awaiting signature",
            ContractStatus::Signed => "Signed",
            ContractStatus::Active => "In effect",
            ContractStatus::Completed => "Completed",
            ContractStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, ContractStatus::Completed | ContractStatus::Cancelled)
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractStatus::Draft => write!(f, "draft"),
            ContractStatus::Pending => write!(f, "pending"),
            ContractStatus::Signed => write!(f, "signed"),
            ContractStatus::Active => write!(f, "active"),
            ContractStatus::Completed => write!(f, "completed"),
            ContractStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractAction {
    Submit,
    Sign,
    Activate,
    Complete,
    Cancel,
}

impl fmt::Display for ContractAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractAction::Submit => write!(f, "submit"),
            ContractAction::Sign => write!(f, "sign"),
            ContractAction::Activate => write!(f, "activate"),
            ContractAction::Complete => write!(f, "complete"),
            ContractAction::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("cannot {requested} a contract that is {current}")]
    InvalidAction {
        current: ContractStatus,
        requested: ContractAction,
    },

    #[error("work {0} has no translator to contract")]
    NoTranslator(String),

    #[error("invalid contract terms: {0}")]
    InvalidTerms(String),
}

impl ContractError {
    pub fn status_code(&self) -> u16 {
        400
    }

    pub fn kind(&self) -> FailureKind {
        FailureKind::Business
    }
}

/// Dates and amounts agreed in a contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_minor: u64,
    #[serde(default)]
    pub advance_1_minor: u64,
    #[serde(default)]
    pub advance_2_minor: u64,
    #[serde(default)]
    pub final_minor: u64,
}

impl ContractTerms {
    /// Sum of the scheduled installments.
    pub fn scheduled_minor(&self) -> u64 {
        self.advance_1_minor
            .saturating_add(self.advance_2_minor)
            .saturating_add(self.final_minor)
    }

    fn validate(&self) -> Result<(), ContractError> {
        if self.end_date < self.start_date {
            return Err(ContractError::InvalidTerms(format!(
                "end date {} is before start date {}",
                self.end_date, self.start_date
            )));
        }
        if self.scheduled_minor() > self.total_minor {
            return Err(ContractError::InvalidTerms(format!(
                "installments {} exceed total {}",
                self.scheduled_minor(),
                self.total_minor
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub id: String,
    pub contract_number: String,
    pub work_id: String,
    pub translator_id: String,
    pub terms: ContractTerms,
    pub status: ContractStatus,
    pub signed_at: Option<DateTime<Utc>>,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Draft a contract for `work` with its assigned translator.
    pub fn for_work(
        work: &WorkItem,
        contract_number: impl Into<String>,
        terms: ContractTerms,
        created_by: Option<String>,
    ) -> Result<Self, ContractError> {
        let translator_id = match work.translator.as_deref() {
            Some(id) if work.has_translator() => id.to_string(),
            _ => return Err(ContractError::NoTranslator(work.id.clone())),
        };
        let contract_number = contract_number.into();
        if contract_number.trim().is_empty() {
            return Err(ContractError::InvalidTerms(
                "contract number must not be empty".into(),
            ));
        }
        terms.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            contract_number,
            work_id: work.id.clone(),
            translator_id,
            terms,
            status: ContractStatus::Draft,
            signed_at: None,
            created_by,
            created_at: now,
            updated_at: now,
        })
    }

    /// Total not yet covered by a scheduled installment.
    pub fn unscheduled_minor(&self) -> u64 {
        self.terms
            .total_minor
            .saturating_sub(self.terms.scheduled_minor())
    }

    pub fn submit(&mut self) -> Result<(), ContractError> {
        self.advance(ContractStatus::Draft, ContractStatus::Pending, ContractAction::Submit)
    }

    pub fn sign(&mut self, at: DateTime<Utc>) -> Result<(), ContractError> {
        self.advance(ContractStatus::Pending, ContractStatus::Signed, ContractAction::Sign)?;
        self.signed_at = Some(at);
        Ok(())
    }

    pub fn activate(&mut self) -> Result<(), ContractError> {
        self.advance(ContractStatus::Signed, ContractStatus::Active, ContractAction::Activate)
    }

    pub fn complete(&mut self) -> Result<(), ContractError> {
        self.advance(ContractStatus::Active, ContractStatus::Completed, ContractAction::Complete)
    }

    /// Any open contract can be cancelled.
    pub fn cancel(&mut self) -> Result<(), ContractError> {
        if self.status.is_closed() {
            return Err(ContractError::InvalidAction {
                current: self.status,
                requested: ContractAction::Cancel,
            });
        }
        self.status = ContractStatus::Cancelled;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn advance(
        &mut self,
        from: ContractStatus,
        to: ContractStatus,
        requested: ContractAction,
    ) -> Result<(), ContractError> {
        if self.status != from {
            return Err(ContractError::InvalidAction {
                current: self.status,
                requested,
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}
