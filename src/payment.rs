//! Payment requests and their approval status.
//!
//! Lighter than the work lifecycle: a payment is requested as `pending`,
//! then approved or rejected, and an approved payment is eventually paid.
//! Either open status can be cancelled.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::FailureKind;

/// Budget line a payment belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkGroup {
    #[serde(alias = "dich_thuat")]
    Translation,
    #[serde(alias = "bien_tap")]
    Editing,
    #[serde(alias = "cntt")]
    It,
    #[serde(alias = "hanh_chinh")]
    Administration,
    #[serde(alias = "khac")]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Paid,
    Cancelled,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Rejected => write!(f, "rejected"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentAction {
    Approve,
    Reject,
    MarkPaid,
    Cancel,
}

impl fmt::Display for PaymentAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentAction::Approve => write!(f, "approve"),
            PaymentAction::Reject => write!(f, "reject"),
            PaymentAction::MarkPaid => write!(f, "mark_paid"),
            PaymentAction::Cancel => write!(f, "cancel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentError {
    #[error("cannot {requested} a payment that is {current}")]
    InvalidAction {
        current: PaymentStatus,
        requested: PaymentAction,
    },
}

impl PaymentError {
    pub fn status_code(&self) -> u16 {
        400
    }

    pub fn kind(&self) -> FailureKind {
        FailureKind::Business
    }
}

/// Hundredths per currency unit. Amounts are stored as integers in minor
/// units so two-decimal ledger values survive exactly.
pub const MINOR_PER_UNIT: u64 = 100;

/// Render a minor-unit amount as `1,500,000.50`.
pub fn format_minor(amount_minor: u64) -> String {
    let whole = (amount_minor / MINOR_PER_UNIT).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    format!("{grouped}.{:02}", amount_minor % MINOR_PER_UNIT)
}

/// A request to pay someone from a work group's budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub work_group: WorkGroup,
    pub category_code: String,
    pub amount_minor: u64,
    pub currency: String,
    pub recipient: Option<String>,
    pub requested_by: Option<String>,
    pub work_id: Option<String>,
    pub status: PaymentStatus,
    pub approved_by: Option<String>,
    pub approved_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rejection_reason: String,
    pub created_at: DateTime<Utc>,
}

impl Payment {
    pub fn new(
        work_group: WorkGroup,
        category_code: impl Into<String>,
        amount_minor: u64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            work_group,
            category_code: category_code.into(),
            amount_minor,
            currency: "VND".to_string(),
            recipient: None,
            requested_by: None,
            work_id: None,
            status: PaymentStatus::Pending,
            approved_by: None,
            approved_date: None,
            paid_date: None,
            rejection_reason: String::new(),
            created_at: Utc::now(),
        }
    }

    pub fn display_amount(&self) -> String {
        format!("{} {}", format_minor(self.amount_minor), self.currency)
    }

    pub fn can_be_approved(&self) -> bool {
        self.status == PaymentStatus::Pending
    }

    pub fn can_be_paid(&self) -> bool {
        self.status == PaymentStatus::Approved
    }

    pub fn approve(&mut self, approver: &str, on: NaiveDate) -> Result<(), PaymentError> {
        self.require(self.can_be_approved(), PaymentAction::Approve)?;
        self.status = PaymentStatus::Approved;
        self.approved_by = Some(approver.to_string());
        self.approved_date = Some(on);
        Ok(())
    }

    pub fn reject(&mut self, reviewer: &str, reason: &str) -> Result<(), PaymentError> {
        self.require(self.can_be_approved(), PaymentAction::Reject)?;
        self.status = PaymentStatus::Rejected;
        self.approved_by = Some(reviewer.to_string());
        self.rejection_reason = reason.to_string();
        Ok(())
    }

    pub fn mark_paid(&mut self, on: NaiveDate) -> Result<(), PaymentError> {
        self.require(self.can_be_paid(), PaymentAction::MarkPaid)?;
        self.status = PaymentStatus::Paid;
        self.paid_date = Some(on);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), PaymentError> {
        let open = matches!(
            self.status,
            PaymentStatus::Pending | PaymentStatus::Approved
        );
        self.require(open, PaymentAction::Cancel)?;
        self.status = PaymentStatus::Cancelled;
        Ok(())
    }

    fn require(&self, allowed: bool, requested: PaymentAction) -> Result<(), PaymentError> {
        if allowed {
            Ok(())
        } else {
            Err(PaymentError::InvalidAction {
                current: self.status,
                requested,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn pending() -> Payment {
        Payment::new(WorkGroup::Translation, "trial_fee", 300_000_050)
    }

    #[test]
    fn new_payment_is_pending() {
        let p = pending();
        assert_eq!(p.status, PaymentStatus::Pending);
        assert_eq!(p.currency, "VND");
        assert!(p.can_be_approved());
        assert!(!p.can_be_paid());
    }

    #[test]
    fn approve_then_pay() {
        let mut p = pending();
        p.approve("acct-1", day(3)).unwrap();
        assert_eq!(p.status, PaymentStatus::Approved);
        assert_eq!(p.approved_by.as_deref(), Some("acct-1"));
        assert_eq!(p.approved_date, Some(day(3)));

        p.mark_paid(day(10)).unwrap();
        assert_eq!(p.status, PaymentStatus::Paid);
        assert_eq!(p.paid_date, Some(day(10)));
    }

    #[test]
    fn cannot_pay_before_approval() {
        let mut p = pending();
        let err = p.mark_paid(day(1)).unwrap_err();
        assert_eq!(
            err,
            PaymentError::InvalidAction {
                current: PaymentStatus::Pending,
                requested: PaymentAction::MarkPaid,
            }
        );
        assert_eq!(p.status, PaymentStatus::Pending);
        assert!(p.paid_date.is_none());
    }

    #[test]
    fn rejected_payment_is_closed() {
        let mut p = pending();
        p.reject("dir-1", "missing invoice").unwrap();
        assert_eq!(p.status, PaymentStatus::Rejected);
        assert_eq!(p.rejection_reason, "missing invoice");
        assert!(p.approve("dir-1", day(2)).is_err());
        assert!(p.cancel().is_err());
    }

    #[test]
    fn cancel_only_open_payments() {
        let mut p = pending();
        p.approve("acct-1", day(3)).unwrap();
        p.cancel().unwrap();
        assert_eq!(p.status, PaymentStatus::Cancelled);

        let mut paid = pending();
        paid.approve("acct-1", day(3)).unwrap();
        paid.mark_paid(day(4)).unwrap();
        let err = paid.cancel().unwrap_err();
        assert_eq!(err.to_string(), "cannot cancel a payment that is paid");
    }

    #[test]
    fn amount_keeps_cents() {
        let p = pending();
        assert_eq!(p.amount_minor, 300_000_050);
        assert_eq!(p.display_amount(), "3,000,000.50 VND");
        assert_eq!(format_minor(0), "0.00");
        assert_eq!(format_minor(99_999), "999.99");
    }

    #[test]
    fn work_group_reads_legacy_codes() {
        let group: WorkGroup = serde_json::from_str("\"dich_thuat\"").unwrap();
        assert_eq!(group, WorkGroup::Translation);
    }
}
