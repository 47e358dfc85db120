//! # Payment Status Machine
//!
//! Models the payment standing of one enrollment. Payment status evolves
//! independently of the enrollment status; recording a payment never
//! touches the enrollment's own lifecycle.
//!
//! ## States
//!
//! ```text
//! Pending ──▶ Partial ──▶ Paid ──▶ Refunded (terminal)
//!    │           │         ▲
//!    │           ▼         │
//!    └──────▶ Overdue ─────┘
//! ```
//!
//! Every non-terminal status can reach PAID. OVERDUE is recoverable: a
//! late payer can settle partially or in full. REFUNDED is only
//! reachable from PAID and is terminal.

use serde::{Deserialize, Serialize};

use crate::validator::LifecycleStatus;
use courseflow_core::EntityKind;

/// The payment standing of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Nothing paid yet.
    Pending,
    /// Some, but not all, of the due amount received.
    Partial,
    /// Fully paid.
    Paid,
    /// Payment deadline passed with an outstanding balance.
    Overdue,
    /// Payment was returned (terminal).
    Refunded,
}

impl PaymentStatus {
    /// All payment statuses in canonical order.
    pub fn all() -> &'static [PaymentStatus] {
        &[
            Self::Pending,
            Self::Partial,
            Self::Paid,
            Self::Overdue,
            Self::Refunded,
        ]
    }

    /// The statuses directly reachable from this one.
    pub fn successors(&self) -> &'static [PaymentStatus] {
        match self {
            Self::Pending => &[Self::Partial, Self::Paid, Self::Overdue],
            Self::Partial => &[Self::Paid, Self::Overdue],
            Self::Paid => &[Self::Refunded],
            Self::Overdue => &[Self::Partial, Self::Paid],
            Self::Refunded => &[],
        }
    }

    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        self.successors().is_empty()
    }

    /// The canonical status name (e.g. `OVERDUE`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Partial => "PARTIAL",
            Self::Paid => "PAID",
            Self::Overdue => "OVERDUE",
            Self::Refunded => "REFUNDED",
        }
    }

    /// Parse a status from its canonical name.
    pub fn from_name(s: &str) -> Option<PaymentStatus> {
        Self::all().iter().find(|v| v.name() == s).copied()
    }
}

impl LifecycleStatus for PaymentStatus {
    const KIND: EntityKind = EntityKind::Payment;

    fn all_statuses() -> &'static [Self] {
        Self::all()
    }

    fn successors(&self) -> &'static [Self] {
        PaymentStatus::successors(self)
    }

    fn name(&self) -> &'static str {
        PaymentStatus::name(self)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
