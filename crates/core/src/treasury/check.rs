//! Check lifecycle state machine.
//!
//! Issued checks move `issued -> delivered -> cashed | rejected`.
//! Received checks move `held -> deposited -> credited | rejected`.
//! Cashed and credited are the only states that settle funds; settling
//! a check creates the treasury transaction for its amount.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Whether the organization wrote the check or received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Check written by the organization against its own bank account.
    Issued,
    /// Third-party check received from a client.
    Received,
}

/// Check lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Issued check written but not yet handed over.
    Issued,
    /// Issued check handed to the payee.
    Delivered,
    /// Issued check debited by the bank (settles funds).
    Cashed,
    /// Received check in the drawer.
    Held,
    /// Received check deposited at the bank.
    Deposited,
    /// Received check credited by the bank (settles funds).
    Credited,
    /// Bounced, either kind.
    Rejected,
}

impl CheckStatus {
    /// Returns true if this status settles funds into/out of treasury.
    #[must_use]
    pub const fn settles_funds(self) -> bool {
        matches!(self, Self::Cashed | Self::Credited)
    }

    /// Returns true if no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Cashed | Self::Credited | Self::Rejected)
    }

    /// The initial status for a new check of the given kind.
    #[must_use]
    pub const fn initial(kind: CheckKind) -> Self {
        match kind {
            CheckKind::Issued => Self::Issued,
            CheckKind::Received => Self::Held,
        }
    }
}

/// Check lifecycle errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckError {
    /// Transition not allowed by the lifecycle.
    #[error("Invalid check transition from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current status.
        from: CheckStatus,
        /// Requested status.
        to: CheckStatus,
    },

    /// Status does not belong to the check's kind.
    #[error("Status {status:?} is not valid for a {kind:?} check")]
    KindMismatch {
        /// The check's kind.
        kind: CheckKind,
        /// The offending status.
        status: CheckStatus,
    },
}

/// Validates a status transition for a check of the given kind.
///
/// # Errors
///
/// Returns an error if the transition is not part of the lifecycle.
pub fn validate_transition(
    kind: CheckKind,
    from: CheckStatus,
    to: CheckStatus,
) -> Result<(), CheckError> {
    validate_status_kind(kind, from)?;
    validate_status_kind(kind, to)?;

    let allowed = matches!(
        (from, to),
        (CheckStatus::Issued, CheckStatus::Delivered)
            | (CheckStatus::Delivered, CheckStatus::Cashed | CheckStatus::Rejected)
            | (CheckStatus::Held, CheckStatus::Deposited)
            | (CheckStatus::Deposited, CheckStatus::Credited | CheckStatus::Rejected)
    );

    if allowed {
        Ok(())
    } else {
        Err(CheckError::InvalidTransition { from, to })
    }
}

fn validate_status_kind(kind: CheckKind, status: CheckStatus) -> Result<(), CheckError> {
    let valid = match kind {
        CheckKind::Issued => matches!(
            status,
            CheckStatus::Issued
                | CheckStatus::Delivered
                | CheckStatus::Cashed
                | CheckStatus::Rejected
        ),
        CheckKind::Received => matches!(
            status,
            CheckStatus::Held
                | CheckStatus::Deposited
                | CheckStatus::Credited
                | CheckStatus::Rejected
        ),
    };

    if valid {
        Ok(())
    } else {
        Err(CheckError::KindMismatch { kind, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CheckKind::Issued, CheckStatus::Issued, CheckStatus::Delivered)]
    #[case(CheckKind::Issued, CheckStatus::Delivered, CheckStatus::Cashed)]
    #[case(CheckKind::Issued, CheckStatus::Delivered, CheckStatus::Rejected)]
    #[case(CheckKind::Received, CheckStatus::Held, CheckStatus::Deposited)]
    #[case(CheckKind::Received, CheckStatus::Deposited, CheckStatus::Credited)]
    #[case(CheckKind::Received, CheckStatus::Deposited, CheckStatus::Rejected)]
    fn test_allowed_transitions(
        #[case] kind: CheckKind,
        #[case] from: CheckStatus,
        #[case] to: CheckStatus,
    ) {
        assert!(validate_transition(kind, from, to).is_ok());
    }

    #[rstest]
    #[case(CheckKind::Issued, CheckStatus::Issued, CheckStatus::Cashed)]
    #[case(CheckKind::Issued, CheckStatus::Cashed, CheckStatus::Rejected)]
    #[case(CheckKind::Issued, CheckStatus::Rejected, CheckStatus::Delivered)]
    #[case(CheckKind::Received, CheckStatus::Held, CheckStatus::Credited)]
    #[case(CheckKind::Received, CheckStatus::Credited, CheckStatus::Deposited)]
    fn test_rejected_transitions(
        #[case] kind: CheckKind,
        #[case] from: CheckStatus,
        #[case] to: CheckStatus,
    ) {
        assert!(matches!(
            validate_transition(kind, from, to),
            Err(CheckError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_kind_mismatch() {
        assert!(matches!(
            validate_transition(CheckKind::Issued, CheckStatus::Held, CheckStatus::Deposited),
            Err(CheckError::KindMismatch { .. })
        ));
        assert!(matches!(
            validate_transition(CheckKind::Received, CheckStatus::Issued, CheckStatus::Delivered),
            Err(CheckError::KindMismatch { .. })
        ));
    }

    #[test]
    fn test_settles_funds() {
        assert!(CheckStatus::Cashed.settles_funds());
        assert!(CheckStatus::Credited.settles_funds());
        assert!(!CheckStatus::Delivered.settles_funds());
        assert!(!CheckStatus::Rejected.settles_funds());
    }

    #[test]
    fn test_initial_status() {
        assert_eq!(CheckStatus::initial(CheckKind::Issued), CheckStatus::Issued);
        assert_eq!(CheckStatus::initial(CheckKind::Received), CheckStatus::Held);
    }

    #[test]
    fn test_terminal_states() {
        assert!(CheckStatus::Cashed.is_terminal());
        assert!(CheckStatus::Credited.is_terminal());
        assert!(CheckStatus::Rejected.is_terminal());
        assert!(!CheckStatus::Issued.is_terminal());
        assert!(!CheckStatus::Held.is_terminal());
    }
}
