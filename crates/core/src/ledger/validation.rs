//! Business rule validation for journal entries.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{JournalLineInput, JournalSide};

/// Validation errors for journal entries.
#[derive(Debug, Error)]
pub enum JournalValidationError {
    /// Entry lines do not balance.
    #[error("journal entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Entry has fewer than two lines.
    #[error("journal entry must have at least two lines")]
    TooFewLines,

    /// Entry has only one side (all debits or all credits).
    #[error("journal entry must have both debit and credit lines")]
    SingleSided,

    /// Line amount is zero or negative.
    #[error("journal line amount must be positive")]
    InvalidAmount,
}

/// Validates that a set of journal lines forms a postable entry.
///
/// # Errors
///
/// Returns an error if the lines are unbalanced, too few, single-sided,
/// or carry non-positive amounts.
pub fn validate_journal_lines(lines: &[JournalLineInput]) -> Result<(), JournalValidationError> {
    if lines.len() < 2 {
        return Err(JournalValidationError::TooFewLines);
    }

    let mut total_debits = Decimal::ZERO;
    let mut total_credits = Decimal::ZERO;
    let mut has_debit = false;
    let mut has_credit = false;

    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(JournalValidationError::InvalidAmount);
        }

        match line.side {
            JournalSide::Debit => {
                total_debits += line.amount;
                has_debit = true;
            }
            JournalSide::Credit => {
                total_credits += line.amount;
                has_credit = true;
            }
        }
    }

    if !has_debit || !has_credit {
        return Err(JournalValidationError::SingleSided);
    }

    if total_debits != total_credits {
        return Err(JournalValidationError::Unbalanced {
            debits: total_debits,
            credits: total_credits,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn make_line(side: JournalSide, amount: Decimal) -> JournalLineInput {
        JournalLineInput {
            account_id: Uuid::new_v4(),
            side,
            amount,
            memo: None,
        }
    }

    #[test]
    fn test_balanced_lines() {
        let lines = vec![
            make_line(JournalSide::Debit, Decimal::new(10000, 2)),
            make_line(JournalSide::Credit, Decimal::new(10000, 2)),
        ];
        assert!(validate_journal_lines(&lines).is_ok());
    }

    #[test]
    fn test_unbalanced_lines() {
        let lines = vec![
            make_line(JournalSide::Debit, Decimal::new(10000, 2)),
            make_line(JournalSide::Credit, Decimal::new(5000, 2)),
        ];
        assert!(matches!(
            validate_journal_lines(&lines),
            Err(JournalValidationError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_too_few_lines() {
        assert!(matches!(
            validate_journal_lines(&[]),
            Err(JournalValidationError::TooFewLines)
        ));
        let one = vec![make_line(JournalSide::Debit, Decimal::ONE)];
        assert!(matches!(
            validate_journal_lines(&one),
            Err(JournalValidationError::TooFewLines)
        ));
    }

    #[test]
    fn test_single_sided() {
        let lines = vec![
            make_line(JournalSide::Debit, Decimal::new(10000, 2)),
            make_line(JournalSide::Debit, Decimal::new(5000, 2)),
        ];
        assert!(matches!(
            validate_journal_lines(&lines),
            Err(JournalValidationError::SingleSided)
        ));
    }

    #[test]
    fn test_zero_amount_rejected() {
        let lines = vec![
            make_line(JournalSide::Debit, Decimal::ZERO),
            make_line(JournalSide::Credit, Decimal::ZERO),
        ];
        assert!(matches!(
            validate_journal_lines(&lines),
            Err(JournalValidationError::InvalidAmount)
        ));
    }

    proptest! {
        /// Property: mirroring any set of positive debit amounts with a
        /// single credit for their sum always validates.
        #[test]
        fn prop_mirrored_lines_validate(amounts in proptest::collection::vec(1u64..1_000_000, 1..8)) {
            let mut lines: Vec<JournalLineInput> = amounts
                .iter()
                .map(|&cents| make_line(JournalSide::Debit, Decimal::new(cents as i64, 2)))
                .collect();
            let total: Decimal = lines.iter().map(|l| l.amount).sum();
            lines.push(make_line(JournalSide::Credit, total));

            prop_assert!(validate_journal_lines(&lines).is_ok());
        }

        /// Property: perturbing one side of a balanced entry makes it
        /// invalid.
        #[test]
        fn prop_perturbed_lines_fail(cents in 1u64..1_000_000, skew in 1u64..1_000) {
            let lines = vec![
                make_line(JournalSide::Debit, Decimal::new(cents as i64, 2)),
                make_line(JournalSide::Credit, Decimal::new((cents + skew) as i64, 2)),
            ];
            prop_assert!(
                matches!(
                    validate_journal_lines(&lines),
                    Err(JournalValidationError::Unbalanced { .. })
                ),
                "expected Unbalanced error"
            );
        }
    }
}
