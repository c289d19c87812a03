//! Automatic journal entries for treasury and billing events.
//!
//! When an organization has accounting enabled, treasury transactions,
//! bills and payments each generate a balanced two-line journal entry.
//! The mapping follows the accounts configured on the source records:
//! every treasury account and bill category is linked to a ledger
//! account, and the functions here pair it with the event's
//! counterpart account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::balance::Direction;
use crate::billing::BillKind;

use super::types::{JournalLineInput, JournalSide, NewJournalEntry};

fn two_line_entry(
    entry_date: NaiveDate,
    description: String,
    debit_account: Uuid,
    credit_account: Uuid,
    amount: Decimal,
) -> NewJournalEntry {
    NewJournalEntry {
        entry_date,
        description,
        lines: vec![
            JournalLineInput {
                account_id: debit_account,
                side: JournalSide::Debit,
                amount,
                memo: None,
            },
            JournalLineInput {
                account_id: credit_account,
                side: JournalSide::Credit,
                amount,
                memo: None,
            },
        ],
    }
}

/// Journal entry for a treasury transaction.
///
/// An income debits the treasury account's ledger account and credits
/// the category's account; an expense does the reverse.
#[must_use]
pub fn auto_entry_for_transaction(
    entry_date: NaiveDate,
    description: String,
    direction: Direction,
    treasury_ledger_account: Uuid,
    category_ledger_account: Uuid,
    amount: Decimal,
) -> NewJournalEntry {
    let (debit, credit) = match direction {
        Direction::Income => (treasury_ledger_account, category_ledger_account),
        Direction::Expense => (category_ledger_account, treasury_ledger_account),
    };
    two_line_entry(entry_date, description, debit, credit, amount)
}

/// Journal entry for a newly registered bill.
///
/// A client bill debits receivables and credits the revenue account; a
/// provider bill debits the expense account and credits payables.
#[must_use]
pub fn auto_entry_for_bill(
    entry_date: NaiveDate,
    description: String,
    kind: BillKind,
    contact_ledger_account: Uuid,
    category_ledger_account: Uuid,
    amount: Decimal,
) -> NewJournalEntry {
    let (debit, credit) = match kind {
        BillKind::Client => (contact_ledger_account, category_ledger_account),
        BillKind::Provider => (category_ledger_account, contact_ledger_account),
    };
    two_line_entry(entry_date, description, debit, credit, amount)
}

/// Journal entry for a payment against a bill.
///
/// A collection against a client bill debits the treasury account and
/// credits receivables; a payment against a provider bill debits
/// payables and credits the treasury account.
#[must_use]
pub fn auto_entry_for_payment(
    entry_date: NaiveDate,
    description: String,
    kind: BillKind,
    treasury_ledger_account: Uuid,
    contact_ledger_account: Uuid,
    amount: Decimal,
) -> NewJournalEntry {
    let (debit, credit) = match kind {
        BillKind::Client => (treasury_ledger_account, contact_ledger_account),
        BillKind::Provider => (contact_ledger_account, treasury_ledger_account),
    };
    two_line_entry(entry_date, description, debit, credit, amount)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::validation::validate_journal_lines;
    use rust_decimal_macros::dec;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()
    }

    #[test]
    fn test_income_debits_treasury_account() {
        let cash = Uuid::new_v4();
        let revenue = Uuid::new_v4();
        let entry = auto_entry_for_transaction(
            date(),
            "certificate collection".into(),
            Direction::Income,
            cash,
            revenue,
            dec!(1500),
        );

        assert!(validate_journal_lines(&entry.lines).is_ok());
        assert_eq!(entry.lines[0].account_id, cash);
        assert_eq!(entry.lines[0].side, JournalSide::Debit);
        assert_eq!(entry.lines[1].account_id, revenue);
        assert_eq!(entry.lines[1].side, JournalSide::Credit);
    }

    #[test]
    fn test_expense_credits_treasury_account() {
        let bank = Uuid::new_v4();
        let materials = Uuid::new_v4();
        let entry = auto_entry_for_transaction(
            date(),
            "cement purchase".into(),
            Direction::Expense,
            bank,
            materials,
            dec!(320.50),
        );

        assert_eq!(entry.lines[0].account_id, materials);
        assert_eq!(entry.lines[1].account_id, bank);
    }

    #[test]
    fn test_client_bill_debits_receivables() {
        let receivables = Uuid::new_v4();
        let revenue = Uuid::new_v4();
        let entry = auto_entry_for_bill(
            date(),
            "progress certificate 3".into(),
            BillKind::Client,
            receivables,
            revenue,
            dec!(10000),
        );

        assert!(validate_journal_lines(&entry.lines).is_ok());
        assert_eq!(entry.lines[0].account_id, receivables);
        assert_eq!(entry.lines[1].account_id, revenue);
    }

    #[test]
    fn test_provider_payment_credits_treasury() {
        let payables = Uuid::new_v4();
        let cash = Uuid::new_v4();
        let entry = auto_entry_for_payment(
            date(),
            "partial payment".into(),
            BillKind::Provider,
            cash,
            payables,
            dec!(400),
        );

        assert_eq!(entry.lines[0].account_id, payables);
        assert_eq!(entry.lines[0].side, JournalSide::Debit);
        assert_eq!(entry.lines[1].account_id, cash);
        assert_eq!(entry.lines[1].side, JournalSide::Credit);
    }

    #[test]
    fn test_collection_debits_treasury() {
        let cash = Uuid::new_v4();
        let receivables = Uuid::new_v4();
        let entry = auto_entry_for_payment(
            date(),
            "collection".into(),
            BillKind::Client,
            cash,
            receivables,
            dec!(250),
        );

        assert_eq!(entry.lines[0].account_id, cash);
        assert_eq!(entry.lines[1].account_id, receivables);
    }
}
