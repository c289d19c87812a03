//! Double-entry accounting: chart of accounts, journal entries and
//! automatic posting of treasury and billing events.

pub mod posting;
pub mod types;
pub mod validation;

pub use posting::{auto_entry_for_bill, auto_entry_for_payment, auto_entry_for_transaction};
pub use types::{
    AccountType, JournalLineInput, JournalSide, NewJournalEntry, NormalBalance,
};
pub use validation::{validate_journal_lines, JournalValidationError};
