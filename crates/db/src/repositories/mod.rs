//! Repository layer for data access.
//!
//! Every query is scoped by organization id; repositories that touch
//! denormalized projections (treasury balances, stock quantities, bill
//! statuses) commit the projection adjustment and the row change in a
//! single database transaction.

pub mod account;
pub mod billing;
pub mod check;
pub mod journal;
pub mod organization;
pub mod report;
pub mod session;
pub mod stock;
pub mod treasury;
pub mod user;
pub mod wiki;

pub use account::{AccountError, AccountRepository, CreateAccountInput};
pub use billing::{
    BillFilter, BillingError, BillingRepository, CreateBillInput, CreatePaymentInput,
    UpdateBillInput, UpdatePaymentInput,
};
pub use check::{CheckError, CheckRepository, CreateCheckInput, TransitionInput};
pub use journal::{EntryWithLines, JournalError, JournalRepository};
pub use organization::{OrganizationRepository, OrganizationUpdate};
pub use report::{ReportError, ReportRepository};
pub use session::SessionRepository;
pub use stock::{
    CreateItemInput, CreateMovementInput, StockError, StockRepository, UpdateMovementInput,
};
pub use treasury::{
    CreateTransactionInput, CreateTreasuryAccountInput, TransactionFilter, TransferInput,
    TreasuryError, TreasuryRepository, UpdateTransactionInput,
};
pub use user::UserRepository;
pub use wiki::{UpdatePageInput, WikiError, WikiRepository};
