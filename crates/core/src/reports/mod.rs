//! Financial report generation from account balances.

pub mod service;
pub mod types;

pub use service::ReportService;
pub use types::{
    AccountBalanceRow, BalanceSheetReport, BalanceSheetSection, IncomeStatementReport,
    IncomeStatementSection, TrialBalanceReport, TrialBalanceTotals,
};
