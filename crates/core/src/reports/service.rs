//! Report generation service.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::ledger::AccountType;
use obralis_shared::types::Currency;

use super::types::{
    AccountBalanceRow, BalanceSheetReport, BalanceSheetSection, IncomeStatementReport,
    IncomeStatementSection, TrialBalanceReport, TrialBalanceTotals,
};

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance report from account balances.
    ///
    /// The trial balance verifies that total debits equal total credits.
    #[must_use]
    pub fn trial_balance(
        as_of: NaiveDate,
        currency: Currency,
        accounts: Vec<AccountBalanceRow>,
    ) -> TrialBalanceReport {
        let total_debit: Decimal = accounts.iter().map(|a| a.total_debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.total_credit).sum();

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            as_of,
            currency,
            accounts,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates a balance sheet report from account balances.
    ///
    /// The balance sheet verifies that Assets = Liabilities + Equity.
    #[must_use]
    pub fn balance_sheet(
        as_of: NaiveDate,
        currency: Currency,
        accounts: Vec<AccountBalanceRow>,
    ) -> BalanceSheetReport {
        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut net_income = Decimal::ZERO;

        for account in accounts {
            match account.account_type {
                AccountType::Asset => Self::add_to_section(&mut assets, account),
                AccountType::Liability => Self::add_to_section(&mut liabilities, account),
                AccountType::Equity => Self::add_to_section(&mut equity, account),
                // Result accounts roll into equity as current earnings.
                AccountType::Revenue => net_income += account.balance,
                AccountType::Expense => net_income -= account.balance,
            }
        }
        equity.total += net_income;

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            as_of,
            currency,
            assets,
            liabilities,
            equity,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: total_assets == liabilities_and_equity,
        }
    }

    /// Generates an income statement report from account balances.
    #[must_use]
    pub fn income_statement(
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: Currency,
        accounts: Vec<AccountBalanceRow>,
    ) -> IncomeStatementReport {
        let mut revenue = IncomeStatementSection::default();
        let mut expenses = IncomeStatementSection::default();

        for account in accounts {
            match account.account_type {
                AccountType::Revenue => Self::add_to_income_section(&mut revenue, account),
                AccountType::Expense => Self::add_to_income_section(&mut expenses, account),
                _ => {}
            }
        }

        let net_income = revenue.total - expenses.total;

        IncomeStatementReport {
            report_type: "income_statement".to_string(),
            period_start,
            period_end,
            currency,
            revenue,
            expenses,
            net_income,
        }
    }

    fn add_to_section(section: &mut BalanceSheetSection, account: AccountBalanceRow) {
        section.total += account.balance;
        section.accounts.push(account);
    }

    fn add_to_income_section(section: &mut IncomeStatementSection, account: AccountBalanceRow) {
        section.total += account.balance;
        section.accounts.push(account);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn row(
        code: &str,
        account_type: AccountType,
        total_debit: Decimal,
        total_credit: Decimal,
    ) -> AccountBalanceRow {
        AccountBalanceRow {
            account_id: Uuid::new_v4(),
            code: code.to_string(),
            name: code.to_string(),
            account_type,
            total_debit,
            total_credit,
            balance: account_type.normal_balance().balance(total_debit, total_credit),
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
    }

    #[test]
    fn test_trial_balance_balanced() {
        let accounts = vec![
            row("1.1", AccountType::Asset, dec!(1000), Decimal::ZERO),
            row("4.1", AccountType::Revenue, Decimal::ZERO, dec!(1000)),
        ];
        let report = ReportService::trial_balance(date(), Currency::Ars, accounts);

        assert!(report.totals.is_balanced);
        assert_eq!(report.totals.total_debit, dec!(1000));
        assert_eq!(report.totals.total_credit, dec!(1000));
    }

    #[test]
    fn test_trial_balance_unbalanced() {
        let accounts = vec![row("1.1", AccountType::Asset, dec!(1000), Decimal::ZERO)];
        let report = ReportService::trial_balance(date(), Currency::Ars, accounts);
        assert!(!report.totals.is_balanced);
    }

    #[test]
    fn test_balance_sheet_rolls_earnings_into_equity() {
        // Cash 1000 funded by 400 capital and 600 of earned revenue.
        let accounts = vec![
            row("1.1", AccountType::Asset, dec!(1000), Decimal::ZERO),
            row("3.1", AccountType::Equity, Decimal::ZERO, dec!(400)),
            row("4.1", AccountType::Revenue, Decimal::ZERO, dec!(600)),
        ];
        let report = ReportService::balance_sheet(date(), Currency::Usd, accounts);

        assert_eq!(report.total_assets, dec!(1000));
        assert_eq!(report.total_equity, dec!(1000));
        assert!(report.is_balanced);
    }

    #[test]
    fn test_income_statement_net_income() {
        let accounts = vec![
            row("4.1", AccountType::Revenue, Decimal::ZERO, dec!(5000)),
            row("5.1", AccountType::Expense, dec!(3200), Decimal::ZERO),
            row("1.1", AccountType::Asset, dec!(1800), Decimal::ZERO),
        ];
        let report =
            ReportService::income_statement(date(), date(), Currency::Ars, accounts);

        assert_eq!(report.revenue.total, dec!(5000));
        assert_eq!(report.expenses.total, dec!(3200));
        assert_eq!(report.net_income, dec!(1800));
        // Balance sheet accounts are excluded.
        assert_eq!(report.revenue.accounts.len(), 1);
        assert_eq!(report.expenses.accounts.len(), 1);
    }
}
