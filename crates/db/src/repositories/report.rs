//! Report repository: aggregates journal lines into per-account
//! totals and hands them to the pure report builders.
//!
//! Reports are produced in the organization's base currency, since
//! journal entries are kept in it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    Statement,
};
use std::str::FromStr;
use uuid::Uuid;

use obralis_core::ledger::AccountType;
use obralis_core::reports::{
    AccountBalanceRow, BalanceSheetReport, IncomeStatementReport, ReportService,
    TrialBalanceReport,
};
use obralis_shared::types::Currency;

use crate::entities::organizations;

/// Error types for report generation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Organization not found.
    #[error("Organization not found: {0}")]
    OrganizationNotFound(Uuid),

    /// A stored account type failed to parse.
    #[error("Invalid account type stored: {0}")]
    InvalidAccountType(String),

    /// A stored currency code failed to parse.
    #[error("Invalid currency stored: {0}")]
    InvalidCurrency(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Per-account debit/credit totals as they come off the wire.
#[derive(Debug, FromQueryResult)]
struct RawAccountTotals {
    account_id: Uuid,
    code: String,
    name: String,
    account_type: String,
    total_debit: Decimal,
    total_credit: Decimal,
}

const ACCOUNT_TOTALS_SQL: &str = r"
SELECT
    a.id AS account_id,
    a.code,
    a.name,
    a.account_type::text AS account_type,
    COALESCE(t.total_debit, 0) AS total_debit,
    COALESCE(t.total_credit, 0) AS total_credit
FROM chart_accounts a
LEFT JOIN (
    SELECT
        l.account_id,
        COALESCE(SUM(l.amount) FILTER (WHERE l.side = 'debit'), 0) AS total_debit,
        COALESCE(SUM(l.amount) FILTER (WHERE l.side = 'credit'), 0) AS total_credit
    FROM journal_lines l
    JOIN journal_entries e ON e.id = l.entry_id
    WHERE e.organization_id = $1
      AND e.entry_date <= $2
      AND ($3::date IS NULL OR e.entry_date >= $3)
    GROUP BY l.account_id
) t ON t.account_id = a.id
WHERE a.organization_id = $1
  AND a.is_active = TRUE
ORDER BY a.code
";

/// Report repository.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    db: DatabaseConnection,
}

impl ReportRepository {
    /// Creates a new report repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Trial balance as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is missing or the query
    /// fails.
    pub async fn trial_balance(
        &self,
        organization_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<TrialBalanceReport, ReportError> {
        let currency = self.base_currency(organization_id).await?;
        let rows = self.account_rows(organization_id, None, as_of).await?;
        Ok(ReportService::trial_balance(as_of, currency, rows))
    }

    /// Balance sheet as of a date.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is missing or the query
    /// fails.
    pub async fn balance_sheet(
        &self,
        organization_id: Uuid,
        as_of: NaiveDate,
    ) -> Result<BalanceSheetReport, ReportError> {
        let currency = self.base_currency(organization_id).await?;
        let rows = self.account_rows(organization_id, None, as_of).await?;
        Ok(ReportService::balance_sheet(as_of, currency, rows))
    }

    /// Income statement over a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the organization is missing or the query
    /// fails.
    pub async fn income_statement(
        &self,
        organization_id: Uuid,
        period_start: NaiveDate,
        period_end: NaiveDate,
    ) -> Result<IncomeStatementReport, ReportError> {
        let currency = self.base_currency(organization_id).await?;
        let rows = self
            .account_rows(organization_id, Some(period_start), period_end)
            .await?;
        Ok(ReportService::income_statement(
            period_start,
            period_end,
            currency,
            rows,
        ))
    }

    async fn base_currency(&self, organization_id: Uuid) -> Result<Currency, ReportError> {
        let organization = organizations::Entity::find_by_id(organization_id)
            .filter(organizations::Column::IsActive.eq(true))
            .one(&self.db)
            .await?
            .ok_or(ReportError::OrganizationNotFound(organization_id))?;

        Currency::from_str(&organization.base_currency)
            .map_err(|_| ReportError::InvalidCurrency(organization.base_currency))
    }

    async fn account_rows(
        &self,
        organization_id: Uuid,
        date_from: Option<NaiveDate>,
        date_to: NaiveDate,
    ) -> Result<Vec<AccountBalanceRow>, ReportError> {
        let statement = Statement::from_sql_and_values(
            DbBackend::Postgres,
            ACCOUNT_TOTALS_SQL,
            [organization_id.into(), date_to.into(), date_from.into()],
        );

        let raw = RawAccountTotals::find_by_statement(statement)
            .all(&self.db)
            .await?;

        raw.into_iter()
            .map(|row| {
                let account_type = AccountType::from_str(&row.account_type)
                    .map_err(|_| ReportError::InvalidAccountType(row.account_type.clone()))?;
                let balance = account_type
                    .normal_balance()
                    .balance(row.total_debit, row.total_credit);
                Ok(AccountBalanceRow {
                    account_id: row.account_id,
                    code: row.code,
                    name: row.name,
                    account_type,
                    total_debit: row.total_debit,
                    total_credit: row.total_credit,
                    balance,
                })
            })
            .collect()
    }
}
