//! `SeaORM` entity definitions.

pub mod account_balances;
pub mod bills;
pub mod chart_accounts;
pub mod checks;
pub mod journal_entries;
pub mod journal_lines;
pub mod organization_users;
pub mod organizations;
pub mod payments;
pub mod sea_orm_active_enums;
pub mod sessions;
pub mod stock_items;
pub mod stock_movements;
pub mod treasury_accounts;
pub mod treasury_transactions;
pub mod users;
pub mod wiki_pages;
