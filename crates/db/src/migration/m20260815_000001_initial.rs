//! Initial database migration.
//!
//! Creates all enums, tables and indexes for the Obralis schema.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS & ORGANIZATIONS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;
        db.execute_unprepared(ORGANIZATIONS_SQL).await?;
        db.execute_unprepared(ORGANIZATION_USERS_SQL).await?;
        db.execute_unprepared(SESSIONS_SQL).await?;

        // ============================================================
        // PART 3: CHART OF ACCOUNTS & JOURNAL
        // ============================================================
        db.execute_unprepared(CHART_ACCOUNTS_SQL).await?;
        db.execute_unprepared(JOURNAL_ENTRIES_SQL).await?;
        db.execute_unprepared(JOURNAL_LINES_SQL).await?;

        // ============================================================
        // PART 4: TREASURY
        // ============================================================
        db.execute_unprepared(TREASURY_ACCOUNTS_SQL).await?;
        db.execute_unprepared(TREASURY_TRANSACTIONS_SQL).await?;
        db.execute_unprepared(ACCOUNT_BALANCES_SQL).await?;
        db.execute_unprepared(CHECKS_SQL).await?;

        // ============================================================
        // PART 5: BILLING
        // ============================================================
        db.execute_unprepared(BILLS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;

        // ============================================================
        // PART 6: STOCK
        // ============================================================
        db.execute_unprepared(STOCK_ITEMS_SQL).await?;
        db.execute_unprepared(STOCK_MOVEMENTS_SQL).await?;

        // ============================================================
        // PART 7: WIKI
        // ============================================================
        db.execute_unprepared(WIKI_PAGES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'owner',
    'admin',
    'operator',
    'viewer'
);

-- Ledger account types
CREATE TYPE account_type AS ENUM (
    'asset',
    'liability',
    'equity',
    'revenue',
    'expense'
);

-- Journal line side
CREATE TYPE journal_side AS ENUM ('debit', 'credit');

-- Journal entry origin
CREATE TYPE entry_source AS ENUM ('manual', 'treasury', 'billing');

-- Treasury account kind
CREATE TYPE treasury_account_kind AS ENUM ('cash_box', 'bank_account');

-- Treasury transaction direction
CREATE TYPE transaction_direction AS ENUM ('income', 'expense');

-- Check kind and lifecycle status
CREATE TYPE check_kind AS ENUM ('issued', 'received');
CREATE TYPE check_status AS ENUM (
    'issued',
    'delivered',
    'cashed',
    'held',
    'deposited',
    'credited',
    'rejected'
);

-- Bill kind and derived status
CREATE TYPE bill_kind AS ENUM ('client', 'provider');
CREATE TYPE bill_status AS ENUM ('pending', 'partially_paid', 'paid');

-- Stock movement kind
CREATE TYPE movement_kind AS ENUM ('inbound', 'outbound', 'adjustment');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_email ON users(email) WHERE is_active = true;
";

const ORGANIZATIONS_SQL: &str = r"
CREATE TABLE organizations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    slug VARCHAR(100) NOT NULL UNIQUE,
    base_currency CHAR(3) NOT NULL,
    accounting_enabled BOOLEAN NOT NULL DEFAULT false,
    receivable_account_id UUID,
    payable_account_id UUID,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_base_currency_format CHECK (base_currency ~ '^[A-Z]{3}$')
);

CREATE INDEX idx_organizations_slug ON organizations(slug);
";

const ORGANIZATION_USERS_SQL: &str = r"
CREATE TABLE organization_users (
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    role user_role NOT NULL DEFAULT 'viewer',
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (user_id, organization_id)
);

CREATE INDEX idx_org_users_org ON organization_users(organization_id);
";

const SESSIONS_SQL: &str = r"
CREATE TABLE sessions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    refresh_token_hash VARCHAR(64) NOT NULL,
    user_agent VARCHAR(512),
    expires_at TIMESTAMPTZ NOT NULL,
    revoked_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_sessions_token ON sessions(refresh_token_hash) WHERE revoked_at IS NULL;
CREATE INDEX idx_sessions_user ON sessions(user_id);
";

const CHART_ACCOUNTS_SQL: &str = r"
CREATE TABLE chart_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    parent_id UUID REFERENCES chart_accounts(id),
    code VARCHAR(20) NOT NULL,
    name VARCHAR(255) NOT NULL,
    account_type account_type NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (organization_id, code)
);

CREATE INDEX idx_chart_accounts_org ON chart_accounts(organization_id);
CREATE INDEX idx_chart_accounts_parent ON chart_accounts(parent_id) WHERE parent_id IS NOT NULL;

ALTER TABLE organizations
    ADD CONSTRAINT fk_org_receivable_account
        FOREIGN KEY (receivable_account_id) REFERENCES chart_accounts(id),
    ADD CONSTRAINT fk_org_payable_account
        FOREIGN KEY (payable_account_id) REFERENCES chart_accounts(id);
";

const JOURNAL_ENTRIES_SQL: &str = r"
CREATE TABLE journal_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    entry_date DATE NOT NULL,
    description VARCHAR(500) NOT NULL,
    source entry_source NOT NULL DEFAULT 'manual',
    source_id UUID,
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_journal_entries_org_date ON journal_entries(organization_id, entry_date DESC);
CREATE INDEX idx_journal_entries_source ON journal_entries(source, source_id) WHERE source_id IS NOT NULL;
";

const JOURNAL_LINES_SQL: &str = r"
CREATE TABLE journal_lines (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    entry_id UUID NOT NULL REFERENCES journal_entries(id) ON DELETE CASCADE,
    account_id UUID NOT NULL REFERENCES chart_accounts(id),
    side journal_side NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    memo VARCHAR(500),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_line_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_journal_lines_entry ON journal_lines(entry_id);
CREATE INDEX idx_journal_lines_account ON journal_lines(account_id);
";

const TREASURY_ACCOUNTS_SQL: &str = r"
CREATE TABLE treasury_accounts (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    kind treasury_account_kind NOT NULL,
    currency CHAR(3) NOT NULL,
    ledger_account_id UUID REFERENCES chart_accounts(id),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_treasury_currency_format CHECK (currency ~ '^[A-Z]{3}$')
);

CREATE INDEX idx_treasury_accounts_org ON treasury_accounts(organization_id);
";

const TREASURY_TRANSACTIONS_SQL: &str = r"
CREATE TABLE treasury_transactions (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    treasury_account_id UUID NOT NULL REFERENCES treasury_accounts(id),
    direction transaction_direction NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL,
    transaction_date DATE NOT NULL,
    description VARCHAR(500) NOT NULL,
    category_account_id UUID REFERENCES chart_accounts(id),
    reference VARCHAR(100),
    transfer_group_id UUID,
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_txn_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_treasury_txns_account_date ON treasury_transactions(treasury_account_id, transaction_date DESC);
CREATE INDEX idx_treasury_txns_org ON treasury_transactions(organization_id);
CREATE INDEX idx_treasury_txns_reference ON treasury_transactions(reference) WHERE reference IS NOT NULL;
CREATE INDEX idx_treasury_txns_transfer ON treasury_transactions(transfer_group_id) WHERE transfer_group_id IS NOT NULL;
";

const ACCOUNT_BALANCES_SQL: &str = r"
CREATE TABLE account_balances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    treasury_account_id UUID NOT NULL REFERENCES treasury_accounts(id) ON DELETE CASCADE,
    currency CHAR(3) NOT NULL,
    balance NUMERIC(19, 4) NOT NULL DEFAULT 0,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (treasury_account_id, currency)
);

CREATE INDEX idx_account_balances_org ON account_balances(organization_id);
";

const CHECKS_SQL: &str = r"
CREATE TABLE checks (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    kind check_kind NOT NULL,
    status check_status NOT NULL,
    number VARCHAR(50) NOT NULL,
    counterparty VARCHAR(255) NOT NULL,
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL,
    issue_date DATE NOT NULL,
    due_date DATE,
    treasury_account_id UUID REFERENCES treasury_accounts(id),
    settlement_transaction_id UUID REFERENCES treasury_transactions(id),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_check_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_checks_org_status ON checks(organization_id, status);
";

const BILLS_SQL: &str = r"
CREATE TABLE bills (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    kind bill_kind NOT NULL,
    counterparty VARCHAR(255) NOT NULL,
    description VARCHAR(500) NOT NULL,
    issue_date DATE NOT NULL,
    due_date DATE,
    total NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL,
    status bill_status NOT NULL DEFAULT 'pending',
    category_account_id UUID REFERENCES chart_accounts(id),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_bill_total_positive CHECK (total > 0)
);

CREATE INDEX idx_bills_org_kind_status ON bills(organization_id, kind, status);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    bill_id UUID NOT NULL REFERENCES bills(id) ON DELETE CASCADE,
    treasury_account_id UUID NOT NULL REFERENCES treasury_accounts(id),
    amount NUMERIC(19, 4) NOT NULL,
    currency CHAR(3) NOT NULL,
    payment_date DATE NOT NULL,
    note VARCHAR(500),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_payment_amount_positive CHECK (amount > 0)
);

CREATE INDEX idx_payments_bill ON payments(bill_id);
CREATE INDEX idx_payments_org ON payments(organization_id);
";

const STOCK_ITEMS_SQL: &str = r"
CREATE TABLE stock_items (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    name VARCHAR(255) NOT NULL,
    unit VARCHAR(20) NOT NULL,
    quantity_on_hand NUMERIC(19, 4) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_quantity_non_negative CHECK (quantity_on_hand >= 0)
);

CREATE INDEX idx_stock_items_org ON stock_items(organization_id);
";

const STOCK_MOVEMENTS_SQL: &str = r"
CREATE TABLE stock_movements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    item_id UUID NOT NULL REFERENCES stock_items(id) ON DELETE CASCADE,
    kind movement_kind NOT NULL,
    quantity NUMERIC(19, 4) NOT NULL,
    movement_date DATE NOT NULL,
    note VARCHAR(500),
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_stock_movements_item_date ON stock_movements(item_id, movement_date DESC);
";

const WIKI_PAGES_SQL: &str = r"
CREATE TABLE wiki_pages (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    organization_id UUID NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
    slug VARCHAR(150) NOT NULL,
    title VARCHAR(255) NOT NULL,
    body TEXT NOT NULL DEFAULT '',
    is_published BOOLEAN NOT NULL DEFAULT false,
    revision INTEGER NOT NULL DEFAULT 1,
    created_by UUID REFERENCES users(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    UNIQUE (organization_id, slug)
);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS wiki_pages CASCADE;
DROP TABLE IF EXISTS stock_movements CASCADE;
DROP TABLE IF EXISTS stock_items CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS bills CASCADE;
DROP TABLE IF EXISTS checks CASCADE;
DROP TABLE IF EXISTS account_balances CASCADE;
DROP TABLE IF EXISTS treasury_transactions CASCADE;
DROP TABLE IF EXISTS treasury_accounts CASCADE;
DROP TABLE IF EXISTS journal_lines CASCADE;
DROP TABLE IF EXISTS journal_entries CASCADE;
DROP TABLE IF EXISTS chart_accounts CASCADE;
DROP TABLE IF EXISTS sessions CASCADE;
DROP TABLE IF EXISTS organization_users CASCADE;
DROP TABLE IF EXISTS organizations CASCADE;
DROP TABLE IF EXISTS users CASCADE;

DROP TYPE IF EXISTS movement_kind;
DROP TYPE IF EXISTS bill_status;
DROP TYPE IF EXISTS bill_kind;
DROP TYPE IF EXISTS check_status;
DROP TYPE IF EXISTS check_kind;
DROP TYPE IF EXISTS transaction_direction;
DROP TYPE IF EXISTS treasury_account_kind;
DROP TYPE IF EXISTS entry_source;
DROP TYPE IF EXISTS journal_side;
DROP TYPE IF EXISTS account_type;
DROP TYPE IF EXISTS user_role;
";
