//! Database seeder for Obralis development and testing.
//!
//! Seeds a demo user, organization, chart of accounts, and treasury
//! accounts for local development.
//!
//! Usage: cargo run --bin seeder

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use obralis_core::auth::hash_password;
use obralis_db::entities::{
    chart_accounts, organization_users, organizations, treasury_accounts,
    sea_orm_active_enums::{AccountType, TreasuryAccountKind, UserRole},
    users,
};

/// Demo organization ID (consistent for all seeds)
const DEMO_ORG_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo user ID (consistent for all seeds)
const DEMO_USER_ID: &str = "00000000-0000-0000-0000-000000000002";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = obralis_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo user...");
    seed_demo_user(&db).await;

    println!("Seeding demo organization...");
    seed_demo_organization(&db).await;

    println!("Seeding chart of accounts...");
    seed_chart_accounts(&db).await;

    println!("Seeding treasury accounts...");
    seed_treasury_accounts(&db).await;

    println!("Seeding complete!");
    println!("  Login: demo@obralis.dev / demo-password");
}

fn demo_org_id() -> Uuid {
    Uuid::parse_str(DEMO_ORG_ID).unwrap()
}

fn demo_user_id() -> Uuid {
    Uuid::parse_str(DEMO_USER_ID).unwrap()
}

/// Seeds a demo user for development.
async fn seed_demo_user(db: &DatabaseConnection) {
    if users::Entity::find_by_id(demo_user_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo user already exists, skipping...");
        return;
    }

    let now = chrono::Utc::now().into();
    let user = users::ActiveModel {
        id: Set(demo_user_id()),
        email: Set("demo@obralis.dev".to_string()),
        password_hash: Set(hash_password("demo-password").expect("Failed to hash password")),
        full_name: Set("Demo User".to_string()),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    user.insert(db).await.expect("Failed to insert demo user");
}

/// Seeds the demo organization with the demo user as owner.
async fn seed_demo_organization(db: &DatabaseConnection) {
    if organizations::Entity::find_by_id(demo_org_id())
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Demo organization already exists, skipping...");
        return;
    }

    let now = chrono::Utc::now().into();
    let org = organizations::ActiveModel {
        id: Set(demo_org_id()),
        name: Set("Obralis Demo Construction".to_string()),
        slug: Set("obralis-demo".to_string()),
        base_currency: Set("EUR".to_string()),
        accounting_enabled: Set(true),
        receivable_account_id: Set(None),
        payable_account_id: Set(None),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };
    org.insert(db)
        .await
        .expect("Failed to insert demo organization");

    let membership = organization_users::ActiveModel {
        user_id: Set(demo_user_id()),
        organization_id: Set(demo_org_id()),
        role: Set(UserRole::Owner),
        created_at: Set(now),
        updated_at: Set(now),
    };
    membership
        .insert(db)
        .await
        .expect("Failed to insert demo membership");
}

/// Seeds a minimal construction-flavored chart of accounts.
async fn seed_chart_accounts(db: &DatabaseConnection) {
    let accounts: &[(&str, &str, AccountType)] = &[
        ("1000", "Cash and Banks", AccountType::Asset),
        ("1200", "Accounts Receivable", AccountType::Asset),
        ("2000", "Accounts Payable", AccountType::Liability),
        ("3000", "Owner Equity", AccountType::Equity),
        ("4000", "Construction Revenue", AccountType::Revenue),
        ("5000", "Materials", AccountType::Expense),
        ("5100", "Subcontractors", AccountType::Expense),
        ("5200", "Site Overheads", AccountType::Expense),
    ];

    let now = chrono::Utc::now().into();
    for (code, name, account_type) in accounts {
        let exists = chart_accounts::Entity::find()
            .filter(chart_accounts::Column::OrganizationId.eq(demo_org_id()))
            .filter(chart_accounts::Column::Code.eq(*code))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Account {code} already exists, skipping...");
            continue;
        }

        let account = chart_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(demo_org_id()),
            parent_id: Set(None),
            code: Set((*code).to_string()),
            name: Set((*name).to_string()),
            account_type: Set(*account_type),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account
            .insert(db)
            .await
            .expect("Failed to insert chart account");
    }
}

/// Seeds a cash box and a bank account.
async fn seed_treasury_accounts(db: &DatabaseConnection) {
    let cash_ledger = ledger_account_by_code(db, "1000").await;

    let accounts: &[(&str, TreasuryAccountKind)] = &[
        ("Site Cash Box", TreasuryAccountKind::CashBox),
        ("Main Bank Account", TreasuryAccountKind::BankAccount),
    ];

    let now = chrono::Utc::now().into();
    for (name, kind) in accounts {
        let exists = treasury_accounts::Entity::find()
            .filter(treasury_accounts::Column::OrganizationId.eq(demo_org_id()))
            .filter(treasury_accounts::Column::Name.eq(*name))
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some();
        if exists {
            println!("  Treasury account {name} already exists, skipping...");
            continue;
        }

        let account = treasury_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            organization_id: Set(demo_org_id()),
            name: Set((*name).to_string()),
            kind: Set(*kind),
            currency: Set("EUR".to_string()),
            ledger_account_id: Set(cash_ledger),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        account
            .insert(db)
            .await
            .expect("Failed to insert treasury account");
    }
}

async fn ledger_account_by_code(db: &DatabaseConnection, code: &str) -> Option<Uuid> {
    chart_accounts::Entity::find()
        .filter(chart_accounts::Column::OrganizationId.eq(demo_org_id()))
        .filter(chart_accounts::Column::Code.eq(code))
        .one(db)
        .await
        .ok()
        .flatten()
        .map(|a| a.id)
}
