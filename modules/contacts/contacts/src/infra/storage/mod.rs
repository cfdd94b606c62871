//! Infrastructure storage layer - SeaORM persistence.
//!
//! - `entity/` - table definitions (`accounts`, `account_phones`, `companies`)
//! - `mapper.rs` - conversions between SeaORM models and SDK contract types
//! - `migrations/` - schema migrations
//! - `db.rs` - connection setup and `DbErr` translation
//!
//! Email and company name uniqueness are unique indexes. Phone uniqueness is the
//! primary key of `account_phones`, rewritten alongside the account row.

pub mod accounts_sea_repo;
pub mod companies_sea_repo;
pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

pub use accounts_sea_repo::OrmAccountsRepository;
pub use companies_sea_repo::OrmCompaniesRepository;
