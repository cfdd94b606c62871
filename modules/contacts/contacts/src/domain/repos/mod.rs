mod accounts_repo;
mod companies_repo;

pub use accounts_repo::{AccountFields, AccountsRepository};
pub use companies_repo::{CompaniesRepository, CompanyFields};
