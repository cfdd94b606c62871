pub mod account;
pub mod account_phone;
pub mod company;
