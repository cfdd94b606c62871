pub mod error;
pub mod normalize;
pub mod repos;
pub mod service;
pub mod sweeper;
pub mod validation;
