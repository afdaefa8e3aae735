pub mod analyzers;
pub mod config;
pub mod error;
pub mod fetch;
pub mod filter;
pub mod infra;
pub mod output;
pub mod query;
pub mod services;
pub mod table;

pub use error::{Error, Result};
