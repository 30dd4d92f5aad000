//! Configuration for a transfer run.
//!
//! Defaults reproduce a stock regtest node (`127.0.0.1:18443`, wallet
//! `default`). A TOML file can override any field, and CLI flags override
//! the file.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::{Config, LoggingConfig, RpcConfig, TransferConfig};
pub use validation::{ValidationError, validate_config};
