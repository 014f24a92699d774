//! Infrastructure layer: persistence, bootstrap, session service, config.

pub mod access;
pub mod bootstrap;
pub mod config;
pub mod records;
pub mod store;

pub use access::{AccessError, AccessService, Session, SessionMode, SessionSettings};
pub use config::{AppConfig, ConfigError};
pub use store::{AccessStore, InMemoryAccessStore, PostgresAccessStore, StoreError};
