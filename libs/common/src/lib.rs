//! Common library for the glowbook client
//!
//! This crate provides functionality shared by the gateway, the booking
//! flows and the portal binary: configuration loading, error types and the
//! durable key/value storage behind the session.
//!
//! ```rust,no_run
//! use common::{FileStore, KeyValueStore, PortalConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PortalConfig::from_env()?;
//!     let store = FileStore::new(&config.session_file);
//!     store.set("auth_token", "abc")?;
//!     println!("token: {:?}", store.get("auth_token")?);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod storage;

pub use config::PortalConfig;
pub use error::{ConfigError, ConfigResult, StorageError, StorageResult};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
