//! Declarative infrastructure provider for Oracle Bare Metal Cloud Services.
//!
//! The crate covers the provider's bootstrap and dispatch layer: resolving
//! credentials from explicit configuration and the process environment,
//! constructing a request-signing HTTPS client, retrying transient API
//! failures, and routing operations on declared resource and data-source
//! types to their handlers.
//!
//! # Module Structure
//!
//! - [`config`] - Settings schema and environment resolution
//! - [`bmc`] - Request signing and the HTTPS client
//! - [`retry`] - Transient-failure retry loop
//! - [`resource`] - Type registry, handler traits, bound dispatchers
//! - [`provider`] - The configure entry point
//! - [`error`] - Error types shared across the crate
//!
//! # Example
//!
//! ```ignore
//! use baremetal_provider::{configure, HandlerSet, ProviderConfig};
//!
//! let config = ProviderConfig {
//!     region: Some("us-ashburn-1".to_string()),
//!     ..ProviderConfig::default()
//! };
//! let context = configure(&config, HandlerSet::new())?;
//! let instance = context.resource("baremetal_core_instance")?;
//! ```

pub mod bmc;
pub mod config;
pub mod error;
pub mod provider;
pub mod resource;
pub mod retry;

/// Version injected at compile time via BAREMETAL_PROVIDER_VERSION env var
/// (set by CI/CD), or the crate version for local builds.
pub const VERSION: &str = match option_env!("BAREMETAL_PROVIDER_VERSION") {
    Some(v) => v,
    None => env!("CARGO_PKG_VERSION"),
};

pub use bmc::auth::{CredentialBundle, KeyMaterial, KeyPassword};
pub use bmc::client::{BmcClient, ClientBuilder, Service};
pub use bmc::http::TransportConfig;
pub use config::ProviderConfig;
pub use error::{ApiError, ProviderError, Result};
pub use provider::{configure, ProviderContext};
pub use resource::dispatch::{
    BoundDataSource, BoundResource, DataSourceHandler, HandlerSet, ResourceHandler,
};
pub use retry::{RetryPolicy, RetrySchedule};
