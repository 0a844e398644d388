//! Resource abstraction layer
//!
//! This module connects the provider's static type tables to caller-supplied
//! handlers. The registry says which types exist and what each one is
//! allowed to do; dispatch binds a handler to its entry and the shared
//! signed client.
//!
//! # Architecture
//!
//! - [`registry`] - Static tables of resource and data-source types
//! - [`dispatch`] - Handler traits and the bound dispatchers built at
//!   configure time
//!
//! # Example
//!
//! ```ignore
//! use crate::resource::registry::resource_entry;
//!
//! let entry = resource_entry("baremetal_core_instance")?;
//! assert!(entry.capabilities.create);
//! ```

pub mod dispatch;
pub mod registry;

pub use dispatch::{
    BoundDataSource, BoundResource, DataSourceHandler, HandlerSet, ResourceHandler,
};
pub use registry::{
    data_source_entry, data_source_type_names, resource_entry, resource_type_names,
    CapabilitySet, Operation, RegistryEntry,
};
