//! Handler traits and bound dispatchers
//!
//! The provider core knows how to reach the API; it does not know the
//! request/response shapes of individual types. Those live behind the
//! [`ResourceHandler`] and [`DataSourceHandler`] traits, implemented by the
//! caller and registered in a [`HandlerSet`]. Configuration binds each
//! handler to its registry entry and the shared client, producing
//! [`BoundResource`] / [`BoundDataSource`] values that expose only the
//! operations the type supports.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::bmc::client::BmcClient;
use crate::error::Result;
use crate::resource::registry::{CapabilitySet, RegistryEntry};

/// Lifecycle operations for a managed resource type.
///
/// Each method receives the shared signed client and works in JSON values;
/// `create` and `update` take the desired state, `read` and `delete` take
/// the resource identifier (an OCID).
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn create(&self, client: &BmcClient, desired: Value) -> Result<Value>;

    async fn read(&self, client: &BmcClient, id: &str) -> Result<Value>;

    async fn update(&self, client: &BmcClient, id: &str, desired: Value) -> Result<Value>;

    async fn delete(&self, client: &BmcClient, id: &str) -> Result<()>;
}

/// Read operation for a data-source type. Filters are type-specific and
/// passed through as JSON.
#[async_trait]
pub trait DataSourceHandler: Send + Sync {
    async fn read(&self, client: &BmcClient, filters: Value) -> Result<Value>;
}

/// Handlers supplied by the caller, keyed by type name.
///
/// Registration is name-based; the names are checked against the registry
/// when the provider is configured, so a typo surfaces as
/// [`ProviderError::UnknownType`](crate::error::ProviderError::UnknownType)
/// before any operation runs.
#[derive(Default)]
pub struct HandlerSet {
    resources: HashMap<String, Arc<dyn ResourceHandler>>,
    data_sources: HashMap<String, Arc<dyn DataSourceHandler>>,
}

impl HandlerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resource(mut self, type_name: &str, handler: Arc<dyn ResourceHandler>) -> Self {
        self.resources.insert(type_name.to_string(), handler);
        self
    }

    pub fn data_source(mut self, type_name: &str, handler: Arc<dyn DataSourceHandler>) -> Self {
        self.data_sources.insert(type_name.to_string(), handler);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty() && self.data_sources.is_empty()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        HashMap<String, Arc<dyn ResourceHandler>>,
        HashMap<String, Arc<dyn DataSourceHandler>>,
    ) {
        (self.resources, self.data_sources)
    }
}

impl std::fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandlerSet")
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .finish()
    }
}

/// A resource handler bound to its registry entry and the shared client.
#[derive(Clone)]
pub struct BoundResource {
    entry: &'static RegistryEntry,
    handler: Arc<dyn ResourceHandler>,
    client: Arc<BmcClient>,
}

impl BoundResource {
    pub(crate) fn new(
        entry: &'static RegistryEntry,
        handler: Arc<dyn ResourceHandler>,
        client: Arc<BmcClient>,
    ) -> Self {
        Self {
            entry,
            handler,
            client,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.entry.type_name
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.entry.capabilities
    }

    pub async fn create(&self, desired: Value) -> Result<Value> {
        self.handler.create(&self.client, desired).await
    }

    pub async fn read(&self, id: &str) -> Result<Value> {
        self.handler.read(&self.client, id).await
    }

    pub async fn update(&self, id: &str, desired: Value) -> Result<Value> {
        self.handler.update(&self.client, id, desired).await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.handler.delete(&self.client, id).await
    }
}

impl std::fmt::Debug for BoundResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundResource")
            .field("type_name", &self.entry.type_name)
            .field("service", &self.entry.service)
            .finish()
    }
}

/// A data-source handler bound to its registry entry and the shared client.
#[derive(Clone)]
pub struct BoundDataSource {
    entry: &'static RegistryEntry,
    handler: Arc<dyn DataSourceHandler>,
    client: Arc<BmcClient>,
}

impl BoundDataSource {
    pub(crate) fn new(
        entry: &'static RegistryEntry,
        handler: Arc<dyn DataSourceHandler>,
        client: Arc<BmcClient>,
    ) -> Self {
        Self {
            entry,
            handler,
            client,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.entry.type_name
    }

    pub fn capabilities(&self) -> CapabilitySet {
        self.entry.capabilities
    }

    pub async fn read(&self, filters: Value) -> Result<Value> {
        self.handler.read(&self.client, filters).await
    }
}

impl std::fmt::Debug for BoundDataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundDataSource")
            .field("type_name", &self.entry.type_name)
            .field("service", &self.entry.service)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullHandler;

    #[async_trait]
    impl ResourceHandler for NullHandler {
        async fn create(&self, _client: &BmcClient, desired: Value) -> Result<Value> {
            Ok(desired)
        }

        async fn read(&self, _client: &BmcClient, id: &str) -> Result<Value> {
            Ok(Value::String(id.to_string()))
        }

        async fn update(&self, _client: &BmcClient, _id: &str, desired: Value) -> Result<Value> {
            Ok(desired)
        }

        async fn delete(&self, _client: &BmcClient, _id: &str) -> Result<()> {
            Ok(())
        }
    }

    #[async_trait]
    impl DataSourceHandler for NullHandler {
        async fn read(&self, _client: &BmcClient, filters: Value) -> Result<Value> {
            Ok(filters)
        }
    }

    #[test]
    fn test_handler_set_registration() {
        let set = HandlerSet::new()
            .resource("baremetal_core_instance", Arc::new(NullHandler))
            .resource("baremetal_core_subnet", Arc::new(NullHandler))
            .data_source("baremetal_core_instances", Arc::new(NullHandler));
        assert!(!set.is_empty());

        let (resources, data_sources) = set.into_parts();
        assert_eq!(resources.len(), 2);
        assert_eq!(data_sources.len(), 1);
        assert!(resources.contains_key("baremetal_core_instance"));
        assert!(data_sources.contains_key("baremetal_core_instances"));
    }

    #[test]
    fn test_empty_handler_set() {
        assert!(HandlerSet::new().is_empty());
        assert_eq!(
            format!("{:?}", HandlerSet::new()),
            "HandlerSet { resources: 0, data_sources: 0 }"
        );
    }

    #[test]
    fn test_registering_same_name_twice_keeps_last() {
        let set = HandlerSet::new()
            .resource("baremetal_core_volume", Arc::new(NullHandler))
            .resource("baremetal_core_volume", Arc::new(NullHandler));
        let (resources, _) = set.into_parts();
        assert_eq!(resources.len(), 1);
    }
}
