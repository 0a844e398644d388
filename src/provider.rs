//! Provider configuration entry point
//!
//! [`configure`] turns a declarative [`ProviderConfig`] plus a set of
//! handlers into a ready [`ProviderContext`]: credentials are resolved
//! against the environment, the signed HTTP client is constructed, and
//! every handler is bound to its registry entry. The whole step is
//! synchronous and performs no network I/O; the first request a handler
//! makes is the first packet on the wire.

use std::collections::HashMap;
use std::sync::Arc;

use crate::bmc::client::{BmcClient, ClientBuilder};
use crate::bmc::http::TransportConfig;
use crate::config::{self, ProviderConfig};
use crate::error::{ProviderError, Result};
use crate::resource::dispatch::{BoundDataSource, BoundResource, HandlerSet};
use crate::resource::registry;

/// A configured provider: the shared client plus the bound handlers.
///
/// Lookups are by type name. Asking for a type this instance does not
/// serve, whether misspelled or simply never registered, yields
/// [`ProviderError::UnknownType`].
pub struct ProviderContext {
    client: Arc<BmcClient>,
    resources: HashMap<&'static str, BoundResource>,
    data_sources: HashMap<&'static str, BoundDataSource>,
}

impl ProviderContext {
    pub fn client(&self) -> &Arc<BmcClient> {
        &self.client
    }

    pub fn resource(&self, type_name: &str) -> Result<&BoundResource> {
        self.resources
            .get(type_name)
            .ok_or_else(|| ProviderError::unknown_type(type_name))
    }

    pub fn data_source(&self, type_name: &str) -> Result<&BoundDataSource> {
        self.data_sources
            .get(type_name)
            .ok_or_else(|| ProviderError::unknown_type(type_name))
    }

    /// Bound resource type names, sorted.
    pub fn resource_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.resources.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Bound data-source type names, sorted.
    pub fn data_source_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.data_sources.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl std::fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderContext")
            .field("region", &self.client.region())
            .field("resources", &self.resources.len())
            .field("data_sources", &self.data_sources.len())
            .finish()
    }
}

/// Resolve credentials and settings, build the signed client, and bind
/// the supplied handlers.
///
/// Failures are reported in resolution order: missing credentials first,
/// then key or client construction problems, then a handler registered
/// under a name the registry does not know.
pub fn configure(provider_config: &ProviderConfig, handlers: HandlerSet) -> Result<ProviderContext> {
    let bundle = provider_config.credentials()?;
    let transport =
        TransportConfig::from_insecure_flag(config::insecure_tls_flag_from_env().as_deref());

    let mut builder = ClientBuilder::new()
        .credentials(bundle)
        .transport(transport)
        .region(provider_config.effective_region())
        .disable_auto_retries(provider_config.effective_disable_auto_retries()?);
    if let Some(template) = config::url_template_from_env() {
        builder = builder.url_template(template);
    }
    let client = Arc::new(builder.build()?);

    let (resource_handlers, data_source_handlers) = handlers.into_parts();

    let mut resources = HashMap::with_capacity(resource_handlers.len());
    for (type_name, handler) in resource_handlers {
        let entry = registry::resource_entry(&type_name)?;
        resources.insert(
            entry.type_name,
            BoundResource::new(entry, handler, Arc::clone(&client)),
        );
    }

    let mut data_sources = HashMap::with_capacity(data_source_handlers.len());
    for (type_name, handler) in data_source_handlers {
        let entry = registry::data_source_entry(&type_name)?;
        data_sources.insert(
            entry.type_name,
            BoundDataSource::new(entry, handler, Arc::clone(&client)),
        );
    }

    tracing::info!(
        region = %client.region(),
        resources = resources.len(),
        data_sources = data_sources.len(),
        "Provider configured"
    );

    Ok(ProviderContext {
        client,
        resources,
        data_sources,
    })
}
