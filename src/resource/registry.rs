//! Resource Registry - the provider's static type tables
//!
//! Maps every resource type and data-source type the provider manages to
//! its API service and capability set. The tables are compiled in; the
//! registry is built on first access and read-only afterwards, so lookups
//! are total and always return the same answer for the same name.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::bmc::client::Service;
use crate::error::{ProviderError, Result};

/// A lifecycle operation on a managed type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        };
        f.write_str(name)
    }
}

/// The operations a registered type supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl CapabilitySet {
    /// Full lifecycle, as every managed resource supports.
    pub const CRUD: Self = Self {
        create: true,
        read: true,
        update: true,
        delete: true,
    };

    /// Read-only, as every data source supports.
    pub const READ_ONLY: Self = Self {
        create: false,
        read: true,
        update: false,
        delete: false,
    };

    pub fn supports(self, operation: Operation) -> bool {
        match operation {
            Operation::Create => self.create,
            Operation::Read => self.read,
            Operation::Update => self.update,
            Operation::Delete => self.delete,
        }
    }
}

/// One registered type.
#[derive(Debug, Clone, Copy)]
pub struct RegistryEntry {
    pub type_name: &'static str,
    pub service: Service,
    pub capabilities: CapabilitySet,
}

/// Managed resource types (full lifecycle), by API service.
const RESOURCE_TYPES: &[(&str, Service)] = &[
    ("baremetal_core_console_history", Service::Core),
    ("baremetal_core_cpe", Service::Core),
    ("baremetal_core_dhcp_options", Service::Core),
    ("baremetal_core_drg", Service::Core),
    ("baremetal_core_drg_attachment", Service::Core),
    ("baremetal_core_image", Service::Core),
    ("baremetal_core_instance", Service::Core),
    ("baremetal_core_internet_gateway", Service::Core),
    ("baremetal_core_ipsec", Service::Core),
    ("baremetal_core_route_table", Service::Core),
    ("baremetal_core_security_list", Service::Core),
    ("baremetal_core_subnet", Service::Core),
    ("baremetal_core_virtual_network", Service::Core),
    ("baremetal_core_volume", Service::Core),
    ("baremetal_core_volume_attachment", Service::Core),
    ("baremetal_core_volume_backup", Service::Core),
    ("baremetal_database_db_system", Service::Database),
    ("baremetal_identity_api_key", Service::Identity),
    ("baremetal_identity_compartment", Service::Identity),
    ("baremetal_identity_group", Service::Identity),
    ("baremetal_identity_policy", Service::Identity),
    ("baremetal_identity_swift_password", Service::Identity),
    ("baremetal_identity_ui_password", Service::Identity),
    ("baremetal_identity_user", Service::Identity),
    ("baremetal_identity_user_group_membership", Service::Identity),
    ("baremetal_load_balancer", Service::LoadBalancer),
    ("baremetal_load_balancer_backend", Service::LoadBalancer),
    ("baremetal_load_balancer_backendset", Service::LoadBalancer),
    ("baremetal_load_balancer_certificate", Service::LoadBalancer),
    ("baremetal_load_balancer_listener", Service::LoadBalancer),
    ("baremetal_objectstorage_bucket", Service::ObjectStorage),
    ("baremetal_objectstorage_object", Service::ObjectStorage),
    ("baremetal_objectstorage_preauthrequest", Service::ObjectStorage),
];

/// Data-source types (read-only), by API service.
const DATA_SOURCE_TYPES: &[(&str, Service)] = &[
    ("baremetal_core_console_history_data", Service::Core),
    ("baremetal_core_cpes", Service::Core),
    ("baremetal_core_dhcp_options", Service::Core),
    ("baremetal_core_drg_attachments", Service::Core),
    ("baremetal_core_drgs", Service::Core),
    ("baremetal_core_images", Service::Core),
    ("baremetal_core_instance_credentials", Service::Core),
    ("baremetal_core_instances", Service::Core),
    ("baremetal_core_internet_gateways", Service::Core),
    ("baremetal_core_ipsec_config", Service::Core),
    ("baremetal_core_ipsec_connections", Service::Core),
    ("baremetal_core_ipsec_status", Service::Core),
    ("baremetal_core_route_tables", Service::Core),
    ("baremetal_core_security_lists", Service::Core),
    ("baremetal_core_shape", Service::Core),
    ("baremetal_core_subnets", Service::Core),
    ("baremetal_core_virtual_networks", Service::Core),
    ("baremetal_core_vnic", Service::Core),
    ("baremetal_core_vnic_attachments", Service::Core),
    ("baremetal_core_volume_attachments", Service::Core),
    ("baremetal_core_volume_backups", Service::Core),
    ("baremetal_core_volumes", Service::Core),
    ("baremetal_database_database", Service::Database),
    ("baremetal_database_databases", Service::Database),
    ("baremetal_database_db_home", Service::Database),
    ("baremetal_database_db_homes", Service::Database),
    ("baremetal_database_db_node", Service::Database),
    ("baremetal_database_db_nodes", Service::Database),
    ("baremetal_database_db_system_shapes", Service::Database),
    ("baremetal_database_db_systems", Service::Database),
    ("baremetal_database_db_versions", Service::Database),
    ("baremetal_identity_api_keys", Service::Identity),
    ("baremetal_identity_availability_domains", Service::Identity),
    ("baremetal_identity_compartments", Service::Identity),
    ("baremetal_identity_groups", Service::Identity),
    ("baremetal_identity_policies", Service::Identity),
    ("baremetal_identity_swift_passwords", Service::Identity),
    ("baremetal_identity_user_group_memberships", Service::Identity),
    ("baremetal_identity_users", Service::Identity),
    ("baremetal_load_balancer_backends", Service::LoadBalancer),
    ("baremetal_load_balancer_backendsets", Service::LoadBalancer),
    ("baremetal_load_balancer_certificates", Service::LoadBalancer),
    ("baremetal_load_balancer_policies", Service::LoadBalancer),
    ("baremetal_load_balancer_protocols", Service::LoadBalancer),
    ("baremetal_load_balancer_shapes", Service::LoadBalancer),
    ("baremetal_load_balancers", Service::LoadBalancer),
    ("baremetal_objectstorage_bucket_summaries", Service::ObjectStorage),
    ("baremetal_objectstorage_namespace", Service::ObjectStorage),
    ("baremetal_objectstorage_object_head", Service::ObjectStorage),
    ("baremetal_objectstorage_objects", Service::ObjectStorage),
];

/// The two lookup tables. Resource and data-source names are separate
/// namespaces; a handful of names (e.g. `baremetal_core_dhcp_options`)
/// appear in both.
struct Registry {
    resources: HashMap<&'static str, RegistryEntry>,
    data_sources: HashMap<&'static str, RegistryEntry>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn table_to_map(
    table: &'static [(&'static str, Service)],
    capabilities: CapabilitySet,
) -> HashMap<&'static str, RegistryEntry> {
    table
        .iter()
        .map(|&(type_name, service)| {
            (
                type_name,
                RegistryEntry {
                    type_name,
                    service,
                    capabilities,
                },
            )
        })
        .collect()
}

fn get_registry() -> &'static Registry {
    REGISTRY.get_or_init(|| Registry {
        resources: table_to_map(RESOURCE_TYPES, CapabilitySet::CRUD),
        data_sources: table_to_map(DATA_SOURCE_TYPES, CapabilitySet::READ_ONLY),
    })
}

/// Look up a resource type by name.
pub fn resource_entry(type_name: &str) -> Result<&'static RegistryEntry> {
    get_registry()
        .resources
        .get(type_name)
        .ok_or_else(|| ProviderError::unknown_type(type_name))
}

/// Look up a data-source type by name.
pub fn data_source_entry(type_name: &str) -> Result<&'static RegistryEntry> {
    get_registry()
        .data_sources
        .get(type_name)
        .ok_or_else(|| ProviderError::unknown_type(type_name))
}

/// All resource type names, sorted.
pub fn resource_type_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = get_registry().resources.keys().copied().collect();
    names.sort_unstable();
    names
}

/// All data-source type names, sorted.
pub fn data_source_type_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = get_registry().data_sources.keys().copied().collect();
    names.sort_unstable();
    names
}
