//! Bare Metal Cloud API interaction module
//!
//! This module provides the core functionality for talking to the Oracle
//! Bare Metal Cloud Services REST APIs: credential handling, request
//! signing, transport selection, and the session client.
//!
//! # Module Structure
//!
//! - [`auth`] - Credential bundle and RSA request signing
//! - [`client`] - Session client, endpoint routing, and retrying verbs
//! - [`http`] - Transport selection and HTTP utilities
//!
//! # Example
//!
//! ```ignore
//! use baremetal_provider::bmc::client::{ClientBuilder, Service};
//!
//! async fn example(bundle: baremetal_provider::bmc::auth::CredentialBundle)
//!     -> baremetal_provider::Result<()>
//! {
//!     let client = ClientBuilder::new().credentials(bundle).build()?;
//!     let instances = client.get(Service::Core, "instances").await?;
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod http;
