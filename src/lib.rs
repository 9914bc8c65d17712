/*
 * OpenStack client bindings for Swift object storage and the RedDwarf database service
 */

// Internal modules
mod client;
pub mod models;
mod apis;
mod error;
mod auth;
pub mod config;
pub mod keystone;
pub mod live;

// Re-export public types and interfaces
pub use client::OpenStackClient;
pub use models::*;
pub use apis::*;
pub use error::{OpenStackError, OpenStackResult};
pub use auth::{Authentication, KeystoneAuth, NoAuth, TokenAuth, AUTH_TOKEN_HEADER};
pub use config::{ApiConfig, ProviderMetadata, OPENSTACK_REDDWARF, OPENSTACK_SWIFT};
pub use keystone::CredentialType;
pub use live::ApiLiveTest;

// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        OpenStackClient,
        KeystoneAuth, NoAuth, TokenAuth,
        OpenStackError, OpenStackResult,
        ApiConfig, CredentialType, OPENSTACK_REDDWARF, OPENSTACK_SWIFT,
        // Common model types
        Account, Container, Flavor, Instance, InstanceStatus,
    };
}
