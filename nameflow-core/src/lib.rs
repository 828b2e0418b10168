//! Nameflow Core Library
//!
//! Provides the business logic of the DNS token gateway, including:
//! - Bearer token codec and authentication (Auth Service)
//! - Policy authorization and realm scope matching (Authz Service)
//! - Backend resolution and record operations (Gateway Service)
//!
//! This library is designed to be platform-independent, abstracting the storage
//! and audit layers through traits; the HTTP surface is supplied by the host.

pub mod crypto;
pub mod error;
pub mod realm_matcher;
pub mod services;
pub mod token;
pub mod traits;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult, OutwardSignal};
pub use services::{AuthService, AuthSession, AuthzService, GatewayService, ServiceContext};
pub use traits::{ActivityRecorder, CredentialStore};
