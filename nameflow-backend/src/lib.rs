//! # nameflow-backend
//!
//! A unified DNS backend abstraction library: one canonical record shape and
//! one error taxonomy across providers with very different native APIs.
//!
//! ## Supported Backends
//!
//! | Backend | Feature Flag | Auth Method | Mutation Strategy |
//! |---------|-------------|-------------|-------------------|
//! | [netcup](https://www.netcup.de/) | `netcup` | Session login (CCP API) | full-replace |
//! | [deSEC](https://desec.io/) | `desec` | Bearer token | patch |
//!
//! ## Feature Flags
//!
//! ### Backend Selection
//!
//! - **`all-backends`** *(default)* — Enable all backends listed above.
//! - **`netcup`** — Enable only the netcup backend.
//! - **`desec`** — Enable only the deSEC backend.
//!
//! ### TLS Backend
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for cross-compilation.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use nameflow_backend::{BackendCredentials, DnsBackend, create_backend};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = BackendCredentials::Desec {
//!         api_token: "your-token".to_string(),
//!     };
//!     let backend = create_backend(credentials);
//!
//!     backend.test_connection().await?;
//!
//!     for record in backend.list_records("example.com").await? {
//!         println!("{} {} -> {}", record.hostname, record.record_type, record.destination);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Mutation strategies
//!
//! Full-replace backends (netcup) implement every mutation as a whole-set
//! resubmission. Concurrent mutations against one zone can clobber each
//! other; callers serialize them with [`ZoneLocks`]. Nothing in this crate
//! retries automatically — a retried whole-set submission is not idempotent.
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, BackendError>`](BackendError). Use
//! [`BackendError::is_expected`] to pick a log level for a failure.

mod backends;
mod error;
mod http_client;
mod registry;
mod traits;
mod types;
mod utils;
mod zone_lock;

// Re-export error types
pub use error::{BackendError, Result};

// Re-export registry functions
pub use registry::{all_backend_metadata, create_backend, validate_config};

// Re-export core trait only (internal traits are not exported)
pub use traits::{DnsBackend, log_backend_error};

// Re-export types
pub use types::{
    APEX_MARKER, BackendCredentials, BackendKind, BackendMetadata, CredentialField,
    CredentialValidationError, FieldType, MutationStrategy, NewRecord, Record, RecordType, Zone,
    ZoneInfo, ZoneStatus,
};

pub use zone_lock::ZoneLocks;

// Re-export concrete backends (behind feature flags)
#[cfg(feature = "netcup")]
pub use backends::NetcupBackend;

#[cfg(feature = "desec")]
pub use backends::DesecBackend;
