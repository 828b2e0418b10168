use serde::{Deserialize, Serialize};

/// Marker used for records at the zone apex (the bare zone name).
pub const APEX_MARKER: &str = "@";

// ============ Record Types ============

/// DNS record type identifier.
///
/// Serialized as uppercase strings (`"A"`, `"AAAA"`, `"CNAME"`, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Text record.
    Txt,
    /// Name server record.
    Ns,
    /// Service locator record.
    Srv,
    /// Certificate Authority Authorization record.
    Caa,
}

impl RecordType {
    /// Uppercase wire representation of the record type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Ns => "NS",
            Self::Srv => "SRV",
            Self::Caa => "CAA",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AAAA" => Ok(Self::Aaaa),
            "CNAME" => Ok(Self::Cname),
            "MX" => Ok(Self::Mx),
            "TXT" => Ok(Self::Txt),
            "NS" => Ok(Self::Ns),
            "SRV" => Ok(Self::Srv),
            "CAA" => Ok(Self::Caa),
            other => Err(format!("unknown record type: {other}")),
        }
    }
}

/// Canonical DNS record shape shared by all backends.
///
/// Every adapter normalizes its native record representation into this shape
/// (and back). Normalization is total: a missing hostname becomes the apex
/// marker [`APEX_MARKER`], a missing TTL becomes the backend's default, so
/// downstream filtering never observes absent required fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Backend-specific record identifier. For backends without native ids
    /// this is a deterministic digest of (hostname, type, destination).
    pub id: String,
    /// Record hostname relative to the zone (`"www"`, or `"@"` for apex).
    pub hostname: String,
    /// Record type.
    pub record_type: RecordType,
    /// Record destination (IP address, target hostname, text payload...).
    pub destination: String,
    /// Priority for MX/SRV records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Time to live in seconds.
    pub ttl: u32,
}

/// Payload for creating or replacing a DNS record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecord {
    /// Record hostname relative to the zone (`"www"`, or `"@"` for apex).
    pub hostname: String,
    /// Record type.
    pub record_type: RecordType,
    /// Record destination.
    pub destination: String,
    /// Priority for MX/SRV records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    /// Time to live in seconds. `None` = backend default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

// ============ Zone Types ============

/// Status of a zone within a DNS backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneStatus {
    /// Zone is active and resolving.
    Active,
    /// Zone is pending activation/verification.
    Pending,
    /// Zone is in an error state.
    Error,
    /// Status could not be determined.
    Unknown,
}

/// A zone served by a DNS backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    /// Backend-specific zone identifier (often the zone name itself).
    pub id: String,
    /// Zone name (e.g., `"example.com"`).
    pub name: String,
    /// Current zone status.
    pub status: ZoneStatus,
}

/// SOA-level information about a zone.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    /// Zone name.
    pub name: String,
    /// Authoritative name servers, where the backend exposes them.
    pub name_servers: Vec<String>,
    /// Default TTL for the zone, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_ttl: Option<u32>,
    /// Zone serial, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    /// Whether DNSSEC is enabled, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec: Option<bool>,
}

/// How a backend applies record mutations.
///
/// Full-replace backends have no independently addressable per-record
/// mutation primitive: every change resubmits the zone's entire record set,
/// so concurrent mutations against one zone can clobber each other unless the
/// caller serializes them (see `ZoneLocks`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationStrategy {
    /// Fetch the whole set, recompute in memory, submit the whole set back.
    FullReplace,
    /// Targeted add/replace/delete addressed by record name + type.
    Patch,
}

// ============ Backend Metadata ============

/// Identifies which DNS backend implementation to use.
///
/// Each variant is gated behind its corresponding feature flag.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// netcup CCP DNS API. Requires feature `netcup`.
    #[cfg(feature = "netcup")]
    Netcup,
    /// deSEC DNS API. Requires feature `desec`.
    #[cfg(feature = "desec")]
    Desec,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "netcup")]
            Self::Netcup => write!(f, "netcup"),
            #[cfg(feature = "desec")]
            Self::Desec => write!(f, "desec"),
        }
    }
}

/// The input type of a credential field (affects UI rendering).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Plain text input.
    Text,
    /// Masked/password input.
    Password,
}

/// Definition of a single credential field required by a backend.
///
/// The resolver validates stored configuration blobs against this schema
/// before constructing an adapter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialField {
    /// Machine-readable field key (e.g., `"apiKey"`).
    pub key: String,
    /// Human-readable label (e.g., `"API Key"`).
    pub label: String,
    /// Input type for UI rendering.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Optional help/description text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,
}

/// Static metadata describing a DNS backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendMetadata {
    /// Backend kind identifier.
    pub id: BackendKind,
    /// Human-readable backend name.
    pub name: String,
    /// Short description of the backend.
    pub description: String,
    /// How this backend applies record mutations.
    pub mutation_strategy: MutationStrategy,
    /// Credential fields required to authenticate with this backend.
    pub required_fields: Vec<CredentialField>,
    /// Default TTL applied when a record omits one.
    pub default_ttl: u32,
}

// ============ Credential Types ============

/// Validation error for backend credentials.
///
/// Returned when a stored configuration blob does not satisfy the backend's
/// declared credential schema. Distinct from connectivity errors by design.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CredentialValidationError {
    /// A required credential field is missing entirely.
    MissingField {
        /// Which backend the error relates to.
        backend: BackendKind,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// A credential field is present but empty/whitespace-only.
    EmptyField {
        /// Which backend the error relates to.
        backend: BackendKind,
        /// Machine-readable field key.
        field: String,
        /// Human-readable field label.
        label: String,
    },
    /// The blob is not an object, or the backend kind is unknown/disabled.
    InvalidShape {
        /// Which backend the error relates to.
        backend: BackendKind,
        /// Description of what's wrong.
        reason: String,
    },
}

impl std::fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField { label, .. } => write!(f, "Missing required field: {label}"),
            Self::EmptyField { label, .. } => write!(f, "Field must not be empty: {label}"),
            Self::InvalidShape { reason, .. } => write!(f, "{reason}"),
        }
    }
}

impl std::error::Error for CredentialValidationError {}

/// Type-safe credential container for all supported DNS backends.
///
/// # Serialization
///
/// Serialized as a tagged enum with `"backend"` as the tag and
/// `"credentials"` as the content:
///
/// ```json
/// { "backend": "desec", "credentials": { "api_token": "..." } }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "backend", content = "credentials")]
pub enum BackendCredentials {
    /// netcup credentials. Requires feature `netcup`.
    #[cfg(feature = "netcup")]
    #[serde(rename = "netcup")]
    Netcup {
        /// netcup customer number.
        customer_number: String,
        /// CCP API key.
        api_key: String,
        /// CCP API password.
        api_password: String,
    },

    /// deSEC credentials. Requires feature `desec`.
    #[cfg(feature = "desec")]
    #[serde(rename = "desec")]
    Desec {
        /// deSEC API token.
        api_token: String,
    },
}

impl BackendCredentials {
    /// Construct credentials from a stored configuration blob, validating the
    /// backend's declared field schema.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialValidationError`] if the blob is not an object or a
    /// required field is missing or empty.
    pub fn from_config(
        kind: BackendKind,
        config: &serde_json::Value,
    ) -> std::result::Result<Self, CredentialValidationError> {
        let obj = config
            .as_object()
            .ok_or(CredentialValidationError::InvalidShape {
                backend: kind,
                reason: "configuration blob must be a JSON object".to_string(),
            })?;

        let get = |key: &str, label: &str| -> std::result::Result<String, CredentialValidationError> {
            match obj.get(key).and_then(serde_json::Value::as_str) {
                None => Err(CredentialValidationError::MissingField {
                    backend: kind,
                    field: key.to_string(),
                    label: label.to_string(),
                }),
                Some(v) if v.trim().is_empty() => Err(CredentialValidationError::EmptyField {
                    backend: kind,
                    field: key.to_string(),
                    label: label.to_string(),
                }),
                Some(v) => Ok(v.to_string()),
            }
        };

        match kind {
            #[cfg(feature = "netcup")]
            BackendKind::Netcup => Ok(Self::Netcup {
                customer_number: get("customerNumber", "Customer Number")?,
                api_key: get("apiKey", "API Key")?,
                api_password: get("apiPassword", "API Password")?,
            }),
            #[cfg(feature = "desec")]
            BackendKind::Desec => Ok(Self::Desec {
                api_token: get("apiToken", "API Token")?,
            }),
        }
    }

    /// Returns the [`BackendKind`] corresponding to this credential variant.
    #[must_use]
    pub fn kind(&self) -> BackendKind {
        match self {
            #[cfg(feature = "netcup")]
            Self::Netcup { .. } => BackendKind::Netcup,
            #[cfg(feature = "desec")]
            Self::Desec { .. } => BackendKind::Desec,
        }
    }
}
