//! 存储与审计抽象 Trait

mod activity_recorder;
mod credential_store;

pub use activity_recorder::ActivityRecorder;
pub use credential_store::CredentialStore;
