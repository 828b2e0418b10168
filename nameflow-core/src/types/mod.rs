//! 核心类型定义

mod account;
mod activity;
mod backend_binding;
mod realm;
mod token;

pub use account::Account;
pub use activity::{ActivityEvent, ActivityOutcome, CallerContext, scrub_secrets};
pub use backend_binding::{BackendService, DomainRoot};
pub use realm::{ApprovalStatus, Realm, RealmBackendLink, RealmType, RecordOperation};
pub use token::ApiToken;
