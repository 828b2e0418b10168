//! DNS Backend 实现

pub(crate) mod common;

#[cfg(feature = "desec")]
mod desec;
#[cfg(feature = "netcup")]
mod netcup;

#[cfg(feature = "desec")]
pub use desec::DesecBackend;
#[cfg(feature = "netcup")]
pub use netcup::NetcupBackend;
