//! Core data model shared by the engine and the renderers.

mod host;
mod order;
mod status;

pub use host::{HostRecord, HostSet};
pub use order::{ipv4_sort_key, sort_for_display};
pub use status::{FULL_LOSS, HostState, StatusRecord};
