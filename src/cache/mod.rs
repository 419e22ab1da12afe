pub mod store;
pub mod ttl;

pub use store::{now_millis, TtlCache};
pub use ttl::TtlTable;
