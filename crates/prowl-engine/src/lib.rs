pub mod backend;
pub mod explore;
pub mod tuning;

pub use prowl_common::protocol;
pub use prowl_common::trace;
