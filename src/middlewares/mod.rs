pub mod caller;
pub mod cors;

pub use caller::{CallerContext, CallerRole};
pub use cors::create_cors;
