pub mod common;
pub mod complaint;
pub mod profile;
pub mod verification_code;

pub use common::*;
pub use complaint::*;
pub use profile::*;
pub use verification_code::*;
