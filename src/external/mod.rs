pub mod resend;
pub mod templates;

pub use resend::*;
