pub mod complaint_service;
pub mod otp_service;

pub use complaint_service::*;
pub use otp_service::*;
