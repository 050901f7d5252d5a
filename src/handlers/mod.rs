pub mod complaint;
pub mod health;
pub mod notification;
pub mod otp;

pub use complaint::complaint_config;
pub use health::health_config;
pub use notification::notification_config;
pub use otp::otp_config;
