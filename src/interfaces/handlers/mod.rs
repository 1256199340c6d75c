pub mod guidance;
pub mod home;
pub mod reports;
pub mod system;
