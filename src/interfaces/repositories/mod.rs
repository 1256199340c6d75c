pub mod blob;
pub mod guidance;
pub mod report;
