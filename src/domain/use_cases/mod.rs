pub mod guidance;
pub mod normalizer;
pub mod submission;
pub mod validation;
