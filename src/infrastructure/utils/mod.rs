pub mod dates;
pub mod image;
