pub mod ai;
pub mod firebase;
pub mod memory;
pub mod utils;
