pub mod selection;
pub mod traits;
pub mod types;
