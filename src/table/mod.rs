pub mod config;
pub use config::*;

pub mod audit;
pub use audit::*;

pub mod table;
pub use table::*;
