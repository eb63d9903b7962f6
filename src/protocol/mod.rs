pub mod message;
pub use message::*;

pub mod client;
pub use client::*;

pub mod mirror;
pub use mirror::*;
