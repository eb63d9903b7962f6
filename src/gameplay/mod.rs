pub mod action;
pub use action::*;

pub mod round;
pub use round::*;

pub mod validator;
pub use validator::*;
