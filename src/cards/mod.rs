pub mod card;
pub use card::*;

pub mod deck;
pub use deck::*;

pub mod street;
pub use street::*;

pub mod strength;
pub use strength::*;

/// Two private cards, as dealt. Order is preserved for the wire.
pub type Hole = [card::Card; 2];
