pub mod medicine;
pub mod message;

pub use medicine::*;
pub use message::*;
