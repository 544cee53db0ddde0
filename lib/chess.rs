mod board;
mod codec;
mod color;
mod file;
mod ledger;
mod r#move;
mod outcome;
mod piece;
mod promotion;
mod rank;
mod role;
mod square;

pub use board::*;
pub use codec::*;
pub use color::*;
pub use file::*;
pub use ledger::*;
pub use outcome::*;
pub use piece::*;
pub use promotion::*;
pub use r#move::*;
pub use rank::*;
pub use role::*;
pub use square::*;
