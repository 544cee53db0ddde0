mod game;
mod movegen;
mod resolver;
mod snapshot;

pub use game::*;
pub use movegen::*;
pub use resolver::*;
pub use snapshot::*;
