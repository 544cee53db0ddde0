/// Chess domain types.
pub mod chess;
/// Move generation, legality resolution and game bookkeeping.
pub mod rules;
