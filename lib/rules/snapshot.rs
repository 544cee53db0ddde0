use crate::chess::{Board, Color, File, Flag, InvalidPiece, Ledger, Piece, Rank, Square};
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The persisted state of a game.
///
/// The placement lists ranks from the eighth down to the first, one
/// character per file, `.` for empty squares.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename = "snapshot")]
pub struct Snapshot {
    pub placement: Vec<String>,
    pub ledger: Ledger,
    pub turn: Color,
    pub halfturns: u32,
}

/// The reason why a [`Snapshot`] does not describe a valid [`Board`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Hash, Error, From)]
#[error(ignore)]
pub enum InvalidSnapshot {
    #[display(fmt = "expected {} ranks in the placement, found {}", Board::SIZE, _0)]
    #[from(ignore)]
    RankCount(usize),

    #[display(fmt = "expected {} squares on rank {}, found {}", Board::SIZE, _0, _1)]
    #[from(ignore)]
    RankWidth(Rank, usize),

    #[display(fmt = "{}", _0)]
    UnknownPiece(InvalidPiece),

    #[display(fmt = "ledger entry `{:?}` on {} cannot have lifetime `{:?}`", _1, _0, _2)]
    #[from(ignore)]
    EntryLifetime(Square, Flag, Option<u8>),
}

impl Snapshot {
    /// Captures the state of a [`Board`] with the side to move and the half-turn counter.
    pub fn new(board: &Board, turn: Color, halfturns: u32) -> Self {
        let placement = Rank::iter()
            .rev()
            .map(|r| {
                File::iter()
                    .map(|f| board.piece_at(Square::new(f, r)).map_or('.', char::from))
                    .collect()
            })
            .collect();

        Snapshot {
            placement,
            ledger: board.ledger().clone(),
            turn,
            halfturns,
        }
    }

    /// Rebuilds the [`Board`] this snapshot describes.
    pub fn board(&self) -> Result<Board, InvalidSnapshot> {
        if self.placement.len() != Board::SIZE {
            return Err(InvalidSnapshot::RankCount(self.placement.len()));
        }

        let mut pieces = Vec::new();

        for (rank, row) in Rank::iter().rev().zip(&self.placement) {
            let width = row.chars().count();
            if width != Board::SIZE {
                return Err(InvalidSnapshot::RankWidth(rank, width));
            }

            for (file, c) in File::iter().zip(row.chars()) {
                if c != '.' {
                    pieces.push((Square::new(file, rank), Piece::try_from(c)?));
                }
            }
        }

        for e in self.ledger.iter() {
            let valid = match e.flag {
                Flag::HasMoved => e.lifetime.is_none(),
                Flag::LongMove => e.lifetime.is_some_and(|l| l > 0),
            };

            if !valid {
                return Err(InvalidSnapshot::EntryLifetime(e.square, e.flag, e.lifetime));
            }
        }

        Ok(Board::with_ledger(pieces, self.ledger.clone()))
    }
}

/// Compact RON, or pretty printed RON in the alternate form.
impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
        } else {
            ron::ser::to_string(self)
        };

        f.write_str(&text.map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Snapshot`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse game snapshot")]
pub struct ParseSnapshotError(ron::de::SpannedError);

impl FromStr for Snapshot {
    type Err = ParseSnapshotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}
