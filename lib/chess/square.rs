use crate::chess::{Codec, File, InvalidCoordinate, Rank};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A square on the chess board.
#[derive(
    Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize,
)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[display(fmt = "{}{}", file, rank)]
#[serde(into = "String", try_from = "String")]
pub struct Square {
    pub file: File,
    pub rank: Rank,
}

impl Square {
    /// Constructs [`Square`] from a pair of [`File`] and [`Rank`].
    #[inline(always)]
    pub fn new(file: File, rank: Rank) -> Self {
        Square { file, rank }
    }

    /// Constructs [`Square`] from zero-based file and rank indices, if both are on the board.
    #[inline(always)]
    pub fn from_indices(file: i8, rank: i8) -> Option<Self> {
        Some(Square::new(File::from_index(file)?, Rank::from_index(rank)?))
    }

    /// The square `df` files and `dr` ranks away, unless that falls off the board.
    #[inline(always)]
    pub fn offset(&self, df: i8, dr: i8) -> Option<Self> {
        Square::from_indices(self.file.index() as i8 + df, self.rank.index() as i8 + dr)
    }

    /// Returns an iterator over all squares, rank by rank starting from `a1`.
    pub fn iter() -> impl Iterator<Item = Self> {
        Rank::iter().flat_map(|r| File::iter().map(move |f| Square::new(f, r)))
    }
}

impl FromStr for Square {
    type Err = InvalidCoordinate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Codec::default().parse_notation(s)
    }
}

impl From<Square> for String {
    fn from(sq: Square) -> Self {
        sq.to_string()
    }
}

impl TryFrom<String> for Square {
    type Error = InvalidCoordinate;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
