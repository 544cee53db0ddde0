use crate::chess::{Board, Color, Outcome};
use crate::rules::{Mode, MoveGenerator, MoveMap};
use arrayvec::ArrayVec;
use derive_more::{Display, Error, From};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, instrument};

/// Configuration for the [`Resolver`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields, rename = "options", default)]
pub struct Options {
    /// Whether to drop moves of pinned pieces when the side is not in check.
    ///
    /// When disabled, only the king's own moves are screened outside of check.
    pub filter_pins: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { filter_pins: true }
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&ron::ser::to_string(self).map_err(|_| fmt::Error)?)
    }
}

/// The reason why parsing [`Options`] failed.
#[derive(Debug, Display, Eq, PartialEq, Error, From)]
#[display(fmt = "failed to parse rules options")]
pub struct ParseOptionsError(ron::de::SpannedError);

impl FromStr for Options {
    type Err = ParseOptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(ron::de::from_str(s)?)
    }
}

/// The legal moves of a side, whether it is in check and how the game ended, if it did.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Resolution {
    pub moves: MoveMap,
    pub check: bool,
    pub outcome: Option<Outcome>,
}

/// Computes the legal moves of a side and detects terminal positions.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Resolver {
    options: Options,
}

impl Resolver {
    /// Constructs a [`Resolver`] with some [`Options`].
    pub fn new(options: Options) -> Self {
        Resolver { options }
    }

    /// This resolver's [`Options`].
    pub fn options(&self) -> Options {
        self.options
    }

    /// Resolves the position of `side` on a [`Board`].
    #[instrument(level = "trace", skip(self, board))]
    pub fn resolve(&self, board: &Board, side: Color) -> Resolution {
        let check = board.is_in_check(side);
        let mut moves = MoveGenerator::new(board).generate(side, Mode::Full);

        if check || self.options.filter_pins {
            moves = Self::simulate(board, side, moves);
        }

        let mut outcome = match (moves.is_empty(), check) {
            (true, true) => Some(Outcome::Checkmate(!side)),
            (true, false) => Some(Outcome::Stalemate),
            (false, _) => None,
        };

        if board.only_kings_remain() {
            outcome = Some(Outcome::DrawByInsufficientMaterial);
        }

        let count: usize = moves.values().map(|ms| ms.len()).sum();
        debug!(%side, moves = count, check, outcome = ?outcome);

        Resolution {
            moves,
            check,
            outcome,
        }
    }

    /// Keeps only the moves after which `side` is not in check.
    fn simulate(board: &Board, side: Color, moves: MoveMap) -> MoveMap {
        moves
            .into_iter()
            .filter_map(|(whence, ms)| {
                let kept: ArrayVec<_, 27> = ms
                    .into_iter()
                    .filter(|&m| {
                        let mut next = board.clone();
                        next.apply_move(m);
                        !next.is_in_check(side)
                    })
                    .collect();

                (!kept.is_empty()).then_some((whence, kept))
            })
            .collect()
    }
}
