use crate::chess::Square;
use derive_more::Display;

/// Characteristics of a [`Move`] that change how it is applied to the board.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum MoveKind {
    /// A plain relocation, possibly capturing the piece on the destination.
    #[default]
    Normal,
    /// A pawn advancing two squares from its start rank.
    LongPawnAdvance,
    /// A pawn capturing an adjacent pawn that just advanced two squares.
    EnPassant,
    /// A king castling with the rook on the destination square.
    Castle,
    /// A pawn reaching the farthest rank.
    Promotion,
}

/// A chess move.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[cfg_attr(test, filter(#self.0 != #self.1))]
#[display(fmt = "{}{}", _0, _1)]
pub struct Move(Square, Square, MoveKind);

impl Move {
    /// Constructs a [`Move`] of some [`MoveKind`].
    #[inline(always)]
    pub fn new(whence: Square, whither: Square, kind: MoveKind) -> Self {
        Move(whence, whither, kind)
    }

    /// The source [`Square`].
    #[inline(always)]
    pub fn whence(&self) -> Square {
        self.0
    }

    /// The destination [`Square`].
    ///
    /// For [`MoveKind::Castle`] this is the square of the rook.
    #[inline(always)]
    pub fn whither(&self) -> Square {
        self.1
    }

    /// The [`MoveKind`] of this move.
    #[inline(always)]
    pub fn kind(&self) -> MoveKind {
        self.2
    }

    /// The squares the king and the rook land on, if this move castles.
    pub fn castling(&self) -> Option<(Square, Square)> {
        if self.kind() != MoveKind::Castle {
            return None;
        }

        let step = (self.whither().file - self.whence().file).signum();
        let king = self.whence().offset(2 * step, 0)?;
        let rook = king.offset(-step, 0)?;
        Some((king, rook))
    }
}
