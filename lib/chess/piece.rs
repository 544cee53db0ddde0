use crate::chess::{Color, Role};
use derive_more::{Display, Error};
use std::fmt::{self, Write};

/// A chess [piece][`Role`] of a certain [`Color`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Piece {
    role: Role,
    color: Color,
}

impl Piece {
    /// Constructs [`Piece`] from a pair of [`Role`] and [`Color`].
    #[inline(always)]
    pub fn new(role: Role, color: Color) -> Self {
        Piece { role, color }
    }

    /// This piece's [`Role`].
    #[inline(always)]
    pub fn role(&self) -> Role {
        self.role
    }

    /// This piece's [`Color`].
    #[inline(always)]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether this piece is of the given [`Role`] and [`Color`].
    #[inline(always)]
    pub fn is(&self, role: Role, color: Color) -> bool {
        self.role == role && self.color == color
    }

    fn figurine(&self) -> char {
        use Color::*;
        use Role::*;
        match (self.role, self.color) {
            (Pawn, White) => '♙',
            (Knight, White) => '♘',
            (Bishop, White) => '♗',
            (Rook, White) => '♖',
            (Queen, White) => '♕',
            (King, White) => '♔',
            (Pawn, Black) => '♟',
            (Knight, Black) => '♞',
            (Bishop, Black) => '♝',
            (Rook, Black) => '♜',
            (Queen, Black) => '♛',
            (King, Black) => '♚',
        }
    }
}

/// Upper case letters for white pieces, lower case for black.
impl From<Piece> for char {
    fn from(p: Piece) -> char {
        match p.color {
            Color::White => p.role.letter().to_ascii_uppercase(),
            Color::Black => p.role.letter(),
        }
    }
}

/// The reason why converting [`Piece`] from a character failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[display(fmt = "`{}` is not a piece, expected one of `[PNBRQKpnbrqk]`", _0)]
pub struct InvalidPiece(#[error(not(source))] pub char);

impl TryFrom<char> for Piece {
    type Error = InvalidPiece;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        Role::iter()
            .find(|r| r.letter() == c.to_ascii_lowercase())
            .map(|r| Piece::new(r, color))
            .ok_or(InvalidPiece(c))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = if f.alternate() {
            self.figurine()
        } else {
            (*self).into()
        };

        f.write_char(c)
    }
}
