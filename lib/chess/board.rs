use crate::chess::{Color, File, Ledger, Move, MoveKind, Piece, Rank, Role, Square};
use crate::rules::{Mode, MoveGenerator};
use std::fmt;

/// The piece placement on the board together with its [`Ledger`].
///
/// Mutations are unchecked, this type does not validate whether the moves
/// it applies are legal according to any set of chess rules.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Board {
    squares: [[Option<Piece>; Board::SIZE]; Board::SIZE],
    ledger: Ledger,
}

impl Default for Board {
    /// The standard starting position.
    fn default() -> Self {
        use Role::*;

        let mut board = Board::empty();
        let back = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        for (f, role) in File::iter().zip(back) {
            board.set_piece(Square::new(f, Rank::First), Some(Piece::new(role, Color::White)));
            board.set_piece(Square::new(f, Rank::Second), Some(Piece::new(Pawn, Color::White)));
            board.set_piece(Square::new(f, Rank::Seventh), Some(Piece::new(Pawn, Color::Black)));
            board.set_piece(Square::new(f, Rank::Eighth), Some(Piece::new(role, Color::Black)));
        }

        board.ledger = Ledger::standard();
        board
    }
}

impl Board {
    /// The number of files and ranks.
    pub const SIZE: usize = 8;

    /// A board without pieces and with an empty [`Ledger`].
    pub fn empty() -> Self {
        Board {
            squares: [[None; Board::SIZE]; Board::SIZE],
            ledger: Ledger::default(),
        }
    }

    /// Constructs a [`Board`] from a piece placement and a [`Ledger`].
    pub fn with_ledger(placement: impl IntoIterator<Item = (Square, Piece)>, ledger: Ledger) -> Self {
        let mut board = Board::empty();

        for (sq, p) in placement {
            board.set_piece(sq, Some(p));
        }

        board.ledger = ledger;
        board
    }

    /// The [`Ledger`] of special moves.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Mutable access to the [`Ledger`] of special moves.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// The [`Piece`] on a [`Square`], if any.
    #[inline(always)]
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        self.squares[sq.file.index() as usize][sq.rank.index() as usize]
    }

    /// The [`Piece`] `df` files and `dr` ranks away from a [`Square`], if any.
    ///
    /// Squares off the board read as empty.
    #[inline(always)]
    pub fn peek(&self, sq: Square, df: i8, dr: i8) -> Option<Piece> {
        self.piece_at(sq.offset(df, dr)?)
    }

    /// Places a [`Piece`] on a [`Square`], or clears it.
    #[inline(always)]
    pub fn set_piece(&mut self, sq: Square, p: Option<Piece>) {
        self.squares[sq.file.index() as usize][sq.rank.index() as usize] = p;
    }

    fn take(&mut self, sq: Square) -> Option<Piece> {
        self.squares[sq.file.index() as usize][sq.rank.index() as usize].take()
    }

    fn relocate(&mut self, whence: Square, whither: Square) -> Option<Piece> {
        let p = self.take(whence);
        std::mem::replace(&mut self.squares[whither.file.index() as usize][whither.rank.index() as usize], p)
    }

    /// Applies a [`Move`] and returns the captured [`Piece`], if any.
    pub fn apply_move(&mut self, m: Move) -> Option<Piece> {
        let (whence, whither) = (m.whence(), m.whither());

        let captured = match m.kind() {
            MoveKind::Normal | MoveKind::Promotion => self.relocate(whence, whither),

            MoveKind::LongPawnAdvance => {
                self.ledger.flag_long_move(whither);
                self.relocate(whence, whither)
            }

            MoveKind::EnPassant => {
                self.relocate(whence, whither);
                self.take(Square::new(whither.file, whence.rank))
            }

            MoveKind::Castle => {
                let king = self.take(whence);
                let rook = self.take(whither);

                if let Some((k, r)) = m.castling() {
                    self.set_piece(k, king);
                    self.set_piece(r, rook);
                }

                None
            }
        };

        self.ledger.mark_moved(whence);
        self.ledger.mark_moved(whither);

        captured
    }

    /// Replaces the [`Piece`] on a [`Square`] by one of another [`Role`] and the same [`Color`].
    pub fn promote(&mut self, sq: Square, role: Role) {
        if let Some(p) = self.piece_at(sq) {
            self.set_piece(sq, Some(Piece::new(role, p.color())));
        }
    }

    /// Counts down the [`Ledger`] entries that expire, once per completed half-turn.
    pub fn decrement_lifetimes(&mut self) {
        self.ledger.decrement();
    }

    /// Returns an iterator over the occupied squares and their pieces.
    pub fn iter(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|sq| Some((sq, self.piece_at(sq)?)))
    }

    /// The squares occupied by a [`Piece`].
    pub fn find(&self, p: Piece) -> impl Iterator<Item = Square> + '_ {
        self.iter().filter(move |&(_, q)| q == p).map(|(sq, _)| sq)
    }

    /// The square of a side's king, if it is on the board.
    pub fn king(&self, side: Color) -> Option<Square> {
        self.find(Piece::new(Role::King, side)).next()
    }

    /// Whether a side's king is attacked by the opponent.
    ///
    /// A side without a king is never in check.
    pub fn is_in_check(&self, side: Color) -> bool {
        match self.king(side) {
            None => false,
            Some(king) => MoveGenerator::new(self)
                .generate(!side, Mode::Attacks)
                .values()
                .flatten()
                .any(|m| m.whither() == king),
        }
    }

    /// Whether every piece left on the board is a king.
    pub fn only_kings_remain(&self) -> bool {
        self.iter().all(|(_, p)| p.role() == Role::King)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "   ")?;

        for file in File::iter() {
            write!(f, "  {} ", file)?;
        }

        writeln!(f)?;
        writeln!(f, "   +---+---+---+---+---+---+---+---+")?;

        for rank in Rank::iter().rev() {
            write!(f, " {} |", rank)?;

            for file in File::iter() {
                match self.piece_at(Square::new(file, rank)) {
                    Some(p) if f.alternate() => write!(f, " {:#} |", p)?,
                    Some(p) => write!(f, " {} |", p)?,
                    None => write!(f, "   |")?,
                }
            }

            writeln!(f, " {}", rank)?;
            writeln!(f, "   +---+---+---+---+---+---+---+---+")?;
        }

        write!(f, "   ")?;
        for file in File::iter() {
            write!(f, "  {} ", file)?;
        }

        Ok(())
    }
}

#[cfg(test)]
impl proptest::arbitrary::Arbitrary for Board {
    type Parameters = ();
    type Strategy = proptest::strategy::BoxedStrategy<Board>;

    // Generated boards hold at most one king per color and no pawns on the last ranks.
    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        use proptest::{collection::vec, prelude::*};

        let placement = vec(any::<Option<Piece>>(), 64).prop_map(|v| {
            let mut board = Board::empty();
            let mut kings = [false; 2];

            for (sq, p) in Square::iter().zip(v) {
                let p = p.filter(|p| match p.role() {
                    Role::Pawn => !matches!(sq.rank, Rank::First | Rank::Eighth),
                    Role::King => !std::mem::replace(&mut kings[p.color() as usize], true),
                    _ => true,
                });

                board.set_piece(sq, p);
            }

            board
        });

        (placement, any::<Vec<Square>>())
            .prop_map(|(mut board, tracked)| {
                for sq in tracked {
                    board.ledger.track(sq);
                }

                board
            })
            .boxed()
    }
}
