use crate::chess::{Board, Color, Move, MoveKind, Rank, Role, Square};
use arrayvec::ArrayVec;
use std::collections::{BTreeMap, BTreeSet};

/// The moves available to each piece of a side, keyed by their origin.
///
/// Origins without any moves are absent.
pub type MoveMap = BTreeMap<Square, ArrayVec<Move, 27>>;

/// What [`MoveGenerator::generate`] computes.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum Mode {
    /// Pseudo-legal moves, castling and the king's self-check filter.
    Full,
    /// The squares a side threatens, whether or not it could move there.
    Attacks,
}

const ORTHOGONAL: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

const ADJACENT: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];

const KNIGHT: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

/// Generates the moves of one side on a [`Board`].
#[derive(Debug, Copy, Clone)]
pub struct MoveGenerator<'a> {
    board: &'a Board,
}

impl<'a> MoveGenerator<'a> {
    /// Constructs a [`MoveGenerator`] bound to a [`Board`].
    pub fn new(board: &'a Board) -> Self {
        MoveGenerator { board }
    }

    /// The moves of every piece of `side`.
    pub fn generate(&self, side: Color, mode: Mode) -> MoveMap {
        let mut map = MoveMap::new();

        for (sq, p) in self.board.iter().filter(|(_, p)| p.color() == side) {
            let mut moves = ArrayVec::new();

            match p.role() {
                Role::Pawn => self.pawn(sq, side, mode, &mut moves),
                Role::Knight => self.steps(sq, side, mode, &KNIGHT, &mut moves),
                Role::Bishop => self.rays(sq, side, mode, &DIAGONAL, &mut moves),
                Role::Rook => self.rays(sq, side, mode, &ORTHOGONAL, &mut moves),
                Role::Queen => {
                    self.rays(sq, side, mode, &ORTHOGONAL, &mut moves);
                    self.rays(sq, side, mode, &DIAGONAL, &mut moves);
                }
                Role::King => {
                    self.steps(sq, side, mode, &ADJACENT, &mut moves);
                    if mode == Mode::Full {
                        self.castles(sq, side, &mut moves);
                        self.shelter(sq, side, &mut moves);
                    }
                }
            }

            if !moves.is_empty() {
                map.insert(sq, moves);
            }
        }

        map
    }

    /// Whether `side` may land on a square, given who occupies it.
    fn can_land(&self, sq: Square, side: Color, mode: Mode) -> bool {
        match self.board.piece_at(sq) {
            None => true,
            Some(_) if mode == Mode::Attacks => true,
            Some(p) => p.color() != side,
        }
    }

    fn pawn(&self, sq: Square, side: Color, mode: Mode, moves: &mut ArrayVec<Move, 27>) {
        let fwd = side.forward();

        let tag = |to: Square, kind| match to.offset(0, fwd) {
            None => Move::new(sq, to, MoveKind::Promotion),
            Some(_) => Move::new(sq, to, kind),
        };

        if mode == Mode::Attacks {
            for df in [-1, 1] {
                if let Some(to) = sq.offset(df, fwd) {
                    moves.push(Move::new(sq, to, MoveKind::Normal));
                }
            }

            return;
        }

        if let Some(one) = sq.offset(0, fwd).filter(|&s| self.board.piece_at(s).is_none()) {
            moves.push(tag(one, MoveKind::Normal));

            let start = match side {
                Color::White => Rank::Second,
                Color::Black => Rank::Seventh,
            };

            if sq.rank == start {
                if let Some(two) = one.offset(0, fwd).filter(|&s| self.board.piece_at(s).is_none()) {
                    moves.push(Move::new(sq, two, MoveKind::LongPawnAdvance));
                }
            }
        }

        for df in [-1, 1] {
            let to = match sq.offset(df, fwd) {
                None => continue,
                Some(to) => to,
            };

            match self.board.piece_at(to) {
                Some(p) if p.color() != side => moves.push(tag(to, MoveKind::Normal)),
                Some(_) => {}
                None => {
                    let victim = sq.offset(df, 0);
                    let en_passant = victim.is_some_and(|v| {
                        self.board.ledger().is_long_move(v)
                            && self.board.piece_at(v).is_some_and(|p| p.is(Role::Pawn, !side))
                    });

                    if en_passant {
                        moves.push(Move::new(sq, to, MoveKind::EnPassant));
                    }
                }
            }
        }
    }

    fn steps(
        &self,
        sq: Square,
        side: Color,
        mode: Mode,
        offsets: &[(i8, i8)],
        moves: &mut ArrayVec<Move, 27>,
    ) {
        for &(df, dr) in offsets {
            if let Some(to) = sq.offset(df, dr) {
                if self.can_land(to, side, mode) {
                    moves.push(Move::new(sq, to, MoveKind::Normal));
                }
            }
        }
    }

    fn rays(
        &self,
        sq: Square,
        side: Color,
        mode: Mode,
        directions: &[(i8, i8)],
        moves: &mut ArrayVec<Move, 27>,
    ) {
        for &(df, dr) in directions {
            let mut cur = sq;

            while let Some(to) = cur.offset(df, dr) {
                let blocked = self.board.piece_at(to).is_some();

                if self.can_land(to, side, mode) {
                    moves.push(Move::new(sq, to, MoveKind::Normal));
                }

                if blocked {
                    break;
                }

                cur = to;
            }
        }
    }

    fn castles(&self, king: Square, side: Color, moves: &mut ArrayVec<Move, 27>) {
        let ledger = self.board.ledger();

        if !ledger.is_unmoved(king) {
            return;
        }

        for rook in Square::iter().filter(|s| s.rank == king.rank) {
            let distance = rook.file - king.file;

            if distance.abs() < 3 || !ledger.is_unmoved(rook) {
                continue;
            }

            if !self.board.piece_at(rook).is_some_and(|p| p.is(Role::Rook, side)) {
                continue;
            }

            let step = distance.signum();
            let clear = (1..distance.abs())
                .filter_map(|i| king.offset(i * step, 0))
                .all(|s| self.board.piece_at(s).is_none());

            if clear {
                moves.push(Move::new(king, rook, MoveKind::Castle));
            }
        }
    }

    /// Drops the king's moves onto or through squares the opponent attacks.
    fn shelter(&self, king: Square, side: Color, moves: &mut ArrayVec<Move, 27>) {
        let mut lifted = self.board.clone();
        lifted.set_piece(king, None);

        let attacked: BTreeSet<Square> = MoveGenerator::new(&lifted)
            .generate(!side, Mode::Attacks)
            .into_values()
            .flatten()
            .map(|m| m.whither())
            .collect();

        moves.retain(|m| match m.castling() {
            None => !attacked.contains(&m.whither()),
            Some((to, _)) => {
                let step = (to.file - king.file).signum();
                [Some(king), king.offset(step, 0), Some(to)]
                    .into_iter()
                    .flatten()
                    .all(|s| !attacked.contains(&s))
            }
        });
    }
}
