use crate::chess::{Board, Color, Move, MoveKind, Outcome, Promotion, Square};
use crate::rules::{InvalidSnapshot, Options, Resolution, Resolver, Snapshot};
use derive_more::{Display, Error};
use tracing::{debug, instrument};

/// The reason why an action on a [`Game`] was rejected.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[error(ignore)]
pub enum InvalidAction {
    #[display(fmt = "the game has already ended in a {}", _0)]
    GameHasEnded(Outcome),

    #[display(fmt = "moving from {} to {} is illegal in this position", _0, _1)]
    IllegalMove(Square, Square),

    #[display(fmt = "the pawn on {} must be promoted first", _0)]
    PromotionPending(Square),

    #[display(fmt = "there is no pawn waiting to be promoted")]
    NoPendingPromotion,

    #[display(fmt = "a draw may only be claimed after fifty turns")]
    DrawClaimRejected,
}

/// A game of chess played under the standard rules.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    turn: Color,
    halfturns: u32,
    resolver: Resolver,
    resolution: Resolution,
    promotion: Option<Square>,
    verdict: Option<Outcome>,
}

impl Default for Game {
    fn default() -> Self {
        Game::new(Options::default())
    }
}

impl Game {
    /// The number of half-turns after which a draw may be claimed.
    pub const DRAW_CLAIM_THRESHOLD: u32 = 100;

    /// Starts a game from the standard position with white to move.
    pub fn new(options: Options) -> Self {
        Self::with_board(Board::default(), Color::White, 0, options)
    }

    /// Resumes a game from a [`Snapshot`].
    pub fn resume(snapshot: &Snapshot, options: Options) -> Result<Self, InvalidSnapshot> {
        let board = snapshot.board()?;
        Ok(Self::with_board(board, snapshot.turn, snapshot.halfturns, options))
    }

    fn with_board(board: Board, turn: Color, halfturns: u32, options: Options) -> Self {
        let resolver = Resolver::new(options);
        let resolution = resolver.resolve(&board, turn);

        Game {
            board,
            turn,
            halfturns,
            resolver,
            resolution,
            promotion: None,
            verdict: None,
        }
    }

    /// The current [`Board`].
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The side to move.
    pub fn turn(&self) -> Color {
        self.turn
    }

    /// The number of completed half-turns.
    pub fn halfturns(&self) -> u32 {
        self.halfturns
    }

    /// The legal moves of the side to move, whether it is in check and the outcome, if any.
    pub fn resolution(&self) -> &Resolution {
        &self.resolution
    }

    /// The [`Outcome`] of the game, if it has ended.
    pub fn outcome(&self) -> Option<Outcome> {
        self.verdict.or(self.resolution.outcome)
    }

    /// The square of the pawn waiting to be promoted, if any.
    pub fn pending_promotion(&self) -> Option<Square> {
        self.promotion
    }

    fn ensure_ongoing(&self) -> Result<(), InvalidAction> {
        match self.outcome() {
            Some(o) => Err(InvalidAction::GameHasEnded(o)),
            None => Ok(()),
        }
    }

    /// Moves the piece on `whence` to `whither`, if that is legal.
    ///
    /// A move that reaches the farthest rank leaves the turn open until
    /// [`Game::promote`] is called.
    #[instrument(level = "trace", skip(self), err)]
    pub fn play(&mut self, whence: Square, whither: Square) -> Result<Move, InvalidAction> {
        self.ensure_ongoing()?;

        if let Some(sq) = self.promotion {
            return Err(InvalidAction::PromotionPending(sq));
        }

        let m = self
            .resolution
            .moves
            .get(&whence)
            .and_then(|ms| ms.iter().find(|m| m.whither() == whither))
            .copied()
            .ok_or(InvalidAction::IllegalMove(whence, whither))?;

        let captured = self.board.apply_move(m);
        debug!(side = %self.turn, %m, kind = ?m.kind(), captured = ?captured);

        if m.kind() == MoveKind::Promotion {
            self.promotion = Some(whither);
        } else {
            self.finish_turn();
        }

        Ok(m)
    }

    /// Completes a pending promotion.
    #[instrument(level = "trace", skip(self), err)]
    pub fn promote(&mut self, promotion: Promotion) -> Result<(), InvalidAction> {
        self.ensure_ongoing()?;
        let sq = self.promotion.take().ok_or(InvalidAction::NoPendingPromotion)?;
        self.board.promote(sq, promotion.into());
        debug!(side = %self.turn, %sq, %promotion);
        self.finish_turn();
        Ok(())
    }

    /// The side to move resigns.
    pub fn resign(&mut self) -> Result<Outcome, InvalidAction> {
        self.ensure_ongoing()?;
        let outcome = Outcome::Resignation(self.turn);
        self.promotion = None;
        self.verdict = Some(outcome);
        Ok(outcome)
    }

    /// Ends the game in a draw, once more than fifty turns have been played.
    pub fn claim_draw(&mut self) -> Result<Outcome, InvalidAction> {
        self.ensure_ongoing()?;

        if self.halfturns <= Self::DRAW_CLAIM_THRESHOLD {
            return Err(InvalidAction::DrawClaimRejected);
        }

        let outcome = Outcome::DrawByAgreement;
        self.promotion = None;
        self.verdict = Some(outcome);
        Ok(outcome)
    }

    /// Captures the state of the game.
    ///
    /// Refused while a promotion is pending, or after a resignation or a draw by agreement.
    pub fn snapshot(&self) -> Result<Snapshot, InvalidAction> {
        if let Some(o) = self.verdict {
            return Err(InvalidAction::GameHasEnded(o));
        }

        match self.promotion {
            Some(sq) => Err(InvalidAction::PromotionPending(sq)),
            None => Ok(Snapshot::new(&self.board, self.turn, self.halfturns)),
        }
    }

    fn finish_turn(&mut self) {
        self.board.decrement_lifetimes();
        self.halfturns += 1;
        self.turn = !self.turn;
        self.resolution = self.resolver.resolve(&self.board, self.turn);
    }
}
