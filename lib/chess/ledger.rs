use crate::chess::{File, Rank, Square};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The kind of history a [`Ledger`] entry tracks.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "snake_case")]
pub enum Flag {
    /// Whether the piece that started on this square has moved.
    HasMoved,
    /// Whether the pawn on this square just advanced two squares.
    LongMove,
}

/// The state of a [`Ledger`] entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub struct Record {
    pub state: bool,
    /// Remaining half-turns before the entry expires, if it ever does.
    pub lifetime: Option<u8>,
}

/// A [`Ledger`] entry in its persisted form.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Entry {
    pub square: Square,
    pub flag: Flag,
    pub state: bool,
    #[serde(default)]
    pub lifetime: Option<u8>,
}

/// Castling rights and en passant eligibility.
///
/// This is the part of a game's history that cannot be recovered from the
/// piece placement alone.
#[derive(Debug, Default, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(from = "Vec<Entry>", into = "Vec<Entry>")]
pub struct Ledger(BTreeMap<(Square, Flag), Record>);

impl Ledger {
    /// The number of half-turns a [`Flag::LongMove`] entry survives.
    pub const LONG_MOVE_LIFETIME: u8 = 2;

    /// The ledger of a game in the standard starting position.
    ///
    /// Tracks the home squares of both kings and all four rooks.
    pub fn standard() -> Self {
        let mut ledger = Ledger::default();

        for rank in [Rank::First, Rank::Eighth] {
            for file in [File::A, File::E, File::H] {
                ledger.track(Square::new(file, rank));
            }
        }

        ledger
    }

    /// The [`Record`] of an entry, if any.
    pub fn get(&self, sq: Square, flag: Flag) -> Option<Record> {
        self.0.get(&(sq, flag)).copied()
    }

    /// The state of an entry, if any.
    pub fn state(&self, sq: Square, flag: Flag) -> Option<bool> {
        self.get(sq, flag).map(|r| r.state)
    }

    /// Inserts or replaces an entry.
    pub fn insert(&mut self, sq: Square, flag: Flag, record: Record) {
        self.0.insert((sq, flag), record);
    }

    /// Starts tracking whether the piece on this square has moved.
    pub fn track(&mut self, sq: Square) {
        let record = Record {
            state: false,
            lifetime: None,
        };

        self.insert(sq, Flag::HasMoved, record);
    }

    /// Whether this square is tracked and its piece has not moved.
    pub fn is_unmoved(&self, sq: Square) -> bool {
        self.state(sq, Flag::HasMoved) == Some(false)
    }

    /// Marks the piece on this square as moved, if the square is tracked.
    pub fn mark_moved(&mut self, sq: Square) {
        if let Some(r) = self.0.get_mut(&(sq, Flag::HasMoved)) {
            r.state = true;
        }
    }

    /// Records or refreshes a pawn's two square advance onto this square.
    pub fn flag_long_move(&mut self, sq: Square) {
        let record = Record {
            state: true,
            lifetime: Some(Self::LONG_MOVE_LIFETIME),
        };

        self.insert(sq, Flag::LongMove, record);
    }

    /// Whether the pawn on this square may be captured en passant.
    pub fn is_long_move(&self, sq: Square) -> bool {
        self.state(sq, Flag::LongMove) == Some(true)
    }

    /// Counts down every entry with a lifetime, dropping those that expire.
    pub fn decrement(&mut self) {
        self.0.retain(|_, r| match &mut r.lifetime {
            None => true,
            Some(l) => {
                *l = l.saturating_sub(1);
                *l > 0
            }
        });
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over entries ordered by square.
    pub fn iter(&self) -> impl Iterator<Item = Entry> + '_ {
        self.0.iter().map(|(&(square, flag), r)| Entry {
            square,
            flag,
            state: r.state,
            lifetime: r.lifetime,
        })
    }
}

impl FromIterator<Entry> for Ledger {
    fn from_iter<I: IntoIterator<Item = Entry>>(entries: I) -> Self {
        let mut ledger = Ledger::default();

        for e in entries {
            let record = Record {
                state: e.state,
                lifetime: e.lifetime,
            };

            ledger.insert(e.square, e.flag, record);
        }

        ledger
    }
}

impl From<Vec<Entry>> for Ledger {
    fn from(entries: Vec<Entry>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<Ledger> for Vec<Entry> {
    fn from(ledger: Ledger) -> Self {
        ledger.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::InvalidCoordinate;
    use test_strategy::proptest;

    #[test]
    fn standard_ledger_tracks_kings_and_rooks() -> Result<(), InvalidCoordinate> {
        let ledger = Ledger::standard();
        assert_eq!(ledger.len(), 6);

        for sq in ["a1", "e1", "h1", "a8", "e8", "h8"] {
            assert!(ledger.is_unmoved(sq.parse()?));
        }

        assert!(!ledger.is_unmoved("d1".parse()?));
        Ok(())
    }

    #[proptest]
    fn marking_untracked_square_is_a_no_op(sq: Square) {
        let mut ledger = Ledger::default();
        ledger.mark_moved(sq);
        assert!(ledger.is_empty());
    }

    #[proptest]
    fn marking_tracked_square_is_permanent(sq: Square) {
        let mut ledger = Ledger::default();
        ledger.track(sq);
        ledger.mark_moved(sq);

        for _ in 0..4 {
            ledger.decrement();
        }

        assert_eq!(ledger.state(sq, Flag::HasMoved), Some(true));
    }

    #[proptest]
    fn long_move_expires_after_two_half_turns(sq: Square) {
        let mut ledger = Ledger::default();
        ledger.flag_long_move(sq);
        assert!(ledger.is_long_move(sq));

        ledger.decrement();
        assert!(ledger.is_long_move(sq));
        assert_eq!(ledger.get(sq, Flag::LongMove).and_then(|r| r.lifetime), Some(1));

        ledger.decrement();
        assert!(!ledger.is_long_move(sq));
        assert_eq!(ledger.get(sq, Flag::LongMove), None);
    }

    #[proptest]
    fn flags_on_the_same_square_are_independent(sq: Square) {
        let mut ledger = Ledger::default();
        ledger.track(sq);
        ledger.flag_long_move(sq);
        ledger.decrement();
        ledger.decrement();
        assert!(ledger.is_unmoved(sq));
        assert!(!ledger.is_long_move(sq));
    }

    #[proptest]
    fn ledger_can_be_rebuilt_from_its_entries(sq: Square, flag: Flag, record: Record) {
        let mut ledger = Ledger::standard();
        ledger.insert(sq, flag, record);
        assert_eq!(Ledger::from_iter(ledger.iter()), ledger);
    }

    #[proptest]
    fn ledger_serializes_as_a_list_of_entries(sq: Square) {
        let mut ledger = Ledger::standard();
        ledger.flag_long_move(sq);

        let text = ron::ser::to_string(&ledger)?;
        let entries: Vec<Entry> = ron::de::from_str(&text)?;
        assert_eq!(entries, Vec::from_iter(ledger.iter()));
        assert_eq!(ron::de::from_str::<Ledger>(&text)?, ledger);
    }
}
