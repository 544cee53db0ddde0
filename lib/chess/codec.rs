use crate::chess::{Board, Square};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// The reason why converting a coordinate failed.
#[derive(Debug, Display, Copy, Clone, Eq, PartialEq, Hash, Error)]
#[error(ignore)]
pub enum InvalidCoordinate {
    #[display(fmt = "expected a file letter in the range `('a'..='{}')`", last)]
    FileLetter { last: char },

    #[display(fmt = "expected a file index in the range `(1..={})`", size)]
    FileIndex { size: u8 },

    #[display(fmt = "expected a rank digit in the range `('1'..='{}')`", size)]
    RankDigit { size: u8 },

    #[display(fmt = "expected a file letter followed by a rank digit")]
    Malformed,
}

/// Converts between algebraic notation and [`Square`]s.
///
/// The codec only accepts coordinates on a board of its configured size,
/// which never exceeds [`Board::SIZE`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(deny_unknown_fields)]
pub struct Codec {
    #[cfg_attr(test, strategy(1u8..=Board::SIZE as u8))]
    size: u8,
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new(Board::SIZE as u8)
    }
}

impl Codec {
    /// Constructs a [`Codec`] for a board of `size` files and ranks.
    ///
    /// The size is clamped to the range `(1..=8)`.
    pub fn new(size: u8) -> Self {
        Codec {
            size: size.clamp(1, Board::SIZE as u8),
        }
    }

    /// The number of files and ranks this codec accepts.
    pub fn size(&self) -> u8 {
        self.size
    }

    fn last_letter(&self) -> char {
        char::from(b'a' + self.size - 1)
    }

    /// Converts a file letter to its one-based index, ignoring case.
    pub fn file_letter_to_index(&self, letter: char) -> Result<u8, InvalidCoordinate> {
        let last = self.last_letter();
        match letter.to_ascii_lowercase() {
            c @ 'a'..='h' if c <= last => Ok(c as u8 - b'a' + 1),
            _ => Err(InvalidCoordinate::FileLetter { last }),
        }
    }

    /// Converts a one-based file index to its lower case letter.
    pub fn file_index_to_letter(&self, index: u8) -> Result<char, InvalidCoordinate> {
        if (1..=self.size).contains(&index) {
            Ok(char::from(b'a' + index - 1))
        } else {
            Err(InvalidCoordinate::FileIndex { size: self.size })
        }
    }

    /// Parses a file letter followed by a one-based rank digit, e.g. `"e2"`.
    pub fn parse_notation(&self, s: &str) -> Result<Square, InvalidCoordinate> {
        let mut chars = s.chars();

        let (f, r) = match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => (f, r),
            _ => return Err(InvalidCoordinate::Malformed),
        };

        let file = self.file_letter_to_index(f)?;
        let rank = match r.to_digit(10) {
            Some(d) if (1..=self.size as u32).contains(&d) => d as u8,
            _ => return Err(InvalidCoordinate::RankDigit { size: self.size }),
        };

        Square::from_indices(file as i8 - 1, rank as i8 - 1).ok_or(InvalidCoordinate::Malformed)
    }

    /// Whether [`Codec::parse_notation`] would succeed.
    pub fn is_valid_notation(&self, s: &str) -> bool {
        self.parse_notation(s).is_ok()
    }

    /// Formats a [`Square`] in algebraic notation, if it lies on a board of this size.
    pub fn format(&self, sq: Square) -> Result<String, InvalidCoordinate> {
        let letter = self.file_index_to_letter(sq.file.index() + 1)?;

        if sq.rank.index() >= self.size {
            return Err(InvalidCoordinate::RankDigit { size: self.size });
        }

        Ok(format!("{}{}", letter, sq.rank))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{File, Rank};
    use test_strategy::proptest;

    #[test]
    fn default_codec_covers_the_whole_board() {
        assert_eq!(Codec::default().size(), 8);
    }

    #[proptest]
    fn size_is_clamped_to_board(size: u8) {
        assert!((1..=8).contains(&Codec::new(size).size()));
    }

    #[test]
    fn file_letter_converts_to_one_based_index() {
        assert_eq!(Codec::default().file_letter_to_index('e'), Ok(5));
        assert_eq!(Codec::default().file_letter_to_index('E'), Ok(5));
    }

    #[test]
    fn file_letter_before_a_is_invalid() {
        assert_eq!(
            Codec::default().file_letter_to_index('`'),
            Err(InvalidCoordinate::FileLetter { last: 'h' })
        );
    }

    #[test]
    fn file_letter_past_board_size_is_invalid() {
        assert!(Codec::default().file_letter_to_index('i').is_err());
        assert!(Codec::new(5).file_letter_to_index('f').is_err());
        assert_eq!(Codec::new(5).file_letter_to_index('e'), Ok(5));
    }

    #[test]
    fn file_index_converts_to_letter() {
        assert_eq!(Codec::default().file_index_to_letter(5), Ok('e'));
    }

    #[test]
    fn file_index_out_of_range_is_invalid() {
        assert!(Codec::default().file_index_to_letter(0).is_err());
        assert_eq!(
            Codec::default().file_index_to_letter(9),
            Err(InvalidCoordinate::FileIndex { size: 8 })
        );
    }

    #[proptest]
    fn letter_and_index_conversions_are_inverse(c: Codec, #[strategy(1u8..=8)] i: u8) {
        if i <= c.size() {
            assert_eq!(c.file_letter_to_index(c.file_index_to_letter(i)?), Ok(i));
        }
    }

    #[test]
    fn parse_notation_returns_zero_based_square() {
        assert_eq!(
            Codec::default().parse_notation("e2"),
            Ok(Square::new(File::E, Rank::Second))
        );

        assert_eq!(
            Codec::default().parse_notation("A8"),
            Ok(Square::new(File::A, Rank::Eighth))
        );
    }

    #[test]
    fn parse_notation_rejects_malformed_text() {
        let codec = Codec::default();
        assert_eq!(codec.parse_notation(""), Err(InvalidCoordinate::Malformed));
        assert_eq!(codec.parse_notation("e"), Err(InvalidCoordinate::Malformed));
        assert_eq!(codec.parse_notation("e22"), Err(InvalidCoordinate::Malformed));
        assert_eq!(
            codec.parse_notation("ex"),
            Err(InvalidCoordinate::RankDigit { size: 8 })
        );
        assert_eq!(
            codec.parse_notation("e9"),
            Err(InvalidCoordinate::RankDigit { size: 8 })
        );
        assert_eq!(
            codec.parse_notation("e0"),
            Err(InvalidCoordinate::RankDigit { size: 8 })
        );
        assert_eq!(
            codec.parse_notation("z1"),
            Err(InvalidCoordinate::FileLetter { last: 'h' })
        );
    }

    #[proptest]
    fn parsing_formatted_square_is_an_identity(sq: Square) {
        let codec = Codec::default();
        assert_eq!(codec.parse_notation(&codec.format(sq)?), Ok(sq));
    }

    #[proptest]
    fn formatting_agrees_with_parsing_on_smaller_boards(c: Codec, sq: Square) {
        match c.format(sq) {
            Ok(s) => assert_eq!(c.parse_notation(&s), Ok(sq)),
            Err(_) => assert!(!c.is_valid_notation(&sq.to_string())),
        }
    }

    #[test]
    fn squares_beyond_codec_size_cannot_be_formatted() {
        let codec = Codec::new(5);
        let h8 = Square::new(File::H, Rank::Eighth);
        let e8 = Square::new(File::E, Rank::Eighth);

        assert_eq!(codec.format(h8), Err(InvalidCoordinate::FileIndex { size: 5 }));
        assert_eq!(codec.format(e8), Err(InvalidCoordinate::RankDigit { size: 5 }));
        assert_eq!(codec.format(Square::new(File::E, Rank::Fifth)), Ok("e5".into()));
    }

    #[proptest]
    fn validity_check_agrees_with_parsing(c: Codec, s: String) {
        assert_eq!(c.is_valid_notation(&s), c.parse_notation(&s).is_ok());
    }

    #[proptest]
    fn parsing_fails_if_length_not_two(#[filter(#s.chars().count() != 2)] s: String) {
        assert!(!Codec::default().is_valid_notation(&s));
    }
}
