use std::fmt::{self, Formatter, Write};

/// The type of a chess [`Piece`][`crate::chess::Piece`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[repr(u8)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    /// Returns an iterator over all roles.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + ExactSizeIterator {
        use Role::*;
        [Pawn, Knight, Bishop, Rook, Queen, King].into_iter()
    }

    /// The lower case letter of this role.
    pub fn letter(&self) -> char {
        match self {
            Role::Pawn => 'p',
            Role::Knight => 'n',
            Role::Bishop => 'b',
            Role::Rook => 'r',
            Role::Queen => 'q',
            Role::King => 'k',
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_char(self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;
    use test_strategy::proptest;

    #[test]
    fn role_guarantees_zero_value_optimization() {
        assert_eq!(size_of::<Option<Role>>(), size_of::<Role>());
    }

    #[proptest]
    fn role_is_displayed_as_its_letter(r: Role) {
        assert_eq!(r.to_string(), r.letter().to_string());
    }

    #[test]
    fn every_role_has_a_distinct_letter() {
        let letters: String = Role::iter().map(|r| r.letter()).collect();
        assert_eq!(letters, "pnbrqk");
    }
}
