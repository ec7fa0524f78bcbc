use serde::{Deserialize, Serialize};

/// One of the two players.
///
/// X always moves first. The numeric codes are the ones used in board
/// observations and game records.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
pub enum Side {
    #[display("X")]
    X,
    #[display("O")]
    O,
}

impl Side {
    pub const ALL: [Side; 2] = [Side::X, Side::O];

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }

    /// Returns the numeric code (X = 1, O = 2).
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Side::X => 1,
            Side::O => 2,
        }
    }

    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Side::X),
            2 => Some(Side::O),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for side in Side::ALL {
            assert_eq!(Side::from_code(side.code()), Some(side));
        }
        assert_eq!(Side::from_code(0), None);
        assert_eq!(Side::from_code(3), None);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::X.opponent(), Side::O);
        assert_eq!(Side::O.opponent(), Side::X);
    }
}
