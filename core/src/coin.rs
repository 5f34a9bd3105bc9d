use core::fmt;

use crate::*;

/// Immutable collectible minted by one cell. Coins are only created at
/// cache-seeding time or when restoring persisted state; gameplay moves them
/// between caches and the player inventory without minting new ones.
#[derive(Clone, Debug)]
pub struct Coin {
    cell: CellHandle,
    serial: Serial,
}

impl Coin {
    pub fn new(cell: CellHandle, serial: Serial) -> Self {
        Self { cell, serial }
    }

    pub fn cell(&self) -> &CellHandle {
        &self.cell
    }

    pub fn serial(&self) -> Serial {
        self.serial
    }

    /// Canonical identity string, `"{i}:{j}#{serial}"`.
    pub fn id(&self) -> String {
        self.to_string()
    }
}

/// Gameplay equality is by identity string, never by handle pointer.
impl PartialEq for Coin {
    fn eq(&self, other: &Self) -> bool {
        self.cell.coords() == other.cell.coords() && self.serial == other.serial
    }
}

impl Eq for Coin {}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.cell.i(), self.cell.j(), self.serial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_string_format() {
        let mut board = Board::new(1e-4, 1).unwrap();
        let coin = Coin::new(board.canonicalize(-3, 17), 2);

        assert_eq!(coin.id(), "-3:17#2");
        assert_eq!(format!("{coin}"), "-3:17#2");
    }

    #[test]
    fn equality_ignores_which_handle_minted_the_coin() {
        let mut left = Board::new(1e-4, 1).unwrap();
        let mut right = Board::new(1e-4, 1).unwrap();

        let a = Coin::new(left.canonicalize(5, 7), 0);
        let b = Coin::new(right.canonicalize(5, 7), 0);

        assert_eq!(a, b);
        assert_ne!(a, Coin::new(left.canonicalize(5, 7), 1));
    }
}
