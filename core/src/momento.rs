use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::*;

/// Current momento wire-format version. Bump on any incompatible change to
/// [`CacheSnapshot`].
pub const MOMENTO_VERSION: u32 = 1;

/// Capability for entities that snapshot their mutable state into an opaque
/// string and restore it later.
///
/// Restoring tolerates being called on a freshly seeded entity: the encoded
/// state simply overwrites whatever was there. Recovered cell references are
/// rehomed through `board` so object-identity invariants keep holding.
pub trait Momento {
    fn to_momento(&self) -> Result<String>;
    fn restore_momento(&mut self, momento: &str, board: &mut Board) -> Result<()>;
}

/// Versioned wire form of one cache: the owning cell plus the held coins in
/// insertion order. Round-trips exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct CacheSnapshot {
    pub version: u32,
    pub cell: Coord2,
    pub coins: Vec<CoinRecord>,
}

/// Serde mirror of a [`Coin`].
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    pub i: Coord,
    pub j: Coord,
    pub serial: Serial,
}

impl CoinRecord {
    /// Rebuilds the coin against the canonical cell instance of `board`, not
    /// whatever stale copy produced the record.
    pub fn rehome(self, board: &mut Board) -> Coin {
        Coin::new(board.canonicalize(self.i, self.j), self.serial)
    }
}

impl From<&Coin> for CoinRecord {
    fn from(coin: &Coin) -> Self {
        Self {
            i: coin.cell().i(),
            j: coin.cell().j(),
            serial: coin.serial(),
        }
    }
}

/// Mapping from cell key to serialized cache state. A missing key means the
/// cache was never mutated and regenerates deterministically; a present entry
/// is authoritative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MomentoMap {
    entries: HashMap<String, String>,
}

impl MomentoMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: String, momento: String) {
        self.entries.insert(key, momento);
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, momento)| (key.as_str(), momento.as_str()))
    }

    pub fn absorb(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
