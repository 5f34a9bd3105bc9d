use smallvec::SmallVec;

use crate::*;

/// Label mixed into the hash key that decides a cache's initial coin count.
const SEED_LABEL: &str = "startNum";

/// Exclusive upper bound on the number of deterministically seeded coins.
const SEED_COIN_SPREAD: f64 = 5.0;

/// Collectible-holding entity for one cell.
///
/// A cache is transient: it is built on demand, either freshly seeded from
/// its cell coordinates or restored from a persisted momento, and both paths
/// converge to the same shape. Nothing persists automatically; callers write
/// the cache back into the momento map after mutating it, or the mutation is
/// lost when the cache is dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct Geocache {
    cell: CellHandle,
    coins: SmallVec<[Coin; 4]>,
}

impl Geocache {
    /// Deterministically seeds the initial coin set from the cell
    /// coordinates: `floor(roll("{i},{j},startNum") * 5)` coins with serials
    /// ascending from zero.
    pub fn seeded(cell: CellHandle, luck: &dyn Luck) -> Self {
        let key = format!("{},{}", cell.key(), SEED_LABEL);
        let total = (luck.roll(&key) * SEED_COIN_SPREAD).floor() as Serial;
        let coins = (0..total)
            .map(|serial| Coin::new(cell.clone(), serial))
            .collect();
        log::debug!("Seeded cache {} with {} coins", cell.key(), total);
        Self { cell, coins }
    }

    /// Adopts an explicit coin list verbatim. Used when restoring persisted
    /// state.
    pub fn with_coins(cell: CellHandle, coins: impl IntoIterator<Item = Coin>) -> Self {
        Self {
            cell,
            coins: coins.into_iter().collect(),
        }
    }

    pub fn cell(&self) -> &CellHandle {
        &self.cell
    }

    pub fn coin_count(&self) -> usize {
        self.coins.len()
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    /// Identity strings of the held coins, in insertion order.
    pub fn coin_ids(&self) -> Vec<String> {
        self.coins.iter().map(Coin::id).collect()
    }

    /// Appends `coin`. Caller precondition: the coin is not already present;
    /// duplicates are not rejected, only logged.
    pub fn add_coin(&mut self, coin: Coin) {
        if self.coins.contains(&coin) {
            log::warn!("Coin {} added twice to cache {}", coin, self.cell.key());
        }
        self.coins.push(coin);
    }

    /// Removes and returns the first coin whose identity string matches.
    /// "Not found" is an expected outcome (double-click race) and leaves the
    /// cache untouched.
    pub fn remove_coin(&mut self, coin_id: &str) -> Option<Coin> {
        let index = self.coins.iter().position(|coin| coin.id() == coin_id)?;
        Some(self.coins.remove(index))
    }
}

impl Momento for Geocache {
    fn to_momento(&self) -> Result<String> {
        let snapshot = CacheSnapshot {
            version: MOMENTO_VERSION,
            cell: self.cell.coords(),
            coins: self.coins.iter().map(CoinRecord::from).collect(),
        };
        Ok(serde_json::to_string(&snapshot)?)
    }

    fn restore_momento(&mut self, momento: &str, board: &mut Board) -> Result<()> {
        let snapshot: CacheSnapshot = serde_json::from_str(momento)?;
        if snapshot.version != MOMENTO_VERSION {
            return Err(GameError::UnsupportedMomentoVersion(snapshot.version));
        }

        let (i, j) = snapshot.cell;
        self.cell = board.canonicalize(i, j);
        self.coins = snapshot
            .coins
            .into_iter()
            .map(|record| record.rehome(board))
            .collect();
        log::trace!(
            "Restored cache {} with {} coins",
            self.cell.key(),
            self.coins.len()
        );
        Ok(())
    }
}
