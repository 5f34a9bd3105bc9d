use serde::{Deserialize, Serialize};

use crate::*;

/// One player's run: the board, the coin inventory, the current position and
/// the movement history, all owned explicitly instead of living in ambient
/// globals. Event handlers route through this object, so a coin move and its
/// momento write always happen inside the same synchronous call.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    luck: SeededLuck,
    player: GeoPoint,
    inventory: Vec<Coin>,
    path: Vec<GeoPoint>,
}

impl GameSession {
    pub fn new(config: GameConfig, start: GeoPoint) -> Result<Self> {
        let board = Board::new(config.tile_width, config.visibility_radius)?;
        Ok(Self {
            config,
            board,
            luck: SeededLuck::default(),
            player: start,
            inventory: Vec::new(),
            path: vec![start],
        })
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn player(&self) -> GeoPoint {
        self.player
    }

    pub fn inventory(&self) -> &[Coin] {
        &self.inventory
    }

    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    /// Moves the player and records the step in the path history.
    pub fn move_to(&mut self, point: GeoPoint) {
        self.player = point;
        self.path.push(point);
        log::trace!("Player at ({}, {})", point.lat, point.lng);
    }

    /// Relative move; one arrow-button step is one tile width.
    pub fn move_by(&mut self, dlat: f64, dlng: f64) {
        self.move_to(GeoPoint::new(self.player.lat + dlat, self.player.lng + dlng));
    }

    /// Cells around the player's current position, for the rendering layer.
    pub fn visible_cells(&mut self) -> Vec<CellHandle> {
        self.board.cells_near(self.player)
    }

    /// Whether a cache spawns at `cell`: a deterministic roll on the cell
    /// coordinates against the configured spawn probability.
    pub fn cache_spawns_at(&self, cell: &Cell) -> bool {
        self.luck.roll(&cell.key()) < self.config.spawn_probability
    }

    /// Visible cells that hold a cache, in [`Board::cells_near`] order.
    pub fn spawned_caches(&mut self) -> Vec<CellHandle> {
        let cells = self.board.cells_near(self.player);
        cells
            .into_iter()
            .filter(|cell| self.cache_spawns_at(cell))
            .collect()
    }

    /// Restore-or-seed the cache for `cell`; see [`Board::open_cache`].
    pub fn open_cache(&mut self, cell: &CellHandle) -> Result<Geocache> {
        self.board.open_cache(cell, &self.luck)
    }

    /// Moves the coin with `coin_id` from the cache at `cell` into the
    /// inventory and persists the cache momento in the same call. A missing
    /// coin is an expected no-op.
    pub fn withdraw(&mut self, cell: &CellHandle, coin_id: &str) -> Result<Option<Coin>> {
        let mut cache = self.board.open_cache(cell, &self.luck)?;
        let Some(coin) = cache.remove_coin(coin_id) else {
            log::debug!("Coin {} not present in cache {}", coin_id, cell.key());
            return Ok(None);
        };
        self.board.save_cache(&cache)?;
        self.inventory.push(coin.clone());
        log::debug!("Withdrew coin {} from cache {}", coin, cell.key());
        Ok(Some(coin))
    }

    /// Moves the most recently held coin into the cache at `cell` and
    /// persists the cache momento in the same call. An empty inventory is an
    /// expected no-op.
    pub fn deposit(&mut self, cell: &CellHandle) -> Result<Option<Coin>> {
        let mut cache = self.board.open_cache(cell, &self.luck)?;
        let Some(coin) = self.inventory.pop() else {
            return Ok(None);
        };
        cache.add_coin(coin.clone());
        if let Err(err) = self.board.save_cache(&cache) {
            self.inventory.push(coin);
            return Err(err);
        }
        log::debug!("Deposited coin {} into cache {}", coin, cell.key());
        Ok(Some(coin))
    }

    /// Full persistable session state. The caller owns writing it to storage.
    pub fn save(&self) -> SaveState {
        SaveState {
            caches: self
                .board
                .momentos()
                .entries()
                .map(|(key, momento)| (key.to_owned(), momento.to_owned()))
                .collect(),
            player: Some(self.player),
            inventory: self.inventory.iter().map(CoinRecord::from).collect(),
            path: self.path.clone(),
        }
    }

    /// Restores a previously saved state. Each section is optional; an
    /// absent or empty section leaves the current state in place. Inventory
    /// coins are rehomed to this session's canonical cells.
    pub fn load(&mut self, save: SaveState) {
        self.board.absorb_momentos(save.caches);
        if let Some(player) = save.player {
            self.player = player;
        }
        if !save.inventory.is_empty() {
            self.inventory = save
                .inventory
                .into_iter()
                .map(|record| record.rehome(&mut self.board))
                .collect();
        }
        if !save.path.is_empty() {
            self.path = save.path;
        }
        log::debug!(
            "Loaded session state: {} cache momentos, {} held coins",
            self.board.momentos().len(),
            self.inventory.len()
        );
    }
}

/// Bulk persisted layout: cache momentos, player coordinate, inventory and
/// path history, each independently loadable. A missing section deserializes
/// to its default.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    #[serde(default)]
    pub caches: Vec<(String, String)>,
    #[serde(default)]
    pub player: Option<GeoPoint>,
    #[serde(default)]
    pub inventory: Vec<CoinRecord>,
    #[serde(default)]
    pub path: Vec<GeoPoint>,
}
