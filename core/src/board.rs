use std::rc::Rc;

use hashbrown::HashMap;

use crate::*;

/// Discrete grid square identified by integer coordinates. Cells are only
/// minted by [`Board::canonicalize`], so two handles with equal coordinates
/// always point at the same instance.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    i: Coord,
    j: Coord,
}

impl Cell {
    pub(crate) const fn new(i: Coord, j: Coord) -> Self {
        Self { i, j }
    }

    pub const fn i(&self) -> Coord {
        self.i
    }

    pub const fn j(&self) -> Coord {
        self.j
    }

    pub const fn coords(&self) -> Coord2 {
        (self.i, self.j)
    }

    /// Stringified coordinates, used to key the momento map.
    pub fn key(&self) -> String {
        format!("{},{}", self.i, self.j)
    }
}

/// Shared-ownership handle to a canonical cell. `Rc::ptr_eq` on two handles
/// with equal coordinates always holds once both went through the board.
pub type CellHandle = Rc<Cell>;

/// Maps infinite continuous coordinates onto a stable grid of discrete cells.
///
/// The board owns the canonical-cell registry (entries are never evicted for
/// the lifetime of the session) and the momento map holding the serialized
/// state of every mutated cache.
#[derive(Debug)]
pub struct Board {
    tile_width: f64,
    visibility_radius: u32,
    cells: HashMap<Coord2, CellHandle>,
    momentos: MomentoMap,
}

impl Board {
    pub fn new(tile_width: f64, visibility_radius: u32) -> Result<Self> {
        if !tile_width.is_finite() || tile_width <= 0.0 {
            return Err(GameError::InvalidTileWidth);
        }
        Ok(Self {
            tile_width,
            visibility_radius,
            cells: HashMap::new(),
            momentos: MomentoMap::default(),
        })
    }

    pub fn tile_width(&self) -> f64 {
        self.tile_width
    }

    pub fn visibility_radius(&self) -> u32 {
        self.visibility_radius
    }

    pub fn known_cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Looks up or creates the single canonical instance for `(i, j)`.
    /// Idempotent, never fails.
    pub fn canonicalize(&mut self, i: Coord, j: Coord) -> CellHandle {
        self.cells
            .entry((i, j))
            .or_insert_with(|| Rc::new(Cell::new(i, j)))
            .clone()
    }

    /// Cell containing `point`. Flooring is toward negative infinity so cell
    /// boundaries stay contiguous across the origin. Coordinate domain errors
    /// are not validated: NaN degenerates to cell 0 through the saturating
    /// cast.
    pub fn cell_for_point(&mut self, point: GeoPoint) -> CellHandle {
        let i = (point.lat / self.tile_width).floor() as Coord;
        let j = (point.lng / self.tile_width).floor() as Coord;
        self.canonicalize(i, j)
    }

    pub fn cell_bounds(&self, cell: &Cell) -> CellBounds {
        CellBounds {
            lat_min: cell.i() as f64 * self.tile_width,
            lng_min: cell.j() as f64 * self.tile_width,
            lat_max: (cell.i() + 1) as f64 * self.tile_width,
            lng_max: (cell.j() + 1) as f64 * self.tile_width,
        }
    }

    /// All cells with offsets in `-radius..radius` on both axes relative to
    /// the cell containing `point`, row-major. Yields `(2 * radius)^2` cells;
    /// a radius of zero yields no cells at all.
    pub fn cells_near(&mut self, point: GeoPoint) -> Vec<CellHandle> {
        let origin = self.cell_for_point(point);
        let radius = Coord::from(self.visibility_radius);
        let mut cells = Vec::with_capacity((2 * self.visibility_radius as usize).pow(2));
        for di in -radius..radius {
            for dj in -radius..radius {
                cells.push(self.canonicalize(origin.i() + di, origin.j() + dj));
            }
        }
        cells
    }

    /// Serialized state of a previously mutated cache, if any. Absence means
    /// the cache regenerates deterministically.
    pub fn momento(&self, key: &str) -> Option<&str> {
        self.momentos.get(key)
    }

    pub fn store_momento(&mut self, key: String, momento: String) {
        self.momentos.set(key, momento);
    }

    pub fn momentos(&self) -> &MomentoMap {
        &self.momentos
    }

    /// Bulk-restores momento entries, e.g. from persisted storage.
    pub fn absorb_momentos(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        self.momentos.absorb(entries);
    }

    /// Cache for `cell`: restored from its momento when one was persisted,
    /// freshly seeded otherwise. The returned cache is transient; mutations
    /// are lost unless written back with [`Board::save_cache`].
    pub fn open_cache(&mut self, cell: &CellHandle, luck: &dyn Luck) -> Result<Geocache> {
        match self.momentos.get(&cell.key()).map(str::to_owned) {
            Some(momento) => {
                let mut cache = Geocache::with_coins(cell.clone(), []);
                cache.restore_momento(&momento, self)?;
                Ok(cache)
            }
            None => Ok(Geocache::seeded(cell.clone(), luck)),
        }
    }

    /// Serializes `cache` into the momento map, making its current state
    /// authoritative over deterministic regeneration.
    pub fn save_cache(&mut self, cache: &Geocache) -> Result<()> {
        let momento = cache.to_momento()?;
        self.momentos.set(cache.cell().key(), momento);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn board(radius: u32) -> Board {
        Board::new(1e-4, radius).unwrap()
    }

    #[test]
    fn canonicalize_is_identity_stable() {
        let mut board = board(1);

        let a = board.canonicalize(5, 7);
        let b = board.canonicalize(5, 7);

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(board.known_cell_count(), 1);
    }

    #[test]
    fn cell_for_point_is_stable() {
        let mut board = board(1);
        let point = GeoPoint::new(36.9995, -122.0533);

        let a = board.cell_for_point(point);
        let b = board.cell_for_point(point);

        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn points_in_the_same_tile_share_a_cell() {
        let mut board = board(1);

        let a = board.cell_for_point(GeoPoint::new(0.00001, 0.00002));
        let b = board.cell_for_point(GeoPoint::new(0.00009, 0.00008));

        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.coords(), (0, 0));
    }

    #[test]
    fn negative_coordinates_floor_toward_negative_infinity() {
        let mut board = board(1);

        let cell = board.cell_for_point(GeoPoint::new(-0.00005, 0.00025));

        assert_eq!(cell.coords(), (-1, 2));
    }

    #[test]
    fn bounds_contain_their_point() {
        let mut board = board(1);

        for point in [
            GeoPoint::new(0.00012, 0.00047),
            GeoPoint::new(-0.00003, -0.00012),
            GeoPoint::new(36.99953, -122.05337),
        ] {
            let cell = board.cell_for_point(point);
            let bounds = board.cell_bounds(&cell);
            assert!(bounds.contains(point), "{point:?} not in {bounds:?}");
        }
    }

    #[test]
    fn bounds_follow_the_grid() {
        // tile width chosen exactly representable so the grid math is exact
        let mut board = Board::new(0.25, 1).unwrap();
        let cell = board.canonicalize(3, -2);

        let bounds = board.cell_bounds(&cell);

        assert_eq!(bounds.lat_min, 0.75);
        assert_eq!(bounds.lng_min, -0.5);
        assert_eq!(bounds.lat_max, 1.0);
        assert_eq!(bounds.lng_max, -0.25);
    }

    #[test]
    fn cells_near_returns_the_full_square() {
        let mut board = board(2);

        let cells = board.cells_near(GeoPoint::new(0.0, 0.0));

        assert_eq!(cells.len(), 16);
        let distinct: HashSet<_> = cells.iter().map(|cell| cell.coords()).collect();
        assert_eq!(distinct.len(), 16);
        // row-major from the most negative offset
        assert_eq!(cells[0].coords(), (-2, -2));
        assert_eq!(cells[15].coords(), (1, 1));
    }

    #[test]
    fn cells_near_radius_zero_yields_nothing() {
        let mut board = board(0);

        assert!(board.cells_near(GeoPoint::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn invalid_tile_width_is_rejected() {
        assert!(matches!(
            Board::new(0.0, 1),
            Err(GameError::InvalidTileWidth)
        ));
        assert!(matches!(
            Board::new(-1.0, 1),
            Err(GameError::InvalidTileWidth)
        ));
        assert!(matches!(
            Board::new(f64::NAN, 1),
            Err(GameError::InvalidTileWidth)
        ));
    }
}
