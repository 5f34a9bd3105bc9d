use serde::{Deserialize, Serialize};

/// Single grid axis used for cell coordinates.
pub type Coord = i64;

/// Two-dimensional grid coordinates `(i, j)`.
pub type Coord2 = (Coord, Coord);

/// Per-cell coin serial number.
pub type Serial = u32;

/// Raw continuous coordinate as supplied by the position source.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Geographic rectangle covered by one cell, half-open on the max edges.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CellBounds {
    pub lat_min: f64,
    pub lng_min: f64,
    pub lat_max: f64,
    pub lng_max: f64,
}

impl CellBounds {
    pub fn contains(&self, point: GeoPoint) -> bool {
        self.lat_min <= point.lat
            && point.lat < self.lat_max
            && self.lng_min <= point.lng
            && point.lng < self.lng_max
    }
}
