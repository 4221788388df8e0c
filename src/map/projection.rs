// Geographic and screen coordinate types plus Web Mercator math.
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Width in pixels of the whole world at zoom 0.
pub const TILE_SIZE: f64 = 512.0;
/// Latitude limit of the square Web Mercator world.
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct LngLat {
    pub lng: f64,
    pub lat: f64,
}

impl LngLat {
    pub const fn new(lng: f64, lat: f64) -> Self {
        Self { lng, lat }
    }
}

impl From<[f64; 2]> for LngLat {
    fn from([lng, lat]: [f64; 2]) -> Self {
        Self { lng, lat }
    }
}

impl From<LngLat> for [f64; 2] {
    fn from(c: LngLat) -> Self {
        [c.lng, c.lat]
    }
}

impl From<LngLat> for geo::Coord<f64> {
    fn from(c: LngLat) -> Self {
        geo::Coord { x: c.lng, y: c.lat }
    }
}

/// Canvas pixel position, origin top-left, y growing downwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned geographic rectangle of the visible map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl ViewportBounds {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Smallest rectangle enclosing every corner.
    pub fn from_corners(corners: &[LngLat]) -> Self {
        let mut bounds = Self::new(f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        for c in corners {
            bounds.west = bounds.west.min(c.lng);
            bounds.east = bounds.east.max(c.lng);
            bounds.south = bounds.south.min(c.lat);
            bounds.north = bounds.north.max(c.lat);
        }
        bounds
    }

    /// Inclusive containment. A box whose west edge lies east of its east
    /// edge crosses the antimeridian.
    pub fn contains(&self, c: LngLat) -> bool {
        let in_lat = self.south <= c.lat && c.lat <= self.north;
        let in_lng = if self.west > self.east {
            c.lng >= self.west || c.lng <= self.east
        } else {
            self.west <= c.lng && c.lng <= self.east
        };
        in_lat && in_lng
    }
}

/// Longitude folded into [-180, 180). 180 itself is kept.
pub fn wrap_lng(lng: f64) -> f64 {
    if (-180.0..=180.0).contains(&lng) {
        lng
    } else {
        (lng + 180.0).rem_euclid(360.0) - 180.0
    }
}

pub fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * zoom.exp2()
}

/// Geographic coordinate to world pixels at `zoom`.
pub fn project_world(c: LngLat, zoom: f64) -> (f64, f64) {
    let size = world_size(zoom);
    let lat = c.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (c.lng + 180.0) / 360.0 * size;
    let y = (1.0 - (PI / 4.0 + lat / 2.0).tan().ln() / PI) / 2.0 * size;
    (x, y)
}

/// World pixels at `zoom` back to a geographic coordinate. Longitude is not
/// wrapped; callers fold it with `wrap_lng` where needed.
pub fn unproject_world(x: f64, y: f64, zoom: f64) -> LngLat {
    let size = world_size(zoom);
    let lng = x / size * 360.0 - 180.0;
    let merc = PI * (1.0 - 2.0 * y / size);
    let lat = (2.0 * merc.exp().atan() - PI / 2.0).to_degrees();
    LngLat::new(lng, lat)
}
