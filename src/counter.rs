// Viewport and lens counting.
use geo::{Intersects, LineString, Polygon};

use crate::features::FeatureSet;
use crate::map::projection::{LngLat, ScreenPoint, ViewportBounds};
use crate::map::{LayerFilter, MapAdapter};

pub const DEFAULT_LENS_HALF_SIZE_PX: f64 = 60.0;

/// Number of features inside `bounds`, or 0 for a hidden dataset.
pub fn count_in_bounds(bounds: &ViewportBounds, set: &FeatureSet, visible: bool) -> usize {
    if !visible {
        return 0;
    }
    set.iter().filter(|f| bounds.contains(f.coord)).count()
}

/// Number of features a layer filter lets through.
pub fn count_matching(filter: &LayerFilter, set: &FeatureSet) -> usize {
    set.iter().filter(|f| filter.matches(f.coord)).count()
}

/// Screen square centred on the cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LensWindow {
    pub center: ScreenPoint,
    pub half_size: f64,
}

impl LensWindow {
    pub fn new(center: ScreenPoint, half_size: f64) -> Self {
        Self { center, half_size }
    }

    /// Top-left, top-right, bottom-right, bottom-left.
    pub fn corners(&self) -> [ScreenPoint; 4] {
        let ScreenPoint { x, y } = self.center;
        let h = self.half_size;
        [
            ScreenPoint::new(x - h, y - h),
            ScreenPoint::new(x + h, y - h),
            ScreenPoint::new(x + h, y + h),
            ScreenPoint::new(x - h, y + h),
        ]
    }

    pub fn polygon<M: MapAdapter + ?Sized>(&self, map: &M) -> LensPolygon {
        LensPolygon::from_corners(self.corners().map(|p| map.unproject(p)))
    }
}

/// Closed geographic ring of the four unprojected lens corners.
#[derive(Clone, Debug, PartialEq)]
pub struct LensPolygon {
    ring: [LngLat; 5],
    shape: Polygon<f64>,
}

impl LensPolygon {
    pub fn from_corners(corners: [LngLat; 4]) -> Self {
        let ring = [corners[0], corners[1], corners[2], corners[3], corners[0]];
        let exterior: LineString<f64> = ring.iter().map(|&c| geo::Coord::from(c)).collect();
        Self {
            ring,
            shape: Polygon::new(exterior, Vec::new()),
        }
    }

    pub fn ring(&self) -> &[LngLat; 5] {
        &self.ring
    }

    #[cfg(test)]
    pub fn is_closed(&self) -> bool {
        self.ring[0] == self.ring[4]
    }

    /// Point-in-polygon, boundary inclusive. Corners are unwrapped screen
    /// longitudes, so the neighbouring world copies of `c` are tried too.
    pub fn contains(&self, c: LngLat) -> bool {
        [0.0, 360.0, -360.0].iter().any(|shift| {
            self.shape
                .intersects(&geo::Coord::from(LngLat::new(c.lng + shift, c.lat)))
        })
    }
}
