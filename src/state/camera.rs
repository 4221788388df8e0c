// Map camera: Web Mercator view plus the drag state of the pointer.
use crate::map::projection::{
    project_world, unproject_world, world_size, wrap_lng, LngLat, ScreenPoint, ViewportBounds,
};

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 20.0;
/// Zoom levels per wheel delta unit.
pub const WHEEL_ZOOM_RATE: f64 = 1.0 / 450.0;
/// Pixels per button pan step.
pub const PAN_STEP_PX: f64 = 120.0;
/// Degrees per button rotation step.
pub const ROTATE_STEP_DEG: f64 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraAction {
    ZoomIn,
    ZoomOut,
    Pan { dx: f64, dy: f64 },
    Rotate { degrees: f64 },
    Reset,
}

#[derive(Debug, Clone)]
pub struct Camera {
    pub center: LngLat,
    pub zoom: f64,
    /// Degrees clockwise from north of the screen's up direction.
    pub bearing: f64,
    pub width: f64,
    pub height: f64,
    pub panning: bool,
    pub rotating: bool,
    pub last_x: f64,
    pub last_y: f64,
    home_center: LngLat,
    home_zoom: f64,
}

impl Camera {
    pub fn new(center: LngLat, zoom: f64) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            center,
            zoom,
            bearing: 0.0,
            width: 800.0,
            height: 600.0,
            panning: false,
            rotating: false,
            last_x: 0.0,
            last_y: 0.0,
            home_center: center,
            home_zoom: zoom,
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
    }

    pub fn screen_center(&self) -> ScreenPoint {
        ScreenPoint::new(self.width * 0.5, self.height * 0.5)
    }

    /// Screen position of the world copy of `c` nearest the center.
    pub fn project(&self, c: LngLat) -> ScreenPoint {
        let (wx, wy) = project_world(c, self.zoom);
        let (cx, cy) = project_world(self.center, self.zoom);
        let size = world_size(self.zoom);
        let mut dx = wx - cx;
        if dx > size * 0.5 {
            dx -= size;
        } else if dx < -size * 0.5 {
            dx += size;
        }
        let (sx, sy) = rotate(dx, wy - cy, -self.bearing);
        let mid = self.screen_center();
        ScreenPoint::new(mid.x + sx, mid.y + sy)
    }

    pub fn unproject(&self, p: ScreenPoint) -> LngLat {
        let mid = self.screen_center();
        let (dx, dy) = rotate(p.x - mid.x, p.y - mid.y, self.bearing);
        let (cx, cy) = project_world(self.center, self.zoom);
        unproject_world(cx + dx, cy + dy, self.zoom)
    }

    /// Bounding rectangle of the four unprojected canvas corners. A view
    /// straddling the antimeridian yields west > east.
    pub fn bounds(&self) -> ViewportBounds {
        let corners = [
            self.unproject(ScreenPoint::new(0.0, 0.0)),
            self.unproject(ScreenPoint::new(self.width, 0.0)),
            self.unproject(ScreenPoint::new(self.width, self.height)),
            self.unproject(ScreenPoint::new(0.0, self.height)),
        ];
        let mut bounds = ViewportBounds::from_corners(&corners);
        if bounds.east - bounds.west >= 360.0 {
            bounds.west = -180.0;
            bounds.east = 180.0;
        } else {
            bounds.west = wrap_lng(bounds.west);
            bounds.east = wrap_lng(bounds.east);
        }
        bounds
    }

    /// Moves the map content by a screen delta.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let mid = self.screen_center();
        let center = self.unproject(ScreenPoint::new(mid.x - dx, mid.y - dy));
        self.center = LngLat::new(wrap_lng(center.lng), center.lat);
    }

    /// Changes zoom keeping the location under `anchor` in place.
    pub fn zoom_at(&mut self, anchor: ScreenPoint, delta: f64) {
        let target = self.unproject(anchor);
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
        let moved = self.project(target);
        self.pan_by(anchor.x - moved.x, anchor.y - moved.y);
    }

    pub fn rotate_by(&mut self, degrees: f64) {
        let b = (self.bearing + degrees).rem_euclid(360.0);
        self.bearing = if b > 180.0 { b - 360.0 } else { b };
    }

    pub fn reset(&mut self) {
        self.center = self.home_center;
        self.zoom = self.home_zoom;
        self.bearing = 0.0;
    }

    pub fn apply(&mut self, action: CameraAction) {
        match action {
            CameraAction::ZoomIn => self.zoom_at(self.screen_center(), 1.0),
            CameraAction::ZoomOut => self.zoom_at(self.screen_center(), -1.0),
            CameraAction::Pan { dx, dy } => self.pan_by(dx, dy),
            CameraAction::Rotate { degrees } => self.rotate_by(degrees),
            CameraAction::Reset => self.reset(),
        }
    }
}

fn rotate(x: f64, y: f64, degrees: f64) -> (f64, f64) {
    let (s, c) = degrees.to_radians().sin_cos();
    (x * c - y * s, x * s + y * c)
}
