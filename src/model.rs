// Viewer state and the controller that applies UI and map events to it.

use crate::config::ViewerConfig;
use crate::counter::{count_in_bounds, count_matching, LensWindow};
use crate::features::{DatasetId, Datasets};
use crate::map::projection::ScreenPoint;
use crate::map::{style, LayerFilter, LayerId, MapAdapter};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reveal {
    #[default]
    Off,
    On,
}

impl Reveal {
    pub fn is_on(self) -> bool {
        self == Reveal::On
    }

    fn toggled(self) -> Self {
        match self {
            Reveal::Off => Reveal::On,
            Reveal::On => Reveal::Off,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibilityState {
    pub primary_visible: bool,
    pub secondary_visible: bool,
    pub reveal: Reveal,
}

impl Default for VisibilityState {
    fn default() -> Self {
        Self {
            primary_visible: true,
            secondary_visible: true,
            reveal: Reveal::Off,
        }
    }
}

impl VisibilityState {
    pub fn is_visible(&self, dataset: DatasetId) -> bool {
        match dataset {
            DatasetId::Primary => self.primary_visible,
            DatasetId::Secondary => self.secondary_visible,
        }
    }

    fn set(&mut self, dataset: DatasetId, visible: bool) {
        match dataset {
            DatasetId::Primary => self.primary_visible = visible,
            DatasetId::Secondary => self.secondary_visible = visible,
        }
    }
}

/// The two on-screen counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CountDisplay {
    pub primary: usize,
    pub secondary: usize,
}

impl CountDisplay {
    pub fn get(&self, dataset: DatasetId) -> usize {
        match dataset {
            DatasetId::Primary => self.primary,
            DatasetId::Secondary => self.secondary,
        }
    }

    fn set(&mut self, dataset: DatasetId, count: usize) {
        match dataset {
            DatasetId::Primary => self.primary = count,
            DatasetId::Secondary => self.secondary = count,
        }
    }

    pub fn total(&self) -> usize {
        self.primary + self.secondary
    }

    /// Sum over the visible area. None while the primary counter follows the
    /// lens, since the two counters then cover different areas.
    pub fn total_in_view(&self, reveal: Reveal) -> Option<usize> {
        (!reveal.is_on()).then(|| self.total())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    Loading,
    Ready,
    Failed,
}

#[derive(Clone, Debug)]
pub enum ViewerEvent {
    Loaded(Datasets),
    LoadFailed,
    ToggleDataset { dataset: DatasetId, visible: bool },
    ToggleReveal,
    CursorMove { point: ScreenPoint },
    /// The map view settled after a pan, zoom, rotation or resize.
    MoveEnd,
}

/// What the panels render from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerSnapshot {
    pub visibility: VisibilityState,
    pub counts: CountDisplay,
    pub load: LoadStatus,
    /// Bumped on every applied change; drives canvas redraws.
    pub version: u64,
}

#[derive(Debug, Clone)]
pub struct Viewer {
    config: ViewerConfig,
    datasets: Option<Datasets>,
    visibility: VisibilityState,
    counts: CountDisplay,
    lens: Option<LensWindow>,
    load: LoadStatus,
    version: u64,
}

impl Viewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            datasets: None,
            visibility: VisibilityState::default(),
            counts: CountDisplay::default(),
            lens: None,
            load: LoadStatus::Loading,
            version: 0,
        }
    }

    pub fn snapshot(&self) -> ViewerSnapshot {
        ViewerSnapshot {
            visibility: self.visibility,
            counts: self.counts,
            load: self.load,
            version: self.version,
        }
    }

    /// Applies one event. Returns false when the event was ignored.
    pub fn apply<M: MapAdapter + ?Sized>(&mut self, map: &mut M, event: ViewerEvent) -> bool {
        use ViewerEvent::*;
        match event {
            Loaded(datasets) => {
                if self.datasets.is_some() {
                    log::warn!("datasets already loaded, ignoring second load");
                    return false;
                }
                log::info!(
                    "datasets ready: {} primary, {} secondary",
                    datasets.primary.len(),
                    datasets.secondary.len()
                );
                map.add_point_source(DatasetId::Primary, datasets.primary.clone());
                map.add_point_source(DatasetId::Secondary, datasets.secondary.clone());
                for layer in style::overlay_layers(
                    &self.config,
                    self.visibility.primary_visible,
                    self.visibility.secondary_visible,
                ) {
                    map.add_layer(layer);
                }
                self.datasets = Some(datasets);
                self.load = LoadStatus::Ready;
                if self.visibility.reveal.is_on() {
                    self.show_lens_layers(map, true);
                    let point = self.lens.map_or_else(|| map.screen_center(), |w| w.center);
                    self.update_lens(map, point);
                }
                self.recount_viewport(&*map);
            }
            LoadFailed => {
                self.load = LoadStatus::Failed;
            }
            ToggleDataset { dataset, visible } => {
                self.visibility.set(dataset, visible);
                map.set_layer_visibility(LayerId::points_of(dataset), visible);
                self.recount_viewport(&*map);
            }
            ToggleReveal => self.toggle_reveal(map),
            CursorMove { point } => {
                if !self.visibility.reveal.is_on() {
                    return false;
                }
                self.update_lens(map, point);
            }
            MoveEnd => self.recount_viewport(&*map),
        }
        self.version += 1;
        true
    }

    fn toggle_reveal<M: MapAdapter + ?Sized>(&mut self, map: &mut M) {
        self.visibility.reveal = self.visibility.reveal.toggled();
        let on = self.visibility.reveal.is_on();
        log::debug!("reveal mode {}", if on { "on" } else { "off" });
        self.show_lens_layers(map, on);
        if on {
            self.visibility.primary_visible = false;
            map.set_layer_visibility(LayerId::PrimaryPoints, false);
            let center = map.screen_center();
            self.update_lens(map, center);
        } else {
            // primary visibility is left as reveal mode set it
            map.set_filter(LayerId::PrimaryLens, LayerFilter::Nothing);
            map.set_outline(None);
            self.counts.primary = 0;
            self.lens = None;
        }
        self.recount_viewport(&*map);
    }

    fn show_lens_layers<M: MapAdapter + ?Sized>(&self, map: &mut M, visible: bool) {
        map.set_layer_visibility(LayerId::PrimaryLens, visible);
        map.set_layer_visibility(LayerId::LensOutline, visible);
    }

    fn update_lens<M: MapAdapter + ?Sized>(&mut self, map: &mut M, point: ScreenPoint) {
        let window = LensWindow::new(point, self.config.lens_half_size_px);
        let polygon = window.polygon(&*map);
        let filter = LayerFilter::Within(polygon.clone());
        self.counts.primary = self
            .datasets
            .as_ref()
            .map_or(0, |d| count_matching(&filter, &d.primary));
        map.set_filter(LayerId::PrimaryLens, filter);
        map.set_outline(Some(polygon));
        self.lens = Some(window);
    }

    /// While reveal mode is on the primary counter belongs to the lens. A
    /// dataset whose point layer is not on the map counts zero.
    fn recount_viewport<M: MapAdapter + ?Sized>(&mut self, map: &M) {
        let reveal_on = self.visibility.reveal.is_on();
        let Some(datasets) = self.datasets.as_ref() else {
            if !reveal_on {
                self.counts = CountDisplay::default();
            }
            return;
        };
        let bounds = map.bounds();
        for dataset in [DatasetId::Primary, DatasetId::Secondary] {
            if dataset == DatasetId::Primary && reveal_on {
                continue;
            }
            let count = if map.has_layer(LayerId::points_of(dataset)) {
                count_in_bounds(&bounds, datasets.get(dataset), self.visibility.is_visible(dataset))
            } else {
                0
            };
            self.counts.set(dataset, count);
        }
    }
}

#[cfg(test)]
impl Viewer {
    pub fn visibility(&self) -> VisibilityState {
        self.visibility
    }

    pub fn counts(&self) -> CountDisplay {
        self.counts
    }

    pub fn lens(&self) -> Option<LensWindow> {
        self.lens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::points;
    use crate::map::projection::LngLat;
    use crate::map::MapSurface;
    use crate::state::Camera;

    fn surface() -> MapSurface {
        MapSurface::new(Camera::new(LngLat::new(-74.006, 40.7128), 13.0))
    }

    /// Primary: three points near the centre plus one far away.
    /// Secondary: one point near the centre and one outside the view.
    fn loaded(map: &mut MapSurface) -> Viewer {
        let cam = map.camera.clone();
        let at = |x: f64, y: f64| {
            let c = cam.unproject(ScreenPoint::new(x, y));
            (c.lng, c.lat)
        };
        let primary = points(&[at(400.0, 300.0), at(420.0, 320.0), at(100.0, 100.0), (10.0, 10.0)]);
        let secondary = points(&[at(390.0, 310.0), (-73.0, 41.5)]);
        let mut viewer = Viewer::new(ViewerConfig::default());
        assert!(viewer.apply(map, ViewerEvent::Loaded(Datasets::new(primary, secondary))));
        viewer
    }

    #[test]
    fn counts_stay_zero_until_loaded() {
        let mut map = surface();
        let mut viewer = Viewer::new(ViewerConfig::default());
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        viewer.apply(&mut map, ViewerEvent::ToggleDataset { dataset: DatasetId::Secondary, visible: true });
        assert_eq!(viewer.counts(), CountDisplay::default());
        assert!(map.layers().is_empty());
        assert_eq!(viewer.snapshot().load, LoadStatus::Loading);
    }

    #[test]
    fn load_adds_layers_and_counts_viewport() {
        let mut map = surface();
        let viewer = loaded(&mut map);
        assert_eq!(map.layers().len(), 4);
        assert_eq!(viewer.counts(), CountDisplay { primary: 3, secondary: 1 });
        assert_eq!(viewer.counts().total(), 4);
        assert_eq!(viewer.snapshot().load, LoadStatus::Ready);
    }

    #[test]
    fn failed_load_adds_nothing() {
        let mut map = surface();
        let mut viewer = Viewer::new(ViewerConfig::default());
        viewer.apply(&mut map, ViewerEvent::LoadFailed);
        assert_eq!(viewer.snapshot().load, LoadStatus::Failed);
        assert!(map.layers().is_empty());
        assert_eq!(viewer.counts().total(), 0);
    }

    #[test]
    fn hidden_dataset_shows_zero_and_comes_back() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        let before = viewer.counts();
        viewer.apply(&mut map, ViewerEvent::ToggleDataset { dataset: DatasetId::Primary, visible: false });
        assert_eq!(viewer.counts().primary, 0);
        assert_eq!(viewer.counts().secondary, before.secondary);
        assert_eq!(map.layer(LayerId::PrimaryPoints).map(|l| l.visible), Some(false));
        viewer.apply(&mut map, ViewerEvent::ToggleDataset { dataset: DatasetId::Primary, visible: true });
        assert_eq!(viewer.counts(), before);
    }

    #[test]
    fn toggle_before_load_is_honoured_by_layers() {
        let mut map = surface();
        let mut viewer = Viewer::new(ViewerConfig::default());
        viewer.apply(&mut map, ViewerEvent::ToggleDataset { dataset: DatasetId::Secondary, visible: false });
        viewer.apply(
            &mut map,
            ViewerEvent::Loaded(Datasets::new(points(&[(-74.006, 40.7128)]), points(&[(-74.006, 40.7128)]))),
        );
        assert_eq!(map.layer(LayerId::SecondaryPoints).map(|l| l.visible), Some(false));
        assert_eq!(viewer.counts(), CountDisplay { primary: 1, secondary: 0 });
    }

    #[test]
    fn recount_is_idempotent() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        let first = viewer.counts();
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        assert_eq!(viewer.counts(), first);
    }

    #[test]
    fn move_end_follows_the_camera() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        map.camera.pan_by(-5000.0, 0.0);
        assert_eq!(viewer.counts().primary, 3);
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        assert_eq!(viewer.counts(), CountDisplay::default());
    }

    #[test]
    fn entering_reveal_hides_primary_and_counts_lens() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        let viewport_primary = viewer.counts().primary;
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);

        let vis = viewer.visibility();
        assert!(vis.reveal.is_on());
        assert!(!vis.primary_visible);
        assert_eq!(map.layer(LayerId::PrimaryPoints).map(|l| l.visible), Some(false));
        assert_eq!(map.layer(LayerId::PrimaryLens).map(|l| l.visible), Some(true));
        assert_eq!(map.layer(LayerId::LensOutline).map(|l| l.visible), Some(true));

        let lens = viewer.lens().unwrap();
        assert_eq!(lens.center, map.camera.screen_center());
        assert_eq!(lens.half_size, 60.0);
        // (400,300) and (420,320) are inside the centred 120px square
        assert_eq!(viewer.counts().primary, 2);
        assert!(viewer.counts().primary <= viewport_primary);
        assert_eq!(viewer.counts().secondary, 1);

        let outline = map.outline().unwrap();
        assert!(outline.is_closed());
        assert_eq!(outline.ring().len(), 5);
        assert!(matches!(
            map.layer(LayerId::PrimaryLens).map(|l| &l.filter),
            Some(LayerFilter::Within(_))
        ));
    }

    #[test]
    fn lens_follows_cursor_only_in_reveal_mode() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        assert!(!viewer.apply(&mut map, ViewerEvent::CursorMove { point: ScreenPoint::new(100.0, 100.0) }));
        assert!(viewer.lens().is_none());
        assert!(map.outline().is_none());

        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        assert!(viewer.apply(&mut map, ViewerEvent::CursorMove { point: ScreenPoint::new(100.0, 100.0) }));
        assert_eq!(viewer.counts().primary, 1);
        viewer.apply(&mut map, ViewerEvent::CursorMove { point: ScreenPoint::new(700.0, 500.0) });
        assert_eq!(viewer.counts().primary, 0);
        assert_eq!(viewer.lens().map(|l| l.center), Some(ScreenPoint::new(700.0, 500.0)));
    }

    #[test]
    fn move_end_keeps_lens_count_in_reveal_mode() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        let lens_count = viewer.counts().primary;
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        assert_eq!(viewer.counts().primary, lens_count);
    }

    #[test]
    fn lens_is_skewed_on_a_rotated_map() {
        let mut map = surface();
        map.camera.rotate_by(45.0);
        let mut viewer = loaded(&mut map);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        let ring = *map.outline().unwrap().ring();
        // top edge of the square is no longer a line of constant latitude
        assert!((ring[0].lat - ring[1].lat).abs() > 1e-6);
        assert!(ring[0] == ring[4]);
    }

    #[test]
    fn exiting_reveal_zeroes_primary_and_keeps_it_hidden() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        assert!(viewer.counts().primary > 0);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);

        assert_eq!(viewer.counts().primary, 0);
        assert!(!viewer.visibility().reveal.is_on());
        assert!(!viewer.visibility().primary_visible);
        assert_eq!(map.layer(LayerId::PrimaryPoints).map(|l| l.visible), Some(false));
        assert_eq!(map.layer(LayerId::PrimaryLens).map(|l| l.visible), Some(false));
        assert_eq!(map.layer(LayerId::PrimaryLens).map(|l| &l.filter), Some(&LayerFilter::Nothing));
        assert!(map.outline().is_none());
        assert!(viewer.lens().is_none());
    }

    #[test]
    fn rechecking_primary_after_reveal_restores_viewport_count() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        viewer.apply(&mut map, ViewerEvent::ToggleDataset { dataset: DatasetId::Primary, visible: true });
        assert_eq!(viewer.counts().primary, 3);
    }

    #[test]
    fn reveal_before_load_picks_up_lens_on_load() {
        let mut map = surface();
        let mut viewer = Viewer::new(ViewerConfig::default());
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        assert_eq!(viewer.counts().primary, 0);
        let c = map.camera.center;
        viewer.apply(
            &mut map,
            ViewerEvent::Loaded(Datasets::new(points(&[(c.lng, c.lat)]), points(&[]))),
        );
        assert_eq!(viewer.counts().primary, 1);
        assert_eq!(map.layer(LayerId::PrimaryPoints).map(|l| l.visible), Some(false));
        assert_eq!(map.layer(LayerId::PrimaryLens).map(|l| l.visible), Some(true));
    }

    #[test]
    fn map_without_point_layers_counts_zero() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        let mut bare = MapSurface::new(map.camera.clone());
        viewer.apply(&mut bare, ViewerEvent::MoveEnd);
        assert_eq!(viewer.counts(), CountDisplay::default());
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        assert_eq!(viewer.counts(), CountDisplay { primary: 3, secondary: 1 });
    }

    #[test]
    fn total_in_view_is_withheld_in_reveal_mode() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        assert_eq!(viewer.counts().total_in_view(viewer.visibility().reveal), Some(4));
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        assert_eq!(viewer.counts().total_in_view(viewer.visibility().reveal), None);
        viewer.apply(&mut map, ViewerEvent::ToggleReveal);
        // primary stays hidden after reveal mode
        assert_eq!(viewer.counts().total_in_view(viewer.visibility().reveal), Some(1));
    }

    #[test]
    fn version_bumps_only_on_applied_events() {
        let mut map = surface();
        let mut viewer = loaded(&mut map);
        let v = viewer.snapshot().version;
        viewer.apply(&mut map, ViewerEvent::CursorMove { point: ScreenPoint::new(1.0, 1.0) });
        assert_eq!(viewer.snapshot().version, v);
        viewer.apply(&mut map, ViewerEvent::MoveEnd);
        assert_eq!(viewer.snapshot().version, v + 1);
    }
}
