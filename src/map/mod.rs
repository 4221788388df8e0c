// Map surface: the adapter interface the viewer drives, and its canvas-backed implementation.
pub mod projection;
pub mod render;
pub mod style;

use std::collections::HashMap;
use std::rc::Rc;

use crate::counter::LensPolygon;
use crate::features::{DatasetId, FeatureSet};
use crate::state::Camera;
use projection::{LngLat, ScreenPoint, ViewportBounds};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayerId {
    PrimaryPoints,
    SecondaryPoints,
    PrimaryLens,
    LensOutline,
}

impl LayerId {
    /// The normal point layer of a dataset.
    pub fn points_of(dataset: DatasetId) -> Self {
        match dataset {
            DatasetId::Primary => LayerId::PrimaryPoints,
            DatasetId::Secondary => LayerId::SecondaryPoints,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LayerId::PrimaryPoints => "primary-poi-layer",
            LayerId::SecondaryPoints => "secondary-poi-layer",
            LayerId::PrimaryLens => "primary-poi-lens",
            LayerId::LensOutline => "lens-outline",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerSource {
    Points(DatasetId),
    LensOutline,
}

/// Which features of a point source a layer draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LayerFilter {
    #[default]
    All,
    Nothing,
    Within(LensPolygon),
}

impl LayerFilter {
    pub fn matches(&self, c: LngLat) -> bool {
        match self {
            LayerFilter::All => true,
            LayerFilter::Nothing => false,
            LayerFilter::Within(polygon) => polygon.contains(c),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CirclePaint {
    pub radius: f64,
    pub color: String,
    pub opacity: f64,
    pub stroke_color: String,
    pub stroke_width: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinePaint {
    pub width: f64,
    pub color: String,
    pub dash: [f64; 2],
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Circle(CirclePaint),
    Line(LinePaint),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub source: LayerSource,
    pub paint: Paint,
    pub visible: bool,
    pub filter: LayerFilter,
}

pub trait MapAdapter {
    fn bounds(&self) -> ViewportBounds;
    fn unproject(&self, point: ScreenPoint) -> LngLat;
    fn screen_center(&self) -> ScreenPoint;
    fn add_point_source(&mut self, dataset: DatasetId, features: Rc<FeatureSet>);
    fn add_layer(&mut self, layer: Layer);
    fn has_layer(&self, id: LayerId) -> bool;
    /// No-op for a layer that has not been added.
    fn set_layer_visibility(&mut self, id: LayerId, visible: bool);
    /// No-op for a layer that has not been added.
    fn set_filter(&mut self, id: LayerId, filter: LayerFilter);
    /// Replaces the lens outline source; `None` empties it.
    fn set_outline(&mut self, outline: Option<LensPolygon>);
}

#[derive(Debug, Clone)]
pub struct MapSurface {
    pub camera: Camera,
    sources: HashMap<DatasetId, Rc<FeatureSet>>,
    outline: Option<LensPolygon>,
    layers: Vec<Layer>,
}

impl MapSurface {
    pub fn new(camera: Camera) -> Self {
        Self {
            camera,
            sources: HashMap::new(),
            outline: None,
            layers: Vec::new(),
        }
    }

    /// Layers in draw order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    pub fn source(&self, dataset: DatasetId) -> Option<&Rc<FeatureSet>> {
        self.sources.get(&dataset)
    }

    pub fn outline(&self) -> Option<&LensPolygon> {
        self.outline.as_ref()
    }

    fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|l| l.id == id)
    }
}

impl MapAdapter for MapSurface {
    fn bounds(&self) -> ViewportBounds {
        self.camera.bounds()
    }

    fn unproject(&self, point: ScreenPoint) -> LngLat {
        self.camera.unproject(point)
    }

    fn screen_center(&self) -> ScreenPoint {
        self.camera.screen_center()
    }

    fn add_point_source(&mut self, dataset: DatasetId, features: Rc<FeatureSet>) {
        self.sources.insert(dataset, features);
    }

    fn add_layer(&mut self, layer: Layer) {
        match self.layer_mut(layer.id) {
            Some(existing) => {
                log::warn!("layer {} already exists, replacing it", layer.id.name());
                *existing = layer;
            }
            None => self.layers.push(layer),
        }
    }

    fn has_layer(&self, id: LayerId) -> bool {
        self.layer(id).is_some()
    }

    fn set_layer_visibility(&mut self, id: LayerId, visible: bool) {
        if let Some(layer) = self.layer_mut(id) {
            layer.visible = visible;
        }
    }

    fn set_filter(&mut self, id: LayerId, filter: LayerFilter) {
        if let Some(layer) = self.layer_mut(id) {
            layer.filter = filter;
        }
    }

    fn set_outline(&mut self, outline: Option<LensPolygon>) {
        self.outline = outline;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;
    use crate::features::points;

    fn surface() -> MapSurface {
        MapSurface::new(Camera::new(LngLat::new(0.0, 0.0), 5.0))
    }

    #[test]
    fn styling_a_missing_layer_is_a_no_op() {
        let mut map = surface();
        map.set_layer_visibility(LayerId::PrimaryPoints, false);
        map.set_filter(LayerId::PrimaryLens, LayerFilter::Nothing);
        assert!(!map.has_layer(LayerId::PrimaryPoints));
        assert!(map.layers().is_empty());
    }

    #[test]
    fn overlay_layers_keep_draw_order() {
        let mut map = surface();
        for layer in style::overlay_layers(&ViewerConfig::default(), true, true) {
            map.add_layer(layer);
        }
        let order: Vec<_> = map.layers().iter().map(|l| l.id).collect();
        assert_eq!(
            order,
            [
                LayerId::PrimaryPoints,
                LayerId::SecondaryPoints,
                LayerId::PrimaryLens,
                LayerId::LensOutline
            ]
        );
        map.set_layer_visibility(LayerId::SecondaryPoints, false);
        assert_eq!(map.layer(LayerId::SecondaryPoints).map(|l| l.visible), Some(false));
    }

    #[test]
    fn adding_a_layer_twice_replaces_it() {
        let mut map = surface();
        let layers = style::overlay_layers(&ViewerConfig::default(), true, true);
        map.add_layer(layers[0].clone());
        let mut again = layers[0].clone();
        again.visible = false;
        map.add_layer(again);
        assert_eq!(map.layers().len(), 1);
        assert!(!map.layers()[0].visible);
    }

    #[test]
    fn sources_and_outline_are_replaceable() {
        let mut map = surface();
        map.add_point_source(DatasetId::Secondary, Rc::new(points(&[(1.0, 2.0)])));
        assert_eq!(map.source(DatasetId::Secondary).map(|s| s.len()), Some(1));
        assert!(map.source(DatasetId::Primary).is_none());
        let ring = LensPolygon::from_corners([
            LngLat::new(0.0, 1.0),
            LngLat::new(1.0, 1.0),
            LngLat::new(1.0, 0.0),
            LngLat::new(0.0, 0.0),
        ]);
        map.set_outline(Some(ring));
        assert!(map.outline().is_some());
        map.set_outline(None);
        assert!(map.outline().is_none());
    }

    #[test]
    fn filter_variants() {
        let c = LngLat::new(0.5, 0.5);
        assert!(LayerFilter::All.matches(c));
        assert!(!LayerFilter::Nothing.matches(c));
    }
}
