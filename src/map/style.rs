// Overlay layer definitions, in draw order.
use super::{CirclePaint, Layer, LayerFilter, LayerId, LayerSource, LinePaint, Paint};
use crate::config::ViewerConfig;
use crate::features::DatasetId;

pub const LENS_POINT_COLOR: &str = "#e74c3c";

/// Normal point layers follow the dataset visibility flags; the lens layers
/// start hidden with a lens filter that matches nothing.
pub fn overlay_layers(config: &ViewerConfig, primary_visible: bool, secondary_visible: bool) -> Vec<Layer> {
    vec![
        Layer {
            id: LayerId::PrimaryPoints,
            source: LayerSource::Points(DatasetId::Primary),
            paint: Paint::Circle(CirclePaint {
                radius: 3.0,
                color: config.primary.color.clone(),
                opacity: 0.7,
                stroke_color: config.primary.stroke_color.clone(),
                stroke_width: 1.0,
            }),
            visible: primary_visible,
            filter: LayerFilter::All,
        },
        Layer {
            id: LayerId::SecondaryPoints,
            source: LayerSource::Points(DatasetId::Secondary),
            paint: Paint::Circle(CirclePaint {
                radius: 3.0,
                color: config.secondary.color.clone(),
                opacity: 0.7,
                stroke_color: config.secondary.stroke_color.clone(),
                stroke_width: 1.0,
            }),
            visible: secondary_visible,
            filter: LayerFilter::All,
        },
        Layer {
            id: LayerId::PrimaryLens,
            source: LayerSource::Points(DatasetId::Primary),
            paint: Paint::Circle(CirclePaint {
                radius: 4.0,
                color: LENS_POINT_COLOR.to_string(),
                opacity: 0.9,
                stroke_color: "#fff".to_string(),
                stroke_width: 1.0,
            }),
            visible: false,
            filter: LayerFilter::Nothing,
        },
        Layer {
            id: LayerId::LensOutline,
            source: LayerSource::LensOutline,
            paint: Paint::Line(LinePaint {
                width: 2.0,
                color: "#000".to_string(),
                dash: [2.0, 2.0],
            }),
            visible: false,
            filter: LayerFilter::All,
        },
    ]
}
