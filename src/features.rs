// Point datasets, loaded once at startup from GeoJSON feature collections.

use std::rc::Rc;

use geojson::{FeatureCollection, GeoJson, JsonObject, Value};
use gloo_net::http::Request;
use thiserror::Error;

use crate::map::projection::LngLat;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetId {
    Primary,
    Secondary,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PointFeature {
    pub coord: LngLat,
    /// Attributes carried through from the source file, unused by counting.
    pub properties: JsonObject,
}

/// Ordered, immutable collection of point features. A feature's identity is
/// its index.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    features: Vec<PointFeature>,
}

impl FeatureSet {
    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointFeature> {
        self.features.iter()
    }

    #[cfg(test)]
    pub fn get(&self, index: usize) -> Option<&PointFeature> {
        self.features.get(index)
    }
}

impl FromIterator<PointFeature> for FeatureSet {
    fn from_iter<I: IntoIterator<Item = PointFeature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

/// Both datasets, shared read-only with the map surface.
#[derive(Clone, Debug, PartialEq)]
pub struct Datasets {
    pub primary: Rc<FeatureSet>,
    pub secondary: Rc<FeatureSet>,
}

impl Datasets {
    pub fn new(primary: FeatureSet, secondary: FeatureSet) -> Self {
        Self {
            primary: Rc::new(primary),
            secondary: Rc::new(secondary),
        }
    }

    pub fn get(&self, dataset: DatasetId) -> &Rc<FeatureSet> {
        match dataset {
            DatasetId::Primary => &self.primary,
            DatasetId::Secondary => &self.secondary,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("request to {url} failed")]
    Network {
        url: String,
        #[source]
        source: gloo_net::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} is not a GeoJSON feature collection")]
    Decode {
        url: String,
        #[source]
        source: geojson::Error,
    },
}

/// Decodes a GeoJSON feature collection, keeping point features in order.
pub fn parse_feature_set(text: &str) -> Result<FeatureSet, geojson::Error> {
    let collection = FeatureCollection::try_from(text.parse::<GeoJson>()?)?;
    let total = collection.features.len();
    let set: FeatureSet = collection
        .features
        .into_iter()
        .filter_map(|feature| {
            let coord = match feature.geometry.as_ref().map(|g| &g.value) {
                Some(Value::Point(pos)) if pos.len() >= 2 => LngLat::new(pos[0], pos[1]),
                _ => return None,
            };
            Some(PointFeature {
                coord,
                properties: feature.properties.unwrap_or_default(),
            })
        })
        .collect();
    if set.len() < total {
        log::debug!("skipped {} non-point features", total - set.len());
    }
    Ok(set)
}

pub async fn fetch_feature_set(url: &str) -> Result<FeatureSet, LoadError> {
    let response = Request::get(url)
        .send()
        .await
        .map_err(|source| LoadError::Network {
            url: url.to_string(),
            source,
        })?;
    if !response.ok() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    let body = response.text().await.map_err(|source| LoadError::Network {
        url: url.to_string(),
        source,
    })?;
    let set = parse_feature_set(&body).map_err(|source| LoadError::Decode {
        url: url.to_string(),
        source,
    })?;
    if set.is_empty() {
        log::warn!("{} has no point features", url);
    } else {
        log::info!("loaded {} point features from {}", set.len(), url);
    }
    Ok(set)
}

/// Fetches both datasets concurrently; fails as soon as either fails.
pub async fn load_datasets(primary_url: &str, secondary_url: &str) -> Result<Datasets, LoadError> {
    let (primary, secondary) =
        futures::future::try_join(fetch_feature_set(primary_url), fetch_feature_set(secondary_url))
            .await?;
    Ok(Datasets::new(primary, secondary))
}

#[cfg(test)]
pub(crate) fn points(coords: &[(f64, f64)]) -> FeatureSet {
    coords
        .iter()
        .map(|&(lng, lat)| PointFeature {
            coord: LngLat::new(lng, lat),
            properties: JsonObject::new(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            { "type": "Feature", "properties": { "name": "Bakery" },
              "geometry": { "type": "Point", "coordinates": [-74.0, 40.71] } },
            { "type": "Feature", "properties": null,
              "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] } },
            { "type": "Feature", "properties": {}, "geometry": null },
            { "type": "Feature",
              "geometry": { "type": "Point", "coordinates": [-74.1, 40.8, 12.0] } }
        ]
    }"#;

    #[test]
    fn keeps_points_in_order() {
        let set = parse_feature_set(MIXED).unwrap();
        assert_eq!(set.len(), 2);
        let first = set.get(0).unwrap();
        assert_eq!(first.coord, LngLat::new(-74.0, 40.71));
        assert_eq!(first.properties.get("name").and_then(|v| v.as_str()), Some("Bakery"));
        let second = set.get(1).unwrap();
        assert_eq!(second.coord, LngLat::new(-74.1, 40.8));
        assert!(second.properties.is_empty());
    }

    #[test]
    fn empty_collection_is_fine() {
        let set = parse_feature_set(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn rejects_non_collections() {
        assert!(parse_feature_set("not json").is_err());
        assert!(parse_feature_set(r#"{"type":"Point","coordinates":[0,0]}"#).is_err());
    }

    #[test]
    fn datasets_lookup_by_id() {
        let d = Datasets::new(points(&[(0.0, 0.0)]), points(&[(1.0, 1.0), (2.0, 2.0)]));
        assert_eq!(d.get(DatasetId::Primary).len(), 1);
        assert_eq!(d.get(DatasetId::Secondary).len(), 2);
    }
}
