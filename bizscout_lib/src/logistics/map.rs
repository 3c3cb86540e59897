//! GeoJSON rendering of a day route.

use serde::Serialize;
use serde_json::{json, Value};

use super::geo::Waypoint;
use crate::models::{CompanyReference, Route};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
    LineString { coordinates: Vec<[f64; 2]> },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geometry: Geometry,
    pub properties: Value,
}

impl Feature {
    fn new(geometry: Geometry, properties: Value) -> Self {
        Self {
            kind: "Feature",
            geometry,
            properties,
        }
    }
}

/// A GeoJSON `FeatureCollection`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteMap {
    #[serde(rename = "type")]
    kind: &'static str,
    pub features: Vec<Feature>,
}

impl RouteMap {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// GeoJSON positions are `[longitude, latitude]`.
fn position((latitude, longitude): (f64, f64)) -> [f64; 2] {
    [longitude, latitude]
}

/// Start point, numbered stops in visit order, and the driving line.
///
/// Stops without coordinates are left out of the geometry. An unoptimized
/// route is drawn in insertion order.
pub fn create_route_map(route: &Route, start: &Waypoint) -> RouteMap {
    let mut features = Vec::new();
    let mut line = Vec::new();

    if let Some(coords) = start.coordinates {
        features.push(Feature::new(
            Geometry::Point {
                coordinates: position(coords),
            },
            json!({
                "name": start.name,
                "role": "start",
                "day": route.day(),
            }),
        ));
        line.push(position(coords));
    }

    let stops: Vec<&CompanyReference> = if route.is_optimized() {
        route.ordered_companies()
    } else {
        route.companies().iter().collect()
    };

    for (visit, stop) in stops.iter().enumerate() {
        let Some(coords) = stop.coordinates else {
            continue;
        };
        features.push(Feature::new(
            Geometry::Point {
                coordinates: position(coords),
            },
            json!({
                "id": stop.id,
                "name": stop.name,
                "address": stop.address.to_string(),
                "stop": visit + 1,
                "role": "company",
            }),
        ));
        line.push(position(coords));
    }

    if let Some(coords) = start.coordinates {
        line.push(position(coords));
    }

    if line.len() >= 2 {
        features.push(Feature::new(
            Geometry::LineString { coordinates: line },
            json!({
                "day": route.day(),
                "total_distance_miles": route.total_distance(),
                "estimated_travel_hours": route.estimated_travel_time(),
            }),
        ));
    }

    RouteMap {
        kind: "FeatureCollection",
        features,
    }
}
