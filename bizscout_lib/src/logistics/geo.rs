//! Distance between route stops.

use serde::Serialize;

use crate::models::{Address, CompanyReference};

const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Distance used when either stop has no coordinates.
pub const FALLBACK_DISTANCE_MILES: f64 = 10.0;

/// A point a route starts from or visits.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waypoint {
    pub name: String,
    pub address: Address,
    pub coordinates: Option<(f64, f64)>,
}

impl Waypoint {
    pub fn new(name: &str, address: Address, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.to_string(),
            address,
            coordinates: Some((latitude, longitude)),
        }
    }
}

impl From<&CompanyReference> for Waypoint {
    fn from(reference: &CompanyReference) -> Self {
        Self {
            name: reference.name.clone(),
            address: reference.address.clone(),
            coordinates: reference.coordinates,
        }
    }
}

/// Miles between two stops. Implementations must be symmetric.
pub trait GeoDistance {
    fn distance(&self, from: &Waypoint, to: &Waypoint) -> f64;
}

/// Great-circle distance over stored coordinates.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineDistance;

impl GeoDistance for HaversineDistance {
    fn distance(&self, from: &Waypoint, to: &Waypoint) -> f64 {
        match (from.coordinates, to.coordinates) {
            (Some((lat1, lon1)), Some((lat2, lon2))) => haversine_miles(lat1, lon1, lat2, lon2),
            _ => FALLBACK_DISTANCE_MILES,
        }
    }
}

/// Same distance between every pair of distinct stops.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistance(pub f64);

impl GeoDistance for FixedDistance {
    fn distance(&self, from: &Waypoint, to: &Waypoint) -> f64 {
        if from == to {
            0.0
        } else {
            self.0
        }
    }
}

pub fn haversine_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let (delta_phi, delta_lambda) = ((lat2 - lat1).to_radians(), (lon2 - lon1).to_radians());
    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_MILES * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Symmetric matrix with a zero diagonal over `stops`.
pub fn distance_matrix(stops: &[Waypoint], geo: &dyn GeoDistance) -> Vec<Vec<f64>> {
    let n = stops.len();
    let mut matrix = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = geo.distance(&stops[i], &stops[j]);
            matrix[i][j] = d;
            matrix[j][i] = d;
        }
    }
    matrix
}
