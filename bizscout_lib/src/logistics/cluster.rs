//! Density-based regional clustering over company coordinates.

use std::collections::{BTreeMap, VecDeque};
use std::fmt;

use serde::{Serialize, Serializer};

use crate::models::Company;

/// Neighbourhood radius in degrees of latitude/longitude.
pub const CLUSTER_EPS_DEGREES: f64 = 0.05;
/// Points needed within the radius, counting the point itself.
pub const CLUSTER_MIN_SAMPLES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ClusterLabel {
    Cluster(usize),
    Noise,
}

impl fmt::Display for ClusterLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterLabel::Cluster(n) => write!(f, "Cluster_{}", n),
            ClusterLabel::Noise => write!(f, "Other"),
        }
    }
}

impl Serialize for ClusterLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Groups located companies with DBSCAN.
///
/// Companies without valid coordinates are left out. Cluster numbers follow
/// the input order of each cluster's first core point.
pub fn cluster_companies_by_region(companies: &[Company]) -> BTreeMap<ClusterLabel, Vec<Company>> {
    let located: Vec<(&Company, (f64, f64))> = companies
        .iter()
        .filter_map(|c| c.coordinates().map(|coords| (c, coords)))
        .collect();

    let skipped = companies.len() - located.len();
    if skipped > 0 {
        tracing::debug!("Skipping {} companies without coordinates", skipped);
    }

    let points: Vec<(f64, f64)> = located.iter().map(|(_, p)| *p).collect();
    let labels = dbscan(&points, CLUSTER_EPS_DEGREES, CLUSTER_MIN_SAMPLES);

    let mut clusters: BTreeMap<ClusterLabel, Vec<Company>> = BTreeMap::new();
    for ((company, _), label) in located.into_iter().zip(labels) {
        clusters.entry(label).or_default().push(company.clone());
    }

    tracing::info!(
        "Clustered {} companies into {} groups",
        points.len(),
        clusters.len()
    );
    clusters
}

fn dbscan(points: &[(f64, f64)], eps: f64, min_samples: usize) -> Vec<ClusterLabel> {
    let n = points.len();
    let neighbours: Vec<Vec<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| euclidean(points[i], points[j]) <= eps)
                .collect()
        })
        .collect();

    let mut labels: Vec<Option<ClusterLabel>> = vec![None; n];
    let mut next_cluster = 0;

    for i in 0..n {
        if labels[i].is_some() || neighbours[i].len() < min_samples {
            continue;
        }
        let label = ClusterLabel::Cluster(next_cluster);
        next_cluster += 1;
        labels[i] = Some(label);

        let mut queue: VecDeque<usize> = neighbours[i].iter().copied().collect();
        while let Some(j) = queue.pop_front() {
            if labels[j].is_some() {
                continue;
            }
            labels[j] = Some(label);
            if neighbours[j].len() >= min_samples {
                queue.extend(neighbours[j].iter().copied().filter(|&k| labels[k].is_none()));
            }
        }
    }

    labels
        .into_iter()
        .map(|l| l.unwrap_or(ClusterLabel::Noise))
        .collect()
}

fn euclidean(a: (f64, f64), b: (f64, f64)) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(id: &str, lat: f64, lon: f64) -> Company {
        Company::new(id, id).with_location(lat, lon)
    }

    #[test]
    fn empty_input_is_empty() {
        assert!(cluster_companies_by_region(&[]).is_empty());
    }

    #[test]
    fn groups_nearby_points() {
        let companies = vec![
            at("mke-1", 43.0389, -87.9065),
            at("ken-1", 42.5847, -87.8212),
            at("mke-2", 43.0400, -87.9100),
            at("ken-2", 42.5900, -87.8300),
            at("madison", 43.0731, -89.4012),
        ];
        let clusters = cluster_companies_by_region(&companies);
        let ids = |label: ClusterLabel| -> Vec<String> {
            clusters[&label].iter().map(|c| c.id.clone()).collect()
        };
        assert_eq!(clusters.len(), 3);
        assert_eq!(ids(ClusterLabel::Cluster(0)), vec!["mke-1", "mke-2"]);
        assert_eq!(ids(ClusterLabel::Cluster(1)), vec!["ken-1", "ken-2"]);
        assert_eq!(ids(ClusterLabel::Noise), vec!["madison"]);
    }

    #[test]
    fn unlocated_companies_are_excluded() {
        let companies = vec![
            at("a", 43.0, -88.0),
            Company::new("b", "No location"),
            at("c", f64::NAN, -88.0),
        ];
        let clusters = cluster_companies_by_region(&companies);
        let total: usize = clusters.values().map(Vec::len).sum();
        assert_eq!(total, 1);
        assert_eq!(clusters[&ClusterLabel::Noise][0].id, "a");
    }

    #[test]
    fn chains_through_core_points() {
        // Each hop is 0.04 degrees, the ends are 0.08 apart.
        let companies = vec![at("a", 43.00, -88.0), at("b", 43.04, -88.0), at("c", 43.08, -88.0)];
        let clusters = cluster_companies_by_region(&companies);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[&ClusterLabel::Cluster(0)].len(), 3);
    }

    #[test]
    fn label_display() {
        assert_eq!(ClusterLabel::Cluster(2).to_string(), "Cluster_2");
        assert_eq!(ClusterLabel::Noise.to_string(), "Other");
        assert_eq!(serde_json::to_string(&ClusterLabel::Noise).unwrap(), "\"Other\"");
    }
}
