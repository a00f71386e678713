//! Seeded k-means clustering (Lloyd's algorithm)
//!
//! Initial centroids are k distinct input points picked by a seeded shuffle,
//! so results are reproducible run to run. A cluster that loses all members
//! during an iteration keeps its previous centroid instead of being dropped.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Error, Result};

const MAX_ITERATIONS: usize = 100;

/// A fitted clustering: one label per input point, one centroid per cluster
pub struct KMeans {
    pub centroids: Vec<Vec<f64>>,
    pub labels: Vec<usize>,
}

impl KMeans {
    pub fn cluster_size(&self, cluster: usize) -> usize {
        self.labels.iter().filter(|&&l| l == cluster).count()
    }
}

pub fn kmeans(points: &[Vec<f64>], k: usize, seed: u64) -> Result<KMeans> {
    if k == 0 {
        return Err(Error::InvalidData("k must be at least 1".to_string()));
    }
    if points.len() < k {
        return Err(Error::InsufficientData(format!(
            "{} points cannot form {} clusters",
            points.len(),
            k
        )));
    }
    let dims = points[0].len();
    if dims == 0 || points.iter().any(|p| p.len() != dims) {
        return Err(Error::InvalidData(
            "points must share a non-zero dimension".to_string(),
        ));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..points.len()).collect();
    order.shuffle(&mut rng);
    let mut centroids: Vec<Vec<f64>> = order[..k].iter().map(|&i| points[i].clone()).collect();

    let mut labels = vec![0usize; points.len()];
    for _ in 0..MAX_ITERATIONS {
        let next: Vec<usize> = points
            .iter()
            .map(|p| nearest_centroid(p, &centroids))
            .collect();
        let converged = next == labels;
        labels = next;

        for (cluster, centroid) in centroids.iter_mut().enumerate() {
            let members: Vec<&Vec<f64>> = points
                .iter()
                .zip(&labels)
                .filter(|(_, &l)| l == cluster)
                .map(|(p, _)| p)
                .collect();
            if members.is_empty() {
                continue;
            }
            for (d, value) in centroid.iter_mut().enumerate() {
                *value = members.iter().map(|p| p[d]).sum::<f64>() / members.len() as f64;
            }
        }

        if converged {
            break;
        }
    }

    Ok(KMeans { centroids, labels })
}

fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_dist = f64::INFINITY;
    for (i, centroid) in centroids.iter().enumerate() {
        let dist: f64 = point
            .iter()
            .zip(centroid)
            .map(|(a, b)| (a - b).powi(2))
            .sum();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}
