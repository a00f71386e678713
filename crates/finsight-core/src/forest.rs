//! Isolation forest for multivariate outlier scoring
//!
//! Anomalous points are isolated in fewer random splits than normal ones, so
//! short average path lengths across the ensemble mean "unusual". Scores are
//! in [0, 1] with higher meaning more anomalous. Fitting is seeded and fully
//! deterministic for a given input and config.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Error, Result};
use crate::stats::percentile;

const EULER_MASCHERONI: f64 = 0.577_215_664_901_532_9;

#[derive(Debug, Clone)]
pub struct ForestConfig {
    pub n_trees: usize,
    pub max_samples: usize,
    pub contamination: f64,
    pub seed: u64,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 100,       // ensemble size
            max_samples: 256,   // per-tree subsample cap
            contamination: 0.1, // expected outlier fraction
            seed: 42,           // deterministic across runs
        }
    }
}

enum Node {
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
    Leaf {
        size: usize,
    },
}

/// A fitted ensemble of isolation trees
pub struct IsolationForest {
    trees: Vec<Node>,
    sample_size: usize,
    threshold: f64,
}

impl IsolationForest {
    /// Fit on feature rows and calibrate the outlier threshold
    ///
    /// The threshold is the (1 - contamination) percentile of the training
    /// scores, so roughly that fraction of the training data ends up with a
    /// negative decision value.
    pub fn fit(data: &[Vec<f64>], config: &ForestConfig) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::InsufficientData(
                "isolation forest needs at least one sample".to_string(),
            ));
        }
        let dims = data[0].len();
        if dims == 0 || data.iter().any(|row| row.len() != dims) {
            return Err(Error::InvalidData(
                "feature rows must share a non-zero dimension".to_string(),
            ));
        }

        let mut rng = StdRng::seed_from_u64(config.seed);
        let sample_size = config.max_samples.min(data.len());
        let max_depth = (sample_size as f64).log2().ceil().max(1.0) as usize;

        let mut trees = Vec::with_capacity(config.n_trees);
        for _ in 0..config.n_trees {
            let idx: Vec<usize> = if data.len() > sample_size {
                rand::seq::index::sample(&mut rng, data.len(), sample_size).into_vec()
            } else {
                (0..data.len()).collect()
            };
            trees.push(build_tree(data, &idx, 0, max_depth, &mut rng));
        }

        let mut forest = Self {
            trees,
            sample_size,
            threshold: 0.0,
        };
        let scores: Vec<f64> = data.iter().map(|row| forest.score(row)).collect();
        forest.threshold = percentile(&scores, 100.0 * (1.0 - config.contamination));
        Ok(forest)
    }

    /// Anomaly score in [0, 1], higher is more anomalous
    pub fn score(&self, point: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|tree| path_length(tree, point)).sum();
        let avg = total / self.trees.len() as f64;
        let norm = c_factor(self.sample_size);
        if norm == 0.0 {
            return 0.5;
        }
        2f64.powf(-avg / norm)
    }

    /// Signed margin to the calibrated threshold; negative means outlier
    pub fn decision(&self, point: &[f64]) -> f64 {
        self.threshold - self.score(point)
    }

    pub fn is_outlier(&self, point: &[f64]) -> bool {
        self.decision(point) < 0.0
    }
}

fn build_tree(
    data: &[Vec<f64>],
    idx: &[usize],
    depth: usize,
    max_depth: usize,
    rng: &mut StdRng,
) -> Node {
    if idx.len() <= 1 || depth >= max_depth {
        return Node::Leaf { size: idx.len() };
    }

    let dims = data[idx[0]].len();
    let mut usable = Vec::new();
    for feature in 0..dims {
        let (min, max) = feature_range(data, idx, feature);
        if max > min {
            usable.push((feature, min, max));
        }
    }
    if usable.is_empty() {
        return Node::Leaf { size: idx.len() };
    }

    let (feature, min, max) = usable[rng.gen_range(0..usable.len())];
    let threshold = rng.gen_range(min..max);
    let (left_idx, right_idx): (Vec<usize>, Vec<usize>) =
        idx.iter().partition(|&&i| data[i][feature] < threshold);
    if left_idx.is_empty() || right_idx.is_empty() {
        // degenerate split right at the range edge
        return Node::Leaf { size: idx.len() };
    }

    Node::Split {
        feature,
        threshold,
        left: Box::new(build_tree(data, &left_idx, depth + 1, max_depth, rng)),
        right: Box::new(build_tree(data, &right_idx, depth + 1, max_depth, rng)),
    }
}

fn feature_range(data: &[Vec<f64>], idx: &[usize], feature: usize) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &i in idx {
        let v = data[i][feature];
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    (min, max)
}

fn path_length(node: &Node, point: &[f64]) -> f64 {
    let mut depth = 0.0;
    let mut current = node;
    loop {
        match current {
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                depth += 1.0;
                current = if point[*feature] < *threshold {
                    left
                } else {
                    right
                };
            }
            Node::Leaf { size } => return depth + c_factor(*size),
        }
    }
}

/// Expected path length of an unsuccessful BST search over n points
fn c_factor(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_MASCHERONI) - 2.0 * (n - 1.0) / n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cluster_with_outlier() -> Vec<Vec<f64>> {
        let mut data: Vec<Vec<f64>> = (0..30)
            .map(|i| vec![10.0 + (i % 3) as f64 * 0.1, 1.0])
            .collect();
        data.push(vec![1000.0, 1.0]);
        data
    }

    #[test]
    fn test_forest_flags_planted_outlier() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();

        assert!(forest.is_outlier(&[1000.0, 1.0]));
        assert!(!forest.is_outlier(&[10.0, 1.0]));
        assert!(forest.score(&[1000.0, 1.0]) > forest.score(&[10.0, 1.0]));
    }

    #[test]
    fn test_scores_stay_in_unit_interval() {
        let data = cluster_with_outlier();
        let forest = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        for row in &data {
            let s = forest.score(row);
            assert!((0.0..=1.0).contains(&s), "score {} out of range", s);
        }
    }

    #[test]
    fn test_fit_is_deterministic() {
        let data = cluster_with_outlier();
        let a = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        let b = IsolationForest::fit(&data, &ForestConfig::default()).unwrap();
        for row in &data {
            assert_eq!(a.score(row), b.score(row));
            assert_eq!(a.decision(row), b.decision(row));
        }
    }

    #[test]
    fn test_fit_rejects_bad_input() {
        assert!(IsolationForest::fit(&[], &ForestConfig::default()).is_err());

        let ragged = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(IsolationForest::fit(&ragged, &ForestConfig::default()).is_err());
    }

    #[test]
    fn test_c_factor_known_values() {
        assert_eq!(c_factor(0), 0.0);
        assert_eq!(c_factor(1), 0.0);
        assert_eq!(c_factor(2), 1.0);
        // c(256) is about 10.24 for the standard subsample size
        assert!((c_factor(256) - 10.24).abs() < 0.01);
    }
}
