//! Random forest voting by majority over seeded trees.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::classifier::tree::{DecisionTree, TreeParams};

/// Forest training parameters
#[derive(Debug, Clone)]
pub struct ForestParams {
    /// Number of trees
    pub trees: usize,
    /// Maximum depth per tree
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Base seed; tree `t` derives its RNG from `seed + t`
    pub seed: u64,
}

/// A trained forest
#[derive(Debug, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    n_classes: usize,
}

impl RandomForest {
    /// Fit the forest over all samples.
    ///
    /// Each tree bootstraps its sample set and examines √n features per
    /// split. Per-tree RNGs are derived from `seed + tree_index`, so the
    /// result does not depend on the order rayon schedules the fits.
    #[must_use]
    pub fn fit(samples: &[Vec<u8>], labels: &[usize], n_classes: usize, params: &ForestParams) -> Self {
        let n_features = samples.first().map_or(0, Vec::len);
        let tree_params = TreeParams {
            max_depth: params.max_depth,
            min_samples_split: params.min_samples_split,
            features_per_split: ((n_features as f64).sqrt().ceil() as usize).max(1),
        };

        let trees: Vec<DecisionTree> = (0..params.trees as u64)
            .into_par_iter()
            .map(|tree_index| {
                let mut rng = StdRng::seed_from_u64(params.seed.wrapping_add(tree_index));
                let indices = bootstrap(samples.len(), &mut rng);
                DecisionTree::fit(samples, labels, n_classes, &indices, &tree_params, &mut rng)
            })
            .collect();

        Self { trees, n_classes }
    }

    /// Number of trees in the forest
    #[must_use]
    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// True when the forest holds no trees
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    /// Fraction of trees voting for each class, in class-index order.
    ///
    /// This is the engine's confidence score: values lie in [0, 1] and sum
    /// to 1 over all classes.
    #[must_use]
    pub fn vote_fractions(&self, vector: &[u8]) -> Vec<f64> {
        let mut votes = vec![0usize; self.n_classes];
        for tree in &self.trees {
            votes[tree.predict(vector)] += 1;
        }
        let total = self.trees.len().max(1) as f64;
        votes.into_iter().map(|count| count as f64 / total).collect()
    }
}

fn bootstrap(n_samples: usize, rng: &mut StdRng) -> Vec<usize> {
    use rand::Rng;
    (0..n_samples).map(|_| rng.random_range(0..n_samples)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy() -> (Vec<Vec<u8>>, Vec<usize>) {
        // Class 0 rows set features {0,1}, class 1 rows set features {2,3}.
        let samples = vec![
            vec![1, 1, 0, 0],
            vec![1, 0, 0, 0],
            vec![0, 1, 0, 0],
            vec![0, 0, 1, 1],
            vec![0, 0, 1, 0],
            vec![0, 0, 0, 1],
        ];
        let labels = vec![0, 0, 0, 1, 1, 1];
        (samples, labels)
    }

    fn params() -> ForestParams {
        ForestParams {
            trees: 50,
            max_depth: 8,
            min_samples_split: 2,
            seed: 42,
        }
    }

    #[test]
    fn votes_favor_the_matching_class() {
        let (samples, labels) = toy();
        let forest = RandomForest::fit(&samples, &labels, 2, &params());

        let votes = forest.vote_fractions(&[1, 1, 0, 0]);
        assert!(votes[0] > votes[1]);

        let votes = forest.vote_fractions(&[0, 0, 1, 1]);
        assert!(votes[1] > votes[0]);
    }

    #[test]
    fn vote_fractions_sum_to_one() {
        let (samples, labels) = toy();
        let forest = RandomForest::fit(&samples, &labels, 2, &params());
        let votes = forest.vote_fractions(&[1, 0, 1, 0]);
        let total: f64 = votes.iter().sum();
        assert!((total - 1.0).abs() < 1e-9);
        assert!(votes.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn same_seed_same_votes() {
        let (samples, labels) = toy();
        let a = RandomForest::fit(&samples, &labels, 2, &params());
        let b = RandomForest::fit(&samples, &labels, 2, &params());
        assert_eq!(a.vote_fractions(&[1, 1, 0, 0]), b.vote_fractions(&[1, 1, 0, 0]));
    }
}
