//! Single decision tree over binary symptom features.

use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// One node in the tree arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    /// Terminal node carrying the majority class of its samples
    Leaf {
        /// Predicted class index
        label: usize,
    },
    /// Binary split on the presence of one feature
    Split {
        /// Feature index tested
        feature: usize,
        /// Child when the feature is absent
        absent: usize,
        /// Child when the feature is present
        present: usize,
    },
}

/// Limits applied while growing a tree
#[derive(Debug, Clone)]
pub struct TreeParams {
    /// Maximum depth
    pub max_depth: usize,
    /// Minimum samples required to attempt a split
    pub min_samples_split: usize,
    /// Number of candidate features examined per split
    pub features_per_split: usize,
}

/// A trained decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    root: usize,
}

impl DecisionTree {
    /// Grow a tree over the given sample indices.
    ///
    /// `samples` are 0/1 feature vectors of equal length, `labels` are class
    /// indices below `n_classes`. Splits minimize Gini impurity over a random
    /// feature subset drawn from `rng`; ties in the majority class resolve to
    /// the lowest class index, which is canonical-name order.
    #[must_use]
    pub fn fit(
        samples: &[Vec<u8>],
        labels: &[usize],
        n_classes: usize,
        indices: &[usize],
        params: &TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut builder = TreeBuilder {
            samples,
            labels,
            n_classes,
            params,
            nodes: Vec::new(),
        };
        let root = builder.grow(indices.to_vec(), 0, rng);
        Self {
            nodes: builder.nodes,
            root,
        }
    }

    /// Predicted class index for one feature vector
    #[must_use]
    pub fn predict(&self, vector: &[u8]) -> usize {
        let mut node = self.root;
        loop {
            match &self.nodes[node] {
                Node::Leaf { label } => return *label,
                Node::Split {
                    feature,
                    absent,
                    present,
                } => {
                    node = if vector.get(*feature).is_some_and(|&bit| bit != 0) {
                        *present
                    } else {
                        *absent
                    };
                }
            }
        }
    }
}

struct TreeBuilder<'a> {
    samples: &'a [Vec<u8>],
    labels: &'a [usize],
    n_classes: usize,
    params: &'a TreeParams,
    nodes: Vec<Node>,
}

impl TreeBuilder<'_> {
    fn grow(&mut self, indices: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let counts = self.class_counts(&indices);
        let majority = majority_class(&counts);

        let at_limit = depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split
            || is_pure(&counts);
        if at_limit {
            return self.push(Node::Leaf { label: majority });
        }

        match self.best_split(&indices, &counts, rng) {
            Some((feature, absent_indices, present_indices)) => {
                let absent = self.grow(absent_indices, depth + 1, rng);
                let present = self.grow(present_indices, depth + 1, rng);
                self.push(Node::Split {
                    feature,
                    absent,
                    present,
                })
            }
            // No candidate feature separates the samples.
            None => self.push(Node::Leaf { label: majority }),
        }
    }

    fn push(&mut self, node: Node) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn class_counts(&self, indices: &[usize]) -> Vec<usize> {
        let mut counts = vec![0usize; self.n_classes];
        for &idx in indices {
            counts[self.labels[idx]] += 1;
        }
        counts
    }

    /// Best Gini split over a random feature subset, or `None` when every
    /// candidate leaves one side empty
    fn best_split(
        &self,
        indices: &[usize],
        parent_counts: &[usize],
        rng: &mut StdRng,
    ) -> Option<(usize, Vec<usize>, Vec<usize>)> {
        let n_features = self.samples.first().map_or(0, Vec::len);
        if n_features == 0 {
            return None;
        }
        let n_candidates = self.params.features_per_split.min(n_features).max(1);
        let candidates = rand::seq::index::sample(rng, n_features, n_candidates);

        let parent_gini = gini(parent_counts, indices.len());
        let mut best: Option<(f64, usize)> = None;

        for feature in candidates {
            let mut present_counts = vec![0usize; self.n_classes];
            let mut present_total = 0usize;
            for &idx in indices {
                if self.samples[idx][feature] != 0 {
                    present_counts[self.labels[idx]] += 1;
                    present_total += 1;
                }
            }
            let absent_total = indices.len() - present_total;
            if present_total == 0 || absent_total == 0 {
                continue;
            }

            let absent_counts: Vec<usize> = parent_counts
                .iter()
                .zip(&present_counts)
                .map(|(&all, &present)| all - present)
                .collect();
            let weighted = (present_total as f64 * gini(&present_counts, present_total)
                + absent_total as f64 * gini(&absent_counts, absent_total))
                / indices.len() as f64;

            let improves = weighted < parent_gini - 1e-12;
            let beats_best = best.is_none_or(|(best_score, _)| weighted < best_score - 1e-12);
            if improves && beats_best {
                best = Some((weighted, feature));
            }
        }

        best.map(|(_, feature)| {
            let (present, absent): (Vec<usize>, Vec<usize>) = indices
                .iter()
                .copied()
                .partition(|&idx| self.samples[idx][feature] != 0);
            (feature, absent, present)
        })
    }
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let sum_squared: f64 = counts
        .iter()
        .map(|&count| {
            let p = count as f64 / total as f64;
            p * p
        })
        .sum();
    1.0 - sum_squared
}

fn is_pure(counts: &[usize]) -> bool {
    counts.iter().filter(|&&count| count > 0).count() <= 1
}

/// Class with the largest count; lowest index wins ties
fn majority_class(counts: &[usize]) -> usize {
    let mut best = 0;
    for (class, &count) in counts.iter().enumerate() {
        if count > counts[best] {
            best = class;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn params() -> TreeParams {
        TreeParams {
            max_depth: 8,
            min_samples_split: 2,
            features_per_split: 3,
        }
    }

    #[test]
    fn fits_separable_classes() {
        // Feature 0 perfectly separates class 0 from class 1.
        let samples = vec![vec![1, 0, 1], vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 1]];
        let labels = vec![0, 0, 1, 1];
        let indices: Vec<usize> = (0..samples.len()).collect();
        let mut rng = StdRng::seed_from_u64(7);

        let tree = DecisionTree::fit(&samples, &labels, 2, &indices, &params(), &mut rng);
        assert_eq!(tree.predict(&[1, 0, 0]), 0);
        assert_eq!(tree.predict(&[0, 1, 0]), 1);
    }

    #[test]
    fn majority_tie_prefers_lowest_class() {
        assert_eq!(majority_class(&[2, 2, 1]), 0);
        assert_eq!(majority_class(&[0, 3, 3]), 1);
    }

    #[test]
    fn constant_features_yield_a_leaf() {
        let samples = vec![vec![1, 1], vec![1, 1]];
        let labels = vec![1, 0];
        let indices = vec![0, 1];
        let mut rng = StdRng::seed_from_u64(1);

        let tree = DecisionTree::fit(&samples, &labels, 2, &indices, &params(), &mut rng);
        // Tie between the two classes resolves to class 0.
        assert_eq!(tree.predict(&[1, 1]), 0);
    }
}
