//! ID3 Decision Tree Classifier
use super::{
    node::{ClassCounts, TreeNode},
    params::TreeParams,
    printer::TreeDisplay,
};
use crate::{
    data::dataset::Dataset,
    error::{Id3Error, Result},
    metrics::accuracy::{ClassificationMetrics, Evaluation},
};
use nalgebra::{DMatrix, DVector};
use rayon::prelude::*;
use tracing::{debug, info, trace};

/// Decision tree over binary attributes, grown by information gain.
#[derive(Clone, Debug, Default)]
pub struct DecisionTreeClassifier {
    root: Option<TreeNode>,
    attributes: Vec<String>,
    tree_params: TreeParams,
    iterations: usize,
}

impl ClassificationMetrics for DecisionTreeClassifier {}

impl DecisionTreeClassifier {
    pub fn new() -> Self {
        Self::with_params(TreeParams::new())
    }

    pub fn with_params(tree_params: TreeParams) -> Self {
        Self {
            root: None,
            attributes: Vec::new(),
            tree_params,
            iterations: 0,
        }
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Attribute names of the training set, in header order.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    /// Number of passes the induction loop made over the leaves.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Builds the tree from a training set.
    ///
    /// The root starts with every instance and attribute. Each pass collects
    /// the current leaves; an impure leaf with attributes left is split on its
    /// best attribute and a pure one has its remaining attributes cleared. The
    /// loop stops once every leaf is pure or no leaf has an attribute left.
    ///
    /// # Errors
    ///
    /// Returns an error if the dataset has no instances.
    pub fn fit(&mut self, dataset: &Dataset) -> Result<String> {
        if !dataset.is_not_empty() {
            return Err(Id3Error::EmptyDataset);
        }
        info!(
            instances = dataset.nrows(),
            attributes = dataset.num_attributes(),
            parallel = self.tree_params.parallel(),
            "inducing decision tree"
        );

        let mut root = TreeNode::root(dataset);
        let mut iterations = 0;

        while !root.all_leaves_pure() && !root.all_attributes_used() {
            iterations += 1;
            for leaf in root.leaves_mut() {
                if leaf.entropy() > 0.0 && !leaf.remaining().is_empty() {
                    if let Some((attribute, gain)) = self.best_attribute(dataset, leaf) {
                        leaf.split(dataset, attribute);
                        debug!(
                            attribute = dataset.attribute_name(attribute),
                            gain,
                            zero = leaf.zero().map_or(0, |child| child.instances().len()),
                            one = leaf.one().map_or(0, |child| child.instances().len()),
                            "split leaf"
                        );
                    }
                } else if !leaf.remaining().is_empty() {
                    leaf.clear_remaining();
                }
            }
        }

        info!(
            iterations,
            nodes = root.node_count(),
            leaves = root.leaf_count(),
            depth = root.depth(),
            "finished inducing decision tree"
        );
        self.attributes = dataset.attributes().to_vec();
        self.iterations = iterations;
        self.root = Some(root);
        Ok("Finished building the tree.".into())
    }

    /// Information gain of splitting `node` on `attribute`.
    ///
    /// The children are projected, not built, so `node` is left untouched.
    pub fn information_gain(node: &TreeNode, dataset: &Dataset, attribute: usize) -> f64 {
        let (zero, one) = node.project(dataset, attribute);
        let total = node.counts().total() as f64;
        node.entropy()
            - ((zero.total() as f64 / total) * zero.entropy()
                + (one.total() as f64 / total) * one.entropy())
    }

    /// Remaining attribute with the highest gain, scanned in ascending index
    /// order; a candidate only displaces the incumbent with a strictly higher
    /// gain, so ties keep the earliest attribute.
    fn best_attribute(&self, dataset: &Dataset, node: &TreeNode) -> Option<(usize, f64)> {
        let gains: Vec<(usize, f64)> = if self.tree_params.parallel() {
            node.remaining()
                .par_iter()
                .map(|&attribute| (attribute, Self::information_gain(node, dataset, attribute)))
                .collect()
        } else {
            node.remaining()
                .iter()
                .map(|&attribute| (attribute, Self::information_gain(node, dataset, attribute)))
                .collect()
        };

        gains.into_iter().fold(None, |best, (attribute, gain)| {
            trace!(attribute = dataset.attribute_name(attribute), gain, "candidate");
            match best {
                Some((_, best_gain)) if gain <= best_gain => best,
                _ => Some((attribute, gain)),
            }
        })
    }

    /// Predicts the labels for every row of `features`.
    ///
    /// # Errors
    ///
    /// This method will return an error if the tree wasn't built yet or if the
    /// column count differs from the training attributes.
    pub fn predict(&self, features: &DMatrix<u8>) -> Result<DVector<u8>> {
        let root = self.fitted_root()?;
        if features.ncols() != self.attributes.len() {
            return Err(Id3Error::AttributeMismatch {
                expected: self.attributes.len(),
                found: features.ncols(),
            });
        }
        let global = root.counts();
        let predictions: Vec<_> = features
            .row_iter()
            .map(|row| Self::make_prediction(root, global, |attribute| row[attribute]))
            .collect();

        Ok(DVector::from_vec(predictions))
    }

    /// Classifies one instance. A trailing class label, if present, is ignored.
    pub fn classify(&self, instance: &[u8]) -> Result<u8> {
        let root = self.fitted_root()?;
        let expected = self.attributes.len();
        if instance.len() != expected && instance.len() != expected + 1 {
            return Err(Id3Error::AttributeMismatch {
                expected,
                found: instance.len(),
            });
        }
        Ok(Self::make_prediction(root, root.counts(), |attribute| {
            instance[attribute]
        }))
    }

    fn make_prediction<F: Fn(usize) -> u8>(
        root: &TreeNode,
        global: ClassCounts,
        value_of: F,
    ) -> u8 {
        let mut node = root;
        while let Some(split) = node.split_data() {
            node = split.child_for(value_of(split.attribute));
        }
        node.dominant_class(global)
    }

    /// Scores the tree on a dataset.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Evaluation> {
        let predictions = self.predict(&dataset.x)?;
        let confusion = self.confusion_matrix(&dataset.y, &predictions)?;
        Ok(Evaluation::from_confusion(confusion))
    }

    /// Indented text form of the tree.
    pub fn display(&self) -> Result<TreeDisplay<'_>> {
        let root = self.fitted_root()?;
        Ok(TreeDisplay::new(root, &self.attributes, root.counts()))
    }

    pub fn render(&self) -> Result<String> {
        Ok(self.display()?.to_string())
    }

    /// Full text report: the tree, a blank line, then the accuracy on the
    /// training and test sets.
    pub fn report(&self, training: &Dataset, testing: &Dataset) -> Result<String> {
        let tree = self.render()?;
        let training = self.evaluate(training)?;
        let testing = self.evaluate(testing)?;
        debug!(confusion = %training.confusion, "training set");
        debug!(confusion = %testing.confusion, "test set");

        Ok(format!(
            "{}\n{}\n{}\n",
            tree,
            training.report_line("training set"),
            testing.report_line("test set")
        ))
    }

    fn fitted_root(&self) -> Result<&TreeNode> {
        self.root.as_ref().ok_or(Id3Error::NotFitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn dataset(names: &[&str], rows: &[Vec<u8>]) -> Dataset {
        let names = names.iter().map(|name| name.to_string()).collect();
        Dataset::from_rows(names, rows).unwrap()
    }

    fn random_dataset(seed: u64, num_attributes: usize, num_rows: usize) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let names = (0..num_attributes).map(|i| format!("x{}", i)).collect();
        let rows: Vec<Vec<u8>> = (0..num_rows)
            .map(|_| (0..=num_attributes).map(|_| rng.gen_range(0..=1)).collect())
            .collect();
        Dataset::from_rows(names, &rows).unwrap()
    }

    fn check_counts(node: &TreeNode) {
        let counts = node.counts();
        assert_eq!(counts.total(), node.instances().len());
        if let Some(split) = node.split_data() {
            let (zero, one) = (split.zero.counts(), split.one.counts());
            assert_eq!(zero.class0 + one.class0, counts.class0);
            assert_eq!(zero.class1 + one.class1, counts.class1);

            let mut union: Vec<usize> = split
                .zero
                .instances()
                .iter()
                .chain(split.one.instances())
                .copied()
                .collect();
            union.sort_unstable();
            let mut own = node.instances().to_vec();
            own.sort_unstable();
            assert_eq!(union, own);

            check_counts(&split.zero);
            check_counts(&split.one);
        }
    }

    #[test]
    fn test_splits_on_the_separating_attribute() {
        let data = dataset(
            &["a", "b"],
            &[vec![0, 0, 0], vec![0, 1, 0], vec![1, 0, 1], vec![1, 1, 1]],
        );
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let root = tree.root().unwrap();
        assert_eq!(root.split_attribute(), Some(0));
        let zero = root.zero().unwrap();
        let one = root.one().unwrap();
        assert!(zero.is_leaf() && one.is_leaf());
        assert_eq!(zero.entropy(), 0.0);
        assert_eq!(one.entropy(), 0.0);
        assert_eq!(zero.dominant_class(root.counts()), 0);
        assert_eq!(one.dominant_class(root.counts()), 1);

        let evaluation = tree.evaluate(&data).unwrap();
        assert_eq!(evaluation.percent(), Some(100.0));
    }

    #[test]
    fn test_conflicting_labels_leave_an_impure_leaf() {
        let data = dataset(
            &["a"],
            &[
                vec![0, 0],
                vec![0, 0],
                vec![0, 0],
                vec![0, 1],
                vec![1, 1],
                vec![1, 1],
            ],
        );
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let root = tree.root().unwrap();
        let zero = root.zero().unwrap();
        assert!(zero.is_leaf());
        assert!(zero.entropy() > 0.0);
        assert!(zero.remaining().is_empty());
        assert_eq!(zero.counts(), ClassCounts::new(3, 1));
        assert_eq!(tree.classify(&[0]).unwrap(), 0);

        let evaluation = tree.evaluate(&data).unwrap();
        assert_eq!(evaluation.correct, 5);
        assert_eq!(evaluation.percent(), Some(83.3));
    }

    #[test]
    fn test_information_gain() {
        let data = dataset(
            &["a", "b"],
            &[vec![0, 0, 0], vec![0, 1, 0], vec![1, 0, 1], vec![1, 1, 1]],
        );
        let root = TreeNode::root(&data);

        assert_relative_eq!(DecisionTreeClassifier::information_gain(&root, &data, 0), 1.0);
        assert_relative_eq!(DecisionTreeClassifier::information_gain(&root, &data, 1), 0.0);
    }

    #[test]
    fn test_gain_tie_prefers_earlier_attribute() {
        // `b` and `c` are copies of each other and both separate the classes.
        let data = dataset(
            &["a", "b", "c"],
            &[
                vec![0, 1, 1, 1],
                vec![1, 1, 1, 1],
                vec![0, 0, 0, 0],
                vec![1, 0, 0, 0],
            ],
        );
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();
        assert_eq!(tree.root().unwrap().split_attribute(), Some(1));

        // No attribute helps at all: the first one is still chosen.
        let data = dataset(
            &["p", "q"],
            &[vec![0, 0, 0], vec![0, 0, 1], vec![1, 1, 0], vec![1, 1, 1]],
        );
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();
        assert_eq!(tree.root().unwrap().split_attribute(), Some(0));
    }

    #[test]
    fn test_pure_root_is_not_split() {
        let data = dataset(&["a", "b"], &[vec![0, 1, 1], vec![1, 0, 1]]);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(tree.iterations(), 0);
        assert_eq!(tree.classify(&[1, 1]).unwrap(), 1);
    }

    #[test]
    fn test_tie_at_leaf_uses_training_majority() {
        // The a=1 leaf holds one instance of each class; globally class 0 wins.
        let data = dataset(
            &["a"],
            &[vec![0, 0], vec![0, 0], vec![0, 0], vec![1, 0], vec![1, 1]],
        );
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let one = tree.root().unwrap().one().unwrap();
        assert_eq!(one.counts(), ClassCounts::new(1, 1));
        assert_eq!(tree.classify(&[1]).unwrap(), 0);
    }

    #[test]
    fn test_count_invariants_hold_everywhere() {
        for seed in 0..20 {
            let data = random_dataset(seed, 5, 40);
            let mut tree = DecisionTreeClassifier::new();
            tree.fit(&data).unwrap();
            check_counts(tree.root().unwrap());
        }
    }

    #[test]
    fn test_terminates_within_attribute_bound() {
        for seed in 0..20 {
            let data = random_dataset(seed, 6, 60);
            let mut tree = DecisionTreeClassifier::new();
            tree.fit(&data).unwrap();

            let root = tree.root().unwrap();
            assert!(tree.iterations() <= data.num_attributes() + 1);
            assert!(root.depth() <= data.num_attributes());
            assert!(root.all_leaves_pure() || root.all_attributes_used());
        }
    }

    #[test]
    fn test_induction_is_idempotent() {
        let data = random_dataset(7, 6, 50);
        let mut first = DecisionTreeClassifier::new();
        let mut second = DecisionTreeClassifier::new();
        first.fit(&data).unwrap();
        second.fit(&data).unwrap();

        assert_eq!(first.root(), second.root());
        assert_eq!(first.render().unwrap(), second.render().unwrap());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        for seed in 0..10 {
            let data = random_dataset(seed, 8, 80);
            let mut sequential = DecisionTreeClassifier::new();
            let mut params = TreeParams::new();
            params.set_parallel(true);
            let mut parallel = DecisionTreeClassifier::with_params(params);

            sequential.fit(&data).unwrap();
            parallel.fit(&data).unwrap();
            assert_eq!(sequential.root(), parallel.root());
        }
    }

    #[test]
    fn test_training_rows_in_pure_leaves_are_classified_correctly() {
        let data = random_dataset(3, 4, 30);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let root = tree.root().unwrap();
        for leaf in root.leaves() {
            if leaf.entropy() == 0.0 {
                for &row in leaf.instances() {
                    let instance: Vec<u8> = (0..data.num_attributes())
                        .map(|attribute| data.value(row, attribute))
                        .collect();
                    assert_eq!(tree.classify(&instance).unwrap(), data.label(row));
                }
            }
        }
    }

    #[test]
    fn test_predict_matches_classify() {
        let data = random_dataset(11, 4, 30);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        let predictions = tree.predict(&data.x).unwrap();
        for row in 0..data.nrows() {
            let mut instance: Vec<u8> = (0..data.num_attributes())
                .map(|attribute| data.value(row, attribute))
                .collect();
            instance.push(data.label(row));
            assert_eq!(tree.classify(&instance).unwrap(), predictions[row]);
        }
    }

    #[test]
    fn test_fit_rejects_empty_dataset() {
        let data = dataset(&["a"], &[]);
        let mut tree = DecisionTreeClassifier::new();
        assert!(matches!(tree.fit(&data), Err(Id3Error::EmptyDataset)));
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_use_before_fit() {
        let tree = DecisionTreeClassifier::new();
        assert!(matches!(tree.classify(&[0]), Err(Id3Error::NotFitted)));
        assert!(matches!(
            tree.predict(&DMatrix::zeros(1, 1)),
            Err(Id3Error::NotFitted)
        ));
        assert!(matches!(tree.render(), Err(Id3Error::NotFitted)));
    }

    #[test]
    fn test_attribute_mismatch() {
        let data = dataset(&["a", "b"], &[vec![0, 0, 0], vec![1, 0, 1]]);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&data).unwrap();

        assert!(matches!(
            tree.predict(&DMatrix::zeros(2, 3)),
            Err(Id3Error::AttributeMismatch {
                expected: 2,
                found: 3
            })
        ));
        assert!(matches!(
            tree.classify(&[0]),
            Err(Id3Error::AttributeMismatch { .. })
        ));
    }

    #[test]
    fn test_report() {
        let training = dataset(
            &["a", "b"],
            &[vec![0, 0, 0], vec![0, 1, 0], vec![1, 0, 1], vec![1, 1, 1]],
        );
        let testing = dataset(&["a", "b"], &[vec![0, 1, 0], vec![1, 1, 0]]);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&training).unwrap();

        assert_eq!(
            tree.report(&training, &testing).unwrap(),
            "a = 0 : 0\n\
             a = 1 : 1\n\
             \n\
             Accuracy on training set (4 instances): 100.0%\n\
             Accuracy on test set (2 instances): 50.0%\n"
        );
    }

    #[test]
    fn test_report_with_empty_test_set() {
        let training = dataset(&["a"], &[vec![0, 0], vec![1, 1]]);
        let testing = dataset(&["a"], &[]);
        let mut tree = DecisionTreeClassifier::new();
        tree.fit(&training).unwrap();

        let report = tree.report(&training, &testing).unwrap();
        assert!(report.ends_with(
            "\n\nAccuracy on training set (2 instances): 100.0%\n\
             Accuracy on test set (0 instances): n/a%\n"
        ));
    }

    #[test]
    fn test_report_before_fit() {
        let data = dataset(&["a"], &[vec![0, 0]]);
        let tree = DecisionTreeClassifier::new();
        assert!(matches!(tree.report(&data, &data), Err(Id3Error::NotFitted)));
    }
}
