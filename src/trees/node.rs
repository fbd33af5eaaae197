use crate::data::dataset::Dataset;

/// Number of instances carrying each class label.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub class0: usize,
    pub class1: usize,
}

impl ClassCounts {
    pub fn new(class0: usize, class1: usize) -> Self {
        Self { class0, class1 }
    }

    /// Counts the labels of the given rows.
    pub fn of_rows(dataset: &Dataset, rows: &[usize]) -> Self {
        rows.iter().fold(Self::default(), |mut counts, &row| {
            counts.add(dataset.label(row));
            counts
        })
    }

    pub fn add(&mut self, label: u8) {
        if label == 0 {
            self.class0 += 1;
        } else {
            self.class1 += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.class0 + self.class1
    }

    pub fn is_pure(&self) -> bool {
        self.class0 == 0 || self.class1 == 0
    }

    /// Binary Shannon entropy of the label distribution, in bits.
    ///
    /// Zero whenever one of the classes is absent, which includes the empty set.
    pub fn entropy(&self) -> f64 {
        if self.is_pure() {
            return 0.0;
        }
        let total = self.total() as f64;
        [self.class0, self.class1]
            .iter()
            .map(|&count| {
                let p = count as f64 / total;
                -p * p.log2()
            })
            .sum()
    }

    /// Majority class of these counts; a tie goes to class 1.
    pub fn majority(&self) -> u8 {
        if self.class0 > self.class1 {
            0
        } else {
            1
        }
    }

    /// Class predicted by a leaf with these counts.
    ///
    /// An exact tie is settled by `global`, the counts of the whole training
    /// set, and never by the local subset.
    pub fn dominant_class(&self, global: ClassCounts) -> u8 {
        match self.class0.cmp(&self.class1) {
            std::cmp::Ordering::Greater => 0,
            std::cmp::Ordering::Less => 1,
            std::cmp::Ordering::Equal => global.majority(),
        }
    }
}

/// Routing rule shared by splitting, gain projection and classification:
/// a 0 goes to the `zero` child, anything else to the `one` child.
pub(crate) fn takes_zero_branch(value: u8) -> bool {
    value == 0
}

/// Attribute test of an internal node together with both children.
#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    pub attribute: usize,
    pub zero: Box<TreeNode>,
    pub one: Box<TreeNode>,
}

impl Split {
    /// Child reached by an instance whose split attribute has `value`.
    pub fn child_for(&self, value: u8) -> &TreeNode {
        if takes_zero_branch(value) {
            &self.zero
        } else {
            &self.one
        }
    }
}

/// Decision tree node
///
/// Holds the training rows routed to it (as row indices into the training
/// [`Dataset`]), their class counts and the attributes still unused on the
/// path from the root. Internal nodes additionally carry a [`Split`].
#[derive(Clone, Debug, PartialEq)]
pub struct TreeNode {
    counts: ClassCounts,
    instances: Vec<usize>,
    remaining: Vec<usize>,
    split: Option<Split>,
}

impl TreeNode {
    fn with_remaining(remaining: Vec<usize>) -> Self {
        Self {
            counts: ClassCounts::default(),
            instances: Vec::new(),
            remaining,
            split: None,
        }
    }

    /// Root node seeded with every instance and every attribute of `dataset`.
    pub fn root(dataset: &Dataset) -> Self {
        let instances: Vec<usize> = (0..dataset.nrows()).collect();
        Self {
            counts: ClassCounts::of_rows(dataset, &instances),
            instances,
            remaining: (0..dataset.num_attributes()).collect(),
            split: None,
        }
    }

    fn push(&mut self, row: usize, label: u8) {
        self.counts.add(label);
        self.instances.push(row);
    }

    pub fn counts(&self) -> ClassCounts {
        self.counts
    }

    /// Row indices of the training instances that reach this node.
    pub fn instances(&self) -> &[usize] {
        &self.instances
    }

    /// Attributes still eligible for a split here, in ascending index order.
    pub fn remaining(&self) -> &[usize] {
        &self.remaining
    }

    pub fn split_data(&self) -> Option<&Split> {
        self.split.as_ref()
    }

    pub fn split_attribute(&self) -> Option<usize> {
        self.split.as_ref().map(|split| split.attribute)
    }

    pub fn zero(&self) -> Option<&TreeNode> {
        self.split.as_ref().map(|split| split.zero.as_ref())
    }

    pub fn one(&self) -> Option<&TreeNode> {
        self.split.as_ref().map(|split| split.one.as_ref())
    }

    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }

    pub fn entropy(&self) -> f64 {
        self.counts.entropy()
    }

    pub fn dominant_class(&self, global: ClassCounts) -> u8 {
        self.counts.dominant_class(global)
    }

    pub fn clear_remaining(&mut self) {
        self.remaining.clear();
    }

    /// Class counts the two children would have if this node split on
    /// `attribute`. Nothing is allocated or modified.
    pub fn project(&self, dataset: &Dataset, attribute: usize) -> (ClassCounts, ClassCounts) {
        let mut zero = ClassCounts::default();
        let mut one = ClassCounts::default();
        for &row in &self.instances {
            if takes_zero_branch(dataset.value(row, attribute)) {
                zero.add(dataset.label(row));
            } else {
                one.add(dataset.label(row));
            }
        }
        (zero, one)
    }

    /// Turns this leaf into an internal node testing `attribute`.
    ///
    /// Both children inherit this node's remaining attributes minus
    /// `attribute`. A node is split once; later calls leave it unchanged.
    pub fn split(&mut self, dataset: &Dataset, attribute: usize) {
        debug_assert!(self.split.is_none(), "node split twice");
        if self.split.is_some() {
            return;
        }

        let remaining: Vec<usize> = self
            .remaining
            .iter()
            .copied()
            .filter(|&candidate| candidate != attribute)
            .collect();
        let mut zero = Self::with_remaining(remaining.clone());
        let mut one = Self::with_remaining(remaining);

        for &row in &self.instances {
            let child = if takes_zero_branch(dataset.value(row, attribute)) {
                &mut zero
            } else {
                &mut one
            };
            child.push(row, dataset.label(row));
        }

        self.split = Some(Split {
            attribute,
            zero: Box::new(zero),
            one: Box::new(one),
        });
    }

    /// Current leaves, zero branch before one branch.
    pub fn leaves(&self) -> Vec<&TreeNode> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    pub fn leaves_mut(&mut self) -> Vec<&mut TreeNode> {
        let mut leaves = Vec::new();
        collect_leaves_mut(self, &mut leaves);
        leaves
    }

    pub fn all_leaves_pure(&self) -> bool {
        match &self.split {
            None => self.entropy() == 0.0,
            Some(split) => split.zero.all_leaves_pure() && split.one.all_leaves_pure(),
        }
    }

    /// True when no leaf has an attribute left to split on.
    pub fn all_attributes_used(&self) -> bool {
        self.leaves().iter().all(|leaf| leaf.remaining.is_empty())
    }

    /// Number of attribute tests on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        match &self.split {
            None => 0,
            Some(split) => 1 + split.zero.depth().max(split.one.depth()),
        }
    }

    pub fn node_count(&self) -> usize {
        match &self.split {
            None => 1,
            Some(split) => 1 + split.zero.node_count() + split.one.node_count(),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match &self.split {
            None => 1,
            Some(split) => split.zero.leaf_count() + split.one.leaf_count(),
        }
    }
}

fn collect_leaves<'a>(node: &'a TreeNode, leaves: &mut Vec<&'a TreeNode>) {
    match &node.split {
        None => leaves.push(node),
        Some(split) => {
            collect_leaves(&split.zero, leaves);
            collect_leaves(&split.one, leaves);
        }
    }
}

fn collect_leaves_mut<'a>(node: &'a mut TreeNode, leaves: &mut Vec<&'a mut TreeNode>) {
    match node.split {
        Some(ref mut split) => {
            collect_leaves_mut(&mut split.zero, leaves);
            collect_leaves_mut(&mut split.one, leaves);
        }
        None => leaves.push(node),
    }
}
