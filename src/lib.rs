//! # Rusty-id3
//!
//! `rusty-id3` induces binary decision trees with the ID3 information-gain
//! criterion. Every attribute and every class label is 0 or 1.
//!
//! The tree is grown one level of leaves at a time: each impure leaf that still
//! has unused attributes is split on the attribute with the highest information
//! gain, earliest attribute first on ties. Leaves predict their majority class;
//! an even leaf falls back to the majority class of the whole training set.
//!
//! ## Example Usage
//!
//! ```rust
//! use rusty_id3::data::dataset::Dataset;
//! use rusty_id3::trees::classifier::DecisionTreeClassifier;
//!
//! let names = vec!["a".to_string(), "b".to_string()];
//! let rows = vec![vec![0, 0, 0], vec![0, 1, 0], vec![1, 0, 1], vec![1, 1, 1]];
//! let dataset = Dataset::from_rows(names, &rows).unwrap();
//!
//! let mut tree = DecisionTreeClassifier::new();
//! tree.fit(&dataset).unwrap();
//!
//! assert_eq!(tree.render().unwrap(), "a = 0 : 0\na = 1 : 1\n");
//! assert_eq!(tree.evaluate(&dataset).unwrap().percent(), Some(100.0));
//! ```

/// Dataset storage and file loading
pub mod data;
/// Error type shared by the crate
pub mod error;
/// Functions for evaluating model performance
pub mod metrics;
/// Decision trees
pub mod trees;
