use crate::error::{Id3Error, Result};
use nalgebra::{DMatrix, DVector};
use std::collections::HashSet;
use std::fmt::{self, Debug, Formatter};

/// Binary instance store.
///
/// Attribute values live in `x` (one row per instance, one column per attribute)
/// and class labels in `y`. Every value is either 0 or 1. Tree nodes refer to
/// instances by row index, so the rows themselves are never copied once loaded.
#[derive(Clone)]
pub struct Dataset {
    attributes: Vec<String>,
    pub x: DMatrix<u8>,
    pub y: DVector<u8>,
}

impl Debug for Dataset {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Dataset {{\n    attributes: {:?},\n    x: [\n", self.attributes)?;

        for i in 0..self.x.nrows() {
            write!(f, "        [")?;
            for j in 0..self.x.ncols() {
                write!(f, "{:?}, ", self.x[(i, j)])?;
            }
            writeln!(f, "],")?;
        }

        write!(f, "    ],\n    y: [")?;
        for i in 0..self.y.len() {
            write!(f, "{:?}, ", self.y[i])?;
        }
        write!(f, "]\n}}")
    }
}

impl Dataset {
    /// Wraps already validated parts.
    ///
    /// `x` must have one column per attribute and as many rows as `y` has labels.
    pub fn new(attributes: Vec<String>, x: DMatrix<u8>, y: DVector<u8>) -> Self {
        debug_assert_eq!(x.ncols(), attributes.len());
        debug_assert_eq!(x.nrows(), y.len());
        Self { attributes, x, y }
    }

    /// Builds a dataset from full rows, each holding the attribute values
    /// followed by the class label.
    ///
    /// # Errors
    ///
    /// Fails if the attribute names are empty or repeated, if a row has the
    /// wrong width or if any value is not 0 or 1. Row numbers in errors are
    /// 1-based positions in `rows`.
    pub fn from_rows(attributes: Vec<String>, rows: &[Vec<u8>]) -> Result<Self> {
        Self::from_numbered_rows(
            attributes,
            rows.iter()
                .enumerate()
                .map(|(index, row)| (index + 1, row.as_slice())),
        )
    }

    /// Same as [`Dataset::from_rows`], with the line number reported for each
    /// row supplied by the caller.
    pub(crate) fn from_numbered_rows<'r, I>(attributes: Vec<String>, rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, &'r [u8])>,
    {
        validate_attributes(&attributes)?;

        let width = attributes.len() + 1;
        let mut features = Vec::new();
        let mut labels = Vec::new();

        for (line, row) in rows {
            if row.len() != width {
                return Err(Id3Error::RowWidth {
                    line,
                    expected: width,
                    found: row.len(),
                });
            }
            if let Some(value) = row.iter().find(|&&value| value > 1) {
                return Err(Id3Error::InvalidValue {
                    line,
                    token: value.to_string(),
                });
            }
            features.extend_from_slice(&row[..attributes.len()]);
            labels.push(row[attributes.len()]);
        }

        let x = DMatrix::from_row_slice(labels.len(), attributes.len(), &features);
        Ok(Self::new(attributes, x, DVector::from_vec(labels)))
    }

    /// Attribute names in header order; position is the attribute index.
    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn attribute_name(&self, attribute: usize) -> &str {
        &self.attributes[attribute]
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn nrows(&self) -> usize {
        self.x.nrows()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.y.is_empty()
    }

    /// Value of `attribute` for the instance at `row`.
    pub fn value(&self, row: usize, attribute: usize) -> u8 {
        self.x[(row, attribute)]
    }

    pub fn label(&self, row: usize) -> u8 {
        self.y[row]
    }
}

fn validate_attributes(attributes: &[String]) -> Result<()> {
    if attributes.is_empty() {
        return Err(Id3Error::NoAttributes);
    }
    let mut seen = HashSet::with_capacity(attributes.len());
    for name in attributes {
        if !seen.insert(name.as_str()) {
            return Err(Id3Error::DuplicateAttribute(name.clone()));
        }
    }
    Ok(())
}
