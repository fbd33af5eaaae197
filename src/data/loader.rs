//! Reading datasets from disk.
//!
//! Two layouts are understood, both with a header line first:
//!
//! * whitespace-delimited text, tokens separated by any run of spaces or tabs;
//! * comma-separated files, read with the `csv` crate.
//!
//! Every token of the header except the literal `class` names an attribute.
//! Blank lines are skipped. Each remaining line holds one 0/1 value per
//! attribute followed by the 0/1 class label.
//!
//! ```no_run
//! use rusty_id3::data::loader::{load_testing, load_training};
//!
//! let train = load_training("data/train.dat").unwrap();
//! let test = load_testing("data/test.dat", train.attributes()).unwrap();
//! ```
use crate::data::dataset::Dataset;
use crate::error::{Id3Error, Result};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Header token that marks the label column.
pub const CLASS_TOKEN: &str = "class";

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum InputFormat {
    /// Tokens separated by whitespace.
    #[default]
    Whitespace,
    /// Comma-separated values.
    Csv,
}

impl InputFormat {
    /// Picks `Csv` for files with a `.csv` extension and `Whitespace` otherwise.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => InputFormat::Csv,
            _ => InputFormat::Whitespace,
        }
    }
}

/// Header tokens plus every data line, tagged with its 1-based line number.
struct RawTable {
    header: Vec<String>,
    rows: Vec<(usize, Vec<String>)>,
}

/// Loads a training file; its header defines the attribute names.
///
/// # Errors
///
/// Besides malformed input, an empty training set is rejected here so that it
/// never reaches induction.
pub fn load_training<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path);
    let dataset = parse_training(open(path)?, format)?;
    debug!(
        path = %path.display(),
        instances = dataset.nrows(),
        attributes = dataset.num_attributes(),
        "loaded training set"
    );
    Ok(dataset)
}

/// Loads a testing file against the attribute names of the training set.
/// The file's own header line is skipped.
pub fn load_testing<P: AsRef<Path>>(path: P, attributes: &[String]) -> Result<Dataset> {
    let path = path.as_ref();
    let format = InputFormat::from_path(path);
    let dataset = parse_testing(open(path)?, format, attributes)?;
    debug!(
        path = %path.display(),
        instances = dataset.nrows(),
        "loaded testing set"
    );
    Ok(dataset)
}

pub fn parse_training<R: Read>(reader: R, format: InputFormat) -> Result<Dataset> {
    let table = read_table(reader, format)?;
    let attributes: Vec<String> = table
        .header
        .into_iter()
        .filter(|token| token != CLASS_TOKEN)
        .collect();
    let dataset = build(attributes, &table.rows)?;
    if !dataset.is_not_empty() {
        return Err(Id3Error::EmptyDataset);
    }
    Ok(dataset)
}

pub fn parse_testing<R: Read>(
    reader: R,
    format: InputFormat,
    attributes: &[String],
) -> Result<Dataset> {
    let table = read_table(reader, format)?;
    build(attributes.to_vec(), &table.rows)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| Id3Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_table<R: Read>(reader: R, format: InputFormat) -> Result<RawTable> {
    let mut lines = match format {
        InputFormat::Whitespace => whitespace_lines(reader)?,
        InputFormat::Csv => csv_lines(reader)?,
    }
    .into_iter();

    let (_, header) = lines.next().ok_or(Id3Error::MissingHeader)?;
    Ok(RawTable {
        header,
        rows: lines.collect(),
    })
}

fn whitespace_lines<R: Read>(reader: R) -> Result<Vec<(usize, Vec<String>)>> {
    let mut lines = Vec::new();
    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        let tokens: Vec<String> = line.split_whitespace().map(str::to_string).collect();
        if !tokens.is_empty() {
            lines.push((index + 1, tokens));
        }
    }
    Ok(lines)
}

fn csv_lines<R: Read>(reader: R) -> Result<Vec<(usize, Vec<String>)>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut lines = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map_or(index + 1, |position| position.line() as usize);
        let tokens: Vec<String> = record.iter().map(str::to_string).collect();
        if tokens.iter().any(|token| !token.is_empty()) {
            lines.push((line, tokens));
        }
    }
    Ok(lines)
}

/// Converts tokens to integers; width and 0/1 checks are left to
/// [`Dataset::from_numbered_rows`].
fn build(attributes: Vec<String>, rows: &[(usize, Vec<String>)]) -> Result<Dataset> {
    let parsed = rows
        .iter()
        .map(|(line, tokens)| {
            let values = tokens
                .iter()
                .map(|token| parse_value(*line, token))
                .collect::<Result<Vec<_>>>()?;
            Ok((*line, values))
        })
        .collect::<Result<Vec<_>>>()?;

    Dataset::from_numbered_rows(
        attributes,
        parsed.iter().map(|(line, values)| (*line, values.as_slice())),
    )
}

fn parse_value(line: usize, token: &str) -> Result<u8> {
    token.parse::<u8>().map_err(|_| Id3Error::InvalidValue {
        line,
        token: token.to_string(),
    })
}
