use std::path::PathBuf;

use thiserror::Error as ThisError;

#[rustfmt::skip]
#[derive(ThisError, Debug)]
pub enum Error {
    #[error("Line {line} has {found} tab separated columns, at least {expected} are required")]
    MissingColumns { line: usize, found: usize, expected: usize },

    #[error("Position {value:?} is not an integer at line {line}")]
    PosParse { line: usize, value: String },

    #[error("Coverage value {value:?} is not a number at line {line}")]
    CoverageParse { line: usize, value: String },

    #[error("Allele depths {value:?} could not be read from the genotype column at line {line}")]
    DepthParse { line: usize, value: String },

    #[error("Gene ID pattern {pattern:?} is not a valid regular expression")]
    GenePattern { pattern: String, source: regex::Error },

    #[error("File contains zero rows: {path:?}")]
    EmptyFile { path: PathBuf },

    #[error("Window size needs to be atleast one")]
    ZeroWindow,
}
