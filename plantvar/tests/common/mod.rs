#![allow(dead_code)]
use std::path::PathBuf;

#[cfg(feature = "clap")]
use plantvar::clap::LogAndVerbosity;

pub const TEST_VCF: &str = "tests/data/snpeff.vcf";
pub const TEST_INDEL_VCF: &str = "tests/data/indels.vcf";
pub const TEST_GFF: &str = "tests/data/genes.gff3";
pub const TEST_COVERAGE: &str = "tests/data/coverage.txt";
pub const TEST_ANNOTATION: &str = "tests/data/annotation.tsv";
pub const OUTDIR: &str = "tests/results";

/// Every test writes into its own directory, tests run in parallel
pub fn outdir(name: &str) -> PathBuf {
    let path = PathBuf::from(OUTDIR).join(name);
    std::fs::create_dir_all(&path).unwrap();
    path
}

#[cfg(feature = "clap")]
pub fn silent_verbosity() -> LogAndVerbosity {
    LogAndVerbosity {
        verbosity: 1,
        log_file: None,
        silent: false,
    }
}
