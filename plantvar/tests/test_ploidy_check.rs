mod common;

use std::path::{Path, PathBuf};

use plantvar::args::GraphArgs;
use plantvar::io::read_data_lines;
use plantvar::subcommands::ploidy_check::{self, PloidyData};

use crate::common::{outdir, TEST_VCF};

#[test]
fn depth_threshold() {
    let data = PloidyData::from_lines(read_data_lines(Path::new(TEST_VCF)).unwrap(), 20).unwrap();
    assert_eq!(11, data.coverages.len());
    assert_eq!(Some(&30.0), data.coverages.last());
    // Every heterozygous call has a depth of exactly 20
    assert!(data.allele_frequencies.is_empty());

    let data = PloidyData::from_lines(read_data_lines(Path::new(TEST_VCF)).unwrap(), 19).unwrap();
    assert_eq!(vec![0.5; 10], data.allele_frequencies);
}

#[test]
fn ploidy_check_outputs() {
    let output = outdir("ploidy_check");
    ploidy_check::run(PathBuf::from(TEST_VCF), output.clone(), 19, GraphArgs::default()).unwrap();

    let table = std::fs::read_to_string(output.join("allele_frequencies.tsv")).unwrap();
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(101, lines.len());
    assert_eq!("bin_start\tcount", lines[0]);
    assert_eq!("0.00\t0", lines[1]);
    let total: usize = lines[1..]
        .iter()
        .map(|line| line.split('\t').nth(1).unwrap().parse::<usize>().unwrap())
        .sum();
    assert_eq!(10, total);

    let svg = std::fs::read_to_string(output.join("allele_frequencies.svg")).unwrap();
    assert_eq!(1, svg.matches("<rect").count());

    // Depths of 20 and 30
    let svg = std::fs::read_to_string(output.join("variant_coverages.svg")).unwrap();
    assert_eq!(2, svg.matches("<rect").count());
}
