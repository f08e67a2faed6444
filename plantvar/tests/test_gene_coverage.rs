mod common;

use std::path::PathBuf;

use plantvar::args::GraphArgs;
use plantvar::subcommands::gene_coverage;

use crate::common::{outdir, TEST_COVERAGE, TEST_GFF, TEST_VCF};

#[test]
fn gene_coverage_table() {
    let output = outdir("gene_coverage");
    gene_coverage::run(
        PathBuf::from(TEST_GFF),
        PathBuf::from(TEST_COVERAGE),
        output.clone(),
        GraphArgs::default(),
    )
    .unwrap();

    let table = std::fs::read_to_string(output.join("gene_coverage.tsv")).unwrap();
    insta::assert_snapshot!(table, @r###"
gene	chromosome	start	end	mean_coverage
Ma01_g00010	chr01	1	10	60.00
Ma01_g00020	chr01	12	20	165.00
Ma02_g00010	chr02	1	5	100.00
"###);

    let svg = std::fs::read_to_string(output.join("gene_coverage_heatmap.svg")).unwrap();
    // Three genes and four legend entries, chr10 has a row but no coverage
    assert_eq!(7, svg.matches("<circle").count());
    assert!(svg.contains("chr10"));
    assert!(svg.contains("300x"));
}

#[test]
fn empty_coverage_is_an_error() {
    let output = outdir("gene_coverage_empty");
    // A VCF has no numeric last column on any line
    let res = gene_coverage::run(PathBuf::from(TEST_GFF), PathBuf::from(TEST_VCF), output, GraphArgs::default());
    assert!(res.is_err());
}
