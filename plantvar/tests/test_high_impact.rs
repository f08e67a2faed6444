mod common;

use std::path::{Path, PathBuf};

use color_eyre::Result;

use plantvar::annotation::AnnotationLookup;
use plantvar::effects::{classify_lines, GenePattern, DEFAULT_GENE_PATTERN};
use plantvar::io::read_data_lines;
use plantvar::subcommands::high_impact;

use crate::common::{outdir, TEST_ANNOTATION, TEST_VCF};

const EXPECTED_REPORT: &str = "\
Chromosome\tPosition\tReferenceAllel\tAlternativeAllel\tGeneID\tEffectType\tAnnotation
chr1\t100\tA\tG\tMa01_g00010\tstop_gained\tkinase_%_GO:0004672
chr1\t300\tAT\tA\tMa01_g00020\tframeshift\tunknown protein
chr2\t80\tA\tG\tMa02_g00040\tsplice_region_variant\ttranscription factor_%_MYB
chrUn_random\t100\tA\tG\tMaUn_random_g00010\tstop_gained\tn/a
";

fn run_high_impact(name: &str, annotation: Option<&str>) -> PathBuf {
    let output = outdir(name).join("high_impact.tsv");
    high_impact::run(
        PathBuf::from(TEST_VCF),
        output.clone(),
        annotation.map(PathBuf::from),
        String::from(DEFAULT_GENE_PATTERN),
    )
    .unwrap();
    output
}

#[test]
fn report_rows() {
    let output = run_high_impact("high_impact_report", Some(TEST_ANNOTATION));
    let report = std::fs::read_to_string(output).unwrap();
    assert_eq!(EXPECTED_REPORT, report);
}

#[test]
fn summary_json() {
    let output = run_high_impact("high_impact_summary", Some(TEST_ANNOTATION));
    let summary = std::fs::read_to_string(output.with_file_name("high_impact.tsv.summary.json")).unwrap();

    insta::assert_snapshot!(summary, @r###"
{
  "annotated_variants": 12,
  "small_variants": 10,
  "snvs": 9,
  "splice_region_variants": 1,
  "premature_stops": 2,
  "frameshifts": 1,
  "lost_stops": 0,
  "high": 5,
  "moderate": 1,
  "low": 1,
  "modifier": 1,
  "premature_stop_check": 2,
  "premature_stop_check_unique": 2
}
"###);
}

#[test]
fn missing_annotation_is_not_available() {
    let output = run_high_impact("high_impact_no_annotation", None);
    let report = std::fs::read_to_string(output).unwrap();

    let annotations: Vec<&str> = report
        .lines()
        .skip(1)
        .map(|line| line.rsplit('\t').next().unwrap())
        .collect();
    assert_eq!(vec!["n/a"; 4], annotations);
}

#[test]
fn identical_reruns() {
    let first = std::fs::read(run_high_impact("high_impact_rerun_1", Some(TEST_ANNOTATION))).unwrap();
    let second = std::fs::read(run_high_impact("high_impact_rerun_2", Some(TEST_ANNOTATION))).unwrap();
    assert_eq!(first, second);
}

#[test]
fn invalid_gene_pattern() {
    let output = outdir("high_impact_invalid_pattern").join("never_written.tsv");
    let res = high_impact::run(PathBuf::from(TEST_VCF), output.clone(), None, String::from("Ma[0-9"));
    assert!(res.is_err());
    assert!(!output.exists());
}

#[test]
fn report_invariants() -> Result<()> {
    let pattern = GenePattern::new(DEFAULT_GENE_PATTERN)?;
    let state = classify_lines(read_data_lines(Path::new(TEST_VCF))?, &pattern)?;

    for row in state.rows() {
        assert!(!row.gene_id.is_empty());
        assert!(pattern.is_match(&row.gene_id));
    }

    assert_eq!(state.premature_stops().len(), state.unique_premature_stops());

    // Every site is credited to at most one tier
    let counts = state.counts();
    assert!(counts.recognized_effects() <= counts.high);
    assert!(counts.high + counts.moderate + counts.low + counts.modifier <= counts.small_variants);

    let lookup = AnnotationLookup::from_path(Some(Path::new(TEST_ANNOTATION)))?;
    assert_eq!(3, lookup.len());
    Ok(())
}

#[test]
#[cfg(feature = "clap")]
fn high_impact_cmd() {
    let output = outdir("high_impact_cmd").join("report.tsv");
    let cmd = plantvar::clap::SubCommand::HighImpact {
        input: PathBuf::from(TEST_VCF),
        output: output.clone(),
        annotation: None,
        gene_pattern: String::from(DEFAULT_GENE_PATTERN),
        log_and_verbosity: crate::common::silent_verbosity(),
    };
    plantvar::clap::run_cmd(cmd).unwrap();
    assert!(output.exists());
}
