use std::fs::File;
use std::path::PathBuf;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::annotation::AnnotationLookup;
use crate::effects::{classify_lines, EffectState, GenePattern, ImpactTier};
use crate::io::{append_ext, open_tsv_writer, read_data_lines};

pub const REPORT_HEADER: [&str; 7] = [
    "Chromosome",
    "Position",
    "ReferenceAllel",
    "AlternativeAllel",
    "GeneID",
    "EffectType",
    "Annotation",
];

#[doc(hidden)]
pub fn run(
    input: PathBuf,
    output: PathBuf,
    annotation: Option<PathBuf>,
    gene_pattern: String,
) -> Result<()> {
    // A broken pattern is reported before any input is read
    let pattern = GenePattern::new(&gene_pattern)?;

    let lookup = AnnotationLookup::from_path(annotation.as_deref())?;
    let lines = read_data_lines(&input).wrap_err(eyre!("Failed reading {input:?}"))?;
    let state = classify_lines(lines, &pattern)?;

    write_report(&state, &lookup, output.clone())?;
    log_results(&state);

    let summary_path = append_ext("summary.json", &output);
    let file = File::create(&summary_path).wrap_err(eyre!("Failed writing to {summary_path:?}"))?;
    serde_json::to_writer_pretty(file, &state.summary())?;

    Ok(())
}

pub fn write_report(state: &EffectState, lookup: &AnnotationLookup, output: PathBuf) -> Result<()> {
    let mut writer = open_tsv_writer(output.clone()).wrap_err(eyre!("Failed writing to {output:?}"))?;
    writer.write_record(REPORT_HEADER)?;

    for row in state.rows() {
        let mut record = row.fields().to_vec();
        record.push(lookup.describe(&row.gene_id));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}

fn log_results(state: &EffectState) {
    let counts = state.counts();

    tracing::info!("RESULTS");
    tracing::info!("Number of annotated variants: {}", counts.annotated_variants);
    tracing::info!("Number of small variants: {}", counts.small_variants);
    tracing::info!("Number of SNVs: {}", counts.snvs);
    tracing::info!("Number of splice_region_variant: {}", counts.splice_region_variants);
    tracing::info!("Number of premature stop codons: {}", counts.premature_stops);
    tracing::info!("Number of frameshifts: {}", counts.frameshifts);
    tracing::info!("Number of lost stop codons: {}", counts.lost_stops);
    for tier in ImpactTier::PRIORITY.map(|(_, tier)| tier) {
        tracing::info!("Number of {tier} impact variants: {}", counts.tier(tier));
    }
    tracing::info!(
        "Premature stop check: {} ({} genes)",
        state.premature_stops().len(),
        state.unique_premature_stops()
    );
}
