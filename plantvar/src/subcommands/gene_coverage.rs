use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use indexmap::IndexMap;

use crate::args::GraphArgs;
use crate::coverage::CoverageTable;
use crate::error::Error;
use crate::gff::{load_gene_positions, GenePosition};
use crate::graphs::GeneHeatmap;
use crate::io::{create_output_dir, open_tsv_writer, read_data_lines};
use crate::utils::{sort_alphanumeric, to_mbp};

/// Coverage colors saturate at this depth
pub const UPPER_CUTOFF: f64 = 300.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GeneCoverage {
    pub gene: GenePosition,
    pub mean_coverage: f64,
}

#[doc(hidden)]
pub fn run(gff: PathBuf, cov: PathBuf, output: PathBuf, graph_args: GraphArgs) -> Result<()> {
    create_output_dir(&output)?;

    let genes = load_gene_positions(read_data_lines(&gff).wrap_err(eyre!("Failed reading {gff:?}"))?)?;
    tracing::info!("Loaded {} genes from {gff:?}", genes.len());

    let table = CoverageTable::from_lines(read_data_lines(&cov).wrap_err(eyre!("Failed reading {cov:?}"))?)?;
    if table.is_empty() {
        return Err(Error::EmptyFile { path: cov }.into());
    }

    let gene_covs = gene_coverages(&genes, &table);
    tracing::info!("Mean coverage computed for {} genes", gene_covs.len());

    write_table(&gene_covs, &output.join("gene_coverage.tsv"))?;
    draw_heatmap(&genes, &gene_covs, &output.join("gene_coverage_heatmap.svg"), graph_args)?;

    Ok(())
}

/// Genes without coverage values are logged and left out
pub fn gene_coverages(genes: &IndexMap<String, GenePosition>, table: &CoverageTable) -> Vec<GeneCoverage> {
    genes
        .values()
        .filter_map(|gene| match table.range_mean(&gene.chrom, gene.start, gene.end) {
            Some(mean_coverage) => Some(GeneCoverage { gene: gene.clone(), mean_coverage }),
            None => {
                tracing::warn!("No coverage for gene {} on {}", gene.id, gene.chrom);
                None
            }
        })
        .collect()
}

fn write_table(gene_covs: &[GeneCoverage], path: &Path) -> Result<()> {
    let mut writer = open_tsv_writer(path.to_path_buf()).wrap_err(eyre!("Failed writing to {path:?}"))?;
    writer.write_record(["gene", "chromosome", "start", "end", "mean_coverage"])?;

    for GeneCoverage { gene, mean_coverage } in gene_covs {
        writer.write_record([
            gene.id.clone(),
            gene.chrom.clone(),
            gene.start.to_string(),
            gene.end.to_string(),
            format!("{mean_coverage:.2}"),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn draw_heatmap(
    genes: &IndexMap<String, GenePosition>,
    gene_covs: &[GeneCoverage],
    path: &Path,
    graph_args: GraphArgs,
) -> Result<()> {
    // Rows come from every gene, covered or not
    let mut chromosomes = sort_alphanumeric(genes.values().map(|gene| gene.chrom.as_str()));
    chromosomes.dedup();

    let x_max = gene_covs.iter().map(|g| to_mbp(g.gene.start)).fold(0.0, f64::max);
    let chromosomes = chromosomes.into_iter().map(String::from).collect();
    let mut heatmap = GeneHeatmap::new(graph_args, chromosomes, x_max, UPPER_CUTOFF);

    heatmap.draw_row_labels();
    for GeneCoverage { gene, mean_coverage } in gene_covs {
        heatmap.draw_gene(&gene.chrom, to_mbp(gene.start), *mean_coverage);
    }
    heatmap.draw_legend(&[0.0, 100.0, 200.0, 300.0]);
    heatmap.draw_x_axis("Position on chromosome (Mbp)");

    svg::save(path, &heatmap.document).wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}
