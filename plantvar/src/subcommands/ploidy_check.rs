use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::args::GraphArgs;
use crate::graphs::BarGraph;
use crate::io::{create_output_dir, open_tsv_writer, read_data_lines};
use crate::stats::Histogram;
use crate::vcf::{parse_allele_depths, VariantRecord, Zygosity};

pub const FREQUENCY_BINS: usize = 100;
pub const COVERAGE_BINS: usize = 400;
pub const COVERAGE_RANGE: (f64, f64) = (0.0, 400.0);

/// Expected allele frequencies of triploid and diploid genomes
pub const PLOIDY_MARKERS: [f64; 3] = [0.33, 0.5, 0.66];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PloidyData {
    /// REF fractions of heterozygous calls above the depth threshold
    pub allele_frequencies: Vec<f64>,
    /// Total depth of heterozygous and homozygous ALT calls
    pub coverages: Vec<f64>,
}

impl PloidyData {
    pub fn from_lines<I>(lines: I, min_depth: u32) -> Result<Self>
    where
        I: Iterator<Item = std::io::Result<(usize, String)>>,
    {
        let mut data = Self::default();

        for line in lines {
            let (line_no, line) = line?;
            let record = match VariantRecord::parse(&line, line_no) {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!("Skipping VCF line: {e}");
                    continue;
                }
            };

            let genotype = record.last_column();
            let Some(zygosity) = Zygosity::from_genotype_column(genotype) else {
                continue;
            };

            let depths = match parse_allele_depths(genotype, line_no) {
                Ok(depths) => depths,
                Err(e) => {
                    tracing::warn!("Skipping VCF line: {e}");
                    continue;
                }
            };

            data.coverages.push(depths.total());
            if zygosity == Zygosity::Heterozygous && depths.total() > min_depth as f64 {
                data.allele_frequencies.push(depths.ref_fraction());
            }
        }

        Ok(data)
    }
}

#[doc(hidden)]
pub fn run(vcf: PathBuf, output: PathBuf, min_depth: u32, graph_args: GraphArgs) -> Result<()> {
    create_output_dir(&output)?;

    let lines = read_data_lines(&vcf).wrap_err(eyre!("Failed reading {vcf:?}"))?;
    let data = PloidyData::from_lines(lines, min_depth)?;

    tracing::info!("Number of genotyped variants: {}", data.coverages.len());
    tracing::info!("Number of allele frequencies above depth {min_depth}: {}", data.allele_frequencies.len());

    let frequencies = Histogram::new(&data.allele_frequencies, FREQUENCY_BINS, 0.0, 1.0);
    write_histogram(&frequencies, &output.join("allele_frequencies.tsv"))?;

    let mut graph = BarGraph::new(graph_args.clone(), (0.0, 1.0), frequencies.max_count() as f64);
    graph.draw_bars(frequencies.bins().map(|(x, n)| (x, n as f64)), frequencies.bin_width(), "lime");
    for marker in PLOIDY_MARKERS {
        graph.draw_marker(marker);
    }
    graph.draw_axes("Allele frequency", "Number of variants", 10);
    save(&graph, &output.join("allele_frequencies.svg"))?;

    let (start, end) = COVERAGE_RANGE;
    let coverages = Histogram::new(&data.coverages, COVERAGE_BINS, start, end);
    let mut graph = BarGraph::new(graph_args, COVERAGE_RANGE, coverages.max_count() as f64);
    graph.draw_bars(coverages.bins().map(|(x, n)| (x, n as f64)), coverages.bin_width(), "lime");
    graph.draw_axes("Sequencing coverage", "Number of variants", 8);
    save(&graph, &output.join("variant_coverages.svg"))?;

    Ok(())
}

fn write_histogram(hist: &Histogram, path: &Path) -> Result<()> {
    let mut writer = open_tsv_writer(path.to_path_buf()).wrap_err(eyre!("Failed writing to {path:?}"))?;
    writer.write_record(["bin_start", "count"])?;
    for (start, count) in hist.bins() {
        writer.write_record([format!("{start:.2}"), count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn save(graph: &BarGraph, path: &Path) -> Result<()> {
    svg::save(path, &graph.document).wrap_err(eyre!("Failed writing to {path:?}"))
}
