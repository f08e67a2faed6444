use std::io::Write;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use indexmap::IndexMap;
use itertools::Itertools;

use crate::args::GraphArgs;
use crate::error::Error;
use crate::graphs::tracks::Lane;
use crate::graphs::TrackGraph;
use crate::io::{create_output_dir, get_output, read_data_lines};
use crate::utils::{sort_alphanumeric, to_mbp};
use crate::vcf::VariantRecord;

/// Biallelic variant positions per chromosome
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SmallVariants {
    pub snvs: IndexMap<String, Vec<u64>>,
    pub indels: IndexMap<String, Vec<u64>>,
    pub multiallelic: usize,
}

impl SmallVariants {
    pub fn from_lines<I>(lines: I) -> Result<Self>
    where
        I: Iterator<Item = std::io::Result<(usize, String)>>,
    {
        let mut variants = Self::default();

        for line in lines {
            let (line_no, line) = line?;
            let parsed = VariantRecord::parse(&line, line_no)
                .and_then(|record| record.parse_pos(line_no).map(|pos| (record, pos)));
            let (record, pos) = match parsed {
                Ok(parsed) => parsed,
                Err(e) => {
                    tracing::warn!("Skipping VCF line: {e}");
                    continue;
                }
            };

            if record.is_multiallelic() {
                variants.multiallelic += 1;
            } else if record.is_snv() {
                variants.snvs.entry(record.chrom.to_string()).or_default().push(pos);
            } else if record.is_indel() {
                variants.indels.entry(record.chrom.to_string()).or_default().push(pos);
            }
        }

        Ok(variants)
    }

    pub fn snv_count(&self) -> usize {
        self.snvs.values().map(Vec::len).sum()
    }

    pub fn indel_count(&self) -> usize {
        self.indels.values().map(Vec::len).sum()
    }

    /// Binned counts for every chromosome with SNVs, in alphanumeric order
    pub fn bin(&self, resolution: u64) -> Result<Vec<DensityBins>, Error> {
        if resolution == 0 {
            return Err(Error::ZeroWindow);
        }

        let empty = Vec::new();
        Ok(sort_alphanumeric(self.snvs.keys().map(String::as_str))
            .into_iter()
            .map(|chrom| {
                let snvs = &self.snvs[chrom];
                let indels = self.indels.get(chrom).unwrap_or(&empty);
                DensityBins::new(chrom, snvs, indels, resolution)
            })
            .collect())
    }
}

/// SNV and InDel counts in the intervals `(k * res, (k + 1) * res]` of one chromosome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DensityBins {
    pub chrom: String,
    /// Largest SNV or InDel position
    pub length: u64,
    pub snvs: Vec<usize>,
    pub indels: Vec<usize>,
}

impl DensityBins {
    pub fn new(chrom: &str, snvs: &[u64], indels: &[u64], resolution: u64) -> Self {
        let length = snvs.iter().chain(indels).copied().max().unwrap_or(0);
        // Only intervals ending before the last variant are counted
        let nbins = (length.saturating_sub(1) / resolution) as usize;

        let count = |positions: &[u64]| {
            let mut counts = vec![0; nbins];
            for pos in positions.iter().filter(|pos| **pos > 0) {
                let idx = ((pos - 1) / resolution) as usize;
                if idx < nbins {
                    counts[idx] += 1;
                }
            }
            counts
        };

        Self {
            chrom: chrom.to_string(),
            length,
            snvs: count(snvs),
            indels: count(indels),
        }
    }
}

#[doc(hidden)]
pub fn run(vcf: PathBuf, output: PathBuf, resolution: u64, graph_args: GraphArgs) -> Result<()> {
    create_output_dir(&output)?;

    let lines = read_data_lines(&vcf).wrap_err(eyre!("Failed reading {vcf:?}"))?;
    let variants = SmallVariants::from_lines(lines)?;

    tracing::info!("Number of multi-allelic variants: {}", variants.multiallelic);
    tracing::info!("Number of SNVs: {}", variants.snv_count());
    tracing::info!("Number of InDels: {}", variants.indel_count());

    let bins = variants.bin(resolution)?;

    write_table(&bins, &output.join("genome_wide_small_variants.txt"))?;
    draw_density(&bins, resolution, &output.join("genome_wide_small_variants.svg"), graph_args)?;

    Ok(())
}

fn write_table(bins: &[DensityBins], path: &Path) -> Result<()> {
    let mut writer = get_output(Some(path.to_path_buf())).wrap_err(eyre!("Failed writing to {path:?}"))?;

    for (idx, chrom) in bins.iter().enumerate() {
        writeln!(writer, "Chr{}SNVs:\t{}", idx + 1, chrom.snvs.iter().join("\t"))?;
        writeln!(writer, "Chr{}InDels:\t{}", idx + 1, chrom.indels.iter().join("\t"))?;
    }

    writer.flush()?;
    Ok(())
}

fn draw_density(bins: &[DensityBins], resolution: u64, path: &Path, graph_args: GraphArgs) -> Result<()> {
    let snv_scale = bins.iter().flat_map(|b| &b.snvs).copied().max().unwrap_or(0).max(1) as f64;
    let indel_scale = bins.iter().flat_map(|b| &b.indels).copied().max().unwrap_or(0).max(1) as f64;
    let x_max = bins.iter().map(|b| to_mbp(b.length)).fold(0.0, f64::max);
    let width = to_mbp(resolution);

    let labels = bins.iter().map(|b| b.chrom.clone()).collect();
    let mut graph = TrackGraph::new(graph_args, labels, x_max);
    graph.draw_labels();

    for (idx, chrom) in bins.iter().enumerate() {
        let snvs = chrom.snvs.iter().enumerate().map(|(i, n)| (i as f64 * width, *n as f64));
        graph.draw_bars(idx, Lane::Upper, snvs, width, snv_scale, "lime");

        let indels = chrom.indels.iter().enumerate().map(|(i, n)| (i as f64 * width, *n as f64));
        graph.draw_bars(idx, Lane::Lower, indels, width, indel_scale, "magenta");
    }
    graph.draw_x_axis("Genomic position (Mbp)", 5);

    svg::save(path, &graph.document).wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::io::DataLines;

    const VCF: &str = "\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr10\t5\t.\tA\tG\t.\t.\t.
chr2\t10\t.\tA\tG\t.\t.\t.
chr2\t11\t.\tA\tG\t.\t.\t.
chr2\t20\t.\tAT\tA\t.\t.\t.
chr2\t21\t.\tA\tG\t.\t.\t.
chr2\t35\t.\tA\tAT\t.\t.\t.
chr2\t36\t.\tA\tG,T\t.\t.\t.
chr2\t37\t.\tAT\tGC\t.\t.\t.
chr3\t1\t.\tA\tAT\t.\t.\t.
chr2\tx\t.\tA\tG\t.\t.\t.
";

    #[test]
    fn load_variants() {
        let variants = SmallVariants::from_lines(DataLines::new(VCF.as_bytes())).unwrap();
        assert_eq!(1, variants.multiallelic);
        assert_eq!(4, variants.snv_count());
        assert_eq!(3, variants.indel_count());
        assert_eq!(vec![10, 11, 21], variants.snvs["chr2"]);
    }

    #[test]
    fn bins_are_left_open() {
        let variants = SmallVariants::from_lines(DataLines::new(VCF.as_bytes())).unwrap();
        let bins = variants.bin(10).unwrap();

        // chr3 has no SNVs
        let names: Vec<_> = bins.iter().map(|b| b.chrom.as_str()).collect();
        assert_eq!(vec!["chr2", "chr10"], names);

        let chr2 = &bins[0];
        assert_eq!(35, chr2.length);
        assert_eq!(vec![1, 1, 1], chr2.snvs);
        assert_eq!(vec![0, 1, 0], chr2.indels);

        assert!(bins[1].snvs.is_empty());
        assert!(variants.bin(0).is_err());
    }

    #[test]
    fn exact_multiple_of_the_resolution() {
        let bins = DensityBins::new("chr1", &[10, 20, 30], &[], 10);
        assert_eq!(vec![1, 1], bins.snvs);
    }
}
