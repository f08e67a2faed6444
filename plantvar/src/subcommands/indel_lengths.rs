use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::args::GraphArgs;
use crate::graphs::BarGraph;
use crate::gff::CdsPositions;
use crate::io::{create_output_dir, open_tsv_writer, read_data_lines};
use crate::stats::{length_counts, log10_count};
use crate::vcf::VariantRecord;

/// InDels up to this length are tabulated and plotted
pub const MAX_INDEL_LENGTH: usize = 30;

/// InDel lengths split by whether the variant starts inside a CDS
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IndelLengths {
    pub cds: Vec<usize>,
    pub other: Vec<usize>,
}

#[doc(hidden)]
pub fn run(vcf: PathBuf, gff: PathBuf, output: PathBuf, graph_args: GraphArgs) -> Result<()> {
    create_output_dir(&output)?;

    let gff_lines = read_data_lines(&gff).wrap_err(eyre!("Failed reading {gff:?}"))?;
    let cds = CdsPositions::from_lines(gff_lines)?;

    let vcf_lines = read_data_lines(&vcf).wrap_err(eyre!("Failed reading {vcf:?}"))?;
    let lengths = split_indel_lengths(vcf_lines, &cds)?;

    tracing::info!("Number of InDels in CDS: {}", lengths.cds.len());
    tracing::info!("Number of InDels outside CDS: {}", lengths.other.len());
    tracing::info!("Total CDS length: {}", cds.len());

    write_lengths(&lengths.cds, &output, "CDS_InDel_lengths", &graph_args)?;
    write_lengths(&lengths.other, &output, "other_InDel_lengths", &graph_args)?;

    Ok(())
}

pub fn split_indel_lengths<I>(lines: I, cds: &CdsPositions) -> Result<IndelLengths>
where
    I: Iterator<Item = std::io::Result<(usize, String)>>,
{
    let mut lengths = IndelLengths::default();

    for line in lines {
        let (line_no, line) = line?;

        let record = match VariantRecord::parse(&line, line_no) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping VCF line: {e}");
                continue;
            }
        };

        if !record.is_indel() {
            continue;
        }

        // A position that is not a number can not fall inside a CDS
        let in_cds = match record.parse_pos(line_no) {
            Ok(pos) => cds.contains(record.chrom, pos),
            Err(e) => {
                tracing::warn!("Counting InDel outside of CDS: {e}");
                false
            }
        };

        match in_cds {
            true => lengths.cds.push(record.length_difference()),
            false => lengths.other.push(record.length_difference()),
        }
    }

    Ok(lengths)
}

/// (length, count, log10 of count) for lengths 1 to 30
pub fn length_table(lengths: &[usize]) -> Vec<(usize, usize, f64)> {
    length_counts(lengths, MAX_INDEL_LENGTH)
        .into_iter()
        .map(|(len, count)| (len, count, log10_count(count)))
        .collect()
}

fn write_lengths(lengths: &[usize], output: &Path, name: &str, graph_args: &GraphArgs) -> Result<()> {
    let table = length_table(lengths);

    let tsv_path = output.join(format!("{name}.tsv"));
    let mut writer = open_tsv_writer(tsv_path.clone()).wrap_err(eyre!("Failed writing to {tsv_path:?}"))?;
    writer.write_record(["length", "count", "log10"])?;
    for (len, count, log10) in &table {
        writer.write_record([len.to_string(), count.to_string(), format!("{log10:.6}")])?;
    }
    writer.flush()?;

    let y_max = table.iter().map(|(_, _, log10)| *log10).fold(0.0, f64::max);
    let mut graph = BarGraph::new(graph_args.clone(), (0.0, MAX_INDEL_LENGTH as f64 + 0.5), y_max);
    graph.draw_bars(table.iter().map(|(len, _, log10)| (*len as f64 - 0.4, *log10)), 0.8, "lime");
    graph.draw_axes("InDel length distribution", "log10(number of InDels)", 6);

    let img_path = output.join(format!("{name}.svg"));
    svg::save(&img_path, &graph.document).wrap_err(eyre!("Failed writing to {img_path:?}"))?;

    Ok(())
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::io::DataLines;

    #[test]
    fn indels_are_split_by_cds() {
        let gff = "chr01\tmaker\tCDS\t100\t200\t.\t+\t0\tID=cds1\n";
        let cds = CdsPositions::from_lines(DataLines::new(gff.as_bytes())).unwrap();

        let vcf = "\
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO
chr01\t100\t.\tATT\tA\t.\t.\t.
chr01\t150\t.\tA\tG\t.\t.\t.
chr01\t200\t.\tA\tAGGG\t.\t.\t.
chr02\t150\t.\tA\tAG\t.\t.\t.
chr01\tfoo\t.\tA\tAG\t.\t.\t.
chr01\t150\t.\tA
";
        let lengths = split_indel_lengths(DataLines::new(vcf.as_bytes()), &cds).unwrap();
        assert_eq!(vec![2], lengths.cds);
        assert_eq!(vec![3, 1, 1], lengths.other);
    }

    #[test]
    fn non_numeric_position_counts_outside_cds() {
        let gff = "chr01\tmaker\tCDS\t1\t1000\t.\t+\t0\tID=cds1\n";
        let cds = CdsPositions::from_lines(DataLines::new(gff.as_bytes())).unwrap();

        let vcf = "chr01\t1e2\t.\tAT\tA\t.\t.\t.\nchr01\t100\t.\tAT\tA\t.\t.\t.\n";
        let lengths = split_indel_lengths(DataLines::new(vcf.as_bytes()), &cds).unwrap();
        assert_eq!(vec![1], lengths.cds);
        assert_eq!(vec![1], lengths.other);
    }

    #[test]
    fn thirty_rows() {
        let table = length_table(&[1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 2, 45]);
        assert_eq!(MAX_INDEL_LENGTH, table.len());
        assert_eq!((1, 10, 1.0), table[0]);
        assert_eq!((2, 1, 0.0), table[1]);
        assert_eq!((3, 0, 0.0), table[2]);
    }
}
