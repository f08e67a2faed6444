use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;

use crate::args::GraphArgs;
use crate::coverage::{window_means, CoverageTable};
use crate::error::Error;
use crate::graphs::{BarGraph, TrackGraph};
use crate::io::{append_ext, create_output_dir, open_tsv_writer, prefixed_output, read_data_lines};
use crate::stats::Histogram;
use crate::utils::to_mbp;

/// Only the first contigs in alphanumeric order are plotted
pub const MAX_CONTIGS: usize = 12;

pub const HISTOGRAM_BINS: usize = 300;
pub const HISTOGRAM_RANGE: (f64, f64) = (0.0, 300.0);

/// Reference depths drawn into every track
pub const GUIDES: [f64; 5] = [0.0, 50.0, 100.0, 150.0, 200.0];

#[derive(Debug, Clone, PartialEq)]
pub struct ContigWindows {
    pub contig: String,
    pub means: Vec<f64>,
}

#[doc(hidden)]
pub fn run(
    input: PathBuf,
    output: PathBuf,
    resolution: usize,
    saturation: f64,
    graph_args: GraphArgs,
) -> Result<()> {
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        create_output_dir(parent)?;
    }

    let lines = read_data_lines(&input).wrap_err(eyre!("Failed reading {input:?}"))?;
    let table = CoverageTable::from_lines(lines)?;
    if table.is_empty() {
        return Err(Error::EmptyFile { path: input }.into());
    }

    let windows = contig_windows(&table, resolution, saturation)?;
    tracing::info!("Plotting {} of {} contigs", windows.len(), table.len());

    for contig in &windows {
        draw_histogram(contig, &prefixed_output(&output, &contig.contig, "svg"), &graph_args)?;
    }
    draw_tracks(&windows, resolution, saturation, &append_ext("svg", &output), graph_args)?;
    write_table(&windows, &append_ext("tsv", &output))?;

    Ok(())
}

pub fn contig_windows(table: &CoverageTable, resolution: usize, saturation: f64) -> Result<Vec<ContigWindows>, Error> {
    table
        .sorted_contig_names()
        .into_iter()
        .take(MAX_CONTIGS)
        .map(|contig| {
            let values = table.contig(contig).unwrap_or_default();
            Ok(ContigWindows {
                contig: contig.to_string(),
                means: window_means(values, resolution, saturation)?,
            })
        })
        .collect()
}

fn draw_histogram(contig: &ContigWindows, path: &Path, graph_args: &GraphArgs) -> Result<()> {
    let (start, end) = HISTOGRAM_RANGE;
    let hist = Histogram::new(&contig.means, HISTOGRAM_BINS, start, end);

    let mut graph = BarGraph::new(graph_args.clone(), HISTOGRAM_RANGE, hist.max_count() as f64);
    graph.draw_bars(hist.bins().map(|(x, n)| (x, n as f64)), hist.bin_width(), "lime");
    graph.draw_axes("Sequencing coverage depth", "Number of windows", 6);

    svg::save(path, &graph.document).wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

fn draw_tracks(
    windows: &[ContigWindows],
    resolution: usize,
    saturation: f64,
    path: &Path,
    graph_args: GraphArgs,
) -> Result<()> {
    let max_mean = windows.iter().flat_map(|w| &w.means).copied().fold(0.0, f64::max);
    let y_max = saturation.min(max_mean);

    let window_mbp = to_mbp(resolution as u64);
    let x_max = windows.iter().map(|w| w.means.len()).max().unwrap_or(0) as f64 * window_mbp;

    let labels = windows.iter().map(|w| w.contig.clone()).collect();
    let mut graph = TrackGraph::new(graph_args, labels, x_max);
    graph.draw_labels();
    graph.draw_guides(&GUIDES, y_max);

    for (idx, contig) in windows.iter().enumerate() {
        let points = contig.means.iter().enumerate().map(|(i, mean)| (i as f64 * window_mbp, *mean));
        graph.draw_series(idx, points, y_max, "lime");
    }
    graph.draw_x_axis("Position on chromosome (Mbp)", 6);

    svg::save(path, &graph.document).wrap_err(eyre!("Failed writing to {path:?}"))?;
    Ok(())
}

fn write_table(windows: &[ContigWindows], path: &Path) -> Result<()> {
    let mut writer = open_tsv_writer(path.to_path_buf()).wrap_err(eyre!("Failed writing to {path:?}"))?;

    for contig in windows {
        let mut record = vec![contig.contig.clone()];
        record.extend(contig.means.iter().map(|mean| format!("{mean:.2}")));
        writer.write_record(record)?;
    }

    writer.flush()?;
    Ok(())
}
