use std::io;

use color_eyre::Result;
use indexmap::IndexMap;

use crate::error::Error;
use crate::stats::mean;
use crate::utils::sort_alphanumeric;

/// Sequencing depth per position, contigs in the order they first appear.
///
/// The input is tab separated with the contig in the first and the depth in the last column,
/// e.g. the output of `samtools depth`. Rows of a contig are appended in file order, so the
/// value at index `i` belongs to the `i`th row of that contig.
#[derive(Debug, Default, Clone)]
pub struct CoverageTable {
    contigs: IndexMap<String, Vec<f64>>,
}

impl CoverageTable {
    pub fn from_lines<I>(lines: I) -> Result<Self>
    where
        I: Iterator<Item = io::Result<(usize, String)>>,
    {
        let mut contigs: IndexMap<String, Vec<f64>> = IndexMap::new();

        for line in lines {
            let (line_no, line) = line?;
            match parse_depth(&line, line_no) {
                Ok((contig, depth)) => match contigs.get_mut(contig) {
                    Some(values) => values.push(depth),
                    None => {
                        contigs.insert(contig.to_string(), vec![depth]);
                    }
                },
                Err(e) => tracing::warn!("Skipping coverage line: {e}"),
            }
        }

        Ok(Self { contigs })
    }

    pub fn contig(&self, name: &str) -> Option<&[f64]> {
        self.contigs.get(name).map(Vec::as_slice)
    }

    pub fn contig_names(&self) -> impl Iterator<Item = &str> {
        self.contigs.keys().map(String::as_str)
    }

    pub fn sorted_contig_names(&self) -> Vec<&str> {
        sort_alphanumeric(self.contig_names())
    }

    /// Mean depth of the zero-based value range `start..end`, clamped to the available values
    pub fn range_mean(&self, contig: &str, start: u64, end: u64) -> Option<f64> {
        let values = self.contig(contig)?;
        let start = (start as usize).min(values.len());
        let end = (end as usize).clamp(start, values.len());

        match &values[start..end] {
            [] => None,
            slice => Some(mean(slice)),
        }
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }
}

fn parse_depth(line: &str, line_no: usize) -> Result<(&str, f64), Error> {
    let mut fields = line.trim().split('\t');

    let contig = fields.next().unwrap_or_default();
    let value = fields.last().ok_or(Error::MissingColumns {
        line: line_no,
        found: 1,
        expected: 2,
    })?;

    let depth = value.parse::<f64>().map_err(|_| Error::CoverageParse {
        line: line_no,
        value: value.to_string(),
    })?;

    Ok((contig, depth))
}

/// Means of consecutive windows of `window` values, each capped at `saturation`.
/// The last window may be shorter.
pub fn window_means(values: &[f64], window: usize, saturation: f64) -> Result<Vec<f64>, Error> {
    if window == 0 {
        return Err(Error::ZeroWindow);
    }

    Ok(values
        .chunks(window)
        .map(|chunk| mean(chunk).min(saturation))
        .collect())
}
