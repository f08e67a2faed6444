use std::collections::HashMap;
use std::io;

use color_eyre::Result;
use indexmap::IndexMap;

use crate::error::Error;

pub const GFF_COLUMNS: usize = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GffFeature<'a> {
    pub seqid: &'a str,
    pub feature_type: &'a str,
    pub start: u64,
    pub end: u64,
    pub attributes: &'a str,
}

impl<'a> GffFeature<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self, Error> {
        let fields: Vec<&str> = line.trim().split('\t').collect();

        if fields.len() < GFF_COLUMNS {
            return Err(Error::MissingColumns {
                line: line_no,
                found: fields.len(),
                expected: GFF_COLUMNS,
            });
        }

        let parse_pos = |value: &str| {
            value.parse::<u64>().map_err(|_| Error::PosParse {
                line: line_no,
                value: value.to_string(),
            })
        };

        Ok(Self {
            seqid: fields[0],
            feature_type: fields[2],
            start: parse_pos(fields[3])?,
            end: parse_pos(fields[4])?,
            attributes: fields[fields.len() - 1],
        })
    }

    /// Value of `ID=` in the first attribute
    pub fn id(&self) -> &'a str {
        let first = self.attributes.split(';').next().unwrap_or(self.attributes);
        first.rsplit("ID=").next().unwrap_or(first)
    }
}

/// Positions covered by CDS features, stored as merged half-open intervals per sequence
#[derive(Debug, Default, Clone)]
pub struct CdsPositions {
    intervals: HashMap<String, Vec<(u64, u64)>>,
}

impl CdsPositions {
    /// CDS features cover `start..end`, the end coordinate itself is not included
    pub fn from_lines<I>(lines: I) -> Result<Self>
    where
        I: Iterator<Item = io::Result<(usize, String)>>,
    {
        let mut intervals: HashMap<String, Vec<(u64, u64)>> = HashMap::new();

        for line in lines {
            let (line_no, line) = line?;
            let feature = match GffFeature::parse(&line, line_no) {
                Ok(feature) => feature,
                Err(e) => {
                    tracing::warn!("Skipping GFF line: {e}");
                    continue;
                }
            };

            if feature.feature_type == "CDS" && feature.start < feature.end {
                intervals
                    .entry(feature.seqid.to_string())
                    .or_default()
                    .push((feature.start, feature.end));
            }
        }

        for ranges in intervals.values_mut() {
            *ranges = merge_intervals(std::mem::take(ranges));
        }

        Ok(Self { intervals })
    }

    pub fn contains(&self, seqid: &str, pos: u64) -> bool {
        let Some(ranges) = self.intervals.get(seqid) else {
            return false;
        };

        let idx = ranges.partition_point(|(start, _)| *start <= pos);
        idx > 0 && pos < ranges[idx - 1].1
    }

    /// Number of distinct CDS positions
    pub fn len(&self) -> u64 {
        self.intervals
            .values()
            .flatten()
            .map(|(start, end)| end - start)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }
}

fn merge_intervals(mut ranges: Vec<(u64, u64)>) -> Vec<(u64, u64)> {
    ranges.sort_unstable();

    let mut merged: Vec<(u64, u64)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenePosition {
    pub id: String,
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

/// Genes in file order. A repeated ID keeps its first position in the order but takes the
/// coordinates of the last row.
pub fn load_gene_positions<I>(lines: I) -> Result<IndexMap<String, GenePosition>>
where
    I: Iterator<Item = io::Result<(usize, String)>>,
{
    let mut genes = IndexMap::new();

    for line in lines {
        let (line_no, line) = line?;
        let feature = match GffFeature::parse(&line, line_no) {
            Ok(feature) => feature,
            Err(e) => {
                tracing::warn!("Skipping GFF line: {e}");
                continue;
            }
        };

        if feature.feature_type != "gene" {
            continue;
        }

        let id = feature.id().to_string();
        genes.insert(
            id.clone(),
            GenePosition {
                id,
                chrom: feature.seqid.to_string(),
                start: feature.start,
                end: feature.end,
            },
        );
    }

    Ok(genes)
}
