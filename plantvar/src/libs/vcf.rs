use crate::error::Error;

/// CHROM, POS, ID, REF, ALT, QUAL, FILTER and INFO
pub const MIN_VCF_COLUMNS: usize = 8;

/// One data line of a VCF, borrowed from the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantRecord<'a> {
    pub chrom: &'a str,
    /// Kept as written, positions are only parsed where arithmetic is needed
    pub pos: &'a str,
    pub id: &'a str,
    pub reference: &'a str,
    pub alt: &'a str,
    pub info: &'a str,
    /// FORMAT and sample columns
    pub samples: Vec<&'a str>,
}

impl<'a> VariantRecord<'a> {
    pub fn parse(line: &'a str, line_no: usize) -> Result<Self, Error> {
        let fields: Vec<&str> = line.trim().split('\t').collect();

        if fields.len() < MIN_VCF_COLUMNS {
            return Err(Error::MissingColumns {
                line: line_no,
                found: fields.len(),
                expected: MIN_VCF_COLUMNS,
            });
        }

        Ok(Self {
            chrom: fields[0],
            pos: fields[1],
            id: fields[2],
            reference: fields[3],
            alt: fields[4],
            info: fields[7],
            samples: fields[MIN_VCF_COLUMNS..].to_vec(),
        })
    }

    pub fn parse_pos(&self, line_no: usize) -> Result<u64, Error> {
        self.pos.parse::<u64>().map_err(|_| Error::PosParse {
            line: line_no,
            value: self.pos.to_string(),
        })
    }

    /// Absolute difference between the REF and ALT allele lengths
    pub fn length_difference(&self) -> usize {
        self.reference.len().abs_diff(self.alt.len())
    }

    pub fn is_equal_length(&self) -> bool {
        self.reference.len() == self.alt.len()
    }

    pub fn is_snv(&self) -> bool {
        self.is_equal_length() && self.reference.len() == 1
    }

    pub fn is_indel(&self) -> bool {
        !self.is_equal_length()
    }

    pub fn is_multiallelic(&self) -> bool {
        self.alt.contains(',')
    }

    /// The last column of the line, the genotype of a single sample VCF
    pub fn last_column(&self) -> &'a str {
        self.samples.last().copied().unwrap_or(self.info)
    }
}

/// Allele depths of a genotype column in the `GT:AD:...` layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlleleDepths {
    pub reference: f64,
    pub alt: f64,
}

impl AlleleDepths {
    pub fn total(&self) -> f64 {
        self.reference + self.alt
    }

    /// Fraction of reads supporting the REF allele
    pub fn ref_fraction(&self) -> f64 {
        self.reference / self.total()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zygosity {
    Heterozygous,
    HomozygousAlt,
}

impl Zygosity {
    /// Only unphased `0/1` and `1/1` calls are recognized
    pub fn from_genotype_column(column: &str) -> Option<Self> {
        if column.starts_with("0/1") {
            Some(Self::Heterozygous)
        } else if column.starts_with("1/1") {
            Some(Self::HomozygousAlt)
        } else {
            None
        }
    }
}

pub fn parse_allele_depths(column: &str, line_no: usize) -> Result<AlleleDepths, Error> {
    let err = || Error::DepthParse {
        line: line_no,
        value: column.to_string(),
    };

    let depths = column.split(':').nth(1).ok_or_else(err)?;
    let mut depths = depths.split(',').map(str::parse::<f64>);

    match (depths.next(), depths.next()) {
        (Some(Ok(reference)), Some(Ok(alt))) => Ok(AlleleDepths { reference, alt }),
        _ => Err(err()),
    }
}
