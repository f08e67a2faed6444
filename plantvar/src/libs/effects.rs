//! Selects one representative SnpEff effect per gene and tallies impact tiers.
//!
//! Every sub-annotation of the INFO column is matched against a [`GenePattern`]. Genes that
//! already received a `stop_gained` call are ended and ignored afterwards. The impact tier is
//! looked up from the whole line, the effect kind from the sub-annotation, and each
//! (chromosome, position) site is credited to at most one tier.

use std::collections::HashSet;
use std::io;
use std::str::FromStr;

use color_eyre::Result;
use regex::Regex;
use serde::Serialize;

use crate::error::Error;
use crate::vcf::VariantRecord;

/// Gene IDs of the banana (Musa acuminata) annotation, e.g. `Ma01_g00010` or `MaUn_random_g01234`
pub const DEFAULT_GENE_PATTERN: &str = r"Ma[0-9Un_random]+_g\d+";

/// REF/ALT length difference from which a record counts as a structural variant
pub const LARGE_VARIANT_LENGTH: usize = 100;

/// Compiled gene ID grammar of the organism
#[derive(Debug, Clone)]
pub struct GenePattern(Regex);

impl GenePattern {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| Error::GenePattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// First gene ID in the text
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.0.find(text).map(|m| m.as_str())
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for GenePattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImpactTier {
    High,
    Moderate,
    Low,
    Modifier,
}

impl ImpactTier {
    /// Severity order of SnpEff, the first tier found in a line wins
    pub const PRIORITY: [(&'static str, ImpactTier); 4] = [
        ("HIGH", ImpactTier::High),
        ("MODERATE", ImpactTier::Moderate),
        ("LOW", ImpactTier::Low),
        ("MODIFIER", ImpactTier::Modifier),
    ];

    pub fn from_line(line: &str) -> Option<Self> {
        Self::PRIORITY
            .iter()
            .find(|(needle, _)| line.contains(needle))
            .map(|(_, tier)| *tier)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Moderate => "MODERATE",
            Self::Low => "LOW",
            Self::Modifier => "MODIFIER",
        }
    }
}

impl std::fmt::Display for ImpactTier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// HIGH impact effects that are extracted into the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    StopGained,
    StopLost,
    SpliceRegionVariant,
    Frameshift,
}

impl EffectKind {
    pub const PRIORITY: [(&'static str, EffectKind); 4] = [
        ("stop_gained", EffectKind::StopGained),
        ("stop_lost", EffectKind::StopLost),
        ("splice_region_variant", EffectKind::SpliceRegionVariant),
        ("frameshift", EffectKind::Frameshift),
    ];

    pub fn from_annotation(annotation: &str) -> Option<Self> {
        Self::PRIORITY
            .iter()
            .find(|(needle, _)| annotation.contains(needle))
            .map(|(_, kind)| *kind)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StopGained => "stop_gained",
            Self::StopLost => "stop_lost",
            Self::SpliceRegionVariant => "splice_region_variant",
            Self::Frameshift => "frameshift",
        }
    }
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectRow {
    pub chrom: String,
    pub pos: String,
    pub reference: String,
    pub alt: String,
    pub gene_id: String,
    pub effect: EffectKind,
}

impl EffectRow {
    pub fn fields(&self) -> [&str; 6] {
        [
            &self.chrom,
            &self.pos,
            &self.reference,
            &self.alt,
            &self.gene_id,
            self.effect.as_str(),
        ]
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct EffectCounts {
    pub annotated_variants: usize,
    pub small_variants: usize,
    pub snvs: usize,
    pub splice_region_variants: usize,
    pub premature_stops: usize,
    pub frameshifts: usize,
    pub lost_stops: usize,
    pub high: usize,
    pub moderate: usize,
    pub low: usize,
    pub modifier: usize,
}

impl EffectCounts {
    fn count_effect(&mut self, effect: EffectKind) {
        match effect {
            EffectKind::StopGained => self.premature_stops += 1,
            EffectKind::StopLost => self.lost_stops += 1,
            EffectKind::SpliceRegionVariant => self.splice_region_variants += 1,
            EffectKind::Frameshift => self.frameshifts += 1,
        }
    }

    fn count_tier(&mut self, tier: ImpactTier) {
        match tier {
            ImpactTier::High => self.high += 1,
            ImpactTier::Moderate => self.moderate += 1,
            ImpactTier::Low => self.low += 1,
            ImpactTier::Modifier => self.modifier += 1,
        }
    }

    pub fn tier(&self, tier: ImpactTier) -> usize {
        match tier {
            ImpactTier::High => self.high,
            ImpactTier::Moderate => self.moderate,
            ImpactTier::Low => self.low,
            ImpactTier::Modifier => self.modifier,
        }
    }

    /// Sum of the recognized HIGH impact effect kinds
    pub fn recognized_effects(&self) -> usize {
        self.premature_stops + self.lost_stops + self.splice_region_variants + self.frameshifts
    }
}

/// Counters and the premature stop check, serialized next to the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EffectSummary {
    #[serde(flatten)]
    pub counts: EffectCounts,
    pub premature_stop_check: usize,
    pub premature_stop_check_unique: usize,
}

/// Accumulator of a single scan over an annotated VCF
#[derive(Debug, Default)]
pub struct EffectState {
    ended_genes: HashSet<String>,
    credited_sites: HashSet<(String, String)>,
    premature_stops: Vec<String>,
    rows: Vec<EffectRow>,
    counts: EffectCounts,
}

impl EffectState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify one data line. A line with missing columns is still counted as an annotated
    /// variant before the error is returned.
    pub fn classify_line(
        &mut self,
        line: &str,
        line_no: usize,
        pattern: &GenePattern,
    ) -> Result<(), Error> {
        self.counts.annotated_variants += 1;

        let record = VariantRecord::parse(line, line_no)?;

        if record.length_difference() >= LARGE_VARIANT_LENGTH {
            return Ok(());
        }

        self.counts.small_variants += 1;
        if record.is_equal_length() {
            self.counts.snvs += 1;
        }

        for annotation in record.info.split(',') {
            let Some(gene_id) = pattern.find(annotation) else {
                continue;
            };

            if self.ended_genes.contains(gene_id) {
                continue;
            }

            let Some(tier) = ImpactTier::from_line(line) else {
                continue;
            };

            if !self.credit_site(record.chrom, record.pos) {
                continue;
            }

            self.counts.count_tier(tier);

            if tier == ImpactTier::High {
                self.record_high_impact(&record, annotation, gene_id);
            }
        }

        Ok(())
    }

    /// Returns false if the site was already credited to a tier
    fn credit_site(&mut self, chrom: &str, pos: &str) -> bool {
        self.credited_sites
            .insert((chrom.to_string(), pos.to_string()))
    }

    fn record_high_impact(&mut self, record: &VariantRecord, annotation: &str, gene_id: &str) {
        let Some(effect) = EffectKind::from_annotation(annotation) else {
            tracing::trace!(
                "HIGH impact call for {gene_id} at {}:{} has no extracted effect kind",
                record.chrom,
                record.pos
            );
            return;
        };

        self.counts.count_effect(effect);

        if effect == EffectKind::StopGained {
            self.premature_stops.push(gene_id.to_string());
            self.ended_genes.insert(gene_id.to_string());
        }

        self.rows.push(EffectRow {
            chrom: record.chrom.to_string(),
            pos: record.pos.to_string(),
            reference: record.reference.to_string(),
            alt: record.alt.to_string(),
            gene_id: gene_id.to_string(),
            effect,
        });
    }

    pub fn rows(&self) -> &[EffectRow] {
        &self.rows
    }

    pub fn counts(&self) -> &EffectCounts {
        &self.counts
    }

    pub fn premature_stops(&self) -> &[String] {
        &self.premature_stops
    }

    pub fn unique_premature_stops(&self) -> usize {
        self.premature_stops.iter().collect::<HashSet<_>>().len()
    }

    pub fn summary(&self) -> EffectSummary {
        EffectSummary {
            counts: self.counts.clone(),
            premature_stop_check: self.premature_stops.len(),
            premature_stop_check_unique: self.unique_premature_stops(),
        }
    }
}

/// Scan all data lines into a fresh state. Malformed lines are logged and skipped,
/// read errors end the scan.
pub fn classify_lines<I>(lines: I, pattern: &GenePattern) -> Result<EffectState>
where
    I: Iterator<Item = io::Result<(usize, String)>>,
{
    let mut state = EffectState::new();

    for line in lines {
        let (line_no, line) = line?;
        if let Err(e) = state.classify_line(&line, line_no, pattern) {
            tracing::warn!("Skipping line: {e}");
        }
    }

    Ok(state)
}

#[cfg(test)]
#[rustfmt::skip]
mod tests {
    use super::*;
    use crate::io::DataLines;

    fn default_pattern() -> GenePattern {
        GenePattern::new(DEFAULT_GENE_PATTERN).unwrap()
    }

    fn classify(input: &str) -> EffectState {
        classify_lines(DataLines::new(input.as_bytes()), &default_pattern()).unwrap()
    }

    #[test]
    fn gene_pattern() {
        let pattern = default_pattern();
        assert_eq!(Some("Ma01_g00010"), pattern.find("G|stop_gained|HIGH|Ma01_g00010|Ma01_g00010.1"));
        assert_eq!(Some("MaUn_random_g01234"), pattern.find("G|intron_variant|MODIFIER|MaUn_random_g01234"));
        assert_eq!(None, pattern.find("G|intron_variant|MODIFIER|AT1G01010"));

        let pattern: GenePattern = r"AT\dG\d{5}".parse().unwrap();
        assert_eq!(Some("AT1G01010"), pattern.find("G|intron_variant|MODIFIER|AT1G01010"));

        assert!(matches!(GenePattern::new("Ma[0-9"), Err(Error::GenePattern { .. })));
    }

    #[test]
    fn tier_priority() {
        assert_eq!(Some(ImpactTier::High), ImpactTier::from_line("A|LOW|x,A|HIGH|y"));
        assert_eq!(Some(ImpactTier::Moderate), ImpactTier::from_line("A|MODIFIER|x,A|MODERATE|y"));
        assert_eq!(Some(ImpactTier::Low), ImpactTier::from_line("A|MODIFIER|x,A|LOW|y"));
        assert_eq!(Some(ImpactTier::Modifier), ImpactTier::from_line("A|MODIFIER|x"));
        assert_eq!(None, ImpactTier::from_line("A|synonymous|x"));
    }

    #[test]
    fn effect_priority() {
        assert_eq!(Some(EffectKind::StopGained), EffectKind::from_annotation("frameshift_variant&stop_gained"));
        assert_eq!(Some(EffectKind::StopLost), EffectKind::from_annotation("stop_lost&splice_region_variant"));
        assert_eq!(Some(EffectKind::SpliceRegionVariant), EffectKind::from_annotation("splice_region_variant&frameshift_variant"));
        assert_eq!(Some(EffectKind::Frameshift), EffectKind::from_annotation("frameshift_variant"));
        assert_eq!(None, EffectKind::from_annotation("start_lost"));
    }

    #[test]
    fn single_stop_gained() {
        let state = classify("chr1\t100\trs1\tA\tG\t.\t.\tANN=HIGH|stop_gained|Ma01_g00010\n");

        assert_eq!(1, state.rows().len());
        assert_eq!(["chr1", "100", "A", "G", "Ma01_g00010", "stop_gained"], state.rows()[0].fields());
        assert_eq!(1, state.counts().high);
        assert_eq!(1, state.counts().premature_stops);
        assert_eq!(1, state.counts().snvs);
        assert_eq!(1, state.counts().small_variants);
        assert_eq!(1, state.counts().annotated_variants);
    }

    #[test]
    fn ended_gene_is_not_reported_twice() {
        let input = "\
chr1\t100\t.\tA\tG\t.\t.\tANN=G|stop_gained|HIGH|Ma01_g00010
chr1\t200\t.\tC\tT\t.\t.\tANN=T|stop_gained|HIGH|Ma01_g00010
chr1\t300\t.\tC\tCA\t.\t.\tANN=CA|frameshift_variant|HIGH|Ma01_g00010
";
        let state = classify(input);
        assert_eq!(1, state.rows().len());
        assert_eq!(1, state.counts().high);
        assert_eq!(0, state.counts().frameshifts);
        assert_eq!(1, state.premature_stops().len());
        assert_eq!(1, state.unique_premature_stops());
    }

    #[test]
    fn non_terminal_effects_keep_gene_open() {
        let input = "\
chr1\t100\t.\tA\tAT\t.\t.\tANN=AT|frameshift_variant|HIGH|Ma01_g00010
chr1\t200\t.\tC\tT\t.\t.\tANN=T|stop_gained|HIGH|Ma01_g00010
";
        let state = classify(input);
        let effects: Vec<_> = state.rows().iter().map(|r| r.effect).collect();
        assert_eq!(vec![EffectKind::Frameshift, EffectKind::StopGained], effects);
        assert_eq!(2, state.counts().high);
    }

    #[test]
    fn site_is_credited_once() {
        // Two genes overlap the same site, only the first sub-annotation is credited
        let input = "chr1\t100\t.\tA\tG\t.\t.\tANN=G|stop_gained|HIGH|Ma01_g00010,G|stop_lost|HIGH|Ma01_g00020\n";
        let state = classify(input);
        assert_eq!(1, state.rows().len());
        assert_eq!("Ma01_g00010", state.rows()[0].gene_id);
        assert_eq!(1, state.counts().high);
        assert_eq!(0, state.counts().lost_stops);
    }

    #[test]
    fn sites_are_keyed_by_chrom_and_pos() {
        let input = "\
chr1\t11\t.\tA\tG\t.\t.\tANN=G|missense_variant|MODERATE|Ma01_g00010
chr11\t1\t.\tA\tG\t.\t.\tANN=G|missense_variant|MODERATE|Ma11_g00010
";
        let state = classify(input);
        assert_eq!(2, state.counts().moderate);
    }

    #[test]
    fn lower_tiers_are_only_counted() {
        let input = "\
chr1\t100\t.\tA\tG\t.\t.\tANN=G|missense_variant|MODERATE|Ma01_g00010
chr1\t200\t.\tA\tG\t.\t.\tANN=G|synonymous_variant|LOW|Ma01_g00010
chr1\t300\t.\tA\tG\t.\t.\tANN=G|intron_variant|MODIFIER|Ma01_g00010
chr1\t400\t.\tA\tG\t.\t.\tANN=G|intron_variant|MODIFIER|Ma01_g00010,G|upstream_gene_variant|MODIFIER|Ma01_g00020
";
        let state = classify(input);
        assert!(state.rows().is_empty());
        assert_eq!(1, state.counts().moderate);
        assert_eq!(1, state.counts().low);
        assert_eq!(2, state.counts().modifier);
    }

    #[test]
    fn unrecognized_high_effect_is_counted_not_extracted() {
        let state = classify("chr1\t100\t.\tA\tG\t.\t.\tANN=G|start_lost|HIGH|Ma01_g00010\n");
        assert!(state.rows().is_empty());
        assert_eq!(1, state.counts().high);
        assert_eq!(0, state.counts().recognized_effects());
    }

    #[test]
    fn annotations_without_gene_are_skipped() {
        let state = classify("chr1\t100\t.\tA\tG\t.\t.\tANN=G|intergenic_region|MODIFIER|CHR_START-CHR_END\n");
        assert_eq!(0, state.counts().modifier);
        assert_eq!(1, state.counts().small_variants);
    }

    #[test]
    fn large_variants_are_filtered() {
        let reference = "A".repeat(150);
        let input = format!("chr1\t100\t.\t{reference}\tA\t.\t.\tANN=A|stop_gained|HIGH|Ma01_g00010\n");
        let state = classify(&input);
        assert_eq!(1, state.counts().annotated_variants);
        assert_eq!(0, state.counts().small_variants);
        assert_eq!(0, state.counts().snvs);
        assert_eq!(0, state.counts().high);
        assert!(state.rows().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let input = "\
chr1\t100\t.\tA
chr1\t200\t.\tA\tG\t.\t.\tANN=G|stop_gained|HIGH|Ma01_g00010
";
        let state = classify(input);
        assert_eq!(2, state.counts().annotated_variants);
        assert_eq!(1, state.counts().small_variants);
        assert_eq!(1, state.rows().len());
    }

    #[test]
    fn summary() {
        let state = classify("chr1\t100\trs1\tA\tG\t.\t.\tANN=HIGH|stop_gained|Ma01_g00010\n");
        let summary = state.summary();
        assert_eq!(1, summary.premature_stop_check);
        assert_eq!(1, summary.premature_stop_check_unique);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(1, json["high"]);
        assert_eq!(1, json["premature_stops"]);
        assert_eq!(1, json["premature_stop_check"]);
    }

    #[test]
    fn invalid_utf8_does_not_end_scan() {
        let input: &[u8] = b"chr1\t100\trs\xe9\tA\tG\t.\t.\tANN=HIGH|stop_gained|Ma01_g00010\n\
chr1\t200\trs2\tA\tG\t.\t.\tANN=HIGH|stop_gained|Ma01_g00020\n";
        let state = classify_lines(DataLines::new(input), &default_pattern()).unwrap();

        assert_eq!(2, state.rows().len());
        assert_eq!(["chr1", "100", "A", "G", "Ma01_g00010", "stop_gained"], state.rows()[0].fields());
        assert_eq!(["chr1", "200", "A", "G", "Ma01_g00020", "stop_gained"], state.rows()[1].fields());
        assert_eq!(2, state.counts().annotated_variants);
    }
}
