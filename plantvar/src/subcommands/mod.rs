/// Extract HIGH impact variants and effect statistics from SnpEff output
pub mod high_impact;

/// InDel length distributions inside and outside of coding sequences
pub mod indel_lengths;

/// Mean coverage per gene
pub mod gene_coverage;

/// Windowed coverage plots per contig
pub mod coverage_plot;

/// SNV and InDel density along the chromosomes
pub mod variant_density;

/// Allele frequency distribution for ploidy estimation
pub mod ploidy_check;
