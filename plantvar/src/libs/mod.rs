// PLANTVAR - Plant variant post-processing toolkit
// Copyright (C) 2024  The plantvar authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! PLANTVAR - Plant variant post-processing toolkit
//!
//! This library and program collects the small analyses that follow variant calling and
//! SnpEff annotation in a plant genome project.
//!
//! For navigating the documentation of the available modules, see [the `Modules` section below](#modules).
//!
//! PLANTVAR toolkit commands
//!
//! * Summarize the first high impact effect per gene (`high-impact`)
//! * InDel length distribution inside and outside of coding sequences (`indel-lengths`)
//! * Average sequencing coverage per gene (`gene-coverage`)
//! * Windowed coverage tracks and histograms per chromosome (`coverage-plot`)
//! * Genome-wide SNV and InDel density (`variant-density`)
//! * Allele frequency histograms for checking ploidy (`ploidy-check`)
//!
//! # Getting started
//!
//! ## Installing PLANTVAR
//!
//! Rust and its package manager cargo can be installed following the instruction for [rustup](https://rustup.rs/).
//!
//! After installing cargo, run the following command
//!
//! ```bash
//! cargo install --path plantvar
//! ```
//!
//! ## Running PLANTVAR
//!
//! To print the available commands use:
//! ```bash
//! plantvar --help
//! ```
//!
//! A full pass over a SnpEff annotated call set:
//! ```bash
//!plantvar high-impact --in $vcf --out ${outdir}/high_impact.tsv --anno $annotation
//!
//!plantvar indel-lengths --vcf $vcf --gff $gff --out ${outdir}/indels
//!
//!plantvar variant-density --vcf $vcf --out ${outdir}/density --res 1000000
//!
//!plantvar ploidy-check --vcf $vcf --out ${outdir}/ploidy
//!
//!plantvar gene-coverage --gff $gff --cov $coverage --out ${outdir}/gene_coverage
//!
//!plantvar coverage-plot --in $coverage --out ${outdir}/coverage/cov_ --res 10000 --sat 300
//!```
//!

#[doc(hidden)]
pub mod args;

#[doc(hidden)]
pub mod io;

/// Tab separated VCF records
pub mod vcf;

/// GFF3 features, CDS positions and gene positions
pub mod gff;

/// Per-position sequencing coverage tables
pub mod coverage;

/// Functional gene annotation lookup
pub mod annotation;

/// Classification of SnpEff effect annotations
pub mod effects;

#[doc(hidden)]
pub mod utils;

#[doc(hidden)]
pub mod stats;

#[doc(hidden)]
pub mod error;

#[cfg(feature = "clap")]
pub mod clap;
