use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use color_eyre::Result;
use tracing::Level;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::fmt::time::OffsetTime;

use crate::args::GraphArgs;
use crate::effects::DEFAULT_GENE_PATTERN;
use crate::subcommands::{
    coverage_plot, gene_coverage, high_impact, indel_lengths, ploidy_check, variant_density,
};

#[derive(Parser, Debug)]
#[command(author, version, about, styles=get_styles())]
pub struct Arguments {
    #[command(subcommand)]
    cmd: SubCommand,
}

#[derive(Args, Debug, Clone)]
pub struct LogAndVerbosity {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, default_value_t = 3)]
    pub verbosity: u8,

    /// A file path to save logs to
    #[arg(short, long)]
    pub log_file: Option<PathBuf>,

    /// Silence all warning and info messages
    #[arg(long)]
    pub silent: bool,
}

#[derive(Subcommand, Debug)]
pub enum SubCommand {
    /// Extract HIGH impact variants from a SnpEff annotated VCF
    HighImpact {
        /// SnpEff annotated VCF
        #[arg(long = "in")]
        input: PathBuf,

        /// Output report, the summary is written next to it
        #[arg(long = "out")]
        output: PathBuf,

        /// Tab separated gene annotation, gene ID in the first column
        #[arg(long = "anno")]
        annotation: Option<PathBuf>,

        /// Regular expression for gene IDs
        #[arg(long, default_value_t = String::from(DEFAULT_GENE_PATTERN))]
        gene_pattern: String,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Compare InDel lengths inside and outside of coding sequences
    IndelLengths {
        /// Variant calls
        #[arg(long)]
        vcf: PathBuf,

        /// GFF3 with CDS features
        #[arg(long)]
        gff: PathBuf,

        /// Output directory
        #[arg(long = "out", default_value_os_t = PathBuf::from("./"))]
        output: PathBuf,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Mean sequencing depth of every gene
    GeneCoverage {
        /// GFF3 with gene features
        #[arg(long)]
        gff: PathBuf,

        /// Per position coverage, contig in the first and depth in the last column
        #[arg(long)]
        cov: PathBuf,

        /// Output directory
        #[arg(long = "out", default_value_os_t = PathBuf::from("./"))]
        output: PathBuf,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Plot windowed sequencing depth along the contigs
    CoveragePlot {
        /// Per position coverage, contig in the first and depth in the last column
        #[arg(long = "in")]
        input: PathBuf,

        /// Output file prefix
        #[arg(long = "out")]
        output: PathBuf,

        /// Window size in positions
        #[arg(long = "res", default_value_t = 10000)]
        resolution: usize,

        /// Cap for the window means
        #[arg(long = "sat", default_value_t = 300.0)]
        saturation: f64,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Count SNVs and InDels in fixed size intervals
    VariantDensity {
        /// Variant calls
        #[arg(long)]
        vcf: PathBuf,

        /// Output directory
        #[arg(long = "out", default_value_os_t = PathBuf::from("./"))]
        output: PathBuf,

        /// Interval size in bp
        #[arg(long = "res", default_value_t = 1_000_000)]
        resolution: u64,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },

    /// Allele frequency and coverage distributions of the variant calls
    PloidyCheck {
        /// Variant calls with AD in the second FORMAT field
        #[arg(long)]
        vcf: PathBuf,

        /// Output directory
        #[arg(long = "out", default_value_os_t = PathBuf::from("./"))]
        output: PathBuf,

        /// Allele frequencies are only recorded above this depth
        #[arg(long, default_value_t = 20)]
        min_depth: u32,

        #[command(flatten)]
        graph_args: GraphArgs,

        #[command(flatten)]
        log_and_verbosity: LogAndVerbosity,
    },
}

impl SubCommand {
    #[rustfmt::skip]
    pub fn log_and_verbosity(&self) -> (u8, &Option<PathBuf>, bool) {
        match self {
            SubCommand::HighImpact { log_and_verbosity, .. }
            | SubCommand::IndelLengths { log_and_verbosity, .. }
            | SubCommand::GeneCoverage { log_and_verbosity, .. }
            | SubCommand::CoveragePlot { log_and_verbosity, .. }
            | SubCommand::VariantDensity { log_and_verbosity, .. }
            | SubCommand::PloidyCheck { log_and_verbosity, .. }
            => (log_and_verbosity.verbosity, &log_and_verbosity.log_file, log_and_verbosity.silent),
        }
    }
}

pub fn run_args(args: Arguments) -> Result<()> {
    let (verbosity, log_file, is_silent) = args.cmd.log_and_verbosity();

    let (level, wrtr, _guard) = init_tracing(verbosity, log_file, is_silent)?;

    let timer = time::format_description::parse("[hour]:[minute]:[second].[subsecond digits:3]")?;
    let time_offset = time::UtcOffset::current_local_offset().unwrap_or(time::UtcOffset::UTC);
    let timer = OffsetTime::new(time_offset, timer);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(wrtr)
        .with_timer(timer)
        .init();

    run_cmd(args.cmd)?;

    Ok(())
}

#[rustfmt::skip]
pub fn run_cmd(cmd: SubCommand) -> Result<()> {
    match cmd {
        SubCommand::HighImpact { input, output, annotation, gene_pattern, .. }
            => high_impact::run(input, output, annotation, gene_pattern)?,
        SubCommand::IndelLengths { vcf, gff, output, graph_args, .. }
            => indel_lengths::run(vcf, gff, output, graph_args)?,
        SubCommand::GeneCoverage { gff, cov, output, graph_args, .. }
            => gene_coverage::run(gff, cov, output, graph_args)?,
        SubCommand::CoveragePlot { input, output, resolution, saturation, graph_args, .. }
            => coverage_plot::run(input, output, resolution, saturation, graph_args)?,
        SubCommand::VariantDensity { vcf, output, resolution, graph_args, .. }
            => variant_density::run(vcf, output, resolution, graph_args)?,
        SubCommand::PloidyCheck { vcf, output, min_depth, graph_args, .. }
            => ploidy_check::run(vcf, output, min_depth, graph_args)?,
    };
    Ok(())
}

pub fn init_tracing(
    verbosity: u8,
    log_file: &Option<PathBuf>,
    is_silent: bool,
) -> Result<(Level, NonBlocking, WorkerGuard)> {
    let level = if is_silent {
        Level::ERROR
    } else {
        match verbosity {
            0 | 1 => Level::ERROR,
            2 => Level::WARN,
            3 => Level::INFO,
            4 => Level::DEBUG,
            5..=u8::MAX => Level::TRACE,
        }
    };

    // Write logs to stderr or file
    let (wrtr, _guard) = match log_file {
        Some(path) => {
            let file = std::fs::File::options()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            tracing_appender::non_blocking(file)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    Ok((level, wrtr, _guard))
}

pub fn get_styles() -> clap::builder::Styles {
    let yellow = anstyle::Color::Ansi(anstyle::AnsiColor::Yellow);
    let green = anstyle::Color::Ansi(anstyle::AnsiColor::Green);
    let red = anstyle::Color::Ansi(anstyle::AnsiColor::Red);

    clap::builder::Styles::styled()
        .usage(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
        .header(anstyle::Style::new().bold().underline().fg_color(Some(yellow)))
        .literal(anstyle::Style::new().fg_color(Some(green)))
        .invalid(anstyle::Style::new().bold().fg_color(Some(red)))
        .error(anstyle::Style::new().bold().fg_color(Some(red)))
        .valid(anstyle::Style::new().bold().underline().fg_color(Some(green)))
        .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}
