use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use rsgsea::prelude::*;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the expression profile (whitespace-separated genes)
    #[arg(short, long)]
    profile: String,

    /// Path to the phenotype correlation table (gene, then integer values)
    #[arg(short, long)]
    correlations: String,

    /// Gene set file (whitespace-separated genes); may be repeated
    #[arg(short = 's', long = "gene-set")]
    gene_sets: Vec<String>,

    /// Path to a GMT file of gene sets
    #[arg(short, long)]
    gmt: Option<String>,

    /// Output path (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
    format: OutputFormat,

    /// Minimum gene set size
    #[arg(long, default_value_t = 0)]
    min_size: usize,

    /// Maximum gene set size
    #[arg(long, default_value_t = usize::MAX)]
    max_size: usize,

    /// Number of threads (default: all cores)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Log every gene found in the expression profile
    #[arg(short, long)]
    verbose: bool,
}

fn init_logger(verbose: bool) {
    let default = if verbose { "rsgsea=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
                .compact(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.verbose);

    if args.gene_sets.is_empty() && args.gmt.is_none() {
        bail!("no gene sets given: pass --gene-set and/or --gmt");
    }

    if let Some(t) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(t)
            .build_global()?;
    }

    tracing::info!("Loading expression profile from {}", args.profile);
    let profile = read_expression_profile(&args.profile)?;
    tracing::info!("Loaded {} genes.", profile.len());

    tracing::info!("Loading correlations from {}", args.correlations);
    let correlations = read_correlation_table(&args.correlations)?;
    tracing::info!("Loaded correlations for {} genes.", correlations.len());

    let gene_sets = read_gene_sets(&args.gene_sets[..], args.gmt.as_deref().map(Path::new))?;
    tracing::info!("Scoring {} gene sets.", gene_sets.len());

    let start = Instant::now();
    let results = run_enrichment(
        &profile,
        &gene_sets,
        &correlations,
        args.min_size,
        args.max_size,
    );
    tracing::info!(
        "Scored {} gene sets in {:.2?}",
        results.len(),
        start.elapsed()
    );

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    match args.format {
        OutputFormat::Tsv => write_tsv(&mut out, &results)?,
        OutputFormat::Json => write_json(&mut out, &results)?,
    }
    out.flush()?;

    Ok(())
}
