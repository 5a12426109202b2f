use anyhow::{anyhow, Result};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::{Path, PathBuf};

use boot_trees::boot::{self, BootOpt};
use boot_trees::msa;
use boot_trees::tree::{FastTree, InferConfig, NeighborJoining, TreeBuilder};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Tree inference engine
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Engine {
    /// External FastTree program
    Fasttree,
    /// Built-in neighbor joining (Jukes-Cantor distances)
    Nj,
}

#[derive(Parser, Debug)]
#[command(
    name = "boot-trees",
    author,
    version,
    about = "Make individual bootstrap trees from a DNA alignment",
    long_about = "FastTree only writes bootstrap support onto the final tree. This tool \
                  resamples alignment columns itself, infers one tree per replicate with \
                  the engine's own bootstrap turned off, and writes every bootstrap tree \
                  to stdout in Newick format.",
    arg_required_else_help = true
)]
struct Cli {
    /// Alignment in FASTA format (DNA)
    alignment: PathBuf,
    /// Number of bootstrap replicates
    #[arg(short = 'b', value_name = "B", default_value_t = 100)]
    replicates: usize,
    /// Number of parallel workers
    #[arg(short = 'p', value_name = "P", default_value_t = 1, value_parser = parse_workers)]
    threads: usize,
    /// Turn off parallel processing (replicates run one at a time, in order)
    #[arg(long)]
    debug: bool,
    /// Base random seed; replicate i uses seed + i
    #[arg(long)]
    seed: Option<u64>,
    /// Tree inference engine
    #[arg(long, value_enum, default_value_t = Engine::Fasttree)]
    engine: Engine,
    /// FastTree executable (default: $FASTTREE_BIN or `FastTree` on PATH)
    #[arg(long = "fasttree", value_name = "PATH")]
    fasttree: Option<PathBuf>,
    /// Extra argument passed to FastTree (repeatable)
    #[arg(long = "fasttree-arg", value_name = "ARG", allow_hyphen_values = true)]
    fasttree_args: Vec<String>,
    /// Output path (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
    /// Parent directory for the scratch directory
    #[arg(long = "tmp-dir", value_name = "DIR")]
    tmp_dir: Option<PathBuf>,
    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("Invalid worker count: {}", s))?;
    if n == 0 {
        return Err("worker count must be at least 1".to_string());
    }
    Ok(n)
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => log::LevelFilter::Error,
        (false, 0) => log::LevelFilter::Info,
        (false, 1) => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    // RUST_LOG, when set, takes precedence over -v/-q
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let builder: Box<dyn TreeBuilder> = match cli.engine {
        Engine::Fasttree => {
            let ft = FastTree::new(cli.fasttree.clone());
            log::debug!("using FastTree at '{}'", ft.program().display());
            Box::new(ft)
        }
        Engine::Nj => {
            if cli.fasttree.is_some() || !cli.fasttree_args.is_empty() {
                log::warn!("--fasttree options are ignored with --engine nj");
            }
            Box::new(NeighborJoining)
        }
    };

    let cfg = InferConfig {
        extra_args: cli.fasttree_args.clone(),
        ..InferConfig::default()
    };
    let opt = BootOpt {
        replicates: cli.replicates,
        threads: cli.threads,
        sequential: cli.debug,
        seed: cli.seed,
        tmp_dir: cli.tmp_dir.clone(),
    };

    run(&cli, builder.as_ref(), &cfg, &opt)
}

fn run(cli: &Cli, builder: &dyn TreeBuilder, cfg: &InferConfig, opt: &BootOpt) -> Result<()> {
    let aln = msa::load_alignment(&cli.alignment)?;

    let n = match &cli.out {
        Some(p) => write_output_file(p, &aln, builder, cfg, opt)?,
        None => {
            let mut out = std::io::BufWriter::new(std::io::stdout().lock());
            boot::bootstrap_trees(&aln, builder, cfg, opt, &mut out)?
        }
    };
    log::info!("wrote {} bootstrap trees", n);
    Ok(())
}

/// Trees go to a temporary file next to `dest`, renamed over it only after
/// every replicate succeeded; a failed run leaves `dest` untouched.
fn write_output_file(
    dest: &Path,
    aln: &msa::Alignment,
    builder: &dyn TreeBuilder,
    cfg: &InferConfig,
    opt: &BootOpt,
) -> Result<usize> {
    let parent = dest
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let tmp = tempfile::Builder::new()
        .prefix(".boot-trees.")
        .tempfile_in(parent)
        .map_err(|e| anyhow!("cannot create output '{}': {}", dest.display(), e))?;

    let mut out = std::io::BufWriter::new(tmp);
    let n = boot::bootstrap_trees(aln, builder, cfg, opt, &mut out)?;
    let tmp = out
        .into_inner()
        .map_err(|e| anyhow!("cannot write output '{}': {}", dest.display(), e.error()))?;
    tmp.persist(dest)
        .map_err(|e| anyhow!("cannot write output '{}': {}", dest.display(), e.error))?;
    Ok(n)
}
