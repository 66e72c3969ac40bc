use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use runes_rs::{
    Escaped, EngineConfig, FixedThreshold, Graph, Learner, LearnerConfig, PoissonSignificance,
    Reader, Scoring,
};

/// Reads a character stream, printing a guess for each next character while
/// learning symbols from it.
#[derive(Parser)]
#[command(name = "runes", version, about = "Online symbol learning over a character stream")]
struct Cli {
    /// Input file; reads stdin when omitted
    input: Option<PathBuf>,

    /// TOML engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Promotion policy, overriding the config file
    #[arg(long, value_enum)]
    learner: Option<LearnerKind>,

    /// Sightings needed by the fixed-threshold learner
    #[arg(long)]
    threshold: Option<u64>,

    /// Significance level of the poisson learner, in standard deviations
    #[arg(long)]
    sigma: Option<f64>,

    /// Minimum edge count before the poisson learner considers an edge
    #[arg(long)]
    floor: Option<u64>,

    /// How guesses are ranked
    #[arg(long, value_enum)]
    scoring: Option<ScoringArg>,

    /// Name of the symbol to start reading from
    #[arg(long)]
    start: Option<String>,

    /// Resume from a snapshot
    #[arg(long)]
    load: Option<PathBuf>,

    /// Write a snapshot when done
    #[arg(long)]
    save: Option<PathBuf>,

    /// Print the whole graph when done
    #[arg(long)]
    dump: bool,

    /// List learned symbols starting with this prefix when done
    #[arg(long)]
    prefix: Option<String>,

    /// Print the K most frequent symbols and transitions when done
    #[arg(long, value_name = "K")]
    top: Option<usize>,

    /// Do not echo guesses while reading
    #[arg(short, long)]
    quiet: bool,

    /// Enable verbose debug output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum LearnerKind {
    Never,
    Fixed,
    Poisson,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScoringArg {
    Count,
    LengthWeighted,
}

impl From<ScoringArg> for Scoring {
    fn from(arg: ScoringArg) -> Self {
        match arg {
            ScoringArg::Count => Scoring::Count,
            ScoringArg::LengthWeighted => Scoring::LengthWeighted,
        }
    }
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();
}

/// Resolves the engine configuration: defaults, then file, then flags.
fn resolve_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let kind = cli.learner.unwrap_or(match config.learner {
        LearnerConfig::Never => LearnerKind::Never,
        LearnerConfig::FixedThreshold { .. } => LearnerKind::Fixed,
        LearnerConfig::Poisson { .. } => LearnerKind::Poisson,
    });

    config.learner = match (kind, config.learner) {
        (LearnerKind::Never, _) => LearnerConfig::Never,
        (LearnerKind::Fixed, LearnerConfig::FixedThreshold { threshold }) => {
            LearnerConfig::FixedThreshold {
                threshold: cli.threshold.unwrap_or(threshold),
            }
        }
        (LearnerKind::Fixed, _) => LearnerConfig::FixedThreshold {
            threshold: cli.threshold.unwrap_or(FixedThreshold::default().0),
        },
        (LearnerKind::Poisson, LearnerConfig::Poisson { sigma, floor }) => LearnerConfig::Poisson {
            sigma: cli.sigma.unwrap_or(sigma),
            floor: cli.floor.unwrap_or(floor),
        },
        (LearnerKind::Poisson, _) => {
            let base = PoissonSignificance::default();
            LearnerConfig::Poisson {
                sigma: cli.sigma.unwrap_or(base.sigma),
                floor: cli.floor.unwrap_or(base.floor),
            }
        }
    };
    if let Some(scoring) = cli.scoring {
        config.scoring = scoring.into();
    }
    if let Some(start) = &cli.start {
        config.start = start.clone();
    }

    config.validate()?;
    Ok(config)
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    })
}

/// Feeds the input to the reader line by line, echoing a guess before each
/// character. Stops at end of input or at the first NUL.
fn run_stream<L: Learner>(
    reader: &mut Reader<'_, L>,
    mut input: impl BufRead,
    out: &mut impl Write,
    scoring: Scoring,
    quiet: bool,
) -> Result<u64> {
    let mut line = String::new();
    let mut read = 0u64;

    loop {
        line.clear();
        if input.read_line(&mut line).context("failed to read input")? == 0 {
            break;
        }
        for c in line.chars() {
            if c == '\0' {
                return Ok(read);
            }
            if !quiet {
                match reader.guess_with(scoring) {
                    Some(g) if !g.is_empty() => out.write_all(g.as_bytes())?,
                    _ => out.write_all(b"_")?,
                }
            }
            reader.advance(c);
            read += 1;
            if c == '\n' && !quiet {
                out.write_all(b"\n")?;
            }
        }
    }

    Ok(read)
}

fn report(cli: &Cli, graph: &Graph, out: &mut impl Write) -> Result<()> {
    if cli.dump {
        write!(out, "{}", graph.dump())?;
    }

    if let Some(prefix) = &cli.prefix {
        writeln!(out, "starts with {:?}:", prefix)?;
        for (name, id) in graph.starts_with(prefix) {
            writeln!(out, "{id}\t{}", Escaped(name))?;
        }
    }

    if let Some(k) = cli.top {
        writeln!(out, "top symbols:")?;
        for symbol in graph.top_symbols(k) {
            writeln!(
                out,
                "{}\t\"{}\"\t{}",
                symbol.id(),
                Escaped(symbol.name()),
                symbol.count()
            )?;
        }
        writeln!(out, "top transitions:")?;
        for (_, edge) in graph.top_edges(k) {
            writeln!(
                out,
                "\"{}\" -> \"{}\"\t{}",
                Escaped(graph.symbol(edge.from()).name()),
                Escaped(graph.symbol(edge.to()).name()),
                edge.count()
            )?;
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    tracing::debug!(?config, "resolved configuration");

    let mut graph = match &cli.load {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
            Graph::load(BufReader::new(file))
                .with_context(|| format!("failed to load snapshot {}", path.display()))?
        }
        None => Graph::new(),
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let input = open_input(cli.input.as_deref())?;
    let mut reader = Reader::with_start(&mut graph, config.learner.build(), &config.start);
    let read = run_stream(&mut reader, input, &mut out, config.scoring, cli.quiet)?;
    drop(reader);

    tracing::info!(
        chars = read,
        symbols = graph.len(),
        edges = graph.edge_count(),
        "finished reading"
    );

    report(&cli, &graph, &mut out)?;
    out.flush()?;

    if let Some(path) = &cli.save {
        let file =
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        graph
            .save(&mut writer)
            .with_context(|| format!("failed to save snapshot {}", path.display()))?;
        writer.flush()?;
    }

    Ok(())
}
