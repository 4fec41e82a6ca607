use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
    process::ExitCode,
    time::Instant,
};

use clap::Parser;
use rulegen::{
    BOOTSTRAP, bootstrapped_context,
    config::{DEFAULT_PARALLEL_THRESHOLD, EngineConfig, Workers},
    error::Error,
    interpreter::parser::statement::parse_program,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// rulegen generates large batches of randomized text from a grammar file.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Grammar file to run.
    input: PathBuf,

    /// File to write generated lines to, instead of standard output.
    output: Option<PathBuf>,

    /// Generate values without writing any output.
    #[arg(short = 'g', long)]
    no_output: bool,

    /// Report the elapsed generation time on standard error.
    #[arg(short, long)]
    time: bool,

    /// Number of worker threads for large print statements (0 = one per
    /// core).
    #[arg(short, long, default_value_t = 0)]
    processes: usize,

    /// Minimum print count that is split across workers.
    #[arg(long, default_value_t = DEFAULT_PARALLEL_THRESHOLD)]
    threshold: usize,

    /// Seed for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Grammar file to load instead of the built-in standard rules.
    #[arg(short, long, conflicts_with = "no_bootstrap")]
    bootstrap: Option<PathBuf>,

    /// Do not load any standard rules.
    #[arg(long)]
    no_bootstrap: bool,

    /// Report a failing statement and continue with the next one.
    #[arg(short, long)]
    keep_going: bool,
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io { path: path.display().to_string(),
                                                          source })
}

fn open_output(path: Option<&Path>) -> Result<BufWriter<Box<dyn Write>>, Error> {
    let sink: Box<dyn Write> = match path {
        Some(path) => Box::new(File::create(path).map_err(|source| Error::Io { path: path.display().to_string(),
                                                                               source })?),
        None => Box::new(io::stdout().lock()),
    };
    Ok(BufWriter::new(sink))
}

fn run(args: &Args) -> Result<bool, Error> {
    let source = read(&args.input)?;
    let program = parse_program(&source)?;

    let bootstrap = match (&args.bootstrap, args.no_bootstrap) {
        (_, true) => None,
        (Some(path), false) => Some(read(path)?),
        (None, false) => Some(BOOTSTRAP.to_string()),
    };

    let config = EngineConfig { workers:            Workers::from_count(args.processes),
                                materialize:        !args.no_output,
                                parallel_threshold: args.threshold,
                                seed:               args.seed, };
    let mut context = bootstrapped_context(config, bootstrap.as_deref());
    let mut out = open_output(args.output.as_deref())?;
    let output_path = args.output.as_ref().map_or_else(|| "<stdout>".to_string(), |p| p.display().to_string());

    let start = Instant::now();
    let mut lines = 0usize;
    let mut failed = false;

    for statement in &program {
        match context.process_statement(statement) {
            Ok(Some(generated)) => {
                lines += generated.len();
                for line in generated {
                    writeln!(out, "{line}").map_err(|source| Error::Io { path: output_path.clone(),
                                                                         source })?;
                }
            },
            Ok(None) => {},
            Err(e) => {
                eprintln!("{e}");
                failed = true;
                if !args.keep_going {
                    break;
                }
            },
        }
    }

    out.flush().map_err(|source| Error::Io { path: output_path.clone(),
                                             source })?;

    let elapsed = start.elapsed();
    info!(lines, ?elapsed, "generation finished");
    if args.time {
        eprintln!("Generated {lines} lines in {:.3}s", elapsed.as_secs_f64());
    }

    Ok(!failed)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter)
                             .with_writer(io::stderr)
                             .init();

    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}
