use clap::{ArgAction, Parser, Subcommand};
use fibexport::{Algorithm, DriverConfig, DriverOverrides, FibError, ACTIVE, LIBRARY_NAME};
use log::LevelFilter;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "fibdriver")]
#[command(about = "Calls the Fibonacci library in a paced loop")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// TOML file with driver settings; flags override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Shared library exporting `fib`, `printFib` and `version`
    #[arg(short, long, conflicts_with = "algorithm")]
    library: Option<PathBuf>,

    /// Use the in-process engine with this algorithm
    #[arg(short, long, value_enum)]
    algorithm: Option<CliAlgorithm>,

    #[arg(long)]
    start: Option<i64>,

    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Added to each input for the `printFib` call
    #[arg(long)]
    offset: Option<i64>,

    #[arg(long)]
    delay_ms: Option<u64>,

    /// Print the library info line after each iteration
    #[arg(long)]
    show_info: bool,

    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the driver loop (default command)
    #[command(alias = "r")]
    Run,

    /// List the algorithm variants
    Info,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum CliAlgorithm {
    Recursive,
    Table,
    Iterative,
    Matrix,
}

impl From<CliAlgorithm> for Algorithm {
    fn from(algorithm: CliAlgorithm) -> Self {
        match algorithm {
            CliAlgorithm::Recursive => Algorithm::Recursive,
            CliAlgorithm::Table => Algorithm::Table,
            CliAlgorithm::Iterative => Algorithm::Iterative,
            CliAlgorithm::Matrix => Algorithm::Matrix,
        }
    }
}

fn verbosity_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

// RUST_LOG is parsed after the `-v` level, so it wins.
fn init_logging(verbose: u8) {
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity_level(verbose))
        .parse_env("RUST_LOG")
        .init();
}

fn load_config(cli: &Cli) -> fibexport::Result<DriverConfig> {
    let mut config = match &cli.config {
        Some(path) => DriverConfig::from_file(path)?,
        None => DriverConfig::default(),
    };

    config.apply_overrides(DriverOverrides {
        library: cli.library.clone(),
        algorithm: cli.algorithm.map(Algorithm::from),
        start: cli.start,
        count: cli.count,
        offset: cli.offset,
        delay_ms: cli.delay_ms,
        show_info: cli.show_info,
    })?;
    Ok(config)
}

fn run(cli: &Cli) -> fibexport::Result<()> {
    let config = load_config(cli)?;
    log::debug!("driver config: {:?}", config);

    let backend = fibexport::open_backend(&config)?;
    let stdout = io::stdout();
    fibexport::run(backend.as_ref(), &config, &mut stdout.lock())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Some(Commands::Info) => {
            println!("{} v{}", LIBRARY_NAME, env!("CARGO_PKG_VERSION"));
            println!("Exported variant: {} (v{})", ACTIVE, ACTIVE.version());
            println!();
            println!("Variants:");
            for algorithm in Algorithm::ALL {
                println!(
                    "  v{}  {:<10} {}",
                    algorithm.version(),
                    algorithm.name(),
                    algorithm.complexity()
                );
            }
        }
        Some(Commands::Run) | None => {
            if let Err(e) = run(&cli) {
                match &e {
                    FibError::TomlParse(parse_err) => {
                        eprintln!("❌ Invalid config file:");
                        eprintln!("   {parse_err}");
                    }
                    _ => eprintln!("❌ {e}"),
                }
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_level() {
        assert_eq!(verbosity_level(0), LevelFilter::Warn);
        assert_eq!(verbosity_level(1), LevelFilter::Info);
        assert_eq!(verbosity_level(2), LevelFilter::Debug);
        assert_eq!(verbosity_level(7), LevelFilter::Trace);
    }

    #[test]
    fn test_algorithm_flag_overrides_default_config() {
        let cli = Cli::parse_from(["fibdriver", "--algorithm", "matrix", "--delay-ms", "0"]);
        let config = load_config(&cli).unwrap();
        assert_eq!(config.algorithm, Some(Algorithm::Matrix));
        assert_eq!(config.delay_ms, 0);
        assert_eq!(config.count, 3);
    }
}
