//! Command-line driver for the Deutsch-Jozsa and Shor pipelines.
//!
//! Runs both algorithms against the in-process state-vector simulator:
//!
//! ```text
//! quantum-cli deutsch-jozsa --qubits 3 --oracle custom --bitstring 01101001
//! quantum-cli shor --modulus 15 --seed 7
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quantum_algos::{
    BaseSource, Config, DeutschJozsa, OracleKind, OracleSpec, RandomBases, ShorsAlgorithm,
    StateVectorSimulator, validate_oracle,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quantum-cli")]
#[command(version)]
#[command(about = "Deutsch-Jozsa classification and Shor factoring on a simulator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to a JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "warn")]
    log_level: String,

    /// Seed for the simulator and every random choice
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an oracle as constant or balanced
    DeutschJozsa {
        /// Number of input qubits
        #[arg(short = 'n', long, default_value_t = 3)]
        qubits: u32,

        /// Oracle type: constant, balanced or custom
        #[arg(short, long, default_value = "balanced")]
        oracle: OracleKind,

        /// Output of a constant oracle (0 or 1)
        #[arg(long, default_value_t = 0)]
        constant_value: u8,

        /// Truth table of a custom oracle; a random balanced one when omitted
        #[arg(short, long)]
        bitstring: Option<String>,

        /// Overrides the configured shot count
        #[arg(short, long)]
        shots: Option<u32>,

        /// Print the circuit as OpenQASM 3
        #[arg(long)]
        show_circuit: bool,
    },

    /// Factor an integer with Shor's algorithm
    Shor {
        /// Integer to factor
        #[arg(short = 'N', long)]
        modulus: u64,

        /// Overrides the configured shot count
        #[arg(short, long)]
        shots: Option<u32>,

        /// Overrides the configured attempt ceiling
        #[arg(long)]
        max_attempts: Option<u32>,

        /// Retry when the circuit only yields (1, N)
        #[arg(long)]
        reject_trivial: bool,
    },
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text = std::fs::read_to_string(path)?;
    Ok(Config::from_json_str(&text)?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .init();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.simulator.seed = cli.seed;
    }
    let backend = StateVectorSimulator::new(&config.simulator)?;
    info!(seed = ?config.simulator.seed, "simulator ready");

    match cli.command {
        Commands::DeutschJozsa {
            qubits,
            oracle,
            constant_value,
            bitstring,
            shots,
            show_circuit,
        } => {
            let mut dj_config = config.deutsch_jozsa;
            if let Some(shots) = shots {
                dj_config.shots = shots;
            }
            let mut rng = match cli.seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let spec = OracleSpec::resolve(
                qubits,
                oracle,
                constant_value,
                bitstring.as_deref(),
                &mut rng,
            )?;

            println!("Configured oracle: {oracle}");
            println!("Actual oracle behavior: {}", validate_oracle(&spec));

            let dj = DeutschJozsa::new(qubits, spec, dj_config)?;
            println!(
                "\nRunning Deutsch-Jozsa algorithm with {qubits} qubits, {} shots...",
                dj.shots()
            );
            let class = dj.classify(&backend).await?;
            println!("The oracle function was classified as: {class}");

            if show_circuit {
                println!("\nQuantum circuit:\n{}", dj.circuit()?);
            }
        }
        Commands::Shor {
            modulus,
            shots,
            max_attempts,
            reject_trivial,
        } => {
            let mut shor_config = config.shor;
            if let Some(shots) = shots {
                shor_config.shots = shots;
            }
            if let Some(max_attempts) = max_attempts {
                shor_config.max_attempts = max_attempts;
            }
            if reject_trivial {
                shor_config.reject_trivial_factors = true;
            }
            let mut bases: Box<dyn BaseSource> = match cli.seed {
                Some(seed) => Box::new(RandomBases::seeded(seed)),
                None => Box::new(RandomBases::from_entropy()),
            };

            let shor = ShorsAlgorithm::new(modulus, shor_config)?;
            println!(
                "Finding factors of {modulus} with {} shots per attempt...",
                shor.config().shots
            );
            let pair = shor.factor(&backend, bases.as_mut()).await?;
            println!("The factors of {modulus} are: {pair}");
        }
    }

    Ok(())
}
