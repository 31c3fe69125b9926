use anyhow::Context;
use carousel::{Bundle, DataSource, SpinConfig};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::PathBuf;
use whatoeat::config::{self, Config};
use whatoeat::events::{AppEvent, AppOutput};
use whatoeat::gui::{AppInit, AppModel, LogRenderer, TextRenderer};
use whatoeat::sys::{input, runtime};

#[derive(Parser, Debug)]
#[command(name = "whatoeat", version, about = "Can't decide where to eat? Spin for it.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Store list to use (information, back_door, supper_street)
    #[arg(short = 's', long, global = true)]
    source: Option<DataSource>,

    /// Directory holding the bundled store lists
    #[arg(short = 'd', long, global = true)]
    data_dir: Option<PathBuf>,

    /// Seed for reproducible spins
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Short fixed-step spins instead of the slow roulette
    #[arg(long, global = true)]
    classic: bool,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Spin the deck and print where to eat (default)
    Spin {
        /// Number of spins
        #[arg(short = 'n', long, default_value_t = 1)]
        count: u32,
    },
    /// Print every store in the list
    List,
    /// Browse interactively, reading commands from stdin
    Run,
    /// Write the default config file and print its path
    Init,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = config::load_or_default();
    if let Some(source) = cli.source {
        config.source = source;
    }
    if cli.data_dir.is_some() {
        config.data_dir = cli.data_dir.clone();
    }
    let spin = if cli.classic {
        SpinConfig::classic()
    } else {
        config.spin_config()
    };

    match cli.command.clone().unwrap_or(Commands::Spin { count: 1 }) {
        Commands::Spin { count } => spin_deck(&config, spin, cli.seed, count),
        Commands::List => {
            let bundle = Bundle::discover(config.data_dir.clone());
            let stores = bundle
                .load(config.source)
                .with_context(|| format!("Could not load the {} store list", config.source))?;
            for store in stores {
                println!("{}\t{}", store.name, store.description);
            }
            Ok(())
        }
        Commands::Run => browse(&config, spin, cli.seed),
        Commands::Init => {
            let path = config::write_default_config()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create Tokio runtime")
}

fn spin_deck(config: &Config, spin: SpinConfig, seed: Option<u64>, count: u32) -> anyhow::Result<()> {
    let (tx, rx) = async_channel::unbounded();
    let (out_tx, out_rx) = async_channel::unbounded();

    let rt = build_runtime()?;
    rt.block_on(async {
        let model = AppModel::new(
            AppInit {
                bundle: Bundle::discover(config.data_dir.clone()),
                source: config.source,
                spin,
                rng: rng_from(seed),
                tx: tx.clone(),
                output: Some(out_tx),
            },
            LogRenderer,
        );

        if model.selector().list().is_empty() {
            anyhow::bail!(
                "No stores loaded for '{}'. Is the data directory set up?",
                config.source
            );
        }

        let driver = async {
            for _ in 0..count {
                tx.send(AppEvent::Spin).await?;
                loop {
                    match out_rx.recv().await? {
                        AppOutput::Settled(store) => {
                            println!("{}\t{}", store.name, store.description);
                            break;
                        }
                        AppOutput::Loaded { .. } => {}
                    }
                }
            }
            anyhow::Ok(())
        };
        let printer = async {
            let result = driver.await;
            let _ = tx.send(AppEvent::Quit).await;
            result
        };

        let (_, result) = tokio::join!(model.run(rx), printer);
        result
    })
}

fn browse(config: &Config, spin: SpinConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let (tx, rx) = async_channel::unbounded();

    runtime::start_background_services(tx.clone());

    let rt = build_runtime()?;
    rt.block_on(async {
        let model = AppModel::new(
            AppInit {
                bundle: Bundle::discover(config.data_dir.clone()),
                source: config.source,
                spin,
                rng: rng_from(seed),
                tx: tx.clone(),
                output: None,
            },
            TextRenderer::new(std::io::stdout()),
        );

        let input = tokio::spawn(input::run_stdin(tx.clone()));
        model.run(rx).await;
        input.abort();
    });
    // Stdin reads sit on a blocking thread that would stall a normal drop.
    rt.shutdown_background();
    Ok(())
}
