//! Cadenza command line.
//!
//! ```text
//! cadenza routes --root <dir> [--json]     print the resolved route table
//! cadenza serve  --root <dir> [--bind ..]  serve a manifest-based application
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use cadenza::config::load_app_config;
use cadenza::observability::{logging, metrics};
use cadenza::{Application, Shutdown};

#[derive(Parser)]
#[command(name = "cadenza")]
#[command(about = "Convention-based routing for web applications", long_about = None)]
struct Cli {
    /// Application root (the directory holding `app/`).
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the controller tree and print the route table
    Routes {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Resolve the controller tree and serve it
    Serve {
        /// Override `server.bind_address`
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_app_config(&cli.root)?;
    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        root = %cli.root.display(),
        "cadenza starting"
    );

    match cli.command {
        Commands::Routes { json } => {
            let app = Application::builder(&cli.root).config(config).build()?;
            if json {
                let rows: Vec<_> = app
                    .routes()
                    .bindings()
                    .iter()
                    .map(|binding| {
                        serde_json::json!({
                            "verb": binding.verb.as_str(),
                            "pattern": binding.url_pattern,
                            "kind": binding.kind.to_string(),
                            "controller": binding.controller,
                            "view": binding.view,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", app.routes());
            }
        }
        Commands::Serve { bind } => {
            if config.observability.metrics_enabled {
                match config.observability.metrics_address.parse() {
                    Ok(addr) => metrics::init_metrics(addr),
                    Err(_) => tracing::error!(
                        metrics_address = %config.observability.metrics_address,
                        "Failed to parse metrics address"
                    ),
                }
            }

            let app = Application::builder(&cli.root).config(config).build()?;
            let listener = app.bind(bind.as_deref()).await?;

            let shutdown = Shutdown::new();
            let receiver = shutdown.subscribe();
            shutdown.trigger_on_ctrl_c();

            app.serve(listener, receiver).await?;
            tracing::info!("Shutdown complete");
        }
    }

    Ok(())
}
