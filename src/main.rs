use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kanri::board::db::BoardDb;
use kanri::board::server::{ServerConfig, start_server};

#[derive(Parser)]
#[command(name = "kanri")]
#[command(version, about = "Status-driven task board server")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the board server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "KANRI_PORT", default_value = "4400")]
        port: u16,

        /// Path to the SQLite database
        #[arg(long, env = "KANRI_DB", default_value = "kanri.db")]
        db: PathBuf,

        /// Open the board in a browser once the server is up
        #[arg(long)]
        open: bool,

        /// Bind on all interfaces and allow any CORS origin
        #[arg(long)]
        dev: bool,
    },
    /// Create or migrate the database and exit
    InitDb {
        /// Path to the SQLite database
        #[arg(long, env = "KANRI_DB", default_value = "kanri.db")]
        db: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "kanri=debug" } else { "kanri=info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Serve {
            port,
            db,
            open,
            dev,
        } => {
            // Spawn the browser open before the server starts (which blocks).
            if open && !dev {
                let url = format!("http://localhost:{}", port);
                tokio::spawn(async move {
                    // Small delay to let the server start binding.
                    tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
                    if let Err(e) = open::that(&url) {
                        tracing::warn!(error = %e, "failed to open browser");
                    }
                });
            }

            start_server(ServerConfig {
                port,
                db_path: db,
                dev_mode: dev,
            })
            .await?;
        }
        Commands::InitDb { db } => {
            if let Some(parent) = db.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            BoardDb::new(&db)?;
            println!("Board database initialized at {}", db.display());
        }
    }

    Ok(())
}
