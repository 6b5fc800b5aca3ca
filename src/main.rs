use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trainpulse::{api, db};

#[derive(Parser)]
#[command(name = "trainpulse")]
#[command(about = "Trainer-performance feedback service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the TrainPulse server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Populate the database with demo accounts and sample sessions
    Seed,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "trainpulse=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16) -> anyhow::Result<()> {
    let db = db::Database::open_default()?;
    db.migrate()?;

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("TrainPulse server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port }) => {
            serve(port).await?;
        }
        Some(Commands::Seed) => {
            let db = db::Database::open_default()?;
            db.migrate()?;
            db.seed_demo_data()?;
            tracing::info!("Demo data seeded");
        }
        None => {
            // Default: start server on the default port
            serve(3000).await?;
        }
    }

    Ok(())
}
