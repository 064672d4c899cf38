use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agenda::client::HttpDataService;
use agenda::config::{ClientArgs, Config, DEFAULT_PORT};
use agenda::{api, render, seed};
use agenda_core::models::{Meeting, Note};
use agenda_core::view::Presentable;
use agenda_core::{DataService, Database, RecordStore, ViewMode};

#[derive(Parser)]
#[command(name = "agenda")]
#[command(about = "Notes and meetings over a REST data service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the mock data service
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(long, env = "AGENDA_DB")]
        db: Option<PathBuf>,

        /// Directory with notes.json / meetings.json to import on startup
        #[arg(long)]
        seed: Option<PathBuf>,
    },
    /// Check that the data service answers
    Status {
        #[command(flatten)]
        client: ClientArgs,
    },
    /// Print a collection the way the pages show it
    List {
        collection: Collection,

        /// Grid or list layout
        #[arg(long, default_value = "grid", value_parser = clap::value_parser!(ViewMode))]
        view: ViewMode,

        #[command(flatten)]
        client: ClientArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Collection {
    Notes,
    Meetings,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "agenda=debug,agenda_core=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve { port, db, seed }) => serve(port, db, seed).await?,
        Some(Commands::Status { client }) => {
            let config = Config::from_args(&client)?;
            let notes = HttpDataService::<Note>::new(&config)?;

            match notes.list().await {
                Ok(records) => println!(
                    "Data service at {} is up ({} notes)",
                    config.base_url,
                    records.len()
                ),
                Err(e) => anyhow::bail!("data service at {} is not answering: {}", config.base_url, e),
            }
        }
        Some(Commands::List {
            collection,
            view,
            client,
        }) => {
            let config = Config::from_args(&client)?;
            let page = match collection {
                Collection::Notes => load_page::<Note>(&config, view).await?,
                Collection::Meetings => load_page::<Meeting>(&config, view).await?,
            };
            print!("{}", page);
        }
        None => serve(DEFAULT_PORT, None, None).await?,
    }

    Ok(())
}

async fn serve(port: u16, db_path: Option<PathBuf>, seed_dir: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Starting Agenda data service on port {}", port);

    let db = match db_path {
        Some(path) => Database::open(path)?,
        None => Database::open_default()?,
    };
    db.migrate()?;

    if let Some(dir) = seed_dir {
        seed::seed_from_dir(&db, &dir)?;
    }

    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Agenda data service listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn load_page<R: Presentable>(config: &Config, view: ViewMode) -> anyhow::Result<String> {
    let service = HttpDataService::<R>::new(config)?;
    let mut store = RecordStore::<R>::new();
    store.load(&service).await;

    if let Some(banner) = store.banner() {
        eprintln!("{}", banner);
    }
    Ok(render::render_page(store.records(), view))
}
