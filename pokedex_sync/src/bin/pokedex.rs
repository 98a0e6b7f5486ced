use anyhow::Result;
use clap::{Parser, Subcommand};
use pokeapi_client::pokeapi::PokeApiClient;
use pokedex_sync::{
    config::Settings,
    db, ingest,
    server::{self, AppState},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(version, about = "Pokédex catalog service")]
struct Cli {
    /// Settings file (TOML); defaults apply when the file is absent.
    #[arg(long, value_name = "FILE", default_value = "pokedex.toml")]
    config: String,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Apply pending schema migrations and exit.
    Migrate,
    /// Pull the upstream catalog into the local store.
    Ingest {
        /// Listing pages to walk (overrides the settings file).
        #[arg(long)]
        pages: Option<u32>,
    },
    /// Serve the catalog API.
    Serve {
        /// Listen port (overrides the settings file).
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let cli = Cli::parse();
    let settings = Settings::load(&cli.config)?;
    let database_url = settings.database_url();

    match cli.cmd {
        Cmd::Migrate => db::migrate::run(&database_url)?,
        Cmd::Ingest { pages } => {
            db::migrate::run(&database_url)?;
            let mut conn = db::connection::connect_sqlite(&database_url)?;

            let source = PokeApiClient::with_base_url(
                &settings.source.base_url,
                settings.requests_per_second()?,
            );
            let mut options = settings.ingest_options();
            if let Some(pages) = pages {
                options.max_pages = pages;
            }

            let report = ingest::ingest(&source, &mut conn, &options).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Cmd::Serve { port } => {
            db::migrate::run(&database_url)?;
            let conn = db::connection::connect_sqlite(&database_url)?;
            let state = AppState::new(conn);
            server::run(state, port.unwrap_or(settings.server.port)).await?;
        }
    }

    Ok(())
}
