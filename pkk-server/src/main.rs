//! Point d'entrée CLI pour pkk-server

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

use pkk_server::config::Config;
use pkk_server::server::{router, AppState};
use pkk_server::webmap::StaticWebMaps;

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

/// Passerelle d'enrichissement cadastral pour une API feature web-GIS
#[derive(Parser)]
#[command(name = "pkk-server")]
#[command(author, version)]
#[command(about = "Passerelle de recherche et d'enrichissement cadastral (registre Rosreestr)")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Adresse d'écoute (défaut : env PKK_LISTEN / 127.0.0.1:8080)
    #[arg(long)]
    listen: Option<std::net::SocketAddr>,

    /// Adresse du service de registre (défaut : env PKK_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Timeout des appels au registre, en secondes (défaut : env PKK_TIMEOUT / 10.0)
    #[arg(long)]
    timeout: Option<f64>,

    /// Identifiant de la carte de base pour la prévisualisation
    #[arg(long)]
    base_map: Option<i64>,

    /// URL du service de rendu d'images
    #[arg(long)]
    render_url: Option<String>,

    /// Catalogue JSON des cartes web
    #[arg(long)]
    webmaps: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    // Valider les tables de codes embarquées avant de servir
    rosreestr::codes::validate().context("Embedded code tables are invalid")?;

    let mut config = Config::from_env();
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout = timeout;
    }
    if let Some(base_map) = cli.base_map {
        config.base_map = Some(base_map);
    }
    if let Some(render_url) = cli.render_url {
        config.render_url = render_url;
    }
    if let Some(webmaps) = cli.webmaps {
        config.webmaps = Some(webmaps);
    }

    let webmaps = match &config.webmaps {
        Some(path) => StaticWebMaps::from_file(path)?,
        None => StaticWebMaps::empty(),
    };

    let listen = config.listen;
    info!(listen = %listen, registry = %config.registry_host(), "Starting pkk-server");

    let state = AppState::new(config, webmaps)?;
    axum::Server::bind(&listen)
        .serve(router(state).into_make_service())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
