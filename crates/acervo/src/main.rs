//! Acervo - entry point.
//!
//! Wires configuration, the theme directory, the contract-derived router,
//! and the generated documentation into a running server.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use tracing::{error, info};

use acervo_core::{api_contract, CollectionStore, ThemeDirectory, ThemeStrategy};
use acervo_docs::{generic_item_schema, OpenApiGenerator, SwaggerUi};
use acervo_server::{AppState, Router, Server, ServerConfig};
use acervo_telemetry::{init_logging, LogConfig};

/// Environment variable naming an optional theme directory JSON file.
const ENV_THEMES: &str = "ACERVO_THEMES";

/// Environment variable selecting the theme resolution strategy.
const ENV_THEME_STRATEGY: &str = "ACERVO_THEME_STRATEGY";

/// Path the Swagger UI is served under.
const DOCS_PATH: &str = "/api-docs";

/// Command-line arguments.
struct Args {
    /// Path to a theme directory JSON file.
    themes: Option<PathBuf>,
}

impl Args {
    fn parse() -> Self {
        let mut args = std::env::args().skip(1);
        let mut themes = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--themes" | "-t" => {
                    themes = args.next().map(PathBuf::from);
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("acervo {}", acervo::VERSION);
                    std::process::exit(0);
                }
                other => {
                    eprintln!("Unknown argument: {other}");
                    eprintln!("Use --help for usage information");
                    std::process::exit(1);
                }
            }
        }

        Self { themes }
    }
}

fn print_help() {
    println!(
        r"Acervo - generic RM-keyed collection API

USAGE:
    acervo [OPTIONS]

OPTIONS:
    -t, --themes <PATH>    Path to a theme directory JSON file
    -h, --help             Print help information
    -v, --version          Print version information

ENVIRONMENT VARIABLES:
    PORT                   Listen port (default: 3000)
    HOST                   Listen address (default: 0.0.0.0)
    ACERVO_THEMES          Theme directory JSON file (same as --themes)
    ACERVO_THEME_STRATEGY  Theme lookup strategy: membership or modulo
                           (default: membership)
    ACERVO_LOG             Log filter (default: info)
    ACERVO_LOG_FORMAT      Log format: json or pretty (default: json)

EXAMPLES:
    # Run on a custom port with the built-in themes
    PORT=8080 acervo

    # Run with a theme file and human-readable logs
    ACERVO_LOG_FORMAT=pretty acervo --themes themes.json
"
    );
}

/// Loads the theme directory from the configured file, or falls back to the
/// built-in one.
fn load_themes(args: &Args) -> anyhow::Result<ThemeDirectory> {
    let strategy = match std::env::var(ENV_THEME_STRATEGY) {
        Ok(raw) => raw
            .parse::<ThemeStrategy>()
            .with_context(|| format!("Invalid {ENV_THEME_STRATEGY} value '{raw}'"))?,
        Err(_) => ThemeStrategy::default(),
    };

    let path = args
        .themes
        .clone()
        .or_else(|| std::env::var(ENV_THEMES).ok().map(PathBuf::from));

    match path {
        Some(path) => ThemeDirectory::from_path(strategy, &path)
            .with_context(|| format!("Failed to load theme directory from {}", path.display())),
        None => Ok(ThemeDirectory::builtin(strategy)),
    }
}

fn build_server(args: &Args) -> anyhow::Result<Server> {
    let config = ServerConfig::from_env();

    let themes = load_themes(args)?;
    info!(
        "Theme directory: {} themes, {:?} strategy",
        themes.themes().len(),
        themes.strategy()
    );

    let contract = api_contract();
    let router = Router::from_contract(&contract);
    let state = AppState::new(CollectionStore::new(), Arc::new(themes));

    let spec = OpenApiGenerator::new()
        .schema("GenericItem", generic_item_schema())
        .generate(&contract)
        .context("Failed to generate the OpenAPI document")?;
    let swagger = SwaggerUi::new(DOCS_PATH, &spec).context("Failed to render the Swagger UI")?;

    info!(
        "Serving {} routes from contract '{}'",
        router.route_count(),
        contract.name()
    );
    info!("Swagger UI at http://{}{}", config.http_addr(), swagger.path());

    Ok(Server::builder()
        .config(config)
        .router(router)
        .state(state)
        .service_name("acervo")
        .service_version(acervo::VERSION)
        .docs(
            swagger.path(),
            swagger.html_bytes(),
            Bytes::from(swagger.spec_json().to_owned()),
        )
        .build())
}

#[tokio::main]
async fn main() {
    if let Err(error) = init_logging(&LogConfig::from_env()) {
        eprintln!("Failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let args = Args::parse();

    info!("Starting acervo v{}", acervo::VERSION);

    let server = match build_server(&args) {
        Ok(server) => server,
        Err(error) => {
            error!("Failed to start: {:#}", error);
            std::process::exit(1);
        }
    };

    if let Err(error) = server.run().await {
        error!("Server error: {}", error);
        std::process::exit(1);
    }
}
