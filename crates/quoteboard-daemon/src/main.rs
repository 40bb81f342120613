//! `quoteboard` - command-line front-end and server for a quote board.
//!
//! One-shot commands operate on the board persisted under the data dir and
//! exit. `serve` exposes the board over HTTP/WebSocket and pulls from the
//! remote on a fixed interval until interrupted.

mod console;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use quoteboard_core::paths::default_data_dir;
use quoteboard_core::surface::RecordingSurface;
use quoteboard_core::sync::start_polling;
use quoteboard_core::transfer::DirectoryExchange;
use quoteboard_core::{CategoryFilter, QuoteboardConfig, QuoteboardContext};
use quoteboard_http::SharedState;

#[derive(Parser, Debug)]
#[command(name = "quoteboard")]
#[command(about = "Categorized quote collection with import/export and server sync")]
#[command(version)]
struct Cli {
    /// Directory holding config.json and local.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Show one random quote
    Show {
        /// Category to pick from ("all" for every category)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List quotes
    List {
        #[arg(short, long)]
        category: Option<String>,
    },

    /// List categories
    Categories,

    /// Add a quote
    Add { text: String, category: String },

    /// Export every quote as quotes.json
    Export {
        /// Target directory (defaults to the data dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Import quotes from a JSON file
    Import { file: PathBuf },

    /// Pull from the remote once
    Sync,

    /// Run the HTTP server with periodic sync
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        /// Serve static files from this directory
        #[arg(long)]
        static_dir: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn resolve_data_dir(cli: &Cli) -> Result<PathBuf, String> {
    match &cli.data_dir {
        Some(dir) => Ok(dir.clone()),
        None => default_data_dir(),
    }
}

fn load_config(cli: &Cli, data_dir: &std::path::Path) -> Result<QuoteboardConfig, String> {
    let result = match &cli.config {
        Some(path) => QuoteboardConfig::load(path),
        None => QuoteboardConfig::load_from_dir(data_dir),
    };
    result.map_err(|e| e.to_string())
}

async fn run(cli: Cli) -> Result<(), String> {
    let data_dir = resolve_data_dir(&cli)?;
    let mut config = load_config(&cli, &data_dir)?;
    log::debug!("Using data dir {}", data_dir.display());

    match cli.command {
        Commands::Serve {
            host,
            port,
            static_dir,
        } => {
            if let Some(host) = host {
                config.http_host = host;
            }
            if let Some(port) = port {
                config.http_port = port;
            }
            serve(data_dir, config, static_dir).await
        }
        command => run_once(data_dir, config, command).await,
    }
}

/// Run a one-shot command. `show` and `list` print what the board rendered;
/// notifications go to stderr.
async fn run_once(
    data_dir: PathBuf,
    config: QuoteboardConfig,
    command: Commands,
) -> Result<(), String> {
    let surface = Arc::new(RecordingSurface::new());
    let ctx = open(data_dir, config, surface.clone())?;
    let board = &ctx.board;
    let shows_content = matches!(command, Commands::Show { .. } | Commands::List { .. });

    let result = match command {
        Commands::Show { category } => select(&ctx, category).and_then(|_| {
            board.show_random_quote();
            board.unload().map_err(|e| e.to_string())
        }),
        Commands::List { category } => select(&ctx, category),
        Commands::Categories => {
            print!("{}", categories_listing(&ctx));
            Ok(())
        }
        Commands::Add { text, category } => board
            .add_quote(&text, &category)
            .map(|quote| println!("{}", console::format_quote(&quote)))
            .map_err(|e| e.to_string()),
        Commands::Export { out_dir } => {
            let exchange = match out_dir {
                Some(dir) => DirectoryExchange::new(dir),
                None => ctx.exchange(),
            };
            board
                .export_to(&exchange)
                .map(|path| println!("{}", path.display()))
                .map_err(|e| e.to_string())
        }
        Commands::Import { file } => {
            // Relative paths are taken from the working directory
            let exchange = DirectoryExchange::new(".");
            board
                .import_from(&exchange, &file)
                .map(|count| log::info!("{} quotes imported", count))
                .map_err(|e| e.to_string())
        }
        Commands::Sync => match ctx.reconciler.pull().await {
            Ok(Ok(report)) => {
                println!(
                    "{} added, {} already present",
                    report.added.len(),
                    report.skipped.len()
                );
                Ok(())
            }
            Ok(Err(e)) => Err(e.to_string()),
            Err(e) => Err(e.to_string()),
        },
        Commands::Serve { .. } => Err("serve is not a one-shot command".to_string()),
    };

    if let (true, Ok(()), Some(content)) = (shows_content, &result, surface.content()) {
        println!("{}", console::format_content(&content));
    }
    for message in surface.notifications() {
        eprintln!("{}", message);
    }
    result
}

/// Build a one-shot context with the last selected category already current.
fn open(
    data_dir: PathBuf,
    config: QuoteboardConfig,
    surface: Arc<RecordingSurface>,
) -> Result<QuoteboardContext, String> {
    let ctx = QuoteboardContext::builder()
        .data_dir(data_dir)
        .config(config)
        .surface(surface)
        .build()
        .map_err(|e| e.to_string())?;
    ctx.board.restore_selection().map_err(|e| e.to_string())?;
    Ok(ctx)
}

fn categories_listing(ctx: &QuoteboardContext) -> String {
    let selected = ctx.board.selected_category();
    console::format_options(&ctx.board.category_options(), selected.value())
}

/// Apply `--category`, or restore the last selection when absent.
fn select(ctx: &QuoteboardContext, category: Option<String>) -> Result<(), String> {
    let result = match category {
        Some(value) => ctx.board.filter_quotes(CategoryFilter::from_value(&value)),
        None => ctx.board.init(),
    };
    result.map(|_| ()).map_err(|e| e.to_string())
}

async fn serve(
    data_dir: PathBuf,
    config: QuoteboardConfig,
    static_dir: Option<String>,
) -> Result<(), String> {
    config.validate().map_err(|e| e.to_string())?;

    let ctx = QuoteboardContext::builder()
        .data_dir(data_dir)
        .config(config.clone())
        .build()
        .map_err(|e| e.to_string())?;
    ctx.board.init().map_err(|e| e.to_string())?;

    let state = Arc::new(SharedState::new(ctx.clone()));
    let mut server = quoteboard_http::start(
        state,
        config.http_host.clone(),
        config.http_port,
        static_dir,
    )?;
    let mut poller = start_polling(Arc::clone(&ctx.reconciler), config.poll_interval());

    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
    }
    log::info!("Shutting down");

    poller.stop().await;
    if let Err(e) = ctx.board.unload() {
        log::warn!("Failed to save last viewed quote: {}", e);
    }
    tokio::task::spawn_blocking(move || server.stop())
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("quoteboard").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn parses_add_with_positional_args() {
        let cli = parse(&["add", "Test quote", "TestCat"]);
        assert_eq!(
            cli.command,
            Commands::Add {
                text: "Test quote".into(),
                category: "TestCat".into()
            }
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["list", "--category", "Work", "--data-dir", "/tmp/qb"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/qb")));
        assert_eq!(
            cli.command,
            Commands::List {
                category: Some("Work".into())
            }
        );
    }

    #[test]
    fn serve_overrides_are_optional() {
        let cli = parse(&["serve", "--port", "9000"]);
        assert_eq!(
            cli.command,
            Commands::Serve {
                host: None,
                port: Some(9000),
                static_dir: None
            }
        );
    }

    #[test]
    fn add_requires_category() {
        assert!(Cli::try_parse_from(["quoteboard", "add", "only text"]).is_err());
    }

    #[test]
    fn explicit_config_path_wins() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        std::fs::write(&path, r#"{"httpPort": 8123}"#).unwrap();
        let cli = parse(&["--config", path.to_str().unwrap(), "sync"]);

        let config = load_config(&cli, dir.path()).unwrap();

        assert_eq!(config.http_port, 8123);
    }

    #[tokio::test]
    async fn add_persists_under_data_dir() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        run(parse(&["--data-dir", data_dir, "add", "From CLI", "Cli"]))
            .await
            .unwrap();

        let ctx = QuoteboardContext::builder()
            .data_dir(dir.path().to_path_buf())
            .build()
            .unwrap();
        assert_eq!(ctx.board.len(), 9);
    }

    #[tokio::test]
    async fn blank_add_fails() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();

        let result = run(parse(&["--data-dir", data_dir, "add", " ", "Cli"])).await;

        assert_eq!(
            result.unwrap_err(),
            "Please enter a quote text and provide its category."
        );
    }

    #[tokio::test]
    async fn export_writes_quotes_json() {
        let dir = tempdir().unwrap();
        let out = tempdir().unwrap();

        run(parse(&[
            "--data-dir",
            dir.path().to_str().unwrap(),
            "export",
            "--out-dir",
            out.path().to_str().unwrap(),
        ]))
        .await
        .unwrap();

        assert!(out.path().join("quotes.json").exists());
    }

    #[tokio::test]
    async fn later_runs_restore_the_selected_category() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().to_str().unwrap();
        run(parse(&["--data-dir", data_dir, "list", "--category", "Work"]))
            .await
            .unwrap();

        let ctx = open(
            dir.path().to_path_buf(),
            QuoteboardConfig::default(),
            Arc::new(RecordingSurface::new()),
        )
        .unwrap();

        let listing = categories_listing(&ctx);
        assert!(listing.contains("* Work\n"));
        assert!(listing.starts_with("  All Categories\n"));
        for _ in 0..10 {
            let quote = ctx.board.show_random_quote().unwrap();
            assert_eq!(quote.category, "Work");
        }
    }
}
