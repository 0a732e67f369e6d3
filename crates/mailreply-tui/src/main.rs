use std::path::PathBuf;
use std::sync::Arc;
use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use mailreply_core::{Config, HttpReplyClient, ReplyRequestController, SystemClipboard, Tone};

mod app;
mod generate;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "mailreply")]
#[command(version, about = "Draft replies to emails with an AI generation service")]
struct Cli {
    /// Base URL of the generation service (overrides MAILREPLY_API_URL and config)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Tone of the reply: none, professional, casual, friendly
    #[arg(short, long, global = true, value_parser = parse_tone)]
    tone: Option<Tone>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one reply and print it
    Generate {
        /// File containing the email (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Copy the reply to the clipboard as well
        #[arg(short, long)]
        copy: bool,
    },
    /// List available tones
    Tones,
}

fn parse_tone(s: &str) -> Result<Tone, String> {
    Tone::from_str(s).ok_or_else(|| {
        format!("unknown tone '{}' (expected none, professional, casual, or friendly)", s)
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("Ignoring unreadable config: {}", err);
        Config::new()
    });
    let tone = cli.tone.unwrap_or_else(|| config.tone());

    match cli.command {
        Some(Commands::Tones) => {
            generate::list_tones();
            Ok(())
        }
        Some(Commands::Generate { file, copy }) => {
            logging::init_stderr_logging();
            let client = build_client(&config, cli.api_url.as_deref())?;
            generate::run(client, file.as_deref(), tone, copy).await
        }
        None => {
            let log_path = logging::init_file_logging().ok();
            let client = build_client(&config, cli.api_url.as_deref())?;
            tracing::info!(api_url = client.base_url(), log = ?log_path, "starting terminal ui");
            run_tui(client, tone).await
        }
    }
}

fn build_client(config: &Config, api_url: Option<&str>) -> Result<HttpReplyClient> {
    let api_url = config.resolve_api_url(api_url)?;
    HttpReplyClient::new(&api_url, Some(config.request_timeout()))
        .map_err(|e| anyhow!("Could not set up the generation client: {}", e))
}

async fn run_tui(client: HttpReplyClient, tone: Tone) -> Result<()> {
    let api_url = client.base_url().to_string();
    let mut controller = ReplyRequestController::new(Arc::new(client));
    controller.update_tone(tone);

    let mut app = App::new(controller, Box::new(SystemClipboard::new()), api_url);
    app.persist_tone = true;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let theme = ui::Theme::default();
    let mut events = EventHandler::new(tui::TICK_RATE);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, &theme, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await?,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    result
}
