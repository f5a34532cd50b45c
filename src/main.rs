use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};

use smartpick::app::App;
use smartpick::render::{plain, transcript_lines};
use smartpick::tui::{self, EventHandler, Tui};
use smartpick::{handler, logging, ui};
use smartpick::{ChatSession, Config, RecommendClient, ResponseShape, ViewMode};

#[derive(Parser)]
#[command(name = "smartpick", version)]
#[command(about = "Chat with the SmartPick phone recommendation service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Recommendation endpoint URL
    #[arg(long, global = true, env = "SMARTPICK_ENDPOINT")]
    endpoint: Option<String>,

    /// How many phones to ask for
    #[arg(long, global = true)]
    top_n: Option<u32>,

    /// Shape of a successful response body
    #[arg(long, global = true, value_enum)]
    shape: Option<ResponseShape>,

    /// Show results as a table instead of cards
    #[arg(long, global = true)]
    table: bool,

    /// Persist the effective settings to the config file
    #[arg(long, global = true)]
    save: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat screen (default)
    Chat,
    /// Ask a single question and print the answer
    Ask {
        /// Your question, e.g. "best phone under 20000"
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show the effective configuration
    Config,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(top_n) = self.top_n {
            config.top_n = top_n;
        }
        if let Some(shape) = self.shape {
            config.response_shape = shape;
        }
        if self.table {
            config.view_mode = ViewMode::Table;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the file logger's guard alive until the chat screen closes
    let _log_guard = match cli.command {
        None | Some(Commands::Chat) => logging::init_file_or_warn(Config::log_dir()),
        Some(_) => {
            logging::init_stderr()?;
            None
        }
    };

    let mut config = Config::load()?;
    cli.apply(&mut config);

    if cli.save {
        config.save()?;
        tracing::info!(path = %Config::config_path()?.display(), "saved config");
    }

    match cli.command {
        None | Some(Commands::Chat) => run_chat(&config).await,
        Some(Commands::Ask { query }) => ask_once(&config, &query.join(" ")).await,
        Some(Commands::Config) => show_config(&config),
    }
}

async fn run_chat(config: &Config) -> Result<()> {
    tracing::info!(endpoint = %config.endpoint, "starting chat");

    let client = RecommendClient::from_config(config);
    let (session, replies) = ChatSession::new(Arc::new(client));
    let mut app = App::new(session, config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();
    events.forward_replies(replies);

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }
    Ok(())
}

async fn ask_once(config: &Config, query: &str) -> Result<()> {
    let client = RecommendClient::from_config(config);
    let (mut session, mut replies) = ChatSession::new(Arc::new(client));

    session.set_input(query);
    let Some(request) = session.submit() else {
        bail!("query is empty");
    };
    request.await?;

    if let Some(reply) = replies.recv().await {
        session.receive(reply);
    }

    // Skip the echoed question
    for line in transcript_lines(&session.messages()[1..], config.view_mode) {
        println!("{}", plain(&line));
    }
    Ok(())
}

fn show_config(config: &Config) -> Result<()> {
    println!("# {}", Config::config_path()?.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
