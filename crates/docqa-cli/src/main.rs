use anyhow::Result;
use clap::{Parser, Subcommand};
use docqa_infrastructure::ConfigService;

mod app;
mod commands;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "docqa")]
#[command(about = "docqa - ask questions about indexed documents", long_about = None)]
struct Cli {
    /// Retrieval service base URL (overrides config.toml and DOCQA_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List indexed documents available on the server
    Indices,
    /// Print the section tree of an indexed document
    Tree {
        /// Index file name, as listed by `docqa indices`
        index: String,
    },
    /// List saved chat sessions
    Sessions,
    /// Chat about a document
    Chat {
        /// Start a new session for this index
        #[arg(long, conflicts_with = "session")]
        index: Option<String>,
        /// Continue an existing session
        #[arg(long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose)?;

    let mut config = ConfigService::new()?.load()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url);
    }
    let app = app::App::bootstrap(&config)?;

    match cli.command {
        Commands::Indices => commands::indices(&app).await?,
        Commands::Tree { index } => commands::tree(&app, &index).await?,
        Commands::Sessions => commands::sessions(&app)?,
        Commands::Chat { index, session } => {
            commands::chat::run(&app, index.as_deref(), session.as_deref()).await?
        }
    }

    Ok(())
}
