use clap::Parser;
use inspo_board::config::{ClientConfig, ConfigError};
use inspo_board::net::api::HttpBoardApi;
use inspo_board::net::error::ApiError;
use inspo_board::shell;
use inspo_board::state::sync::BoardSync;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("http client setup failed: {0}")]
    Api(#[from] ApiError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "inspo-board", about = "Inspiration board terminal client")]
struct Cli {
    /// Board service root, e.g. http://127.0.0.1:5000
    #[arg(long, env = "INSPO_BASE_URL")]
    base_url: Option<String>,

    /// Log requests and state changes to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url)?;
    }
    tracing::info!(base_url = %config.base_url, "inspo-board starting");

    let api = HttpBoardApi::new(&config)?;
    let mut sync = BoardSync::new(api);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    shell::run(&mut sync, stdin, &mut stdout).await?;
    Ok(())
}
