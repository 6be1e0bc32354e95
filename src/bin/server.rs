//! unflare server
//!
//! FlareSolverr-compatible HTTP service: fetches URLs through a real
//! browser, solving bot-challenge interstitials, and returns status,
//! headers, cookies and body to classic scrape clients.

use anyhow::Context;
use clap::Parser;
use unflare::browser::LaunchOptions;
use unflare::server::{AppState, router};

#[derive(Parser)]
#[command(name = "unflare")]
#[command(version)]
#[command(about = "Challenge-solving browser fetch proxy", long_about = None)]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, short = 'p', default_value = "8191")]
    port: u16,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    chrome_path: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// Run Chrome without its sandbox (needed in some containers)
    #[arg(long)]
    no_sandbox: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut launch = LaunchOptions::new().headless(!cli.headed).sandbox(!cli.no_sandbox);
    if let Some(ref path) = cli.chrome_path {
        launch = launch.chrome_path(path);
    }
    if let Some(ref dir) = cli.user_data_dir {
        launch = launch.user_data_dir(dir);
    }

    eprintln!("unflare v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "Browser mode: {}",
        if launch.headless { "headless" } else { "headed" }
    );

    if let Some(ref path) = cli.chrome_path {
        eprintln!("Browser executable: {}", path);
    }

    if let Some(ref dir) = cli.user_data_dir {
        eprintln!("User data directory: {}", dir);
    }

    let bind_addr = format!("{}:{}", cli.host, cli.port);
    let app = router(AppState { launch });

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    eprintln!("Listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
