use anyhow::Result;
use clap::Parser;

use rental_auth::Settings;
use rentctl::cli::Cli;
use rentctl::logging::init_logging;
use rentctl::output::error_report;
use rentctl::App;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("command failed: {:#}", e);
        for line in error_report(&e) {
            eprintln!("{}", line);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let log_path = init_logging(cli.verbose)?;

    let mut settings = Settings::new()?;
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    tracing::info!(log = %log_path.display(), api_url = %settings.api_url, "rentctl starting");

    App::new(&settings)?.run(cli.command).await
}
