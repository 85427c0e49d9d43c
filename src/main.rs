mod config;
mod display;
mod error;
mod github;
mod report;
mod teams;

use clap::Parser;
use error::Result;
use github::GithubClient;
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "seatscan",
    version,
    about = "Export GitHub Copilot seat assignments across organizations to a CSV report"
)]
pub struct Cli {
    /// File listing organizations to process, one name per line
    #[arg(long, default_value = "orgs.csv")]
    orgs_file: PathBuf,

    /// CSV report destination
    #[arg(long, default_value = "copilot-seat-analysis.csv")]
    output: PathBuf,

    /// Debug log destination
    #[arg(long, default_value = "debug.log")]
    log_file: PathBuf,

    /// Seconds to pause between organizations (rate-limit headroom)
    #[arg(long, default_value = "30")]
    delay: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(&cli) {
        display::error(&format!("Cannot open log file: {e}"));
        std::process::exit(1);
    }

    if let Err(e) = run(&cli).await {
        log::error!("{e}");
        display::error(&e.to_string());
        std::process::exit(1);
    }
}

fn init_logging(cli: &Cli) -> std::io::Result<()> {
    let log_file = File::create(&cli.log_file)?;
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Debug)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();
    Ok(())
}

async fn run(cli: &Cli) -> Result<()> {
    let token = config::token_from_env()?;
    let api_url = config::api_url_from_env();
    let client = GithubClient::new(&token, api_url.as_deref())?;

    // Credential gate: nothing is processed and no report is created unless
    // the token is accepted.
    let user = client.validate_token().await?;
    display::success(&format!("Authenticated as {}", user.login));

    let orgs = config::read_org_list(&cli.orgs_file)?;
    if orgs.is_empty() {
        display::warn("No organizations to process.");
        return Ok(());
    }

    let mut writer = csv::Writer::from_writer(File::create(&cli.output)?);
    writer.write_record(report::HEADERS)?;
    writer.flush()?;

    for (i, org) in orgs.iter().enumerate() {
        display::progress(&format!("Processing organization: {org}"));
        log::debug!("Processing organization: {org}");

        let index = teams::build_team_index(&client, org).await;
        let rows = report::emit_seat_rows(&client, org, &index, &mut writer).await?;
        display::success(&format!("{org}: {rows} seat(s) exported"));

        if i + 1 < orgs.len() && cli.delay > 0 {
            log::debug!("Waiting {}s before the next organization...", cli.delay);
            tokio::time::sleep(Duration::from_secs(cli.delay)).await;
        }
    }

    writer.flush()?;
    Ok(())
}
