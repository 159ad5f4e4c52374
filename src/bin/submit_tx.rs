use anyhow::{bail, Result};
use fraud_feed::bin_common::{parse_args, scoring_api_url};
use scoring_client::SubmissionClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = parse_args();
    if args.len() != 3 {
        bail!("usage: submit_tx <amount> <location> <user_id>");
    }

    let client = SubmissionClient::new(scoring_api_url());
    let ack = client.submit(&args[0], &args[1], &args[2]).await?;

    info!(status = %ack.status, "transaction accepted for scoring");
    info!("watch the feed monitor: the scored transaction arrives over the stream");
    Ok(())
}
