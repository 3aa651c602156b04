use gridsettle::{
    api::Server,
    batch::BatchFlusher,
    capacity::{CapacityOracle, OpenMeteoClient},
    config::Config,
    intake::TradeIntake,
    pool::TradeQueue,
    settlement::{HttpChainClient, SettlementSubmitter},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

/// The main entry point for the oracle application.
///
/// This function initializes logging, loads the application configuration,
/// wires the intake pipeline to the settlement chain, starts the batch
/// flush worker in the background, and starts the API server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging using tracing_subscriber.
    tracing_subscriber::fmt::init();

    // Load the application configuration from the specified TOML file.
    let config = Config::load("config/default.toml")?;
    info!("Oracle starting with config: {:?}", config);

    // Pending queue, shared between intake and the flush worker.
    let queue = Arc::new(TradeQueue::new());

    // Capacity oracle over the live forecast service.
    let forecast = Arc::new(OpenMeteoClient::new(config.forecast.clone()));
    let capacity = Arc::new(CapacityOracle::new(forecast, &config.market));

    // Settlement path: chain client, then the submitter wrapping it.
    let chain = Arc::new(HttpChainClient::new(&config.chain)?);
    info!("Settlement signer: {:?}", chain.signer_address());
    let submitter = Arc::new(SettlementSubmitter::new(chain, &config.chain)?);

    // Flush signaling: intake produces, a single worker consumes. The
    // worker serializes overlapping flush triggers.
    let (flush_tx, flush_rx) = mpsc::channel(8);
    let flusher = BatchFlusher::new(queue.clone(), submitter, flush_rx);
    tokio::spawn(flusher.run());
    info!("Batch flush worker started");

    let intake = Arc::new(TradeIntake::new(
        capacity,
        queue.clone(),
        flush_tx,
        config.batch.size_threshold,
        config.market.unit_price,
    ));

    // Start the API server. This binds to the configured port and begins
    // listening for trade submissions.
    let server = Server::new(config, intake, queue);
    server.start().await?;

    Ok(())
}
