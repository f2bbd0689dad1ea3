use ethers::signers::Signer;
use tokio_util::sync::CancellationToken;

use hatch_bot::error::HatchError;
use hatch_bot::{Config, EthClient, run_worker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        tracing::error!(step = ?e.step(), "Hatch bot stopped: {}", e);
        return Err(e.into());
    }

    Ok(())
}

async fn run() -> Result<(), HatchError> {
    let config = Config::from_env()?;

    if config.signer.address() != config.operator {
        tracing::warn!(
            "PRIVATE_KEY belongs to {:?}, not ADDRESS {:?}; transactions are sent from the key's account",
            config.signer.address(),
            config.operator
        );
    }

    let client = EthClient::connect(&config)?;

    let shutdown = CancellationToken::new();
    let interrupt = shutdown.clone();

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => interrupt.cancel(),
            Err(e) => tracing::error!("Failed to listen for interrupt: {}", e),
        }
    });

    run_worker(&client, &config, shutdown).await
}
