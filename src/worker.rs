use std::future::Future;

use chrono::{TimeDelta, Utc};
use ethers::utils::{format_ether, to_checksum};
use tokio_util::sync::CancellationToken;

use crate::config::{Config, FailurePolicy};
use crate::error::HatchError;
use crate::eth::HatchChain;
use crate::eth::submit::submit_hatch;

/// Runs `fut` unless `shutdown` fires first. `None` means cancelled.
async fn until_cancelled<F: Future>(shutdown: &CancellationToken, fut: F) -> Option<F::Output> {
    tokio::select! {
        biased;
        _ = shutdown.cancelled() => None,
        out = fut => Some(out),
    }
}

/// Checks connectivity, then submits one hatch transaction every
/// `config.interval` until `shutdown` is cancelled.
///
/// Returns `Ok(())` only on cancellation. Under [`FailurePolicy::Exit`] the
/// first failing step ends the loop with its error.
pub async fn run_worker<C>(
    chain: &C,
    config: &Config,
    shutdown: CancellationToken,
) -> Result<(), HatchError>
where
    C: HatchChain + ?Sized,
{
    let Some(version) =
        until_cancelled(&shutdown, async { chain.client_version().await }).await
    else {
        tracing::info!("User initiated graceful shutdown");
        return Ok(());
    };
    let version = version.map_err(|e| HatchError::Connection(e.to_string()))?;
    tracing::info!("Connection successful ({})", version);
    tracing::info!("Connected to {}", to_checksum(&config.contract, None));

    loop {
        let Some(outcome) = until_cancelled(&shutdown, submit_hatch(chain, config.operator)).await
        else {
            break;
        };

        match outcome {
            Ok(receipt) => {
                tracing::info!(
                    "Hatched with nonce {} (tx {:?}, max fee {} ether)",
                    receipt.nonce,
                    receipt.tx_hash,
                    format_ether(receipt.max_fee())
                );
            }
            Err(e) => match config.on_error {
                FailurePolicy::Exit => {
                    tracing::error!(step = ?e.step(), "Hatch failed: {}", e);
                    return Err(e);
                }
                FailurePolicy::Continue => {
                    tracing::error!(
                        step = ?e.step(),
                        "Hatch failed, waiting for the next cycle: {}",
                        e
                    );
                }
            },
        }

        let next = TimeDelta::from_std(config.interval)
            .ok()
            .and_then(|delta| Utc::now().checked_add_signed(delta));
        match next {
            Some(at) => tracing::info!(
                "Waiting {} minutes before hatching eggs again (next at {})",
                config.interval.as_secs() / 60,
                at.format("%Y-%m-%d %H:%M:%S UTC")
            ),
            None => tracing::info!(
                "Waiting {} minutes before hatching eggs again",
                config.interval.as_secs() / 60
            ),
        }

        if until_cancelled(&shutdown, tokio::time::sleep(config.interval))
            .await
            .is_none()
        {
            break;
        }
    }

    tracing::info!("User initiated graceful shutdown");
    Ok(())
}
