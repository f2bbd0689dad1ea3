// src/eth/submit.rs

use ethers::types::Address;
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::utils::format_ether;

use super::HatchChain;
use crate::error::{HatchError, Step};
use crate::types::{HatchReceipt, TxSummary};

/// Runs one hatch iteration: estimate, price, nonce, build, sign, submit.
pub async fn submit_hatch<C>(chain: &C, operator: Address) -> Result<HatchReceipt, HatchError>
where
    C: HatchChain + ?Sized,
{
    let gas = chain
        .estimate_hatch_gas(operator)
        .await
        .map_err(HatchError::at(Step::Estimate))?;
    tracing::info!("Gas estimate: {}", gas);

    let gas_price = chain.gas_price().await.map_err(HatchError::at(Step::GasPrice))?;
    tracing::info!(
        "Gas price: {} wei, estimated fee: {} ether",
        gas_price,
        format_ether(gas.saturating_mul(gas_price))
    );

    let nonce = chain.nonce(operator).await.map_err(HatchError::at(Step::Nonce))?;
    tracing::info!("Nonce: {}", nonce);

    let tx = chain
        .build_hatch(operator, gas, gas_price, nonce)
        .await
        .map_err(HatchError::at(Step::Build))?;
    tracing::info!("Transaction: {}", describe(&tx));

    let raw = chain.sign(&tx).await.map_err(HatchError::at(Step::Sign))?;

    let tx_hash = chain.send_raw(raw).await.map_err(HatchError::at(Step::Submit))?;
    tracing::info!("Successfully sent transaction {:?}", tx_hash);

    Ok(HatchReceipt {
        tx_hash,
        gas,
        gas_price,
        nonce,
    })
}

// JSON view of the transaction for the log, or why it could not be rendered
fn describe(tx: &TypedTransaction) -> String {
    match serde_json::to_string(&TxSummary::from(tx)) {
        Ok(json) => json,
        Err(e) => format!("<unrenderable: {}>", e),
    }
}
