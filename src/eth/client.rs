// src/eth/client.rs

use std::sync::Arc;

use async_trait::async_trait;
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use tokio::sync::OnceCell;

use super::{HATCH_METHOD, HatchChain};
use crate::config::Config;
use crate::error::{EthError, HatchError};

/// [`HatchChain`] backed by an ethers provider, the contract ABI and a local wallet.
pub struct EthClient<P: JsonRpcClient> {
    provider: Arc<Provider<P>>,
    contract: Contract<Provider<P>>,
    signer: LocalWallet,
    chain_id: OnceCell<u64>,
}

impl EthClient<Http> {
    pub fn connect(config: &Config) -> Result<Self, HatchError> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())
            .map_err(|e| HatchError::Connection(format!("{}: {}", config.rpc_url, e)))?;

        Ok(Self::new(provider, config))
    }
}

impl<P: JsonRpcClient + 'static> EthClient<P> {
    pub fn new(provider: Provider<P>, config: &Config) -> Self {
        let provider = Arc::new(provider);
        let contract = Contract::new(config.contract, config.abi.clone(), provider.clone());

        Self {
            provider,
            contract,
            signer: config.signer.clone(),
            chain_id: OnceCell::new_with(config.chain_id),
        }
    }

    // resolved from the node the first time a transaction is built
    async fn chain_id(&self) -> Result<u64, EthError> {
        self.chain_id
            .get_or_try_init(|| async {
                let id = self.provider.get_chainid().await?;
                Ok::<_, EthError>(id.as_u64())
            })
            .await
            .copied()
    }

    fn hatch_call(&self, operator: Address) -> Result<ContractCall<Provider<P>, ()>, EthError> {
        let call = self
            .contract
            .method::<_, ()>(HATCH_METHOD, operator)
            .map_err(|e| EthError::Abi(e.to_string()))?;

        Ok(call.legacy().from(operator))
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> HatchChain for EthClient<P> {
    async fn client_version(&self) -> Result<String, EthError> {
        Ok(self.provider.client_version().await?)
    }

    async fn estimate_hatch_gas(&self, operator: Address) -> Result<U256, EthError> {
        self.hatch_call(operator)?
            .estimate_gas()
            .await
            .map_err(|e| EthError::Rpc(e.to_string()))
    }

    async fn gas_price(&self) -> Result<U256, EthError> {
        Ok(self.provider.get_gas_price().await?)
    }

    async fn nonce(&self, operator: Address) -> Result<U256, EthError> {
        Ok(self.provider.get_transaction_count(operator, None).await?)
    }

    async fn build_hatch(
        &self,
        operator: Address,
        gas: U256,
        gas_price: U256,
        nonce: U256,
    ) -> Result<TypedTransaction, EthError> {
        let call = self.hatch_call(operator)?;
        let chain_id = self.chain_id().await?;

        let mut tx = call.gas(gas).gas_price(gas_price).nonce(nonce).tx;
        tx.set_chain_id(chain_id);

        Ok(tx)
    }

    async fn sign(&self, tx: &TypedTransaction) -> Result<Bytes, EthError> {
        let signature = self.signer.sign_transaction(tx).await?;

        Ok(tx.rlp_signed(&signature))
    }

    async fn send_raw(&self, raw: Bytes) -> Result<H256, EthError> {
        let pending = self.provider.send_raw_transaction(raw).await?;

        Ok(*pending)
    }
}
