//! Chain client seam.
//!
//! The oracle touches the settlement chain through three calls only: read
//! the signer's sequence number, sign a transaction, broadcast raw bytes.
//! Everything else about the chain stays behind this trait, which is what
//! the tests mock.

use crate::config::ChainConfig;
use async_trait::async_trait;
use ethers::providers::{Http, Middleware, Provider, ProviderError};
use ethers::signers::{LocalWallet, Signer, WalletError};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, H256, U256};
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc error: {0}")]
    Rpc(#[from] ProviderError),
    #[error("wallet error: {0}")]
    Wallet(#[from] WalletError),
    #[error("chain call timed out after {0:?}")]
    Timeout(Duration),
}

/// Narrow consumed contract of the external settlement chain.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Current transaction sequence number of the oracle's signer account.
    async fn sequence_number(&self) -> Result<U256, ChainError>;

    /// Sign a transaction with the oracle key, returning raw signed bytes.
    async fn sign(&self, tx: &TypedTransaction) -> Result<Bytes, ChainError>;

    /// Broadcast signed bytes, returning the transaction hash.
    async fn broadcast(&self, raw: Bytes) -> Result<H256, ChainError>;
}

/// JSON-RPC chain client holding the oracle's signing key in memory for the
/// process lifetime.
pub struct HttpChainClient {
    provider: Provider<Http>,
    wallet: LocalWallet,
    call_timeout: Duration,
}

impl HttpChainClient {
    pub fn new(config: &ChainConfig) -> anyhow::Result<Self> {
        let provider = Provider::<Http>::try_from(config.rpc_url.as_str())?;
        let wallet = config
            .private_key
            .parse::<LocalWallet>()?
            .with_chain_id(config.chain_id);

        Ok(Self {
            provider,
            wallet,
            call_timeout: Duration::from_millis(config.timeout_ms),
        })
    }

    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn sequence_number(&self) -> Result<U256, ChainError> {
        let count = self
            .provider
            .get_transaction_count(self.wallet.address(), None);
        timeout(self.call_timeout, count)
            .await
            .map_err(|_| ChainError::Timeout(self.call_timeout))?
            .map_err(ChainError::from)
    }

    async fn sign(&self, tx: &TypedTransaction) -> Result<Bytes, ChainError> {
        // Local key, no network round trip, but the Signer API is async.
        let signature = self.wallet.sign_transaction(tx).await?;
        Ok(tx.rlp_signed(&signature))
    }

    async fn broadcast(&self, raw: Bytes) -> Result<H256, ChainError> {
        let send = self.provider.send_raw_transaction(raw);
        let pending = timeout(self.call_timeout, send)
            .await
            .map_err(|_| ChainError::Timeout(self.call_timeout))??;
        Ok(pending.tx_hash())
    }
}
