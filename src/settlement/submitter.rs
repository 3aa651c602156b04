//! Settlement transaction construction and broadcast.
//!
//! One batch becomes one transaction invoking the settlement contract's
//! `submitBatch(bytes32,uint256,uint256)` entry point. The batch's total
//! value rides the transaction's native value field, not just the calldata,
//! so the settlement contract receives the batch's economic value along
//! with its commitment.

use crate::config::ChainConfig;
use crate::settlement::{ChainClient, ChainError};
use ethers::abi::{encode, Token};
use ethers::types::transaction::eip2718::TypedTransaction;
use ethers::types::{Address, Bytes, TransactionRequest, H256, U256};
use ethers::utils::id;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Failures of one settlement attempt, split by the external call that
/// produced them so callers can tell a nonce read apart from a rejected
/// broadcast.
#[derive(Debug, Error)]
pub enum SettlementError {
    #[error("failed to read signer sequence number: {0}")]
    SequenceNumber(#[source] ChainError),
    #[error("failed to sign settlement transaction: {0}")]
    Signing(#[source] ChainError),
    #[error("failed to broadcast settlement transaction: {0}")]
    Broadcast(#[source] ChainError),
}

/// Builds, signs and broadcasts the settlement transaction for a batch.
pub struct SettlementSubmitter {
    client: Arc<dyn ChainClient>,
    contract: Address,
    chain_id: u64,
    gas_limit: u64,
    gas_price: U256,
}

impl SettlementSubmitter {
    pub fn new(client: Arc<dyn ChainClient>, config: &ChainConfig) -> anyhow::Result<Self> {
        let contract: Address = config.contract_address.parse()?;
        Ok(Self {
            client,
            contract,
            chain_id: config.chain_id,
            gas_limit: config.gas_limit,
            gas_price: U256::from(config.gas_price_gwei) * U256::exp10(9),
        })
    }

    /// Submit one batch commitment to the settlement contract.
    ///
    /// Reads the signer's sequence number, builds a fixed-gas transaction
    /// carrying `total_value` as its native value, signs it, and broadcasts
    /// it. Each external call failure surfaces as its own error variant.
    pub async fn submit(
        &self,
        digest: [u8; 32],
        trade_count: usize,
        total_value: u64,
    ) -> Result<H256, SettlementError> {
        let nonce = self
            .client
            .sequence_number()
            .await
            .map_err(SettlementError::SequenceNumber)?;

        let calldata = submit_batch_calldata(digest, trade_count, total_value);
        let tx: TypedTransaction = TransactionRequest::new()
            .to(self.contract)
            .value(total_value)
            .data(calldata)
            .gas(self.gas_limit)
            .gas_price(self.gas_price)
            .nonce(nonce)
            .chain_id(self.chain_id)
            .into();

        debug!(
            "Settlement tx built: {} trades, value {}, nonce {}",
            trade_count, total_value, nonce
        );

        let raw = self
            .client
            .sign(&tx)
            .await
            .map_err(SettlementError::Signing)?;

        let tx_hash = self
            .client
            .broadcast(raw)
            .await
            .map_err(SettlementError::Broadcast)?;

        info!(
            "Batch settled: {} trades, value {} | tx {:?}",
            trade_count, total_value, tx_hash
        );

        Ok(tx_hash)
    }
}

/// ABI-encode the `submitBatch(bytes32,uint256,uint256)` call.
fn submit_batch_calldata(digest: [u8; 32], trade_count: usize, total_value: u64) -> Bytes {
    let selector = id("submitBatch(bytes32,uint256,uint256)");
    let args = encode(&[
        Token::FixedBytes(digest.to_vec()),
        Token::Uint(U256::from(trade_count)),
        Token::Uint(U256::from(total_value)),
    ]);

    let mut data = selector.to_vec();
    data.extend_from_slice(&args);
    Bytes::from(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ethers::abi::{decode, ParamType};
    use ethers::providers::ProviderError;
    use std::sync::Mutex;

    /// Stage at which the mock client should fail.
    #[derive(Clone, Copy, PartialEq)]
    enum FailAt {
        Nowhere,
        SequenceNumber,
        Sign,
        Broadcast,
    }

    struct MockChainClient {
        fail_at: FailAt,
        signed: Mutex<Option<TypedTransaction>>,
    }

    impl MockChainClient {
        fn new(fail_at: FailAt) -> Self {
            Self {
                fail_at,
                signed: Mutex::new(None),
            }
        }

        fn rpc_error() -> ChainError {
            ChainError::Rpc(ProviderError::CustomError("mock failure".to_string()))
        }
    }

    #[async_trait]
    impl ChainClient for MockChainClient {
        async fn sequence_number(&self) -> Result<U256, ChainError> {
            if self.fail_at == FailAt::SequenceNumber {
                return Err(Self::rpc_error());
            }
            Ok(U256::from(7))
        }

        async fn sign(&self, tx: &TypedTransaction) -> Result<Bytes, ChainError> {
            if self.fail_at == FailAt::Sign {
                return Err(Self::rpc_error());
            }
            *self.signed.lock().unwrap() = Some(tx.clone());
            Ok(Bytes::from(b"signed".to_vec()))
        }

        async fn broadcast(&self, _raw: Bytes) -> Result<H256, ChainError> {
            if self.fail_at == FailAt::Broadcast {
                return Err(Self::rpc_error());
            }
            Ok(H256::repeat_byte(0xab))
        }
    }

    fn chain_config() -> ChainConfig {
        ChainConfig {
            rpc_url: "http://127.0.0.1:8545".to_string(),
            chain_id: 31337,
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".to_string(),
            private_key: String::new(),
            gas_limit: 3_000_000,
            gas_price_gwei: 1,
            timeout_ms: 1_000,
        }
    }

    fn submitter(fail_at: FailAt) -> (SettlementSubmitter, Arc<MockChainClient>) {
        let client = Arc::new(MockChainClient::new(fail_at));
        let submitter =
            SettlementSubmitter::new(client.clone(), &chain_config()).expect("submitter");
        (submitter, client)
    }

    #[tokio::test]
    async fn builds_the_expected_transaction() {
        let (submitter, client) = submitter(FailAt::Nowhere);
        let digest = [0x11u8; 32];

        let tx_hash = submitter.submit(digest, 5, 4_000).await.expect("submit");
        assert_eq!(tx_hash, H256::repeat_byte(0xab));

        let signed = client.signed.lock().unwrap();
        let tx = signed.as_ref().expect("a transaction was signed");

        assert_eq!(tx.value(), Some(&U256::from(4_000)));
        assert_eq!(tx.gas(), Some(&U256::from(3_000_000)));
        assert_eq!(tx.nonce(), Some(&U256::from(7)));

        let data = tx.data().expect("calldata present");
        let selector = id("submitBatch(bytes32,uint256,uint256)");
        assert_eq!(&data[..4], &selector[..]);

        let tokens = decode(
            &[
                ParamType::FixedBytes(32),
                ParamType::Uint(256),
                ParamType::Uint(256),
            ],
            &data[4..],
        )
        .expect("decodable args");
        assert_eq!(tokens[0], Token::FixedBytes(digest.to_vec()));
        assert_eq!(tokens[1], Token::Uint(U256::from(5)));
        assert_eq!(tokens[2], Token::Uint(U256::from(4_000)));
    }

    #[tokio::test]
    async fn gas_price_is_denominated_in_gwei() {
        let (submitter, client) = submitter(FailAt::Nowhere);
        submitter.submit([0u8; 32], 1, 80).await.expect("submit");

        let signed = client.signed.lock().unwrap();
        match signed.as_ref().expect("signed") {
            TypedTransaction::Legacy(tx) => {
                assert_eq!(tx.gas_price, Some(U256::from(1_000_000_000u64)));
            }
            other => panic!("expected legacy transaction, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn failures_surface_per_stage() {
        let (s, _) = submitter(FailAt::SequenceNumber);
        let err = s.submit([0u8; 32], 1, 80).await.unwrap_err();
        assert!(matches!(err, SettlementError::SequenceNumber(_)));

        let (s, _) = submitter(FailAt::Sign);
        let err = s.submit([0u8; 32], 1, 80).await.unwrap_err();
        assert!(matches!(err, SettlementError::Signing(_)));

        let (s, _) = submitter(FailAt::Broadcast);
        let err = s.submit([0u8; 32], 1, 80).await.unwrap_err();
        assert!(matches!(err, SettlementError::Broadcast(_)));
    }
}
