//! Ethers-backed estimator and executor
//!
//! `NodeClient` implements both halves of the submission pipeline against a
//! JSON-RPC node: estimation via `eth_estimateGas` (which never mutates
//! state), and execution by signing locally and sending the raw transaction.

use crate::config::{GasPriceStrategy, SubmitterConfig};
use crate::contract::RemoteOperation;
use crate::error::{SubmitError, SubmitResult};
use crate::submitter::{Estimator, Executor, SubmissionHandle};

use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::{Http, Provider};
use ethers::signers::LocalWallet;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Gas price types
#[derive(Debug, Clone)]
pub enum GasPrice {
    Legacy(U256),
    Eip1559 {
        max_fee_per_gas: U256,
        max_priority_fee_per_gas: U256,
    },
}

/// JSON-RPC node client bound to a signing wallet.
///
/// Construction performs no remote calls; the only network interactions are
/// the estimation and submission issued per submit.
#[derive(Debug)]
pub struct NodeClient {
    provider: Provider<Http>,
    wallet: LocalWallet,
    config: SubmitterConfig,
}

impl NodeClient {
    /// Connect to an RPC endpoint.
    ///
    /// The chain id is taken from configuration rather than queried, so a
    /// misconfigured endpoint fails on first use instead of at construction.
    pub fn connect(
        rpc_url: &str,
        chain_id: u64,
        wallet: LocalWallet,
        config: SubmitterConfig,
    ) -> SubmitResult<Self> {
        config.validate()?;

        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| {
                SubmitError::InvalidConfiguration(format!("invalid RPC url {}: {}", rpc_url, e))
            })?
            .interval(Duration::from_millis(100));

        Ok(Self {
            provider,
            wallet: wallet.with_chain_id(chain_id),
            config,
        })
    }

    /// Sender address.
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Get current gas price based on the configured strategy.
    async fn gas_price(&self) -> SubmitResult<GasPrice> {
        match self.config.gas_price_strategy {
            GasPriceStrategy::Legacy => {
                let price = self
                    .provider
                    .get_gas_price()
                    .await
                    .map_err(|e| SubmitError::SubmissionFailed(format!("gas price: {}", e)))?;
                Ok(GasPrice::Legacy(price))
            }
            GasPriceStrategy::Eip1559 => {
                let (max_fee, priority_fee) = self.eip1559_fees().await?;
                Ok(GasPrice::Eip1559 {
                    max_fee_per_gas: max_fee,
                    max_priority_fee_per_gas: priority_fee,
                })
            }
        }
    }

    /// Estimate EIP-1559 fees from the latest base fee.
    async fn eip1559_fees(&self) -> SubmitResult<(U256, U256)> {
        let block = self
            .provider
            .get_block(BlockNumber::Latest)
            .await
            .map_err(|e| SubmitError::SubmissionFailed(format!("fee estimation: {}", e)))?
            .ok_or_else(|| SubmitError::SubmissionFailed("no latest block".to_string()))?;

        let base_fee = block
            .base_fee_per_gas
            .ok_or_else(|| SubmitError::SubmissionFailed("no base fee in block".to_string()))?;

        Ok(capped_fees(base_fee, self.config.max_gas_price_gwei))
    }

    /// Build the transaction for `op` with the given nonce, gas limit, and
    /// price.
    fn build_tx(
        &self,
        op: &RemoteOperation,
        calldata: Bytes,
        nonce: U256,
        gas_limit: U256,
        gas_price: &GasPrice,
    ) -> TypedTransaction {
        let chain_id = self.wallet.chain_id();
        match gas_price {
            GasPrice::Legacy(price) => {
                let tx = TransactionRequest::new()
                    .to(op.to())
                    .from(self.wallet.address())
                    .data(calldata)
                    .nonce(nonce)
                    .gas(gas_limit)
                    .gas_price(*price)
                    .chain_id(chain_id);
                TypedTransaction::Legacy(tx)
            }
            GasPrice::Eip1559 {
                max_fee_per_gas,
                max_priority_fee_per_gas,
            } => {
                let tx = Eip1559TransactionRequest::new()
                    .to(op.to())
                    .from(self.wallet.address())
                    .data(calldata)
                    .nonce(nonce)
                    .gas(gas_limit)
                    .max_fee_per_gas(*max_fee_per_gas)
                    .max_priority_fee_per_gas(*max_priority_fee_per_gas)
                    .chain_id(chain_id);
                TypedTransaction::Eip1559(tx)
            }
        }
    }
}

/// EIP-1559 fee pair derived from the latest base fee, bounded by the
/// configured gwei cap.
fn capped_fees(base_fee: U256, max_gas_price_gwei: u64) -> (U256, U256) {
    let priority_fee = U256::from(2_000_000_000u64); // 2 gwei default

    // Max fee = 2 * base_fee + priority_fee (buffer for block variability)
    let max_fee = base_fee * 2 + priority_fee;

    // Cap at configured max
    let max_gwei = U256::from(max_gas_price_gwei) * U256::from(1_000_000_000u64);
    let max_fee = std::cmp::min(max_fee, max_gwei);

    // A tip above the fee cap is invalid; clamp it under a tight cap.
    let priority_fee = std::cmp::min(priority_fee, max_fee);

    (max_fee, priority_fee)
}

#[async_trait]
impl Estimator for NodeClient {
    async fn estimate(&self, op: &RemoteOperation) -> SubmitResult<U256> {
        let calldata = op
            .calldata()
            .map_err(|e| SubmitError::EstimationFailed(format!("calldata encoding: {}", e)))?;

        let tx: TypedTransaction = TransactionRequest::new()
            .to(op.to())
            .from(self.wallet.address())
            .data(calldata)
            .into();

        let estimate = self
            .provider
            .estimate_gas(&tx, None)
            .await
            .map_err(|e| SubmitError::EstimationFailed(e.to_string()))?;

        debug!("Node estimated {} gas for {}", estimate, op.name());
        Ok(estimate)
    }
}

#[async_trait]
impl Executor for NodeClient {
    async fn invoke(&self, op: &RemoteOperation, ceiling: U256) -> SubmitResult<SubmissionHandle> {
        let calldata = op
            .calldata()
            .map_err(|e| SubmitError::SubmissionFailed(format!("calldata encoding: {}", e)))?;

        let nonce = self
            .provider
            .get_transaction_count(self.wallet.address(), Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| SubmitError::SubmissionFailed(format!("nonce: {}", e)))?;

        let gas_price = self.gas_price().await?;
        let tx = self.build_tx(op, calldata, nonce, ceiling, &gas_price);

        let signature = self
            .wallet
            .sign_transaction(&tx)
            .await
            .map_err(|e| SubmitError::SubmissionFailed(format!("signing: {}", e)))?;
        let raw = tx.rlp_signed(&signature);

        let send_timeout = Duration::from_millis(self.config.submit_timeout_ms);
        match timeout(send_timeout, self.provider.send_raw_transaction(raw)).await {
            Ok(Ok(pending)) => Ok(SubmissionHandle::new(pending.tx_hash(), op.name())),
            Ok(Err(e)) => Err(SubmitError::SubmissionFailed(e.to_string())),
            Err(_) => Err(SubmitError::SubmissionFailed(format!(
                "send timed out after {}ms",
                self.config.submit_timeout_ms
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known anvil/hardhat dev key
    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn dev_wallet() -> LocalWallet {
        DEV_KEY.parse().unwrap()
    }

    #[test]
    fn test_connect_rejects_malformed_url() {
        let err = NodeClient::connect(
            "not a url",
            1,
            dev_wallet(),
            SubmitterConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SubmitError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_connect_rejects_invalid_config() {
        let config = SubmitterConfig {
            margin: -0.1,
            ..Default::default()
        };
        let err = NodeClient::connect("http://localhost:8545", 1, dev_wallet(), config)
            .unwrap_err();
        assert!(matches!(err, SubmitError::InvalidConfiguration(_)));
    }

    const GWEI: u64 = 1_000_000_000;

    #[test]
    fn test_fee_cap_applies() {
        // base 10 gwei, cap 500 gwei: uncapped
        let (max_fee, priority_fee) = capped_fees(U256::from(10 * GWEI), 500);
        assert_eq!(max_fee, U256::from(22 * GWEI));
        assert_eq!(priority_fee, U256::from(2 * GWEI));

        // base 300 gwei, cap 500 gwei: capped
        let (max_fee, _) = capped_fees(U256::from(300 * GWEI), 500);
        assert_eq!(max_fee, U256::from(500 * GWEI));
    }

    #[test]
    fn test_tight_fee_cap_clamps_priority_fee() {
        // A cap below the default 2 gwei tip must pull the tip down with it,
        // otherwise the node rejects maxFeePerGas < maxPriorityFeePerGas.
        let (max_fee, priority_fee) = capped_fees(U256::from(30 * GWEI), 1);
        assert_eq!(max_fee, U256::from(GWEI));
        assert_eq!(priority_fee, U256::from(GWEI));
        assert!(priority_fee <= max_fee);
    }

    #[test]
    fn test_connect_sets_wallet_chain_id() {
        let client = NodeClient::connect(
            "http://localhost:8545",
            11155111,
            dev_wallet(),
            SubmitterConfig::default(),
        )
        .unwrap();
        assert_eq!(client.wallet.chain_id(), 11155111);
    }
}
