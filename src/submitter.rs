//! Padded transaction submission
//!
//! A single linear pipeline per call: estimate the gas for an operation, pad
//! the estimate by the margin, submit with the padded limit. The two remote
//! calls sit behind injected traits so they can be substituted with
//! deterministic stubs; the submitter itself holds no mutable state, so
//! concurrent submissions are independent.

use crate::config::SubmitterConfig;
use crate::contract::RemoteOperation;
use crate::error::SubmitResult;
use crate::gas::Margin;
use crate::metrics;

use async_trait::async_trait;
use ethers::types::{H256, U256};
use std::sync::Arc;
use tracing::{debug, info};

/// Predicts the gas cost of an operation without executing it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Estimator: Send + Sync {
    /// Estimate the gas for invoking `op`. Must not mutate remote state.
    async fn estimate(&self, op: &RemoteOperation) -> SubmitResult<U256>;
}

/// Executes an operation under an explicit gas ceiling.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Executor: Send + Sync {
    /// Invoke `op` for real with `ceiling` as the gas limit.
    async fn invoke(&self, op: &RemoteOperation, ceiling: U256) -> SubmitResult<SubmissionHandle>;
}

/// Token for an in-flight submission.
///
/// Returned as soon as the node accepts the transaction; awaiting finality is
/// the caller's concern and happens against the hash, not through this crate.
#[must_use = "a submission handle should be awaited for finality"]
#[derive(Debug, Clone)]
pub struct SubmissionHandle {
    tx_hash: H256,
    operation: String,
}

impl SubmissionHandle {
    pub fn new(tx_hash: H256, operation: impl Into<String>) -> Self {
        Self {
            tx_hash,
            operation: operation.into(),
        }
    }

    /// Hash of the submitted transaction.
    pub fn tx_hash(&self) -> H256 {
        self.tx_hash
    }

    /// Name of the operation that was submitted.
    pub fn operation(&self) -> &str {
        &self.operation
    }
}

/// Submits contract operations with a gas-padded limit.
pub struct TransactionSubmitter {
    estimator: Arc<dyn Estimator>,
    executor: Arc<dyn Executor>,
    margin: Margin,
}

impl TransactionSubmitter {
    /// Create a submitter with the default 10% margin.
    pub fn new(estimator: Arc<dyn Estimator>, executor: Arc<dyn Executor>) -> Self {
        Self {
            estimator,
            executor,
            margin: Margin::default(),
        }
    }

    /// Create a submitter from validated configuration.
    pub fn with_config(
        estimator: Arc<dyn Estimator>,
        executor: Arc<dyn Executor>,
        config: &SubmitterConfig,
    ) -> SubmitResult<Self> {
        config.validate()?;
        Ok(Self {
            estimator,
            executor,
            margin: Margin::try_from_fraction(config.margin)?,
        })
    }

    /// Override the margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Submit `op` using the configured margin.
    ///
    /// Estimates the gas, pads the estimate, and submits with the padded
    /// limit. Returns as soon as the node accepts the transaction; no retry
    /// is performed here. On `SubmissionFailed` the caller decides whether
    /// to call again with a larger margin.
    pub async fn submit(&self, op: &RemoteOperation) -> SubmitResult<SubmissionHandle> {
        self.submit_padded(op, self.margin).await
    }

    /// Submit `op` with a one-off margin given as a fraction (0.1 = 10%).
    ///
    /// The margin is validated before either remote call is made.
    pub async fn submit_with_margin(
        &self,
        op: &RemoteOperation,
        margin: f64,
    ) -> SubmitResult<SubmissionHandle> {
        let margin = Margin::try_from_fraction(margin)?;
        self.submit_padded(op, margin).await
    }

    async fn submit_padded(
        &self,
        op: &RemoteOperation,
        margin: Margin,
    ) -> SubmitResult<SubmissionHandle> {
        match self.pipeline(op, margin).await {
            Ok(handle) => Ok(handle),
            Err(e) => {
                metrics::record_failure(op.name(), e.kind());
                Err(e)
            }
        }
    }

    async fn pipeline(
        &self,
        op: &RemoteOperation,
        margin: Margin,
    ) -> SubmitResult<SubmissionHandle> {
        let estimate = self.estimator.estimate(op).await?;
        metrics::record_estimation(op.name());

        let ceiling = margin.pad(estimate);
        debug!(
            "Estimated {} gas for {}, submitting with limit {} ({} bps margin)",
            estimate,
            op.name(),
            ceiling,
            margin.basis_points()
        );

        let handle = self.executor.invoke(op, ceiling).await?;
        metrics::record_submission(op.name());
        info!("Submitted {} as tx {:?}", op.name(), handle.tx_hash());

        Ok(handle)
    }
}
