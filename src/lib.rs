//! txpad - gas-padded transaction submission for Ethereum contract calls
//!
//! Estimates the gas for a contract operation, pads the estimate by a safety
//! margin, and submits the transaction with the padded limit, returning a
//! handle the caller can await finality on. The two remote calls (estimate,
//! submit) sit behind the [`Estimator`] and [`Executor`] traits; [`NodeClient`]
//! is the JSON-RPC implementation of both.
//!
//! ```no_run
//! use txpad::{BoundContract, NodeClient, SubmitterConfig, TransactionSubmitter};
//! use ethers::abi::Token;
//! use ethers::types::Address;
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let wallet = std::env::var("TXPAD_PRIVATE_KEY")?.parse()?;
//! let node = Arc::new(NodeClient::connect(
//!     "https://rpc.example.org",
//!     1,
//!     wallet,
//!     SubmitterConfig::default(),
//! )?);
//!
//! let contract = BoundContract::parse(
//!     "0x1111111111111111111111111111111111111111".parse::<Address>()?,
//!     &["function transferOwnership(address newOwner)"],
//! )?;
//! let op = contract.call(
//!     "transferOwnership",
//!     vec![Token::Address("0x2222222222222222222222222222222222222222".parse()?)],
//! )?;
//!
//! let submitter = TransactionSubmitter::new(node.clone(), node);
//! let handle = submitter.submit(&op).await?;
//! println!("submitted as {:?}", handle.tx_hash());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod contract;
pub mod error;
pub mod gas;
pub mod metrics;
pub mod node;
pub mod submitter;

pub use config::{GasPriceStrategy, SubmitterConfig};
pub use contract::{BoundContract, RemoteOperation};
pub use error::{SubmitError, SubmitResult};
pub use gas::Margin;
pub use node::{GasPrice, NodeClient};
pub use submitter::{Estimator, Executor, SubmissionHandle, TransactionSubmitter};
