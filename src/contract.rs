//! Capability interface over a deployed contract
//!
//! Operation names are resolved against the contract ABI when a call is
//! constructed, so an unknown name fails at binding time instead of surfacing
//! from a remote node halfway through submission.

use crate::error::{SubmitError, SubmitResult};

use ethers::abi::{self, Abi, Function, Token};
use ethers::types::{Address, Bytes};

/// A contract address bound to its interface.
#[derive(Debug, Clone)]
pub struct BoundContract {
    address: Address,
    abi: Abi,
}

impl BoundContract {
    /// Bind an already-parsed ABI to a deployed address.
    pub fn bind(address: Address, abi: Abi) -> Self {
        Self { address, abi }
    }

    /// Bind from human-readable signatures, e.g.
    /// `["function transferOwnership(address newOwner)"]`.
    pub fn parse(address: Address, signatures: &[&str]) -> SubmitResult<Self> {
        let abi = abi::parse_abi(signatures)
            .map_err(|e| SubmitError::InvalidConfiguration(format!("invalid ABI: {}", e)))?;
        Ok(Self::bind(address, abi))
    }

    /// Contract address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Whether the interface exposes an operation with this name.
    pub fn has_operation(&self, name: &str) -> bool {
        self.abi.function(name).is_ok()
    }

    /// Resolve an operation and bind it to a set of arguments.
    ///
    /// Fails with `OperationNotFound` if the name does not exist on the
    /// interface. Argument values are not checked here; a shape mismatch is
    /// rejected when the calldata is encoded for estimation.
    pub fn call(&self, name: &str, args: Vec<Token>) -> SubmitResult<RemoteOperation> {
        let function = self
            .abi
            .function(name)
            .map_err(|_| SubmitError::OperationNotFound {
                name: name.to_string(),
            })?
            .clone();

        Ok(RemoteOperation {
            function,
            to: self.address,
            args,
        })
    }
}

/// A resolved operation bound to a target address and argument list.
///
/// Immutable once constructed; created fresh per submission and discarded
/// afterwards.
#[derive(Debug, Clone)]
pub struct RemoteOperation {
    function: Function,
    to: Address,
    args: Vec<Token>,
}

impl RemoteOperation {
    /// Operation name as it appears on the interface.
    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Target contract address.
    pub fn to(&self) -> Address {
        self.to
    }

    /// ABI-encode selector and arguments.
    pub fn calldata(&self) -> Result<Bytes, abi::Error> {
        self.function.encode_input(&self.args).map(Bytes::from)
    }
}
