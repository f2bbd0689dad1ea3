// src/error.rs

use std::fmt;
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("{var} is not a valid address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("PRIVATE_KEY is not a valid signing key: {0}")]
    InvalidKey(String),

    #[error("CHAIN_ID is not a valid chain id: {0}")]
    InvalidChainId(String),

    #[error("ON_ERROR must be `exit` or `continue`, got {0}")]
    InvalidPolicy(String),

    #[error("could not read ABI file {path}: {source}")]
    AbiRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse ABI file {path}: {source}")]
    AbiParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// Errors coming back from the node, the contract ABI or the local signer.
#[derive(thiserror::Error, Debug)]
pub enum EthError {
    #[error("rpc: {0}")]
    Rpc(String),

    #[error("abi: {0}")]
    Abi(String),

    #[error("signing: {0}")]
    Signing(String),
}

impl From<ethers::providers::ProviderError> for EthError {
    fn from(e: ethers::providers::ProviderError) -> Self {
        EthError::Rpc(e.to_string())
    }
}

impl From<ethers::signers::WalletError> for EthError {
    fn from(e: ethers::signers::WalletError) -> Self {
        EthError::Signing(e.to_string())
    }
}

/// The stage of a hatch iteration an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Estimate,
    GasPrice,
    Nonce,
    Build,
    Sign,
    Submit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Estimate => "gas estimation",
            Step::GasPrice => "gas price lookup",
            Step::Nonce => "nonce lookup",
            Step::Build => "transaction build",
            Step::Sign => "signing",
            Step::Submit => "submission",
        };
        f.write_str(name)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum HatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("{step} failed: {source}")]
    Step {
        step: Step,
        #[source]
        source: EthError,
    },
}

impl HatchError {
    /// Tags an [`EthError`] with the step it came from, for use with `map_err`.
    pub fn at(step: Step) -> impl FnOnce(EthError) -> HatchError {
        move |source| HatchError::Step { step, source }
    }

    pub fn step(&self) -> Option<Step> {
        match self {
            HatchError::Step { step, .. } => Some(*step),
            _ => None,
        }
    }
}
