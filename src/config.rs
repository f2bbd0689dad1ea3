// src/config.rs

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use ethers::abi::Abi;
use ethers::prelude::*;

use crate::error::ConfigError;

pub const DEFAULT_ABI_PATH: &str = "abi.json";

/// Time between two hatch submissions.
pub const HATCH_INTERVAL: Duration = Duration::from_secs(30 * 60);

/// What the loop does when a step of an iteration fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the loop and surface the error.
    #[default]
    Exit,
    /// Log the error and wait for the next scheduled iteration.
    Continue,
}

impl FromStr for FailurePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exit" => Ok(FailurePolicy::Exit),
            "continue" => Ok(FailurePolicy::Continue),
            _ => Err(ConfigError::InvalidPolicy(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub operator: Address,
    pub contract: Address,
    pub signer: LocalWallet,
    pub abi: Abi,
    pub chain_id: Option<u64>,
    pub interval: Duration,
    pub on_error: FailurePolicy,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let rpc_url = lookup("RPC_URL")
            .or_else(|| lookup("BSC"))
            .ok_or(ConfigError::Missing("RPC_URL"))?;

        let operator = parse_address("ADDRESS", &required("ADDRESS")?)?;
        let contract = parse_address("TOKEN_ADDRESS", &required("TOKEN_ADDRESS")?)?;

        // never echo the key back in the error
        let signer: LocalWallet = required("PRIVATE_KEY")?
            .trim()
            .parse()
            .map_err(|e: WalletError| ConfigError::InvalidKey(e.to_string()))?;

        let chain_id = match lookup("CHAIN_ID") {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidChainId(raw.clone()))?,
            ),
            None => None,
        };

        let signer = match chain_id {
            Some(id) => signer.with_chain_id(id),
            None => signer,
        };

        let on_error = match lookup("ON_ERROR") {
            Some(raw) => raw.parse()?,
            None => FailurePolicy::default(),
        };

        let abi_path = lookup("ABI_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ABI_PATH));
        let abi = load_abi(&abi_path)?;

        Ok(Config {
            rpc_url,
            operator,
            contract,
            signer,
            abi,
            chain_id,
            interval: HATCH_INTERVAL,
            on_error,
        })
    }
}

fn parse_address(var: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidAddress {
        var,
        value: value.to_string(),
    })
}

/// Loads the contract interface. A missing file is not an error: the
/// contract handle is created with no methods and calls fail when made.
pub fn load_abi(path: &Path) -> Result<Abi, ConfigError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::warn!("ABI file {} not found, using an empty interface", path.display());
            return Ok(Abi::default());
        }
        Err(source) => {
            return Err(ConfigError::AbiRead {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let parse_err = |source| ConfigError::AbiParse {
        path: path.to_path_buf(),
        source,
    };

    let mut value: serde_json::Value = serde_json::from_str(&raw).map_err(parse_err)?;

    // hardhat / foundry artifacts wrap the interface in an `abi` field
    if let Some(inner) = value.get_mut("abi") {
        value = inner.take();
    }

    serde_json::from_value(value).map_err(parse_err)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base_env(abi_path: &Path) -> HashMap<String, String> {
        let mut vars = env(&[
            ("BSC", "https://bsc-dataseed.binance.org"),
            ("ADDRESS", TEST_OPERATOR),
            ("TOKEN_ADDRESS", TEST_CONTRACT),
            ("PRIVATE_KEY", TEST_KEY),
        ]);
        vars.insert("ABI_PATH".into(), abi_path.display().to_string());
        vars
    }

    #[test]
    fn loads_config_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let vars = base_env(&dir.path().join("missing.json"));

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.rpc_url, "https://bsc-dataseed.binance.org");
        assert_eq!(config.operator, TEST_OPERATOR.parse::<Address>().unwrap());
        assert_eq!(config.signer.address(), config.operator);
        assert_eq!(config.chain_id, None);
        assert_eq!(config.interval, Duration::from_secs(1800));
        assert_eq!(config.on_error, FailurePolicy::Exit);
        assert!(config.abi.functions.is_empty());
    }

    #[test]
    fn rpc_url_takes_precedence_over_bsc() {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = base_env(&dir.path().join("missing.json"));
        vars.insert("RPC_URL".into(), "http://localhost:8545".into());

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
    }

    #[test]
    fn chain_id_is_applied_to_the_signer() {
        let dir = tempfile::tempdir().unwrap();
        let mut vars = base_env(&dir.path().join("missing.json"));
        vars.insert("CHAIN_ID".into(), "97".into());
        vars.insert("ON_ERROR".into(), "Continue".into());

        let config = Config::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.chain_id, Some(97));
        assert_eq!(config.signer.chain_id(), 97);
        assert_eq!(config.on_error, FailurePolicy::Continue);
    }

    #[test]
    fn reports_missing_variables() {
        let vars = env(&[("BSC", "http://localhost:8545"), ("ADDRESS", TEST_OPERATOR)]);

        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();

        assert!(matches!(err, ConfigError::Missing("TOKEN_ADDRESS")));
    }

    #[test]
    fn rejects_malformed_values() {
        let dir = tempfile::tempdir().unwrap();
        let abi_path = dir.path().join("missing.json");

        let mut vars = base_env(&abi_path);
        vars.insert("TOKEN_ADDRESS".into(), "0x1234".into());
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidAddress { var: "TOKEN_ADDRESS", .. }));

        let mut vars = base_env(&abi_path);
        vars.insert("PRIVATE_KEY".into(), "not-a-key".into());
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidKey(_)));
        assert!(!err.to_string().contains("not-a-key"));

        let mut vars = base_env(&abi_path);
        vars.insert("ON_ERROR".into(), "retry".into());
        let err = Config::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPolicy(_)));
    }

    #[test]
    fn loads_bare_abi_and_artifacts() {
        let mut bare = tempfile::NamedTempFile::new().unwrap();
        bare.write_all(HATCH_ABI.as_bytes()).unwrap();
        let abi = load_abi(bare.path()).unwrap();
        assert!(abi.function("hatchEggs").is_ok());

        let mut artifact = tempfile::NamedTempFile::new().unwrap();
        write!(artifact, r#"{{"contractName": "Miner", "abi": {}}}"#, HATCH_ABI).unwrap();
        let abi = load_abi(artifact.path()).unwrap();
        assert!(abi.function("hatchEggs").is_ok());
    }

    #[test]
    fn malformed_abi_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_abi(file.path()).unwrap_err();

        assert!(matches!(err, ConfigError::AbiParse { .. }));
    }
}
