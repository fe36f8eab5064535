//! Network and paratime configuration.
//!
//! Loaded from TOML. A file lists networks by name, each with its consensus chain
//! context and the paratimes deployed on it:
//!
//! ```toml
//! default = "mainnet"
//!
//! [mainnet]
//! chain_context = "53852332637bacb61b91b6411ab4095168ba02a50be4c3f82448438826f23898"
//! rpc = "grpc.oasis.dev:443"
//! denomination = { symbol = "ROSE", decimals = 9 }
//!
//! [mainnet.paratimes]
//! default = "emerald"
//!
//! [mainnet.paratimes.emerald]
//! id = "000000000000000000000000000000000000000000000000e2eaa99fc008f87f"
//! denominations = { _ = { symbol = "ROSE", decimals = 18 } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use oasis_crypto::ChainContext;
use oasis_types::{Hash, Namespace};
use serde::{Deserialize, Serialize};

use crate::error::WalletError;

/// Key of the native denomination in [`ParaTime::denominations`].
pub const NATIVE_DENOMINATION_KEY: &str = "_";

/// Largest number of decimals a `u128` amount can carry.
pub const MAX_DECIMALS: u8 = 38;

/// Decimals assumed for denominations with no configured info.
const DEFAULT_DECIMALS: u8 = 9;

/// Identifiers are non-empty and made of lowercase ASCII letters, digits, `_` and `-`.
pub fn validate_identifier(id: &str) -> Result<(), WalletError> {
    if id.is_empty() {
        return Err(WalletError::Config("identifier cannot be empty".into()));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
    {
        return Err(WalletError::Config(format!(
            "malformed identifier '{id}': only lowercase letters, digits, '_' and '-' are allowed"
        )));
    }
    Ok(())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenominationInfo {
    pub symbol: String,
    pub decimals: u8,
}

impl DenominationInfo {
    pub fn validate(&self) -> Result<(), WalletError> {
        if self.symbol.is_empty() {
            return Err(WalletError::Config("denomination symbol cannot be empty".into()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(WalletError::Config(format!(
                "denomination '{}': {} decimals exceeds the maximum of {MAX_DECIMALS}",
                self.symbol, self.decimals
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaTime {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Runtime identifier, hex encoded.
    pub id: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub denominations: BTreeMap<String, DenominationInfo>,
    /// Denomination representing the consensus layer token, if consensus transfers are
    /// supported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consensus_denomination: Option<String>,
}

impl ParaTime {
    pub fn validate(&self) -> Result<(), WalletError> {
        self.namespace()?;
        for (name, info) in &self.denominations {
            if name.is_empty() {
                return Err(WalletError::Config("denomination name cannot be empty".into()));
            }
            info.validate()
                .map_err(|e| WalletError::Config(format!("denomination '{name}': {e}")))?;
        }
        if let Some(denom) = &self.consensus_denomination {
            if self.lookup_denomination(denom).is_none() {
                return Err(WalletError::Config(format!(
                    "invalid consensus denomination '{denom}'"
                )));
            }
        }
        Ok(())
    }

    pub fn namespace(&self) -> Result<Namespace, WalletError> {
        self.id
            .parse()
            .map_err(|e| WalletError::Config(format!("bad paratime identifier: {e}")))
    }

    /// Display info for `denomination`. Unknown denominations fall back to their own
    /// name as symbol with 9 decimals.
    pub fn denomination_info(&self, denomination: &str) -> DenominationInfo {
        self.lookup_denomination(denomination)
            .cloned()
            .unwrap_or_else(|| DenominationInfo {
                symbol: denomination.to_string(),
                decimals: DEFAULT_DECIMALS,
            })
    }

    fn lookup_denomination(&self, denomination: &str) -> Option<&DenominationInfo> {
        let key = if denomination.is_empty() {
            NATIVE_DENOMINATION_KEY
        } else {
            denomination
        };
        self.denominations
            .get(key)
            .or_else(|| self.denominations.get(&key.to_lowercase()))
    }
}

macro_rules! named_collection {
    ($name:ident, $item:ty, $what:literal) => {
        impl $name {
            pub fn validate(&self) -> Result<(), WalletError> {
                if !self.default.is_empty() && !self.all.contains_key(&self.default) {
                    return Err(WalletError::Config(format!(
                        concat!("default ", $what, " '{}' does not exist"),
                        self.default
                    )));
                }
                for (name, item) in &self.all {
                    validate_identifier(name)?;
                    item.validate().map_err(|e| {
                        WalletError::Config(format!(concat!($what, " '{}': {}"), name, e))
                    })?;
                }
                Ok(())
            }

            /// Add an entry. The first entry added becomes the default.
            pub fn add(&mut self, name: &str, item: $item) -> Result<(), WalletError> {
                if self.all.contains_key(name) {
                    return Err(WalletError::Config(format!(
                        concat!($what, " '{}' already exists"),
                        name
                    )));
                }
                validate_identifier(name)?;
                item.validate()?;
                self.all.insert(name.to_string(), item);
                if self.default.is_empty() {
                    self.default = name.to_string();
                }
                Ok(())
            }

            /// Remove an entry. Removing the default leaves no default.
            pub fn remove(&mut self, name: &str) -> Result<$item, WalletError> {
                let item = self.all.remove(name).ok_or_else(|| {
                    WalletError::Config(format!(concat!($what, " '{}' does not exist"), name))
                })?;
                if self.default == name {
                    self.default.clear();
                }
                Ok(item)
            }

            pub fn set_default(&mut self, name: &str) -> Result<(), WalletError> {
                if !self.all.contains_key(name) {
                    return Err(WalletError::Config(format!(
                        concat!($what, " '{}' does not exist"),
                        name
                    )));
                }
                self.default = name.to_string();
                Ok(())
            }

            pub fn get(&self, name: &str) -> Option<&$item> {
                self.all.get(name)
            }

            pub fn get_default(&self) -> Option<&$item> {
                self.all.get(&self.default)
            }
        }
    };
}

/// Paratimes deployed on a network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParaTimes {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(flatten)]
    pub all: BTreeMap<String, ParaTime>,
}

named_collection!(ParaTimes, ParaTime, "paratime");

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Consensus layer chain context, hex encoded.
    pub chain_context: String,
    pub rpc: String,
    pub denomination: DenominationInfo,
    #[serde(default)]
    pub paratimes: ParaTimes,
}

impl Network {
    pub fn validate(&self) -> Result<(), WalletError> {
        self.chain_context
            .parse::<Hash>()
            .map_err(|e| WalletError::Config(format!("malformed chain context: {e}")))?;
        self.denomination.validate()?;
        self.paratimes.validate()
    }

    /// Whether the RPC endpoint is a local UNIX socket.
    pub fn is_local_rpc(&self) -> bool {
        self.rpc.starts_with("unix:")
    }

    /// The context transactions for `paratime` on this network are signed under.
    pub fn signature_context(&self, paratime: &ParaTime) -> Result<ChainContext, WalletError> {
        Ok(ChainContext::for_runtime(
            &paratime.namespace()?,
            &self.chain_context,
        ))
    }
}

/// All configured networks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Networks {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default: String,
    #[serde(flatten)]
    pub all: BTreeMap<String, Network>,
}

named_collection!(Networks, Network, "network");

impl Networks {
    /// Load and validate networks from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, WalletError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| WalletError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate networks from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, WalletError> {
        let networks: Self = toml::from_str(s).map_err(|e| WalletError::Config(e.to_string()))?;
        networks.validate()?;
        Ok(networks)
    }

    pub fn to_toml_string(&self) -> Result<String, WalletError> {
        toml::to_string_pretty(self).map_err(|e| WalletError::Config(e.to_string()))
    }

    /// Resolve a network and paratime by name, falling back to the defaults.
    pub fn resolve(
        &self,
        network: Option<&str>,
        paratime: Option<&str>,
    ) -> Result<(&Network, &ParaTime), WalletError> {
        let network_name = network.unwrap_or(&self.default);
        let net = self.get(network_name).ok_or_else(|| {
            WalletError::Config(format!("network '{network_name}' does not exist"))
        })?;
        let paratime_name = paratime.unwrap_or(&net.paratimes.default);
        let pt = net.paratimes.get(paratime_name).ok_or_else(|| {
            WalletError::Config(format!(
                "paratime '{paratime_name}' does not exist on network '{network_name}'"
            ))
        })?;
        Ok((net, pt))
    }
}

fn native(symbol: &str, decimals: u8) -> BTreeMap<String, DenominationInfo> {
    BTreeMap::from([(
        NATIVE_DENOMINATION_KEY.to_string(),
        DenominationInfo {
            symbol: symbol.to_string(),
            decimals,
        },
    )])
}

fn paratime(id: &str, symbol: &str, decimals: u8) -> ParaTime {
    ParaTime {
        id: id.to_string(),
        denominations: native(symbol, decimals),
        ..Default::default()
    }
}

impl Default for Networks {
    /// The publicly known networks.
    fn default() -> Self {
        let mainnet = Network {
            description: String::new(),
            chain_context: "53852332637bacb61b91b6411ab4095168ba02a50be4c3f82448438826f23898"
                .into(),
            rpc: "grpc.oasis.dev:443".into(),
            denomination: DenominationInfo {
                symbol: "ROSE".into(),
                decimals: 9,
            },
            paratimes: ParaTimes {
                default: "emerald".into(),
                all: BTreeMap::from([
                    (
                        "cipher".to_string(),
                        paratime(
                            "000000000000000000000000000000000000000000000000e199119c992377cb",
                            "ROSE",
                            9,
                        ),
                    ),
                    (
                        "emerald".to_string(),
                        paratime(
                            "000000000000000000000000000000000000000000000000e2eaa99fc008f87f",
                            "ROSE",
                            18,
                        ),
                    ),
                ]),
            },
        };
        let testnet = Network {
            description: String::new(),
            chain_context: "5ba68bc5e01e06f755c4c044dd11ec508e4c17f1faf40c0e67874388437a9e55"
                .into(),
            rpc: "testnet.grpc.oasis.dev:443".into(),
            denomination: DenominationInfo {
                symbol: "TEST".into(),
                decimals: 9,
            },
            paratimes: ParaTimes {
                default: "emerald".into(),
                all: BTreeMap::from([
                    (
                        "cipher".to_string(),
                        paratime(
                            "0000000000000000000000000000000000000000000000000000000000000000",
                            "TEST",
                            9,
                        ),
                    ),
                    (
                        "emerald".to_string(),
                        paratime(
                            "00000000000000000000000000000000000000000000000072c8215e60d5bca7",
                            "TEST",
                            18,
                        ),
                    ),
                ]),
            },
        };
        Self {
            default: "mainnet".into(),
            all: BTreeMap::from([
                ("mainnet".to_string(), mainnet),
                ("testnet".to_string(), testnet),
            ]),
        }
    }
}
