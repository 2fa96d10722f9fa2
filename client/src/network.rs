//! Cluster identification from the genesis hash.

use {
    serde::{Deserialize, Serialize},
    solana_hash::Hash,
    std::fmt,
};

const DEVNET_GENESIS_HASH: &str = "EtWTRABZaYq6iMfeYKouRu166VU2xqa1wcaWoxPkrZBG";
const MAINNET_BETA_GENESIS_HASH: &str = "5eykt4UsFv8P8NJdTREpY1vzqKqZKvdpKuc147dw2N9d";
const TESTNET_GENESIS_HASH: &str = "4uhcVJyU9pJkvQyS88uRDiswHXSCkY3zQawwpjk2NsNY";

/// The public cluster an endpoint belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Devnet,
    MainnetBeta,
    Testnet,
    Unknown,
}

impl Network {
    /// Unrecognized hashes map to [`Network::Unknown`] rather than failing.
    pub fn from_genesis_hash(genesis_hash: &Hash) -> Self {
        match genesis_hash.to_string().as_str() {
            DEVNET_GENESIS_HASH => Self::Devnet,
            MAINNET_BETA_GENESIS_HASH => Self::MainnetBeta,
            TESTNET_GENESIS_HASH => Self::Testnet,
            _ => Self::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Devnet => "Devnet",
            Self::MainnetBeta => "Mainnet Beta",
            Self::Testnet => "Testnet",
            Self::Unknown => "Unknown network",
        }
    }

    /// Genesis hash of a known cluster.
    pub fn genesis_hash(self) -> Option<Hash> {
        let hash = match self {
            Self::Devnet => DEVNET_GENESIS_HASH,
            Self::MainnetBeta => MAINNET_BETA_GENESIS_HASH,
            Self::Testnet => TESTNET_GENESIS_HASH,
            Self::Unknown => return None,
        };
        hash.parse().ok()
    }

    /// The program is deployed on Devnet.
    pub fn is_supported(self) -> bool {
        self == Self::Devnet
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
