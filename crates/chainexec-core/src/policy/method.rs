//! Method alias resolution and the static policy table.

use serde::{Deserialize, Serialize};

/// Caching rules for one RPC method. Immutable for the process lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodPolicy {
    /// How long a fresh result is served straight from cache.
    pub ttl_seconds: u64,
    /// Grace period past expiry during which a stale record may answer a failed call.
    pub max_stale_seconds: u64,
    /// Whether a stale record may answer a failed call at all.
    pub allow_stale_fallback: bool,
}

impl MethodPolicy {
    pub const fn new(ttl_seconds: u64, max_stale_seconds: u64, allow_stale_fallback: bool) -> Self {
        Self {
            ttl_seconds,
            max_stale_seconds,
            allow_stale_fallback,
        }
    }

    /// Policy for methods missing from the table.
    pub const DEFAULT: Self = Self::new(15, 0, false);
}

impl Default for MethodPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// canonical name → policy
const POLICIES: &[(&str, MethodPolicy)] = &[
    ("eth_chainId", MethodPolicy::new(3_600, 86_400, true)),
    ("net_version", MethodPolicy::new(3_600, 86_400, true)),
    ("eth_blockNumber", MethodPolicy::new(2, 30, true)),
    ("eth_gasPrice", MethodPolicy::new(5, 30, true)),
    ("eth_maxPriorityFeePerGas", MethodPolicy::new(5, 30, true)),
    ("eth_feeHistory", MethodPolicy::new(5, 30, true)),
    ("eth_getBalance", MethodPolicy::new(10, 60, true)),
    // A stale nonce produces replacement or stuck transactions.
    ("eth_getTransactionCount", MethodPolicy::new(5, 0, false)),
    ("eth_call", MethodPolicy::new(10, 60, true)),
    ("eth_getCode", MethodPolicy::new(300, 3_600, true)),
    ("eth_getStorageAt", MethodPolicy::new(10, 60, true)),
    ("eth_estimateGas", MethodPolicy::new(10, 0, false)),
    ("eth_getTransactionReceipt", MethodPolicy::new(5, 0, false)),
];

/// lowercase alias → canonical name
const ALIASES: &[(&str, &str)] = &[
    ("chainid", "eth_chainId"),
    ("blocknumber", "eth_blockNumber"),
    ("block_number", "eth_blockNumber"),
    ("gasprice", "eth_gasPrice"),
    ("gas_price", "eth_gasPrice"),
    ("priorityfee", "eth_maxPriorityFeePerGas"),
    ("feehistory", "eth_feeHistory"),
    ("getbalance", "eth_getBalance"),
    ("balance", "eth_getBalance"),
    ("nonce", "eth_getTransactionCount"),
    ("gettransactioncount", "eth_getTransactionCount"),
    ("call", "eth_call"),
    ("getcode", "eth_getCode"),
    ("getstorageat", "eth_getStorageAt"),
    ("estimategas", "eth_estimateGas"),
    ("receipt", "eth_getTransactionReceipt"),
    ("version", "net_version"),
];

fn known(method: &str) -> Option<&'static str> {
    let lowered = method.trim().to_lowercase();
    POLICIES
        .iter()
        .map(|(name, _)| *name)
        .find(|name| name.to_lowercase() == lowered)
        .or_else(|| {
            ALIASES
                .iter()
                .find(|(alias, _)| *alias == lowered)
                .map(|(_, canonical)| *canonical)
        })
}

/// Canonical spelling used in cache keys: the table spelling for known
/// methods, otherwise the trimmed input lowercased.
pub fn canonical_method(method: &str) -> String {
    match known(method) {
        Some(name) => name.to_string(),
        None => method.trim().to_lowercase(),
    }
}

/// Spelling sent to the node. Node method names are case-sensitive, so
/// unknown methods go out exactly as given (trimmed).
pub fn wire_method(method: &str) -> String {
    match known(method) {
        Some(name) => name.to_string(),
        None => method.trim().to_string(),
    }
}

pub fn is_known_method(method: &str) -> bool {
    known(method).is_some()
}

/// Look up the policy for `method` (any spelling); unknown methods get
/// [`MethodPolicy::DEFAULT`].
pub fn policy_for(method: &str) -> MethodPolicy {
    known(method)
        .and_then(|name| POLICIES.iter().find(|(n, _)| *n == name))
        .map(|(_, policy)| *policy)
        .unwrap_or(MethodPolicy::DEFAULT)
}
