//! Chain identifier normalization.

/// Normalize a chain identifier to its CAIP-2 form where one is known.
///
/// `"Ethereum"` → `"eip155:1"`, `"8453"` → `"eip155:8453"`, `"EIP155:10"` →
/// `"eip155:10"`. Anything else is trimmed and lowercased.
pub fn normalize_chain(chain: &str) -> String {
    let lowered = chain.trim().to_lowercase();
    let alias = match lowered.as_str() {
        "ethereum" | "eth" | "mainnet" => Some("eip155:1"),
        "optimism" | "op" => Some("eip155:10"),
        "bsc" | "bnb" => Some("eip155:56"),
        "polygon" | "matic" => Some("eip155:137"),
        "base" => Some("eip155:8453"),
        "arbitrum" | "arb" => Some("eip155:42161"),
        "solana" | "sol" => Some("solana:mainnet"),
        _ => None,
    };
    if let Some(alias) = alias {
        return alias.to_string();
    }
    if !lowered.is_empty() && lowered.bytes().all(|b| b.is_ascii_digit()) {
        return format!("eip155:{lowered}");
    }
    lowered
}

/// `true` for `eip155:` chain identifiers (after normalization).
pub fn is_evm_chain(chain: &str) -> bool {
    normalize_chain(chain).starts_with("eip155:")
}
