//! Static bridge and swap quote registries.

use crate::chain::normalize_chain;
use crate::types::{BridgeQuote, SwapQuote, TradeType};

/// Source of same-route quote candidates.
pub trait QuoteRegistry: Send + Sync {
    /// Bridge rows for `asset` from `from_chain` to `to_chain`, in registry order.
    fn bridge_candidates(&self, from_chain: &str, to_chain: &str, asset: &str) -> Vec<BridgeQuote>;

    /// Swap rows for `from_asset → to_asset` on `chain` supporting `trade_type`.
    fn swap_candidates(
        &self,
        chain: &str,
        from_asset: &str,
        to_asset: &str,
        trade_type: TradeType,
    ) -> Vec<SwapQuote>;
}

// (provider, from, to, asset, fee_bps, eta_seconds)
const BRIDGE_ROWS: &[(&str, &str, &str, &str, u32, u64)] = &[
    ("across", "eip155:1", "eip155:8453", "USDC", 5, 120),
    ("stargate", "eip155:1", "eip155:8453", "USDC", 6, 45),
    ("cctp", "eip155:1", "eip155:8453", "USDC", 0, 1_020),
    ("across", "eip155:8453", "eip155:1", "USDC", 5, 180),
    ("cctp", "eip155:8453", "eip155:1", "USDC", 0, 1_020),
    ("across", "eip155:1", "eip155:42161", "USDC", 4, 90),
    ("stargate", "eip155:1", "eip155:42161", "USDC", 6, 45),
    ("across", "eip155:1", "eip155:42161", "ETH", 5, 90),
    ("hop", "eip155:1", "eip155:42161", "ETH", 8, 300),
    ("across", "eip155:1", "eip155:10", "ETH", 5, 90),
    ("hop", "eip155:1", "eip155:10", "ETH", 8, 300),
    ("across", "eip155:42161", "eip155:8453", "ETH", 4, 60),
    ("stargate", "eip155:42161", "eip155:8453", "ETH", 6, 40),
    ("cctp", "eip155:1", "solana:mainnet", "USDC", 0, 1_200),
    ("wormhole", "eip155:1", "solana:mainnet", "USDC", 10, 900),
];

// (provider, chain, from, to, trade_type, fee_bps, price_impact_bps)
const SWAP_ROWS: &[(&str, &str, &str, &str, TradeType, u32, u32)] = &[
    ("uniswap", "eip155:1", "ETH", "USDC", TradeType::ExactInput, 30, 5),
    ("uniswap", "eip155:1", "ETH", "USDC", TradeType::ExactOutput, 30, 5),
    ("sushiswap", "eip155:1", "ETH", "USDC", TradeType::ExactInput, 30, 12),
    ("1inch", "eip155:1", "ETH", "USDC", TradeType::ExactInput, 10, 8),
    ("uniswap", "eip155:1", "USDC", "ETH", TradeType::ExactInput, 30, 5),
    ("uniswap", "eip155:1", "USDC", "ETH", TradeType::ExactOutput, 30, 5),
    ("1inch", "eip155:1", "USDC", "ETH", TradeType::ExactInput, 10, 8),
    ("uniswap", "eip155:8453", "ETH", "USDC", TradeType::ExactInput, 5, 3),
    ("uniswap", "eip155:8453", "ETH", "USDC", TradeType::ExactOutput, 5, 3),
    ("aerodrome", "eip155:8453", "ETH", "USDC", TradeType::ExactInput, 4, 6),
    ("uniswap", "eip155:42161", "ETH", "USDC", TradeType::ExactInput, 5, 4),
    ("uniswap", "eip155:42161", "ETH", "USDC", TradeType::ExactOutput, 5, 4),
    ("camelot", "eip155:42161", "ETH", "USDC", TradeType::ExactInput, 30, 10),
    ("jupiter", "solana:mainnet", "SOL", "USDC", TradeType::ExactInput, 5, 4),
    ("orca", "solana:mainnet", "SOL", "USDC", TradeType::ExactInput, 30, 6),
    ("raydium", "solana:mainnet", "SOL", "USDC", TradeType::ExactInput, 25, 9),
];

/// Immutable in-memory registry.
#[derive(Debug, Clone, Default)]
pub struct StaticQuoteRegistry {
    bridges: Vec<BridgeQuote>,
    swaps: Vec<SwapQuote>,
}

impl StaticQuoteRegistry {
    pub fn new(bridges: Vec<BridgeQuote>, swaps: Vec<SwapQuote>) -> Self {
        Self { bridges, swaps }
    }

    /// The bundled provider table.
    pub fn builtin() -> Self {
        let bridges = BRIDGE_ROWS
            .iter()
            .map(|&(provider, from, to, asset, fee_bps, eta_seconds)| BridgeQuote {
                provider: provider.into(),
                from_chain: from.into(),
                to_chain: to.into(),
                asset_symbol: asset.into(),
                fee_bps,
                eta_seconds,
            })
            .collect();
        let swaps = SWAP_ROWS
            .iter()
            .map(|&(provider, chain, from, to, trade_type, fee_bps, price_impact_bps)| SwapQuote {
                provider: provider.into(),
                chain: chain.into(),
                from_asset: from.into(),
                to_asset: to.into(),
                trade_type,
                fee_bps,
                price_impact_bps,
            })
            .collect();
        Self { bridges, swaps }
    }

    pub fn bridges(&self) -> &[BridgeQuote] {
        &self.bridges
    }

    pub fn swaps(&self) -> &[SwapQuote] {
        &self.swaps
    }
}

impl QuoteRegistry for StaticQuoteRegistry {
    fn bridge_candidates(&self, from_chain: &str, to_chain: &str, asset: &str) -> Vec<BridgeQuote> {
        let (from, to) = (normalize_chain(from_chain), normalize_chain(to_chain));
        let asset = asset.trim();
        self.bridges
            .iter()
            .filter(|q| {
                normalize_chain(&q.from_chain) == from
                    && normalize_chain(&q.to_chain) == to
                    && q.asset_symbol.eq_ignore_ascii_case(asset)
            })
            .cloned()
            .collect()
    }

    fn swap_candidates(
        &self,
        chain: &str,
        from_asset: &str,
        to_asset: &str,
        trade_type: TradeType,
    ) -> Vec<SwapQuote> {
        let chain = normalize_chain(chain);
        let (from_asset, to_asset) = (from_asset.trim(), to_asset.trim());
        self.swaps
            .iter()
            .filter(|q| {
                normalize_chain(&q.chain) == chain
                    && q.trade_type == trade_type
                    && q.from_asset.eq_ignore_ascii_case(from_asset)
                    && q.to_asset.eq_ignore_ascii_case(to_asset)
            })
            .cloned()
            .collect()
    }
}
