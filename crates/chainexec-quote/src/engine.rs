//! Request-level quoting: validation, registry lookup and selection.

use alloy_primitives::U256;
use serde::Serialize;

use crate::chain::{is_evm_chain, normalize_chain};
use crate::error::QuoteError;
use crate::registry::QuoteRegistry;
use crate::select::{select_bridge, select_swap};
use crate::types::{
    BridgeStrategy, ProviderConstraint, QuoteSource, SwapStrategy, TradeType, EXACT_OUTPUT_PROVIDER,
};

/// A validated bridge quote request.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeQuoteRequest {
    pub from_chain: String,
    pub to_chain: String,
    pub asset: String,
    pub amount: U256,
    pub providers: ProviderConstraint,
    pub strategy: BridgeStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeQuoteResponse {
    pub provider: String,
    pub from_chain: String,
    pub to_chain: String,
    pub asset: String,
    pub amount_in: String,
    pub estimated_amount_out: String,
    pub fee_bps: u32,
    pub eta_seconds: u64,
    pub strategy: BridgeStrategy,
    pub source: QuoteSource,
}

/// A validated swap quote request. `amount` is the input for exact-input
/// trades and the desired output for exact-output trades.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapQuoteRequest {
    pub chain: String,
    pub from_asset: String,
    pub to_asset: String,
    pub amount: U256,
    pub trade_type: TradeType,
    pub providers: ProviderConstraint,
    pub strategy: SwapStrategy,
    /// Informational only; never enters amount math.
    pub slippage_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteResponse {
    pub provider: String,
    pub chain: String,
    pub from_asset: String,
    pub to_asset: String,
    pub amount_in: String,
    pub estimated_amount_out: String,
    pub fee_bps: u32,
    pub price_impact_bps: u32,
    pub trade_type: TradeType,
    pub strategy: SwapStrategy,
    pub source: QuoteSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_pct: Option<f64>,
}

/// Quote the best bridge route for `req`.
pub fn quote_bridge(
    registry: &dyn QuoteRegistry,
    req: &BridgeQuoteRequest,
) -> Result<BridgeQuoteResponse, QuoteError> {
    require("from", &req.from_chain)?;
    require("to", &req.to_chain)?;
    require("asset", &req.asset)?;

    let candidates = registry.bridge_candidates(&req.from_chain, &req.to_chain, &req.asset);
    let picked = select_bridge(&candidates, req.amount, &req.providers, req.strategy)?;

    Ok(BridgeQuoteResponse {
        provider: picked.quote.provider,
        from_chain: normalize_chain(&req.from_chain),
        to_chain: normalize_chain(&req.to_chain),
        asset: picked.quote.asset_symbol,
        amount_in: picked.computed_in_amount.to_string(),
        estimated_amount_out: picked.computed_out_amount.to_string(),
        fee_bps: picked.quote.fee_bps,
        eta_seconds: picked.quote.eta_seconds,
        strategy: req.strategy,
        source: QuoteSource::StaticRegistry,
    })
}

/// Quote the best swap route for `req`.
pub fn quote_swap(
    registry: &dyn QuoteRegistry,
    req: &SwapQuoteRequest,
) -> Result<SwapQuoteResponse, QuoteError> {
    require("chain", &req.chain)?;
    require("fromAsset", &req.from_asset)?;
    require("toAsset", &req.to_asset)?;

    // An unsupported exact-output combination is reported before any field-level check.
    let (providers, source) = match req.trade_type {
        TradeType::ExactInput => (req.providers.clone(), QuoteSource::StaticRegistry),
        TradeType::ExactOutput => resolve_exact_output(&req.chain, &req.providers)?,
    };
    validate_slippage(req.slippage_pct, &req.providers)?;

    let candidates =
        registry.swap_candidates(&req.chain, &req.from_asset, &req.to_asset, req.trade_type);
    let picked = select_swap(&candidates, req.amount, req.trade_type, &providers, req.strategy)?;

    Ok(SwapQuoteResponse {
        provider: picked.quote.provider,
        chain: normalize_chain(&req.chain),
        from_asset: picked.quote.from_asset,
        to_asset: picked.quote.to_asset,
        amount_in: picked.computed_in_amount.to_string(),
        estimated_amount_out: picked.computed_out_amount.to_string(),
        fee_bps: picked.quote.fee_bps,
        price_impact_bps: picked.quote.price_impact_bps,
        trade_type: req.trade_type,
        strategy: req.strategy,
        source,
        slippage_pct: req.slippage_pct,
    })
}

/// Exact-output trades are served by the exact-output provider on EVM chains
/// only. Returns the constraint to filter with and the source tag.
pub fn resolve_exact_output(
    chain: &str,
    constraint: &ProviderConstraint,
) -> Result<(ProviderConstraint, QuoteSource), QuoteError> {
    if !is_evm_chain(chain) {
        return Err(QuoteError::unsupported(format!(
            "exact_output swaps require an eip155 chain (got {chain:?})"
        )));
    }

    if let Some(provider) = constraint.exact.as_deref() {
        if constraint.is_exact(EXACT_OUTPUT_PROVIDER) {
            return Ok((ProviderConstraint::exact(EXACT_OUTPUT_PROVIDER), QuoteSource::StaticRegistry));
        }
        return Err(QuoteError::unsupported(format!(
            "exact_output swaps are only supported by {EXACT_OUTPUT_PROVIDER} (got {provider:?})"
        )));
    }

    if !constraint.priority.is_empty() {
        if constraint.priority.iter().any(|p| p == EXACT_OUTPUT_PROVIDER) {
            return Ok((ProviderConstraint::exact(EXACT_OUTPUT_PROVIDER), QuoteSource::StaticRegistry));
        }
        return Err(QuoteError::unsupported(format!(
            "exact_output swaps are only supported by {EXACT_OUTPUT_PROVIDER}; providers list excludes it"
        )));
    }

    Ok((
        ProviderConstraint::exact(EXACT_OUTPUT_PROVIDER),
        QuoteSource::StaticRegistryDefaultProvider,
    ))
}

/// Slippage must lie in `(0, 100]` and is only meaningful for an explicit
/// exact-output provider request.
pub fn validate_slippage(
    slippage_pct: Option<f64>,
    constraint: &ProviderConstraint,
) -> Result<(), QuoteError> {
    let Some(pct) = slippage_pct else {
        return Ok(());
    };
    if !(pct > 0.0 && pct <= 100.0) {
        return Err(QuoteError::validation(format!(
            "slippagePct must be in (0, 100] (got {pct})"
        )));
    }
    if !constraint.is_exact(EXACT_OUTPUT_PROVIDER) {
        return Err(QuoteError::validation(format!(
            "slippagePct is only accepted with provider={EXACT_OUTPUT_PROVIDER}"
        )));
    }
    Ok(())
}

fn require(field: &str, value: &str) -> Result<(), QuoteError> {
    if value.trim().is_empty() {
        return Err(QuoteError::validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::swap_amount_out;
    use crate::registry::StaticQuoteRegistry;
    use crate::types::{BridgeQuote, SwapQuote};

    fn u(n: u64) -> U256 {
        U256::from(n)
    }

    fn swap_req(chain: &str, trade_type: TradeType, providers: ProviderConstraint) -> SwapQuoteRequest {
        SwapQuoteRequest {
            chain: chain.into(),
            from_asset: "ETH".into(),
            to_asset: "USDC".into(),
            amount: u(1_000_000),
            trade_type,
            providers,
            strategy: SwapStrategy::BestOut,
            slippage_pct: None,
        }
    }

    #[test]
    fn bridge_best_out_vs_fastest() {
        let registry = StaticQuoteRegistry::new(
            vec![
                BridgeQuote {
                    provider: "A".into(),
                    from_chain: "eip155:1".into(),
                    to_chain: "eip155:10".into(),
                    asset_symbol: "USDC".into(),
                    fee_bps: 10,
                    eta_seconds: 100,
                },
                BridgeQuote {
                    provider: "B".into(),
                    from_chain: "eip155:1".into(),
                    to_chain: "eip155:10".into(),
                    asset_symbol: "USDC".into(),
                    fee_bps: 50,
                    eta_seconds: 10,
                },
            ],
            vec![],
        );
        let mut req = BridgeQuoteRequest {
            from_chain: "ethereum".into(),
            to_chain: "optimism".into(),
            asset: "usdc".into(),
            amount: u(1_000_000),
            providers: ProviderConstraint::default(),
            strategy: BridgeStrategy::BestOut,
        };
        let best = quote_bridge(&registry, &req).unwrap();
        assert_eq!(best.provider, "A");
        assert_eq!(best.estimated_amount_out, "999000");
        assert_eq!(best.from_chain, "eip155:1");

        req.strategy = BridgeStrategy::Fastest;
        let fast = quote_bridge(&registry, &req).unwrap();
        assert_eq!(fast.provider, "B");
        assert_eq!(fast.estimated_amount_out, "995000");
        assert_eq!(fast.eta_seconds, 10);
    }

    #[test]
    fn bridge_unknown_route_is_no_route() {
        let req = BridgeQuoteRequest {
            from_chain: "eip155:1".into(),
            to_chain: "eip155:1".into(),
            asset: "USDC".into(),
            amount: u(1),
            providers: ProviderConstraint::default(),
            strategy: BridgeStrategy::BestOut,
        };
        let err = quote_bridge(&StaticQuoteRegistry::builtin(), &req).unwrap_err();
        assert!(matches!(err, QuoteError::NoRoute(_)));
    }

    #[test]
    fn exact_output_defaults_to_uniswap_with_distinct_source() {
        let registry = StaticQuoteRegistry::builtin();
        let resp = quote_swap(
            &registry,
            &swap_req("eip155:1", TradeType::ExactOutput, ProviderConstraint::default()),
        )
        .unwrap();
        assert_eq!(resp.provider, "uniswap");
        assert_eq!(resp.source, QuoteSource::StaticRegistryDefaultProvider);
        assert_eq!(resp.estimated_amount_out, "1000000");

        // The quoted input always delivers at least the requested output.
        let amount_in: U256 = resp.amount_in.parse().unwrap();
        assert!(swap_amount_out(amount_in, resp.fee_bps, resp.price_impact_bps).unwrap() >= u(1_000_000));
    }

    #[test]
    fn exact_output_with_explicit_uniswap_is_plain_registry() {
        let resp = quote_swap(
            &StaticQuoteRegistry::builtin(),
            &swap_req("base", TradeType::ExactOutput, ProviderConstraint::exact("Uniswap")),
        )
        .unwrap();
        assert_eq!(resp.source, QuoteSource::StaticRegistry);
        assert_eq!(resp.chain, "eip155:8453");
    }

    #[test]
    fn exact_output_via_priority_list() {
        let resp = quote_swap(
            &StaticQuoteRegistry::builtin(),
            &swap_req("eip155:1", TradeType::ExactOutput, ProviderConstraint::priority(["1inch", "uniswap"])),
        )
        .unwrap();
        assert_eq!(resp.provider, "uniswap");
        assert_eq!(resp.source, QuoteSource::StaticRegistry);
    }

    #[test]
    fn exact_output_off_evm_is_unsupported() {
        for providers in [
            ProviderConstraint::default(),
            ProviderConstraint::exact("uniswap"),
            ProviderConstraint::priority(["uniswap"]),
        ] {
            let err = quote_swap(
                &StaticQuoteRegistry::builtin(),
                &swap_req("solana:mainnet", TradeType::ExactOutput, providers),
            )
            .unwrap_err();
            assert!(matches!(err, QuoteError::Unsupported(_)), "{err}");
        }
    }

    #[test]
    fn exact_output_with_other_provider_is_unsupported() {
        let registry = StaticQuoteRegistry::builtin();
        let err = quote_swap(&registry, &swap_req("eip155:1", TradeType::ExactOutput, ProviderConstraint::exact("1inch")))
            .unwrap_err();
        assert!(matches!(err, QuoteError::Unsupported(_)));

        let err = quote_swap(
            &registry,
            &swap_req("eip155:1", TradeType::ExactOutput, ProviderConstraint::priority(["1inch", "sushiswap"])),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::Unsupported(_)));
    }

    #[test]
    fn exact_output_rejected_before_registry_lookup() {
        // Unsupported even when the registry has nothing for the pair.
        let err = quote_swap(
            &StaticQuoteRegistry::default(),
            &swap_req("solana", TradeType::ExactOutput, ProviderConstraint::default()),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::Unsupported(_)));
    }

    #[test]
    fn exact_output_off_evm_with_slippage_is_still_unsupported() {
        let registry = StaticQuoteRegistry::builtin();
        for providers in [ProviderConstraint::default(), ProviderConstraint::exact("orca")] {
            let mut req = swap_req("solana", TradeType::ExactOutput, providers);
            req.slippage_pct = Some(1.0);
            let err = quote_swap(&registry, &req).unwrap_err();
            assert!(matches!(err, QuoteError::Unsupported(_)), "{err}");
        }
    }

    #[test]
    fn exact_input_picks_best_out() {
        let resp = quote_swap(
            &StaticQuoteRegistry::builtin(),
            &swap_req("ethereum", TradeType::ExactInput, ProviderConstraint::default()),
        )
        .unwrap();
        assert_eq!(resp.provider, "1inch");
        assert_eq!(resp.amount_in, "1000000");
        assert_eq!(resp.estimated_amount_out, "998201");
        assert_eq!(resp.source, QuoteSource::StaticRegistry);
    }

    #[test]
    fn slippage_rules() {
        let registry = StaticQuoteRegistry::builtin();

        let mut req = swap_req("eip155:1", TradeType::ExactInput, ProviderConstraint::exact("uniswap"));
        req.slippage_pct = Some(0.5);
        let resp = quote_swap(&registry, &req).unwrap();
        assert_eq!(resp.slippage_pct, Some(0.5));

        req.slippage_pct = Some(100.0);
        assert!(quote_swap(&registry, &req).is_ok());

        for bad in [0.0, -1.0, 100.5, f64::NAN] {
            req.slippage_pct = Some(bad);
            assert!(matches!(quote_swap(&registry, &req), Err(QuoteError::Validation(_))), "{bad}");
        }

        // Well-formed, but no exact uniswap request.
        let mut req = swap_req("eip155:1", TradeType::ExactInput, ProviderConstraint::priority(["uniswap"]));
        req.slippage_pct = Some(1.0);
        assert!(matches!(quote_swap(&registry, &req), Err(QuoteError::Validation(_))));

        let mut req = swap_req("eip155:1", TradeType::ExactOutput, ProviderConstraint::default());
        req.slippage_pct = Some(1.0);
        assert!(matches!(quote_swap(&registry, &req), Err(QuoteError::Validation(_))));
    }

    #[test]
    fn missing_fields_are_validation_errors() {
        let mut req = swap_req("eip155:1", TradeType::ExactInput, ProviderConstraint::default());
        req.from_asset = "  ".into();
        assert!(matches!(
            quote_swap(&StaticQuoteRegistry::builtin(), &req),
            Err(QuoteError::Validation(_))
        ));
    }

    #[test]
    fn swap_response_serializes_camel_case() {
        let registry = StaticQuoteRegistry::new(
            vec![],
            vec![SwapQuote {
                provider: "uniswap".into(),
                chain: "eip155:1".into(),
                from_asset: "ETH".into(),
                to_asset: "USDC".into(),
                trade_type: TradeType::ExactInput,
                fee_bps: 30,
                price_impact_bps: 20,
            }],
        );
        let resp = quote_swap(&registry, &swap_req("eip155:1", TradeType::ExactInput, ProviderConstraint::default())).unwrap();
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["estimatedAmountOut"], "995006");
        assert_eq!(json["priceImpactBps"], 20);
        assert_eq!(json["tradeType"], "exact_input");
        assert_eq!(json["source"], "static_registry");
        assert!(json.get("slippagePct").is_none());
    }
}
