//! Provider filtering and ranking over same-route candidates.
//!
//! Filtering order:
//! 1. exact provider → case-insensitive matches only, no fallback
//! 2. priority list  → the best-ranked tier present; all candidates if none match
//! 3. otherwise      → every candidate
//!
//! Ranking is a strict comparator chain; candidates equal on every key keep
//! registry order.

use alloy_primitives::U256;
use std::cmp::Ordering;

use crate::amount::{bridge_amount_out, swap_amount_in, swap_amount_out};
use crate::error::QuoteError;
use crate::types::{
    BridgeQuote, BridgeStrategy, ProviderConstraint, ProviderQuote, SelectionResult, SwapQuote,
    SwapStrategy, TradeType,
};

/// Restrict `candidates` according to `constraint`.
pub fn filter_by_provider<'a, Q: ProviderQuote>(
    candidates: &'a [Q],
    constraint: &ProviderConstraint,
) -> Vec<&'a Q> {
    if let Some(exact) = constraint.exact.as_deref() {
        let exact = exact.trim();
        return candidates
            .iter()
            .filter(|q| q.provider().trim().eq_ignore_ascii_case(exact))
            .collect();
    }

    if !constraint.priority.is_empty() {
        let rank = |q: &Q| {
            let provider = q.provider().trim();
            constraint
                .priority
                .iter()
                .position(|p| p.eq_ignore_ascii_case(provider))
        };
        if let Some(best) = candidates.iter().filter_map(rank).min() {
            return candidates.iter().filter(|q| rank(*q) == Some(best)).collect();
        }
    }

    candidates.iter().collect()
}

struct Priced<'a, Q> {
    quote: &'a Q,
    amount_in: U256,
    amount_out: U256,
}

impl<Q: Clone> Priced<'_, Q> {
    fn into_result(self) -> SelectionResult<Q> {
        SelectionResult {
            quote: self.quote.clone(),
            computed_in_amount: self.amount_in,
            computed_out_amount: self.amount_out,
        }
    }
}

/// Pick the best bridge route for `amount`.
pub fn select_bridge(
    candidates: &[BridgeQuote],
    amount: U256,
    constraint: &ProviderConstraint,
    strategy: BridgeStrategy,
) -> Result<SelectionResult<BridgeQuote>, QuoteError> {
    let mut priced = Vec::new();
    for quote in filter_by_provider(candidates, constraint) {
        priced.push(Priced {
            quote,
            amount_in: amount,
            amount_out: bridge_amount_out(amount, quote.fee_bps)?,
        });
    }

    let best = priced
        .into_iter()
        .min_by(|a, b| match strategy {
            BridgeStrategy::BestOut => b
                .amount_out
                .cmp(&a.amount_out)
                .then(a.quote.eta_seconds.cmp(&b.quote.eta_seconds)),
            BridgeStrategy::Fastest => a
                .quote
                .eta_seconds
                .cmp(&b.quote.eta_seconds)
                .then(b.amount_out.cmp(&a.amount_out)),
        })
        .ok_or_else(|| no_route(candidates.len(), constraint))?;

    tracing::debug!(
        provider = %best.quote.provider,
        amount_out = %best.amount_out,
        ?strategy,
        "bridge route selected"
    );
    Ok(best.into_result())
}

/// Pick the best swap route.
///
/// `amount` is the input for [`TradeType::ExactInput`] and the target output
/// for [`TradeType::ExactOutput`].
pub fn select_swap(
    candidates: &[SwapQuote],
    amount: U256,
    trade_type: TradeType,
    constraint: &ProviderConstraint,
    strategy: SwapStrategy,
) -> Result<SelectionResult<SwapQuote>, QuoteError> {
    let mut priced = Vec::new();
    for quote in filter_by_provider(candidates, constraint) {
        match trade_type {
            TradeType::ExactInput => priced.push(Priced {
                quote,
                amount_in: amount,
                amount_out: swap_amount_out(amount, quote.fee_bps, quote.price_impact_bps)?,
            }),
            TradeType::ExactOutput => {
                match swap_amount_in(amount, quote.fee_bps, quote.price_impact_bps)? {
                    Some(amount_in) => priced.push(Priced {
                        quote,
                        amount_in,
                        amount_out: amount,
                    }),
                    None => tracing::debug!(provider = %quote.provider, "cannot fill exact output"),
                }
            }
        }
    }

    // Less is better: smaller input when the output is fixed, larger output otherwise.
    let by_amount = |a: &Priced<'_, SwapQuote>, b: &Priced<'_, SwapQuote>| match trade_type {
        TradeType::ExactInput => b.amount_out.cmp(&a.amount_out),
        TradeType::ExactOutput => a.amount_in.cmp(&b.amount_in),
    };
    let by_fee = |a: &Priced<'_, SwapQuote>, b: &Priced<'_, SwapQuote>| {
        a.quote
            .fee_bps
            .cmp(&b.quote.fee_bps)
            .then(a.quote.price_impact_bps.cmp(&b.quote.price_impact_bps))
    };

    let best = priced
        .into_iter()
        .min_by(|a, b| -> Ordering {
            match strategy {
                SwapStrategy::BestOut => by_amount(a, b).then_with(|| by_fee(a, b)),
                SwapStrategy::LowestFee => by_fee(a, b).then_with(|| by_amount(a, b)),
            }
        })
        .ok_or_else(|| no_route(candidates.len(), constraint))?;

    tracing::debug!(
        provider = %best.quote.provider,
        amount_in = %best.amount_in,
        amount_out = %best.amount_out,
        %trade_type,
        ?strategy,
        "swap route selected"
    );
    Ok(best.into_result())
}

fn no_route(total: usize, constraint: &ProviderConstraint) -> QuoteError {
    let detail = match &constraint.exact {
        Some(p) => format!("provider {p:?} has no eligible quote ({total} candidates on route)"),
        None if total == 0 => "no provider serves this route".to_string(),
        None => format!("none of {total} candidates is eligible"),
    };
    QuoteError::NoRoute(detail)
}
