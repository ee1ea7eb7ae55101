//! `bridgeQuote` and `swapQuote` over the quote engine.

use std::str::FromStr;

use async_trait::async_trait;
use chainexec_quote::{
    quote_bridge, quote_swap, BridgeQuoteRequest, BridgeStrategy, ProviderConstraint,
    SwapQuoteRequest, SwapStrategy, TradeType,
};
use serde_json::Value;

use crate::context::ActionContext;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::params::Params;

pub struct BridgeQuoteAction;

#[async_trait]
impl ActionHandler for BridgeQuoteAction {
    fn name(&self) -> &'static str {
        "bridgeQuote"
    }

    fn remote_key(&self) -> &'static str {
        "bridge_quote"
    }

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let req = bridge_request(params)?;
        let resp = quote_bridge(ctx.quotes.as_ref(), &req)?;
        Ok(serde_json::to_value(resp)?)
    }
}

pub struct SwapQuoteAction;

#[async_trait]
impl ActionHandler for SwapQuoteAction {
    fn name(&self) -> &'static str {
        "swapQuote"
    }

    fn remote_key(&self) -> &'static str {
        "swap_quote"
    }

    async fn handle(&self, ctx: &ActionContext, params: &Params) -> Result<Value, ActionError> {
        let req = swap_request(params)?;
        let resp = quote_swap(ctx.quotes.as_ref(), &req)?;
        Ok(serde_json::to_value(resp)?)
    }
}

fn bridge_request(params: &Params) -> Result<BridgeQuoteRequest, ActionError> {
    let amount = params
        .opt_amount(&["amount"])?
        .ok_or_else(|| ActionError::validation("amount is required"))?;
    let strategy = match params.opt_str(&["strategy"])? {
        Some(s) => BridgeStrategy::from_str(&s)?,
        None => BridgeStrategy::default(),
    };

    Ok(BridgeQuoteRequest {
        from_chain: params.opt_str(&["from", "fromChain"])?.unwrap_or_default(),
        to_chain: params.opt_str(&["to", "toChain"])?.unwrap_or_default(),
        asset: params.opt_str(&["asset", "assetSymbol", "token"])?.unwrap_or_default(),
        amount,
        providers: providers(params)?,
        strategy,
    })
}

const EXACT_IN_AMOUNT: &[&str] = &["amount", "amountIn"];
const EXACT_OUT_AMOUNT: &[&str] = &["amountOut", "amount"];

fn swap_request(params: &Params) -> Result<SwapQuoteRequest, ActionError> {
    let trade_type = match params.opt_str(&["type", "tradeType"])? {
        Some(s) => TradeType::from_str(&s)?,
        None => TradeType::ExactInput,
    };

    // An amount for the other direction is a caller mistake, not something to ignore.
    let amount = match trade_type {
        TradeType::ExactInput => {
            if params.contains("amountOut") {
                return Err(ActionError::validation(
                    "amountOut is only valid for exact_output swaps",
                ));
            }
            params.opt_amount(EXACT_IN_AMOUNT)?
        }
        TradeType::ExactOutput => {
            if params.contains("amountIn") {
                return Err(ActionError::validation(
                    "amountIn is only valid for exact_input swaps",
                ));
            }
            params.opt_amount(EXACT_OUT_AMOUNT)?
        }
    };
    let amount = amount.ok_or_else(|| match trade_type {
        TradeType::ExactInput => ActionError::validation("amount is required"),
        TradeType::ExactOutput => ActionError::validation("amountOut is required"),
    })?;

    let strategy = match params.opt_str(&["strategy"])? {
        Some(s) => SwapStrategy::from_str(&s)?,
        None => SwapStrategy::default(),
    };

    Ok(SwapQuoteRequest {
        chain: params.opt_str(&["chain", "chainId"])?.unwrap_or_default(),
        from_asset: params
            .opt_str(&["fromAsset", "tokenIn", "sellToken"])?
            .unwrap_or_default(),
        to_asset: params
            .opt_str(&["toAsset", "tokenOut", "buyToken"])?
            .unwrap_or_default(),
        amount,
        trade_type,
        providers: providers(params)?,
        strategy,
        slippage_pct: params.opt_f64(&["slippagePct", "slippage"])?,
    })
}

/// `provider` (exact) and `providers` (ranked list). An exact provider takes precedence.
fn providers(params: &Params) -> Result<ProviderConstraint, ActionError> {
    Ok(ProviderConstraint {
        exact: params.opt_str(&["provider"])?.map(|p| p.to_lowercase()),
        priority: params
            .opt_list(&["providers", "providerPriority"])?
            .unwrap_or_default(),
    })
}
