//! Quote rows, strategies and selection results.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuoteError;

/// Provider that exact-output swaps are restricted to.
pub const EXACT_OUTPUT_PROVIDER: &str = "uniswap";

/// A registry row that belongs to a named provider.
pub trait ProviderQuote {
    fn provider(&self) -> &str;
}

/// One bridge route offered by one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeQuote {
    pub provider: String,
    pub from_chain: String,
    pub to_chain: String,
    pub asset_symbol: String,
    pub fee_bps: u32,
    pub eta_seconds: u64,
}

impl ProviderQuote for BridgeQuote {
    fn provider(&self) -> &str {
        &self.provider
    }
}

/// One swap pair offered by one provider for one trade direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuote {
    pub provider: String,
    pub chain: String,
    pub from_asset: String,
    pub to_asset: String,
    pub trade_type: TradeType,
    pub fee_bps: u32,
    pub price_impact_bps: u32,
}

impl ProviderQuote for SwapQuote {
    fn provider(&self) -> &str {
        &self.provider
    }
}

/// Which side of a swap is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// The sent amount is fixed; the output is estimated.
    ExactInput,
    /// The received amount is fixed; the required input is computed.
    ExactOutput,
}

impl TradeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExactInput => "exact_input",
            Self::ExactOutput => "exact_output",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeType {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect::<String>()
            .to_lowercase();
        match key.as_str() {
            "exactinput" | "exactin" | "sell" => Ok(Self::ExactInput),
            "exactoutput" | "exactout" | "buy" => Ok(Self::ExactOutput),
            _ => Err(QuoteError::validation(format!(
                "type must be exact_input or exact_output (got {s:?})"
            ))),
        }
    }
}

/// Ranking for bridge routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BridgeStrategy {
    /// Maximize output, then minimize ETA.
    #[default]
    BestOut,
    /// Minimize ETA, then maximize output.
    Fastest,
}

impl FromStr for BridgeStrategy {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "bestout" | "" => Ok(Self::BestOut),
            "fastest" => Ok(Self::Fastest),
            _ => Err(QuoteError::validation(format!(
                "bridge strategy must be bestOut or fastest (got {s:?})"
            ))),
        }
    }
}

/// Ranking for swap routes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SwapStrategy {
    /// Best direction-appropriate amount, then fee, then impact.
    #[default]
    BestOut,
    /// Lowest fee, then impact, then best amount.
    LowestFee,
}

impl FromStr for SwapStrategy {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "bestout" | "" => Ok(Self::BestOut),
            "lowestfee" => Ok(Self::LowestFee),
            _ => Err(QuoteError::validation(format!(
                "swap strategy must be bestOut or lowestFee (got {s:?})"
            ))),
        }
    }
}

fn normalize_token(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-'))
        .collect::<String>()
        .to_lowercase()
}

/// Where the selected quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteSource {
    /// Built-in registry, provider constrained (or unconstrained) by the caller.
    StaticRegistry,
    /// Built-in registry, provider filled in by the exact-output default.
    StaticRegistryDefaultProvider,
}

/// Which providers a request may be served by.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderConstraint {
    /// Exact provider; no fallback when it has no candidates.
    pub exact: Option<String>,
    /// Ranked preference list, lowercased.
    pub priority: Vec<String>,
}

impl ProviderConstraint {
    pub fn exact(provider: impl Into<String>) -> Self {
        Self {
            exact: Some(provider.into()),
            priority: Vec::new(),
        }
    }

    pub fn priority<I, S>(providers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exact: None,
            priority: providers
                .into_iter()
                .map(|p| p.as_ref().trim().to_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.exact.is_none() && self.priority.is_empty()
    }

    /// `true` when an exact provider equal to `name` (case-insensitive) was requested.
    pub fn is_exact(&self, name: &str) -> bool {
        self.exact
            .as_deref()
            .is_some_and(|p| p.trim().eq_ignore_ascii_case(name))
    }
}

/// The chosen candidate and its economics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionResult<Q> {
    pub quote: Q,
    pub computed_in_amount: U256,
    pub computed_out_amount: U256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trade_type_spellings() {
        for s in ["exact_input", "exactIn", "EXACT-INPUT", "exact in", "sell"] {
            assert_eq!(s.parse::<TradeType>().unwrap(), TradeType::ExactInput, "{s}");
        }
        for s in ["exact_output", "exactOut", "ExactOutput", "buy"] {
            assert_eq!(s.parse::<TradeType>().unwrap(), TradeType::ExactOutput, "{s}");
        }
        assert!("limit".parse::<TradeType>().is_err());
    }

    #[test]
    fn strategies() {
        assert_eq!("fastest".parse::<BridgeStrategy>().unwrap(), BridgeStrategy::Fastest);
        assert_eq!("best_out".parse::<BridgeStrategy>().unwrap(), BridgeStrategy::BestOut);
        assert_eq!("lowestFee".parse::<SwapStrategy>().unwrap(), SwapStrategy::LowestFee);
        assert!("fastest".parse::<SwapStrategy>().is_err());
        assert!("cheapest".parse::<BridgeStrategy>().is_err());
    }

    #[test]
    fn constraint_helpers() {
        let c = ProviderConstraint::priority([" Aave ", "", "morpho"]);
        assert_eq!(c.priority, vec!["aave", "morpho"]);
        assert!(!c.is_unconstrained());
        assert!(ProviderConstraint::exact("UniSwap").is_exact("uniswap"));
        assert!(ProviderConstraint::default().is_unconstrained());
    }

    #[test]
    fn wire_names() {
        assert_eq!(serde_json::to_value(TradeType::ExactOutput).unwrap(), "exact_output");
        assert_eq!(
            serde_json::to_value(QuoteSource::StaticRegistryDefaultProvider).unwrap(),
            "static_registry_default_provider"
        );
    }
}
