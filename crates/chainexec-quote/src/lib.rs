//! chainexec-quote: deterministic bridge and swap route selection.
//!
//! Given same-route candidates from a [`QuoteRegistry`], a requested amount,
//! optional provider constraints and a ranking strategy, the engine returns
//! exactly one route with its computed economics or a [`QuoteError`].
//!
//! All amount arithmetic is done on `U256`; floating point only appears in
//! the informational `slippage_pct` field.

pub mod amount;
pub mod chain;
pub mod engine;
pub mod error;
pub mod registry;
pub mod select;
pub mod types;

pub use alloy_primitives::U256;
pub use engine::{
    quote_bridge, quote_swap, BridgeQuoteRequest, BridgeQuoteResponse, SwapQuoteRequest,
    SwapQuoteResponse,
};
pub use error::QuoteError;
pub use registry::{QuoteRegistry, StaticQuoteRegistry};
pub use select::{filter_by_provider, select_bridge, select_swap};
pub use types::{
    BridgeQuote, BridgeStrategy, ProviderConstraint, QuoteSource, SelectionResult, SwapQuote,
    SwapStrategy, TradeType,
};
