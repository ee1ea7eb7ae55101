//! Built-in action handlers.

mod cache;
mod meta;
mod quote;
mod rpc;

use std::sync::Arc;

use crate::handler::ActionHandler;

pub use cache::{CacheGet, CachePut};
pub use meta::{ListActions, MethodPolicyAction};
pub use quote::{BridgeQuoteAction, SwapQuoteAction};
pub use rpc::RpcCallCached;

/// Every handler shipped with the crate, in listing order.
pub fn builtin_handlers() -> Vec<Arc<dyn ActionHandler>> {
    vec![
        Arc::new(RpcCallCached),
        Arc::new(BridgeQuoteAction),
        Arc::new(SwapQuoteAction),
        Arc::new(CachePut),
        Arc::new(CacheGet),
        Arc::new(MethodPolicyAction),
        Arc::new(ListActions),
    ]
}
