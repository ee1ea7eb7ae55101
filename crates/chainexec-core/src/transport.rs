//! The `RpcTransport` trait: the seam between the executor and the network.

use async_trait::async_trait;

use crate::classify::classify_reply;
use crate::error::RpcError;
use crate::request::{HttpReply, JsonRpcRequest};

/// Issues one JSON-RPC POST and hands back the raw HTTP reply.
///
/// Implementations only report connection-level failures (as
/// [`RpcErrorKind::RequestFailed`](crate::error::RpcErrorKind::RequestFailed));
/// status codes and body contents are classified by [`RpcTransport::call`].
///
/// # Thread Safety
/// Implementations must be `Send + Sync` for use across Tokio tasks.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn RpcTransport>`.
#[async_trait]
pub trait RpcTransport: Send + Sync + 'static {
    /// POST `req` to `url` and return the status and body text.
    async fn post(&self, url: &str, req: &JsonRpcRequest) -> Result<HttpReply, RpcError>;

    /// POST `req` and classify the reply into the `result` string or an error.
    async fn call(&self, url: &str, req: &JsonRpcRequest) -> Result<String, RpcError> {
        let reply = self.post(url, req).await?;
        classify_reply(&reply)
    }
}
