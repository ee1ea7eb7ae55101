//! chainexec-actions: named actions over the cached executor and quote engine.
//!
//! A request `{action, params}` is looked up in an [`ActionRegistry`] by name
//! or remote key, run by its [`ActionHandler`], and answered with an
//! [`Envelope`] `{status, code, result | reason}`.

pub mod context;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod params;
pub mod registry;

pub use context::{ActionContext, ActionInfo};
pub use dispatcher::Dispatcher;
pub use envelope::{ActionRequest, ActionStatus, Envelope};
pub use error::{ActionError, RegistryError};
pub use handler::ActionHandler;
pub use params::Params;
pub use registry::ActionRegistry;
