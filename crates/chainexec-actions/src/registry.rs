//! Name → handler lookup, validated once at startup.

use std::collections::HashMap;
use std::sync::Arc;

use crate::context::ActionInfo;
use crate::error::RegistryError;
use crate::handler::ActionHandler;
use crate::handlers::builtin_handlers;

/// Every handler is reachable by its name and by its remote key. No key may
/// be claimed twice, across both spellings.
pub struct ActionRegistry {
    handlers: Vec<Arc<dyn ActionHandler>>,
    index: HashMap<&'static str, usize>,
}

impl ActionRegistry {
    pub fn new(handlers: Vec<Arc<dyn ActionHandler>>) -> Result<Self, RegistryError> {
        let mut index: HashMap<&'static str, usize> = HashMap::new();
        for (pos, handler) in handlers.iter().enumerate() {
            let name = handler.name();
            let remote = handler.remote_key();
            if name.trim().is_empty() || remote.trim().is_empty() {
                return Err(RegistryError::EmptyKey(if name.is_empty() { remote } else { name }));
            }

            let keys = if name == remote { vec![name] } else { vec![name, remote] };
            for key in keys {
                if let Some(&other) = index.get(key) {
                    return Err(RegistryError::Duplicate {
                        key: key.to_string(),
                        first: handlers[other].name(),
                        second: name,
                    });
                }
                index.insert(key, pos);
            }
        }
        Ok(Self { handlers, index })
    }

    /// The built-in action set.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::new(builtin_handlers())
    }

    /// Look up by name or remote key. Surrounding whitespace is ignored.
    pub fn get(&self, action: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.index.get(action.trim()).map(|&pos| &self.handlers[pos])
    }

    pub fn catalog(&self) -> Vec<ActionInfo> {
        self.handlers
            .iter()
            .map(|h| ActionInfo {
                name: h.name(),
                remote_key: h.remote_key(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ActionContext;
    use crate::error::ActionError;
    use crate::params::Params;
    use async_trait::async_trait;
    use serde_json::Value;

    struct Named(&'static str, &'static str);

    #[async_trait]
    impl ActionHandler for Named {
        fn name(&self) -> &'static str {
            self.0
        }

        fn remote_key(&self) -> &'static str {
            self.1
        }

        async fn handle(&self, _ctx: &ActionContext, _params: &Params) -> Result<Value, ActionError> {
            Ok(Value::Null)
        }
    }

    fn build(pairs: &[(&'static str, &'static str)]) -> Result<ActionRegistry, RegistryError> {
        ActionRegistry::new(
            pairs
                .iter()
                .map(|&(n, r)| Arc::new(Named(n, r)) as Arc<dyn ActionHandler>)
                .collect(),
        )
    }

    #[test]
    fn builtin_set_is_valid() {
        let registry = ActionRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 7);
        assert_eq!(registry.get("rpcCallCached").unwrap().name(), "rpcCallCached");
        assert_eq!(registry.get("rpc_call_cached").unwrap().name(), "rpcCallCached");
        assert_eq!(registry.get(" swap_quote ").unwrap().name(), "swapQuote");
        assert!(registry.get("doesNotExist").is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = build(&[("a", "a_one"), ("a", "a_two")]).err().unwrap();
        assert_eq!(
            err,
            RegistryError::Duplicate { key: "a".into(), first: "a", second: "a" }
        );
    }

    #[test]
    fn remote_key_colliding_with_a_name_is_rejected() {
        let err = build(&[("fooBar", "foo_bar"), ("other", "fooBar")]).err().unwrap();
        assert!(matches!(err, RegistryError::Duplicate { ref key, .. } if key == "fooBar"));
    }

    #[test]
    fn duplicate_remote_keys_are_rejected() {
        assert!(build(&[("a", "shared"), ("b", "shared")]).is_err());
    }

    #[test]
    fn name_equal_to_own_remote_key_is_allowed() {
        let registry = build(&[("ping", "ping")]).unwrap();
        assert!(registry.get("ping").is_some());
    }

    #[test]
    fn empty_keys_are_rejected() {
        assert_eq!(build(&[("", "x")]).err(), Some(RegistryError::EmptyKey("x")));
    }

    #[test]
    fn catalog_keeps_registration_order() {
        let registry = build(&[("b", "b_"), ("a", "a_")]).unwrap();
        let names: Vec<_> = registry.catalog().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["b", "a"]);
    }
}
