//! Typed access to an action's JSON params with alias resolution.
//!
//! Several actions accept more than one spelling for the same field
//! (`from` / `fromChain`). Every spelling present must agree, otherwise the
//! call is rejected rather than silently picking one.

use chainexec_quote::amount::parse_amount;
use chainexec_quote::U256;
use serde_json::{Map, Value};

use crate::error::ActionError;

#[derive(Debug, Clone, Default)]
pub struct Params {
    map: Map<String, Value>,
}

impl Params {
    /// `null` is treated as `{}`; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Result<Self, ActionError> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(map) => Ok(Self { map }),
            other => Err(ActionError::validation(format!(
                "params must be a JSON object (got {other})"
            ))),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.get(name).is_some_and(|v| !v.is_null())
    }

    pub fn any_present(&self, names: &[&str]) -> bool {
        names.iter().any(|n| self.contains(n))
    }

    /// Raw value of the first present alias, after checking all present aliases agree.
    pub fn value(&self, names: &[&str]) -> Result<Option<&Value>, ActionError> {
        let mut found: Option<(&str, &Value)> = None;
        for &name in names {
            let Some(value) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            match found {
                Some((first, seen)) if seen != value => {
                    return Err(disagree(first, name));
                }
                Some(_) => {}
                None => found = Some((name, value)),
            }
        }
        Ok(found.map(|(_, v)| v))
    }

    /// Trimmed string; numbers are accepted and rendered as text. Empty is `None`.
    pub fn opt_str(&self, names: &[&str]) -> Result<Option<String>, ActionError> {
        let mut found: Option<(&str, String)> = None;
        for &name in names {
            let Some(raw) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let text = match raw {
                Value::String(s) => s.trim().to_string(),
                Value::Number(n) => n.to_string(),
                other => {
                    return Err(ActionError::validation(format!(
                        "{name} must be a string (got {other})"
                    )))
                }
            };
            if text.is_empty() {
                continue;
            }
            match &found {
                Some((first, seen)) if *seen != text => return Err(disagree(first, name)),
                Some(_) => {}
                None => found = Some((name, text)),
            }
        }
        Ok(found.map(|(_, s)| s))
    }

    pub fn req_str(&self, names: &[&str]) -> Result<String, ActionError> {
        self.opt_str(names)?
            .ok_or_else(|| ActionError::validation(format!("{} is required", names[0])))
    }

    /// Non-negative integer; JSON numbers or numeric strings.
    pub fn opt_u64(&self, names: &[&str]) -> Result<Option<u64>, ActionError> {
        let mut found: Option<(&str, u64)> = None;
        for &name in names {
            let Some(raw) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let parsed = match raw {
                Value::Number(n) => n.as_u64(),
                Value::String(s) => s.trim().parse::<u64>().ok(),
                _ => None,
            }
            .ok_or_else(|| {
                ActionError::validation(format!("{name} must be a non-negative integer (got {raw})"))
            })?;
            match found {
                Some((first, seen)) if seen != parsed => return Err(disagree(first, name)),
                Some(_) => {}
                None => found = Some((name, parsed)),
            }
        }
        Ok(found.map(|(_, n)| n))
    }

    /// `true`/`false` as JSON booleans or strings.
    pub fn opt_bool(&self, names: &[&str]) -> Result<Option<bool>, ActionError> {
        let mut found: Option<(&str, bool)> = None;
        for &name in names {
            let Some(raw) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let parsed = match raw {
                Value::Bool(b) => Some(*b),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "true" => Some(true),
                    "false" => Some(false),
                    _ => None,
                },
                _ => None,
            }
            .ok_or_else(|| ActionError::validation(format!("{name} must be a boolean (got {raw})")))?;
            match found {
                Some((first, seen)) if seen != parsed => return Err(disagree(first, name)),
                Some(_) => {}
                None => found = Some((name, parsed)),
            }
        }
        Ok(found.map(|(_, b)| b))
    }

    pub fn opt_f64(&self, names: &[&str]) -> Result<Option<f64>, ActionError> {
        let mut found: Option<(&str, f64)> = None;
        for &name in names {
            let Some(raw) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let parsed = match raw {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|f| f.is_finite())
            .ok_or_else(|| ActionError::validation(format!("{name} must be a number (got {raw})")))?;
            match found {
                Some((first, seen)) if seen != parsed => return Err(disagree(first, name)),
                Some(_) => {}
                None => found = Some((name, parsed)),
            }
        }
        Ok(found.map(|(_, f)| f))
    }

    /// Integer amount; aliases are compared by parsed value, so `"16"` and `"0x10"` agree.
    pub fn opt_amount(&self, names: &[&str]) -> Result<Option<U256>, ActionError> {
        let mut found: Option<(&str, U256)> = None;
        for &name in names {
            let Some(raw) = self.map.get(name).filter(|v| !v.is_null()) else {
                continue;
            };
            let parsed = parse_amount(name, raw)?;
            match found {
                Some((first, seen)) if seen != parsed => return Err(disagree(first, name)),
                Some(_) => {}
                None => found = Some((name, parsed)),
            }
        }
        Ok(found.map(|(_, a)| a))
    }

    /// Provider names from a comma-separated string or an array of strings.
    pub fn opt_list(&self, names: &[&str]) -> Result<Option<Vec<String>>, ActionError> {
        let Some(raw) = self.value(names)? else {
            return Ok(None);
        };
        let items: Vec<String> = match raw {
            Value::String(s) => s.split(',').map(str::to_string).collect(),
            Value::Array(items) => items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        ActionError::validation(format!(
                            "{} entries must be strings (got {item})",
                            names[0]
                        ))
                    })
                })
                .collect::<Result<_, _>>()?,
            other => {
                return Err(ActionError::validation(format!(
                    "{} must be a comma-separated string or an array (got {other})",
                    names[0]
                )))
            }
        };
        let items: Vec<String> = items
            .into_iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Ok((!items.is_empty()).then_some(items))
    }
}

fn disagree(first: &str, second: &str) -> ActionError {
    ActionError::validation(format!("{first} and {second} disagree"))
}
