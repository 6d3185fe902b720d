pub mod defaults;
pub mod units;

use serde_json::Value;

/// Merged style configuration consulted by every element builder.
///
/// Built once per conversion from the built-in defaults plus optional user
/// overrides, then read-only. Resolution never fails: every accessor takes
/// the caller's fallback, so a missing or mistyped path can only fall back,
/// never propagate an absent value into rendering.
#[derive(Debug, Clone)]
pub struct StyleTree {
    root: Value,
}

impl StyleTree {
    pub fn with_overrides(overrides: &Value) -> Self {
        let mut root = defaults::builtin_defaults();
        merge_into(&mut root, overrides);
        Self { root }
    }

    pub fn resolve(&self, path: &str) -> Option<&Value> {
        path.split('.').try_fold(&self.root, |node, seg| node.get(seg))
    }

    pub fn str_or(&self, path: &str, fallback: &str) -> String {
        match self.resolve(path).and_then(Value::as_str) {
            Some(v) => v.to_string(),
            None => {
                log::debug!("style path '{path}' not set, falling back to {fallback:?}");
                fallback.to_string()
            }
        }
    }

    /// Per-level lookup with a generic fallback path, for the heading
    /// cascade: `heading.fonts.h2` -> `heading.font` -> constant.
    pub fn str_cascade_or(&self, leveled: &str, generic: &str, fallback: &str) -> String {
        if let Some(v) = self.resolve(leveled).and_then(Value::as_str) {
            return v.to_string();
        }
        self.str_or(generic, fallback)
    }

    pub fn f64_or(&self, path: &str, fallback: f64) -> f64 {
        match self.resolve(path).and_then(Value::as_f64) {
            Some(v) => v,
            None => {
                log::debug!("style path '{path}' not set, falling back to {fallback}");
                fallback
            }
        }
    }

    pub fn bool_or(&self, path: &str, fallback: bool) -> bool {
        match self.resolve(path).and_then(Value::as_bool) {
            Some(v) => v,
            None => {
                log::debug!("style path '{path}' not set, falling back to {fallback}");
                fallback
            }
        }
    }

    pub fn bool_cascade_or(&self, leveled: &str, generic: &str, fallback: bool) -> bool {
        if let Some(v) = self.resolve(leveled).and_then(Value::as_bool) {
            return v;
        }
        self.bool_or(generic, fallback)
    }

    /// Indexed lookup into a string array leaf, clamped to the last entry.
    /// Used for per-level bullet glyphs and ordered number formats.
    pub fn list_entry_or(&self, path: &str, index: usize, fallback: &[&str]) -> String {
        let from_tree = self
            .resolve(path)
            .and_then(Value::as_array)
            .filter(|items| !items.is_empty())
            .and_then(|items| {
                items
                    .get(index.min(items.len() - 1))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            });
        match from_tree {
            Some(v) => v,
            None => {
                log::debug!("style path '{path}' not set, falling back to built-in glyphs");
                fallback[index.min(fallback.len() - 1)].to_string()
            }
        }
    }
}

impl Default for StyleTree {
    fn default() -> Self {
        Self {
            root: defaults::builtin_defaults(),
        }
    }
}

/// Deep merge, override wins: objects merge recursively, everything else
/// (scalars and arrays alike) replaces the base value wholesale.
pub fn merge_into(base: &mut Value, overrides: &Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                match base_map.get_mut(key) {
                    Some(slot) if slot.is_object() && value.is_object() => {
                        merge_into(slot, value);
                    }
                    _ => {
                        base_map.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (slot, value) => *slot = value.clone(),
    }
}

pub fn merged(base: &Value, overrides: &Value) -> Value {
    let mut out = base.clone();
    merge_into(&mut out, overrides);
    out
}
