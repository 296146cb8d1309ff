//! Global and per-render template data.
//!
//! Two tiers of data feed every render:
//!
//! 1. [`GlobalData`]: string pairs set on the manager with
//!    [`set_data`](crate::TemplateManager::set_data), kept for its lifetime.
//! 2. [`RenderData`]: the per-call value passed to `execute`, serialized to a
//!    JSON object.
//!
//! [`merge_data`] combines them into the context handed to the engine. The
//! per-call value wins on key collisions and neither input is modified.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Result, TemplateError};

/// Manager-lifetime key-value pairs merged into every render.
pub type GlobalData = BTreeMap<String, String>;

/// A render context: keys mapped to arbitrary JSON values.
pub type RenderData = serde_json::Map<String, serde_json::Value>;

/// Merges global data with per-call data into a freshly allocated context.
///
/// Starts from a copy of `global`, then overlays `per_call` entry by entry.
/// There is no deep merge: a colliding key is replaced wholesale.
///
/// ```rust
/// use vellum::{merge_data, GlobalData, RenderData};
///
/// let mut global = GlobalData::new();
/// global.insert("site".into(), "Example".into());
/// global.insert("title".into(), "Home".into());
///
/// let mut per_call = RenderData::new();
/// per_call.insert("title".into(), "About".into());
///
/// let merged = merge_data(&global, &per_call);
/// assert_eq!(merged["site"], "Example");
/// assert_eq!(merged["title"], "About");
/// ```
pub fn merge_data(global: &GlobalData, per_call: &RenderData) -> RenderData {
    let mut merged: RenderData = global
        .iter()
        .map(|(key, value)| (key.clone(), serde_json::Value::String(value.clone())))
        .collect();
    for (key, value) in per_call {
        merged.insert(key.clone(), value.clone());
    }
    tracing::trace!(
        global = global.len(),
        per_call = per_call.len(),
        merged = merged.len(),
        "merged render data"
    );
    merged
}

/// Serializes per-call data into a [`RenderData`] map.
///
/// Unit and `None` (anything serializing to `null`) count as empty data.
/// Values that serialize to something other than an object are rejected,
/// since a template context needs named keys.
pub fn to_render_data<S: Serialize + ?Sized>(data: &S) -> Result<RenderData> {
    match serde_json::to_value(data).map_err(|e| TemplateError::Data(e.to_string()))? {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(RenderData::new()),
        other => Err(TemplateError::Data(format!(
            "expected a map of values, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "a list",
        serde_json::Value::Object(_) => "a map",
    }
}
