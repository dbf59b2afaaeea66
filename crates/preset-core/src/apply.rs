//! Sequential folding of one extension point across the preset list.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::module::{Contribution, ReducerContext};
use crate::options::CombinedOptions;
use crate::presets::Presets;

/// Combine a plain contributed value with the accumulated one.
///
/// Two arrays concatenate, two tables shallow-merge with the contribution's
/// keys winning, anything else is replaced by the contribution.
pub fn merge_values(current: Value, contribution: &Value) -> Value {
    match (current, contribution) {
        (Value::Array(mut items), Value::Array(more)) => {
            items.extend(more.iter().cloned());
            Value::Array(items)
        }
        (Value::Object(mut table), Value::Object(overrides)) => {
            for (key, value) in overrides {
                table.insert(key.clone(), value.clone());
            }
            Value::Object(table)
        }
        (_, replacement) => replacement.clone(),
    }
}

pub(crate) async fn fold(
    presets: &Presets,
    extension: &str,
    initial: Value,
    args: &Map<String, Value>,
) -> Result<Value> {
    let mut current = initial;

    for preset in presets.list() {
        let Some(contribution) = preset.body.get(extension) else {
            continue;
        };

        current = match contribution {
            Contribution::Value(value) => merge_values(current, value),
            Contribution::Reducer(reducer) => {
                let context = ReducerContext {
                    options: CombinedOptions::for_folding(presets, args, &preset.options),
                    body: Arc::clone(&preset.body),
                };
                reducer
                    .call(current, context)
                    .await
                    .map_err(|source| Error::Reducer {
                        extension: extension.to_string(),
                        preset: preset.name.clone(),
                        source: Box::new(source),
                    })?
            }
        };
        tracing::trace!(extension, preset = %preset.name, "Applied contribution");
    }

    Ok(current)
}
