//! Azure DevOps work-item adjustments.

use crate::error::DerivationError;
use crate::filters::{EXCLUDE, PARTIAL_MATCH, WORKITEM_ATTRIBUTES, is_present, nested_map};
use crate::postprocess::{PostProcessor, ProcessContext, Stage};
use serde_json::Value;

const ATTRIBUTE_KEYS: &[&str] = &["code_area", "teams"];

/// `{child: "x"}` picks (as sent by tree selectors) collapse to their leaf name.
fn leaf_name(value: &Value) -> Value {
    match value {
        Value::Object(map) => map.get("child").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    }
}

fn as_list(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().map(leaf_name).collect(),
        other => vec![leaf_name(other)],
    }
}

/// Code area and team selections are work-item attributes, not top-level filters.
pub struct AzureCodeArea;

impl PostProcessor for AzureCodeArea {
    fn id(&self) -> &str {
        "azure.code_area"
    }

    fn unset_keys(&self) -> Vec<String> {
        ATTRIBUTE_KEYS.iter().map(|k| k.to_string()).collect()
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        let mut attributes = nested_map(&stage.filters, WORKITEM_ATTRIBUTES);
        let mut moved = false;
        for key in ATTRIBUTE_KEYS {
            if let Some(value) = stage.filters.remove(*key) {
                attributes.insert(key.to_string(), Value::Array(as_list(&value)));
                moved = true;
            }
        }
        if moved {
            stage
                .filters
                .insert(WORKITEM_ATTRIBUTES.to_string(), Value::Object(attributes));
        }
        Ok(stage)
    }
}

/// Drilling into a parent work item drops the parent-type scoping.
pub struct AzureParentWorkitem;

impl PostProcessor for AzureParentWorkitem {
    fn id(&self) -> &str {
        "azure.parent_workitem"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec!["workitem_parent_workitem_types".to_string()]
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        if stage.filters.get("parent_workitem_ids").is_some_and(is_present) {
            stage.filters.remove("workitem_parent_workitem_types");
        }
        Ok(stage)
    }
}

/// Legacy `azure_iteration` selections become sprint full names (`parent\child`).
pub struct AzureIteration;

const LEGACY_ITERATION: &str = "azure_iteration";

fn full_names(value: &Value) -> Value {
    let names = match value {
        Value::Array(items) => items.iter().filter_map(full_name).collect(),
        other => full_name(other).into_iter().collect(),
    };
    Value::Array(names)
}

fn full_name(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) => Some(Value::String(s.clone())),
        Value::Object(map) => {
            let parent = map.get("parent").and_then(Value::as_str)?;
            let child = map.get("child").and_then(Value::as_str)?;
            Some(Value::String(format!("{}\\{}", parent, child)))
        }
        _ => None,
    }
}

/// Renames `azure_iteration` inside a container map, never overwriting the target.
fn rename_nested(
    filters: &mut serde_json::Map<String, Value>,
    container: &str,
    target: &str,
    as_full_names: bool,
) {
    let mut nested = nested_map(filters, container);
    let Some(legacy) = nested.remove(LEGACY_ITERATION) else {
        return;
    };
    if is_present(&legacy) && !nested.get(target).is_some_and(is_present) {
        let renamed = if as_full_names {
            full_names(&legacy)
        } else {
            legacy
        };
        nested.insert(target.to_string(), renamed);
    }
    filters.insert(container.to_string(), Value::Object(nested));
}

impl PostProcessor for AzureIteration {
    fn id(&self) -> &str {
        "azure.iteration"
    }

    fn unset_keys(&self) -> Vec<String> {
        vec![LEGACY_ITERATION.to_string()]
    }

    fn process(&self, mut stage: Stage, _ctx: &ProcessContext<'_>) -> Result<Stage, DerivationError> {
        if let Some(legacy) = stage.filters.get(LEGACY_ITERATION).filter(|v| is_present(v)) {
            let names = full_names(legacy);
            stage.filters.remove(LEGACY_ITERATION);
            let target_present = stage
                .filters
                .get("workitem_sprint_full_names")
                .is_some_and(is_present);
            if !target_present {
                stage
                    .filters
                    .insert("workitem_sprint_full_names".to_string(), names);
            }
        }
        rename_nested(&mut stage.filters, PARTIAL_MATCH, "workitem_milestone_full_name", false);
        rename_nested(&mut stage.filters, EXCLUDE, "workitem_sprint_full_names", true);
        Ok(stage)
    }
}
