use serde_json::Value;

/// Shape of a value stored in a filter map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterShape {
    Scalar,
    List,
    Range,
    Nested,
}

/// Deepest map nesting a filter value may carry, e.g. `exclude.custom_fields.<key>`.
const MAX_NESTING: usize = 3;

const RANGE_OPERATORS: &[&str] = &["$gt", "$lt", "$gte", "$lte", "$age", "$contains", "$begins"];

/// Classifies a filter value, rejecting anything the backend cannot accept.
pub fn classify(value: &Value) -> Result<FilterShape, String> {
    classify_at(value, 1)
}

fn classify_at(value: &Value, depth: usize) -> Result<FilterShape, String> {
    match value {
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => Ok(FilterShape::Scalar),
        Value::Array(items) => {
            if let Some(bad) = items.iter().find(|item| item.is_array() || item.is_object()) {
                return Err(format!("list items must be scalars, found {}", bad));
            }
            Ok(FilterShape::List)
        }
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| k.starts_with('$')) => {
            if let Some(op) = map.keys().find(|k| !RANGE_OPERATORS.contains(&k.as_str())) {
                return Err(format!("unknown range operator '{}'", op));
            }
            if map.values().any(|v| v.is_array() || v.is_object()) {
                return Err("range bounds must be scalars".to_string());
            }
            Ok(FilterShape::Range)
        }
        Value::Object(map) => {
            if depth >= MAX_NESTING {
                return Err(format!("nested deeper than {} levels", MAX_NESTING));
            }
            for nested in map.values() {
                classify_at(nested, depth + 1)?;
            }
            Ok(FilterShape::Nested)
        }
    }
}

/// Reads an epoch-seconds value that may arrive as a string or a number.
pub fn epoch_of(value: &Value) -> Option<i64> {
    match value {
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    }
}
