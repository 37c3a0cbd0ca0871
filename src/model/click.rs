use crate::filters::{FilterMap, epoch_of};
use serde_json::Value;

/// The point a user clicked on a chart.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickEvent {
    /// A categorical label, e.g. an assignee name.
    Scalar(String),
    /// A trend bucket: display label plus its epoch-seconds start.
    TimeBucket { name: String, value: String },
    /// A composite drill carrying its own filter entries.
    Structured(FilterMap),
}

impl ClickEvent {
    /// Interprets a raw chart click.
    ///
    /// Returns `None` for shapes the engine does not recognize; such clicks add no filter.
    pub fn from_value(raw: &Value) -> Option<Self> {
        match raw {
            Value::String(s) => Some(Self::Scalar(s.clone())),
            Value::Number(n) => Some(Self::Scalar(n.to_string())),
            Value::Object(map) if map.is_empty() => None,
            Value::Object(map) => {
                let bucket = map.len() == 2 && map.contains_key("name");
                match (bucket, map.get("value")) {
                    (true, Some(value @ (Value::String(_) | Value::Number(_)))) => {
                        Some(Self::TimeBucket {
                            name: label_of(map.get("name")),
                            value: label_of(Some(value)),
                        })
                    }
                    _ => Some(Self::Structured(map.clone())),
                }
            }
            _ => None,
        }
    }

    pub fn scalar(value: &str) -> Self {
        Self::Scalar(value.to_string())
    }

    pub fn bucket(name: &str, value: &str) -> Self {
        Self::TimeBucket {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    pub fn as_structured(&self) -> Option<&FilterMap> {
        match self {
            Self::Structured(map) => Some(map),
            _ => None,
        }
    }

    /// Epoch seconds carried by the click: a bucket's value or a numeric scalar label.
    pub fn epoch(&self) -> Option<i64> {
        match self {
            Self::Scalar(s) => epoch_of(&Value::String(s.clone())),
            Self::TimeBucket { value, .. } => epoch_of(&Value::String(value.clone())),
            Self::Structured(_) => None,
        }
    }
}

fn label_of(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
