use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

/// One row keyed by its column header, in column order.
pub type Record = IndexMap<String, Value>;

/// A single row given as JSON: an array fills cells in order, an object
/// fills its values in the order its keys were written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RowInput {
    Values(Vec<Value>),
    Record(Record),
}
