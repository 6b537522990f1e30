use serde_json::{Map, Value, json};

use crate::model::entry::{Entry, Field, FieldNames};

/// Serialize entries to the stored items blob: a JSON array of objects keyed
/// by the configured field names.
pub fn encode_items(entries: &[Entry], names: &FieldNames) -> String {
    let items: Vec<Value> = entries
        .iter()
        .map(|entry| Value::Object(encode_entry(entry, names)))
        .collect();
    Value::Array(items).to_string()
}

fn encode_entry(entry: &Entry, names: &FieldNames) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert("id".into(), json!(entry.id));
    map.insert(
        names.name(Field::Date).into(),
        json!(entry.date.format("%Y-%m-%d").to_string()),
    );
    map.insert(names.name(Field::Time).into(), json!(entry.time));
    map.insert(names.name(Field::Customer).into(), json!(entry.customer));
    map.insert(names.name(Field::Project).into(), json!(entry.project));
    map.insert(
        names.name(Field::Description).into(),
        json!(entry.description),
    );
    map
}
