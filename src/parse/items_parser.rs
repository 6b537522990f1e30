use serde_json::{Map, Value};

use crate::model::entry::{Entry, Field, FieldNames, parse_date};

/// Error type for decoding the stored items blob
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("items are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("items must be a JSON array")]
    NotAnArray,
    #[error("item {index} is not an object")]
    NotAnObject { index: usize },
    #[error("item {index} has no `{key}`")]
    MissingField { index: usize, key: String },
    #[error("item {index} has an invalid `{key}`: {value}")]
    InvalidField {
        index: usize,
        key: String,
        value: String,
    },
}

/// Decode the items blob into entries, in stored order.
///
/// Accepts either a JSON array or a JSON string holding a JSON array.
/// `id` and `time` may be numbers or numeric strings.
pub fn decode_items(blob: &str, names: &FieldNames) -> Result<Vec<Entry>, DecodeError> {
    let value: Value = serde_json::from_str(blob)?;
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)?,
        other => other,
    };
    let Value::Array(items) = value else {
        return Err(DecodeError::NotAnArray);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => decode_entry(index, map, names),
            _ => Err(DecodeError::NotAnObject { index }),
        })
        .collect()
}

fn decode_entry(
    index: usize,
    map: &Map<String, Value>,
    names: &FieldNames,
) -> Result<Entry, DecodeError> {
    let fields = FieldReader { index, map, names };

    let id_value = fields.get_key("id")?;
    let id = as_number(id_value)
        .filter(|n| *n >= 1.0 && n.fract() == 0.0)
        .map(|n| n as u64)
        .ok_or_else(|| fields.invalid("id", id_value))?;

    let date_value = fields.get(Field::Date)?;
    let date = date_value
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| fields.invalid(names.name(Field::Date), date_value))?;

    let time_value = fields.get(Field::Time)?;
    let time = as_number(time_value)
        .filter(|n| n.is_finite())
        .ok_or_else(|| fields.invalid(names.name(Field::Time), time_value))?;

    Ok(Entry {
        id,
        date,
        time,
        customer: fields.text(Field::Customer)?,
        project: fields.text(Field::Project)?,
        description: fields.text(Field::Description)?,
    })
}

struct FieldReader<'a> {
    index: usize,
    map: &'a Map<String, Value>,
    names: &'a FieldNames,
}

impl<'a> FieldReader<'a> {
    fn get_key(&self, key: &str) -> Result<&'a Value, DecodeError> {
        self.map.get(key).ok_or_else(|| DecodeError::MissingField {
            index: self.index,
            key: key.to_string(),
        })
    }

    fn get(&self, field: Field) -> Result<&'a Value, DecodeError> {
        self.get_key(self.names.name(field))
    }

    fn text(&self, field: Field) -> Result<String, DecodeError> {
        let value = self.get(field)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.invalid(self.names.name(field), value))
    }

    fn invalid(&self, key: &str, value: &Value) -> DecodeError {
        DecodeError::InvalidField {
            index: self.index,
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn names() -> FieldNames {
        FieldNames::default()
    }

    #[test]
    fn decodes_numeric_record() {
        let blob = r#"[{"id":1,"date":"2024-01-01","time":1.5,"customer":"Acme","project":"Website","description":"design"}]"#;
        let entries = decode_items(blob, &names()).unwrap();
        assert_eq!(entries.len(), 1);
        let e = &entries[0];
        assert_eq!(e.id, 1);
        assert_eq!(e.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(e.time, 1.5);
        assert_eq!(e.customer, "Acme");
        assert_eq!(e.project, "Website");
        assert_eq!(e.description, "design");
    }

    #[test]
    fn decodes_string_id_and_time() {
        let blob = r#"[{"id":"3","date":"2024/01/05","time":"2","customer":"A","project":"B","description":"C"}]"#;
        let entries = decode_items(blob, &names()).unwrap();
        assert_eq!(entries[0].id, 3);
        assert_eq!(entries[0].time, 2.0);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    }

    #[test]
    fn decodes_double_encoded_array() {
        let inner = r#"[{"id":1,"date":"2024-01-01","time":1,"customer":"A","project":"B","description":"C"}]"#;
        let blob = serde_json::to_string(inner).unwrap();
        let entries = decode_items(&blob, &names()).unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn empty_array_is_empty_collection() {
        assert!(decode_items("[]", &names()).unwrap().is_empty());
    }

    #[test]
    fn rejects_non_array() {
        assert!(matches!(
            decode_items(r#"{"id":1}"#, &names()),
            Err(DecodeError::NotAnArray)
        ));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            decode_items("not json {{{", &names()),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn reports_missing_field() {
        let blob = r#"[{"id":1,"date":"2024-01-01","time":1,"customer":"A","project":"B"}]"#;
        match decode_items(blob, &names()) {
            Err(DecodeError::MissingField { index, key }) => {
                assert_eq!(index, 0);
                assert_eq!(key, "description");
            }
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_id() {
        let blob = r#"[{"id":0,"date":"2024-01-01","time":1,"customer":"A","project":"B","description":"C"}]"#;
        assert!(matches!(
            decode_items(blob, &names()),
            Err(DecodeError::InvalidField { .. })
        ));
    }

    #[test]
    fn honors_configured_field_names() {
        let names = FieldNames {
            customer: "client".into(),
            ..Default::default()
        };
        let blob = r#"[{"id":1,"date":"2024-01-01","time":1,"client":"Acme","project":"B","description":"C"}]"#;
        let entries = decode_items(blob, &names).unwrap();
        assert_eq!(entries[0].customer, "Acme");
    }
}
