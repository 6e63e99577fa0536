use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ID: &str = "id";
pub const TITLE: &str = "title";
pub const COMPLETED: &str = "completed";
pub const USER_ID: &str = "userId";

/// A single row of the table.
///
/// Records keep the source object as-is (key order included) so columns can be
/// derived from the data and absent or oddly typed fields never fail an access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds a record with the canonical todo shape.
    pub fn todo(id: i64, title: &str, completed: bool, user_id: i64) -> Self {
        let mut fields = Map::new();
        fields.insert(USER_ID.to_string(), Value::from(user_id));
        fields.insert(ID.to_string(), Value::from(id));
        fields.insert(TITLE.to_string(), Value::from(title));
        fields.insert(COMPLETED.to_string(), Value::from(completed));
        Self { fields }
    }

    pub fn id(&self) -> Option<i64> {
        self.fields.get(ID).and_then(Value::as_i64)
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get(TITLE).and_then(Value::as_str)
    }

    pub fn completed(&self) -> Option<bool> {
        self.fields.get(COMPLETED).and_then(Value::as_bool)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.values()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Display text for a column; missing fields render blank.
    pub fn cell(&self, column: &str) -> String {
        self.fields.get(column).map(value_text).unwrap_or_default()
    }
}

/// Stringifies a field value the way it is shown and searched.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Table columns: the keys of the first record, in source order.
pub fn columns(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|r| r.keys().map(str::to_string).collect())
        .unwrap_or_default()
}
