use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// ExpenseRecord — A single expense as served by the backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub amount: f64,
    pub category: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    pub date: RecordDate,
}

/// Document stores often send `null` for an unset text field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// RecordDate — ISO-8601 string or epoch milliseconds
// ---------------------------------------------------------------------------

/// The backend may send either form; both are kept as received and only
/// interpreted when rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordDate {
    EpochMillis(i64),
    Iso(String),
}

impl From<&str> for RecordDate {
    fn from(s: &str) -> Self {
        RecordDate::Iso(s.to_string())
    }
}

impl From<i64> for RecordDate {
    fn from(millis: i64) -> Self {
        RecordDate::EpochMillis(millis)
    }
}

impl fmt::Display for RecordDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordDate::EpochMillis(ms) => write!(f, "{}", ms),
            RecordDate::Iso(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_underscore_id() {
        let record: ExpenseRecord = serde_json::from_value(serde_json::json!({
            "_id": "65a1",
            "amount": 50,
            "category": "Food",
            "description": "Lunch",
            "date": "2024-01-01T00:00:00.000Z",
            "__v": 0
        }))
        .unwrap();
        assert_eq!(record.id, "65a1");
        assert_eq!(record.amount, 50.0);
        assert_eq!(record.date, RecordDate::from("2024-01-01T00:00:00.000Z"));
    }

    #[test]
    fn missing_description_defaults_to_empty() {
        let record: ExpenseRecord = serde_json::from_value(serde_json::json!({
            "_id": "1",
            "amount": 12.5,
            "category": "Travel",
            "date": 1704067200000i64
        }))
        .unwrap();
        assert_eq!(record.description, "");
        assert_eq!(record.date, RecordDate::EpochMillis(1_704_067_200_000));
    }

    #[test]
    fn null_description_becomes_empty() {
        let records: Vec<ExpenseRecord> = serde_json::from_value(serde_json::json!([
            {"_id": "1", "amount": 50, "category": "Food", "description": "Lunch", "date": "2024-01-01"},
            {"_id": "2", "amount": 8, "category": "Coffee", "description": null, "date": "2024-01-02"}
        ]))
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].description, "Lunch");
        assert_eq!(records[1].description, "");
    }

    #[test]
    fn serializes_id_back_as_underscore_id() {
        let record = ExpenseRecord {
            id: "abc".into(),
            amount: 1.0,
            category: "Misc".into(),
            description: String::new(),
            date: "2024-03-05".into(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["_id"], "abc");
        assert!(value.get("id").is_none());
    }
}
