use chrono::Utc;
use mongodb::bson::Bson;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicI64, Ordering};

pub const DEFAULT_PRIORITY: &str = "medium";

/// Item inside the `todos` array of a user document
///
/// Os campos opcionais guardam o valor JSON enviado pelo cliente, sem conversão.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub user_id: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Value>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub completed: bool,
    #[serde(default = "default_priority")]
    #[schema(value_type = String)]
    pub priority: Value,
    #[serde(default = "empty_text")]
    #[schema(value_type = String)]
    pub due_date: Value,
    #[serde(default = "empty_text")]
    #[schema(value_type = String)]
    pub notes: Value,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: i64,
}

/// Fields supplied when adding a task.
#[derive(Debug, Clone, Default)]
pub struct NewTodo {
    pub user_id: String,
    pub task: String,
    pub category: Option<Value>,
    pub completed: bool,
    pub priority: Option<Value>,
    pub due_date: Option<Value>,
    pub notes: Option<Value>,
}

impl TodoItem {
    /// Builds a stored task; `id` doubles as the creation timestamp.
    pub fn create(id: i64, fields: NewTodo) -> Self {
        Self {
            id,
            user_id: fields.user_id,
            task: fields.task,
            category: fields.category,
            completed: fields.completed,
            // Valores falsy ("", 0, false, null) caem no padrão
            priority: fields.priority.filter(is_truthy).unwrap_or_else(default_priority),
            due_date: fields.due_date.filter(is_truthy).unwrap_or_else(empty_text),
            notes: fields.notes.filter(is_truthy).unwrap_or_else(empty_text),
            created_at: id,
        }
    }
}

/// Partial update of a stored task. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TodoChanges {
    pub task: Option<String>,
    pub category: Option<Value>,
    pub priority: Option<Value>,
    pub due_date: Option<Value>,
    pub notes: Option<Value>,
    pub completed: Option<bool>,
}

impl TodoChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, item: &mut TodoItem) {
        if let Some(task) = &self.task {
            item.task = task.clone();
        }
        if let Some(category) = &self.category {
            item.category = Some(category.clone());
        }
        if let Some(priority) = &self.priority {
            item.priority = priority.clone();
        }
        if let Some(due_date) = &self.due_date {
            item.due_date = due_date.clone();
        }
        if let Some(notes) = &self.notes {
            item.notes = notes.clone();
        }
        if let Some(completed) = self.completed {
            item.completed = completed;
        }
    }
}

/// Todo identifier as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TodoIdInput {
    Number(serde_json::Number),
    Text(String),
}

impl TodoIdInput {
    /// `0` and `""` count as not supplied.
    pub fn is_blank(&self) -> bool {
        match self {
            TodoIdInput::Number(n) => n.as_f64() == Some(0.0),
            TodoIdInput::Text(s) => s.is_empty(),
        }
    }

    /// Integer the task is matched on. Strings are read up to the first non-digit.
    pub fn normalize(&self) -> Option<i64> {
        match self {
            TodoIdInput::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                    .map(|f| f.trunc() as i64)
            }),
            TodoIdInput::Text(s) => parse_leading_int(s),
        }
    }
}

fn parse_leading_int(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let value: i64 = rest[..digits_len].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Loose boolean coercion: `null`, `false`, `0` and `""` are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

static LAST_TODO_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp, bumped past the previous id when two tasks land in the same millisecond.
pub fn next_todo_id() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_TODO_ID.load(Ordering::Relaxed);
    loop {
        let candidate = now.max(last + 1);
        match LAST_TODO_ID.compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return candidate,
            Err(actual) => last = actual,
        }
    }
}

fn default_priority() -> Value {
    Value::String(DEFAULT_PRIORITY.to_string())
}

fn empty_text() -> Value {
    Value::String(String::new())
}

// Documentos antigos podem ter `completed: "true"` ou `1`
fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .map_or(false, is_truthy))
}

// Null vira string vazia; outros escalares são convertidos para texto
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

// Older writers stored ids as doubles
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match Bson::deserialize(deserializer)? {
        Bson::Int64(v) => Ok(v),
        Bson::Int32(v) => Ok(i64::from(v)),
        Bson::Double(v) if v.is_finite() => Ok(v.trunc() as i64),
        Bson::Null => Ok(0),
        other => Err(serde::de::Error::custom(format!(
            "Expected numeric timestamp, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, from_document};
    use serde_json::json;

    #[test]
    fn test_create_applies_defaults() {
        let item = TodoItem::create(
            1_700_000_000_000,
            NewTodo {
                user_id: "u1".to_string(),
                task: "buy milk".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(item.priority, "medium");
        assert_eq!(item.due_date, "");
        assert_eq!(item.notes, "");
        assert!(!item.completed);
        assert_eq!(item.category, None);
        assert_eq!(item.created_at, item.id);
    }

    #[test]
    fn test_create_treats_empty_priority_as_missing() {
        let item = TodoItem::create(
            1,
            NewTodo {
                user_id: "u1".to_string(),
                task: "t".to_string(),
                priority: Some(json!("")),
                due_date: Some(json!(0)),
                notes: Some(json!("keep")),
                ..Default::default()
            },
        );
        assert_eq!(item.priority, "medium");
        assert_eq!(item.due_date, "");
        assert_eq!(item.notes, "keep");
    }

    #[test]
    fn test_serialized_shape_uses_camel_case() {
        let item = TodoItem::create(
            42,
            NewTodo {
                user_id: "u1".to_string(),
                task: "t".to_string(),
                due_date: Some(json!("2026-01-01")),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(value["userId"], "u1");
        assert_eq!(value["dueDate"], "2026-01-01");
        assert_eq!(value["createdAt"], 42);
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_reads_legacy_documents() {
        let stored = doc! {
            "id": 1_700_000_000_123.0_f64,
            "userId": "u1",
            "task": "old",
            "category": null,
            "completed": null,
            "priority": null,
            "dueDate": "",
            "createdAt": 1_700_000_000_123_i64,
        };
        let item: TodoItem = from_document(stored).unwrap();

        assert_eq!(item.id, 1_700_000_000_123);
        assert_eq!(item.category, None);
        assert!(!item.completed);
        assert_eq!(item.priority, Value::Null);
        assert_eq!(item.notes, "");
    }

    #[test]
    fn test_reads_loosely_typed_documents() {
        let stored = doc! {
            "userId": "u1",
            "todos": [
                {
                    "id": 1.7e12,
                    "task": "a",
                    "completed": "true",
                    "category": 5,
                    "priority": 2_i32,
                    "dueDate": null,
                    "notes": false,
                },
                { "id": 1_700_000_000_001_i64, "task": 7_i32, "completed": 0_i32 },
            ],
        };
        let user: crate::models::UserDocument = from_document(stored).unwrap();

        let first = &user.todos[0];
        assert!(first.completed);
        assert_eq!(first.category, Some(json!(5)));
        assert_eq!(first.priority, json!(2));
        assert_eq!(first.due_date, Value::Null);
        assert_eq!(first.notes, json!(false));

        let second = &user.todos[1];
        assert_eq!(second.task, "7");
        assert!(!second.completed);
        assert_eq!(second.priority, "medium");
    }

    #[test]
    fn test_create_keeps_non_string_fields() {
        let item = TodoItem::create(
            1,
            NewTodo {
                user_id: "u1".to_string(),
                task: "t".to_string(),
                category: Some(json!(5)),
                priority: Some(json!({ "level": 3 })),
                ..Default::default()
            },
        );

        assert_eq!(item.category, Some(json!(5)));
        assert_eq!(item.priority, json!({ "level": 3 }));

        let stored = mongodb::bson::to_document(&item).unwrap();
        assert_eq!(stored.get_i64("category").unwrap(), 5);
        assert_eq!(stored.get_document("priority").unwrap().get_i64("level").unwrap(), 3);
    }

    #[test]
    fn test_todo_id_normalization() {
        let parse = |v: serde_json::Value| serde_json::from_value::<TodoIdInput>(v).unwrap();

        assert_eq!(parse(json!(1700000000000_i64)).normalize(), Some(1700000000000));
        assert_eq!(parse(json!("1700000000000")).normalize(), Some(1700000000000));
        assert_eq!(parse(json!("  42abc")).normalize(), Some(42));
        assert_eq!(parse(json!("-7")).normalize(), Some(-7));
        assert_eq!(parse(json!(12.9)).normalize(), Some(12));
        assert_eq!(parse(json!("abc")).normalize(), None);
        assert!(parse(json!(0)).is_blank());
        assert!(parse(json!("")).is_blank());
        assert!(!parse(json!("0")).is_blank());
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
    }

    #[test]
    fn test_todo_ids_are_strictly_increasing() {
        let ids: Vec<i64> = (0..100).map(|_| next_todo_id()).collect();
        assert!(ids.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_changes_apply_only_supplied_fields() {
        let mut item = TodoItem::create(
            1,
            NewTodo {
                user_id: "u1".to_string(),
                task: "original".to_string(),
                notes: Some(json!("n")),
                ..Default::default()
            },
        );
        let changes = TodoChanges {
            task: Some("renamed".to_string()),
            category: Some(json!(9)),
            completed: Some(true),
            ..Default::default()
        };
        assert!(!changes.is_empty());
        changes.apply(&mut item);

        assert_eq!(item.task, "renamed");
        assert!(item.completed);
        assert_eq!(item.category, Some(json!(9)));
        assert_eq!(item.notes, "n");
        assert_eq!(item.priority, "medium");
        assert!(TodoChanges::default().is_empty());
    }
}
