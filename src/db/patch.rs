//! Dynamic partial-update construction.
//!
//! Every entity exposes a PUT that accepts an arbitrary subset of its
//! columns. The column list is fixed in code per entity; body keys outside
//! it are ignored. Only column names from the allow-list are ever spliced
//! into SQL text, all values travel through positional binds.

use serde_json::{Map, Value};
use sqlx::{QueryBuilder, Sqlite};

use crate::error::ApiError;

/// Builds `UPDATE <table> SET <col> = ?, ... , updated_at = ? WHERE id = ?
/// RETURNING *` from the body keys that match `columns`.
///
/// Returns `ApiError::BadRequest` when no recognized column is present.
pub fn build_update(
    table: &str,
    columns: &[&str],
    body: &Map<String, Value>,
    id: i64,
) -> Result<QueryBuilder<'static, Sqlite>, ApiError> {
    let mut qb = QueryBuilder::new(format!("UPDATE {table} SET "));
    let mut matched = false;

    for col in columns {
        let Some(value) = body.get(*col) else {
            continue;
        };
        if matched {
            qb.push(", ");
        }
        qb.push(*col).push(" = ");
        push_json_value(&mut qb, value);
        matched = true;
    }

    if !matched {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    qb.push(", updated_at = ")
        .push_bind(chrono::Utc::now().timestamp());
    qb.push(" WHERE id = ").push_bind(id);
    qb.push(" RETURNING *");
    Ok(qb)
}

/// Binds a JSON value with its natural SQLite type. Nested arrays and
/// objects are stored as JSON text.
fn push_json_value(qb: &mut QueryBuilder<'static, Sqlite>, value: &Value) {
    match value {
        Value::Null => {
            qb.push_bind(Option::<String>::None);
        }
        Value::Bool(b) => {
            qb.push_bind(*b);
        }
        Value::Number(n) if n.is_i64() || n.is_u64() => {
            qb.push_bind(n.as_i64());
        }
        Value::Number(n) => {
            qb.push_bind(n.as_f64());
        }
        Value::String(s) => {
            qb.push_bind(s.clone());
        }
        other => {
            qb.push_bind(other.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn builds_clause_only_for_allowed_keys() {
        let body = body(json!({
            "status": "approved",
            "rejection_reason": null,
            "id": 99,
            "drop_table": "x"
        }));
        let qb = build_update("tickets", &["status", "moderator_response"], &body, 7).unwrap();
        let sql = qb.sql();

        assert!(sql.starts_with("UPDATE tickets SET status = "));
        assert!(sql.contains("updated_at = "));
        assert!(sql.ends_with("WHERE id = ? RETURNING *"));
        assert!(!sql.contains("drop_table"));
        assert!(!sql.contains("rejection_reason"));
    }

    #[test]
    fn preserves_allow_list_order() {
        let body = body(json!({"artists": "A", "album_name": "B"}));
        let qb = build_update("releases", &["album_name", "artists"], &body, 1).unwrap();

        let set_clause = qb.sql();
        let album = set_clause.find("album_name = ").unwrap();
        let artists = set_clause.find("artists = ").unwrap();
        assert!(album < artists);
    }

    #[test]
    fn rejects_body_with_no_recognized_fields() {
        let body = body(json!({"unknown": 1, "tracks": []}));
        let err = match build_update("releases", &["album_name"], &body, 1) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "No fields to update"));
    }

    #[test]
    fn rejects_empty_body() {
        let body = Map::new();
        assert!(build_update("smartlinks", &["status"], &body, 1).is_err());
    }
}
