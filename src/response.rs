//! Response bodies for the data routes. These are bare (no envelope) for compatibility with existing consumers.

use axum::{http::StatusCode, Json};
use serde::Serialize;
use serde_json::Value;

/// One element of the `/count` response array.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct CountRow {
    pub count: i64,
}

/// 200 with the row objects as a JSON array.
pub fn rows_ok(rows: Vec<Value>) -> (StatusCode, Json<Vec<Value>>) {
    (StatusCode::OK, Json(rows))
}

/// 200 with the count wrapped in a one-element array: `[{"count": n}]`.
pub fn count_ok(count: i64) -> (StatusCode, Json<Vec<CountRow>>) {
    (StatusCode::OK, Json(vec![CountRow { count }]))
}

pub fn error_body(message: String) -> Value {
    serde_json::json!({ "error": message })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_is_wrapped_in_array() {
        let (status, Json(body)) = count_ok(3);
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::to_value(body).unwrap(), serde_json::json!([{ "count": 3 }]));
    }
}
