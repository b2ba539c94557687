//! Record id conversion helpers for the API boundary
//!
//! Clients see ids as "table:key" strings; internally everything is a
//! [`RecordId`].

use surrealdb::RecordId;

use crate::AppError;
use crate::utils::AppResult;

/// Render a record id as its "table:key" string form
pub fn record_id_to_string(id: &RecordId) -> String {
    id.to_string()
}

/// Parse a path parameter into a record id for `table`.
///
/// Accepts both the bare key and the full "table:key" form.
pub fn parse_record_id(table: &str, raw: &str) -> AppResult<RecordId> {
    let key = raw.strip_prefix(&format!("{}:", table)).unwrap_or(raw);
    if key.is_empty() {
        return Err(AppError::validation(format!("invalid {} id", table)));
    }
    Ok(RecordId::from_table_key(table, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_bare_and_prefixed_ids() {
        let bare = parse_record_id("product", "abc123").unwrap();
        let prefixed = parse_record_id("product", "product:abc123").unwrap();
        assert_eq!(bare, prefixed);
        assert_eq!(record_id_to_string(&bare), "product:abc123");
    }

    #[test]
    fn rejects_empty_keys() {
        assert!(parse_record_id("product", "").is_err());
        assert!(parse_record_id("product", "product:").is_err());
    }
}
