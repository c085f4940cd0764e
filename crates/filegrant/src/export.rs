//! The export transformation and the human-readable listing.
//!
//! Flattens relational grants into the compact authorization document
//! consumed by the external auth-check function. Both transformations are
//! pure functions over store rows.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use filegrant_core::ApiKey;
use filegrant_store::GrantRow;

/// The JSON contract with the authorization-enforcement collaborator.
///
/// Given a bearer token and a requested path, access is permitted if the
/// path is in `public_files`, or if `[token, path]` appears in `grants`. A
/// token absent from `api_keys` is unauthenticated, full stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Every known user's key, grants or not: any valid user implicitly
    /// gets access to public files, so the consumer needs the complete key
    /// universe to authenticate before checking per-file grants.
    pub api_keys: Vec<ApiKey>,
    /// Files readable by everyone. Set semantics; emitted sorted.
    pub public_files: Vec<String>,
    /// Per-user grants as `[api_key, file_path]` pairs.
    pub grants: Vec<(ApiKey, String)>,
}

impl ExportDocument {
    /// Build the document from the key universe and the joined grant rows.
    ///
    /// Rows without identity are public grants; they go to `public_files`
    /// and never to `grants`.
    pub fn build(api_keys: Vec<ApiKey>, rows: Vec<GrantRow>) -> Self {
        let mut public_files = BTreeSet::new();
        let mut grants = Vec::new();

        for row in rows {
            match row.api_key {
                None => {
                    public_files.insert(row.file_path);
                }
                Some(api_key) => grants.push((api_key, row.file_path)),
            }
        }

        Self {
            api_keys,
            public_files: public_files.into_iter().collect(),
            grants,
        }
    }

    /// Serialize to the JSON wire form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Header line of the human-readable listing.
pub const LISTING_HEADER: &str = "Email, Api Key, File Path";

/// Render grant rows as a comma-separated table.
///
/// Missing identity fields (public grants) render as the literal `NULL`.
pub fn render_listing(rows: &[GrantRow]) -> String {
    let mut out = String::from(LISTING_HEADER);

    for row in rows {
        out.push('\n');
        out.push_str(row.email.as_deref().unwrap_or("NULL"));
        out.push_str(", ");
        out.push_str(row.api_key.as_ref().map(ApiKey::as_str).unwrap_or("NULL"));
        out.push_str(", ");
        out.push_str(&row.file_path);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_row(email: &str, key: &str, path: &str) -> GrantRow {
        GrantRow {
            email: Some(email.to_string()),
            api_key: Some(ApiKey::new(key)),
            file_path: path.to_string(),
        }
    }

    fn public_row(path: &str) -> GrantRow {
        GrantRow {
            email: None,
            api_key: None,
            file_path: path.to_string(),
        }
    }

    #[test]
    fn test_build_separates_public_from_user_grants() {
        let doc = ExportDocument::build(
            vec![ApiKey::new("k1"), ApiKey::new("k2")],
            vec![
                user_row("bob@x.com", "k1", "a.csv"),
                public_row("b.csv"),
                user_row("alice@x.com", "k2", "c.csv"),
            ],
        );

        assert_eq!(doc.api_keys, vec![ApiKey::new("k1"), ApiKey::new("k2")]);
        assert_eq!(doc.public_files, vec!["b.csv".to_string()]);
        assert_eq!(
            doc.grants,
            vec![
                (ApiKey::new("k1"), "a.csv".to_string()),
                (ApiKey::new("k2"), "c.csv".to_string()),
            ]
        );
    }

    #[test]
    fn test_build_dedupes_public_files() {
        let doc = ExportDocument::build(
            Vec::new(),
            vec![public_row("b.csv"), public_row("b.csv"), public_row("a.csv")],
        );
        // Set semantics, sorted output.
        assert_eq!(doc.public_files, vec!["a.csv".to_string(), "b.csv".to_string()]);
        assert!(doc.grants.is_empty());
    }

    #[test]
    fn test_json_wire_shape() {
        let doc = ExportDocument::build(
            vec![ApiKey::new("k1")],
            vec![user_row("bob@x.com", "k1", "a.csv"), public_row("b.csv")],
        );

        let json = doc.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"api_keys":["k1"],"public_files":["b.csv"],"grants":[["k1","a.csv"]]}"#
        );

        let back: ExportDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_listing_renders_null_identity() {
        let rows = vec![user_row("bob@x.com", "k1", "a.csv"), public_row("b.csv")];
        let listing = render_listing(&rows);

        assert_eq!(
            listing,
            "Email, Api Key, File Path\nbob@x.com, k1, a.csv\nNULL, NULL, b.csv"
        );
    }

    #[test]
    fn test_listing_empty_is_header_only() {
        assert_eq!(render_listing(&[]), LISTING_HEADER);
    }
}
