//! Error log sink.
//!
//! Failed reconciliations are appended to `errorLog`, keyed by the
//! systematic number of the record that failed. Writing the entry is
//! best-effort: a failure is reported through `tracing` and never replaces
//! the error that caused it.

use std::error::Error as _;

use crate::error::StoreError;
use crate::fields::NaturalKey;
use crate::store::RecordStore;

/// Width of the `errorLog.srn` column.
pub const SRN_MAX_CHARS: usize = 35;

/// One row of `errorLog`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogEntry {
    pub srn: String,
    pub error_text: String,
}

impl ErrorLogEntry {
    /// Describe a failed reconciliation of the record with `key`.
    ///
    /// `srn` holds the systematic number cut to the column width; the full
    /// key leads the error text.
    pub fn for_failure(key: &NaturalKey, cause: &StoreError) -> Self {
        let mut error_text = format!("{} [{key}]: {cause}", key.kind());
        let mut source = cause.source();
        while let Some(inner) = source {
            let inner_text = inner.to_string();
            if !error_text.contains(&inner_text) {
                error_text.push_str(": ");
                error_text.push_str(&inner_text);
            }
            source = inner.source();
        }

        Self {
            srn: key.systematic_number().chars().take(SRN_MAX_CHARS).collect(),
            error_text,
        }
    }
}

/// Append an entry for a failed reconciliation, reporting but swallowing
/// any failure to do so.
pub async fn record_failure<S>(store: &S, key: &NaturalKey, cause: &StoreError)
where
    S: RecordStore + ?Sized,
{
    let entry = ErrorLogEntry::for_failure(key, cause);
    if let Err(e) = store.log_error(&entry).await {
        tracing::error!(
            srn = %entry.srn,
            error = %e,
            original_error = %cause,
            "Failed to write error log entry"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreOperation;
    use crate::fields::{EntityKind, Fields};

    fn key(systematic_number: &str) -> NaturalKey {
        let mut fields = Fields::defaults(EntityKind::Article);
        fields.set("systematic_number", systematic_number);
        fields.set("article_number", "Art. 3");
        fields.natural_key()
    }

    fn rejected() -> StoreError {
        StoreError::Rejected {
            op: StoreOperation::Archive,
            reason: "disk full".into(),
        }
    }

    #[test]
    fn test_entry_for_failure() {
        let entry = ErrorLogEntry::for_failure(&key("101.1"), &rejected());
        assert_eq!(entry.srn, "101.1");
        assert_eq!(
            entry.error_text,
            "article [systematic_number=101.1, article_number=Art. 3]: archive rejected by store: disk full"
        );
    }

    #[test]
    fn test_srn_truncated_to_column_width() {
        let long = "1".repeat(50);
        let entry = ErrorLogEntry::for_failure(&key(&long), &rejected());
        assert_eq!(entry.srn.chars().count(), SRN_MAX_CHARS);
        assert!(entry.error_text.contains(&long));
    }
}
