//! Per-Kind Provenance Validation
//!
//! [`require_source`] is the single gate every value passes before a tool
//! uses it: it verifies the value is well-formed and carries the audit
//! metadata its provenance kind makes mandatory.
//!
//! Failures here are the *structural* class
//! ([`ValidationError`](crate::errors::ValidationError)) — a caller bug to
//! fix before resubmission — never a domain refusal. See the
//! [`errors`](crate::errors) module for the distinction.
//!
//! On success the same reference is handed back unchanged, so the call can
//! be used inline:
//!
//! ```rust
//! use provex_core::provenance::require_source;
//! use provex_core::values::computed_value;
//!
//! let v = computed_value(100.0, "J", "demo", None);
//! let checked = require_source(&v).unwrap();
//! assert_eq!(checked.value(), 100.0);
//! ```

use crate::errors::{ValidationError, ValidationResult};
use crate::values::{Provenance, ValueSpec};

/// Verify a value is well-formed and carries its kind's mandatory metadata.
///
/// | Kind | Mandatory |
/// |------|-----------|
/// | `Evidence` | citation with non-empty `pdf_name` and a page |
/// | `Computed` | `meta["tool"]` non-empty string |
/// | `Assumption` | `meta["note"]` non-empty string |
/// | `External` | `meta["source"]` and `meta["time_range"]` non-empty strings |
///
/// Returns the same reference on success (identity pass-through). The match
/// over [`Provenance`] is exhaustive: a new provenance kind will not compile
/// until its rule is written.
pub fn require_source(v: &ValueSpec) -> ValidationResult<&ValueSpec> {
    if !v.value().is_finite() {
        return Err(ValidationError::NotFinite);
    }

    match v.provenance() {
        Provenance::Evidence => {
            let citation = v.citation().ok_or(ValidationError::CitationMissing)?;
            if citation.pdf_name().trim().is_empty() {
                return Err(ValidationError::PdfNameEmpty);
            }
            // page is typed i64: coercion already happened at construction
        }
        Provenance::Computed => {
            if v.meta_str("tool").is_none() {
                return Err(ValidationError::ToolMissing);
            }
        }
        Provenance::Assumption => {
            if v.meta_str("note").is_none() {
                return Err(ValidationError::NoteMissing);
            }
        }
        Provenance::External => {
            if v.meta_str("source").is_none() {
                return Err(ValidationError::SourceMissing);
            }
            if v.meta_str("time_range").is_none() {
                return Err(ValidationError::TimeRangeMissing);
            }
        }
    }

    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{
        assumption_value, computed_value, evidence_value, external_value, Citation, Meta,
        ValueSpec,
    };
    use serde_json::Value;

    fn meta(pairs: &[(&str, &str)]) -> Meta {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn evidence_without_citation_fails() {
        let v = ValueSpec::new(0.5, "-", Provenance::Evidence, None, None);
        assert_eq!(require_source(&v), Err(ValidationError::CitationMissing));
    }

    #[test]
    fn evidence_with_empty_pdf_name_fails() {
        let v = ValueSpec::new(
            0.5,
            "-",
            Provenance::Evidence,
            Some(Citation::new("  ", 3)),
            None,
        );
        assert_eq!(require_source(&v), Err(ValidationError::PdfNameEmpty));
    }

    #[test]
    fn computed_without_tool_fails() {
        let v = ValueSpec::new(10.0, "J", Provenance::Computed, None, Some(Meta::new()));
        assert_eq!(require_source(&v), Err(ValidationError::ToolMissing));
    }

    #[test]
    fn computed_with_non_string_tool_fails() {
        let mut m = Meta::new();
        m.insert("tool".into(), Value::from(42));
        let v = ValueSpec::new(10.0, "J", Provenance::Computed, None, Some(m));
        assert_eq!(require_source(&v), Err(ValidationError::ToolMissing));
    }

    #[test]
    fn assumption_without_note_fails() {
        let v = ValueSpec::new(288.15, "K", Provenance::Assumption, None, Some(Meta::new()));
        assert_eq!(require_source(&v), Err(ValidationError::NoteMissing));
    }

    #[test]
    fn external_missing_fields_fail_in_order() {
        let v = external_value(120.0, "EUR/MWh", Some(meta(&[("source", "api")])));
        assert_eq!(require_source(&v), Err(ValidationError::TimeRangeMissing));

        let v = external_value(120.0, "EUR/MWh", Some(meta(&[("time_range", "2025")])));
        assert_eq!(require_source(&v), Err(ValidationError::SourceMissing));
    }

    #[test]
    fn non_finite_value_fails() {
        let v = computed_value(f64::NAN, "J", "t", None);
        assert_eq!(require_source(&v), Err(ValidationError::NotFinite));
    }

    #[test]
    fn valid_values_pass_through() {
        let v1 = evidence_value(0.72, "-", Citation::new("paper.pdf", 2), None);
        let v2 = computed_value(100.0, "J", "dummy_tool", None);
        let v3 = assumption_value(288.15, "K", Some(meta(&[("note", "reference env")])));
        let v4 = external_value(
            120.0,
            "EUR/MWh",
            Some(meta(&[("source", "api"), ("time_range", "2025-Q1")])),
        );

        for v in [&v1, &v2, &v3, &v4] {
            let checked = require_source(v).unwrap();
            assert_eq!(checked, v);
        }
    }
}
