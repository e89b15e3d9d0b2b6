//! Provenance-Tagged Quantities
//!
//! ## Overview
//!
//! Every numeric quantity that flows through the engine is wrapped in a
//! [`ValueSpec`]: a value, its unit, a [`Provenance`] tag saying *how the
//! number was obtained*, and the audit metadata that provenance kind
//! requires. No bare floats cross a tool boundary.
//!
//! ## Provenance Kinds
//!
//! | Kind | Meaning | Mandatory metadata |
//! |------|---------|--------------------|
//! | `Evidence` | read from a source document | citation with `pdf_name` + `page` |
//! | `Assumption` | chosen by the analyst | `meta["note"]` |
//! | `External` | fetched from an external dataset | `meta["source"]`, `meta["time_range"]` |
//! | `Computed` | produced by a tool in this crate | `meta["tool"]` |
//!
//! The mandatory-metadata rules are enforced by
//! [`require_source`](crate::provenance::require_source); the factory
//! functions in this module shape the metadata so values they produce always
//! pass.
//!
//! ## Immutability
//!
//! A `ValueSpec` never mutates. Every transformation — unit conversion,
//! computation — produces a *new* instance; the original is retained
//! unchanged for audit. There are no setters, only getters and derived-copy
//! constructors.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::{ValidationError, ValidationResult};

/// Audit metadata attached to a value: free-form string keys, JSON values.
pub type Meta = BTreeMap<String, Value>;

/// How a numeric value was obtained. Closed set; adding a kind is a
/// compile-time-checked change everywhere the engine dispatches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Read from a cited source document.
    Evidence,
    /// Declared by the analyst, with a note explaining the choice.
    Assumption,
    /// Pulled from an external dataset or API.
    External,
    /// Produced by a computation tool in this crate.
    Computed,
}

impl Provenance {
    /// Human-readable tag used in audit metadata.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Evidence => "Evidence",
            Self::Assumption => "Assumption",
            Self::External => "External",
            Self::Computed => "Computed",
        }
    }
}

/// Where an evidence value was read from. Required for `Evidence`-tagged
/// values, immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    pdf_name: String,
    page: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    chunk_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    short_quote: Option<String>,
}

impl Citation {
    /// Citation from a document name and page number.
    pub fn new(pdf_name: impl Into<String>, page: i64) -> Self {
        Self {
            pdf_name: pdf_name.into(),
            page,
            chunk_id: None,
            short_quote: None,
        }
    }

    /// Citation whose page arrives untyped from the retrieval layer.
    ///
    /// Accepts an integer, a float with zero fraction, or a numeric string;
    /// anything else fails with [`ValidationError::PageNotCoercible`].
    pub fn from_raw_page(pdf_name: impl Into<String>, page: &Value) -> ValidationResult<Self> {
        Ok(Self::new(pdf_name, coerce_page(page)?))
    }

    /// Attach the retrieval chunk identifier.
    pub fn with_chunk_id(mut self, chunk_id: impl Into<String>) -> Self {
        self.chunk_id = Some(chunk_id.into());
        self
    }

    /// Attach a short verbatim quote from the source.
    pub fn with_short_quote(mut self, short_quote: impl Into<String>) -> Self {
        self.short_quote = Some(short_quote.into());
        self
    }

    /// Source document name.
    pub fn pdf_name(&self) -> &str {
        &self.pdf_name
    }

    /// Page number within the source document.
    pub fn page(&self) -> i64 {
        self.page
    }

    /// Retrieval chunk identifier, if recorded.
    pub fn chunk_id(&self) -> Option<&str> {
        self.chunk_id.as_deref()
    }

    /// Short verbatim quote, if recorded.
    pub fn short_quote(&self) -> Option<&str> {
        self.short_quote.as_deref()
    }
}

fn coerce_page(page: &Value) -> ValidationResult<i64> {
    let not_coercible = || ValidationError::PageNotCoercible {
        got: page.to_string(),
    };

    match page {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            // Floats from loosely-typed JSON: accept only exact integers.
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Ok(f as i64),
                _ => Err(not_coercible()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| not_coercible()),
        _ => Err(not_coercible()),
    }
}

/// A provenance-tagged quantity: the only shape in which numbers enter or
/// leave the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    value: f64,
    unit: String,
    provenance: Provenance,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    citation: Option<Citation>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    meta: Meta,
}

impl ValueSpec {
    /// Raw constructor. Prefer the factory functions ([`evidence_value`],
    /// [`assumption_value`], [`external_value`], [`computed_value`]), which
    /// shape metadata so the per-kind invariants hold; this constructor
    /// exists for adapters and for building deliberately malformed values in
    /// tests.
    pub fn new(
        value: f64,
        unit: impl Into<String>,
        provenance: Provenance,
        citation: Option<Citation>,
        meta: Option<Meta>,
    ) -> Self {
        Self {
            value,
            unit: unit.into(),
            provenance,
            citation,
            meta: meta.unwrap_or_default(),
        }
    }

    /// The numeric value.
    pub fn value(&self) -> f64 {
        self.value
    }

    /// The unit string (e.g. `"K"`, `"J"`, `"kWh"`).
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// How this value was obtained.
    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Source citation, present on evidence values.
    pub fn citation(&self) -> Option<&Citation> {
        self.citation.as_ref()
    }

    /// Audit metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// A non-empty string entry from the metadata, trimmed.
    pub fn meta_str(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Audit rendering of this value for embedding in downstream metadata.
    pub fn lineage(&self) -> Value {
        json!({
            "value": self.value,
            "unit": self.unit,
            "provenance": self.provenance.as_str(),
        })
    }

    /// Derived copy with a new value and unit, preserving provenance,
    /// citation and metadata. Used by the unit-normalization tools.
    pub(crate) fn converted(&self, value: f64, unit: &str) -> Self {
        Self {
            value,
            unit: unit.to_string(),
            provenance: self.provenance,
            citation: self.citation.clone(),
            meta: self.meta.clone(),
        }
    }
}

/// Value read from a cited source document.
pub fn evidence_value(
    value: f64,
    unit: impl Into<String>,
    citation: Citation,
    meta: Option<Meta>,
) -> ValueSpec {
    ValueSpec::new(value, unit, Provenance::Evidence, Some(citation), meta)
}

/// Evidence value built directly from retrieval-layer fields. The page
/// arrives untyped and is coerced; see [`Citation::from_raw_page`].
pub fn evidence_value_from_pdf(
    value: f64,
    unit: impl Into<String>,
    pdf_name: impl Into<String>,
    page: &Value,
    chunk_id: Option<&str>,
    short_quote: Option<&str>,
    meta: Option<Meta>,
) -> ValidationResult<ValueSpec> {
    let mut citation = Citation::from_raw_page(pdf_name, page)?;
    if let Some(chunk_id) = chunk_id {
        citation = citation.with_chunk_id(chunk_id);
    }
    if let Some(short_quote) = short_quote {
        citation = citation.with_short_quote(short_quote);
    }
    Ok(evidence_value(value, unit, citation, meta))
}

/// Value declared by the analyst. `meta["note"]` is mandatory for the value
/// to pass provenance validation.
pub fn assumption_value(value: f64, unit: impl Into<String>, meta: Option<Meta>) -> ValueSpec {
    ValueSpec::new(value, unit, Provenance::Assumption, None, meta)
}

/// Value pulled from an external dataset. `meta["source"]` and
/// `meta["time_range"]` are mandatory for the value to pass provenance
/// validation.
pub fn external_value(value: f64, unit: impl Into<String>, meta: Option<Meta>) -> ValueSpec {
    ValueSpec::new(value, unit, Provenance::External, None, meta)
}

/// Value produced by a computation tool. Injects `meta["tool"]`, merged over
/// any caller-supplied metadata, so the `Computed` invariant always holds.
pub fn computed_value(
    value: f64,
    unit: impl Into<String>,
    tool_name: &str,
    meta: Option<Meta>,
) -> ValueSpec {
    let mut meta = meta.unwrap_or_default();
    meta.insert("tool".to_string(), Value::from(tool_name));
    ValueSpec::new(value, unit, Provenance::Computed, None, Some(meta))
}
