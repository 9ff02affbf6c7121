//! Request Normalization
//!
//! Turns the raw `node_ids` / `lang` query parameters into a [`Filter`].
//!
//! `node_ids` arrives in one of several wire shapes: a single value
//! (`node_ids=5`), repeated keys (`node_ids=5&node_ids=9`) or the bracket
//! form (`node_ids[]=5&node_ids[]=9`). The shape is resolved once, at the
//! boundary, into [`NodeIdsParam`]; everything after that works on the
//! normalized filter.

use ejemplo_core::{Filter, NodeId, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{ALL_NODES, LANG_PARAM, NODE_IDS_ARRAY_PARAM, NODE_IDS_PARAM};

// ============================================================================
// RAW PARAMETERS
// ============================================================================

/// `node_ids` as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NodeIdsParam {
    #[default]
    Absent,
    /// Exactly one plain `node_ids` key.
    Scalar(String),
    /// Repeated keys or the bracket form, in query order.
    Sequence(Vec<String>),
}

/// Query parameters of a retrieval request before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRetrievalParams {
    pub node_ids: NodeIdsParam,
    pub lang: Option<String>,
}

impl RawRetrievalParams {
    /// Build from decoded query pairs, in query-string order.
    ///
    /// Unknown keys are ignored. A repeated `lang` keeps its last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values = Vec::new();
        let mut bracketed = false;
        let mut lang = None;

        for (key, value) in pairs {
            match key.as_ref() {
                NODE_IDS_PARAM => values.push(value.into()),
                NODE_IDS_ARRAY_PARAM => {
                    bracketed = true;
                    values.push(value.into());
                }
                LANG_PARAM => lang = Some(value.into()),
                _ => {}
            }
        }

        let node_ids = match (values.len(), bracketed) {
            (0, _) => NodeIdsParam::Absent,
            (1, false) => NodeIdsParam::Scalar(values.remove(0)),
            _ => NodeIdsParam::Sequence(values),
        };

        Self { node_ids, lang }
    }
}

// ============================================================================
// SANITIZATION
// ============================================================================

static MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|<[^>]*>?").expect("Invalid markup regex")
});

static SCRIPT_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:java|vb)script\s*:").expect("Invalid scheme regex"));

/// Strip markup and script-scheme markers from a raw token, then trim it.
pub fn sanitize_token(raw: &str) -> String {
    let without_markup = MARKUP.replace_all(raw, "");
    SCRIPT_SCHEME
        .replace_all(&without_markup, "")
        .trim()
        .to_string()
}

/// Validate one raw identifier token.
///
/// Tokens that carried markup are rejected even when what remains is
/// numeric. Parsing is strict: only ASCII digits, no sign, no overflow,
/// and not zero. A token with a numeric prefix (`5abc`, `1.5`) is rejected
/// as a whole rather than truncated to that prefix.
pub fn parse_node_id(raw: &str) -> Result<NodeId, ValidationError> {
    let invalid = || ValidationError::InvalidIdentifier {
        value: raw.to_string(),
    };

    let sanitized = sanitize_token(raw);
    if sanitized != raw.trim() {
        return Err(invalid());
    }
    if sanitized.is_empty() || !sanitized.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    sanitized
        .parse::<u64>()
        .ok()
        .and_then(NodeId::new)
        .ok_or_else(invalid)
}

// ============================================================================
// NORMALIZATION
// ============================================================================

/// Normalize raw parameters into a [`Filter`].
///
/// Pure: never touches the content store.
pub fn normalize(
    params: &RawRetrievalParams,
    default_language: &str,
) -> Result<Filter, ValidationError> {
    let language = params
        .lang
        .as_deref()
        .filter(|lang| !lang.is_empty())
        .unwrap_or(default_language)
        .to_string();

    let tokens: Vec<&str> = match &params.node_ids {
        NodeIdsParam::Absent => return Err(ValidationError::MissingIdentifiers),
        NodeIdsParam::Scalar(value) if value.is_empty() => {
            return Err(ValidationError::MissingIdentifiers)
        }
        NodeIdsParam::Scalar(value) if value == ALL_NODES => return Ok(Filter::all(language)),
        NodeIdsParam::Scalar(value) => vec![value.as_str()],
        NodeIdsParam::Sequence(values) => {
            if values.iter().all(|value| value.is_empty()) {
                return Err(ValidationError::MissingIdentifiers);
            }
            values.iter().map(String::as_str).collect()
        }
    };

    let identifiers = tokens
        .into_iter()
        .map(parse_node_id)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Filter::for_ids(identifiers, language))
}
