//! Content queries
//!
//! A [`ContentQuery`] is an ordered list of field conditions, all of which
//! must hold. Building a query never touches the store; backends translate
//! or evaluate the conditions when [`crate::ContentStore::query`] runs.

use ejemplo_core::Filter;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Content type served by the retrieval endpoint.
pub const ARTICLE_TYPE: &str = "article";

/// Queryable fields of a stored content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryField {
    /// Content type (bundle), e.g. `article`.
    Type,
    /// Published flag.
    Status,
    /// Language key.
    Language,
    /// Node id.
    Nid,
}

/// Comparison applied by a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryOperator {
    /// Field equals the value.
    Eq,
    /// Field is one of the values of an array.
    In,
}

/// One field condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCondition {
    pub field: QueryField,
    pub operator: QueryOperator,
    pub value: Value,
}

impl QueryCondition {
    /// Evaluate against a field value.
    pub fn matches(&self, field_value: &Value) -> bool {
        match self.operator {
            QueryOperator::Eq => &self.value == field_value,
            QueryOperator::In => self
                .value
                .as_array()
                .is_some_and(|values| values.contains(field_value)),
        }
    }
}

/// Conjunction of field conditions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentQuery {
    conditions: Vec<QueryCondition>,
}

impl ContentQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality condition.
    pub fn condition(mut self, field: QueryField, value: impl Into<Value>) -> Self {
        self.conditions.push(QueryCondition {
            field,
            operator: QueryOperator::Eq,
            value: value.into(),
        });
        self
    }

    /// Add a membership condition.
    pub fn condition_in<I, V>(mut self, field: QueryField, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.conditions.push(QueryCondition {
            field,
            operator: QueryOperator::In,
            value: Value::Array(values.into_iter().map(Into::into).collect()),
        });
        self
    }

    /// Published articles in the filter's language, restricted to the
    /// filter's ids unless the filter selects all.
    pub fn for_filter(filter: &Filter) -> Self {
        let query = Self::new()
            .condition(QueryField::Type, ARTICLE_TYPE)
            .condition(QueryField::Status, true)
            .condition(QueryField::Language, filter.language.as_str());

        if filter.is_all() {
            query
        } else {
            query.condition_in(QueryField::Nid, filter.identifiers.iter().map(|id| id.get()))
        }
    }

    pub fn conditions(&self) -> &[QueryCondition] {
        &self.conditions
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use ejemplo_core::NodeId;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_id_condition_lists_filter_ids_ascending(raw in prop::collection::btree_set(1u64..10_000, 1..20)) {
            let filter = Filter::for_ids(raw.iter().copied().filter_map(NodeId::new), "en");
            let query = ContentQuery::for_filter(&filter);

            let ids = query
                .conditions()
                .iter()
                .find(|c| c.field == QueryField::Nid && c.operator == QueryOperator::In)
                .map(|c| c.value.clone());
            let expected: Vec<Value> = raw.into_iter().map(Value::from).collect();
            prop_assert_eq!(ids, Some(Value::Array(expected)));
        }

        #[test]
        fn prop_language_condition_is_verbatim(lang in "[a-zA-Z_-]{0,12}") {
            let query = ContentQuery::for_filter(&Filter::all(lang.clone()));
            let language = query
                .conditions()
                .iter()
                .find(|c| c.field == QueryField::Language)
                .map(|c| c.value.clone());
            prop_assert_eq!(language, Some(Value::from(lang)));
        }
    }
}
