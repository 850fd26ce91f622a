//! Campaign filters: name search and category selection, combined with AND.
//!
//! Filtering always walks the full input and returns a new collection.

use marketing_core::types::Campaign;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Status,
    Objective,
    Medium,
    Format,
    ProductCategory,
}

/// A record that can be matched by name and by categorical field.
pub trait Filterable {
    fn name(&self) -> &str;
    fn category(&self, field: CategoryField) -> &str;
}

impl Filterable for Campaign {
    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self, field: CategoryField) -> &str {
        match field {
            CategoryField::Status => &self.status,
            CategoryField::Objective => &self.objective,
            CategoryField::Medium => &self.medium,
            CategoryField::Format => &self.format,
            CategoryField::ProductCategory => &self.product_category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// Case-insensitive substring of the name. Empty matches everything.
    NameContains { query: String },
    /// Field value is one of `allowed`. An empty set matches everything.
    MemberOf {
        field: CategoryField,
        allowed: BTreeSet<String>,
    },
}

impl Predicate {
    pub fn name_contains(query: impl Into<String>) -> Self {
        Self::NameContains {
            query: query.into(),
        }
    }

    pub fn member_of<I, S>(field: CategoryField, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MemberOf {
            field,
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn matches<R: Filterable>(&self, record: &R) -> bool {
        match self {
            Predicate::NameContains { query } => {
                query.is_empty() || record.name().to_lowercase().contains(&query.to_lowercase())
            }
            Predicate::MemberOf { field, allowed } => {
                allowed.is_empty() || allowed.contains(record.category(*field))
            }
        }
    }
}

/// Records passing every predicate, in input order.
pub fn filter<R: Filterable + Clone>(records: &[R], predicates: &[Predicate]) -> Vec<R> {
    records
        .iter()
        .filter(|r| predicates.iter().all(|p| p.matches(*r)))
        .cloned()
        .collect()
}

/// Filter state of the campaign view: search box plus type selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignFilter {
    pub name: String,
    pub objectives: BTreeSet<String>,
}

impl CampaignFilter {
    pub fn predicates(&self) -> Vec<Predicate> {
        vec![
            Predicate::name_contains(self.name.clone()),
            Predicate::MemberOf {
                field: CategoryField::Objective,
                allowed: self.objectives.clone(),
            },
        ]
    }

    pub fn apply(&self, campaigns: &[Campaign]) -> Vec<Campaign> {
        filter(campaigns, &self.predicates())
    }
}

/// Distinct values of `field`, in first-seen order. Feeds filter dropdowns.
pub fn distinct_values<R: Filterable>(records: &[R], field: CategoryField) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(|r| r.category(field))
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn campaign(id: u64, name: &str, objective: &str) -> Campaign {
        Campaign {
            id,
            name: name.into(),
            objective: objective.into(),
            status: "Active".into(),
            ..Default::default()
        }
    }

    fn fixture() -> Vec<Campaign> {
        vec![
            campaign(1, "Summer Sale - Instagram", "Sales"),
            campaign(2, "Brand Lift - YouTube", "Awareness"),
            campaign(3, "summer lookbook", "Engagement"),
            campaign(4, "Retargeting - Display", "Sales"),
        ]
    }

    fn ids(campaigns: &[Campaign]) -> Vec<u64> {
        campaigns.iter().map(|c| c.id).collect()
    }

    #[test]
    fn test_name_match_is_case_insensitive_substring() {
        let result = filter(&fixture(), &[Predicate::name_contains("SUMMER")]);
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let result = filter(&fixture(), &[Predicate::name_contains("")]);
        assert_eq!(result, fixture());
    }

    #[test]
    fn test_empty_allowed_set_matches_all() {
        let none: [&str; 0] = [];
        let result = filter(&fixture(), &[Predicate::member_of(CategoryField::Objective, none)]);
        assert_eq!(result.len(), 4);
    }

    #[test]
    fn test_predicates_are_conjoined() {
        let result = filter(
            &fixture(),
            &[
                Predicate::name_contains("summer"),
                Predicate::member_of(CategoryField::Objective, ["Sales", "Awareness"]),
            ],
        );
        assert_eq!(ids(&result), vec![1]);
    }

    #[test]
    fn test_no_predicates_returns_copy() {
        let source = fixture();
        let result = filter(&source, &[]);
        assert_eq!(result, source);
    }

    #[test]
    fn test_campaign_filter_state() {
        let state = CampaignFilter {
            name: "- ".into(),
            objectives: ["Sales".to_string()].into_iter().collect(),
        };
        assert_eq!(ids(&state.apply(&fixture())), vec![1, 4]);
        assert_eq!(CampaignFilter::default().apply(&fixture()).len(), 4);
    }

    #[test]
    fn test_distinct_values_first_seen_order() {
        assert_eq!(
            distinct_values(&fixture(), CategoryField::Objective),
            vec!["Sales", "Awareness", "Engagement"]
        );
        assert_eq!(distinct_values(&fixture(), CategoryField::Status), vec!["Active"]);
    }

    #[test]
    fn test_predicate_serde_shape() {
        let json = r#"{"kind": "member_of", "field": "objective", "allowed": ["Sales"]}"#;
        let predicate: Predicate = serde_json::from_str(json).unwrap();
        assert_eq!(predicate, Predicate::member_of(CategoryField::Objective, ["Sales"]));
    }
}
