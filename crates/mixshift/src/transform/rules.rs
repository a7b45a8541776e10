//! Grouping rules that configure a [`ValueMapping`].
//!
//! Rules are written one per line as `label=member1|member2|...`:
//!
//! ```text
//! Lower grades=G1|G2
//! Upper grades=G3|G4|G5
//! ```

use std::collections::HashMap;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::mapping::ValueMapping;
use crate::error::{MixshiftError, Result};

/// Ordered group label to member values.
///
/// Serializes as a JSON object, e.g. `{"Lower": ["G1", "G2"]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingRules {
    groups: IndexMap<String, Vec<String>>,
}

impl MappingRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add members to a group, creating it if needed.
    ///
    /// A member already listed elsewhere moves to this group, so the most
    /// recent assignment wins even when the label itself was defined earlier.
    pub fn with_group<I, S>(mut self, label: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let label = label.into();
        self.groups.entry(label.clone()).or_default();

        for member in members.into_iter().map(Into::into) {
            for listed in self.groups.values_mut() {
                listed.retain(|m| *m != member);
            }
            if let Some(listed) = self.groups.get_mut(&label) {
                listed.push(member);
            }
        }
        self
    }

    /// Parse rules from text.
    ///
    /// Blank lines are skipped. Non-blank lines without `=` are ignored with a
    /// warning. Labels and members are trimmed and empty members dropped. A
    /// rule with an empty label is an error.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rules = Self::new();

        for (idx, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let Some((label, members)) = line.split_once('=') else {
                warn!("Ignoring mapping line {} without '=': {}", idx + 1, line);
                continue;
            };

            let label = label.trim();
            if label.is_empty() {
                return Err(MixshiftError::MappingRule {
                    line: idx + 1,
                    message: "group label is empty".to_string(),
                });
            }

            let members = members
                .split('|')
                .map(str::trim)
                .filter(|m| !m.is_empty());
            rules = rules.with_group(label, members);
        }

        Ok(rules)
    }

    pub fn is_empty(&self) -> bool {
        self.groups.values().all(Vec::is_empty)
    }

    /// Groups in the order they were first defined.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Flatten into a raw value to label lookup.
    ///
    /// Rules built with [`with_group`](Self::with_group) list each member once.
    /// Deserialized rules may repeat one, in which case the last label wins.
    pub fn to_lookup(&self) -> HashMap<String, String> {
        let mut lookup = HashMap::new();
        for (label, members) in &self.groups {
            for member in members {
                lookup.insert(member.clone(), label.clone());
            }
        }
        lookup
    }

    /// Build the mapping for a dimension column.
    pub fn to_mapping(&self, column: impl Into<String>) -> ValueMapping {
        ValueMapping::new(column, self.to_lookup())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rules() {
        let rules = MappingRules::parse("Lower = G1 | G2\n\nUpper=G3|G4|\n").unwrap();
        let groups: Vec<_> = rules.groups().collect();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], ("Lower", &["G1".to_string(), "G2".to_string()][..]));
        assert_eq!(groups[1].0, "Upper");
        assert_eq!(groups[1].1.len(), 2);

        let lookup = rules.to_lookup();
        assert_eq!(lookup.get("G2").map(String::as_str), Some("Lower"));
        assert_eq!(lookup.get("G4").map(String::as_str), Some("Upper"));
        assert_eq!(lookup.len(), 4);
    }

    #[test]
    fn test_later_rule_wins() {
        let rules = MappingRules::parse("A=x|y\nB=y").unwrap();
        let lookup = rules.to_lookup();
        assert_eq!(lookup["x"], "A");
        assert_eq!(lookup["y"], "B");
    }

    #[test]
    fn test_last_line_wins_over_repeated_label() {
        let rules = MappingRules::parse("A=x\nB=x\nA=x").unwrap();
        assert_eq!(rules.to_lookup()["x"], "A");

        let rules = MappingRules::parse("A=x\nB=x").unwrap();
        assert_eq!(rules.to_lookup()["x"], "B");
    }

    #[test]
    fn test_member_listed_once() {
        let rules = MappingRules::parse("A=x|y\nB=x\nA=y|y").unwrap();
        let groups: Vec<_> = rules.groups().collect();
        assert_eq!(groups[0], ("A", &["y".to_string()][..]));
        assert_eq!(groups[1], ("B", &["x".to_string()][..]));
        assert!(!rules.is_empty());
    }

    #[test]
    fn test_repeated_label_merges() {
        let rules = MappingRules::parse("A=x\nA=y").unwrap();
        assert_eq!(rules.groups().count(), 1);
        assert_eq!(rules.to_lookup().len(), 2);
    }

    #[test]
    fn test_line_without_equals_is_ignored() {
        let rules = MappingRules::parse("just text\nA=x").unwrap();
        assert_eq!(rules.to_lookup().len(), 1);
    }

    #[test]
    fn test_label_may_contain_equals_in_members() {
        let rules = MappingRules::parse("A=x=1|y").unwrap();
        let lookup = rules.to_lookup();
        assert_eq!(lookup["x=1"], "A");
    }

    #[test]
    fn test_empty_label_is_error() {
        let err = MappingRules::parse("A=x\n = y").unwrap_err();
        assert!(matches!(err, MixshiftError::MappingRule { line: 2, .. }));
    }

    #[test]
    fn test_empty_text_is_identity() {
        let rules = MappingRules::parse("  \n").unwrap();
        assert!(rules.is_empty());
        assert!(rules.to_mapping("grade").is_identity());
    }

    #[test]
    fn test_json_form() {
        let rules: MappingRules = serde_json::from_str(r#"{"Lower": ["G1", "G2"]}"#).unwrap();
        assert_eq!(rules, MappingRules::new().with_group("Lower", ["G1", "G2"]));
        assert_eq!(
            serde_json::to_string(&rules).unwrap(),
            r#"{"Lower":["G1","G2"]}"#
        );
    }
}
