//! Ownership rule aggregation
//!
//! A generated controller registers every kind it owns exactly once, so rules
//! are unique by `(group, kind)`. A later sighting with another version
//! replaces the recorded version.

use serde::{Deserialize, Serialize};

/// A `(group, version, kind)` the controller must recognize as an owned child
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnershipRule {
    /// API group, empty for core resources
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl OwnershipRule {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    pub fn is_core(&self) -> bool {
        self.group.is_empty()
    }

    fn same_kind(&self, other: &Self) -> bool {
        self.group == other.group && self.kind == other.kind
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OwnershipRules {
    rules: Vec<OwnershipRule>,
}

impl OwnershipRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rule, or overwrite the version of the matching `(group, kind)`
    ///
    /// Only one version per kind is kept. Controllers owning several versions
    /// of one kind lose all but the last one seen.
    pub fn add_or_update(&mut self, rule: OwnershipRule) {
        match self.rules.iter_mut().find(|existing| existing.same_kind(&rule)) {
            Some(existing) if existing.version != rule.version => {
                tracing::warn!(
                    group = %rule.group,
                    kind = %rule.kind,
                    previous = %existing.version,
                    version = %rule.version,
                    "ownership rule version overwritten, only one version per kind is registered"
                );
                existing.version = rule.version;
            }
            Some(_) => {}
            None => self.rules.push(rule),
        }
    }

    pub fn extend<I: IntoIterator<Item = OwnershipRule>>(&mut self, rules: I) {
        for rule in rules {
            self.add_or_update(rule);
        }
    }

    pub fn find(&self, group: &str, kind: &str) -> Option<&OwnershipRule> {
        self.rules
            .iter()
            .find(|rule| rule.group == group && rule.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OwnershipRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_vec(self) -> Vec<OwnershipRule> {
        self.rules
    }
}
