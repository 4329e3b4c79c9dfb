//! Access rule aggregation
//!
//! Every resource a generated controller manages implies a minimal RBAC rule.
//! Rules are keyed by `(group, resource)` and their verb sets are unioned, so
//! repeated sightings of a kind never produce duplicate entries.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::Value;

use crate::naming::pluralize_kind;

/// Group sentinel used for core API resources
pub const CORE_GROUP: &str = "core";

/// API group of `Role` and `ClusterRole`
pub const RBAC_GROUP: &str = "rbac.authorization.k8s.io";

/// Annotation selecting the access role of a manifest object
pub const ACCESS_ANNOTATION: &str = "opforge.io/access";

/// Verbs granted on kinds the controller creates and owns
pub const OWNED_VERBS: &[&str] = &["get", "list", "watch", "create", "update", "patch", "delete"];

/// Verbs granted on kinds the controller only reads
pub const READ_ONLY_VERBS: &[&str] = &["get", "list", "watch"];

/// How the generated controller interacts with a resource
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceAccess {
    #[default]
    Owned,
    ReadOnly,
}

impl ResourceAccess {
    pub fn verbs(self) -> &'static [&'static str] {
        match self {
            Self::Owned => OWNED_VERBS,
            Self::ReadOnly => READ_ONLY_VERBS,
        }
    }

    /// Parse the value of [`ACCESS_ANNOTATION`]
    pub fn from_annotation(value: &str) -> Option<Self> {
        match value.trim() {
            "read-only" | "readonly" | "readOnly" => Some(Self::ReadOnly),
            "owned" => Some(Self::Owned),
            _ => None,
        }
    }
}

/// Map an API group to its rule group (`""` becomes `core`)
pub fn rule_group(group: &str) -> &str {
    if group.is_empty() { CORE_GROUP } else { group }
}

/// A single permission: verbs on one resource of one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessRule {
    pub group: String,
    pub resource: String,
    pub verbs: IndexSet<String>,
}

impl AccessRule {
    pub fn new<I, S>(group: &str, resource: impl Into<String>, verbs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rule = Self {
            group: rule_group(group).to_string(),
            resource: resource.into(),
            verbs: IndexSet::new(),
        };
        rule.union(verbs);
        rule
    }

    /// Rule implied by managing objects of `kind`
    pub fn for_kind(group: &str, kind: &str, access: ResourceAccess) -> Self {
        Self::new(group, pluralize_kind(kind), access.verbs().iter().copied())
    }

    /// Verbs joined by `;`, as expected by RBAC generator markers
    pub fn verb_string(&self) -> String {
        self.verbs.iter().map(String::as_str).collect::<Vec<_>>().join(";")
    }

    pub fn has_verbs(&self, verbs: &[&str]) -> bool {
        verbs.iter().all(|verb| self.verbs.contains(*verb))
    }

    fn union<I, S>(&mut self, verbs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.verbs.extend(verbs.into_iter().map(Into::into));

        // well-known verbs first, in canonical order, then extras as seen
        let mut ordered: IndexSet<String> = OWNED_VERBS
            .iter()
            .filter(|verb| self.verbs.contains(**verb))
            .map(|verb| verb.to_string())
            .collect();
        ordered.extend(self.verbs.drain(..));
        self.verbs = ordered;
    }
}

/// Deduplicated, order-stable rule set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessRules {
    rules: IndexMap<(String, String), AccessRule>,
}

impl AccessRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, unioning verbs with an existing `(group, resource)` entry
    pub fn add(&mut self, rule: AccessRule) {
        let key = (rule.group.clone(), rule.resource.clone());
        match self.rules.get_mut(&key) {
            Some(existing) => existing.union(rule.verbs),
            None => {
                self.rules.insert(key, rule);
            }
        }
    }

    pub fn extend<I: IntoIterator<Item = AccessRule>>(&mut self, rules: I) {
        for rule in rules {
            self.add(rule);
        }
    }

    pub fn for_resource(&self, group: &str, resource: &str) -> Option<&AccessRule> {
        self.rules
            .get(&(rule_group(group).to_string(), resource.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessRule> {
        self.rules.values()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn into_vec(self) -> Vec<AccessRule> {
        self.rules.into_values().collect()
    }

    /// Rules required to manage one decoded object
    ///
    /// `Role` and `ClusterRole` objects also contribute every rule they grant:
    /// Kubernetes refuses to let a controller create a role carrying
    /// permissions the controller does not hold itself.
    pub fn for_object(group: &str, kind: &str, access: ResourceAccess, object: &Value) -> Self {
        let mut rules = Self::new();
        rules.add(AccessRule::for_kind(group, kind, access));

        if group == RBAC_GROUP && matches!(kind, "Role" | "ClusterRole") {
            rules.extend(granted_rules(object));
        }

        rules
    }
}

impl Serialize for AccessRules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rules.values())
    }
}

fn string_list(value: Option<&Value>) -> Vec<&str> {
    value
        .and_then(Value::as_sequence)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn granted_rules(role: &Value) -> Vec<AccessRule> {
    let Some(rules) = role.get("rules").and_then(Value::as_sequence) else {
        return Vec::new();
    };

    let mut granted = Vec::new();
    for rule in rules {
        let verbs = string_list(rule.get("verbs"));
        if verbs.is_empty() {
            continue;
        }

        let groups = match string_list(rule.get("apiGroups")) {
            groups if groups.is_empty() => vec![""],
            groups => groups,
        };

        for group in &groups {
            for resource in string_list(rule.get("resources")) {
                granted.push(AccessRule::new(group, resource, verbs.iter().copied()));
            }
        }
    }

    granted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_and_read_only_rules() {
        let mut rules = AccessRules::new();
        rules.add(AccessRule::for_kind("apps", "Deployment", ResourceAccess::Owned));
        rules.add(AccessRule::for_kind("apps", "StatefulSet", ResourceAccess::ReadOnly));

        assert_eq!(rules.len(), 2);
        assert_eq!(
            rules.for_resource("apps", "deployments").unwrap().verb_string(),
            "get;list;watch;create;update;patch;delete"
        );
        assert_eq!(
            rules.for_resource("apps", "statefulsets").unwrap().verb_string(),
            "get;list;watch"
        );
    }

    #[test]
    fn test_core_group_sentinel() {
        let rule = AccessRule::for_kind("", "Secret", ResourceAccess::ReadOnly);
        assert_eq!(rule.group, "core");
        assert_eq!(rule.resource, "secrets");

        let mut rules = AccessRules::new();
        rules.add(rule);
        assert!(rules.for_resource("", "secrets").is_some());
        assert!(rules.for_resource("core", "secrets").is_some());
    }

    #[test]
    fn test_verbs_are_unioned() {
        let mut rules = AccessRules::new();
        rules.add(AccessRule::for_kind("", "ConfigMap", ResourceAccess::ReadOnly));
        rules.add(AccessRule::for_kind("", "ConfigMap", ResourceAccess::Owned));
        rules.add(AccessRule::for_kind("", "ConfigMap", ResourceAccess::ReadOnly));

        assert_eq!(rules.len(), 1);
        let rule = rules.for_resource("", "configmaps").unwrap();
        assert_eq!(rule.verbs.len(), 7);
        assert!(rule.has_verbs(OWNED_VERBS));
    }

    #[test]
    fn test_extra_verbs_follow_canonical_ones() {
        let rule = AccessRule::new("", "pods", ["escalate", "delete", "get"]);
        assert_eq!(rule.verb_string(), "get;delete;escalate");
    }

    #[test]
    fn test_order_is_first_seen() {
        let mut rules = AccessRules::new();
        rules.add(AccessRule::for_kind("", "Service", ResourceAccess::Owned));
        rules.add(AccessRule::for_kind("apps", "Deployment", ResourceAccess::Owned));
        rules.add(AccessRule::for_kind("", "Service", ResourceAccess::Owned));

        let resources: Vec<_> = rules.iter().map(|r| r.resource.as_str()).collect();
        assert_eq!(resources, vec!["services", "deployments"]);
    }

    #[test]
    fn test_role_escalation() {
        let role: Value = serde_yaml::from_str(
            r#"
apiVersion: rbac.authorization.k8s.io/v1
kind: ClusterRole
metadata:
  name: reader
rules:
  - apiGroups: [""]
    resources: ["pods", "pods/log"]
    verbs: ["get", "list"]
  - apiGroups: ["apps"]
    resources: ["deployments"]
    verbs: ["get"]
  - nonResourceURLs: ["/healthz"]
    verbs: ["get"]
"#,
        )
        .unwrap();

        let rules = AccessRules::for_object(RBAC_GROUP, "ClusterRole", ResourceAccess::Owned, &role);

        assert_eq!(rules.len(), 4);
        assert!(rules.for_resource(RBAC_GROUP, "clusterroles").is_some());
        assert_eq!(
            rules.for_resource("core", "pods/log").unwrap().verb_string(),
            "get;list"
        );
        assert_eq!(
            rules.for_resource("apps", "deployments").unwrap().verb_string(),
            "get"
        );
    }

    #[test]
    fn test_access_annotation_values() {
        assert_eq!(
            ResourceAccess::from_annotation("read-only"),
            Some(ResourceAccess::ReadOnly)
        );
        assert_eq!(
            ResourceAccess::from_annotation("owned"),
            Some(ResourceAccess::Owned)
        );
        assert_eq!(ResourceAccess::from_annotation("sometimes"), None);
    }

    #[test]
    fn test_rules_serialize_as_list() {
        let mut rules = AccessRules::new();
        rules.add(AccessRule::for_kind("", "Secret", ResourceAccess::ReadOnly));

        let json = serde_json::to_value(&rules).unwrap();
        assert_eq!(json[0]["group"], "core");
        assert_eq!(json[0]["verbs"][2], "watch");
    }
}
