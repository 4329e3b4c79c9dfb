//! Naming helpers for generated artifacts
//!
//! Everything the generator emits needs a stable name: Go-style identifiers
//! for API fields, snake_case file names, plural resource names for RBAC and
//! a globally unique identifier per child resource. File names are further
//! deduplicated through a [`FileNameRegistry`].

use std::collections::HashSet;

use phf::phf_map;

use crate::error::NamingError;

/// Placeholder residue that may end up in resource names after marker rewriting
const MARKER_RESIDUE: &[&str] = &[
    "!!var ",
    "!!start ",
    " !!end",
    "!!end",
    "parent.Spec.",
    "collection.Spec.",
];

/// Upper bound for numeric file suffixes before giving up
pub const DEFAULT_MAX_FILE_SUFFIX: usize = 9999;

/// Kinds whose plural is not produced by the English fallback rules
static IRREGULAR_PLURALS: phf::Map<&'static str, &'static str> = phf_map! {
    "endpoints" => "endpoints",
    "componentstatus" => "componentstatuses",
    "securitycontextconstraints" => "securitycontextconstraints",
    "podmetrics" => "podmetrics",
    "nodemetrics" => "nodemetrics",
    "ingress" => "ingresses",
    "ingressclass" => "ingressclasses",
    "storageclass" => "storageclasses",
    "priorityclass" => "priorityclasses",
    "runtimeclass" => "runtimeclasses",
    "volumeattributesclass" => "volumeattributesclasses",
    "networkpolicy" => "networkpolicies",
    "podsecuritypolicy" => "podsecuritypolicies",
    "prioritylevelconfiguration" => "prioritylevelconfigurations",
};

/// Convert a kebab-case name to PascalCase
///
/// `web-store` becomes `WebStore`. Only `-` separates words and only the
/// first letter of each word is touched, so `max_surge` becomes `Max_surge`.
pub fn to_pascal_case(name: &str) -> String {
    let mut output = String::with_capacity(name.len());
    let mut make_upper = true;

    for letter in name.chars() {
        if letter == '-' {
            make_upper = true;
            continue;
        }

        if make_upper {
            output.extend(letter.to_uppercase());
            make_upper = false;
        } else {
            output.push(letter);
        }
    }

    output
}

/// Convert a kebab-case name to a snake_case file name component
pub fn to_file_name(name: &str) -> String {
    name.replace('-', "_").to_lowercase()
}

/// Convert a kebab-case name to an all-lowercase package name
pub fn to_package_name(name: &str) -> String {
    name.replace('-', "").to_lowercase()
}

/// Lowercase plural of a resource kind, as used in RBAC rules
pub fn pluralize_kind(kind: &str) -> String {
    let lower = kind.to_lowercase();

    if let Some(plural) = IRREGULAR_PLURALS.get(lower.as_str()) {
        return (*plural).to_string();
    }

    if lower.ends_with('s')
        || lower.ends_with('x')
        || lower.ends_with('z')
        || lower.ends_with("ch")
        || lower.ends_with("sh")
    {
        format!("{}es", lower)
    } else if lower.ends_with('y') && !ends_with_vowel_y(&lower) {
        format!("{}ies", &lower[..lower.len() - 1])
    } else {
        format!("{}s", lower)
    }
}

fn ends_with_vowel_y(word: &str) -> bool {
    let mut chars = word.chars().rev();
    chars.next();
    matches!(chars.next(), Some('a' | 'e' | 'i' | 'o' | 'u'))
}

/// Turn arbitrary text into an identifier fragment
///
/// Marker residue is removed first, then every run of non-alphanumeric
/// characters acts as a word boundary. Each word gets an uppercase first
/// letter and the words are concatenated: `app-config` becomes `AppConfig`.
pub fn sanitize_identifier(value: &str) -> String {
    let mut cleaned = value.to_string();
    for residue in MARKER_RESIDUE {
        cleaned = cleaned.replace(residue, " ");
    }

    cleaned
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// Globally unique identifier for a child resource
///
/// Deterministic in `(kind, namespace, name)`: `ConfigMap`, `default`,
/// `app-config` yields `ConfigMapDefaultAppConfig`.
pub fn unique_resource_name(kind: &str, namespace: Option<&str>, name: &str) -> String {
    format!(
        "{}{}{}",
        sanitize_identifier(kind),
        sanitize_identifier(namespace.unwrap_or_default()),
        sanitize_identifier(name)
    )
}

/// Candidate source file name for a manifest
///
/// Directories and the manifest's own extension are dropped:
/// `apps/web-store.yaml` with extension `go` becomes `web_store.go`.
pub fn source_file_name(manifest: &str, extension: &str) -> String {
    let base = manifest.rsplit(['/', '\\']).next().unwrap_or(manifest);
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };

    format!("{}.{}", to_file_name(stem).replace('.', "_"), extension)
}

/// Registry of claimed file names for one compilation unit
///
/// Reserved names are claimed up front, so candidates colliding with them are
/// suffixed as well.
#[derive(Debug, Clone)]
pub struct FileNameRegistry {
    claimed: HashSet<String>,
    max_suffix: usize,
}

impl FileNameRegistry {
    /// Create a registry with the given names already claimed
    pub fn new<I, S>(reserved: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            claimed: reserved.into_iter().map(Into::into).collect(),
            max_suffix: DEFAULT_MAX_FILE_SUFFIX,
        }
    }

    /// Override the highest numeric suffix tried before failing
    pub fn with_max_suffix(mut self, max_suffix: usize) -> Self {
        self.max_suffix = max_suffix;
        self
    }

    pub fn is_claimed(&self, name: &str) -> bool {
        self.claimed.contains(name)
    }

    /// Claim `candidate`, or the first free `<stem>_<n>.<ext>` variant
    pub fn claim(&mut self, candidate: &str) -> Result<String, NamingError> {
        if self.claimed.insert(candidate.to_string()) {
            return Ok(candidate.to_string());
        }

        let (stem, extension) = match candidate.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (candidate, None),
        };

        for n in 1..=self.max_suffix {
            let renamed = match extension {
                Some(ext) => format!("{}_{}.{}", stem, n, ext),
                None => format!("{}_{}", stem, n),
            };

            if self.claimed.insert(renamed.clone()) {
                tracing::debug!(candidate, renamed = %renamed, "deduplicated source file name");
                return Ok(renamed);
            }
        }

        Err(NamingError::Exhausted {
            candidate: candidate.to_string(),
            attempts: self.max_suffix,
        })
    }
}

/// Deduplicate an ordered list of candidate file names
pub fn dedup_file_names<I, S>(candidates: &[String], reserved: I) -> Result<Vec<String>, NamingError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut registry = FileNameRegistry::new(reserved);
    candidates
        .iter()
        .map(|candidate| registry.claim(candidate))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_pascal_case() {
        assert_eq!(to_pascal_case("web-store"), "WebStore");
        assert_eq!(to_pascal_case("replicas"), "Replicas");
        assert_eq!(to_pascal_case("webStore"), "WebStore");
        assert_eq!(to_pascal_case("max_surge"), "Max_surge");
        assert_eq!(to_pascal_case("max-surge"), "MaxSurge");
    }

    #[test]
    fn test_file_and_package_names() {
        assert_eq!(to_file_name("Web-Store"), "web_store");
        assert_eq!(to_package_name("web-store"), "webstore");
    }

    #[test]
    fn test_pluralize_kind() {
        assert_eq!(pluralize_kind("Deployment"), "deployments");
        assert_eq!(pluralize_kind("Secret"), "secrets");
        assert_eq!(pluralize_kind("Ingress"), "ingresses");
        assert_eq!(pluralize_kind("NetworkPolicy"), "networkpolicies");
        assert_eq!(pluralize_kind("Endpoints"), "endpoints");
        assert_eq!(pluralize_kind("Gateway"), "gateways");
        assert_eq!(pluralize_kind("Proxy"), "proxies");
        assert_eq!(pluralize_kind("Status"), "statuses");
        assert_eq!(pluralize_kind("Mesh"), "meshes");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("app-config"), "AppConfig");
        assert_eq!(sanitize_identifier("my.app:v1"), "MyAppV1");
        assert_eq!(sanitize_identifier("default"), "Default");
        assert_eq!(sanitize_identifier("!!var parent.Spec.Name"), "Name");
        assert_eq!(
            sanitize_identifier("web-!!start parent.Spec.Suffix !!end"),
            "WebSuffix"
        );
        assert_eq!(sanitize_identifier(""), "");
    }

    #[test]
    fn test_unique_resource_name_distinguishes_namespaces() {
        let a = unique_resource_name("ConfigMap", Some("default"), "app-config");
        let b = unique_resource_name("ConfigMap", Some("other"), "app-config");
        assert_eq!(a, "ConfigMapDefaultAppConfig");
        assert_eq!(b, "ConfigMapOtherAppConfig");

        let cluster = unique_resource_name("ClusterRole", None, "reader");
        assert_eq!(cluster, "ClusterRoleReader");
    }

    #[test]
    fn test_source_file_name() {
        assert_eq!(source_file_name("apps/web-store.yaml", "go"), "web_store.go");
        assert_eq!(source_file_name("deploy.v2.yml", "go"), "deploy_v2.go");
        assert_eq!(source_file_name("resources", "go"), "resources.go");
    }

    #[test]
    fn test_registry_suffixes_identical_candidates() {
        let candidates = vec!["app.go".to_string(); 4];
        let names = dedup_file_names(&candidates, Vec::<String>::new()).unwrap();
        assert_eq!(names, vec!["app.go", "app_1.go", "app_2.go", "app_3.go"]);
    }

    #[test]
    fn test_registry_respects_reserved_names() {
        let candidates = vec!["resources.go".to_string(), "resources.go".to_string()];
        let names = dedup_file_names(&candidates, ["resources.go"]).unwrap();
        assert_eq!(names, vec!["resources_1.go", "resources_2.go"]);
    }

    #[test]
    fn test_registry_checks_whole_claimed_set() {
        // a literal "app_1.go" candidate claimed earlier must be skipped
        let candidates = vec![
            "app_1.go".to_string(),
            "app.go".to_string(),
            "app.go".to_string(),
        ];
        let names = dedup_file_names(&candidates, Vec::<String>::new()).unwrap();
        assert_eq!(names, vec!["app_1.go", "app.go", "app_2.go"]);
    }

    #[test]
    fn test_registry_exhaustion() {
        let mut registry = FileNameRegistry::new(["a.go", "a_1.go"]).with_max_suffix(1);
        let err = registry.claim("a.go").unwrap_err();
        assert_eq!(
            err,
            NamingError::Exhausted {
                candidate: "a.go".to_string(),
                attempts: 1
            }
        );
    }
}
