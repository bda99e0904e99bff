// ─── Rule Evaluation ───
// One pure decision function shared by libraries and arguments.

use std::collections::HashMap;

use serde::Deserialize;

/// Feature flags a rule may require (e.g. `is_demo_user`).
/// A feature absent from the map counts as `false`.
pub type FeatureSet = HashMap<String, bool>;

#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    pub action: RuleAction,
    #[serde(default)]
    pub os: Option<OsRule>,
    #[serde(default)]
    pub features: Option<HashMap<String, bool>>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Disallow,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OsRule {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Decide whether a rule-gated entry is included.
///
/// Mojang semantics:
/// - No rules → allow.
/// - Otherwise start from disallow; a rule applies when its OS clause (if
///   any) matches the current platform AND every required feature equals the
///   supplied value; the action of the last applying rule wins.
///
/// Pure and deterministic; no I/O.
pub fn decide(rules: &[Rule], features: &FeatureSet) -> bool {
    if rules.is_empty() {
        return true;
    }

    let current_os = current_os_name();
    let mut allowed = false;

    for rule in rules {
        if !rule_applies(rule, current_os, features) {
            continue;
        }
        allowed = rule.action == RuleAction::Allow;
    }

    allowed
}

fn rule_applies(rule: &Rule, current_os: &str, features: &FeatureSet) -> bool {
    if let Some(os) = &rule.os {
        if let Some(name) = &os.name {
            if name != current_os {
                return false;
            }
        }
    }

    if let Some(required) = &rule.features {
        for (feature, required_value) in required {
            let our_value = features.get(feature).copied().unwrap_or(false);
            if our_value != *required_value {
                return false;
            }
        }
    }

    true
}

/// The Mojang OS name for the current platform.
pub fn current_os_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "macos") {
        "osx"
    } else {
        "linux"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules_from(json: serde_json::Value) -> Vec<Rule> {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn no_rules_means_allowed() {
        assert!(decide(&[], &FeatureSet::new()));
    }

    #[test]
    fn bare_allow_applies_everywhere() {
        let rules = rules_from(serde_json::json!([{"action": "allow"}]));
        assert!(decide(&rules, &FeatureSet::new()));
    }

    #[test]
    fn last_matching_rule_wins() {
        let rules = rules_from(serde_json::json!([
            {"action": "allow"},
            {"action": "disallow", "os": {"name": current_os_name()}}
        ]));
        assert!(!decide(&rules, &FeatureSet::new()));
    }

    #[test]
    fn os_mismatch_leaves_default_disallow() {
        let other_os = if cfg!(target_os = "windows") {
            "linux"
        } else {
            "windows"
        };
        let rules =
            rules_from(serde_json::json!([{"action": "allow", "os": {"name": other_os}}]));
        assert!(!decide(&rules, &FeatureSet::new()));
    }

    #[test]
    fn feature_clause_requires_exact_match() {
        let rules = rules_from(serde_json::json!([
            {"action": "allow", "features": {"is_demo_user": true}}
        ]));

        // Absent feature defaults to false, so the rule does not apply.
        assert!(!decide(&rules, &FeatureSet::new()));

        let mut features = FeatureSet::new();
        features.insert("is_demo_user".into(), true);
        assert!(decide(&rules, &features));
    }

    #[test]
    fn rules_without_feature_clause_ignore_the_feature_set() {
        let rules = rules_from(serde_json::json!([{"action": "allow"}]));

        let mut features = FeatureSet::new();
        features.insert("has_custom_resolution".into(), true);

        assert_eq!(
            decide(&rules, &FeatureSet::new()),
            decide(&rules, &features)
        );
    }
}
