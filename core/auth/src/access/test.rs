use std::collections::BTreeMap;
use std::time::Duration;

use warden_errors::AccessDenied;
use warden_models::RoleConditions;
use warden_models::RoleOptions;
use warden_models::RoleSpec;
use warden_models::Traits;
use warden_models::Verb;

use super::AccessChecker;
use super::RoleSetChecker;

fn spec(namespaces: &[&str], rules: &[(&str, bool)]) -> RoleSpec {
    let rules = rules
        .iter()
        .map(|(kind, write)| {
            let verbs = if *write { Verb::rw() } else { Verb::ro() };
            (kind.to_string(), verbs)
        })
        .collect();
    RoleSpec {
        allow: RoleConditions {
            namespaces: namespaces.iter().map(|ns| ns.to_string()).collect(),
            rules,
            ..Default::default()
        },
        options: Default::default(),
    }
}

fn labels(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn empty_spec_denies_everything() {
    let checker = RoleSetChecker::from_spec("empty", RoleSpec::default());
    let error = checker
        .check_access("default", "node", Verb::Read)
        .unwrap_err();
    assert!(error.is::<AccessDenied>());
    assert!(checker.check_node_labels(&labels(&[])).is_err());
    assert!(checker.logins().is_empty());
}

#[test]
fn exact_kind_and_namespace() {
    let checker = RoleSetChecker::from_spec("dev", spec(&["default"], &[("node", false)]));
    assert!(checker.check_access("default", "node", Verb::Read).is_ok());
    assert!(checker.check_access("default", "node", Verb::Write).is_err());
    assert!(checker.check_access("other", "node", Verb::Read).is_err());
    assert!(checker.check_access("default", "user", Verb::Read).is_err());
}

#[test]
fn wildcard_kind_and_namespace() {
    let checker = RoleSetChecker::from_spec("admin", spec(&["*"], &[("*", true)]));
    for kind in ["node", "user", "anything"] {
        assert!(checker.check_access("prod", kind, Verb::Read).is_ok());
        assert!(checker.check_access("prod", kind, Verb::Write).is_ok());
    }
}

#[test]
fn any_role_grants() {
    let roles = vec![
        ("reader".to_string(), spec(&["*"], &[("node", false)])),
        ("writer".to_string(), spec(&["ops"], &[("node", true)])),
    ];
    let checker = RoleSetChecker::from_roles(roles, None);
    assert!(checker.check_access("ops", "node", Verb::Write).is_ok());
    assert!(checker.check_access("dev", "node", Verb::Write).is_err());
    assert!(checker.check_access("dev", "node", Verb::Read).is_ok());
    assert_eq!(checker.role_names(), ["reader", "writer"]);
}

#[test]
fn denial_names_the_request() {
    let checker = RoleSetChecker::from_spec("nop", RoleSpec::default());
    let error = checker
        .check_access("default", "session", Verb::Write)
        .unwrap_err();
    assert_eq!(
        error.to_string(),
        "access denied to perform action write on session in namespace default"
    );
}

#[test]
fn node_label_selectors() {
    let mut role = RoleSpec::default();
    role.allow.node_labels = labels(&[("env", "staging"), ("team", "*")]);
    let checker = RoleSetChecker::from_spec("staging", role);
    assert!(checker
        .check_node_labels(&labels(&[("env", "staging"), ("team", "db")]))
        .is_ok());
    assert!(checker
        .check_node_labels(&labels(&[("env", "prod"), ("team", "db")]))
        .is_err());
    assert!(checker
        .check_node_labels(&labels(&[("env", "staging")]))
        .is_err());

    let mut any = RoleSpec::default();
    any.allow.node_labels = labels(&[("*", "*")]);
    let checker = RoleSetChecker::from_spec("any", any);
    assert!(checker.check_node_labels(&labels(&[])).is_ok());
}

#[test]
fn login_templates_expand_traits() {
    let mut role = RoleSpec::default();
    role.allow.logins = vec![
        "root".to_string(),
        "{{internal.logins}}".to_string(),
        "{{ internal.missing }}".to_string(),
    ];
    let mut traits = Traits::new();
    traits.insert("logins".into(), vec!["alice".into(), "root".into()]);
    let checker = RoleSetChecker::from_roles(vec![("dev".to_string(), role)], Some(&traits));
    assert_eq!(checker.logins(), ["root", "alice"]);
}

#[test]
fn login_templates_without_traits_are_dropped() {
    let mut role = RoleSpec::default();
    role.allow.logins = vec!["{{internal.logins}}".to_string(), "ops".to_string()];
    let checker = RoleSetChecker::from_roles(vec![("dev".to_string(), role)], None);
    assert_eq!(checker.logins(), ["ops"]);
}

#[test]
fn session_ttl_uses_most_restrictive_role() {
    let mut short = RoleSpec::default();
    short.options.max_session_ttl = Some(Duration::from_secs(3600));
    let mut unlimited = RoleSpec::default();
    unlimited.options.max_session_ttl = Some(RoleOptions::MAX_SESSION_TTL);
    let roles = vec![
        ("short".to_string(), short),
        ("unlimited".to_string(), unlimited.clone()),
    ];
    let checker = RoleSetChecker::from_roles(roles, None);
    let ttl = checker.adjust_session_ttl(Duration::from_secs(7200));
    assert_eq!(ttl, Duration::from_secs(3600));

    let checker = RoleSetChecker::from_spec("unlimited", unlimited);
    let requested = Duration::from_secs(365 * 24 * 3600);
    assert_eq!(checker.adjust_session_ttl(requested), requested);
}

#[test]
fn session_ttl_default_applies() {
    let checker = RoleSetChecker::from_spec("plain", RoleSpec::default())
        .with_default_session_ttl(Duration::from_secs(60));
    let ttl = checker.adjust_session_ttl(Duration::from_secs(3600));
    assert_eq!(ttl, Duration::from_secs(60));
}
