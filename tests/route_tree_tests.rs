//! Route declaration and path helpers
//!
//! Path normalization, parameter names, pattern validation and the route
//! tree built from outlet declarations.

mod common;

use common::*;
use frame_navigator::mask::{create_path_mask, substitute_placeholders};
use frame_navigator::pattern::param_name;
use frame_navigator::*;

#[test]
fn test_normalize_path_variants() {
    assert_eq!(normalize_path("/dashboard"), "/dashboard");
    assert_eq!(normalize_path("dashboard"), "/dashboard");
    assert_eq!(normalize_path("/users/profile/"), "/users/profile");
    assert_eq!(normalize_path("users/{id}/"), "/users/{id}");
    assert_eq!(normalize_path(""), "/");
    assert_eq!(normalize_path("///"), "/");
}

#[test]
fn test_param_name_extraction() {
    assert_eq!(param_name("{id}"), Some("id"));
    assert_eq!(param_name("{service_name}"), Some("service_name"));
    assert_eq!(param_name("{}"), None);
    assert_eq!(param_name("id"), None);
    assert_eq!(param_name("{a}{b}"), None);
    assert_eq!(param_name("x{id}"), None);
}

#[test]
fn test_multiple_params_are_captured() {
    let pattern = RoutePattern::parse("/workspace/{workspace}/project/{project}").unwrap();
    let matched = pattern.match_path("/workspace/123/project/456").unwrap();

    assert_eq!(matched.params.get("workspace"), Some(&"123".to_string()));
    assert_eq!(matched.params.get("project"), Some(&"456".to_string()));
    assert_eq!(matched.remainder, None);
    assert!(pattern.match_path("/workspace/123/project").is_none());
    assert!(pattern.match_path("/workspace/123/project/456/extra").is_none());
}

#[test]
fn test_wildcard_matches_empty_remainder() {
    let pattern = RoutePattern::parse("/docs/*").unwrap();
    assert_eq!(pattern.match_path("/docs").unwrap().remainder.as_deref(), Some(""));
    assert_eq!(
        pattern.match_path("/docs/guide/intro").unwrap().remainder.as_deref(),
        Some("guide/intro")
    );
}

#[test]
fn test_invalid_patterns_are_rejected() {
    assert!(matches!(
        RoutePattern::parse("/a/*/b"),
        Err(RouterError::WildcardNotLast { .. })
    ));
    assert!(matches!(
        RoutePattern::parse("/a/{id}/b/{id}"),
        Err(RouterError::DuplicateParam { name, .. }) if name == "id"
    ));
    assert!(matches!(
        RoutePattern::parse("/a/x{id}"),
        Err(RouterError::InvalidPattern { .. })
    ));
    assert!(matches!(
        RoutePattern::parse("/files/*.txt"),
        Err(RouterError::InvalidPattern { .. })
    ));
}

#[test]
fn test_tree_build_reports_pattern_errors() {
    let err = RouteTree::build(Outlet::new("/").view("/{a}/{a}", page("twice"))).unwrap_err();
    assert!(err.is_registration_error());

    let err = RouteTree::build(
        Outlet::new("/")
            .add(View::new("/a", page("a")).name("same"))
            .outlet(Outlet::new("/b").add(View::new("/", page("b")).name("same"))),
    )
    .unwrap_err();
    assert_eq!(err, RouterError::DuplicateName { name: "same".into() });
}

#[test]
fn test_tree_layout() {
    let tree = cloud_tree();
    assert_eq!(tree.len(), 3);

    let root = tree.root();
    assert_eq!(root.id(), ConfigId::ROOT);
    assert_eq!(root.base_path(), "/");
    assert_eq!(root.children().len(), 1);

    let services = tree.get(root.children()[0]).unwrap();
    assert_eq!(services.base_path(), "/services/{service_name}");
    assert_eq!(services.parent(), Some(ConfigId::ROOT));

    let patterns: Vec<&str> = services
        .table()
        .entries()
        .iter()
        .map(|entry| entry.pattern().as_str())
        .collect();
    assert_eq!(
        patterns,
        vec![
            "/services/{service_name}",
            "/services/{service_name}/vm/{vm}",
            "/services/{service_name}/storage/*"
        ]
    );
    assert!(services.table().entries()[2].is_outlet());

    let storage = tree.get(services.children()[0]).unwrap();
    assert_eq!(storage.base_path(), "/services/{service_name}/storage");
}

#[test]
fn test_included_paths_are_masks() {
    let tree = cloud_tree();
    let services = tree.get(tree.root().children()[0]).unwrap();
    let included: Vec<&str> = services.included_paths().collect();

    assert!(included.contains(&"/services/*"));
    assert!(included.contains(&"/services/*/vm/*"));
    assert!(included.contains(&"/services/*/storage"));
}

#[test]
fn test_config_resolves_without_session() {
    let tree = cloud_tree();
    let target = tree.root().resolve_target("/about?tab=team#people");

    assert_eq!(target.title.as_deref(), Some("About"));
    assert_eq!(target.query_args.get("tab"), Some(&"team".to_string()));
    assert_eq!(target.fragment.as_deref(), Some("people"));
    assert_eq!(target.route_pattern(), Some("/about"));

    let missing = tree.root().resolve_target("/nowhere");
    assert!(missing.is_not_found());
}

#[test]
fn test_url_for_named_views() {
    let tree = cloud_tree();
    let params: RouteParams = [("service_name", "compute")].into_iter().collect();

    assert_eq!(tree.url_for("about", &RouteParams::new()).unwrap(), "/about");
    assert_eq!(tree.url_for("service", &params).unwrap(), "/services/compute");
    assert!(matches!(
        tree.url_for("bucket", &params),
        Err(RouterError::MissingParam { name, .. }) if name == "bucket"
    ));
}

#[test]
fn test_mask_helpers() {
    assert_eq!(create_path_mask("/services/{service_name}/vm"), "/services/*/vm");
    assert_eq!(
        substitute_placeholders("/services/{service_name}/storage", "/services/dns/storage/zones"),
        "/services/dns/storage"
    );

    let masks = MaskSet::new(
        vec![Mask::new("/docs"), Mask::new("/docs/*")],
        vec![Mask::new("/docs/private/*")],
    );
    assert!(masks.handles("/docs"));
    assert!(masks.handles("/docs/intro?x=1"));
    assert!(!masks.handles("/docs/private/keys"));
    assert!(!masks.handles("/blog"));
}
