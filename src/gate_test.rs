use super::*;

fn table() -> RouteTable {
    RouteTable::standard().expect("standard table is disjoint")
}

fn none() -> Markers {
    Markers::default()
}

fn access_only() -> Markers {
    Markers { access: true, refresh: false }
}

fn refresh_only() -> Markers {
    Markers { access: false, refresh: true }
}

fn both() -> Markers {
    Markers { access: true, refresh: true }
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn classify_protected_exact_and_prefix() {
    let t = table();
    assert_eq!(t.classify("/dashboard"), RouteClass::Protected);
    assert_eq!(t.classify("/dashboard/"), RouteClass::Protected);
    assert_eq!(t.classify("/dashboard/reports"), RouteClass::Protected);
    assert_eq!(t.classify("/dashboard/positions/123"), RouteClass::Protected);
}

#[test]
fn classify_auth_only_is_exact() {
    let t = table();
    assert_eq!(t.classify("/login"), RouteClass::AuthOnly);
    assert_eq!(t.classify("/register"), RouteClass::AuthOnly);
    // No prefix semantics for exact patterns.
    assert_eq!(t.classify("/login/extra"), RouteClass::Public);
}

#[test]
fn classify_unknown_paths_are_public() {
    let t = table();
    for path in ["/", "/terms", "/privacy", "/healthz", "/dashboards"] {
        assert_eq!(t.classify(path), RouteClass::Public, "expected public for {path:?}");
    }
}

#[test]
fn classify_malformed_path_is_public() {
    let t = table();
    for path in ["", "dashboard", "no-leading-slash", "https://elsewhere/dashboard"] {
        assert_eq!(t.classify(path), RouteClass::Public, "expected fail-open for {path:?}");
    }
}

// =============================================================================
// Decision table
// =============================================================================

#[test]
fn protected_without_markers_redirects_to_login() {
    let t = table();
    for path in ["/dashboard", "/dashboard/reports", "/dashboard/positions/9"] {
        assert_eq!(
            t.decide(path, none()),
            Decision::RedirectTo(RedirectTarget::Login),
            "expected login redirect for {path:?}"
        );
    }
}

#[test]
fn protected_with_any_marker_allows() {
    let t = table();
    for markers in [access_only(), refresh_only(), both()] {
        assert_eq!(t.decide("/dashboard", markers), Decision::Allow, "markers {markers:?}");
        assert_eq!(t.decide("/dashboard/reports", markers), Decision::Allow, "markers {markers:?}");
    }
}

#[test]
fn auth_only_with_markers_redirects_to_dashboard() {
    let t = table();
    for markers in [access_only(), refresh_only(), both()] {
        assert_eq!(
            t.decide("/login", markers),
            Decision::RedirectTo(RedirectTarget::Dashboard),
            "markers {markers:?}"
        );
        assert_eq!(
            t.decide("/register", markers),
            Decision::RedirectTo(RedirectTarget::Dashboard),
            "markers {markers:?}"
        );
    }
}

#[test]
fn auth_only_without_markers_allows() {
    let t = table();
    assert_eq!(t.decide("/login", none()), Decision::Allow);
    assert_eq!(t.decide("/register", none()), Decision::Allow);
}

#[test]
fn public_allows_regardless_of_markers() {
    let t = table();
    for markers in [none(), access_only(), refresh_only(), both()] {
        for path in ["/", "/terms", "/privacy", "/healthz"] {
            assert_eq!(t.decide(path, markers), Decision::Allow, "path {path:?} markers {markers:?}");
        }
    }
}

#[test]
fn decide_is_deterministic() {
    let t = table();
    for path in ["/dashboard", "/login", "/terms", "", "weird"] {
        for markers in [none(), access_only(), both()] {
            assert_eq!(t.decide(path, markers), t.decide(path, markers));
        }
    }
}

#[test]
fn malformed_path_fails_open() {
    let t = table();
    assert_eq!(t.decide("dashboard", none()), Decision::Allow);
    assert_eq!(t.decide("", both()), Decision::Allow);
}

// =============================================================================
// Disjointness
// =============================================================================

#[test]
fn standard_table_is_disjoint() {
    assert!(RouteTable::standard().is_ok());
}

#[test]
fn overlapping_exacts_rejected() {
    let result = RouteTable::new(
        vec![RoutePattern::Exact("/account")],
        vec![RoutePattern::Exact("/account")],
    );
    assert!(matches!(result, Err(RouteTableError::Overlap { .. })));
}

#[test]
fn auth_only_exact_under_protected_prefix_rejected() {
    let result = RouteTable::new(
        vec![RoutePattern::Prefix("/dashboard/")],
        vec![RoutePattern::Exact("/dashboard/login")],
    );
    assert!(matches!(result, Err(RouteTableError::Overlap { .. })));
}

#[test]
fn protected_exact_under_auth_only_prefix_rejected() {
    let result = RouteTable::new(
        vec![RoutePattern::Exact("/auth/settings")],
        vec![RoutePattern::Prefix("/auth/")],
    );
    assert!(matches!(result, Err(RouteTableError::Overlap { .. })));
}

#[test]
fn nested_prefixes_rejected_either_direction() {
    let a = RouteTable::new(vec![RoutePattern::Prefix("/a/")], vec![RoutePattern::Prefix("/a/b/")]);
    let b = RouteTable::new(vec![RoutePattern::Prefix("/a/b/")], vec![RoutePattern::Prefix("/a/")]);
    assert!(a.is_err());
    assert!(b.is_err());
}

#[test]
fn disjoint_patterns_accepted() {
    let result = RouteTable::new(
        vec![RoutePattern::Prefix("/app/")],
        vec![RoutePattern::Exact("/login")],
    );
    assert!(result.is_ok());
}

// =============================================================================
// Markers
// =============================================================================

#[test]
fn markers_from_jar_reads_both_cookies() {
    let jar = CookieJar::new()
        .add(Cookie::new(ACCESS_MARKER, "tok-a"))
        .add(Cookie::new(REFRESH_MARKER, "tok-r"));
    let markers = Markers::from_jar(&jar);
    assert!(markers.access);
    assert!(markers.refresh);
    assert!(markers.any());
}

#[test]
fn empty_valued_marker_counts_as_absent() {
    let jar = CookieJar::new().add(Cookie::new(ACCESS_MARKER, ""));
    let markers = Markers::from_jar(&jar);
    assert!(!markers.access);
    assert!(!markers.any());
}

#[test]
fn single_marker_is_sufficient() {
    let jar = CookieJar::new().add(Cookie::new(REFRESH_MARKER, "tok-r"));
    assert!(Markers::from_jar(&jar).any());
}

#[test]
fn no_cookies_means_no_markers() {
    assert!(!Markers::from_jar(&CookieJar::new()).any());
}

// =============================================================================
// Redirect targets
// =============================================================================

#[test]
fn url_for_maps_symbolic_targets() {
    let targets = RedirectTargets { login: "/login".to_owned(), dashboard: "/dashboard".to_owned() };
    assert_eq!(targets.url_for(RedirectTarget::Login), "/login");
    assert_eq!(targets.url_for(RedirectTarget::Dashboard), "/dashboard");
}
