use chunk_router_rs::pattern::{PatternError, Placeholder, Segment, parse_pattern};

fn placeholder(name: Option<&str>, constraint: Option<&str>) -> Segment {
    Segment::Placeholder(Placeholder {
        name: name.map(str::to_string),
        constraint: constraint.map(str::to_string),
    })
}

#[test]
fn parses_literal_and_parameter() {
    let pattern = parse_pattern("/users/:id").expect("pattern should parse");
    assert_eq!(
        pattern.segments(),
        &[
            Segment::Literal("/users/".to_string()),
            placeholder(Some("id"), None),
        ]
    );
    assert_eq!(pattern.placeholder_count(), 1);
    assert_eq!(pattern.placeholder_names(), vec![Some("id")]);
    assert!(!pattern.is_static());
}

#[test]
fn parses_every_placeholder_form() {
    let pattern = parse_pattern("/{}/{name}/{id:\\d+}/:slug/:rev(v[0-9]+)")
        .expect("pattern should parse");
    let placeholders: Vec<&Segment> = pattern
        .segments()
        .iter()
        .filter(|segment| matches!(segment, Segment::Placeholder(_)))
        .collect();

    assert_eq!(
        placeholders,
        vec![
            &placeholder(None, None),
            &placeholder(Some("name"), None),
            &placeholder(Some("id"), Some("\\d+")),
            &placeholder(Some("slug"), None),
            &placeholder(Some("rev"), Some("v[0-9]+")),
        ]
    );
    assert_eq!(
        pattern.to_regex(),
        "/([^/]+)/([^/]+)/(\\d+)/([^/]+)/(v[0-9]+)"
    );
}

#[test]
fn renders_literals_escaped() {
    let pattern = parse_pattern("/files/report.v1+final").expect("pattern should parse");
    assert!(pattern.is_static());
    assert_eq!(pattern.to_regex(), "/files/report\\.v1\\+final");
}

#[test]
fn escaped_brace_is_literal() {
    let pattern = parse_pattern("/set/\\{x\\}").expect("pattern should parse");
    assert_eq!(pattern.segments(), &[Segment::Literal("/set/{x}".to_string())]);
    assert_eq!(pattern.to_regex(), "/set/\\{x\\}");
}

#[test]
fn rejects_unterminated_placeholder() {
    let err = parse_pattern("/users/{id").expect_err("should fail");
    assert!(matches!(
        err,
        PatternError::UnterminatedPlaceholder { start: 7, .. }
    ));
}

#[test]
fn rejects_unterminated_inline_constraint() {
    let err = parse_pattern("/users/:id(\\d+").expect_err("should fail");
    match err {
        PatternError::UnterminatedConstraint { name, .. } => assert_eq!(name, "id"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn rejects_stray_closing_brace() {
    let err = parse_pattern("/users}").expect_err("should fail");
    assert!(matches!(
        err,
        PatternError::UnexpectedClosingBrace { index: 6, .. }
    ));
}

#[test]
fn rejects_lone_escape() {
    let err = parse_pattern("/users/\\").expect_err("should fail");
    assert!(matches!(err, PatternError::LoneEscapeCharacter { index: 7, .. }));
}

#[test]
fn rejects_colon_without_name() {
    let err = parse_pattern("/users/:/x").expect_err("should fail");
    assert!(matches!(err, PatternError::ParameterMissingName { index: 7, .. }));
}

#[test]
fn rejects_invalid_parameter_names() {
    let err = parse_pattern("/users/{1id}").expect_err("should fail");
    assert!(matches!(
        err,
        PatternError::ParameterInvalidStart { found: '1', .. }
    ));

    let err = parse_pattern("/users/{i-d}").expect_err("should fail");
    assert!(matches!(
        err,
        PatternError::ParameterInvalidCharacter { invalid: '-', .. }
    ));
}

#[test]
fn rejects_empty_constraint() {
    let err = parse_pattern("/users/{id:}").expect_err("should fail");
    assert!(matches!(err, PatternError::EmptyConstraint { .. }));
}
