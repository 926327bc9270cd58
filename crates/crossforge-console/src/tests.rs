use super::*;

#[test]
fn test_strip_option() {
    assert_eq!(strip_option("Some(17)"), Some("17".to_string()));
    assert_eq!(strip_option("None"), None);
    assert_eq!(strip_option("\"optimal\""), Some("optimal".to_string()));
}

#[test]
fn test_permutation_scale() {
    assert_eq!(permutation_scale(0), "1");
    assert_eq!(permutation_scale(1), "1");
    // 5! = 120
    assert_eq!(permutation_scale(5), "1.200 x 10^2");
    // 10! = 3 628 800
    assert_eq!(permutation_scale(10), "3.629 x 10^6");
}

#[test]
fn test_format_duration_ms() {
    assert_eq!(format_duration_ms(250), "250ms");
    assert_eq!(format_duration_ms(1500), "1.50s");
    assert_eq!(format_duration_ms(125_000), "2m 5s");
}

#[test]
fn test_directive_for_verbosity() {
    assert_eq!(directive_for_verbosity(0), "crossforge_solver=info");
    assert_eq!(directive_for_verbosity(1), "crossforge_solver=debug");
    assert_eq!(directive_for_verbosity(4), "crossforge_solver=trace");
    assert!(DEFAULT_DIRECTIVE.parse::<Directive>().is_ok());
}

#[test]
fn test_unknown_event_is_silent() {
    let visitor = EventVisitor {
        event: Some("something_else".to_string()),
        ..EventVisitor::default()
    };
    assert!(format_event(&visitor, Level::INFO).is_empty());
}

#[test]
fn test_branch_only_at_trace() {
    let visitor = EventVisitor {
        event: Some("branch".to_string()),
        ..EventVisitor::default()
    };
    assert!(format_event(&visitor, Level::DEBUG).is_empty());
    assert!(!format_event(&visitor, Level::TRACE).is_empty());
}
