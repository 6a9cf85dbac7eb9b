//! End-to-end tests of the analysis pipeline over the built-in checks.

use chrono::{TimeZone, Utc};
use lookml_qa::rules::{NamingConventions, Preset};
use lookml_qa::{
    AnalysisSession, Category, Check, CheckOutcome, CheckRegistry, Config, ParseErrorKind,
    RuleEngine, SourceModel, Status, INTERNAL_ERROR_MESSAGE,
};

const ECOMMERCE: &str = include_str!("fixtures/ecommerce.lkml");

fn status_lines(report: &lookml_qa::Report) -> String {
    report
        .results()
        .iter()
        .map(|r| format!("{} {}", r.status().label(), r.id))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_full_report_covers_every_check_in_order() {
    let report = lookml_qa::analyze(ECOMMERCE).unwrap();
    let ids: Vec<&str> = report.results().iter().map(|r| r.id.as_str()).collect();
    let listed: Vec<String> = lookml_qa::list_checks().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, listed);
    assert_eq!(report.len(), 17);
    assert_eq!(report.passed() + report.failed() + report.warnings(), report.len());

    insta::assert_snapshot!(status_lines(&report), @r"
    PASS naming-conventions
    WARNING data-types
    PASS join-optimization
    PASS filter-usage
    WARNING documentation
    PASS sql-injection-protection
    WARNING performance-metrics
    FAIL dimension-groups
    WARNING derived-tables
    PASS code-complexity
    PASS access-grants
    PASS model-organization
    PASS reference-integrity
    PASS color-palette-compliance
    FAIL reserved-colors
    PASS layout-standards
    PASS typography-consistency
    ");
}

#[test]
fn test_analysis_is_deterministic() {
    let first = lookml_qa::analyze(ECOMMERCE).unwrap();
    let second = lookml_qa::analyze(ECOMMERCE).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_parallel_engine_matches_sequential() {
    let registry = lookml_qa::default_registry();
    let sequential = AnalysisSession::new(registry).analyze(ECOMMERCE).unwrap();
    let parallel = AnalysisSession::new(registry)
        .with_engine(RuleEngine::new().parallel(true))
        .analyze(ECOMMERCE)
        .unwrap();
    assert_eq!(sequential, parallel);
}

struct AlwaysPanics;

impl Check for AlwaysPanics {
    fn id(&self) -> &'static str {
        "always-panics"
    }

    fn name(&self) -> &'static str {
        "Always Panics"
    }

    fn category(&self) -> Category {
        Category::Organization
    }

    fn evaluate(&self, _model: &SourceModel) -> CheckOutcome {
        panic!("boom")
    }
}

#[test]
fn test_panicking_check_is_isolated() {
    let mut registry = CheckRegistry::new();
    registry.register(NamingConventions::new()).unwrap();
    registry.register(AlwaysPanics).unwrap();

    for parallel in [false, true] {
        let report = AnalysisSession::new(&registry)
            .with_engine(RuleEngine::new().parallel(parallel))
            .analyze(ECOMMERCE)
            .unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.results()[0].status(), Status::Pass);
        assert_eq!(report.results()[1].id, "always-panics");
        assert_eq!(report.results()[1].status(), Status::Fail);
        assert_eq!(report.results()[1].message(), INTERNAL_ERROR_MESSAGE);
        assert_eq!(report.failed(), 1);
    }
}

#[test]
fn test_export_is_idempotent_at_fixed_time() {
    let at = Utc.with_ymd_and_hms(2026, 10, 19, 15, 4, 5).unwrap();
    let report = lookml_qa::analyze(ECOMMERCE).unwrap();
    let first = lookml_qa::export_at(&report, at);
    let second = lookml_qa::export_at(&lookml_qa::analyze(ECOMMERCE).unwrap(), at);
    assert_eq!(first, second);
    assert_eq!(first.file_name, "qa-report-1792422245000.txt");

    let text = String::from_utf8(first.bytes).unwrap();
    assert!(text.starts_with("LookML QA Analysis Report\nGenerated: 10/19/2026, 3:04:05 PM UTC\n"));
    assert!(text.contains("- Total Checks: 17\n"));
    assert!(text.ends_with('\n'));
}

#[test]
fn test_unterminated_block_is_a_parse_error() {
    let err = lookml_qa::analyze("model: m { explore: e {").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnterminatedBlock);
}

#[test]
fn test_duplicate_dimension_is_rejected() {
    let err = lookml_qa::analyze(
        r"
view: orders {
  dimension: revenue { type: number }
  dimension: revenue { type: number sql: ${TABLE}.revenue ;; }
}",
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ParseErrorKind::DuplicateIdentifier {
            kind: "field",
            name: "revenue".into(),
            first_line: 3,
        }
    );
    assert_eq!(err.line, 4);
}

#[test]
fn test_category_filter_keeps_canonical_order() {
    let report = lookml_qa::analyze(ECOMMERCE).unwrap();
    let visual: Vec<&str> = report
        .in_category(Category::VisualStyle)
        .into_iter()
        .map(|r| r.id.as_str())
        .collect();
    assert_eq!(
        visual,
        [
            "color-palette-compliance",
            "reserved-colors",
            "layout-standards",
            "typography-consistency",
        ]
    );

    let regrouped = report.by_category();
    assert_eq!(regrouped.iter().map(|(_, r)| r.len()).sum::<usize>(), report.len());

    // Grouping is a view over the report; the canonical order is untouched.
    let all: Vec<&str> = report.results().iter().map(|r| r.id.as_str()).collect();
    let listed: Vec<String> = lookml_qa::list_checks().into_iter().map(|d| d.id).collect();
    assert_eq!(all, listed);
}

#[test]
fn test_empty_source_passes_every_check() {
    let report = lookml_qa::analyze("").unwrap();
    assert_eq!(report.len(), 17);
    assert_eq!(report.passed(), 17);
}

#[test]
fn test_disabled_checks_produce_no_result() {
    let config = Config::parse("[checks.reserved-colors]\nenabled = false\n").unwrap();
    let registry = Preset::Full.registry(&config);
    let report = AnalysisSession::new(&registry)
        .with_engine(RuleEngine::from_config(&config))
        .analyze(ECOMMERCE)
        .unwrap();
    assert_eq!(report.len(), 16);
    assert!(report.results().iter().all(|r| r.id != "reserved-colors"));
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_concurrent_sessions_share_the_registry() {
    let reports: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| lookml_qa::analyze(ECOMMERCE).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert!(reports.windows(2).all(|w| w[0] == w[1]));
}
