//! End-to-end ranking scenarios over parsed HTML.

use logo_finder::{
    Candidate, Field, LogoPipeline, PageContext, PipelineConfig, PipelineOutcome,
    PublicSuffixExtractor, Rule, ScoringConfig, Stage, TagSource,
};
use scraper::Html;

/// Helper to build the context for example.com.
fn example_context(title: &str) -> PageContext {
    PageContext::new(
        "example.com",
        title,
        "https://www.example.com/",
        &PublicSuffixExtractor::new(),
    )
    .unwrap()
}

fn run(html: &str, pipeline: &LogoPipeline) -> PipelineOutcome {
    let document = Html::parse_document(html);
    pipeline
        .run(Some(&document), &example_context("Example - Home"))
        .unwrap()
}

#[test]
fn test_site_logo_selected_and_normalized() {
    let html = r#"
        <html><head><title>Example - Home</title></head>
        <body>
          <img src="/assets/hero-banner.jpg" alt="Spring sale" width="1200" height="600">
          <img src="/assets/example-logo.png" alt="Example Logo" width="50" height="50">
        </body></html>
    "#;

    let outcome = run(html, &LogoPipeline::default());
    assert_eq!(
        outcome,
        PipelineOutcome::Selected("https://example.com/assets/example-logo.png".to_string())
    );
}

#[test]
fn test_single_favicon_link() {
    let html = r#"<html><head><link rel="icon" href="/favicon.ico"></head><body></body></html>"#;

    let outcome = run(html, &LogoPipeline::default());
    assert_eq!(
        outcome,
        PipelineOutcome::Selected("https://example.com/favicon.ico".to_string())
    );
}

#[test]
fn test_no_recognized_images_is_empty() {
    let html = r#"
        <html><head><link rel="stylesheet" href="/site.css"></head>
        <body><img src="/tracking?px=1"><a href="/about">About</a></body></html>
    "#;

    let outcome = run(html, &LogoPipeline::default());
    assert_eq!(outcome, PipelineOutcome::Empty { stage: Stage::Collected });
    assert_eq!(outcome.best_url(), None);
}

#[test]
fn test_missing_document_is_empty() {
    let outcome = LogoPipeline::default()
        .run(None, &example_context(""))
        .unwrap();
    assert_eq!(outcome, PipelineOutcome::Empty { stage: Stage::NoDocument });
}

#[test]
fn test_rank_reports_emptying_stage() {
    let pipeline = LogoPipeline::default();
    let ctx = example_context("");

    assert_eq!(pipeline.rank(None, &ctx).unwrap(), Err(Stage::NoDocument));

    let low = Html::parse_document(r#"<img src="/photos/team.jpg" alt="our team">"#);
    assert_eq!(pipeline.rank(Some(&low), &ctx).unwrap(), Err(Stage::Filtered));

    let logo = Html::parse_document(r#"<img src="/example-logo.png" alt="Example logo">"#);
    let rows = pipeline.rank(Some(&logo), &ctx).unwrap().unwrap();
    assert_eq!(rows[0].url, "https://example.com/example-logo.png");
}

#[test]
fn test_low_scores_filtered_outside_debug() {
    let html = r#"<html><body><img src="/photos/team.jpg" alt="our team"></body></html>"#;

    let outcome = run(html, &LogoPipeline::default());
    assert_eq!(outcome, PipelineOutcome::Empty { stage: Stage::Filtered });

    let debug = LogoPipeline::new(PipelineConfig::new().with_debug(true));
    match run(html, &debug) {
        PipelineOutcome::Table(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].url, "https://example.com/photos/team.jpg");
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_threshold_boundary() {
    let scoring = ScoringConfig::new().with_fuzzy_rules(vec![]).with_exact_rules(vec![
        Rule::literal("ten", 10, Field::Ref),
        Rule::literal("eleven", 11, Field::Ref),
    ]);
    let candidates = vec![
        Candidate::new("example.com", "ten", "/ten.png", TagSource::Img, 1),
        Candidate::new("example.com", "eleven", "/eleven.png", TagSource::Img, 1),
    ];
    let ctx = example_context("");

    let pipeline = LogoPipeline::new(PipelineConfig::new().with_scoring(scoring.clone()));
    assert_eq!(
        pipeline.run_candidates(candidates.clone(), &ctx),
        PipelineOutcome::Selected("https://example.com/eleven.png".to_string())
    );
    let ranking = pipeline.rank(Some(&Html::parse_document("")), &ctx).unwrap();
    assert_eq!(ranking, Err(Stage::Collected));

    let debug = LogoPipeline::new(
        PipelineConfig::new()
            .with_scoring(scoring)
            .with_debug(true),
    );
    match debug.run_candidates(candidates, &ctx) {
        PipelineOutcome::Table(rows) => {
            let scores: Vec<i32> = rows.iter().map(|r| r.score).collect();
            assert_eq!(scores, vec![11, 10]);
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_duplicates_collapse_across_sources() {
    let html = r#"
        <html><body>
          <a href="/"><img src="/brand/example-logo.svg" alt="Example logo"></a>
        </body></html>
    "#;
    let debug = LogoPipeline::new(PipelineConfig::new().with_debug(true));

    match run(html, &debug) {
        PipelineOutcome::Table(rows) => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].source, TagSource::AnchorImg);
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_ties_broken_by_size_then_document_order() {
    let html = r#"
        <html><body>
          <img src="/a/logo.png" alt="logo" width="10" height="10">
          <img src="/b/logo.png" alt="logo" width="100" height="100">
          <img src="/c/logo.png" alt="logo" width="10" height="10">
        </body></html>
    "#;
    let debug = LogoPipeline::new(PipelineConfig::new().with_debug(true));

    match run(html, &debug) {
        PipelineOutcome::Table(rows) => {
            let urls: Vec<&str> = rows.iter().map(|r| r.url.as_str()).collect();
            assert_eq!(
                urls,
                vec![
                    "https://example.com/b/logo.png",
                    "https://example.com/a/logo.png",
                    "https://example.com/c/logo.png",
                ]
            );
            assert_eq!(rows[0].score2, 10000);
            assert!(rows.iter().all(|r| r.score == rows[0].score));
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[test]
fn test_apple_touch_icon_beats_favicon() {
    let html = r#"
        <html><head>
          <link rel="shortcut icon" href="/favicon.ico">
          <link rel="apple-touch-icon" href="/apple-touch-icon.png" sizes="180x180">
        </head></html>
    "#;

    let outcome = run(html, &LogoPipeline::default());
    assert_eq!(
        outcome,
        PipelineOutcome::Selected("https://example.com/apple-touch-icon.png".to_string())
    );
}

#[test]
fn test_score_invariants_hold_for_malformed_markup() {
    let html = r#"
        <html><head><link rel="icon" sizes="huge" href="//cdn.example.com/icon.png"></head>
        <body><img src="/x/logo.png" height="-4" width="abc"><img data-src="/y.gif" width="1e400"></body></html>
    "#;
    let debug = LogoPipeline::new(PipelineConfig::new().with_debug(true));

    match run(html, &debug) {
        PipelineOutcome::Table(rows) => {
            assert_eq!(rows.len(), 3);
            assert!(rows.iter().all(|r| r.score2 >= 1));
            assert!(rows.iter().any(|r| r.url == "https://cdn.example.com/icon.png"));
        }
        other => panic!("expected table, got {:?}", other),
    }
}
