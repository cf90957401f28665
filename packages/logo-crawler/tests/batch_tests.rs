use async_trait::async_trait;
use logo_crawler::{
    process_domain, write_results, BatchRunner, FetchError, FetchResult, FetchedPage,
    LinkChecker, PageFetcher,
};
use logo_finder::{LogoPipeline, PipelineConfig, PipelineOutcome, Stage, TagSource};
use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Serves canned pages; unknown URLs fail like an unreachable host.
struct MockFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl MockFetcher {
    fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, html)| (url.to_string(), html.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url) {
            Some(html) => Ok(FetchedPage::from_html(html.as_str(), url)),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

struct DeadPathChecker;

#[async_trait]
impl LinkChecker for DeadPathChecker {
    async fn is_alive(&self, url: &str) -> bool {
        !url.contains("/gone/")
    }
}

const ACME_HTML: &str = r#"<html><head><title>Acme</title></head><body>
    <img src="/acme-logo.png" alt="Acme logo">
    <img src="/team.jpg" alt="our team">
</body></html>"#;

const BETA_HTML: &str =
    r#"<html><head><link rel="icon" href="/favicon.ico"></head><body></body></html>"#;

fn fetcher() -> Arc<MockFetcher> {
    Arc::new(MockFetcher::new(&[
        ("http://acme.com", ACME_HTML),
        ("http://beta.io", BETA_HTML),
    ]))
}

fn domains(list: &[&str]) -> Vec<String> {
    list.iter().map(|d| d.to_string()).collect()
}

#[tokio::test]
async fn test_results_keep_input_order() {
    let fetcher = fetcher();
    let runner = BatchRunner::new(fetcher.clone(), Arc::new(LogoPipeline::default()))
        .with_concurrency(3);

    let results = runner
        .run(domains(&["missing.org", "https://www.Acme.com/", "beta.io"]))
        .await;

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 3);
    let got: Vec<(&str, Option<&str>)> = results
        .iter()
        .map(|r| (r.domain.as_str(), r.outcome.best_url()))
        .collect();
    assert_eq!(
        got,
        vec![
            ("missing.org", None),
            ("https://www.Acme.com/", Some("https://acme.com/acme-logo.png")),
            ("beta.io", Some("https://beta.io/favicon.ico")),
        ]
    );
    assert_eq!(
        results[0].outcome,
        PipelineOutcome::Empty {
            stage: Stage::NoDocument
        }
    );
}

#[tokio::test]
async fn test_debug_mode_returns_full_table() {
    let pipeline = LogoPipeline::new(PipelineConfig::new().with_debug(true));
    let runner = BatchRunner::new(fetcher(), Arc::new(pipeline));

    let results = runner.run(domains(&["acme.com"])).await;

    match &results[0].outcome {
        PipelineOutcome::Table(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].url, "https://acme.com/acme-logo.png");
            assert_eq!(rows[0].source, TagSource::Img);
            assert!(rows[0].score > rows[1].score);
        }
        other => panic!("expected table, got {:?}", other),
    }
}

#[tokio::test]
async fn test_liveness_filter_falls_through_to_next_candidate() {
    let html = r#"<body>
        <img src="/gone/acme-logo.png" alt="Acme logo">
        <img src="/assets/logo.svg" alt="logo">
    </body>"#;
    let fetcher = Arc::new(MockFetcher::new(&[("http://acme.com", html)]));
    let runner = BatchRunner::new(fetcher, Arc::new(LogoPipeline::default()))
        .with_link_checker(Arc::new(DeadPathChecker));

    let results = runner.run(domains(&["acme.com"])).await;

    assert_eq!(
        results[0].outcome,
        PipelineOutcome::Selected("https://acme.com/assets/logo.svg".to_string())
    );
}

#[tokio::test]
async fn test_liveness_filter_can_empty_a_domain() {
    let html = r#"<body><img src="/gone/acme-logo.png" alt="Acme logo"></body>"#;
    let fetcher = Arc::new(MockFetcher::new(&[("http://acme.com", html)]));
    let runner = BatchRunner::new(fetcher, Arc::new(LogoPipeline::default()))
        .with_link_checker(Arc::new(DeadPathChecker));

    let results = runner.run(domains(&["acme.com", "nowhere.net"])).await;

    assert_eq!(results[0].outcome.best_url(), None);
    assert_eq!(
        results[1].outcome,
        PipelineOutcome::Empty {
            stage: Stage::NoDocument
        }
    );
}

#[tokio::test]
async fn test_liveness_keeps_collection_stage_for_imageless_page() {
    let html = r#"<html><head><title>Acme</title></head><body><p>hi</p></body></html>"#;
    let fetcher = Arc::new(MockFetcher::new(&[("http://acme.com", html)]));
    let runner = BatchRunner::new(fetcher, Arc::new(LogoPipeline::default()))
        .with_link_checker(Arc::new(DeadPathChecker));

    let results = runner.run(domains(&["acme.com"])).await;

    assert_eq!(
        results[0].outcome,
        PipelineOutcome::Empty {
            stage: Stage::Collected
        }
    );
}

#[tokio::test]
async fn test_csv_output_for_batch() {
    let runner = BatchRunner::new(fetcher(), Arc::new(LogoPipeline::default()));
    let results = runner.run(domains(&["acme.com", "missing.org"])).await;

    let mut buf = Vec::new();
    write_results(&mut buf, &results, false).unwrap();

    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "acme.com,https://acme.com/acme-logo.png\nmissing.org,\n"
    );
}

/// Collects formatted log lines for assertions.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_stage_timings_are_logged() {
    let logs = LogBuffer::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let fetcher = fetcher();
    let pipeline = LogoPipeline::default();
    let outcome = process_domain("acme.com", fetcher.as_ref(), &pipeline, None).await;
    assert_eq!(outcome.best_url(), Some("https://acme.com/acme-logo.png"));

    let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    for event in [
        "Fetched page",
        "Collection finished",
        "Ranked logo candidates",
        "Processed domain",
    ] {
        let line = output
            .lines()
            .find(|line| line.contains(event))
            .unwrap_or_else(|| panic!("missing {:?} in logs:\n{}", event, output));
        assert!(line.contains("elapsed_ms="), "no timing on {:?}", line);
    }
}
