#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use report_core::{PipelineConfig, SourceConfig};
use report_engine::{FailureKind, FetchError, Fetcher, Pacer, RawPage};

/// Base URI of a local port nothing listens on.
pub fn closed_port_uri() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

pub fn page(url: &str, status: u16, body: &str) -> RawPage {
    RawPage {
        requested_url: url.to_string(),
        final_url: url.to_string(),
        status,
        content_type: Some("text/html; charset=utf-8".to_string()),
        redirect_count: 0,
        body: body.to_string(),
    }
}

/// In-memory fetcher. Unknown URLs fail with a network error. Tracks how many
/// requests under `watched_prefix` overlap.
pub struct StubFetcher {
    pages: HashMap<String, RawPage>,
    delay: Duration,
    watched_prefix: String,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delay: Duration::ZERO,
            watched_prefix: String::new(),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), page(url, 200, body));
        self
    }

    pub fn with_status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), page(url, status, ""));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn watching(mut self, prefix: &str) -> Self {
        self.watched_prefix = prefix.to_string();
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Fetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<RawPage, FetchError> {
        self.calls.lock().unwrap().push(url.to_string());
        let watched = !self.watched_prefix.is_empty() && url.starts_with(&self.watched_prefix);
        if watched {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if watched {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError {
            kind: FailureKind::Network,
            message: format!("connection refused: {url}"),
        })
    }
}

#[derive(Default)]
pub struct CountingPacer {
    calls: AtomicUsize,
}

impl CountingPacer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Pacer for CountingPacer {
    async fn pace(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn config_for(base: &str) -> PipelineConfig {
    PipelineConfig {
        sources: SourceConfig {
            report_url: format!("{base}/pages/report"),
            dry_flies_collection: format!("{base}/collections/dry"),
            nymphs_collection: format!("{base}/collections/nymphs"),
            streamers_collection: format!("{base}/collections/streamers"),
            product_base_url: format!("{base}/products"),
        },
        ..PipelineConfig::default()
    }
}

pub const REPORT_PAGE: &str = r#"<!doctype html>
<html>
<head><title>Poudre River Fishing Report</title></head>
<body>
  <header><a href="/">St. Peter's Fly Shop</a></header>
  <div class="page-content rte">
    <h3>Latest Update: 1/1/24</h3>
    <p>Zebra Midge have been producing in the deeper runs.</p>
    <p><strong>Current Streamflow:</strong> 150 cfs</p>
    <p>Parachute Adams on warm afternoons.</p>
  </div>
  <h2>Poudre River Recommended Flies</h2>
  <footer>Fort Collins, CO</footer>
</body>
</html>
"#;

pub const DRY_FEED: &str = r#"{
  "products": [
    {"title": "Parachute Adams #16", "handle": "parachute-adams",
     "images": [{"src": "//cdn.example.com/adams.jpg?v=1700"}]},
    {"title": "Elk Hair Caddis", "handle": "elk-hair-caddis",
     "images": [], "featured_image": "https://cdn.example.com/ehc.jpg"}
  ]
}"#;

pub const NYMPH_GRID: &str = r#"<html><body>
<ul class="product-grid">
  <li class="grid__item"><div class="card">
    <a href="/products/zebra-midge" class="card__media">
      <img src="//cdn.example.com/zebra.jpg?v=3&width=720" alt="">
    </a>
    <div class="card__info">
      <a href="/products/zebra-midge"><span class="card__title">Zebra Midge - Black #18</span></a>
    </div>
  </div></li>
</ul>
</body></html>"#;
