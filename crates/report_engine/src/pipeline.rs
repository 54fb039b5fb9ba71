use std::sync::Arc;

use chrono::{DateTime, Utc};
use report_core::{
    CatalogBuilder, Categorizer, FlyCategory, MarkerSectionExtractor, MentionMatcher,
    PipelineConfig, ReportManifest, ReportSnapshot, ResolvedFly, SectionExtractor,
};
use report_logging::{report_error, report_info, report_warn};
use tokio_util::sync::CancellationToken;

use crate::collections::{fetch_listing, CollectionListing};
use crate::pacing::Pacer;
use crate::resolver::ImageResolver;
use crate::{FetchError, Fetcher, RawPage};

/// Source of the capture timestamp.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("report page unavailable: {0}")]
    ReportFetch(#[source] FetchError),
    #[error("run cancelled")]
    Cancelled,
}

/// Turns the report page into a [`ReportManifest`].
///
/// Only the report page itself is required. Collection feeds, product pages
/// and the section heuristics degrade to empty results.
pub struct Pipeline {
    config: Arc<PipelineConfig>,
    fetcher: Arc<dyn Fetcher>,
    pacer: Arc<dyn Pacer>,
    extractor: Arc<dyn SectionExtractor>,
    matcher: MentionMatcher,
    categorizer: Categorizer,
    clock: Clock,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, fetcher: Arc<dyn Fetcher>, pacer: Arc<dyn Pacer>) -> Self {
        Self {
            extractor: Arc::new(MarkerSectionExtractor::new(config.markers.clone())),
            matcher: MentionMatcher::new(&config.dictionary),
            categorizer: Categorizer::new(&config.keywords),
            config: Arc::new(config),
            fetcher,
            pacer,
            clock: Arc::new(Utc::now),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn SectionExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Like [`Pipeline::run`], but gives up as soon as `cancel` fires. Dropping
    /// the run future aborts every request still in flight.
    pub async fn run_until_cancelled(
        &self,
        cancel: &CancellationToken,
    ) -> Result<ReportManifest, PipelineError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                report_warn!("Pipeline run cancelled");
                Err(PipelineError::Cancelled)
            }
            result = self.run() => result,
        }
    }

    pub async fn run(&self) -> Result<ReportManifest, PipelineError> {
        let report_url = self.config.sources.report_url.as_str();
        report_info!("Fetching fishing report from {}", report_url);
        let page = self
            .fetcher
            .fetch(report_url)
            .await
            .and_then(RawPage::into_success)
            .map_err(|err| {
                report_error!("Failed to fetch report: {}", err);
                PipelineError::ReportFetch(err)
            })?;
        let captured_at = (self.clock)();

        let section = self.extractor.extract(&page.body);
        if section.is_empty() {
            report_warn!("Could not find the report section on {}", report_url);
        }
        let snapshot = ReportSnapshot::from_section(section, report_url, captured_at);

        let mentions = self.matcher.find_mentions(&snapshot.report_text);
        report_info!("Found {} mentioned flies in report", mentions.len());

        let listings = self.fetch_listings().await;
        let resolver = ImageResolver::new(
            self.config.clone(),
            listings,
            self.fetcher.clone(),
            self.pacer.clone(),
        );

        let mut builder = CatalogBuilder::new(self.config.display_cap);
        for mention in &mentions {
            let image_url = resolver.resolve_image(&mention.text).await;
            if image_url.is_none() {
                report_info!("No image found for {}", mention.text);
            }
            builder.push(ResolvedFly {
                name: mention.text.clone(),
                image_url,
                category: self.categorizer.categorize(&mention.text),
            });
        }
        for listing in resolver.listings() {
            builder.extend(listing.products().map(|product| ResolvedFly {
                name: product.name.clone(),
                image_url: product.image.clone(),
                category: listing.category,
            }));
        }
        let catalog = builder.finish();

        report_info!(
            "Catalog: {} dry flies, {} nymphs, {} streamers",
            catalog.dry_flies.len(),
            catalog.nymphs.len(),
            catalog.streamers.len()
        );
        Ok(ReportManifest::assemble(snapshot, &mentions, catalog))
    }

    /// The three collections are independent requests, so they run together.
    async fn fetch_listings(&self) -> Vec<CollectionListing> {
        let sources = &self.config.sources;
        let images = &self.config.images;
        let fetcher = self.fetcher.as_ref();
        let (dry, nymphs, streamers) = tokio::join!(
            fetch_listing(fetcher, FlyCategory::Dry, &sources.dry_flies_collection, images),
            fetch_listing(fetcher, FlyCategory::Nymph, &sources.nymphs_collection, images),
            fetch_listing(
                fetcher,
                FlyCategory::Streamer,
                &sources.streamers_collection,
                images
            ),
        );
        vec![dry, nymphs, streamers]
    }
}
