use report_core::{FlyCategory, ImageConfig};
use report_logging::{report_debug, report_info, report_warn};
use url::Url;

use crate::products::{parse_collection_feed, parse_product_grid, Product};
use crate::{FetchError, Fetcher, RawPage};

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("feed is not valid json: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Products of one category collection, split by the tier that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionListing {
    pub category: FlyCategory,
    pub url: String,
    /// From the structured feed.
    pub feed: Vec<Product>,
    /// From the rendered grid; only fetched when the feed gave nothing.
    pub grid: Vec<Product>,
}

impl CollectionListing {
    pub fn empty(category: FlyCategory, url: impl Into<String>) -> Self {
        Self {
            category,
            url: url.into(),
            feed: Vec::new(),
            grid: Vec::new(),
        }
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.feed.iter().chain(self.grid.iter())
    }
}

/// Fetch one collection: structured feed first, rendered grid as fallback.
///
/// Never fails; every problem is logged and leaves the listing empty.
pub async fn fetch_listing(
    fetcher: &dyn Fetcher,
    category: FlyCategory,
    collection_url: &str,
    images: &ImageConfig,
) -> CollectionListing {
    let mut listing = CollectionListing::empty(category, collection_url);
    let base = Url::parse(collection_url).ok();

    match fetch_feed(fetcher, collection_url, base.as_ref(), images).await {
        Ok(products) if !products.is_empty() => {
            report_info!("{:?} feed: {} products", category, products.len());
            listing.feed = products;
            return listing;
        }
        Ok(_) => report_debug!("{:?} feed at {} listed no products", category, collection_url),
        Err(err) => report_warn!("Could not fetch {:?} collection feed: {}", category, err),
    }

    match fetcher.fetch(collection_url).await.and_then(RawPage::into_success) {
        Ok(page) => {
            listing.grid = parse_product_grid(&page.body, base.as_ref(), images);
            report_info!("{:?} grid: {} products", category, listing.grid.len());
        }
        Err(err) => report_warn!("Could not fetch {:?} collection page: {}", category, err),
    }
    listing
}

async fn fetch_feed(
    fetcher: &dyn Fetcher,
    collection_url: &str,
    base: Option<&Url>,
    images: &ImageConfig,
) -> Result<Vec<Product>, FeedError> {
    let feed_url = feed_url(collection_url);
    let page = fetcher.fetch(&feed_url).await?.into_success()?;
    let products = parse_collection_feed(&page.body, base, images)?;
    Ok(products.unwrap_or_default())
}

/// `https://shop/collections/nymphs/` -> `https://shop/collections/nymphs.json`
fn feed_url(collection_url: &str) -> String {
    format!("{}.json", collection_url.trim_end_matches('/'))
}
