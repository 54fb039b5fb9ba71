use std::sync::Arc;

use report_core::PipelineConfig;
use report_logging::{report_debug, report_warn};
use url::Url;

use crate::collections::CollectionListing;
use crate::pacing::Pacer;
use crate::products::{find_detail_image, Product};
use crate::{Fetcher, RawPage};

/// Finds a product image for a fly name.
///
/// Tiers, each tried only when the previous one found nothing:
/// 1. products from the structured collection feeds,
/// 2. products scraped from the rendered collection grids,
/// 3. the fly's own product page, when the dictionary knows its slug.
///
/// Detail-page requests go through the pacer. Nothing here fails: any error
/// is logged and the fly simply has no image.
pub struct ImageResolver {
    config: Arc<PipelineConfig>,
    listings: Vec<CollectionListing>,
    fetcher: Arc<dyn Fetcher>,
    pacer: Arc<dyn Pacer>,
}

impl ImageResolver {
    pub fn new(
        config: Arc<PipelineConfig>,
        listings: Vec<CollectionListing>,
        fetcher: Arc<dyn Fetcher>,
        pacer: Arc<dyn Pacer>,
    ) -> Self {
        Self {
            config,
            listings,
            fetcher,
            pacer,
        }
    }

    pub fn listings(&self) -> &[CollectionListing] {
        &self.listings
    }

    pub async fn resolve_image(&self, fly_name: &str) -> Option<String> {
        let feed = self.listings.iter().flat_map(|l| l.feed.iter());
        if let Some(image) = match_product(feed, fly_name) {
            report_debug!("{} resolved from collection feed", fly_name);
            return Some(image);
        }

        let grid = self.listings.iter().flat_map(|l| l.grid.iter());
        if let Some(image) = match_product(grid, fly_name) {
            report_debug!("{} resolved from collection grid", fly_name);
            return Some(image);
        }

        self.resolve_from_detail_page(fly_name).await
    }

    async fn resolve_from_detail_page(&self, fly_name: &str) -> Option<String> {
        let Some(slug) = self.config.dictionary.slug_for(fly_name) else {
            report_debug!("{} has no known slug; no image", fly_name);
            return None;
        };
        let product_url = format!(
            "{}/{}",
            self.config.sources.product_base_url.trim_end_matches('/'),
            slug
        );

        self.pacer.pace().await;
        let page = match self.fetcher.fetch(&product_url).await.and_then(RawPage::into_success) {
            Ok(page) => page,
            Err(err) => {
                report_warn!("Product page for {} unavailable: {}", fly_name, err);
                return None;
            }
        };

        let base = Url::parse(&page.final_url).ok();
        let image = find_detail_image(&page.body, base.as_ref(), &self.config.images);
        if image.is_none() {
            report_warn!("No product image on {}", product_url);
        }
        image
    }
}

/// Exact key match first, then the first product whose name contains the fly
/// name as whole words ("Zebra Midge" matches "Zebra Midge - Black #18").
fn match_product<'a>(
    products: impl Iterator<Item = &'a Product>,
    fly_name: &str,
) -> Option<String> {
    let wanted = name_key(fly_name);
    if wanted.is_empty() {
        return None;
    }
    let padded = format!(" {wanted} ");

    let mut near = None;
    for product in products {
        let Some(image) = product.image.as_ref() else {
            continue;
        };
        let key = name_key(&product.name);
        if key == wanted {
            return Some(image.clone());
        }
        if near.is_none() && format!(" {key} ").contains(&padded) {
            near = Some(image.clone());
        }
    }
    near
}

/// Lowercase words of a product or fly name, without any `#size` suffix.
fn name_key(name: &str) -> String {
    let without_size = name.split('#').next().unwrap_or(name);
    without_size
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
