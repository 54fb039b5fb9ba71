//! Parsers for the shop's product listings and product pages.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use report_core::ImageConfig;
use scraper::{ElementRef, Html, Selector};
use serde::Deserialize;
use url::Url;

/// How far above a product link we look for its card's image and title.
const MAX_CARD_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub name: String,
    pub image: Option<String>,
    pub size: Option<String>,
    pub handle: Option<String>,
}

impl Product {
    fn new(name: &str, image: Option<String>, handle: Option<String>) -> Self {
        let name = name.trim().to_string();
        Self {
            size: extract_size(&name),
            name,
            image,
            handle,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CollectionFeed {
    products: Option<Vec<FeedProduct>>,
}

#[derive(Debug, Deserialize)]
struct FeedProduct {
    title: String,
    #[serde(default)]
    handle: Option<String>,
    #[serde(default)]
    images: Vec<ImageRef>,
    #[serde(default)]
    featured_image: Option<ImageRef>,
}

/// Feeds carry images either as bare URLs or as `{ "src": ... }` objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ImageRef {
    Url(String),
    Object { src: String },
}

impl ImageRef {
    fn src(&self) -> &str {
        match self {
            ImageRef::Url(src) | ImageRef::Object { src } => src,
        }
    }
}

impl FeedProduct {
    fn into_product(self, base: Option<&Url>, images: &ImageConfig) -> Product {
        let image = self
            .images
            .first()
            .or(self.featured_image.as_ref())
            .and_then(|img| normalize_image_url(img.src(), base, images.target_width));
        Product::new(&self.title, image, self.handle)
    }
}

/// Parse a structured collection feed (`{"products": [...]}`).
///
/// `Ok(None)` means the document parsed but carries no product list.
pub fn parse_collection_feed(
    body: &str,
    base: Option<&Url>,
    images: &ImageConfig,
) -> Result<Option<Vec<Product>>, serde_json::Error> {
    let feed: CollectionFeed = serde_json::from_str(body)?;
    Ok(feed.products.map(|products| {
        products
            .into_iter()
            .map(|p| p.into_product(base, images))
            .collect()
    }))
}

/// Scrape products out of a rendered collection page.
///
/// A `var products = [...]` payload in a script wins when present; otherwise
/// each link to `/products/<slug>` is paired with the nearest image and title in
/// its card. A card never extends to an element that also links another product,
/// and a card without an image yields no product.
pub fn parse_product_grid(html: &str, base: Option<&Url>, images: &ImageConfig) -> Vec<Product> {
    let document = Html::parse_document(html);
    if let Some(products) = embedded_products(&document, base, images) {
        return products;
    }

    let (Some(link_sel), Some(img_sel), Some(title_sel)) = (
        Selector::parse(r#"a[href*="/products/"]"#).ok(),
        Selector::parse("img").ok(),
        Selector::parse(r#"[class*="title"]"#).ok(),
    ) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut products = Vec::new();
    for link in document.select(&link_sel) {
        let Some(slug) = link.value().attr("href").and_then(product_slug) else {
            continue;
        };
        if seen.contains(&slug) {
            continue;
        }
        let mut image = None;
        let mut title = own_title(link);
        let mut scope = Some(link);
        for depth in 0..=MAX_CARD_DEPTH {
            let Some(card) = scope else { break };
            // Past the product's own card: the grid container or a sibling card.
            if depth > 0 && links_other_product(card, &link_sel, &slug) {
                break;
            }
            if image.is_none() {
                image = card.select(&img_sel).find_map(image_source);
            }
            if title.is_none() {
                title = card
                    .select(&title_sel)
                    .map(|el| element_text(&el))
                    .find(|text| !text.is_empty());
            }
            if image.is_some() && title.is_some() {
                break;
            }
            scope = card.parent().and_then(ElementRef::wrap);
        }
        let (Some(raw_image), Some(title)) = (image, title) else {
            continue;
        };
        let Some(image) = normalize_image_url(&raw_image, base, images.target_width) else {
            continue;
        };
        seen.insert(slug.clone());
        products.push(Product::new(&title, Some(image), Some(slug)));
    }
    products
}

#[derive(Debug, Deserialize)]
struct EmbeddedProduct {
    title: String,
    #[serde(default)]
    featured_image: Option<String>,
    #[serde(default)]
    images: Vec<String>,
}

fn embedded_products(
    document: &Html,
    base: Option<&Url>,
    images: &ImageConfig,
) -> Option<Vec<Product>> {
    static PAYLOAD: OnceLock<Regex> = OnceLock::new();
    let payload = PAYLOAD.get_or_init(|| {
        Regex::new(r"(?s)var\s+products\s*=\s*(\[.*?\]);").expect("embedded products pattern")
    });
    let script_sel = Selector::parse("script").ok()?;

    document.select(&script_sel).find_map(|script| {
        let source = script.text().collect::<String>();
        let json = payload.captures(&source)?.get(1)?.as_str().to_string();
        let parsed: Vec<EmbeddedProduct> = serde_json::from_str(&json).ok()?;
        let products: Vec<Product> = parsed
            .into_iter()
            .map(|p| {
                let image = p
                    .featured_image
                    .as_deref()
                    .or(p.images.first().map(String::as_str))
                    .and_then(|src| normalize_image_url(src, base, images.target_width));
                Product::new(&p.title, image, None)
            })
            .collect();
        (!products.is_empty()).then_some(products)
    })
}

/// First product image on a detail page: `og:image` or an `<img>` whose URL
/// lives under one of the asset markers and matches nothing on the denylist.
pub fn find_detail_image(html: &str, base: Option<&Url>, images: &ImageConfig) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"meta[property="og:image"], img"#).ok()?;
    let markers: Vec<String> = images.asset_markers.iter().map(|m| m.to_lowercase()).collect();
    let denied: Vec<String> = images.denylist.iter().map(|d| d.to_lowercase()).collect();

    document
        .select(&selector)
        .filter_map(|el| {
            if el.value().name() == "meta" {
                el.value().attr("content").map(str::to_string)
            } else {
                image_source(el)
            }
        })
        .find(|candidate| {
            let lower = candidate.to_lowercase();
            markers.iter().any(|m| lower.contains(m.as_str()))
                && !denied.iter().any(|d| lower.contains(d.as_str()))
        })
        .and_then(|src| normalize_image_url(&src, base, images.target_width))
}

/// Make an image URL absolute, drop cache-busting `v` and sizing `width`
/// parameters and request `target_width` instead.
///
/// Protocol-relative URLs get `https:`; relative paths are resolved against
/// `base`. Returns `None` for anything that cannot become an absolute URL.
pub fn normalize_image_url(raw: &str, base: Option<&Url>, target_width: u32) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.starts_with("data:") {
        return None;
    }
    let mut url = match trimmed.strip_prefix("//") {
        Some(rest) => Url::parse(&format!("https://{rest}")).ok()?,
        None => Url::parse(trimmed)
            .ok()
            .or_else(|| base.and_then(|b| b.join(trimmed).ok()))?,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "v" && key != "width")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();
    url.set_query(None);
    url.query_pairs_mut()
        .extend_pairs(kept)
        .append_pair("width", &target_width.to_string());
    Some(url.into())
}

/// Hook size from a product title such as "Zebra Midge #18".
pub fn extract_size(name: &str) -> Option<String> {
    let (_, after) = name.split_once('#')?;
    let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
    (!digits.is_empty()).then_some(digits)
}

fn product_slug(href: &str) -> Option<String> {
    let (_, rest) = href.split_once("/products/")?;
    let slug = rest.split(['?', '#', '/']).next()?.trim();
    (!slug.is_empty()).then(|| slug.to_string())
}

fn links_other_product(scope: ElementRef<'_>, link_sel: &Selector, slug: &str) -> bool {
    scope
        .select(link_sel)
        .filter_map(|a| a.value().attr("href").and_then(product_slug))
        .any(|other| other != slug)
}

fn own_title(link: ElementRef<'_>) -> Option<String> {
    let is_title = link
        .value()
        .attr("class")
        .is_some_and(|class| class.contains("title"));
    is_title
        .then(|| element_text(&link))
        .filter(|text| !text.is_empty())
}

fn image_source(img: ElementRef<'_>) -> Option<String> {
    let attrs = img.value();
    attrs
        .attr("src")
        .or_else(|| attrs.attr("data-src"))
        .map(str::to_string)
        .or_else(|| {
            attrs
                .attr("srcset")
                .and_then(|set| set.split(',').next())
                .and_then(|first| first.split_whitespace().next())
                .map(str::to_string)
        })
        .filter(|src| !src.trim().is_empty() && !src.contains('{'))
}

fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
