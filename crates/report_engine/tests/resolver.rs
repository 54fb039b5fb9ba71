mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{config_for, CountingPacer, StubFetcher};
use report_core::FlyCategory;
use report_engine::{CollectionListing, ImageResolver, Product};

const BASE: &str = "https://shop.example.com";

fn product(name: &str, image: &str) -> Product {
    Product {
        name: name.to_string(),
        image: Some(image.to_string()),
        size: None,
        handle: None,
    }
}

fn listing(feed: Vec<Product>, grid: Vec<Product>) -> CollectionListing {
    CollectionListing {
        category: FlyCategory::Nymph,
        url: format!("{BASE}/collections/nymphs"),
        feed,
        grid,
    }
}

fn detail_page(image: &str) -> String {
    format!(r#"<html><body><img src="//shop.example.com/cdn/shop/files/{image}"></body></html>"#)
}

#[tokio::test]
async fn feed_tier_wins_without_network() {
    let fetcher = Arc::new(StubFetcher::new());
    let pacer = Arc::new(CountingPacer::default());
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        vec![listing(
            vec![product("Zebra Midge #18", "https://cdn/feed.jpg")],
            vec![product("Zebra Midge", "https://cdn/grid.jpg")],
        )],
        fetcher.clone(),
        pacer.clone(),
    );

    let image = resolver.resolve_image("Zebra Midge").await;
    assert_eq!(image.as_deref(), Some("https://cdn/feed.jpg"));
    assert!(fetcher.calls().is_empty());
    assert_eq!(pacer.calls(), 0);
}

#[tokio::test]
async fn grid_tier_is_used_when_feed_has_no_match() {
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        vec![listing(
            vec![product("RS2", "https://cdn/rs2.jpg")],
            vec![product("Zebra Midge - Red", "https://cdn/grid.jpg")],
        )],
        Arc::new(StubFetcher::new()),
        Arc::new(CountingPacer::default()),
    );

    let image = resolver.resolve_image("Zebra Midge").await;
    assert_eq!(image.as_deref(), Some("https://cdn/grid.jpg"));
}

#[tokio::test]
async fn detail_page_tier_uses_slug_table() {
    let url = format!("{BASE}/products/zebra-midge");
    let fetcher = Arc::new(StubFetcher::new().with_page(&url, &detail_page("zebra.jpg?v=2")));
    let pacer = Arc::new(CountingPacer::default());
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        vec![listing(Vec::new(), Vec::new())],
        fetcher.clone(),
        pacer.clone(),
    );

    let image = resolver.resolve_image("Zebra Midge").await;
    assert_eq!(
        image.as_deref(),
        Some("https://shop.example.com/cdn/shop/files/zebra.jpg?width=400")
    );
    assert_eq!(fetcher.calls(), vec![url]);
    assert_eq!(pacer.calls(), 1);
}

#[tokio::test]
async fn unknown_slug_skips_detail_tier() {
    let fetcher = Arc::new(StubFetcher::new());
    let pacer = Arc::new(CountingPacer::default());
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        Vec::new(),
        fetcher.clone(),
        pacer.clone(),
    );

    assert_eq!(resolver.resolve_image("Sz 20-24 Midge").await, None);
    assert!(fetcher.calls().is_empty());
    assert_eq!(pacer.calls(), 0);
}

#[tokio::test]
async fn failed_detail_page_resolves_to_none() {
    let url = format!("{BASE}/products/copper-john");
    let fetcher = Arc::new(StubFetcher::new().with_status(&url, 503));
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        Vec::new(),
        fetcher.clone(),
        Arc::new(CountingPacer::default()),
    );

    assert_eq!(resolver.resolve_image("Copper John").await, None);
    assert_eq!(fetcher.calls(), vec![url]);
}

#[tokio::test]
async fn consecutive_detail_fetches_never_overlap() {
    let names = ["Zebra Midge", "Copper John", "RS2"];
    let slugs = ["zebra-midge", "copper-john", "rs2"];
    let mut fetcher = StubFetcher::new()
        .with_delay(Duration::from_millis(20))
        .watching(&format!("{BASE}/products/"));
    for slug in slugs {
        fetcher = fetcher.with_page(
            &format!("{BASE}/products/{slug}"),
            &detail_page(&format!("{slug}.jpg")),
        );
    }
    let fetcher = Arc::new(fetcher);
    let pacer = Arc::new(CountingPacer::default());
    let resolver = ImageResolver::new(
        Arc::new(config_for(BASE)),
        Vec::new(),
        fetcher.clone(),
        pacer.clone(),
    );

    for name in names {
        assert!(resolver.resolve_image(name).await.is_some(), "{name}");
    }

    assert_eq!(fetcher.max_in_flight(), 1);
    assert_eq!(pacer.calls(), 3);
    let expected: Vec<String> = slugs
        .iter()
        .map(|slug| format!("{BASE}/products/{slug}"))
        .collect();
    assert_eq!(fetcher.calls(), expected);
}
