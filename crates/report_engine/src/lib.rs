//! Report engine: network IO, image resolution and pipeline orchestration.
mod collections;
mod decode;
mod fetch;
mod pacing;
mod persist;
mod pipeline;
mod products;
mod resolver;
mod types;

pub use collections::{fetch_listing, CollectionListing, FeedError};
pub use decode::decode_body;
pub use fetch::{FetchSettings, Fetcher, ReqwestFetcher, DEFAULT_USER_AGENT};
pub use pacing::{FixedIntervalPacer, NoPacing, Pacer};
pub use persist::{ensure_output_dir, ManifestWriter, PersistError};
pub use pipeline::{Clock, Pipeline, PipelineError};
pub use products::{
    extract_size, find_detail_image, normalize_image_url, parse_collection_feed,
    parse_product_grid, Product,
};
pub use resolver::ImageResolver;
pub use types::{FailureKind, FetchError, RawPage};
