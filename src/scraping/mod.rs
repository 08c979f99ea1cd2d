// src/scraping/mod.rs
pub mod fetcher;
pub mod navigator;
pub mod page_analyzer;
pub mod types;

pub use fetcher::{HttpFetcher, PageFetcher};
pub use navigator::{HttpNavigator, Navigator, WebDriverNavigator};
pub use page_analyzer::{
    extract_form_fields, extract_visible_text, find_apply_link, resolve_link,
};
pub use types::{FormField, ParsedPage};
