// src/scraping/navigator.rs
//! Browser sessions. One session is opened per run and reused for every job.

use super::fetcher::PageFetcher;
use crate::config::BrowserSettings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tracing::{info, warn};

#[async_trait]
pub trait Navigator: Send {
    /// Load `url` in the session, replacing the current page.
    async fn goto(&mut self, url: &str) -> Result<()>;

    /// HTML of the current page after scripts have run.
    async fn page_source(&mut self) -> Result<String>;

    async fn close(&mut self) -> Result<()>;
}

/// A WebDriver session (chromedriver, geckodriver, Selenium server).
pub struct WebDriverNavigator {
    client: Client,
}

impl WebDriverNavigator {
    pub async fn connect(settings: &BrowserSettings) -> Result<Self> {
        let mut capabilities = serde_json::Map::new();
        if settings.headless {
            capabilities.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu"] }),
            );
            capabilities.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }

        let mut builder = ClientBuilder::native();
        builder.capabilities(capabilities);
        let client = builder
            .connect(&settings.webdriver_url)
            .await
            .with_context(|| {
                format!(
                    "Failed to start a browser session at {}",
                    settings.webdriver_url
                )
            })?;

        info!(
            "Browser session started via {} (headless: {})",
            settings.webdriver_url, settings.headless
        );
        Ok(Self { client })
    }
}

#[async_trait]
impl Navigator for WebDriverNavigator {
    async fn goto(&mut self, url: &str) -> Result<()> {
        info!("Navigating browser to {}", url);
        self.client
            .goto(url)
            .await
            .with_context(|| format!("Browser failed to load {}", url))
    }

    async fn page_source(&mut self) -> Result<String> {
        self.client
            .source()
            .await
            .context("Failed to read page source from browser")
    }

    async fn close(&mut self) -> Result<()> {
        self.client
            .clone()
            .close()
            .await
            .context("Failed to close browser session")
    }
}

/// Navigation without a browser: every `goto` is an HTTP GET and the page
/// source is the body it returned. Pages rendered by scripts come back bare.
pub struct HttpNavigator {
    fetcher: Box<dyn PageFetcher>,
    current: Option<String>,
}

impl HttpNavigator {
    pub fn new(fetcher: Box<dyn PageFetcher>) -> Self {
        warn!("Running without a browser; script-rendered forms will not be seen");
        Self {
            fetcher,
            current: None,
        }
    }
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn goto(&mut self, url: &str) -> Result<()> {
        self.current = None;
        let html = self.fetcher.fetch(url).await?;
        self.current = Some(html);
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String> {
        self.current
            .clone()
            .context("No page loaded yet")
    }

    async fn close(&mut self) -> Result<()> {
        self.current = None;
        Ok(())
    }
}
