// src/config.rs
use crate::error::ConfigError;
use crate::personal_info::PersonalInfo;
use crate::utils::{get_file_extension, read_file_content};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "applier.yaml";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Contents of `applier.yaml` (or `.toml`).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub jobs: Vec<String>,
    pub personal_info: HashMap<String, String>,
    pub completion: CompletionSettings,
    pub browser: BrowserSettings,
    pub http: HttpSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompletionSettings {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub form_max_tokens: u32,
    pub cover_letter_max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo-instruct".to_string(),
            temperature: 0.5,
            form_max_tokens: 150,
            cover_letter_max_tokens: 300,
            timeout_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub webdriver_url: String,
    pub headless: bool,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:4444".to_string(),
            headless: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Validated settings for one run.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub jobs: Vec<String>,
    pub personal_info: PersonalInfo,
    pub completion: CompletionSettings,
    pub browser: BrowserSettings,
    pub http: HttpSettings,
}

impl ConfigFile {
    /// Load a config file, picking the parser from the extension.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read_file_content(path).await.map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            reason: format!("{:#}", e),
        })?;

        let parse_error = |reason: String| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        };

        let config = match get_file_extension(path).as_deref() {
            Some("yaml") | Some("yml") => {
                serde_yaml::from_str(&content).map_err(|e| parse_error(e.to_string()))?
            }
            Some("toml") => toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?,
            _ => {
                return Err(ConfigError::UnsupportedFormat {
                    path: path.to_path_buf(),
                })
            }
        };

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load the given file, or `applier.yaml` if it exists, or defaults.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path).await;
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
            Self::load(default_path).await
        } else {
            info!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
            Ok(Self::default())
        }
    }

    /// Merge command-line inputs and validate.
    ///
    /// `extra_jobs` are appended after the configured ones; a personal info
    /// override replaces the config's block entirely.
    pub fn into_run_settings(
        self,
        extra_jobs: Vec<String>,
        personal_info_override: Option<PersonalInfo>,
    ) -> Result<RunSettings, ConfigError> {
        let jobs = validate_job_urls(self.jobs.into_iter().chain(extra_jobs))?;
        if jobs.is_empty() {
            return Err(ConfigError::NoJobs);
        }

        let personal_info = match personal_info_override {
            Some(info) => info,
            None => PersonalInfo::from_map(self.personal_info)?,
        };

        Ok(RunSettings {
            jobs,
            personal_info,
            completion: self.completion,
            browser: self.browser,
            http: self.http,
        })
    }
}

/// Trim, drop blanks and duplicates, and require absolute http(s) URLs.
pub fn validate_job_urls(
    urls: impl IntoIterator<Item = String>,
) -> Result<Vec<String>, ConfigError> {
    let mut jobs: Vec<String> = Vec::new();
    for raw in urls {
        let url = raw.trim();
        if url.is_empty() || jobs.iter().any(|j| j == url) {
            continue;
        }
        match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                jobs.push(url.to_string())
            }
            _ => return Err(ConfigError::InvalidJobUrl(url.to_string())),
        }
    }
    Ok(jobs)
}

/// Read job URLs from a CSV file.
///
/// Uses the `url` column when the header has one, otherwise the first column.
pub async fn load_job_urls_csv(path: &Path) -> Result<Vec<String>, ConfigError> {
    let job_list_error = |reason: String| ConfigError::JobList {
        path: path.to_path_buf(),
        reason,
    };

    let content = read_file_content(path)
        .await
        .map_err(|e| job_list_error(format!("{:#}", e)))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| job_list_error(e.to_string()))?
        .clone();
    let url_column = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("url"));

    let mut urls = Vec::new();
    if url_column.is_none() {
        // No header row: the first line is itself a job.
        if let Some(first) = headers.get(0) {
            urls.push(first.trim().to_string());
        }
    }

    for record in reader.records() {
        let record = record.map_err(|e| job_list_error(e.to_string()))?;
        if let Some(url) = record.get(url_column.unwrap_or(0)) {
            urls.push(url.trim().to_string());
        }
    }

    info!("Read {} job URLs from {}", urls.len(), path.display());
    Ok(urls)
}
