// src/applier.rs
//! Runs the pipeline over a list of job postings, one at a time.

use crate::completion::{extract_requirements, ApplicationWriter, FilledForm};
use crate::error::JobError;
use crate::personal_info::PersonalInfo;
use crate::scraping::{
    extract_form_fields, find_apply_link, resolve_link, FormField, Navigator, PageFetcher,
    ParsedPage,
};
use anyhow::Result;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::{error, info, info_span, Instrument};

/// Result of one job that made it through the pipeline.
#[derive(Debug, Clone, serde::Serialize)]
pub struct JobReport {
    pub url: String,
    /// Page the form was read from.
    pub form_url: String,
    pub fields: Vec<FormField>,
    pub filled_form: FilledForm,
    pub cover_letter: Option<String>,
    pub skipped_lines: Vec<String>,
}

#[derive(Debug)]
pub struct JobOutcome {
    pub url: String,
    pub result: Result<JobReport, JobError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

impl Serialize for JobOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("JobOutcome", 4)?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("success", &self.is_success())?;
        state.serialize_field("report", &self.result.as_ref().ok())?;
        state.serialize_field(
            "error",
            &self.result.as_ref().err().map(|e| e.to_string()),
        )?;
        state.end()
    }
}

pub struct Applier {
    fetcher: Box<dyn PageFetcher>,
    navigator: Box<dyn Navigator>,
    writer: ApplicationWriter,
    resume: String,
    personal_info: PersonalInfo,
    cover_letters: bool,
}

impl Applier {
    pub fn new(
        fetcher: Box<dyn PageFetcher>,
        navigator: Box<dyn Navigator>,
        writer: ApplicationWriter,
        resume: String,
        personal_info: PersonalInfo,
    ) -> Self {
        Self {
            fetcher,
            navigator,
            writer,
            resume,
            personal_info,
            cover_letters: false,
        }
    }

    pub fn with_cover_letters(mut self, enabled: bool) -> Self {
        self.cover_letters = enabled;
        self
    }

    /// Process every job in order. A failing job is logged and recorded; the
    /// next one still runs.
    pub async fn run(&mut self, urls: &[String]) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            let span = info_span!("job", index = index + 1, total = urls.len(), url = %url);
            let result = self.process_job(url).instrument(span).await;

            match &result {
                Ok(report) => info!(
                    "Job {} done: {} fields proposed from {}",
                    url,
                    report.filled_form.len(),
                    report.form_url
                ),
                Err(e) => error!("Job {} failed: {}", url, e),
            }

            outcomes.push(JobOutcome {
                url: url.clone(),
                result,
            });
        }

        outcomes
    }

    pub async fn process_job(&mut self, url: &str) -> Result<JobReport, JobError> {
        let html = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|e| JobError::Fetch {
                url: url.to_string(),
                reason: format!("{:#}", e),
            })?;
        let job_page = ParsedPage::new(html);

        let form_url = match find_apply_link(&job_page.raw_html) {
            Some(href) => {
                let target = resolve_link(url, &href)?;
                info!("Found apply link: {}", target);
                target.to_string()
            }
            None => {
                info!("No apply link, looking for the form on the job page");
                url.to_string()
            }
        };

        let form_html = self.load_in_browser(&form_url).await?;
        let fields = extract_form_fields(&form_html)?;
        info!("Found {} form fields", fields.len());

        let completion = self
            .writer
            .get_form_completion(&fields, &self.resume, &self.personal_info)
            .await?;

        let cover_letter = if self.cover_letters {
            let requirements = extract_requirements(&job_page.visible_text);
            Some(
                self.writer
                    .generate_cover_letter(&self.resume, &job_page.visible_text, &requirements)
                    .await?,
            )
        } else {
            None
        };

        Ok(JobReport {
            url: url.to_string(),
            form_url,
            fields,
            filled_form: completion.filled,
            cover_letter,
            skipped_lines: completion.skipped_lines,
        })
    }

    async fn load_in_browser(&mut self, url: &str) -> Result<String, JobError> {
        let navigation_error = |e: anyhow::Error| JobError::Navigation {
            url: url.to_string(),
            reason: format!("{:#}", e),
        };

        self.navigator.goto(url).await.map_err(navigation_error)?;
        self.navigator.page_source().await.map_err(navigation_error)
    }

    /// End the browser session.
    pub async fn close(mut self) -> Result<()> {
        self.navigator.close().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::{CompletionClient, CompletionRequest};
    use crate::config::CompletionSettings;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    /// Serves canned pages; records every URL asked for.
    struct FakeWeb {
        pages: HashMap<String, String>,
        log: Log,
    }

    #[async_trait]
    impl PageFetcher for FakeWeb {
        async fn fetch(&self, url: &str) -> anyhow::Result<String> {
            self.log.lock().unwrap().push(format!("fetch {}", url));
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("HTTP error: 404 Not Found"))
        }
    }

    struct FakeBrowser {
        pages: HashMap<String, String>,
        current: Option<String>,
        log: Log,
    }

    #[async_trait]
    impl Navigator for FakeBrowser {
        async fn goto(&mut self, url: &str) -> anyhow::Result<()> {
            self.log.lock().unwrap().push(format!("goto {}", url));
            self.current = Some(
                self.pages
                    .get(url)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("net::ERR_NAME_NOT_RESOLVED"))?,
            );
            Ok(())
        }

        async fn page_source(&mut self) -> anyhow::Result<String> {
            self.current
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no page"))
        }

        async fn close(&mut self) -> anyhow::Result<()> {
            self.log.lock().unwrap().push("close".to_string());
            Ok(())
        }
    }

    struct FakeModel {
        prompts: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    #[async_trait]
    impl CompletionClient for FakeModel {
        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            self.prompts.lock().unwrap().push(request.clone());
            if request.prompt.starts_with("Create a cover letter") {
                Ok("  Dear team, hire me.  ".to_string())
            } else {
                Ok("full_name: John Doe\nemail: johndoe@gmail.com".to_string())
            }
        }
    }

    const JOB_PAGE: &str = r#"<html><body>
        <h1>Rust Engineer</h1>
        <p>Requirements</p>
        <p>Async Rust</p>
        <a href="/jobs/1/apply">Apply Now</a>
        </body></html>"#;

    const FORM_PAGE: &str = r#"<html><body>
        <form action="/submit">
          <input name="full_name" type="text">
          <input name="email" type="email">
        </form></body></html>"#;

    struct Harness {
        applier: Applier,
        log: Log,
        prompts: Arc<Mutex<Vec<CompletionRequest>>>,
    }

    fn to_map(pages: &[(&str, &str)]) -> HashMap<String, String> {
        pages
            .iter()
            .map(|(url, html)| (url.to_string(), html.to_string()))
            .collect()
    }

    fn harness(http: &[(&str, &str)], browser: &[(&str, &str)]) -> Harness {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let applier = Applier::new(
            Box::new(FakeWeb {
                pages: to_map(http),
                log: log.clone(),
            }),
            Box::new(FakeBrowser {
                pages: to_map(browser),
                current: None,
                log: log.clone(),
            }),
            ApplicationWriter::new(
                Box::new(FakeModel {
                    prompts: prompts.clone(),
                }),
                &CompletionSettings::default(),
            ),
            "Ten years of systems programming".to_string(),
            PersonalInfo::parse_block("NAME=John Doe\nEMAIL=johndoe@gmail.com\nPHONE=1").unwrap(),
        );

        Harness {
            applier,
            log,
            prompts,
        }
    }

    #[tokio::test]
    async fn test_follows_apply_link_to_form() {
        let mut h = harness(
            &[("https://jobs.example.com/jobs/1", JOB_PAGE)],
            &[("https://jobs.example.com/jobs/1/apply", FORM_PAGE)],
        );

        let report = h
            .applier
            .process_job("https://jobs.example.com/jobs/1")
            .await
            .unwrap();

        assert_eq!(
            *h.log.lock().unwrap(),
            vec![
                "fetch https://jobs.example.com/jobs/1",
                "goto https://jobs.example.com/jobs/1/apply",
            ]
        );
        assert_eq!(report.form_url, "https://jobs.example.com/jobs/1/apply");
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.filled_form.get("full_name"), Some("John Doe"));
        assert_eq!(report.cover_letter, None);

        let prompts = h.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].prompt.contains(r#"name="full_name""#));
        assert!(prompts[0].prompt.contains(r#"name="email""#));
        assert!(prompts[0].prompt.contains("Ten years of systems programming"));
    }

    #[tokio::test]
    async fn test_without_apply_link_uses_job_page_in_browser() {
        let page = "<h1>Engineer</h1><form><input name=\"full_name\"></form>";
        let mut h = harness(
            &[("https://a.com/job", page)],
            &[("https://a.com/job", page)],
        );

        let report = h.applier.process_job("https://a.com/job").await.unwrap();
        assert_eq!(report.form_url, "https://a.com/job");
        assert_eq!(report.fields.len(), 1);
        assert_eq!(
            *h.log.lock().unwrap(),
            vec!["fetch https://a.com/job", "goto https://a.com/job"]
        );
    }

    #[tokio::test]
    async fn test_failing_job_does_not_stop_the_run() {
        let mut h = harness(
            &[
                ("https://a.com/no-form", "<p>Closed</p>"),
                ("https://jobs.example.com/jobs/1", JOB_PAGE),
            ],
            &[
                ("https://a.com/no-form", "<p>Closed</p>"),
                ("https://jobs.example.com/jobs/1/apply", FORM_PAGE),
            ],
        );

        let urls = vec![
            "https://a.com/no-form".to_string(),
            "https://unreachable.example.com/x".to_string(),
            "https://jobs.example.com/jobs/1".to_string(),
        ];
        let outcomes = h.applier.run(&urls).await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].result, Err(JobError::NoFormFound)));
        assert!(matches!(outcomes[1].result, Err(JobError::Fetch { .. })));
        assert!(outcomes[2].is_success());
        assert_eq!(h.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_navigation_failure_is_scoped_to_job() {
        let mut h = harness(&[("https://jobs.example.com/jobs/1", JOB_PAGE)], &[]);

        let err = h
            .applier
            .process_job("https://jobs.example.com/jobs/1")
            .await
            .unwrap_err();
        assert!(matches!(err, JobError::Navigation { url, .. } if url.ends_with("/apply")));
    }

    #[tokio::test]
    async fn test_cover_letter_uses_description_and_requirements() {
        let h = harness(
            &[("https://jobs.example.com/jobs/1", JOB_PAGE)],
            &[("https://jobs.example.com/jobs/1/apply", FORM_PAGE)],
        );
        let prompts = h.prompts.clone();
        let mut applier = h.applier.with_cover_letters(true);

        let report = applier
            .process_job("https://jobs.example.com/jobs/1")
            .await
            .unwrap();
        assert_eq!(report.cover_letter.as_deref(), Some("Dear team, hire me."));

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[1].max_tokens, 300);
        assert!(prompts[1].prompt.contains("Rust Engineer"));
        assert!(prompts[1]
            .prompt
            .contains("and the job requirements:\nAsync Rust\nApply Now"));
    }

    #[tokio::test]
    async fn test_outcome_serialization() {
        let outcome = JobOutcome {
            url: "https://a.com".to_string(),
            result: Err(JobError::MultipleFormsFound { count: 2 }),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["report"], serde_json::Value::Null);
        assert_eq!(value["error"], "Multiple forms found on page (2)");
    }

    #[tokio::test]
    async fn test_close_ends_browser_session() {
        let h = harness(&[], &[]);
        let log = h.log.clone();
        h.applier.close().await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["close"]);
    }
}
