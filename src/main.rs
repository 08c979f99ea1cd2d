use anyhow::{Context, Result};
use auto_applier::completion::{ApplicationWriter, CompletionConfig, OpenAiCompletionClient};
use auto_applier::config::{load_job_urls_csv, ConfigFile};
use auto_applier::resume::{load_resume, DEFAULT_RESUME_PATH};
use auto_applier::scraping::{HttpFetcher, HttpNavigator, Navigator, WebDriverNavigator};
use auto_applier::utils::{read_file_content, truncate_for_log};
use auto_applier::{Applier, JobOutcome, PersonalInfo};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "auto-applier")]
#[command(about = "Find job application forms and draft their answers with a language model")]
struct Cli {
    /// Resume file (.pdf or .txt)
    #[arg(default_value = DEFAULT_RESUME_PATH)]
    resume: PathBuf,

    /// Config file (.yaml, .yml or .toml); defaults to ./applier.yaml when present
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV file of job URLs (`url` column, or one URL per line)
    #[arg(long)]
    jobs: Option<PathBuf>,

    /// Job posting URL, may be repeated
    #[arg(long = "job")]
    job_urls: Vec<String>,

    /// File of KEY=value lines replacing the config's personal_info
    #[arg(long)]
    personal_info: Option<PathBuf>,

    /// Navigate with plain HTTP instead of a WebDriver browser session
    #[arg(long)]
    no_browser: bool,

    /// Also draft a cover letter for each job
    #[arg(long)]
    cover_letter: bool,

    /// Print outcomes as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let resume = match load_resume(&cli.resume).await {
        Ok(resume) => resume,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut extra_jobs = cli.job_urls.clone();
    if let Some(path) = &cli.jobs {
        extra_jobs.extend(load_job_urls_csv(path).await?);
    }

    let personal_info = match &cli.personal_info {
        Some(path) => Some(PersonalInfo::parse_block(&read_file_content(path).await?)?),
        None => None,
    };

    let settings = ConfigFile::load_or_default(cli.config.as_deref())
        .await?
        .into_run_settings(extra_jobs, personal_info)?;

    let completion_config = CompletionConfig::from_env(&settings.completion)?;
    let writer = ApplicationWriter::new(
        Box::new(OpenAiCompletionClient::new(completion_config)?),
        &settings.completion,
    );

    let navigator: Box<dyn Navigator> = if cli.no_browser {
        let fetcher = HttpFetcher::new(&settings.http)?;
        Box::new(HttpNavigator::new(Box::new(fetcher)))
    } else {
        Box::new(
            WebDriverNavigator::connect(&settings.browser)
                .await
                .context("Start chromedriver/geckodriver or pass --no-browser")?,
        )
    };

    info!(
        "Applying to {} jobs with resume {}",
        settings.jobs.len(),
        cli.resume.display()
    );

    let mut applier = Applier::new(
        Box::new(HttpFetcher::new(&settings.http)?),
        navigator,
        writer,
        resume,
        settings.personal_info,
    )
    .with_cover_letters(cli.cover_letter);

    let outcomes = applier.run(&settings.jobs).await;

    if let Err(e) = applier.close().await {
        warn!("{:#}", e);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        print_outcomes(&outcomes);
    }

    let failed = outcomes.iter().filter(|o| !o.is_success()).count();
    if failed > 0 {
        error!("{} of {} jobs failed", failed, outcomes.len());
    }
    Ok(())
}

fn print_outcomes(outcomes: &[JobOutcome]) {
    for outcome in outcomes {
        println!("== {}", outcome.url);
        match &outcome.result {
            Ok(report) => {
                if report.form_url != report.url {
                    println!("   form: {}", report.form_url);
                }
                for (field, value) in report.filled_form.iter() {
                    println!("{}: {}", field, value);
                }
                for line in &report.skipped_lines {
                    println!("   (unparsed) {}", truncate_for_log(line, 120));
                }
                if let Some(letter) = &report.cover_letter {
                    println!("\n{}", letter);
                }
            }
            Err(e) => println!("   failed: {}", e),
        }
        println!();
    }

    let succeeded = outcomes.iter().filter(|o| o.is_success()).count();
    println!("{}/{} jobs drafted", succeeded, outcomes.len());
}
