use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

use taskdesk_domain::checklist::Bucket;
use taskdesk_domain::TaskId;
use taskdesk_infrastructure::config::ApiConfig;
use taskdesk_infrastructure::http::{ApiChecklistRepository, HttpClient};
use taskdesk_infrastructure::logging::init_logger;

use super::error::CliError;
use super::render::{render_items, render_summary};
use crate::application::services::{AuthService, ChecklistService, ConfigService, LogLevel};

/// TaskDesk: recurring checklist from the employee portal.
#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about)]
pub struct Cli {
    /// Portal API base URL (overrides TASKDESK_API_URL and the stored setting).
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Directory for config, session and logs.
    #[arg(long, global = true, env = "TASKDESK_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Print JSON instead of cards.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Sign in and store the session token.
    Login {
        #[arg(long)]
        employee_id: String,

        #[arg(long, env = "TASKDESK_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session.
    Logout,

    /// Show the tasks in one bucket.
    List {
        #[arg(long, default_value_t = Bucket::Pending)]
        bucket: Bucket,

        /// Evaluate as of this day (YYYY-MM-DD) instead of today.
        #[arg(long)]
        at: Option<NaiveDate>,
    },

    /// Count tasks per bucket.
    Summary {
        #[arg(long)]
        at: Option<NaiveDate>,
    },

    /// Mark a task done and show the refreshed pending list.
    Done { task_id: String },

    /// Show or change stored settings.
    Config {
        /// Stored API base URL; pass an empty value to clear it.
        #[arg(long)]
        set_api_url: Option<String>,

        #[arg(long)]
        set_log_level: Option<LogLevel>,
    },
}

pub async fn run(cli: Cli) -> Result<(), CliError> {
    let config = Arc::new(match &cli.config_dir {
        Some(dir) => ConfigService::with_dir(dir.clone())?,
        None => ConfigService::new()?,
    });

    if let Err(e) = init_logger(&config.log_dir(), Some(config.get_log_level().as_str())) {
        eprintln!("warning: file logging unavailable: {:#}", e);
    }
    log::info!(
        "[config] dir={:?} log_level={}",
        config.config_dir(),
        config.get_log_level().as_str()
    );

    let api = api_config(cli.api_url.as_deref(), &config)?;
    log::debug!("[cli] api={}", api.base_url());
    let client = Arc::new(HttpClient::new(api)?);

    match cli.command {
        Command::Login {
            employee_id,
            password,
        } => {
            let session = AuthService::new(client, config)
                .login(&employee_id, &password)
                .await?;
            let who = session.user.name.as_deref().unwrap_or(employee_id.as_str());
            println!("Signed in as {}.", who);
        }

        Command::Logout => {
            if AuthService::new(client, config).logout()? {
                println!("Signed out.");
            } else {
                println!("No stored session.");
            }
        }

        Command::List { bucket, at } => {
            let service = checklist_service(client, config.resolve_token()?)?;
            let snapshot = service.load().await?;
            let items = match at {
                Some(day) => service.view(&snapshot, bucket, day_start(day)),
                None => service.view_now(&snapshot, bucket),
            };
            if cli.json {
                println!("{}", to_json(&items)?);
            } else {
                print!("{}", render_items(bucket, &items));
            }
        }

        Command::Summary { at } => {
            let service = checklist_service(client, config.resolve_token()?)?;
            let snapshot = service.load().await?;
            let now = at
                .map(day_start)
                .unwrap_or_else(|| Local::now().naive_local());
            let summary = service.summary(&snapshot, now);
            if cli.json {
                println!("{}", to_json(&summary)?);
            } else {
                print!("{}", render_summary(&summary));
            }
        }

        Command::Done { task_id } => {
            let id = TaskId::from_string(task_id.trim());
            let service = checklist_service(client, config.resolve_token()?)?;
            let snapshot = service.mark_done(&id).await?;
            let pending = service.view_now(&snapshot, Bucket::Pending);
            if cli.json {
                println!("{}", to_json(&pending)?);
            } else {
                println!("Marked #{} done.", id);
                print!("{}", render_items(Bucket::Pending, &pending));
            }
        }

        Command::Config {
            set_api_url,
            set_log_level,
        } => {
            if let Some(url) = set_api_url {
                let url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
                if let Some(url) = url.as_deref() {
                    ApiConfig::new(url)?;
                }
                config.set_api_base_url(url)?;
            }
            if let Some(level) = set_log_level {
                config.set_log_level(level)?;
            }

            let stored = config.load_config();
            if cli.json {
                println!("{}", to_json(&stored)?);
            } else {
                println!("config dir: {}", config.config_dir().display());
                println!(
                    "api url:    {}",
                    stored.api_base_url.as_deref().unwrap_or("(default)")
                );
                println!("log level:  {}", stored.log_level.as_str());
            }
        }
    }

    Ok(())
}

/// `--api-url` first, then `TASKDESK_API_URL`, then the stored setting.
fn api_config(flag: Option<&str>, config: &ConfigService) -> anyhow::Result<ApiConfig> {
    match flag {
        Some(url) => ApiConfig::new(url),
        None => ApiConfig::from_env(config.load_config().api_base_url.as_deref()),
    }
}

fn checklist_service(
    client: Arc<HttpClient>,
    token: Option<String>,
) -> Result<ChecklistService, CliError> {
    let token = token.ok_or_else(CliError::not_signed_in)?;
    let repository = ApiChecklistRepository::new(client, token);
    Ok(ChecklistService::new(Arc::new(repository)))
}

fn day_start(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, CliError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::from(taskdesk_domain::DomainError::Serialization(e.to_string())))
}
