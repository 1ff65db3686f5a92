use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use badge_api::{DownloadOptions, Environment, FieldUpdates};
use clap::{Args, Parser, Subcommand};

const LONG_ABOUT: &str = "\
Modify BadgeApp project entries by submitting the site's own edit form.

Example: badge-modify write -S 1 '{\"test_status\": \"Met\"}'
modifies project 1 on the staging site; use -P for production.

For a criterion, the status is in field <criterion>_status (Met, Unmet, ?
or N/A) and the text justification in <criterion>_justification.

Writing needs a logged-in session. Log into the site in a browser, copy the
value of the `_BadgeApp_session` cookie, and either export it as the
environment variable _BadgeApp_session or pass it with -C. A login cookie
stays valid for 48 hours.";

/// Modify BadgeApp project entries.
#[derive(Parser, Debug)]
#[command(name = "badge-modify", version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write field updates to one project
    Write(WriteArgs),

    /// Download the public project listing (cached on disk) and summarize it
    Download(DownloadArgs),
}

/// Which BadgeApp deployment to talk to. At most one may be given.
#[derive(Args, Debug, Default)]
#[group(multiple = false)]
pub struct TargetArgs {
    /// Arbitrary base URL
    #[arg(short = 'b', long = "base", value_name = "URL")]
    pub base: Option<String>,

    /// Local development server
    #[arg(short = 'L', long)]
    pub local: bool,

    /// Staging site
    #[arg(short = 'S', long)]
    pub staging: bool,

    /// Production site (REAL data)
    #[arg(short = 'P', long)]
    pub production: bool,
}

impl TargetArgs {
    pub fn base_url(&self) -> Option<String> {
        if let Some(base) = self.base.as_deref().filter(|base| !base.trim().is_empty()) {
            return Some(base.to_owned());
        }
        let environment = if self.local {
            Environment::Local
        } else if self.staging {
            Environment::Staging
        } else if self.production {
            Environment::Production
        } else {
            return None;
        };
        Some(environment.base_url().to_owned())
    }
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Session cookie value, else taken from the environment
    #[arg(
        short = 'C',
        long = "cookie",
        value_name = "VALUE",
        env = "_BadgeApp_session",
        hide_env_values = true
    )]
    pub session_cookie: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Project id (number) to modify
    pub project_id: u64,

    /// Updated data as a JSON object, e.g. '{"test_status": "Met"}'
    pub updated_data: String,
}

impl WriteArgs {
    pub fn session_cookie(&self) -> Result<&str> {
        match self.session_cookie.as_deref() {
            Some(value) if !value.trim().is_empty() => Ok(value),
            _ => bail!("we must have a session cookie value to proceed; use --help for more information"),
        }
    }

    pub fn base_url(&self) -> Result<String> {
        match self.target.base_url() {
            Some(base) => Ok(base),
            None => bail!("we must have a base (-b/--base, -L, -S, or -P); use --help for more information"),
        }
    }

    pub fn updates(&self) -> Result<FieldUpdates> {
        FieldUpdates::from_json(&self.updated_data)
            .context("updated data must be a JSON object with double-quoted strings")
    }
}

#[derive(Args, Debug)]
pub struct DownloadArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Cache file; delete it to force a fresh download
    #[arg(long, value_name = "FILE", default_value = "projects.json")]
    pub cache: PathBuf,

    /// Also count projects implemented in this language
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Delay between page requests, in milliseconds
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub page_delay_ms: u64,
}

impl DownloadArgs {
    /// Defaults to production: the listing is public and read-only.
    pub fn base_url(&self) -> String {
        self.target
            .base_url()
            .unwrap_or_else(|| Environment::Production.base_url().to_owned())
    }

    pub fn options(&self) -> DownloadOptions {
        DownloadOptions::default().with_page_delay(Duration::from_millis(self.page_delay_ms))
    }
}
