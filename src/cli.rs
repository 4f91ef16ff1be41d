// src/cli.rs
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::collector::{
    SearchForm, HOURS_OLD_RANGE, RESULTS_WANTED_RANGE, TIMEOUT_SECS_RANGE, VERBOSITY_RANGE,
};
use crate::core::config_manager::CONFIG_FILE;
use crate::core::{ConfigManager, SearchInvoker, ServiceClient, Session};
use crate::error::{SearchError, SessionError};
use crate::presenter::{read_csv, write_csv_file, Presenter, PresenterOptions, SortOrder, ViewSelection};
use crate::presets::PresetBook;
use crate::types::ResultSet;
use crate::utils::read_file_content;

#[derive(Parser)]
#[command(name = "lucy")]
#[command(about = "Search several job boards with a single query")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run a search and show the results
    Search(SearchArgs),
    /// Show results from a previously exported CSV file
    View {
        csv_file: PathBuf,
        #[command(flatten)]
        view: ViewArgs,
    },
    /// List saved searches
    Presets,
    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub form: FormArgs,

    #[command(flatten)]
    pub view: ViewArgs,

    /// Do not show the waiting spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Print the full error chain when the search fails
    #[arg(long)]
    pub trace: bool,
}

/// Search parameters. Anything left out comes from the preset, then from
/// the default form.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// Start from a saved search
    #[arg(long)]
    pub preset: Option<String>,

    /// Job title or keywords
    #[arg(short, long)]
    pub keyword: Option<String>,

    #[arg(short, long)]
    pub location: Option<String>,

    /// Job board to search (repeatable): indeed, linkedin, zip_recruiter,
    /// glassdoor, google, bayt
    #[arg(short = 's', long = "site")]
    pub sites: Vec<String>,

    /// Number of results per job board
    #[arg(long, value_parser = clap::value_parser!(u32).range(RESULTS_WANTED_RANGE))]
    pub results: Option<u32>,

    /// Only postings from the last N hours
    #[arg(long, value_parser = clap::value_parser!(u32).range(HOURS_OLD_RANGE))]
    pub hours_old: Option<u32>,

    #[arg(long)]
    pub remote: bool,

    /// Any, Full-time, Part-time, Contract, Internship, Temporary
    #[arg(long)]
    pub job_type: Option<String>,

    /// Country for Indeed and Glassdoor
    #[arg(long)]
    pub country: Option<String>,

    /// Search service logging: 0 errors, 1 warnings, 2 everything
    #[arg(long, value_parser = clap::value_parser!(u8).range(VERBOSITY_RANGE))]
    pub verbosity: Option<u8>,

    /// Timeout handed to the search service
    #[arg(long, value_parser = clap::value_parser!(u64).range(TIMEOUT_SECS_RANGE))]
    pub timeout_secs: Option<u64>,
}

impl FormArgs {
    pub fn apply_to(&self, mut form: SearchForm) -> SearchForm {
        if let Some(keyword) = &self.keyword {
            form.keyword = keyword.clone();
        }
        if let Some(location) = &self.location {
            form.location = location.clone();
        }
        if !self.sites.is_empty() {
            form.sites = self.sites.clone();
        }
        if let Some(results) = self.results {
            form.results_wanted = results;
        }
        if let Some(hours_old) = self.hours_old {
            form.hours_old = hours_old;
        }
        if self.remote {
            form.remote_only = true;
        }
        if let Some(job_type) = &self.job_type {
            form.job_type = job_type.clone();
        }
        if let Some(country) = &self.country {
            form.country = country.clone();
        }
        if let Some(verbosity) = self.verbosity {
            form.verbosity = verbosity;
        }
        if self.timeout_secs.is_some() {
            form.timeout_secs = self.timeout_secs;
        }
        form
    }
}

#[derive(Args, Debug, Default)]
pub struct ViewArgs {
    /// Only show these job boards (repeatable)
    #[arg(long = "filter-site")]
    pub filter_sites: Vec<String>,

    /// Only show these job types (repeatable)
    #[arg(long = "filter-job-type")]
    pub filter_job_types: Vec<String>,

    /// unordered, date_posted_desc, max_salary_desc, min_salary_asc
    #[arg(long, default_value_t = SortOrder::Unordered)]
    pub sort: SortOrder,

    /// Hide the job type filter and sorting
    #[arg(long)]
    pub basic: bool,

    /// Save the displayed jobs as CSV (defaults to the configured file name)
    #[arg(long, num_args = 0..=1)]
    pub export: Option<Option<PathBuf>>,
}

impl ViewArgs {
    pub fn selection(&self) -> ViewSelection {
        ViewSelection {
            sites: (!self.filter_sites.is_empty()).then(|| self.filter_sites.clone()),
            job_types: self.filter_job_types.clone(),
            sort: self.sort,
        }
    }

    pub fn export_path(&self, default_name: &str) -> Option<PathBuf> {
        self.export
            .as_ref()
            .map(|path| path.clone().unwrap_or_else(|| PathBuf::from(default_name)))
    }
}

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = ConfigManager::load_from(&cli.config)?;

    match cli.command {
        Command::Search(args) => run_search(&config, args).await,
        Command::View { csv_file, view } => {
            let content = read_file_content(&csv_file).await?;
            let records = read_csv(&content)
                .with_context(|| format!("Failed to parse {}", csv_file.display()))?;
            present(&config, &ResultSet::new(records), &view)
        }
        Command::Presets => list_presets(&config),
        Command::Serve { port } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            crate::web::start_web_server(config).await
        }
    }
}

async fn run_search(config: &ConfigManager, args: SearchArgs) -> Result<()> {
    let base = match &args.form.preset {
        Some(name) => PresetBook::load(&config.presets_path)?.get(name)?.clone(),
        None => SearchForm::default(),
    };
    let form = args.form.apply_to(base);
    // Presets bypass the clap ranges.
    form.check_ranges()?;

    let client = ServiceClient::new(
        config.service.base_url.clone(),
        config.service.api_key.clone(),
        config.service.connect_timeout_seconds,
    )?;
    let show_progress = !args.no_progress && std::io::stderr().is_terminal();
    let invoker = SearchInvoker::new(Arc::new(client)).with_progress(show_progress);
    let mut session = Session::new(invoker);

    match session.search(&form).await {
        Ok(results) => present(config, results, &args.view),
        Err(SessionError::Configuration(e)) => Err(e.into()),
        Err(SessionError::Search(e)) => {
            report_search_error(&e, args.trace);
            Err(e.into())
        }
    }
}

fn report_search_error(e: &SearchError, trace: bool) {
    for suggestion in SearchError::suggestions() {
        eprintln!("  - {}", suggestion);
    }
    if trace {
        eprintln!("\n{}", e.detail);
    } else {
        debug!("Search error detail: {}", e.detail);
    }
}

fn present(config: &ConfigManager, results: &ResultSet, args: &ViewArgs) -> Result<()> {
    println!("Found {} jobs", results.len());
    if results.is_empty() {
        println!("No jobs found matching your criteria. Try adjusting your search parameters.");
        return Ok(());
    }

    let presenter = Presenter::new(PresenterOptions {
        extended_controls: config.presenter.extended_controls && !args.basic,
    });
    let view = presenter.view(results, &args.selection());

    for warning in &view.warnings {
        eprintln!("warning: {}", warning);
    }
    println!(
        "Displaying {} jobs (job boards: {})\n",
        view.records.len(),
        results.sites_present().join(", ")
    );
    for job in view.render() {
        println!("{}", job);
    }

    if let Some(path) = args.export_path(&config.presenter.export_file_name) {
        let exported = view.to_csv().and_then(|csv| write_csv_file(&path, &csv));
        match exported {
            Ok(()) => println!("Jobs saved to {}", path.display()),
            Err(e) => {
                error!("Export to {} failed: {}", path.display(), e);
                return Err(anyhow::Error::new(e).context("Failed to export results"));
            }
        }
    }

    Ok(())
}

fn list_presets(config: &ConfigManager) -> Result<()> {
    let book = PresetBook::load(&config.presets_path)?;
    info!("Presets loaded from {}", config.presets_path.display());

    let mut any = false;
    for (name, form) in book.iter() {
        any = true;
        println!(
            "{:<20} {} in {} on {} ({} per board, {}h)",
            name,
            form.keyword,
            form.location,
            form.sites.join(", "),
            form.results_wanted,
            form.hours_old
        );
    }
    if !any {
        println!("No presets found in {}", config.presets_path.display());
    }
    Ok(())
}
