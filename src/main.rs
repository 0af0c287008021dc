//! gridfind - Entry Point

use clap::Parser;
use gridfind::config::{self, CliOverrides, ResolvedConfig};
use gridfind::grid::{DataGrid, HeadlessView};
use gridfind::matcher::{RegexMatcher, SearchQuery};
use gridfind::model::{AppError, NavigationDirection, QueryError};
use gridfind::source::InputSource;
use gridfind::state::{SearchController, SearchResult};
use gridfind::view::SearchReport;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

/// How long to wait for a scan before checking whether it is still alive.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// gridfind - find text in the cells of a delimited table
#[derive(Parser, Debug)]
#[command(name = "gridfind")]
#[command(version)]
#[command(about = "Search the cells of a delimited text table and walk the matches")]
pub struct Args {
    /// Path to the table file (`-` reads stdin)
    pub file: PathBuf,

    /// Text to search for
    pub query: String,

    /// Match case exactly
    #[arg(short = 'c', long)]
    pub case_sensitive: bool,

    /// Only match whole words
    #[arg(short = 'w', long)]
    pub whole_words: bool,

    /// Treat the query as a regular expression
    #[arg(short = 'r', long)]
    pub regex: bool,

    /// Cell delimiter (default: tab)
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Stop after this many matches (0 = unlimited)
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Move the cursor this many times after the search
    #[arg(short = 'n', long, default_value = "0")]
    pub steps: usize,

    /// Move the cursor backward instead of forward
    #[arg(short, long)]
    pub backward: bool,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Flags the user set explicitly. Unset boolean flags leave lower layers alone.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            case_sensitive: self.case_sensitive.then_some(true),
            whole_words: self.whole_words.then_some(true),
            regex: self.regex.then_some(true),
            match_limit: self.limit,
            delimiter: self.delimiter,
        }
    }

    fn direction(&self) -> NavigationDirection {
        if self.backward {
            NavigationDirection::Backward
        } else {
            NavigationDirection::Forward
        }
    }
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, AppError> {
    let config_file = config::load_config_with_precedence(args.config.clone())?;
    let merged = config::merge_config(config_file);
    let with_env = config::apply_env_overrides(merged)?;
    Ok(config::apply_cli_overrides(with_env, args.overrides()))
}

/// Run one search and print the report. Returns whether anything matched.
fn run(args: &Args) -> Result<bool, AppError> {
    let config = resolve_config(args)?;

    let _log_guard = gridfind::logging::init(&config.log_file_path)?;
    info!(config = ?config, "Configuration loaded and resolved");

    let query = SearchQuery::new(args.query.as_str())
        .ok_or(QueryError::Empty)?
        .with_options(config.find_options());
    // Surface a bad pattern here; during the scan it would only read as "no match".
    RegexMatcher::compile(&query)?;

    let grid = Arc::new(InputSource::from_arg(&args.file).load(config.delimiter)?);
    info!(rows = grid.row_count(), "grid loaded");

    let result = Arc::new(SearchResult::new());
    result.set_match_limit(config.match_limit);
    let controller = SearchController::new(
        Arc::clone(&grid) as Arc<dyn DataGrid>,
        Arc::clone(&result),
        Arc::new(RegexMatcher::new()),
    );
    let mut view = HeadlessView::new();

    controller.update_result(query.clone())?;
    let completion = loop {
        if let Some(completion) = controller.wait_and_dispatch(&mut view, POLL_INTERVAL) {
            break completion;
        }
        if result.generation() > 0 && !result.is_updating() {
            // Finished without publishing, or published just now.
            match controller.wait_and_dispatch(&mut view, POLL_INTERVAL) {
                Some(completion) => break completion,
                None => return Err(AppError::ScanAborted),
            }
        }
    };

    let mut report = SearchReport::build(query.as_str(), &result, &*grid);
    for _ in 0..args.steps {
        report.record_move(controller.move_cursor(args.direction(), &mut view));
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        report.write_json(&mut out)?;
    } else {
        report.write_text(&mut out)?;
    }
    out.flush()?;

    Ok(completion.match_count > 0)
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            error!(error = %err, "gridfind failed");
            eprintln!("gridfind: {err}");
            ExitCode::from(2)
        }
    }
}
