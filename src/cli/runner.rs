//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{load_source, SourceConfig};
use crate::error::{Error, Result};
use crate::fetch::HttpFetcher;
use crate::orchestrator::{spawn, Observer, Orchestrator};
use crate::pagination::{Change, DisplayState, Intent, PaginationState};
use crate::presentation::{Presentation, Update};
use crate::types::JsonRecord;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Overrides for the source definition taken from `fetch` flags
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    pub base_url: Option<String>,
    pub path: Option<String>,
    pub records_path: Option<String>,
    pub next_path: Option<String>,
    pub id_field: Option<String>,
    pub pages: Option<usize>,
    pub max_retries: u32,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch {
                base_url,
                path,
                records_path,
                next_path,
                id_field,
                pages,
                max_retries,
            } => {
                let options = FetchOptions {
                    base_url: base_url.clone(),
                    path: path.clone(),
                    records_path: records_path.clone(),
                    next_path: next_path.clone(),
                    id_field: id_field.clone(),
                    pages: *pages,
                    max_retries: *max_retries,
                };
                self.fetch(&options).await
            }
            Commands::Validate => self.validate(),
        }
    }

    /// Build the source definition from the file and flags
    fn source_config(&self, options: &FetchOptions) -> Result<SourceConfig> {
        let mut config = match (&self.cli.source, &options.base_url) {
            (Some(path), _) => load_source(path)?,
            (None, Some(base_url)) => SourceConfig::new(base_url.clone()),
            (None, None) => {
                return Err(Error::config(
                    "No source specified (use --source or --base-url)",
                ))
            }
        };

        if let Some(base_url) = &options.base_url {
            config.base_url.clone_from(base_url);
        }
        if let Some(path) = &options.path {
            config.path.clone_from(path);
        }
        if let Some(records_path) = &options.records_path {
            config.records_path.clone_from(records_path);
        }
        if let Some(next_path) = &options.next_path {
            config.next_cursor_path.clone_from(next_path);
        }
        if let Some(id_field) = &options.id_field {
            config.id_field.clone_from(id_field);
        }

        config.validate()?;
        Ok(config)
    }

    /// Fetch records page by page until done, failed, or the page limit
    async fn fetch(&self, options: &FetchOptions) -> Result<()> {
        let config = self.source_config(options)?;
        info!("Fetching from {}", config.endpoint());

        let failure = Arc::new(Mutex::new(None));
        let observer = ConsoleObserver {
            format: self.cli.format,
            presentation: Presentation::new(),
            failure: Arc::clone(&failure),
        };
        let orchestrator = Orchestrator::with_config(&config.orchestrator, observer);
        let handle = spawn(HttpFetcher::new(config)?, orchestrator);

        handle.reload()?;
        let mut snapshot = handle.idle().await?;
        let mut pages = 1;
        let mut retries = 0;

        loop {
            if let Some(message) = take_failure(&failure) {
                handle.shutdown().await?;
                return Err(Error::transport(message));
            }
            if options.pages.is_some_and(|limit| pages >= limit) {
                break;
            }

            let Some(intent) = snapshot.display_state.intent() else {
                break;
            };
            match intent {
                Intent::NextPage => {
                    retries = 0;
                    pages += 1;
                }
                Intent::Retry if retries < options.max_retries => {
                    retries += 1;
                    warn!("Page failed, retrying ({retries}/{})", options.max_retries);
                }
                Intent::Retry => {
                    handle.shutdown().await?;
                    return Err(Error::transport(format!(
                        "Pagination failed after {retries} retries"
                    )));
                }
            }

            let before = (snapshot.records.len(), snapshot.next_cursor.clone());
            handle.dispatch(intent)?;
            snapshot = handle.idle().await?;

            // A page that only repeats known records and its own cursor
            // leaves the footer idle on the same cursor.
            if intent == Intent::NextPage
                && snapshot.display_state == DisplayState::Idle
                && (snapshot.records.len(), snapshot.next_cursor.clone()) == before
            {
                warn!(
                    "Page {:?} returned nothing new, stopping",
                    snapshot.next_cursor
                );
                break;
            }
        }

        self.output_message(&json!({
            "type": "STATE",
            "state": {
                "records": snapshot.records.len(),
                "next_cursor": snapshot.next_cursor,
                "done": snapshot.next_cursor.is_none(),
            }
        }));
        info!(
            "Fetched {} records in {pages} pages",
            snapshot.records.len()
        );

        handle.shutdown().await
    }

    /// Validate the source definition
    fn validate(&self) -> Result<()> {
        let path = self
            .cli
            .source
            .as_ref()
            .ok_or_else(|| Error::config("Source file not specified (use -s flag)"))?;
        let config = load_source(path)?;

        self.output_message(&json!({
            "type": "LOG",
            "log": {
                "level": "INFO",
                "message": format!("Source '{}' is valid ({})", config.name, config.endpoint())
            }
        }));

        Ok(())
    }

    /// Output a message
    fn output_message(&self, msg: &Value) {
        print_message(self.cli.format, msg);
    }
}

fn print_message(format: OutputFormat, msg: &Value) {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
        OutputFormat::Pretty => {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        }
    }
}

fn take_failure(failure: &Mutex<Option<String>>) -> Option<String> {
    failure.lock().ok().and_then(|mut slot| slot.take())
}

/// Prints rows as they land and remembers initial-load failures
struct ConsoleObserver {
    format: OutputFormat,
    presentation: Presentation<JsonRecord>,
    failure: Arc<Mutex<Option<String>>>,
}

impl ConsoleObserver {
    fn print_rows(&self, rows: std::ops::Range<usize>) {
        for index in rows {
            let record = &self.presentation.records()[index];
            match self.format {
                OutputFormat::Json => print_message(
                    self.format,
                    &json!({ "type": "RECORD", "record": record.value }),
                ),
                OutputFormat::Pretty => println!("{:>5}. {}", index + 1, record.label()),
            }
        }
    }
}

impl Observer<JsonRecord> for ConsoleObserver {
    fn on_change(&mut self, change: &Change<JsonRecord>, state: &PaginationState<JsonRecord>) {
        match self.presentation.apply(change, state) {
            Update::Full => self.print_rows(0..self.presentation.len()),
            Update::Appended(rows) => self.print_rows(rows),
            Update::None => {}
        }

        match change {
            Change::ErrorOccurred(message) => {
                warn!("Load failed: {message}");
                if let Ok(mut slot) = self.failure.lock() {
                    *slot = Some(message.clone());
                }
            }
            Change::PaginationError => warn!("Page request failed"),
            Change::PaginationLoaded { state } => {
                info!("{}", state.config().title);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn runner(args: &[&str]) -> Runner {
        Runner::new(Cli::parse_from(args))
    }

    #[test]
    fn test_source_config_from_flags() {
        let runner = runner(&["paginator", "fetch", "--base-url", "https://api.example.com"]);
        let options = FetchOptions {
            base_url: Some("https://api.example.com".to_string()),
            path: Some("/people".to_string()),
            records_path: Some("results".to_string()),
            next_path: Some("links.next".to_string()),
            id_field: Some("uid".to_string()),
            ..FetchOptions::default()
        };

        let config = runner.source_config(&options).unwrap();
        assert_eq!(config.endpoint(), "https://api.example.com/people");
        assert_eq!(config.records_path, "results");
        assert_eq!(config.next_cursor_path, "links.next");
        assert_eq!(config.id_field, "uid");
    }

    #[test]
    fn test_source_config_requires_a_source() {
        let runner = runner(&["paginator", "fetch"]);
        assert!(runner.source_config(&FetchOptions::default()).is_err());
    }

    #[test]
    fn test_cli_parses_fetch_flags() {
        let cli = Cli::parse_from([
            "paginator",
            "--format",
            "pretty",
            "fetch",
            "--base-url",
            "https://api.example.com",
            "--pages",
            "2",
        ]);
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Fetch {
                pages, max_retries, ..
            } => {
                assert_eq!(pages, Some(2));
                assert_eq!(max_retries, 1);
            }
            Commands::Validate => panic!("Expected fetch"),
        }
    }
}
