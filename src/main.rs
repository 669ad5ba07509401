use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use pr_board::board::{Board, Command, Message};
use pr_board::config::loader;
use pr_board::config::types::AppConfig;
use pr_board::engine::{Engine, Event, Request, StubSource};
use pr_board::filter::{self, Dimension, FilterState};
use pr_board::sort::SortOrder;
use pr_board::types::{PullRequest, RepositoryRef};

#[derive(Parser)]
#[command(name = "pr-board", version, about = "Filter and facet a pull request list")]
struct Cli {
    /// Path to config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging to debug.log.
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filter-bar facets derived from a PR list.
    Facets {
        /// JSON file holding an array of pull requests.
        input: PathBuf,
    },
    /// Print the PRs matching a filter state.
    Filter {
        /// JSON file holding an array of pull requests.
        input: PathBuf,
        /// Saved filter state (JSON).
        #[arg(short, long)]
        state: Option<PathBuf>,
        /// Title substring; overrides the saved state's title.
        #[arg(short, long)]
        title: Option<String>,
        /// Identity id of the current user (for approval status filters).
        #[arg(long)]
        me: Option<String>,
        /// Extra selection, e.g. `selectedAuthors=u1,u2`. Repeatable.
        #[arg(long = "select", value_name = "KEY=VALUES", value_parser = parse_select_arg)]
        selections: Vec<(Dimension, Vec<String>)>,
        /// Creation date order (asc or desc); overrides the config default.
        #[arg(long)]
        sort: Option<SortOrder>,
    },
    /// Load a fixture through the background engine, one task per repository.
    Load {
        /// JSON file holding an array of pull requests.
        input: PathBuf,
        /// Saved filter state (JSON).
        #[arg(short, long)]
        state: Option<PathBuf>,
        /// Creation date order (asc or desc); overrides the config default.
        #[arg(long)]
        sort: Option<SortOrder>,
    },
}

fn parse_select_arg(arg: &str) -> Result<(Dimension, Vec<String>), String> {
    filter::parse_selection(arg).map_err(|e| e.to_string())
}

fn read_pull_requests(path: &Path) -> Result<Vec<PullRequest>> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing pull requests from {}", path.display()))
}

fn read_filter_state(path: Option<&Path>) -> Result<FilterState> {
    let Some(path) = path else {
        return Ok(FilterState::default());
    };
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    FilterState::from_json(&contents).with_context(|| format!("parsing {}", path.display()))
}

fn print_view(board: &Board) {
    for pr in board.view() {
        let author = pr
            .author
            .as_ref()
            .map_or("-", |a| a.display_name.as_str());
        println!("#{:<6} {}  ({author})", pr.pull_request_id, pr.title);
    }
    println!(
        "{} of {} pull requests (sorted {})",
        board.view().len(),
        board.pull_requests().len(),
        board.sort_order().as_str()
    );
}

/// Repositories from the config, or every repository seen in the fixture.
fn repositories_for(config: &AppConfig, prs: &[PullRequest]) -> Vec<RepositoryRef> {
    if !config.repositories.is_empty() {
        return config.repository_refs();
    }
    let mut repos: Vec<RepositoryRef> = Vec::new();
    for repo in prs.iter().filter_map(|pr| pr.repository.as_ref()) {
        if !repos.iter().any(|r| r.id == repo.id) {
            repos.push(repo.clone());
        }
    }
    repos
}

fn run_load(
    config: &AppConfig,
    input: &Path,
    state: FilterState,
    sort_order: SortOrder,
) -> Result<()> {
    let prs = read_pull_requests(input)?;
    let repositories = repositories_for(config, &prs);
    let handle = Engine::new(StubSource::from_pull_requests(prs))
        .with_current_user(config.defaults.current_user_id.clone())
        .start();

    let mut board = Board::new(sort_order);
    board.update(Message::FilterRestored(state));
    if board.update(Message::Refresh) == Some(Command::Reload) {
        let (tx, rx) = std::sync::mpsc::channel::<Event>();
        handle.send(Request::Reload {
            repositories,
            reply_tx: tx,
        });
        match rx
            .recv_timeout(Duration::from_secs(30))
            .context("waiting for engine")?
        {
            Event::Loaded(outcome) => {
                for e in &outcome.errors {
                    eprintln!("warning: {e}");
                }
                board.update(Message::PullRequestsLoaded(outcome.pull_requests));
            }
            Event::ReloadSkipped => {
                board.update(Message::LoadFailed("reload already in progress".into()));
            }
        }
    }
    handle.send(Request::Shutdown);

    if let Some(err) = board.last_error() {
        eprintln!("error: {err}");
    }
    print_view(&board);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up tracing.
    if cli.debug {
        let file = std::fs::File::create("debug.log")?;
        tracing_subscriber::fmt()
            .with_writer(file)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
    }

    let config = loader::load_config(cli.config.as_deref())?;
    tracing::info!("pr-board starting");

    match cli.command {
        Commands::Facets { input } => {
            let prs = read_pull_requests(&input)?;
            let facets = pr_board::rebuild_facets(&prs);
            println!("{}", serde_json::to_string_pretty(&facets)?);
        }
        Commands::Filter {
            input,
            state,
            title,
            me,
            selections,
            sort,
        } => {
            let mut prs = read_pull_requests(&input)?;
            if let Some(user) = me.or_else(|| config.defaults.current_user_id.clone()) {
                prs = prs
                    .into_iter()
                    .map(|pr| pr.resolve_current_user(&user))
                    .collect();
            }
            let mut state = read_filter_state(state.as_deref())?;
            if let Some(title) = title {
                state.title = title;
            }
            for (dimension, values) in selections {
                state.extend_selection(dimension, values);
            }

            let mut board = Board::new(sort.unwrap_or(config.defaults.sort_order));
            board.update(Message::PullRequestsLoaded(prs));
            board.update(Message::FilterRestored(state));
            print_view(&board);
        }
        Commands::Load { input, state, sort } => {
            let state = read_filter_state(state.as_deref())?;
            let sort_order = sort.unwrap_or(config.defaults.sort_order);
            run_load(&config, &input, state, sort_order)?;
        }
    }

    Ok(())
}
