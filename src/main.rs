//! Klotski Solver
//!
//! Finds shortest solutions and next-move hints for the 5x4 sliding-block
//! puzzle, starting from a built-in layout or a board file.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use klotski::moves::find_move;
use klotski::{
    persistence, pieces, Algorithm, CancelToken, IndexKind, KlotskiError, LayoutKey, NextMove,
    SearchOutcome, Solver, SolverConfig,
};

/// Layout solved when no board is given.
const DEFAULT_LAYOUT: &str = "heng-dao-li-ma";

/// Solves Klotski positions in the fewest single-cell slides.
#[derive(Parser)]
#[command(name = "klotski")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Find a shortest solution and print every step.
    Solve {
        #[command(flatten)]
        board: BoardArgs,
        #[command(flatten)]
        search: SearchArgs,
        /// Also write the solution to this file.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the next move on a shortest solution.
    Hint {
        #[command(flatten)]
        board: BoardArgs,
        #[command(flatten)]
        search: SearchArgs,
    },
    /// List the built-in layouts.
    List,
}

#[derive(Args)]
struct BoardArgs {
    /// Built-in layout name (see `klotski list`).
    #[arg(long, default_value = DEFAULT_LAYOUT, conflicts_with = "file")]
    layout: String,
    /// Read the board from a text file instead.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl Default for BoardArgs {
    fn default() -> Self {
        Self {
            layout: DEFAULT_LAYOUT.to_string(),
            file: None,
        }
    }
}

impl BoardArgs {
    fn load(&self) -> klotski::Result<LayoutKey> {
        match &self.file {
            Some(file) => persistence::load_board(file),
            None => {
                let layout = pieces::find_layout(&self.layout)
                    .ok_or_else(|| KlotskiError::UnknownLayout(self.layout.clone()))?;
                Ok(LayoutKey::from_matrix(&layout.cells)?)
            }
        }
    }
}

#[derive(Args, Default)]
struct SearchArgs {
    /// Search strategy.
    #[arg(long, value_enum, default_value_t = Algorithm::default())]
    algorithm: Algorithm,
    /// Visited-state index representation.
    #[arg(long, value_enum, default_value_t = IndexKind::default())]
    index: IndexKind,
    /// Give up after this many expansions.
    #[arg(long)]
    max_expansions: Option<usize>,
}

impl SearchArgs {
    fn solver(&self) -> Solver {
        Solver::new(SolverConfig {
            algorithm: self.algorithm,
            index: self.index,
        })
    }

    fn cancel_token(&self) -> CancelToken {
        match self.max_expansions {
            Some(limit) => CancelToken::with_poll_limit(limit),
            None => CancelToken::new(),
        }
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Some(Command::Solve { board, search, out }) => run_solve(&board, &search, out.as_deref()),
        Some(Command::Hint { board, search }) => run_hint(&board, &search),
        Some(Command::List) => {
            run_list();
            Ok(())
        }
        // default: solve the classic opening
        None => run_solve(&BoardArgs::default(), &SearchArgs::default(), None),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr, filtered by `RUST_LOG` (default `klotski=info`).
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("klotski=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Solves the board, prints the solution, and optionally saves it.
fn run_solve(board: &BoardArgs, search: &SearchArgs, out: Option<&Path>) -> klotski::Result<()> {
    let start = board.load()?;
    let report = search.solver().solve_with(start, &search.cancel_token());

    match report.outcome {
        SearchOutcome::Solved(path) => {
            print!("{path}");
            println!();
            println!(
                "Visited {} positions (expanded {}, generated {}).",
                report.stats.visited, report.stats.expanded, report.stats.generated
            );
            if let Some(out) = out {
                persistence::save_path(out, &path)?;
                println!("Wrote {}", out.display());
            }
        }
        SearchOutcome::Unsolvable => {
            print!("{start}");
            println!(
                "No solution: explored all {} reachable positions.",
                report.stats.visited
            );
        }
        SearchOutcome::Cancelled => println!(
            "Search stopped after {} expansions.",
            report.stats.expanded
        ),
    }

    Ok(())
}

/// Prints the board and the next move on a shortest solution.
fn run_hint(board: &BoardArgs, search: &SearchArgs) -> klotski::Result<()> {
    let current = board.load()?;
    print!("{current}");

    match search.solver().next_move_with(current, &search.cancel_token()) {
        NextMove::Step(next) => {
            match find_move(current, next) {
                Some(slide) => println!("Hint: {slide}"),
                None => println!("Hint:"),
            }
            print!("{next}");
        }
        NextMove::AtGoal => println!("Already solved."),
        NextMove::Unsolvable => println!("No solution from this position."),
        NextMove::Cancelled => println!("Search cancelled."),
    }

    Ok(())
}

/// Prints every built-in layout.
fn run_list() {
    for layout in pieces::LAYOUTS {
        println!("{} ({})", layout.name, layout.title);
        for row in &layout.cells {
            let line: String = row
                .iter()
                .map(|&code| match code {
                    pieces::EMPTY => '.',
                    code => char::from(b'0' + code),
                })
                .collect();
            println!("  {line}");
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_search_options() {
        let cli = Cli::try_parse_from([
            "klotski",
            "solve",
            "--layout",
            "zhi-hui-ruo-ding",
            "--algorithm",
            "astar",
            "--index",
            "trie",
        ])
        .unwrap();

        match cli.command {
            Some(Command::Solve { board, search, out }) => {
                assert_eq!(board.layout, "zhi-hui-ruo-ding");
                assert_eq!(search.algorithm, Algorithm::AStar);
                assert_eq!(search.index, IndexKind::Trie);
                assert!(out.is_none());
                assert_eq!(search.max_expansions, None);
            }
            _ => panic!("expected the solve command"),
        }
    }

    #[test]
    fn test_layout_and_file_conflict() {
        let parsed = Cli::try_parse_from([
            "klotski",
            "hint",
            "--layout",
            "heng-dao-li-ma",
            "--file",
            "board.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_unknown_layout_is_reported() {
        let board = BoardArgs {
            layout: "no-such-layout".to_string(),
            file: None,
        };
        assert!(matches!(
            board.load(),
            Err(KlotskiError::UnknownLayout(name)) if name == "no-such-layout"
        ));
        assert!(BoardArgs::default().load().is_ok());
    }

    #[test]
    fn test_max_expansions_bounds_the_search() {
        let cli = Cli::try_parse_from(["klotski", "hint", "--max-expansions", "5"]).unwrap();
        let Some(Command::Hint { board, search }) = cli.command else {
            panic!("expected the hint command");
        };
        assert_eq!(search.max_expansions, Some(5));

        let start = board.load().unwrap();
        let report = search.solver().solve_with(start, &search.cancel_token());
        assert_eq!(report.outcome, SearchOutcome::Cancelled);
        assert_eq!(report.stats.expanded, 5);
    }
}
