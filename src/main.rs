use anyhow::Result;

use ultimate_stats::cli::Command;
use ultimate_stats::{
    handle_completions, handle_export, handle_import, handle_live, handle_replay, handle_review, handle_stats,
    interpret,
};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Stats {
            archive,
            tournaments,
            opponent,
        } => handle_stats(archive, tournaments, opponent.as_deref()),
        Command::Replay { script, pro, save } => handle_replay(script, *pro, save.as_deref()),
        Command::Live { opponent, roster, save } => handle_live(opponent, roster, save.as_deref()),
        Command::Review {
            archive,
            match_id,
            point,
            x,
            y,
        } => handle_review(archive, match_id, *point, *x, *y),
        Command::Import { archive } => handle_import(archive),
        Command::Export { team, out } => handle_export(team, out),
        Command::Completions { shell } => handle_completions(*shell),
    }
}
