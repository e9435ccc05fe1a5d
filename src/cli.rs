use clap::{Parser, Subcommand};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ultimate frisbee point capture and statistics")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Print team statistics and the player efficiency table for a backup archive
    Stats {
        /// Backup archive (JSON)
        #[arg(short, long)]
        archive: String,
        /// Only include these tournaments (repeatable)
        #[arg(short, long = "tournament")]
        tournaments: Vec<String>,
        /// Only include matches against this opponent
        #[arg(short, long)]
        opponent: Option<String>,
    },
    /// Feed a recorded command script through the capture engine
    Replay {
        /// Script with opponentName, players and commands
        #[arg(short, long)]
        script: String,
        /// Script holds coordinate commands; same as capture mode PRO
        #[arg(long)]
        pro: bool,
        /// Store the resulting match under <team>/<tournament>
        #[arg(long)]
        save: Option<String>,
    },
    /// Capture a match live from JSON commands on stdin
    Live {
        /// Opponent name
        #[arg(short, long)]
        opponent: String,
        /// Roster file (JSON list of players)
        #[arg(short, long)]
        roster: String,
        /// Store the match under <team>/<tournament> after every point
        #[arg(long)]
        save: Option<String>,
    },
    /// Show which recorded Pro event lies under a tap on the field
    Review {
        /// Backup archive (JSON)
        #[arg(short, long)]
        archive: String,
        /// Match id
        #[arg(short, long = "match")]
        match_id: String,
        /// Point number, counting from 1
        #[arg(short, long)]
        point: usize,
        /// Tap across the field, 0 to 1
        #[arg(short)]
        x: f64,
        /// Tap along the field, 0 to 1
        #[arg(short)]
        y: f64,
    },
    /// Load a backup archive into the database
    Import {
        #[arg(short, long)]
        archive: String,
    },
    /// Write a team's data from the database to a backup archive
    Export {
        #[arg(short, long)]
        team: String,
        #[arg(short, long)]
        out: String,
    },
    /// Print a shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_accepts_repeated_tournaments() {
        let cli = Cli::try_parse_from([
            "ultimate_stats",
            "stats",
            "--archive",
            "backup.json",
            "-t",
            "spring",
            "-t",
            "autumn",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Stats {
                archive: "backup.json".to_string(),
                tournaments: vec!["spring".to_string(), "autumn".to_string()],
                opponent: None,
            }
        );
    }

    #[test]
    fn test_review_takes_match_point_and_tap() {
        let cli = Cli::try_parse_from([
            "ultimate_stats",
            "review",
            "-a",
            "backup.json",
            "--match",
            "m1",
            "--point",
            "3",
            "-x",
            "0.4",
            "-y",
            "0.75",
        ])
        .unwrap();

        assert_eq!(
            cli.command,
            Command::Review {
                archive: "backup.json".to_string(),
                match_id: "m1".to_string(),
                point: 3,
                x: 0.4,
                y: 0.75,
            }
        );
    }

    #[test]
    fn test_live_requires_roster() {
        assert!(Cli::try_parse_from(["ultimate_stats", "live", "--opponent", "Rivals"]).is_err());
    }
}
