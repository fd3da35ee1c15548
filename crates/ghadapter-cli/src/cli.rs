use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Parser, Subcommand};
use ghadapter_api::DEFAULT_API_URL;
use log::LevelFilter;

#[derive(Parser, Debug)]
#[command(name = "gh-adapter", version, about = "Drive a GitHub repository from the command line")]
pub struct Cli {
    /// Log level used when RUST_LOG is not set.
    #[arg(long, global = true, default_value = "warn", value_parser = parse_level)]
    pub log_level: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection and repository flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true,
          value_parser = NonEmptyStringValueParser::new())]
    pub access_token: String,

    /// REST API base URL (GitHub Enterprise: https://<host>/api/v3)
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Repository owner
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub owner: String,

    /// Repository name
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    pub repo: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Delete a file from the repository
    DeleteFile {
        #[command(flatten)]
        remote: RemoteArgs,
        /// File path inside the repository
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        path: String,
        /// Commit message
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        message: String,
        /// Branch to commit to (default branch when omitted)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Create a branch from another branch, unless it already exists
    CreateBranch {
        #[command(flatten)]
        remote: RemoteArgs,
        /// New branch name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        branch_name: String,
        /// Base branch name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        base_branch: String,
    },
    /// Create or update a file in the repository
    SaveFile {
        #[command(flatten)]
        remote: RemoteArgs,
        /// File path inside the repository
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        path: String,
        /// Commit message
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        message: String,
        /// File content
        #[arg(long)]
        content: String,
        /// Branch to commit to (default branch when omitted)
        #[arg(long)]
        branch: Option<String>,
    },
    /// Push a local file to the repository every time it changes
    WatchFile {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Path to the file to watch
        #[arg(long)]
        file_path: PathBuf,
        /// Commit message for changes [default: "Update <file-path>"]
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        commit_message: Option<String>,
        /// Change events buffered while a push is in flight
        #[arg(long, default_value_t = 64)]
        queue_capacity: usize,
    },
    /// Print whether a branch exists
    BranchExists {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Branch name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        branch_name: String,
    },
    /// Fetch repository info and save it as <repo>_info.json
    RepoInfo {
        #[command(flatten)]
        remote: RemoteArgs,
        /// Directory the snapshot is written to
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn parse_level(s: &str) -> Result<LevelFilter, String> {
    s.parse()
        .map_err(|_| format!("unknown log level `{s}` (off, error, warn, info, debug, trace)"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    const REMOTE: [&str; 6] = [
        "--access-token",
        "t0ken",
        "--owner",
        "octo",
        "--repo",
        "hello",
    ];

    fn parse(command: &str, extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut args = vec!["gh-adapter", command];
        args.extend(REMOTE);
        args.extend(extra);
        Cli::try_parse_from(args)
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_branch() {
        let cli = parse("create-branch", &["--branch-name", "feature-x", "--base-branch", "main"])
            .unwrap();
        match cli.command {
            Command::CreateBranch {
                remote,
                branch_name,
                base_branch,
            } => {
                assert_eq!(remote.owner, "octo");
                assert_eq!(remote.repo, "hello");
                assert_eq!(remote.access_token, "t0ken");
                assert_eq!(branch_name, "feature-x");
                assert_eq!(base_branch, "main");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_watch_file_defaults() {
        let cli = parse("watch-file", &["--file-path", "notes.txt"]).unwrap();
        match cli.command {
            Command::WatchFile {
                file_path,
                commit_message,
                queue_capacity,
                ..
            } => {
                assert_eq!(file_path, PathBuf::from("notes.txt"));
                assert_eq!(commit_message, None);
                assert_eq!(queue_capacity, 64);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(cli.log_level, LevelFilter::Warn);
    }

    #[test]
    fn test_missing_required_flag() {
        let err = parse("save-file", &["--path", "a.txt", "--message", "m"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_owner_rejected() {
        let err = Cli::try_parse_from([
            "gh-adapter",
            "branch-exists",
            "--access-token",
            "t0ken",
            "--owner",
            "",
            "--repo",
            "hello",
            "--branch-name",
            "main",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidValue);
    }

    #[test]
    fn test_log_level_flag() {
        let cli = parse("branch-exists", &["--branch-name", "main", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LevelFilter::Debug);

        let err = parse("branch-exists", &["--branch-name", "main", "--log-level", "loud"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[test]
    fn test_unknown_command() {
        let err = Cli::try_parse_from(["gh-adapter", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }
}
