pub mod branches;
pub mod files;
pub mod repos;
pub mod watch;

use ghadapter_api::BranchOutcome;

use crate::cli::Command;
use crate::state::AppState;

/// Run one subcommand against the remote and print its result.
pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::DeleteFile {
            remote,
            path,
            message,
            branch,
        } => {
            let state = AppState::connect(&remote)?;
            files::delete_file(&state, &path, &message, branch.as_deref()).await?;
            println!("File deleted successfully");
        }
        Command::CreateBranch {
            remote,
            branch_name,
            base_branch,
        } => {
            let state = AppState::connect(&remote)?;
            match branches::create_branch(&state, &branch_name, &base_branch).await? {
                BranchOutcome::Created { sha } => {
                    println!("Branch created successfully ({branch_name} at {sha})")
                }
                BranchOutcome::AlreadyExists => {
                    println!("Branch {branch_name} already exists, nothing to do")
                }
            }
        }
        Command::SaveFile {
            remote,
            path,
            message,
            content,
            branch,
        } => {
            let state = AppState::connect(&remote)?;
            files::save_file(&state, &path, &message, &content, branch.as_deref()).await?;
            println!("File saved successfully");
        }
        Command::WatchFile {
            remote,
            file_path,
            commit_message,
            queue_capacity,
        } => {
            let state = AppState::connect(&remote)?;
            let message =
                commit_message.unwrap_or_else(|| watch::default_commit_message(&file_path));
            let session = watch::start_watch(&state, &file_path, &message, queue_capacity)?;
            println!("Watching {} for changes... (Ctrl-C to stop)", file_path.display());

            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    log::error!("failed to listen for Ctrl-C: {e}");
                }
            };
            let pushed = watch::run_until(session, shutdown).await?;
            println!("Stopped watching after {pushed} push(es)");
        }
        Command::BranchExists {
            remote,
            branch_name,
        } => {
            let state = AppState::connect(&remote)?;
            let exists = branches::branch_exists(&state, &branch_name).await?;
            println!("{exists}");
        }
        Command::RepoInfo { remote, output_dir } => {
            let state = AppState::connect(&remote)?;
            let (info, path) = repos::repo_info(&state, &output_dir).await?;
            println!("{}", repos::render_info(&info));
            println!("Saved to {}", path.display());
        }
    }
    Ok(())
}
