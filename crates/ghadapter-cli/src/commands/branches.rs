use anyhow::Context;
use ghadapter_api::{BranchCreationRequest, BranchOutcome};

use crate::state::AppState;

pub async fn create_branch(
    state: &AppState,
    branch_name: &str,
    base_branch: &str,
) -> anyhow::Result<BranchOutcome> {
    let request = BranchCreationRequest::new(&state.owner, &state.repo, branch_name, base_branch);
    ghadapter_git::create_branch(state.backend.as_ref(), &request)
        .await
        .context("error creating branch")
}

pub async fn branch_exists(state: &AppState, branch_name: &str) -> anyhow::Result<bool> {
    ghadapter_git::branch_exists(state.backend.as_ref(), &state.owner, &state.repo, branch_name)
        .await
        .context("error checking branch")
}
