use ghadapter_api::{
    AdapterError, AdapterResult, BranchCreationRequest, BranchOutcome, RefLookup,
    RepositoryBackend,
};
use log::{debug, info};

/// `main` -> `refs/heads/main`. Names already under `refs/` are kept as given.
pub fn head_ref_name(branch: &str) -> String {
    if branch.starts_with("refs/") {
        branch.to_string()
    } else {
        format!("refs/heads/{branch}")
    }
}

/// Ensure `request.branch_name` exists, creating it from the base branch's
/// current commit when absent. An existing branch is left untouched, whatever
/// commit it points at.
pub async fn create_branch(
    backend: &dyn RepositoryBackend,
    request: &BranchCreationRequest,
) -> AdapterResult<BranchOutcome> {
    request.validate()?;
    let owner = request.owner.as_str();
    let repo = request.repo.as_str();

    let base_sha = match backend
        .get_ref(owner, repo, &head_ref_name(&request.base_branch))
        .await?
    {
        RefLookup::Found(base) => base.sha,
        RefLookup::NotFound => {
            return Err(AdapterError::BaseBranchNotFound(request.base_branch.clone()))
        }
    };

    let target = head_ref_name(&request.branch_name);
    if let RefLookup::Found(existing) = backend.get_ref(owner, repo, &target).await? {
        debug!(
            "branch {} already exists at {}, leaving it alone",
            request.branch_name, existing.sha
        );
        return Ok(BranchOutcome::AlreadyExists);
    }

    backend
        .create_ref(owner, repo, &target, &base_sha)
        .await
        .map_err(|e| AdapterError::BranchCreationFailed {
            branch: request.branch_name.clone(),
            reason: e.to_string(),
        })?;

    info!(
        "created branch {} from {} at {base_sha}",
        request.branch_name, request.base_branch
    );
    Ok(BranchOutcome::Created { sha: base_sha })
}

pub async fn branch_exists(
    backend: &dyn RepositoryBackend,
    owner: &str,
    repo: &str,
    branch: &str,
) -> AdapterResult<bool> {
    let lookup = backend.get_ref(owner, repo, &head_ref_name(branch)).await?;
    Ok(matches!(lookup, RefLookup::Found(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ghadapter_api::{InMemoryBackend, Op};

    fn request(branch: &str, base: &str) -> BranchCreationRequest {
        BranchCreationRequest::new("octo", "hello", branch, base)
    }

    #[test]
    fn test_head_ref_name() {
        assert_eq!(head_ref_name("main"), "refs/heads/main");
        assert_eq!(head_ref_name("feature/x"), "refs/heads/feature/x");
        assert_eq!(head_ref_name("refs/heads/main"), "refs/heads/main");
    }

    #[tokio::test]
    async fn test_creates_branch_at_base_commit() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");

        let outcome = create_branch(&backend, &request("feature-x", "main"))
            .await
            .unwrap();

        assert_eq!(outcome, BranchOutcome::Created { sha: "abc123".to_string() });
        assert_eq!(backend.ref_sha("refs/heads/feature-x").as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_second_call_is_a_no_op() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");

        create_branch(&backend, &request("feature-x", "main")).await.unwrap();
        let again = create_branch(&backend, &request("feature-x", "main")).await.unwrap();

        assert_eq!(again, BranchOutcome::AlreadyExists);
        assert_eq!(backend.writes().len(), 1);
        assert_eq!(backend.ref_sha("refs/heads/feature-x").as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn test_existing_branch_is_not_moved() {
        let backend = InMemoryBackend::new()
            .with_ref("refs/heads/main", "abc123")
            .with_ref("refs/heads/feature-x", "def456");

        let outcome = create_branch(&backend, &request("feature-x", "main"))
            .await
            .unwrap();

        assert_eq!(outcome, BranchOutcome::AlreadyExists);
        assert!(backend.writes().is_empty());
        assert_eq!(backend.ref_sha("refs/heads/feature-x").as_deref(), Some("def456"));
    }

    #[tokio::test]
    async fn test_missing_base_branch() {
        let backend = InMemoryBackend::new();

        let err = create_branch(&backend, &request("feature-x", "main"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::BaseBranchNotFound(ref b) if b == "main"));
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn test_transient_target_lookup_is_not_treated_as_absent() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");
        backend.fail(Op::GetRef("refs/heads/feature-x".to_string()), 1);

        let err = create_branch(&backend, &request("feature-x", "main"))
            .await
            .unwrap_err();

        assert!(matches!(err, AdapterError::Api { status: 503, .. }));
        assert!(backend.writes().is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_is_wrapped() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");
        backend.fail(Op::CreateRef, 1);

        let err = create_branch(&backend, &request("feature-x", "main"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AdapterError::BranchCreationFailed { ref branch, .. } if branch == "feature-x"
        ));
        assert_eq!(backend.ref_sha("refs/heads/feature-x"), None);
    }

    #[tokio::test]
    async fn test_empty_request_fields_are_rejected() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");
        let err = create_branch(&backend, &request("", "main")).await.unwrap_err();
        assert!(matches!(err, AdapterError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_branch_exists() {
        let backend = InMemoryBackend::new().with_ref("refs/heads/main", "abc123");
        assert!(branch_exists(&backend, "octo", "hello", "main").await.unwrap());
        assert!(!branch_exists(&backend, "octo", "hello", "dev").await.unwrap());

        backend.fail(Op::GetRef("refs/heads/main".to_string()), 1);
        assert!(branch_exists(&backend, "octo", "hello", "main").await.is_err());
    }
}
