//! Branch head resolution

use serde::Deserialize;

use crate::{Client, GithubError, Result};

#[derive(Debug, Deserialize)]
struct GitRef {
    object: Option<GitObject>,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    #[serde(rename = "type")]
    kind: String,
    sha: String,
}

impl Client {
    /// Resolves a branch name to the commit sha at its head.
    ///
    /// Used by the one-shot CLI trigger, where no webhook payload carries
    /// the commit id.
    pub async fn branch_head(&self, full_name: &str, branch: &str) -> Result<String> {
        let url = format!(
            "{}/repos/{}/git/refs/heads/{}",
            self.base_url(),
            full_name,
            branch
        );

        let response = self.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GithubError::api_error(status.as_u16(), message));
        }

        let git_ref: GitRef = response.json().await?;
        commit_sha(git_ref, full_name, branch)
    }
}

fn commit_sha(git_ref: GitRef, full_name: &str, branch: &str) -> Result<String> {
    let object = git_ref.object.ok_or_else(|| {
        GithubError::InvalidRef(format!("invalid repo ({full_name}) or branch ({branch})"))
    })?;

    if object.kind != "commit" {
        return Err(GithubError::InvalidRef(format!(
            "invalid reference type: {}",
            object.kind
        )));
    }

    Ok(object.sha)
}
