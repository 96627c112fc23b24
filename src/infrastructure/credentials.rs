//! One-time credential seeding from a flat `id,password` file.

use crate::domain::{Credential, Repository};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;

/// Parses `id,password` lines, skipping anything malformed.
///
/// Lines are trimmed; blank lines, lines without a comma and lines whose id
/// is not a plain decimal number are ignored. The password is everything after
/// the first comma, trimmed, and must not be empty. A repeated id keeps its
/// first occurrence.
pub fn parse_credentials(contents: &str) -> Vec<Credential> {
    // ---
    let mut seen = HashSet::new();

    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| line.split_once(','))
        .filter_map(|(id, password)| {
            let id = id.trim();
            if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            let password = password.trim();
            if password.is_empty() {
                return None;
            }
            let id = id.parse::<i64>().ok()?;
            Some(Credential::new(id, password))
        })
        .filter(|credential| seen.insert(credential.id))
        .collect()
}

/// Seeds the credential store from `path` when the store is empty.
///
/// Returns the number of credentials inserted. A missing file or a store that
/// already holds credentials is not an error and yields `0`.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, or on storage failure.
pub async fn load_credentials_from_file(repo: &dyn Repository, path: &Path) -> Result<u64> {
    // ---
    let exists = tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("failed to stat {}", path.display()))?;
    if !exists {
        tracing::info!("Credentials file {} not found, skipping seed", path.display());
        return Ok(0);
    }

    if repo.count_credentials().await? > 0 {
        tracing::debug!("Credential store already populated, skipping seed");
        return Ok(0);
    }

    let contents = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let credentials = parse_credentials(&contents);
    let inserted = repo.insert_credentials(&credentials).await?;

    tracing::info!("Loaded {} credentials from {}", inserted, path.display());
    Ok(inserted)
}
