//! Commit history walking

use std::path::{Component, Path, PathBuf};

use git2::{Commit, Oid, Sort};
use tracing::{debug, instrument};

use crate::log::LogQuery;
use crate::repository::{GitRepo, Result};
use crate::types::{LogField, RawCommit};
use shipwright_core::error::GitError;

impl GitRepo {
    /// Walk the commits selected by `query`, newest first
    #[instrument(skip(self, query), fields(range = %query.range, path = ?query.path))]
    pub fn log(&self, query: &LogQuery) -> Result<Vec<RawCommit>> {
        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;

        let invalid = |e: git2::Error| GitError::InvalidRange {
            range: query.range.clone(),
            reason: e.message().to_string(),
        };

        if query.range.contains("..") {
            revwalk.push_range(&query.range).map_err(invalid)?;
        } else {
            let target = self
                .repo
                .revparse_single(&query.range)
                .and_then(|obj| obj.peel_to_commit())
                .map_err(invalid)?;
            revwalk.push(target.id())?;
        }

        let filter = query.path.as_deref().and_then(normalize_path);
        let with_body = query.fields.contains(&LogField::Body);
        let mut commits = Vec::new();

        for oid in revwalk {
            if commits.len() >= query.max_count {
                break;
            }

            let commit = self.repo.find_commit(oid?)?;

            if !query.include_merges && commit.parent_count() > 1 {
                continue;
            }

            if let Some(path) = &filter {
                if !touches_path(&commit, path)? {
                    continue;
                }
            }

            commits.push(commit_to_raw(&commit, with_body));
        }

        debug!(count = commits.len(), "walked commit history");
        Ok(commits)
    }
}

/// Drop `.` components; `None` means the whole repository
fn normalize_path(path: &Path) -> Option<PathBuf> {
    let normalized: PathBuf = path
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();

    if normalized.as_os_str().is_empty() {
        None
    } else {
        Some(normalized)
    }
}

/// Whether `commit` changed anything below `path` relative to its first parent
fn touches_path(commit: &Commit<'_>, path: &Path) -> Result<bool> {
    let entry_id = |c: &Commit<'_>| -> Result<Option<Oid>> {
        Ok(c.tree()?.get_path(path).ok().map(|entry| entry.id()))
    };

    let current = entry_id(commit)?;
    let previous = match commit.parent(0) {
        Ok(parent) => entry_id(&parent)?,
        Err(_) => None,
    };

    Ok(current != previous)
}

fn commit_to_raw(commit: &Commit<'_>, with_body: bool) -> RawCommit {
    let raw = RawCommit::new(
        commit.id().to_string(),
        commit.summary().unwrap_or_default(),
        commit.message().unwrap_or_default(),
    );

    match commit.body() {
        Some(body) if with_body => raw.with_body(body),
        _ => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::MAX_LOG_COUNT;
    use crate::test_support::commit_file;
    use git2::{Repository, Signature};
    use tempfile::TempDir;

    fn setup_repo() -> (TempDir, GitRepo, Vec<Oid>) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path()).unwrap();

        let oids = vec![
            commit_file(&repo, temp.path(), "README.md", "chore: init"),
            commit_file(&repo, temp.path(), "packages/ui/a.txt", "feat(ui): add button\n\nLonger text"),
            commit_file(&repo, temp.path(), "packages/api/b.txt", "fix(api): resolve error (#12)"),
            commit_file(&repo, temp.path(), "packages/ui/c.txt", "fix(ui): align"),
        ];

        let git_repo = GitRepo::open(temp.path()).unwrap();
        (temp, git_repo, oids)
    }

    fn query(range: &str) -> LogQuery {
        LogQuery::new(range)
    }

    #[test]
    fn test_single_ref_walks_everything() {
        let (_temp, repo, _) = setup_repo();
        let commits = repo.log(&query("HEAD")).unwrap();
        assert_eq!(commits.len(), 4);
        assert_eq!(commits[0].subject, "fix(ui): align");
    }

    #[test]
    fn test_range_excludes_start() {
        let (_temp, repo, oids) = setup_repo();
        let range = format!("{}..HEAD", oids[0]);
        let commits = repo.log(&query(&range)).unwrap();
        assert_eq!(commits.len(), 3);
        assert!(commits.iter().all(|c| c.subject != "chore: init"));
    }

    #[test]
    fn test_path_filter() {
        let (_temp, repo, _) = setup_repo();
        let commits = repo
            .log(&query("HEAD").with_path("packages/ui"))
            .unwrap();
        let subjects: Vec<_> = commits.iter().map(|c| c.subject.as_str()).collect();
        assert_eq!(subjects, vec!["fix(ui): align", "feat(ui): add button"]);
    }

    #[test]
    fn test_dot_path_means_whole_repo() {
        let (_temp, repo, _) = setup_repo();
        let commits = repo.log(&query("HEAD").with_path("./")).unwrap();
        assert_eq!(commits.len(), 4);
    }

    #[test]
    fn test_raw_body_and_optional_body() {
        let (_temp, repo, _) = setup_repo();
        let commits = repo.log(&query("HEAD").with_path("packages/ui")).unwrap();
        let feat = &commits[1];
        assert_eq!(feat.raw_body, "feat(ui): add button\n\nLonger text");
        assert!(feat.body.is_none());

        let mut q = query("HEAD").with_path("packages/ui");
        q.fields.push(LogField::Body);
        let commits = repo.log(&q).unwrap();
        assert_eq!(commits[1].body.as_deref(), Some("Longer text"));
    }

    #[test]
    fn test_max_count() {
        let (_temp, repo, _) = setup_repo();
        let mut q = query("HEAD");
        q.max_count = 2;
        assert_eq!(repo.log(&q).unwrap().len(), 2);
        assert_eq!(query("HEAD").max_count, MAX_LOG_COUNT);
    }

    #[test]
    fn test_invalid_range() {
        let (_temp, repo, _) = setup_repo();
        let err = repo.log(&query("nope..HEAD")).unwrap_err();
        assert!(matches!(err, GitError::InvalidRange { .. }));
    }

    #[test]
    fn test_merge_commits_excluded() {
        let (_temp, repo, oids) = setup_repo();
        let inner = &repo.repo;
        let sig = Signature::now("Test", "test@example.com").unwrap();
        let head = inner.head().unwrap().peel_to_commit().unwrap();
        let other = inner.find_commit(oids[1]).unwrap();
        let tree = head.tree().unwrap();
        inner
            .commit(Some("HEAD"), &sig, &sig, "Merge branch 'x'", &tree, &[&head, &other])
            .unwrap();
        let without = repo.log(&query("HEAD")).unwrap();
        assert!(without.iter().all(|c| !c.subject.starts_with("Merge")));

        let mut q = query("HEAD");
        q.include_merges = true;
        let with = repo.log(&q).unwrap();
        assert_eq!(with[0].subject, "Merge branch 'x'");
    }
}
