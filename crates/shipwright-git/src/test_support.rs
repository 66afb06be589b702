//! Scripted collaborators for unit tests

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use git2::{Commit, Oid, Repository, Signature};

use crate::repository::Result;
use crate::shell::{ExecOptions, Shell};
use shipwright_core::error::GitError;

/// Shell answering by command prefix and recording every call
#[derive(Default)]
pub struct ScriptedShell {
    rules: Vec<(String, std::result::Result<String, String>)>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedShell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, prefix: &str, stdout: &str) -> Self {
        self.rules.push((prefix.to_string(), Ok(stdout.to_string())));
        self
    }

    pub fn fail(mut self, prefix: &str, reason: &str) -> Self {
        self.rules.push((prefix.to_string(), Err(reason.to_string())));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Shell for ScriptedShell {
    async fn exec(&self, command: &str, _options: ExecOptions) -> Result<String> {
        self.calls.lock().unwrap().push(command.to_string());

        let rule = self
            .rules
            .iter()
            .find(|(prefix, _)| command.starts_with(prefix.as_str()));

        match rule {
            Some((_, Ok(out))) => Ok(out.clone()),
            Some((_, Err(reason))) => Err(GitError::CommandFailed {
                command: command.to_string(),
                reason: reason.clone(),
            }),
            None => Err(GitError::CommandFailed {
                command: command.to_string(),
                reason: "no scripted response".to_string(),
            }),
        }
    }
}

/// Write `file` with `message` as content and commit it on HEAD
pub fn commit_file(repo: &Repository, root: &Path, file: &str, message: &str) -> Oid {
    let full = root.join(file);
    std::fs::create_dir_all(full.parent().unwrap()).unwrap();
    std::fs::write(&full, message).unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new(file)).unwrap();
    index.write().unwrap();

    let sig = Signature::now("Test", "test@example.com").unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let parents: Vec<Commit<'_>> = repo
        .head()
        .ok()
        .and_then(|h| h.peel_to_commit().ok())
        .into_iter()
        .collect();
    let parent_refs: Vec<&Commit<'_>> = parents.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
        .unwrap()
}
