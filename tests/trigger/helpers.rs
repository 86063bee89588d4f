use git2::{Oid, Repository, Signature};
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use std::{env, fs, time};
use trigger_dependants::{
    BuildTrigger, Dispatch, GitCommitSource, RequestTemplate, TravisClient, TriggerTarget,
};

/// A guard that automatically removes a temporary directory when dropped.
pub struct TempDirGuard {
    path: PathBuf,
}

impl TempDirGuard {
    pub fn new(name: &str) -> Self {
        let path = env::temp_dir().join(format!(
            "{}_{}",
            name,
            time::SystemTime::now()
                .duration_since(time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempDirGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

/// generate a repository with a single commit and return its hash
pub fn create_test_repo(dir: &Path, message: &str) -> Oid {
    let repo = Repository::init(dir).unwrap();
    fs::write(dir.join("README.md"), "# onyx-http\n").unwrap();

    let mut index = repo.index().unwrap();
    index.add_path(Path::new("README.md")).unwrap();
    index.write().unwrap();

    let signature = Signature::now("trigger", "noreply@example.com").unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &[])
        .unwrap()
}

/// the four downstream projects of onyx-http
pub fn create_test_targets() -> Vec<TriggerTarget> {
    [
        ("vladfaust", "crystalworld", "master"),
        ("vladfaust", "onyx-40-loc-distributed-chat", "master"),
        ("vladfaust", "onyx-todo-json-api", "part-1"),
        ("vladfaust", "onyx-todo-json-api", "part-2"),
    ]
    .into_iter()
    .map(|(owner, repo, branch)| TriggerTarget::new(owner, repo, branch).unwrap())
    .collect()
}

pub fn create_test_trigger(repo_dir: &Path, base_url: String) -> BuildTrigger<GitCommitSource> {
    let client = TravisClient::new(
        base_url,
        SecretString::from("test-token".to_string()),
        Duration::from_secs(10),
    )
    .unwrap();

    BuildTrigger::new(
        GitCommitSource::new(repo_dir),
        Dispatch::Live(client),
        create_test_targets(),
        RequestTemplate::default(),
    )
}
