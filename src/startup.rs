use crate::configuration::{MissingCredentialError, Settings};
use crate::git::{CommitSource, GitCommitSource};
use crate::travis::{TravisClient, TriggerRequestError};
use crate::trigger::{BuildTrigger, Dispatch, TriggerReport};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    MissingCredential(#[from] MissingCredentialError),
    #[error(transparent)]
    Client(#[from] TriggerRequestError),
}

pub struct Application<S = GitCommitSource> {
    trigger: BuildTrigger<S>,
}

impl Application<GitCommitSource> {
    /// Wires the git working copy and the Travis client from `configuration`.
    ///
    /// The API token is only required when requests are actually sent.
    pub fn build(configuration: Settings) -> Result<Self, StartupError> {
        let commit_source = GitCommitSource::new(configuration.repository.path.clone());
        Self::with_commit_source(configuration, commit_source)
    }
}

impl<S: CommitSource> Application<S> {
    pub fn with_commit_source(
        configuration: Settings,
        commit_source: S,
    ) -> Result<Self, StartupError> {
        let dispatch = if configuration.travis.dry_run {
            warn!("Dry run enabled, no builds will be triggered");
            Dispatch::DryRun
        } else {
            let api_token = configuration.travis.api_token()?;
            Dispatch::Live(TravisClient::new(
                configuration.travis.base_url.clone(),
                api_token,
                configuration.travis.timeout(),
            )?)
        };

        let trigger = BuildTrigger::new(
            commit_source,
            dispatch,
            configuration.targets,
            configuration.request,
        );

        Ok(Self { trigger })
    }

    /// Runs every trigger and maps the outcome to the process exit code.
    pub async fn run(&self) -> ExitCode {
        match self.trigger.run().await {
            Ok(report) => report_exit_code(&report),
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        }
    }
}

fn report_exit_code(report: &TriggerReport) -> ExitCode {
    let succeeded = report.succeeded().count();
    let failed: Vec<String> = report.failures().map(|(t, _)| t.to_string()).collect();

    if failed.is_empty() {
        info!("Triggered {} downstream builds", succeeded);
        ExitCode::SUCCESS
    } else {
        error!(
            "{} of {} downstream builds failed to trigger: {}",
            failed.len(),
            report.outcomes().len(),
            failed.join(", ")
        );
        ExitCode::FAILURE
    }
}
