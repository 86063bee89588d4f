use crate::domain::{BuildRequest, CommitIdentity, RequestTemplate, TriggerTarget};
use crate::git::{CommitResolutionError, CommitSource};
use crate::travis::{TravisClient, TriggerRequestError};
use futures::future::join_all;
use tracing::{error, info};

/// Where build requests go.
#[derive(Debug)]
pub enum Dispatch {
    Live(TravisClient),
    /// Log the payload instead of sending it.
    DryRun,
}

/// Result of triggering a single downstream target.
#[derive(Debug)]
pub struct TriggerOutcome {
    pub target: TriggerTarget,
    pub result: Result<(), TriggerRequestError>,
}

/// Every target's outcome for one run, in table order.
#[derive(Debug)]
pub struct TriggerReport {
    outcomes: Vec<TriggerOutcome>,
}

impl TriggerReport {
    pub fn outcomes(&self) -> &[TriggerOutcome] {
        &self.outcomes
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(|o| o.result.is_ok())
    }

    pub fn succeeded(&self) -> impl Iterator<Item = &TriggerTarget> {
        self.outcomes
            .iter()
            .filter(|o| o.result.is_ok())
            .map(|o| &o.target)
    }

    pub fn failures(&self) -> impl Iterator<Item = (&TriggerTarget, &TriggerRequestError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.target, e)))
    }
}

/// Resolves the current commit once, then requests a build of every target.
pub struct BuildTrigger<S> {
    commit_source: S,
    dispatch: Dispatch,
    targets: Vec<TriggerTarget>,
    template: RequestTemplate,
}

impl<S: CommitSource> BuildTrigger<S> {
    pub fn new(
        commit_source: S,
        dispatch: Dispatch,
        targets: Vec<TriggerTarget>,
        template: RequestTemplate,
    ) -> Self {
        Self {
            commit_source,
            dispatch,
            targets,
            template,
        }
    }

    pub fn targets(&self) -> &[TriggerTarget] {
        &self.targets
    }

    /// Fails before any request is sent if the commit cannot be resolved.
    pub async fn run(&self) -> Result<TriggerReport, CommitResolutionError> {
        let identity = self.commit_source.resolve_commit_identity()?;
        Ok(self.trigger_all(&identity).await)
    }

    /// Sends every request concurrently and waits for all of them, so one
    /// failing target never hides the outcome of another.
    pub async fn trigger_all(&self, identity: &CommitIdentity) -> TriggerReport {
        let pending = self.targets.iter().map(|target| async move {
            let request = BuildRequest::new(target, identity);
            let result = self.trigger_build(target, &request).await;
            TriggerOutcome {
                target: target.clone(),
                result,
            }
        });

        TriggerReport {
            outcomes: join_all(pending).await,
        }
    }

    async fn trigger_build(
        &self,
        target: &TriggerTarget,
        request: &BuildRequest,
    ) -> Result<(), TriggerRequestError> {
        info!("Triggering {}...", target);

        match &self.dispatch {
            Dispatch::Live(client) => {
                if let Err(e) = client.trigger_build(request, &self.template).await {
                    error!("{}", e);
                    return Err(e);
                }
                info!("Triggered {}", target);
            }
            Dispatch::DryRun => {
                let payload = serde_json::to_string(&request.payload(&self.template))
                    .unwrap_or_else(|e| format!("<unserializable payload: {e}>"));
                info!("Dry run, not triggering {}: {}", target, payload);
            }
        }
        Ok(())
    }
}
