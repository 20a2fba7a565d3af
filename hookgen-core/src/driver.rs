use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::generate::{decompose, generate_chain};
use crate::models::{DeploymentEvent, IssueEvent};

/// Wire label attached to each delivered payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    Push,
    DeploymentStatus,
    Issues,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Push => "push",
            EventType::DeploymentStatus => "deployment_status",
            EventType::Issues => "issues",
        }
    }
}

/// Delivery boundary. The body is the exact byte sequence the sink must
/// transmit (and sign, if it signs); returns whether the remote accepted it.
pub trait WebhookSink {
    fn deliver(&mut self, event: EventType, body: &[u8]) -> bool;
}

#[derive(Debug, Clone)]
pub struct RunPlan {
    pub num_events: usize,
    pub event_timespan: Duration,
    pub num_issues: usize,
    /// Fixed commits per changeset; random in `[1, 5)` when unset.
    pub commits_per_changeset: Option<usize>,
}

impl Default for RunPlan {
    fn default() -> Self {
        Self {
            num_events: 40,
            event_timespan: Duration::seconds(604_800),
            num_issues: 2,
            commits_per_changeset: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Successfully delivered individual-change push events. This is the
    /// number reported to the user.
    pub changes_sent: usize,
    pub changesets_sent: usize,
    pub deployments_sent: usize,
    pub issues_sent: usize,
}

/// Generate a changeset chain and feed the derived events to `sink`.
///
/// For each changeset: every individual change goes out as a push event,
/// then the aggregate changeset as a push event, then half the time a
/// deployment event for the head commit. After all changesets,
/// `plan.num_issues` changesets are sampled without replacement and an
/// incident issue is delivered for each head commit.
///
/// Fails before any generation or delivery when `plan.num_issues` exceeds
/// `plan.num_events`. Rejected or failed deliveries are not retried; they
/// simply do not count towards the summary.
pub fn run<R, S>(rng: &mut R, sink: &mut S, plan: &RunPlan) -> Result<RunSummary>
where
    R: Rng,
    S: WebhookSink,
{
    if plan.num_issues > plan.num_events {
        return Err(Error::TooManyIssues {
            num_issues: plan.num_issues,
            num_events: plan.num_events,
        });
    }

    let chain = generate_chain(
        rng,
        plan.num_events,
        plan.event_timespan,
        plan.commits_per_changeset,
    );
    let mut summary = RunSummary::default();

    for changeset in &chain {
        for change in decompose(changeset) {
            let body = serde_json::to_vec(&change)?;
            if sink.deliver(EventType::Push, &body) {
                summary.changes_sent += 1;
            }
        }

        let body = serde_json::to_vec(changeset)?;
        if sink.deliver(EventType::Push, &body) {
            summary.changesets_sent += 1;
        }

        // Deploy half the changesets; the rest stay undeployed changes.
        if rng.gen_bool(0.5) {
            match &changeset.head_commit {
                Some(head) => {
                    let deploy = DeploymentEvent::for_commit(rng, head);
                    let body = serde_json::to_vec(&deploy)?;
                    if sink.deliver(EventType::DeploymentStatus, &body) {
                        summary.deployments_sent += 1;
                    }
                }
                None => debug!("Skipping deployment for changeset without head commit"),
            }
        }
    }

    let with_issues: Vec<_> = chain.choose_multiple(rng, plan.num_issues).collect();
    for changeset in with_issues {
        let Some(head) = &changeset.head_commit else {
            warn!("Skipping issue for changeset without head commit");
            continue;
        };
        let issue = IssueEvent::for_root_cause(rng, head);
        let body = serde_json::to_vec(&issue)?;
        if sink.deliver(EventType::Issues, &body) {
            summary.issues_sent += 1;
        }
    }

    Ok(summary)
}
