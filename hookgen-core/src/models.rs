use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// The conventional all-zero sha both major hosting platforms use as the
/// "before" of the first commit on a fresh branch.
pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";

/// Generate a random 40-character lowercase hex token, shaped like a git sha.
pub fn random_sha<R: Rng>(rng: &mut R) -> String {
    let mut bytes = [0u8; 20];
    rng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

impl Commit {
    /// Create a commit with a random id and a timestamp drawn uniformly
    /// from `[now - timespan, now]` at whole-second granularity.
    pub fn generate<R: Rng>(rng: &mut R, timespan: Duration) -> Self {
        let span = timespan.num_seconds();
        let offset = if span > 0 { rng.gen_range(0..span) } else { 0 };
        Self {
            id: random_sha(rng),
            timestamp: Utc::now() - Duration::seconds(offset),
        }
    }
}

/// An aggregated group of commits representing one push event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changeset {
    pub head_commit: Option<Commit>,
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_sha: Option<String>,
    pub commits: Vec<Commit>,
}

impl Changeset {
    /// Generate a changeset of `num_changes` commits with timestamps inside
    /// `timespan` and a fresh random `before` sha.
    ///
    /// The head commit is the one with the latest timestamp; on a tie the
    /// later-generated commit wins. `num_changes == 0` is allowed and yields
    /// no head commit.
    pub fn generate<R: Rng>(rng: &mut R, num_changes: usize, timespan: Duration) -> Self {
        let mut commits = Vec::with_capacity(num_changes);
        let mut head_commit: Option<Commit> = None;

        for _ in 0..num_changes {
            let commit = Commit::generate(rng, timespan);
            match &head_commit {
                Some(head) if commit.timestamp < head.timestamp => {}
                _ => head_commit = Some(commit.clone()),
            }
            commits.push(commit);
        }

        Self {
            head_commit,
            before: Some(random_sha(rng)),
            checkout_sha: None,
            commits,
        }
    }

    /// Override the `before` sha, including to null. Used by the chain
    /// builder to thread the previous changeset's resolved reference.
    pub fn with_before(mut self, before: Option<String>) -> Self {
        self.before = before;
        self
    }

    /// The sha that anchors the next link in a chain: the checkout sha if
    /// one is set, otherwise the head commit's id, otherwise null.
    pub fn resolved_reference(&self) -> Option<&str> {
        self.checkout_sha
            .as_deref()
            .or_else(|| self.head_commit.as_ref().map(|c| c.id.as_str()))
    }
}

/// A single-commit push event derived from a changeset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndividualChange {
    pub head_commit: Commit,
    pub before: String,
    pub commits: Vec<Commit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatus {
    pub updated_at: DateTime<Utc>,
    pub id: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    pub deployment_status: DeploymentStatus,
    pub deployment: Deployment,
}

impl DeploymentEvent {
    /// Build a successful deployment event for `commit`, with a fresh
    /// random deployment id.
    pub fn for_commit<R: Rng>(rng: &mut R, commit: &Commit) -> Self {
        Self {
            deployment_status: DeploymentStatus {
                updated_at: commit.timestamp,
                id: random_sha(rng),
                state: "success".to_string(),
            },
            deployment: Deployment {
                sha: commit.id.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub number: u32,
    pub labels: Vec<Label>,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
}

/// An incident issue pointing back at the commit that caused it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueEvent {
    pub issue: Issue,
    pub repository: Repository,
}

impl IssueEvent {
    pub fn for_root_cause<R: Rng>(rng: &mut R, root_cause: &Commit) -> Self {
        let now = Utc::now();
        Self {
            issue: Issue {
                created_at: root_cause.timestamp,
                updated_at: now,
                closed_at: now,
                number: rng.gen_range(0..1000),
                labels: vec![Label {
                    name: "Incident".to_string(),
                }],
                body: format!("root cause: {}", root_cause.id),
            },
            repository: Repository {
                name: "foobar".to_string(),
            },
        }
    }
}
