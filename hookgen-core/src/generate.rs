use chrono::Duration;
use rand::Rng;

use crate::models::{random_sha, Changeset, IndividualChange, ZERO_SHA};

/// Build a chain of `num_events` changesets linked by their `before` shas.
///
/// Each changeset's `before` is the previous changeset's resolved reference,
/// threaded through a local accumulator; the first changeset chains off a
/// random sha standing in for an unknown ancestor. When
/// `commits_per_changeset` is `None` the commit count is redrawn uniformly
/// from `[1, 5)` for every changeset. A zero-commit changeset resolves to a
/// null reference, so its successor's `before` is null as well.
pub fn generate_chain<R: Rng>(
    rng: &mut R,
    num_events: usize,
    timespan: Duration,
    commits_per_changeset: Option<usize>,
) -> Vec<Changeset> {
    let mut chain = Vec::with_capacity(num_events);
    let mut prev_reference = Some(random_sha(rng));

    for _ in 0..num_events {
        let num_changes = commits_per_changeset.unwrap_or_else(|| rng.gen_range(1..5));
        let changeset =
            Changeset::generate(rng, num_changes, timespan).with_before(prev_reference);
        prev_reference = changeset.resolved_reference().map(str::to_owned);
        chain.push(changeset);
    }

    chain
}

/// Split a changeset into single-commit push events.
///
/// The commit matching the changeset's resolved reference is skipped; it is
/// already represented by the aggregate push event. The emitted changes form
/// their own sub-chain starting at the all-zero sha, independent of any
/// chain the changeset itself belongs to.
pub fn decompose(changeset: &Changeset) -> Vec<IndividualChange> {
    let changeset_sha = changeset.resolved_reference().map(str::to_owned);
    let mut prev_sha = ZERO_SHA.to_string();
    let mut ind_changes = Vec::new();

    for commit in &changeset.commits {
        if Some(commit.id.as_str()) == changeset_sha.as_deref() {
            continue;
        }
        let change = IndividualChange {
            head_commit: commit.clone(),
            before: prev_sha,
            commits: vec![commit.clone()],
        };
        prev_sha = commit.id.clone();
        ind_changes.push(change);
    }

    ind_changes
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const WEEK: i64 = 604_800;

    #[test]
    fn test_chain_linked_with_before_attribute() {
        let mut rng = StdRng::seed_from_u64(1);
        let chain = generate_chain(&mut rng, 10, Duration::seconds(WEEK), None);

        assert_eq!(chain.len(), 10);
        for pair in chain.windows(2) {
            assert_eq!(
                pair[1].before.as_deref(),
                pair[0].resolved_reference(),
                "adjacent changesets must link via before"
            );
        }
    }

    #[test]
    fn test_first_changeset_chains_off_random_sha() {
        let mut rng = StdRng::seed_from_u64(1);
        let chain = generate_chain(&mut rng, 3, Duration::seconds(WEEK), None);

        let before = chain[0].before.as_deref().unwrap();
        assert_eq!(before.len(), 40);
        assert_ne!(before, ZERO_SHA);
    }

    #[test]
    fn test_commit_count_redrawn_per_changeset() {
        let mut rng = StdRng::seed_from_u64(3);
        let chain = generate_chain(&mut rng, 40, Duration::seconds(WEEK), None);

        for changeset in &chain {
            assert!((1..5).contains(&changeset.commits.len()));
        }
        let first = chain[0].commits.len();
        assert!(
            chain.iter().any(|c| c.commits.len() != first),
            "independent draws should not all agree across 40 changesets"
        );
    }

    #[test]
    fn test_fixed_commit_count_honored() {
        let mut rng = StdRng::seed_from_u64(1);
        let chain = generate_chain(&mut rng, 5, Duration::seconds(WEEK), Some(3));

        assert!(chain.iter().all(|c| c.commits.len() == 3));
    }

    #[test]
    fn test_zero_commit_changeset_chains_null_reference() {
        let mut rng = StdRng::seed_from_u64(1);
        let chain = generate_chain(&mut rng, 4, Duration::seconds(WEEK), Some(0));

        // First link still anchors on the random ancestor sha.
        assert!(chain[0].before.is_some());
        for pair in chain.windows(2) {
            assert_eq!(pair[0].resolved_reference(), None);
            assert_eq!(pair[1].before, None);
        }
    }

    #[test]
    fn test_decompose_starts_at_zero_sha_and_links() {
        let mut rng = StdRng::seed_from_u64(5);
        let chain = generate_chain(&mut rng, 10, Duration::seconds(WEEK), None);

        for changeset in &chain {
            let ind_changes = decompose(changeset);
            if let Some(first) = ind_changes.first() {
                assert_eq!(first.before, ZERO_SHA);
            }
            for pair in ind_changes.windows(2) {
                assert_eq!(pair[1].before, pair[0].head_commit.id);
            }
        }
    }

    #[test]
    fn test_decompose_skips_resolved_reference_commit() {
        let mut rng = StdRng::seed_from_u64(5);
        let changeset = Changeset::generate(&mut rng, 4, Duration::seconds(WEEK));
        let head_id = changeset.head_commit.as_ref().unwrap().id.clone();

        let ind_changes = decompose(&changeset);
        assert_eq!(ind_changes.len(), 3);
        assert!(ind_changes.iter().all(|c| c.head_commit.id != head_id));
        assert!(ind_changes.iter().all(|c| c.commits.len() == 1));
    }

    #[test]
    fn test_decompose_empty_changeset() {
        let mut rng = StdRng::seed_from_u64(5);
        let changeset = Changeset::generate(&mut rng, 0, Duration::seconds(WEEK));

        assert!(decompose(&changeset).is_empty());
    }

    #[test]
    fn test_decompose_restarts_sub_chain_per_changeset() {
        let mut rng = StdRng::seed_from_u64(9);
        let chain = generate_chain(&mut rng, 6, Duration::seconds(WEEK), Some(3));

        for changeset in &chain {
            let ind_changes = decompose(changeset);
            assert_eq!(ind_changes[0].before, ZERO_SHA);
        }
    }
}
