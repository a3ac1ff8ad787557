//! Activity ranking
//!
//! Candidates are scored from the posts themselves (not the denormalized
//! counters), sorted by descending score with ascending user id breaking
//! ties. Candidates without posts score zero and stay in the ranking.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::backend::store::{EngagementStats, PostStore, StoreResult};

/// A candidate and the score it was ranked by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RankedUser {
    pub user_id: Uuid,
    pub score: i64,
}

/// Rank by engagement: likes + dislikes + comments across all posts
pub async fn rank_by_activity<S>(
    store: &S,
    candidates: &[Uuid],
    k: Option<usize>,
) -> StoreResult<Vec<RankedUser>>
where
    S: PostStore + ?Sized,
{
    let stats = store.engagement_stats(candidates).await?;
    Ok(rank(candidates, &stats, |s| s.engagement, k))
}

/// Rank by number of posts
pub async fn rank_by_post_count<S>(
    store: &S,
    candidates: &[Uuid],
    k: Option<usize>,
) -> StoreResult<Vec<RankedUser>>
where
    S: PostStore + ?Sized,
{
    let stats = store.engagement_stats(candidates).await?;
    Ok(rank(candidates, &stats, |s| s.post_count, k))
}

fn rank(
    candidates: &[Uuid],
    stats: &HashMap<Uuid, EngagementStats>,
    metric: impl Fn(&EngagementStats) -> i64,
    k: Option<usize>,
) -> Vec<RankedUser> {
    let mut ranked: Vec<RankedUser> = candidates
        .iter()
        .map(|id| RankedUser {
            user_id: *id,
            score: stats.get(id).map(&metric).unwrap_or(0),
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score).then(a.user_id.cmp(&b.user_id)));
    ranked.dedup_by_key(|r| r.user_id);

    if let Some(k) = k {
        ranked.truncate(k);
    }
    ranked
}
