/// In-process sorted set, ordered the way Redis orders one
use crate::{error::FeedResult, feed_store::FeedStore};
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use tracing::debug;

/// One sorted set: score lookup by member plus (score, member) ordering.
///
/// Ties on score fall back to byte-wise member order, same as Redis.
#[derive(Debug, Default)]
struct SortedSet {
    scores: HashMap<String, i64>,
    ordered: BTreeSet<(i64, String)>,
}

impl SortedSet {
    fn insert(&mut self, score: i64, member: &str) {
        if let Some(previous) = self.scores.insert(member.to_string(), score) {
            self.ordered.remove(&(previous, member.to_string()));
        }
        self.ordered.insert((score, member.to_string()));
    }

    fn remove(&mut self, member: &str) -> bool {
        match self.scores.remove(member) {
            Some(score) => {
                self.ordered.remove(&(score, member.to_string()));
                true
            }
            None => false,
        }
    }

    fn len(&self) -> usize {
        self.ordered.len()
    }
}

/// Memory-backed feed store for local development and tests
#[derive(Debug, Default)]
pub struct MemoryFeedStore {
    sets: RwLock<HashMap<String, SortedSet>>,
}

impl MemoryFeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of members under `key`
    pub async fn len(&self, key: &str) -> usize {
        self.sets.read().await.get(key).map_or(0, SortedSet::len)
    }

    /// Score of a member, if present
    pub async fn score(&self, key: &str, member: &str) -> Option<i64> {
        self.sets
            .read()
            .await
            .get(key)
            .and_then(|set| set.scores.get(member).copied())
    }
}

/// Resolve Redis-style inclusive indices against a length.
///
/// Returns `None` when the range selects nothing.
fn resolve_range(len: usize, start: isize, stop: isize) -> Option<(usize, usize)> {
    if len == 0 {
        return None;
    }
    let len = len as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len || stop < 0 {
        return None;
    }
    Some((start as usize, stop as usize))
}

#[async_trait]
impl FeedStore for MemoryFeedStore {
    async fn add(&self, key: &str, score: i64, member: &str) -> FeedResult<()> {
        debug!("ZADD {} {} ({} bytes)", key, score, member.len());
        let mut sets = self.sets.write().await;
        sets.entry(key.to_string()).or_default().insert(score, member);
        Ok(())
    }

    async fn range(
        &self,
        key: &str,
        start: isize,
        stop: isize,
        rev: bool,
    ) -> FeedResult<Vec<String>> {
        debug!("ZRANGE {} {} {} (rev: {})", key, start, stop, rev);
        let sets = self.sets.read().await;
        let Some(set) = sets.get(key) else {
            return Ok(Vec::new());
        };
        let Some((start, stop)) = resolve_range(set.len(), start, stop) else {
            return Ok(Vec::new());
        };

        let take = stop - start + 1;
        let members = if rev {
            set.ordered
                .iter()
                .rev()
                .skip(start)
                .take(take)
                .map(|(_, member)| member.clone())
                .collect()
        } else {
            set.ordered
                .iter()
                .skip(start)
                .take(take)
                .map(|(_, member)| member.clone())
                .collect()
        };
        Ok(members)
    }

    async fn remove(&self, key: &str, member: &str) -> FeedResult<u64> {
        debug!("ZREM {} ({} bytes)", key, member.len());
        let mut sets = self.sets.write().await;
        let removed = sets.get_mut(key).map_or(false, |set| set.remove(member));
        Ok(removed as u64)
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
