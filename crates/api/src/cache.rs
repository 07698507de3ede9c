use std::{
    num::NonZeroUsize,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use cardapio_shared::{
    DateRange, format_date,
    mealplan::{
        ActiveMealPlan, CopyWeekRequest, GenerateRequest, MealPlanEntry, MealPlanEntryPatch,
        NewMealPlanEntry, WeeklyPlanSummary,
    },
    suggestion::{MealSuggestion, SuggestionRequest},
    user::MealPlanPreferences,
};
use lru::LruCache;
use serde::{Serialize, de::DeserializeOwned};
use strum::{AsRefStr, Display};
use time::Date;
use tokio::sync::RwLock;

use crate::{MealPlanApi, Result};

/// Invalidation tags attached to cached reads.
#[derive(Display, AsRefStr, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tag {
    MealPlans,
    WeeklyPlan,
    Statistics,
    Suggestions,
    Preferences,
    ActivePlan,
}

/// Tags touched by any change to meal-plan entries.
pub const ENTRY_TAGS: &[Tag] = &[
    Tag::MealPlans,
    Tag::WeeklyPlan,
    Tag::Statistics,
    Tag::Suggestions,
];

struct CacheEntry {
    value: serde_json::Value,
    tags: Vec<Tag>,
}

/// Shared query cache keyed by request, invalidated by tag.
///
/// Holds at most `capacity` reads, evicting the least recently used one.
/// Every invalidation bumps an epoch; a read that started before an
/// invalidation does not store its (possibly stale) result.
#[derive(Clone)]
pub struct QueryCache {
    entries: Arc<RwLock<LruCache<String, CacheEntry>>>,
    epoch: Arc<AtomicU64>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY.get())
    }
}

impl QueryCache {
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(256) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// A zero `capacity` falls back to [`Self::DEFAULT_CAPACITY`].
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(Self::DEFAULT_CAPACITY);

        Self {
            entries: Arc::new(RwLock::new(LruCache::new(capacity))),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    pub async fn capacity(&self) -> usize {
        self.entries.read().await.cap().get()
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        // LruCache::get bumps recency, hence the write lock
        let mut entries = self.entries.write().await;
        let entry = entries.get(key)?;

        match serde_json::from_value(entry.value.clone()) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key, err = %err, "dropping undecodable cache entry");
                entries.pop(key);
                None
            }
        }
    }

    pub async fn put<T: Serialize + Sync>(&self, key: impl Into<String>, tags: &[Tag], value: &T) {
        self.put_since(self.epoch(), key, tags, value).await;
    }

    /// Stores `value` unless an invalidation happened after `epoch`.
    pub async fn put_since<T: Serialize + Sync>(
        &self,
        epoch: u64,
        key: impl Into<String>,
        tags: &[Tag],
        value: &T,
    ) -> bool {
        let key = key.into();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key = %key, err = %err, "failed to encode cache entry");
                return false;
            }
        };

        let mut entries = self.entries.write().await;
        if self.epoch() != epoch {
            tracing::debug!(key = %key, "skipping cache write raced by an invalidation");
            return false;
        }

        let replaced = entries.push(
            key.clone(),
            CacheEntry {
                value,
                tags: tags.to_vec(),
            },
        );

        if let Some((evicted, _)) = replaced.filter(|(evicted, _)| *evicted != key) {
            tracing::trace!(key = %evicted, "evicted least recently used cache entry");
        }

        true
    }

    /// Removes every entry carrying one of `tags`, returns how many went away.
    pub async fn invalidate(&self, tags: &[Tag]) -> usize {
        let mut entries = self.entries.write().await;
        self.epoch.fetch_add(1, Ordering::SeqCst);

        let matching = entries
            .iter()
            .filter(|(_, entry)| entry.tags.iter().any(|tag| tags.contains(tag)))
            .map(|(key, _)| key.clone())
            .collect::<Vec<_>>();

        for key in &matching {
            entries.pop(key);
        }

        tracing::debug!(?tags, removed = matching.len(), "cache invalidated");

        matching.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Caching decorator over any [`MealPlanApi`].
///
/// Reads are served from the cache when possible. Mutations go straight to
/// the inner API and, once the server settled them successfully, invalidate
/// the tags of every read they may have changed.
#[derive(Clone)]
pub struct CachedApi<A> {
    inner: A,
    cache: QueryCache,
}

impl<A: MealPlanApi> CachedApi<A> {
    pub fn new(inner: A) -> Self {
        Self::with_cache(inner, QueryCache::default())
    }

    pub fn with_cache(inner: A, cache: QueryCache) -> Self {
        Self { inner, cache }
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    async fn cached<T, F>(&self, key: String, tags: &[Tag], fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: Future<Output = Result<T>> + Send,
    {
        if let Some(value) = self.cache.get(&key).await {
            tracing::trace!(key = %key, "cache hit");
            return Ok(value);
        }

        let epoch = self.cache.epoch();
        let value = fetch.await?;
        self.cache.put_since(epoch, key, tags, &value).await;

        Ok(value)
    }

    async fn settled<T: Send>(&self, res: Result<T>, tags: &[Tag]) -> Result<T> {
        if res.is_ok() {
            self.cache.invalidate(tags).await;
        }

        res
    }
}

#[async_trait::async_trait]
impl<A: MealPlanApi> MealPlanApi for CachedApi<A> {
    async fn list_entries(&self, user_id: &str, range: DateRange) -> Result<Vec<MealPlanEntry>> {
        let key = format!(
            "entries:{user_id}:{}:{}",
            format_date(range.start),
            format_date(range.end)
        );

        self.cached(key, &[Tag::MealPlans], self.inner.list_entries(user_id, range))
            .await
    }

    async fn active_plan(&self, user_id: &str) -> Result<Option<ActiveMealPlan>> {
        let key = format!("active:{user_id}");

        self.cached(key, &[Tag::ActivePlan], self.inner.active_plan(user_id))
            .await
    }

    async fn create_entry(&self, input: &NewMealPlanEntry) -> Result<MealPlanEntry> {
        let res = self.inner.create_entry(input).await;

        self.settled(res, ENTRY_TAGS).await
    }

    async fn update_entry(&self, id: &str, patch: &MealPlanEntryPatch) -> Result<MealPlanEntry> {
        let res = self.inner.update_entry(id, patch).await;

        self.settled(res, ENTRY_TAGS).await
    }

    async fn delete_entry(&self, id: &str) -> Result<()> {
        let res = self.inner.delete_entry(id).await;

        self.settled(res, ENTRY_TAGS).await
    }

    async fn generate(&self, input: &GenerateRequest) -> Result<Vec<MealPlanEntry>> {
        let res = self.inner.generate(input).await;

        self.settled(
            res,
            &[
                Tag::MealPlans,
                Tag::WeeklyPlan,
                Tag::Statistics,
                Tag::Suggestions,
                Tag::ActivePlan,
            ],
        )
        .await
    }

    async fn copy_week(&self, input: &CopyWeekRequest) -> Result<Vec<MealPlanEntry>> {
        let res = self.inner.copy_week(input).await;

        self.settled(res, ENTRY_TAGS).await
    }

    async fn weekly_summary(&self, user_id: &str, week_start: Date) -> Result<WeeklyPlanSummary> {
        let key = format!("weekly:{user_id}:{}", format_date(week_start));

        self.cached(
            key,
            &[Tag::WeeklyPlan, Tag::Statistics],
            self.inner.weekly_summary(user_id, week_start),
        )
        .await
    }

    async fn suggestions(&self, input: &SuggestionRequest) -> Result<Vec<MealSuggestion>> {
        let key = format!(
            "suggestions:{}:{}:{}:{}",
            input.user_id,
            format_date(input.date),
            input.meal_type,
            input.limit
        );

        self.cached(key, &[Tag::Suggestions], self.inner.suggestions(input))
            .await
    }

    async fn preferences(&self, user_id: &str) -> Result<MealPlanPreferences> {
        let key = format!("preferences:{user_id}");

        self.cached(key, &[Tag::Preferences], self.inner.preferences(user_id))
            .await
    }

    async fn save_preferences(
        &self,
        user_id: &str,
        preferences: &MealPlanPreferences,
    ) -> Result<MealPlanPreferences> {
        let res = self.inner.save_preferences(user_id, preferences).await;

        self.settled(res, &[Tag::Preferences, Tag::Suggestions])
            .await
    }
}
