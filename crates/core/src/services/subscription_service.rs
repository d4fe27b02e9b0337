use crate::errors::CoreError;
use crate::models::subscription::{Subscription, SubscriptionFields, SubscriptionPatch};
use crate::store::traits::SubscriptionStore;

/// Applies subscription mutations through a store and mirrors them into a
/// cached list.
///
/// Order is always: validate → await the store → touch the cache. A
/// rejected validation never reaches the store, and a failed store call
/// leaves the cache exactly as it was.
pub struct SubscriptionService;

impl SubscriptionService {
    pub fn new() -> Self {
        Self
    }

    /// Reload the cache from the store.
    pub async fn refresh(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut Vec<Subscription>,
    ) -> Result<(), CoreError> {
        let fresh = store.list(owner_id).await?;
        log::debug!("refreshed {} subscriptions from {}", fresh.len(), store.name());
        *cache = fresh;
        Ok(())
    }

    /// Create a subscription. The cache is reloaded afterwards so it holds
    /// the store-assigned `id` and `created_at`.
    pub async fn add(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut Vec<Subscription>,
        fields: SubscriptionFields,
    ) -> Result<String, CoreError> {
        fields.validate()?;
        let id = store.create(owner_id, fields).await?;
        self.refresh(store, owner_id, cache).await?;
        Ok(id)
    }

    pub async fn update(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut [Subscription],
        id: &str,
        patch: SubscriptionPatch,
    ) -> Result<(), CoreError> {
        patch.validate()?;
        let idx = Self::position(cache, id)?;
        if patch.is_empty() {
            return Ok(());
        }
        store.update(owner_id, id, &patch).await?;
        cache[idx].apply_patch(&patch);
        Ok(())
    }

    /// Flip the paused flag. Returns the new value.
    pub async fn toggle_pause(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut [Subscription],
        id: &str,
    ) -> Result<bool, CoreError> {
        let idx = Self::position(cache, id)?;
        let paused = !cache[idx].is_paused;
        self.update(store, owner_id, cache, id, SubscriptionPatch::pause(paused))
            .await?;
        Ok(paused)
    }

    pub async fn delete(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut Vec<Subscription>,
        id: &str,
    ) -> Result<(), CoreError> {
        let idx = Self::position(cache, id)?;
        store.delete(owner_id, id).await?;
        cache.remove(idx);
        Ok(())
    }

    /// Store many records at once and reload the cache. An empty batch is a
    /// no-op that reports 0.
    pub async fn import(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut Vec<Subscription>,
        records: Vec<SubscriptionFields>,
    ) -> Result<usize, CoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let count = store.bulk_import(owner_id, records).await?;
        self.refresh(store, owner_id, cache).await?;
        Ok(count)
    }

    pub async fn clear_all(
        &self,
        store: &dyn SubscriptionStore,
        owner_id: &str,
        cache: &mut Vec<Subscription>,
    ) -> Result<(), CoreError> {
        store.clear_all(owner_id).await?;
        cache.clear();
        Ok(())
    }

    fn position(cache: &[Subscription], id: &str) -> Result<usize, CoreError> {
        cache
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CoreError::SubscriptionNotFound(id.to_string()))
    }
}

impl Default for SubscriptionService {
    fn default() -> Self {
        Self::new()
    }
}
