use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::subscription::{Subscription, SubscriptionFields, SubscriptionPatch};

/// Persistence contract for per-owner subscription collections.
///
/// One implementation per backend (local snapshot, remote document store).
/// The caller picks the backend; business logic never branches on it.
/// Failures are surfaced unchanged; there is no retry at this layer.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait SubscriptionStore: Send + Sync {
    /// Human-readable backend name (for logs/errors).
    fn name(&self) -> &str;

    /// Every subscription of `owner_id`, in insertion order.
    async fn list(&self, owner_id: &str) -> Result<Vec<Subscription>, CoreError>;

    /// Store a new subscription. The store assigns `id` and `created_at`.
    async fn create(&self, owner_id: &str, fields: SubscriptionFields) -> Result<String, CoreError>;

    /// Apply a partial update to one subscription.
    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SubscriptionPatch,
    ) -> Result<(), CoreError>;

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), CoreError>;

    /// Append many records at once. Returns how many were stored.
    async fn bulk_import(
        &self,
        owner_id: &str,
        records: Vec<SubscriptionFields>,
    ) -> Result<usize, CoreError>;

    /// Remove every subscription of `owner_id`.
    async fn clear_all(&self, owner_id: &str) -> Result<(), CoreError>;
}
