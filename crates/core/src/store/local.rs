use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::profile::Profile;
use crate::models::subscription::{Subscription, SubscriptionFields, SubscriptionPatch};

use super::format;
use super::traits::SubscriptionStore;

const STORE_NAME: &str = "local";

/// Everything the local store keeps: profiles and one collection per owner.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalSnapshot {
    pub profiles: Vec<Profile>,
    pub collections: HashMap<String, Vec<Subscription>>,
}

impl LocalSnapshot {
    /// Serialize into the SUBT snapshot format.
    ///
    /// Flow: LocalSnapshot → bincode → SUBT header + payload
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let payload = bincode::serialize(self)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize snapshot: {e}")))?;
        Ok(format::write_file(format::CURRENT_VERSION, &payload))
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        let (_header, payload) = format::read_file(data)?;
        bincode::deserialize(payload)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize snapshot: {e}")))
    }
}

/// On-device store. Collections live in memory and, when opened on a file,
/// are written through to that file after every mutation.
///
/// A mutation is applied to a copy first; the live state only changes once
/// the copy has been persisted, so a failed write changes nothing.
pub struct LocalStore {
    state: RwLock<LocalSnapshot>,
    #[cfg(not(target_arch = "wasm32"))]
    path: Option<PathBuf>,
}

impl LocalStore {
    /// A store that lives only as long as this value.
    pub fn in_memory() -> Self {
        Self::with_snapshot(LocalSnapshot::default())
    }

    /// Restore a store from snapshot bytes (no file write-through).
    pub fn from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        Ok(Self::with_snapshot(LocalSnapshot::from_bytes(data)?))
    }

    /// Open a file-backed store; a missing file starts empty.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let bytes = std::fs::read(&path)?;
            LocalSnapshot::from_bytes(&bytes)?
        } else {
            LocalSnapshot::default()
        };
        log::debug!("opened local store at {}", path.display());
        Ok(Self {
            state: RwLock::new(snapshot),
            path: Some(path),
        })
    }

    /// Current state as snapshot bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, CoreError> {
        self.read(|s| s.to_bytes())?
    }

    // ── Profiles ────────────────────────────────────────────────────

    #[must_use]
    pub fn profiles(&self) -> Vec<Profile> {
        self.read(|s| s.profiles.clone()).unwrap_or_default()
    }

    pub fn create_profile(
        &self,
        display_name: &str,
        now: DateTime<Utc>,
    ) -> Result<Profile, CoreError> {
        if display_name.trim().is_empty() {
            return Err(CoreError::Validation("profile name must not be empty".into()));
        }
        let profile = Profile::new(display_name.trim(), now);
        let created = profile.clone();
        self.mutate(move |s| {
            s.profiles.push(profile);
            Ok(())
        })?;
        log::info!("created local profile {}", created.id);
        Ok(created)
    }

    pub fn rename_profile(&self, profile_id: &str, display_name: &str) -> Result<Profile, CoreError> {
        if display_name.trim().is_empty() {
            return Err(CoreError::Validation("profile name must not be empty".into()));
        }
        self.mutate(|s| {
            let profile = s
                .profiles
                .iter_mut()
                .find(|p| p.id == profile_id)
                .ok_or_else(|| CoreError::ProfileNotFound(profile_id.to_string()))?;
            profile.display_name = display_name.trim().to_string();
            Ok(profile.clone())
        })
    }

    /// Delete a profile together with its subscriptions.
    pub fn delete_profile(&self, profile_id: &str) -> Result<(), CoreError> {
        self.mutate(|s| {
            let before = s.profiles.len();
            s.profiles.retain(|p| p.id != profile_id);
            if s.profiles.len() == before {
                return Err(CoreError::ProfileNotFound(profile_id.to_string()));
            }
            s.collections.remove(profile_id);
            Ok(())
        })?;
        log::info!("deleted local profile {profile_id}");
        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn with_snapshot(snapshot: LocalSnapshot) -> Self {
        Self {
            state: RwLock::new(snapshot),
            #[cfg(not(target_arch = "wasm32"))]
            path: None,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&LocalSnapshot) -> T) -> Result<T, CoreError> {
        let guard = self.state.read().map_err(|_| poisoned())?;
        Ok(f(&guard))
    }

    fn mutate<T>(
        &self,
        f: impl FnOnce(&mut LocalSnapshot) -> Result<T, CoreError>,
    ) -> Result<T, CoreError> {
        let mut guard = self.state.write().map_err(|_| poisoned())?;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *guard = next;
        Ok(out)
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn persist(&self, snapshot: &LocalSnapshot) -> Result<(), CoreError> {
        if let Some(path) = &self.path {
            let bytes = snapshot.to_bytes()?;
            std::fs::write(path, bytes).map_err(|e| CoreError::Persistence {
                store: STORE_NAME.to_string(),
                message: format!("failed to write {}: {e}", path.display()),
            })?;
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn persist(&self, _snapshot: &LocalSnapshot) -> Result<(), CoreError> {
        Ok(())
    }
}

impl Default for LocalStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

fn poisoned() -> CoreError {
    CoreError::Persistence {
        store: STORE_NAME.to_string(),
        message: "store lock poisoned".to_string(),
    }
}

fn new_subscription_id() -> String {
    format!("sub_{}", Uuid::new_v4().simple())
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl SubscriptionStore for LocalStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    async fn list(&self, owner_id: &str) -> Result<Vec<Subscription>, CoreError> {
        self.read(|s| s.collections.get(owner_id).cloned().unwrap_or_default())
    }

    async fn create(&self, owner_id: &str, fields: SubscriptionFields) -> Result<String, CoreError> {
        let subscription = Subscription::from_fields(new_subscription_id(), fields, Utc::now());
        let id = subscription.id.clone();
        self.mutate(|s| {
            s.collections
                .entry(owner_id.to_string())
                .or_default()
                .push(subscription);
            Ok(())
        })?;
        log::info!("created subscription {id} for {owner_id}");
        Ok(id)
    }

    async fn update(
        &self,
        owner_id: &str,
        id: &str,
        patch: &SubscriptionPatch,
    ) -> Result<(), CoreError> {
        self.mutate(|s| {
            let sub = s
                .collections
                .get_mut(owner_id)
                .and_then(|subs| subs.iter_mut().find(|sub| sub.id == id))
                .ok_or_else(|| CoreError::SubscriptionNotFound(id.to_string()))?;
            sub.apply_patch(patch);
            Ok(())
        })?;
        log::info!("updated subscription {id} for {owner_id}");
        Ok(())
    }

    async fn delete(&self, owner_id: &str, id: &str) -> Result<(), CoreError> {
        self.mutate(|s| {
            let subs = s
                .collections
                .get_mut(owner_id)
                .ok_or_else(|| CoreError::SubscriptionNotFound(id.to_string()))?;
            let before = subs.len();
            subs.retain(|sub| sub.id != id);
            if subs.len() == before {
                return Err(CoreError::SubscriptionNotFound(id.to_string()));
            }
            Ok(())
        })?;
        log::info!("deleted subscription {id} for {owner_id}");
        Ok(())
    }

    async fn bulk_import(
        &self,
        owner_id: &str,
        records: Vec<SubscriptionFields>,
    ) -> Result<usize, CoreError> {
        let now = Utc::now();
        let imported: Vec<Subscription> = records
            .into_iter()
            .map(|fields| Subscription::from_fields(new_subscription_id(), fields, now))
            .collect();
        let count = imported.len();
        self.mutate(|s| {
            s.collections
                .entry(owner_id.to_string())
                .or_default()
                .extend(imported);
            Ok(())
        })?;
        log::info!("imported {count} subscriptions for {owner_id}");
        Ok(count)
    }

    async fn clear_all(&self, owner_id: &str) -> Result<(), CoreError> {
        self.mutate(|s| {
            s.collections.remove(owner_id);
            Ok(())
        })?;
        log::info!("cleared subscriptions for {owner_id}");
        Ok(())
    }
}
