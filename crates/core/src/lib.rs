pub mod errors;
pub mod models;
pub mod services;
pub mod store;

use chrono::{DateTime, NaiveDate, Utc};
use models::{
    analytics::{CategoryBreakdown, ScheduledSubscription, SpendSummary},
    presets,
    query::{SubscriptionQuery, SubscriptionView},
    session::Session,
    settings::Settings,
    subscription::{Subscription, SubscriptionFields, SubscriptionPatch},
    transfer::{ImportFormat, ImportOutcome, ImportSummary},
};
use services::{
    aggregation_service::AggregationService, billing_calendar,
    subscription_service::SubscriptionService, transfer_service::TransferService,
};
use store::traits::SubscriptionStore;

use errors::CoreError;

/// Main entry point for the Subscription Tracker core library.
///
/// Holds one signed-in session, the store chosen for it, and the cached
/// subscription list. Mutations go through the store first; the cache only
/// changes once the store call has succeeded.
#[must_use]
pub struct SubscriptionTracker {
    session: Session,
    store: Box<dyn SubscriptionStore>,
    settings: Settings,
    subscriptions: Vec<Subscription>,
    subscription_service: SubscriptionService,
    aggregation_service: AggregationService,
    transfer_service: TransferService,
}

impl std::fmt::Debug for SubscriptionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubscriptionTracker")
            .field("session", &self.session)
            .field("store", &self.store.name())
            .field("settings", &self.settings)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl SubscriptionTracker {
    /// Bind a session to a store. Call [`load`](Self::load) before reading.
    pub fn new(session: Session, store: Box<dyn SubscriptionStore>) -> Self {
        Self {
            session,
            store,
            settings: Settings::default(),
            subscriptions: Vec::new(),
            subscription_service: SubscriptionService::new(),
            aggregation_service: AggregationService::new(),
            transfer_service: TransferService::new(),
        }
    }

    /// Builder form of [`set_settings`](Self::set_settings).
    pub fn with_settings(mut self, settings: Settings) -> Result<Self, CoreError> {
        self.set_settings(settings)?;
        Ok(self)
    }

    /// Start a time-boxed demo session on `store`, seeded with sample data.
    pub async fn start_demo(
        store: Box<dyn SubscriptionStore>,
        settings: Settings,
        now: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        settings.validate()?;
        let session = Session::demo(now, settings.demo_session_minutes)?;
        let mut tracker = Self::new(session, store).with_settings(settings)?;
        tracker
            .store
            .bulk_import(&tracker.session.owner_id, presets::demo_subscriptions())
            .await?;
        tracker.load().await?;
        log::info!("started demo session {}", tracker.session.owner_id);
        Ok(tracker)
    }

    // ── Session ─────────────────────────────────────────────────────

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Minutes left in a demo session (`None` outside demo mode).
    #[must_use]
    pub fn demo_minutes_left(&self, now: DateTime<Utc>) -> Option<i64> {
        self.session.remaining_minutes(now)
    }

    /// End the session. Demo data is discarded; other data stays in the store.
    pub async fn sign_out(self) -> Result<(), CoreError> {
        if self.session.is_demo() {
            self.store.clear_all(&self.session.owner_id).await?;
            log::info!("discarded demo session {}", self.session.owner_id);
        }
        Ok(())
    }

    // ── Settings ────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings after checking them.
    pub fn set_settings(&mut self, settings: Settings) -> Result<(), CoreError> {
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    // ── Subscription Management ─────────────────────────────────────

    /// Load (or reload) the session owner's subscriptions from the store.
    pub async fn load(&mut self) -> Result<&[Subscription], CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .refresh(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions)
            .await?;
        Ok(self.subscriptions.as_slice())
    }

    /// Cached subscriptions, in store order.
    #[must_use]
    pub fn subscriptions(&self) -> &[Subscription] {
        &self.subscriptions
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Subscription> {
        self.subscriptions.iter().find(|s| s.id == id)
    }

    /// Validate and create a subscription. Returns its new id.
    pub async fn add(&mut self, fields: SubscriptionFields) -> Result<String, CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .add(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions, fields)
            .await
    }

    pub async fn update(&mut self, id: &str, patch: SubscriptionPatch) -> Result<(), CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .update(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions, id, patch)
            .await
    }

    /// Flip the paused flag; returns the new value.
    pub async fn toggle_pause(&mut self, id: &str) -> Result<bool, CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .toggle_pause(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions, id)
            .await
    }

    pub async fn delete(&mut self, id: &str) -> Result<(), CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .delete(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions, id)
            .await
    }

    pub async fn clear_all(&mut self) -> Result<(), CoreError> {
        self.ensure_active()?;
        self.subscription_service
            .clear_all(self.store.as_ref(), &self.session.owner_id, &mut self.subscriptions)
            .await
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// JSON export of the cached list.
    pub fn export_json(&self, now: DateTime<Utc>) -> Result<String, CoreError> {
        self.transfer_service.export_json(&self.subscriptions, now)
    }

    /// CSV export of the cached list.
    #[must_use]
    pub fn export_csv(&self) -> String {
        self.transfer_service.export_csv(&self.subscriptions)
    }

    /// Parse without storing anything.
    #[must_use]
    pub fn preview_import(&self, format: ImportFormat, text: &str) -> ImportOutcome {
        self.transfer_service.import_text(format, text)
    }

    /// Parse `text` and store every parsed record (normalized). Records the
    /// advisory validator flags are still imported but reported back.
    pub async fn import_text(
        &mut self,
        format: ImportFormat,
        text: &str,
    ) -> Result<ImportSummary, CoreError> {
        self.ensure_active()?;
        let outcome = self.transfer_service.import_text(format, text);
        if outcome.is_empty() {
            log::warn!("import found no usable {format:?} records");
        }
        let invalid = outcome.invalid.clone();
        let imported = self
            .subscription_service
            .import(
                self.store.as_ref(),
                &self.session.owner_id,
                &mut self.subscriptions,
                outcome.into_fields(),
            )
            .await?;
        Ok(ImportSummary { imported, invalid })
    }

    /// Import a file, choosing the format from its name.
    pub async fn import_file(&mut self, file_name: &str, text: &str) -> Result<ImportSummary, CoreError> {
        let format = ImportFormat::from_file_name(file_name).ok_or_else(|| {
            CoreError::Validation(format!("unsupported import file type: {file_name}"))
        })?;
        self.import_text(format, text).await
    }

    // ── Totals & Listings ───────────────────────────────────────────

    #[must_use]
    pub fn monthly_total(&self) -> f64 {
        self.aggregation_service.monthly_total(&self.subscriptions)
    }

    #[must_use]
    pub fn yearly_total(&self) -> f64 {
        self.aggregation_service.yearly_total(&self.subscriptions)
    }

    #[must_use]
    pub fn category_breakdown(&self) -> CategoryBreakdown {
        self.aggregation_service.category_breakdown(&self.subscriptions)
    }

    #[must_use]
    pub fn summary(&self) -> SpendSummary {
        self.aggregation_service.spend_summary(&self.subscriptions)
    }

    #[must_use]
    pub fn most_expensive(&self) -> Option<&Subscription> {
        self.aggregation_service.most_expensive(&self.subscriptions)
    }

    /// Active subscriptions due within the configured alert threshold.
    #[must_use]
    pub fn alerts(&self, today: NaiveDate) -> Vec<ScheduledSubscription<'_>> {
        self.aggregation_service
            .alerts(&self.subscriptions, today, self.settings.alert_threshold_days)
    }

    #[must_use]
    pub fn payment_timeline(&self, today: NaiveDate) -> Vec<ScheduledSubscription<'_>> {
        self.aggregation_service.payment_timeline(&self.subscriptions, today)
    }

    /// Filtered and sorted listing.
    #[must_use]
    pub fn view(&self, query: &SubscriptionQuery, today: NaiveDate) -> SubscriptionView<'_> {
        self.aggregation_service.view(&self.subscriptions, query, today)
    }

    /// Subscriptions whose trial ends within the configured warning window.
    #[must_use]
    pub fn trials_ending_soon(&self, today: NaiveDate) -> Vec<&Subscription> {
        self.subscriptions
            .iter()
            .filter(|s| {
                billing_calendar::is_trial_ending_soon(
                    s.trial_end_date,
                    today,
                    self.settings.trial_warning_days,
                )
            })
            .collect()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn ensure_active(&self) -> Result<(), CoreError> {
        self.session.ensure_active(Utc::now())
    }
}
