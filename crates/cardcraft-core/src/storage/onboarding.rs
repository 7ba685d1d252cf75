//! Onboarding carousel flag.

use super::{PreferenceStore, StorageResult};

/// Key of the "onboarding viewed" flag.
pub const INTRO_CAROUSEL_VIEWED_KEY: &str = "introCarouselViewed";

/// Whether the onboarding carousel has been viewed. Read once at launch.
pub async fn has_viewed_onboarding(store: &dyn PreferenceStore) -> StorageResult<bool> {
    let value = store.get(INTRO_CAROUSEL_VIEWED_KEY).await?;
    Ok(value.as_deref() == Some("true"))
}

/// Record that onboarding has been completed.
pub async fn mark_onboarding_viewed(store: &dyn PreferenceStore) -> StorageResult<()> {
    log::info!("Onboarding completed");
    store.set(INTRO_CAROUSEL_VIEWED_KEY, "true").await
}
