//! In-memory profile store with change notifications
//!
//! Multiple consumers can watch the same profiles without threading state
//! through each other: every write is broadcast to subscribers, which
//! recompute whatever they display. [`RecommendationFeed`] does exactly that
//! for diet recommendations.

use crate::config::AppConfig;
use crate::diet::DietRecommendationEngine;
use crate::error::{Result, StoreError};
use crate::models::{DietRecommendation, Profile};
use crate::validation::{ProfileValidator, ValidationPolicy};
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

const CHANNEL_CAPACITY: usize = 64;

/// Notification sent to subscribers after every successful write
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileChange {
    Updated { id: String, profile: Profile },
    Removed { id: String },
}

impl ProfileChange {
    pub fn id(&self) -> &str {
        match self {
            ProfileChange::Updated { id, .. } | ProfileChange::Removed { id } => id,
        }
    }
}

/// Profiles keyed by user id
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, Profile>>,
    sender: broadcast::Sender<ProfileChange>,
    policy: ValidationPolicy,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::with_policy(ValidationPolicy::default())
    }

    pub fn with_policy(policy: ValidationPolicy) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            profiles: RwLock::new(HashMap::new()),
            sender,
            policy,
        }
    }

    /// Seed a store with every profile saved in the configuration.
    ///
    /// Saved profiles are trusted and not re-validated.
    pub fn from_config(config: &AppConfig) -> Self {
        let store = Self::with_policy(config.settings.validation_policy);
        if let Ok(mut profiles) = store.profiles.write() {
            for (id, saved) in &config.profiles {
                profiles.insert(id.clone(), saved.profile.clone());
            }
        }
        store
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn get(&self, id: &str) -> Result<Profile> {
        let profiles = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        profiles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() }.into())
    }

    /// Insert or replace a profile and notify subscribers
    pub fn put(&self, id: &str, profile: Profile) -> Result<()> {
        ProfileValidator::check(&profile, self.policy)?;

        {
            let mut profiles = self.profiles.write().map_err(|_| StoreError::Poisoned)?;
            profiles.insert(id.to_string(), profile.clone());
        }

        info!(profile_id = id, "Profile updated");
        self.notify(ProfileChange::Updated {
            id: id.to_string(),
            profile,
        });
        Ok(())
    }

    /// Insert a profile, failing if the id is taken
    pub fn insert_new(&self, id: &str, profile: Profile) -> Result<()> {
        ProfileValidator::check(&profile, self.policy)?;

        {
            let mut profiles = self.profiles.write().map_err(|_| StoreError::Poisoned)?;
            if profiles.contains_key(id) {
                return Err(StoreError::Duplicate { id: id.to_string() }.into());
            }
            profiles.insert(id.to_string(), profile.clone());
        }

        info!(profile_id = id, "Profile created");
        self.notify(ProfileChange::Updated {
            id: id.to_string(),
            profile,
        });
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<Profile> {
        let removed = {
            let mut profiles = self.profiles.write().map_err(|_| StoreError::Poisoned)?;
            profiles
                .remove(id)
                .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?
        };

        info!(profile_id = id, "Profile removed");
        self.notify(ProfileChange::Removed { id: id.to_string() });
        Ok(removed)
    }

    /// All stored ids, sorted
    pub fn ids(&self) -> Result<Vec<String>> {
        let profiles = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        let mut ids: Vec<String> = profiles.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    /// Snapshot of every profile, sorted by id
    pub fn snapshot(&self) -> Result<Vec<(String, Profile)>> {
        let profiles = self.profiles.read().map_err(|_| StoreError::Poisoned)?;
        let mut entries: Vec<(String, Profile)> = profiles
            .iter()
            .map(|(id, profile)| (id.clone(), profile.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    pub fn len(&self) -> usize {
        self.profiles.read().map(|p| p.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ProfileChange> {
        self.sender.subscribe()
    }

    /// Recommendations recomputed on every profile update
    pub fn recommendations(&self) -> RecommendationFeed {
        RecommendationFeed::new(self.subscribe())
    }

    fn notify(&self, change: ProfileChange) {
        // No receivers is fine; nobody is watching yet
        if let Ok(count) = self.sender.send(change) {
            debug!(subscribers = count, "Broadcast profile change");
        }
    }
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream of fresh recommendations driven by store updates
pub struct RecommendationFeed {
    receiver: broadcast::Receiver<ProfileChange>,
}

impl RecommendationFeed {
    pub fn new(receiver: broadcast::Receiver<ProfileChange>) -> Self {
        Self { receiver }
    }

    /// Wait for the next profile update and recompute its recommendation.
    ///
    /// Removals are skipped. Returns `None` once the store is dropped.
    pub async fn next(&mut self) -> Option<(String, DietRecommendation)> {
        loop {
            match self.receiver.recv().await {
                Ok(ProfileChange::Updated { id, profile }) => {
                    let recommendation = DietRecommendationEngine::recommend(&profile);
                    return Some((id, recommendation));
                }
                Ok(ProfileChange::Removed { .. }) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Recommendation feed lagged behind profile updates");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
