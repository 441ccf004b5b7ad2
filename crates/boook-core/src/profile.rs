//! User profile slots
//!
//! The display name and the onboarding-completion flag live in their own
//! slots beside the store's collections. They share the same adapter
//! contract but are outside the store's management.

use crate::storage::{
    SlotStorage, BOOKS_KEY, GOALS_KEY, LISTS_KEY, ONBOARDING_KEY, USER_NAME_KEY,
};

/// Access to the profile slots
pub struct Profile {
    storage: SlotStorage,
}

impl Profile {
    pub fn new(storage: SlotStorage) -> Self {
        Self { storage }
    }

    /// The user's display name, if one has been saved
    pub fn display_name(&self) -> Option<String> {
        let name: String = self.storage.get(USER_NAME_KEY, String::new());
        if name.is_empty() {
            None
        } else {
            Some(name)
        }
    }

    /// Save the user's display name
    pub fn set_display_name(&self, name: &str) {
        self.storage.set(USER_NAME_KEY, &name);
    }

    /// Whether first-run onboarding has been completed
    pub fn is_onboarded(&self) -> bool {
        self.storage.get(ONBOARDING_KEY, String::new()) == "true"
    }

    /// Mark first-run onboarding as completed
    pub fn complete_onboarding(&self) {
        self.storage.set(ONBOARDING_KEY, &"true");
    }

    /// Wipe every boook slot: collections, profile, and onboarding flag
    ///
    /// Use with caution!
    pub fn clear_all_data(&self) {
        for key in [
            BOOKS_KEY,
            GOALS_KEY,
            LISTS_KEY,
            USER_NAME_KEY,
            ONBOARDING_KEY,
        ] {
            self.storage.remove(key);
        }
    }
}
