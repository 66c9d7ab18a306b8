use crate::client::storage::{LocalStorage, StorageResult};

const ADMIN_KEY: &str = "admin";

/// The admin panel's only notion of being logged in: the display name of the
/// user returned by `/login`, kept in local storage.
#[derive(Debug)]
pub struct AdminSession<S> {
    storage: S,
}

impl<S: LocalStorage> AdminSession<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn remember(&mut self, display_name: &str) -> StorageResult<()> {
        self.storage.set_item(ADMIN_KEY, display_name)
    }

    pub fn current(&self) -> StorageResult<Option<String>> {
        self.storage.get_item(ADMIN_KEY)
    }

    pub fn is_logged_in(&self) -> StorageResult<bool> {
        Ok(self.current()?.is_some_and(|name| !name.is_empty()))
    }

    pub fn logout(&mut self) -> StorageResult<()> {
        self.storage.remove_item(ADMIN_KEY)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
