//! Application-wide state published to the UI layer
//!
//! Replaces free global flags with `watch` channels that front-ends
//! subscribe to.

use std::sync::Arc;

use tokio::sync::watch;

/// Shared application state
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<Channels>,
}

#[derive(Debug)]
struct Channels {
    must_update: watch::Sender<bool>,
    login_required: watch::Sender<bool>,
}

impl AppState {
    pub fn new() -> Self {
        let (must_update, _) = watch::channel(false);
        let (login_required, _) = watch::channel(false);

        Self {
            inner: Arc::new(Channels {
                must_update,
                login_required,
            }),
        }
    }

    /// Flag that the backend refuses this client version
    pub fn set_must_update(&self, value: bool) {
        self.inner.must_update.send_replace(value);
    }

    pub fn must_update(&self) -> bool {
        *self.inner.must_update.borrow()
    }

    /// Subscribe to "must update" changes
    #[allow(dead_code)]
    pub fn subscribe_must_update(&self) -> watch::Receiver<bool> {
        self.inner.must_update.subscribe()
    }

    /// Flag that the user has to sign in again
    pub fn set_login_required(&self, value: bool) {
        self.inner.login_required.send_replace(value);
    }

    pub fn login_required(&self) -> bool {
        *self.inner.login_required.borrow()
    }

    /// Subscribe to "login required" changes
    #[allow(dead_code)]
    pub fn subscribe_login_required(&self) -> watch::Receiver<bool> {
        self.inner.login_required.subscribe()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
