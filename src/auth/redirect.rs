//! Login redirection

use crate::state::AppState;

/// Sends the user back to the login flow
pub trait LoginRedirect: Send + Sync {
    fn navigate_to_login(&self);
}

impl LoginRedirect for AppState {
    fn navigate_to_login(&self) {
        log::info!("Redirecting to login");
        self.set_login_required(true);
    }
}
