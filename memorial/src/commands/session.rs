//! Admin session commands

use crate::app::AppState;

/// Bad credentials are a plain `false`, not an error
pub async fn login(state: &AppState, username: String, password: String) -> bool {
    state.session.login(&username, &password).await
}

pub async fn logout(state: &AppState) {
    state.session.logout().await;
}

pub fn is_admin(state: &AppState) -> bool {
    state.session.is_admin()
}
