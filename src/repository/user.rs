//! User profile reads and updates.

use std::sync::Arc;

use crate::api::{ApiClient, UpdateUserRequest};
use crate::error::{ClientError, RepoResult};
use crate::models::UserUi;
use crate::session::SessionStore;

#[derive(Debug)]
pub struct UserRepository {
    api: ApiClient,
    session: Arc<SessionStore>,
}

impl UserRepository {
    pub fn new(api: ApiClient, session: Arc<SessionStore>) -> Self {
        Self { api, session }
    }

    pub async fn get_user(&self, user_id: &str) -> RepoResult<UserUi> {
        let token = self.session.token();
        self.api
            .get_user(token.as_deref(), user_id)
            .await
            .map(UserUi::from)
            .into()
    }

    /// Profile of the signed-in user. Refreshes the session's name fields.
    pub async fn get_user_info(&self) -> RepoResult<UserUi> {
        let token = self.session.token();
        match self.api.get_user_info(token.as_deref()).await {
            Ok(profile) => {
                let user = UserUi::from(profile);
                self.session.update(|s| {
                    s.user_name = Some(user.name.clone());
                    s.user_surname = Some(user.surname.clone());
                    s.role = Some(user.role);
                });
                RepoResult::Success(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load user info");
                e.into()
            }
        }
    }

    /// Update the signed-in user's profile.
    pub async fn update_user_info(&self, request: &UpdateUserRequest) -> RepoResult<String> {
        let snapshot = self.session.snapshot();
        if !snapshot.is_authenticated() {
            return ClientError::Unauthenticated.into();
        }
        let Some(login) = snapshot.login.filter(|l| !l.is_empty()) else {
            return RepoResult::error("No login stored for this session");
        };

        match self
            .api
            .update_user(snapshot.auth_token.as_deref(), &login, request)
            .await
        {
            Ok(message) => {
                self.session.update(|s| {
                    if let Some(name) = &request.name {
                        s.user_name = Some(name.clone());
                    }
                    if let Some(surname) = &request.surname {
                        s.user_surname = Some(surname.clone());
                    }
                });
                RepoResult::Success(message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to update user info");
                e.into()
            }
        }
    }
}
