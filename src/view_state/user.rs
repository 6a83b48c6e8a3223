//! Profile screen state.

use std::sync::Arc;

use super::holder::StateHolder;
use crate::api::UpdateUserRequest;
use crate::models::UserUi;
use crate::repository::UserRepository;

#[derive(Debug)]
pub struct UserHolder {
    core: StateHolder<Option<UserUi>>,
    repo: Arc<UserRepository>,
}

impl std::ops::Deref for UserHolder {
    type Target = StateHolder<Option<UserUi>>;

    fn deref(&self) -> &Self::Target {
        &self.core
    }
}

impl UserHolder {
    pub fn new(repo: Arc<UserRepository>) -> Self {
        Self {
            core: StateHolder::new(None),
            repo,
        }
    }

    /// Load the signed-in user's profile.
    pub fn load_user_info(&self) {
        let repo = Arc::clone(&self.repo);
        self.core.load(async move { repo.get_user_info().await }, |state, user| {
            state.data = Some(user)
        });
    }

    pub fn load_user(&self, user_id: &str) {
        let repo = Arc::clone(&self.repo);
        let user_id = user_id.to_string();
        self.core
            .load(async move { repo.get_user(&user_id).await }, |state, user| {
                state.data = Some(user)
            });
    }

    pub fn update_user_info(&self, request: UpdateUserRequest) {
        let repo = Arc::clone(&self.repo);
        let applied = request.clone();
        self.core.write(
            async move { repo.update_user_info(&request).await },
            move |state| {
                if let Some(user) = state.data.as_mut() {
                    if let Some(name) = applied.name {
                        user.name = name;
                    }
                    if let Some(surname) = applied.surname {
                        user.surname = surname;
                    }
                    if let Some(class_name) = applied.class_name {
                        user.class_name = class_name;
                    }
                    if let Some(school) = applied.school {
                        user.school = school;
                    }
                    user.full_name = format!("{} {}", user.name, user.surname)
                        .trim()
                        .to_string();
                }
            },
        );
    }
}
