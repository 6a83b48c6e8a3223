//! User profile display model.

use serde::Serialize;

use crate::api::UserProfileDto;
use crate::session::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUi {
    pub user_id: String,
    pub email: String,
    pub name: String,
    pub surname: String,
    /// "name surname"
    pub full_name: String,
    pub class_name: String,
    pub school: String,
    pub role: Role,
}

impl From<UserProfileDto> for UserUi {
    fn from(dto: UserProfileDto) -> Self {
        let full_name = format!("{} {}", dto.name.trim(), dto.surname.trim())
            .trim()
            .to_string();
        Self {
            user_id: dto.user_id,
            email: dto.email,
            name: dto.name,
            surname: dto.surname,
            full_name,
            class_name: dto.class_name,
            school: dto.school,
            role: dto.role,
        }
    }
}
