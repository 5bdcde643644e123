use serde::{Deserialize, Serialize};

use crate::domain::a001_training_session::readiness::ReviewRole;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Trainer,
    Hr,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
}

/// Пользователь, от имени которого выполняется действие.
///
/// Передаётся явно в каждую операцию, которой он нужен.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i64,
    pub display_name: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Какой набор правил готовности применяется к этому пользователю
    pub fn review_role(&self) -> ReviewRole {
        match self.role {
            UserRole::Trainer => ReviewRole::TrainerFinalize,
            UserRole::Hr | UserRole::Admin => ReviewRole::HrApprove,
        }
    }
}

impl From<&UserInfo> for CurrentUser {
    fn from(info: &UserInfo) -> Self {
        let display_name = info
            .full_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| info.username.clone());
        Self {
            id: info.id,
            display_name,
            role: info.role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(role: UserRole, full_name: Option<&str>) -> UserInfo {
        UserInfo {
            id: 5,
            username: "mlopez".into(),
            full_name: full_name.map(Into::into),
            email: None,
            role,
        }
    }

    #[test]
    fn test_role_selects_rule_set() {
        let trainer = CurrentUser::from(&info(UserRole::Trainer, None));
        assert_eq!(trainer.review_role(), ReviewRole::TrainerFinalize);
        let hr = CurrentUser::from(&info(UserRole::Hr, None));
        assert_eq!(hr.review_role(), ReviewRole::HrApprove);
        let admin = CurrentUser::from(&info(UserRole::Admin, None));
        assert_eq!(admin.review_role(), ReviewRole::HrApprove);
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(CurrentUser::from(&info(UserRole::Trainer, Some(" "))).display_name, "mlopez");
        assert_eq!(
            CurrentUser::from(&info(UserRole::Trainer, Some("Marta López"))).display_name,
            "Marta López"
        );
    }

    #[test]
    fn test_role_wire_format() {
        let parsed: UserRole = serde_json::from_str("\"HR\"").unwrap();
        assert_eq!(parsed, UserRole::Hr);
    }
}
