use serde::{Deserialize, Serialize};

use crate::users::repo::{User, UserFilter, UserRole};

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub role: Option<UserRole>,
    pub active: Option<bool>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    100
}

impl From<UserQuery> for UserFilter {
    fn from(q: UserQuery) -> Self {
        UserFilter {
            role: q.role,
            active: q.active,
            limit: q.limit.clamp(1, 100),
            offset: q.offset.max(0),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub total: i64,
    pub users: Vec<User>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults() {
        let q: UserQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.limit, 100);
        assert_eq!(q.offset, 0);
        assert!(q.role.is_none());
        assert!(q.active.is_none());
    }

    #[test]
    fn filter_clamps_out_of_range_pagination() {
        let q: UserQuery = serde_json::from_str(r#"{"limit": 5000, "offset": -3}"#).unwrap();
        let f = UserFilter::from(q);
        assert_eq!(f.limit, 100);
        assert_eq!(f.offset, 0);
    }

    #[test]
    fn query_parses_filters() {
        let q: UserQuery =
            serde_json::from_str(r#"{"role": "supplier", "active": false}"#).unwrap();
        assert_eq!(q.role, Some(UserRole::Supplier));
        assert_eq!(q.active, Some(false));
    }
}
