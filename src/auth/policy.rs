use uuid::Uuid;

use crate::{
    error::ApiError,
    users::repo::{User, UserRole},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    Update,
    Delete,
    ChangePassword,
}

/// Pure allow/deny check for actions on user records. No IO; the route
/// layer calls this before touching the store.
///
/// - Update: the target themselves, or any owner.
/// - Delete: owners only, and never themselves.
/// - ChangePassword: the target themselves only.
pub fn authorize(actor: &User, target_id: Uuid, action: UserAction) -> Result<(), ApiError> {
    let is_self = actor.id == target_id;
    let is_owner = actor.role == UserRole::Owner;

    match action {
        UserAction::Update if is_self || is_owner => Ok(()),
        UserAction::Update => Err(ApiError::Forbidden(
            "you don't have permission to update this user",
        )),
        UserAction::Delete if !is_owner => {
            Err(ApiError::Forbidden("only owners can delete users"))
        }
        UserAction::Delete if is_self => {
            Err(ApiError::Forbidden("you cannot delete yourself"))
        }
        UserAction::Delete => Ok(()),
        UserAction::ChangePassword if is_self => Ok(()),
        UserAction::ChangePassword => Err(ApiError::Forbidden(
            "you can only change your own password",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn user(role: UserRole) -> User {
        User {
            id: Uuid::new_v4(),
            user_code: "OWN-TESTTEST".into(),
            email: "actor@x.com".into(),
            password_hash: String::new(),
            name: "Actor".into(),
            role,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn anyone_updates_themselves() {
        let actor = user(UserRole::Customer);
        assert!(authorize(&actor, actor.id, UserAction::Update).is_ok());
    }

    #[test]
    fn owner_updates_others() {
        let actor = user(UserRole::Owner);
        assert!(authorize(&actor, Uuid::new_v4(), UserAction::Update).is_ok());
    }

    #[test]
    fn non_owner_cannot_update_others() {
        let actor = user(UserRole::Supplier);
        assert!(matches!(
            authorize(&actor, Uuid::new_v4(), UserAction::Update),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn only_owner_deletes() {
        let actor = user(UserRole::Customer);
        assert!(matches!(
            authorize(&actor, Uuid::new_v4(), UserAction::Delete),
            Err(ApiError::Forbidden(_))
        ));
        let owner = user(UserRole::Owner);
        assert!(authorize(&owner, Uuid::new_v4(), UserAction::Delete).is_ok());
    }

    #[test]
    fn owner_cannot_delete_themselves() {
        let owner = user(UserRole::Owner);
        assert!(matches!(
            authorize(&owner, owner.id, UserAction::Delete),
            Err(ApiError::Forbidden(_))
        ));
    }

    #[test]
    fn password_change_is_self_only() {
        let owner = user(UserRole::Owner);
        assert!(authorize(&owner, owner.id, UserAction::ChangePassword).is_ok());
        // Even owners cannot change someone else's password.
        assert!(matches!(
            authorize(&owner, Uuid::new_v4(), UserAction::ChangePassword),
            Err(ApiError::Forbidden(_))
        ));
    }
}
