//! User model -> entity mapper

use tokengate_core::{DomainError, Role, User, UserId};

use crate::models::UserModel;

/// Convert UserModel to User entity
///
/// Fails only if the stored role is not one this build knows.
impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        let role: Role = model
            .role
            .parse()
            .map_err(|e| DomainError::DatabaseError(format!("user {}: {e}", model.id)))?;

        Ok(User {
            id: UserId::new(model.id),
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            role,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
