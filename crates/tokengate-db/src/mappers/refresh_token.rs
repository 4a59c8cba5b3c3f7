//! Refresh token model -> entity mapper

use tokengate_core::{RefreshTokenRecord, UserId};

use crate::models::RefreshTokenModel;

impl From<RefreshTokenModel> for RefreshTokenRecord {
    fn from(model: RefreshTokenModel) -> Self {
        RefreshTokenRecord {
            id: model.id,
            user_id: UserId::new(model.user_id),
            token: model.token,
            revoked: model.revoked,
            expires_at: model.expires_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
