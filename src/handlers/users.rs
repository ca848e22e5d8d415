use crate::auth::CurrentUser;
use crate::schemas::ApiResponse;
use axum::response::Json;
use model::entities::user;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

/// User profile response model
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub is_active: bool,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            is_active: model.is_active,
        }
    }
}

/// Get the current user's profile
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    tag = "users",
    responses(
        (status = 200, description = "Profile retrieved successfully", body = ApiResponse<UserResponse>),
        (status = 401, description = "Missing or invalid token", body = crate::schemas::ErrorResponse)
    )
)]
#[instrument]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<ApiResponse<UserResponse>> {
    let response = ApiResponse {
        data: UserResponse::from(user),
        message: "Profile retrieved successfully".to_string(),
        success: true,
    };
    Json(response)
}
