use crate::auth::{hash_password, issue_token, verify_password};
use crate::handlers::users::UserResponse;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use axum::{extract::State, http::StatusCode, response::Json};
use model::entities::user;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use utoipa::ToSchema;
use validator::Validate;

/// Request body for registering a new user
#[derive(Debug, Deserialize, Serialize, ToSchema, Validate)]
pub struct RegisterRequest {
    /// Username (must be unique)
    #[validate(length(min = 1, max = 64))]
    pub username: String,
    /// Email address (must be unique)
    #[validate(email)]
    pub email: String,
    /// Password, at least 8 characters
    #[validate(length(min = 8))]
    pub password: String,
}

/// Request body for logging in
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Access token response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered successfully", body = ApiResponse<UserResponse>),
        (status = 409, description = "Username or email already taken", body = ErrorResponse),
        (status = 422, description = "Invalid registration payload", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserResponse>>), (StatusCode, Json<ErrorResponse>)> {
    debug!("Registering user with username: {}", request.username);

    if let Err(validation_errors) = request.validate() {
        warn!("Rejected registration payload: {}", validation_errors);
        let error_response = ErrorResponse {
            error: validation_errors.to_string(),
            code: "VALIDATION_ERROR".to_string(),
            success: false,
        };
        return Err((StatusCode::UNPROCESSABLE_ENTITY, Json(error_response)));
    }

    let password_hash = match hash_password(&request.password) {
        Ok(hash) => hash,
        Err(hash_error) => {
            error!("Failed to hash password: {}", hash_error);
            let error_response = ErrorResponse {
                error: "Internal server error while registering user".to_string(),
                code: "PASSWORD_HASH_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    let new_user = user::ActiveModel {
        username: Set(request.username.clone()),
        email: Set(request.email.clone()),
        password_hash: Set(password_hash),
        is_active: Set(true),
        ..Default::default()
    };

    match new_user.insert(&state.db).await {
        Ok(user_model) => {
            info!(
                "User registered successfully with ID: {}, username: {}",
                user_model.id, user_model.username
            );
            let response = ApiResponse {
                data: UserResponse::from(user_model),
                message: "User registered successfully".to_string(),
                success: true,
            };
            Ok((StatusCode::CREATED, Json(response)))
        }
        Err(db_error) => {
            error!("Failed to register user '{}': {}", request.username, db_error);

            // Unique violations on username/email get their own status and code
            let (status, error_response) = match db_error {
                DbErr::Exec(ref exec_err) => {
                    let error_msg = exec_err.to_string().to_lowercase();
                    if error_msg.contains("unique") || error_msg.contains("constraint") {
                        (
                            StatusCode::CONFLICT,
                            ErrorResponse {
                                error: "Username or email is already taken".to_string(),
                                code: "USER_ALREADY_EXISTS".to_string(),
                                success: false,
                            },
                        )
                    } else {
                        (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            ErrorResponse {
                                error: "Failed to register user due to database constraint"
                                    .to_string(),
                                code: "DATABASE_CONSTRAINT_ERROR".to_string(),
                                success: false,
                            },
                        )
                    }
                }
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error while registering user".to_string(),
                        code: "DATABASE_ERROR".to_string(),
                        success: false,
                    },
                ),
            };

            Err((status, Json(error_response)))
        }
    }
}

/// Log in with email and password, receiving a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<TokenResponse>),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(request))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<TokenResponse>>, (StatusCode, Json<ErrorResponse>)> {
    // One error shape for every failure mode; the caller cannot tell an
    // unknown email from a wrong password or a deactivated user.
    let invalid_credentials = || {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorResponse {
                error: "Invalid email or password".to_string(),
                code: "INVALID_CREDENTIALS".to_string(),
                success: false,
            }),
        )
    };

    let user_model = match user::Entity::find()
        .filter(user::Column::Email.eq(&request.email))
        .one(&state.db)
        .await
    {
        Ok(Some(user_model)) => user_model,
        Ok(None) => {
            debug!("Login attempt for unknown email");
            return Err(invalid_credentials());
        }
        Err(db_error) => {
            error!("Failed to look up user for login: {}", db_error);
            let error_response = ErrorResponse {
                error: "Internal server error during login".to_string(),
                code: "DATABASE_ERROR".to_string(),
                success: false,
            };
            return Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)));
        }
    };

    if !user_model.is_active || !verify_password(&request.password, &user_model.password_hash) {
        debug!("Login attempt rejected for user ID: {}", user_model.id);
        return Err(invalid_credentials());
    }

    match issue_token(user_model.id, &state.auth) {
        Ok(access_token) => {
            info!("User {} logged in", user_model.id);
            let response = ApiResponse {
                data: TokenResponse {
                    access_token,
                    token_type: "bearer".to_string(),
                },
                message: "Login successful".to_string(),
                success: true,
            };
            Ok(Json(response))
        }
        Err(token_error) => {
            error!("Failed to issue token for user {}: {}", user_model.id, token_error);
            let error_response = ErrorResponse {
                error: "Internal server error during login".to_string(),
                code: "TOKEN_ISSUE_ERROR".to_string(),
                success: false,
            };
            Err((StatusCode::INTERNAL_SERVER_ERROR, Json(error_response)))
        }
    }
}
