//! Authentication routes: signup, login, logout

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    models::{NewSession, NewUser, UserResponse},
    routes::{SESSION_COOKIE, expired_session_cookie, session_cookie},
    token::SESSION_TTL_SECONDS,
    validation::{
        email::normalize_email, is_common_password, validate_email,
        validate_password_complexity, validate_phone, validate_state_code,
    },
};

const MINIMUM_SIGNUP_AGE: i32 = 18;

/// Request for user signup
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    /// Date of birth in `YYYY-MM-DD` form
    pub date_of_birth: String,
    pub ssn: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// Request for user login
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for signup and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub token: String,
}

/// Age in whole years at `today`, by calendar-aware comparison
fn calculate_age(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Parse and validate a date of birth
fn validate_date_of_birth(value: &str) -> Result<NaiveDate, String> {
    let dob = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| "Date of birth must be a valid date".to_string())?;

    let today = Utc::now().date_naive();
    if dob > today {
        return Err("Date of birth cannot be in the future".to_string());
    }

    if calculate_age(dob, today) < MINIMUM_SIGNUP_AGE {
        return Err("You must be at least 18 years old to sign up".to_string());
    }

    Ok(dob)
}

fn require_digits(value: &str, length: usize, message: &str) -> Result<(), String> {
    if value.len() == length && value.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(message.to_string())
    }
}

fn require_present(value: &str, message: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(message.to_string())
    } else {
        Ok(())
    }
}

/// Issue a token, persist the session row, and set the cookie
async fn establish_session(
    state: &AppState,
    jar: CookieJar,
    user_id: Uuid,
) -> ApiResult<(CookieJar, String)> {
    let token = state.token_service.issue(user_id).map_err(|e| {
        error!("Failed to issue session token: {}", e);
        ApiError::InternalServerError
    })?;

    let expires_at = Utc::now() + Duration::seconds(SESSION_TTL_SECONDS as i64)
        - Duration::minutes(state.session_expiry_buffer_minutes);

    state
        .session_repository
        .create(&NewSession {
            user_id,
            token: token.clone(),
            expires_at,
        })
        .await
        .map_err(|e| {
            error!("Failed to persist session: {}", e);
            ApiError::InternalServerError
        })?;

    let jar = jar.add(session_cookie(&token));
    Ok((jar, token))
}

/// User signup endpoint
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    let email = normalize_email(&payload.email);

    if payload.password.len() < 8 {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    if is_common_password(&payload.password) {
        return Err(ApiError::BadRequest("Password is too common".to_string()));
    }
    validate_password_complexity(&payload.password).map_err(ApiError::BadRequest)?;

    require_present(&payload.first_name, "First name is required").map_err(ApiError::BadRequest)?;
    require_present(&payload.last_name, "Last name is required").map_err(ApiError::BadRequest)?;
    validate_phone(&payload.phone_number).map_err(ApiError::BadRequest)?;

    let date_of_birth =
        validate_date_of_birth(&payload.date_of_birth).map_err(ApiError::BadRequest)?;

    require_digits(&payload.ssn, 9, "SSN must be exactly 9 digits").map_err(ApiError::BadRequest)?;
    require_present(&payload.address, "Address is required").map_err(ApiError::BadRequest)?;
    require_present(&payload.city, "City is required").map_err(ApiError::BadRequest)?;
    validate_state_code(&payload.state).map_err(ApiError::BadRequest)?;
    require_digits(&payload.zip_code, 5, "ZIP code must be 5 digits")
        .map_err(ApiError::BadRequest)?;

    info!("Signup attempt for email: {}", email);

    let existing = state.user_repository.find_by_email(&email).await.map_err(|e| {
        error!("Failed to look up user: {}", e);
        ApiError::InternalServerError
    })?;
    if existing.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let ssn_encrypted = state.ssn_cipher.encrypt(&payload.ssn).map_err(|e| {
        error!("Failed to encrypt SSN: {}", e);
        ApiError::InternalServerError
    })?;

    let new_user = NewUser {
        email,
        password: payload.password.clone(),
        first_name: payload.first_name.trim().to_string(),
        last_name: payload.last_name.trim().to_string(),
        phone_number: payload.phone_number.trim().to_string(),
        date_of_birth,
        ssn_encrypted,
        address: payload.address.trim().to_string(),
        city: payload.city.trim().to_string(),
        state: payload.state.trim().to_uppercase(),
        zip_code: payload.zip_code.clone(),
    };

    let user = state.user_repository.create(&new_user).await.map_err(|e| {
        error!("Failed to create user: {}", e);
        ApiError::InternalServerError
    })?;

    let (jar, token) = establish_session(&state, jar, user.id).await?;

    let response = AuthResponse {
        user: user.into(),
        token,
    };

    Ok((StatusCode::CREATED, jar, Json(response)))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    validate_email(&payload.email).map_err(ApiError::BadRequest)?;
    let email = normalize_email(&payload.email);

    info!("Login attempt for email: {}", email);

    if !state.rate_limiter.is_allowed(&email).await {
        return Err(ApiError::TooManyRequests);
    }

    let user = state
        .user_repository
        .find_by_email(&email)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid_password = state
        .user_repository
        .verify_password(&user, &payload.password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !valid_password {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    state.rate_limiter.reset(&email).await;

    let (jar, token) = establish_session(&state, jar, user.id).await?;

    let response = AuthResponse {
        user: user.into(),
        token,
    };

    Ok((StatusCode::OK, jar, Json(response)))
}

/// User logout endpoint
///
/// Deletes the session row matching the request's cookie when one exists;
/// the cookie is cleared either way.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<impl IntoResponse> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    let removed = match token {
        Some(token) => state
            .session_repository
            .delete_by_token(&token)
            .await
            .map_err(|e| {
                error!("Failed to delete session: {}", e);
                ApiError::InternalServerError
            })?,
        None => false,
    };

    let jar = jar.remove(expired_session_cookie());

    let message = if removed {
        "Logged out successfully"
    } else {
        "No active session"
    };

    Ok((
        jar,
        Json(serde_json::json!({
            "success": true,
            "message": message,
        })),
    ))
}
