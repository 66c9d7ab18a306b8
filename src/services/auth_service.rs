use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use password_hash::rand_core::OsRng;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::auth::{LoginRequest, RegisterForm, UserList},
    error::{AppError, AppResult},
    models::User,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct UserCredentials {
    id: Uuid,
    name: String,
    email: String,
    photo: Option<String>,
    created_at: DateTime<Utc>,
    password_hash: String,
}

impl From<UserCredentials> for User {
    fn from(row: UserCredentials) -> Self {
        User {
            id: row.id,
            name: row.name,
            email: row.email,
            photo: row.photo,
            created_at: row.created_at,
        }
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

pub fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn register_user(
    state: &AppState,
    payload: RegisterForm,
) -> AppResult<ApiResponse<User>> {
    let RegisterForm {
        name,
        email,
        password,
        photo,
    } = payload;
    let password_hash = hash_password(&password)?;

    let user: User = sqlx::query_as(
        r#"
        INSERT INTO users (id, name, email, password_hash, photo)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, email, photo, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(email.as_str())
    .bind(password_hash)
    .bind(photo)
    .fetch_one(&state.pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return AppError::Conflict("Email is already taken".to_string());
        }
        AppError::DbError(e)
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok(ApiResponse::success("User created", user, Some(Meta::empty())))
}

pub async fn list_users(state: &AppState) -> AppResult<ApiResponse<UserList>> {
    let users: Vec<User> = sqlx::query_as(
        "SELECT id, name, email, photo, created_at FROM users ORDER BY created_at, email",
    )
    .fetch_all(&state.pool)
    .await?;

    let meta = Meta::total(users.len());
    Ok(ApiResponse::success("Users", UserList { items: users }, Some(meta)))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<User>> {
    let LoginRequest { email, password } = payload;
    if email.trim().is_empty() || password.is_empty() {
        return Err(AppError::bad_request("email and password are required"));
    }

    let row: Option<UserCredentials> = sqlx::query_as(
        "SELECT id, name, email, photo, created_at, password_hash FROM users WHERE email = $1",
    )
    .bind(email.trim())
    .fetch_optional(&state.pool)
    .await?;

    let row = match row {
        Some(u) => u,
        None => return Err(AppError::Unauthorized),
    };

    if !verify_password(&password, &row.password_hash)? {
        tracing::debug!(user_id = %row.id, "login rejected");
        return Err(AppError::Unauthorized);
    }

    let user = User::from(row);
    tracing::info!(user_id = %user.id, "user logged in");
    Ok(ApiResponse::success("Logged in", user, Some(Meta::empty())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_passwords_verify_only_against_the_original() {
        let hash = hash_password("hunter2").expect("hash");
        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("hunter2", &hash).expect("verify"));
        assert!(!verify_password("hunter3", &hash).expect("verify"));
    }

    #[test]
    fn garbage_hash_is_an_internal_error() {
        assert!(matches!(
            verify_password("x", "plaintext"),
            Err(AppError::Internal(_))
        ));
    }
}
