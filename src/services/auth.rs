//! Local accounts and opaque session tokens.
//!
//! Passwords are stored as Argon2id PHC strings. Session tokens are 32 random
//! bytes, base64url encoded; only their SHA-256 digest reaches the database.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::{engine::general_purpose, Engine as _};
use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sea_orm::{ConnectionTrait, DatabaseConnection, Set, TransactionTrait};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::db::entities::{music_manager_user, session, user};
use crate::db::enums::Role;
use crate::db::repositories::{SessionRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::permissions::Actor;

/// The authenticated identity behind a request, before its profile is loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub username: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("Stored password hash is invalid: {}", e)))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AppError::Internal(format!("Password verification failed: {}", e))),
    }
}

pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

pub struct AuthService<'a> {
    db: &'a DatabaseConnection,
    session_ttl: Duration,
}

impl<'a> AuthService<'a> {
    pub fn new(db: &'a DatabaseConnection, session_ttl_hours: i64) -> Self {
        Self {
            db,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    /// Check credentials and open a new session.
    pub async fn login(&self, username: &str, password: &str) -> Result<(Principal, IssuedSession)> {
        let users = UserRepository::new(self.db);
        let user = users.find_by_username(username.trim()).await?;

        let user = match user {
            Some(user) if verify_password(password, &user.password_hash)? => user,
            _ => {
                tracing::warn!(username, "Rejected login attempt");
                return Err(AppError::Authentication(
                    "Invalid username or password".to_string(),
                ));
            }
        };

        let sessions = SessionRepository::new(self.db);
        let now = Utc::now();
        let purged = sessions.purge_expired(now.into()).await?;
        if purged > 0 {
            tracing::debug!(purged, "Purged expired sessions");
        }

        let token = generate_token();
        let expires_at = now + self.session_ttl;
        sessions
            .create(session::ActiveModel {
                token_hash: Set(hash_token(&token)),
                user_id: Set(user.id),
                expires_at: Set(expires_at.into()),
                created_at: Set(now.into()),
                ..Default::default()
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "User logged in");

        Ok((
            Principal {
                user_id: user.id,
                username: user.username,
            },
            IssuedSession { token, expires_at },
        ))
    }

    pub async fn logout(&self, token: &str) -> Result<()> {
        let removed = SessionRepository::new(self.db)
            .delete_by_token_hash(&hash_token(token))
            .await?;
        tracing::info!(removed, "Session closed");
        Ok(())
    }

    /// Principal owning an unexpired session token, if any.
    pub async fn principal_for_token(&self, token: &str) -> Result<Option<Principal>> {
        let session = SessionRepository::new(self.db)
            .find_active(&hash_token(token), Utc::now().into())
            .await?;

        let Some(session) = session else {
            return Ok(None);
        };

        Ok(UserRepository::new(self.db)
            .find_by_id(session.user_id)
            .await?
            .map(|user| Principal {
                user_id: user.id,
                username: user.username,
            }))
    }

    /// Create a principal and its profile in one transaction.
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<(user::Model, music_manager_user::Model)> {
        let password_hash = hash_password(password)?;
        let txn = self.db.begin().await?;

        let users = UserRepository::new(&txn);
        let user = users
            .create(user::ActiveModel {
                username: Set(username.to_string()),
                password_hash: Set(password_hash),
                created_at: Set(Utc::now().into()),
                ..Default::default()
            })
            .await?;
        let profile = users
            .create_profile(music_manager_user::ActiveModel {
                user_id: Set(user.id),
                display_name: Set(display_name.to_string()),
                role: Set(role),
                ..Default::default()
            })
            .await?;

        txn.commit().await?;
        tracing::info!(user_id = user.id, username, role = role.code(), "Created user");
        Ok((user, profile))
    }
}

/// Attach the profile extension to a principal.
///
/// Anonymous stays anonymous. An authenticated principal without a profile is a
/// data-integrity fault and is reported as such rather than treated as a deny.
pub async fn resolve_actor<C: ConnectionTrait>(
    db: &C,
    principal: Option<&Principal>,
) -> Result<Option<Actor>> {
    let Some(principal) = principal else {
        return Ok(None);
    };

    let profile = UserRepository::new(db)
        .find_profile(principal.user_id)
        .await?
        .ok_or(AppError::MissingProfile {
            user_id: principal.user_id,
        })?;

    Ok(Some(Actor {
        user_id: principal.user_id,
        username: principal.username.clone(),
        display_name: profile.display_name,
        role: profile.role,
    }))
}
