use std::sync::LazyLock;

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;
use regex::Regex;

use crate::{
    dto::auth::{LoginRequest, ProfileUpdate, RegisterRequest},
    error::{AppError, AppResult},
    models::{Session, User},
    store::{CURRENT_USER_KEY, SharedStore, read_json, save_json, user_key},
};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Email-keyed user records plus the session pointer of the signed-in user.
#[derive(Clone)]
pub struct AuthService {
    store: SharedStore,
}

impl AuthService {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    pub fn register(&self, payload: RegisterRequest) -> AppResult<User> {
        let name = payload.name.trim();
        let email = payload.email.trim();
        let address = payload.address.trim();
        let password = payload.password;

        if name.is_empty() || email.is_empty() || password.is_empty() || address.is_empty() {
            return Err(AppError::bad_request("All fields are required"));
        }
        if !is_valid_email(email) {
            return Err(AppError::bad_request("Invalid email address"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::bad_request(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.find_user(email)?.is_some() {
            return Err(AppError::bad_request("Email is already taken"));
        }

        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
            .to_string();

        let user = User {
            name: name.to_string(),
            email: email.to_string(),
            password_hash,
            address: address.to_string(),
            phone: String::new(),
            created_at: Utc::now(),
        };
        self.save_user(&user)?;
        self.start_session(&user.email)?;

        tracing::info!(email = %user.email, "user registered");
        Ok(user)
    }

    pub fn login(&self, payload: LoginRequest) -> AppResult<User> {
        let email = payload.email.trim();
        if email.is_empty() || payload.password.is_empty() {
            return Err(AppError::bad_request("All fields are required"));
        }

        let user = match self.find_user(email)? {
            Some(u) => u,
            None => return Err(AppError::bad_request("User not found")),
        };

        let parsed_hash = PasswordHash::new(&user.password_hash)
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

        if Argon2::default()
            .verify_password(payload.password.as_bytes(), &parsed_hash)
            .is_err()
        {
            return Err(AppError::bad_request("Wrong password"));
        }

        self.start_session(&user.email)?;
        tracing::info!(email = %user.email, "user logged in");
        Ok(user)
    }

    pub fn logout(&self) -> AppResult<()> {
        self.store.remove(CURRENT_USER_KEY)?;
        Ok(())
    }

    pub fn session(&self) -> AppResult<Option<Session>> {
        Ok(read_json(&*self.store, CURRENT_USER_KEY)?)
    }

    /// The signed-in user, if the session points at an existing record.
    pub fn current_user(&self) -> AppResult<Option<User>> {
        match self.session()? {
            Some(session) => self.find_user(&session.email),
            None => Ok(None),
        }
    }

    pub fn require_user(&self) -> AppResult<User> {
        self.current_user()?.ok_or(AppError::Unauthorized)
    }

    pub fn update_profile(&self, payload: ProfileUpdate) -> AppResult<User> {
        let mut user = self.require_user()?;

        let name = payload.name.trim();
        if name.is_empty() {
            return Err(AppError::bad_request("Name is required"));
        }
        user.name = name.to_string();
        user.phone = payload.phone.trim().to_string();
        user.address = payload.address.trim().to_string();

        self.save_user(&user)?;
        Ok(user)
    }

    pub fn find_user(&self, email: &str) -> AppResult<Option<User>> {
        Ok(read_json(&*self.store, &user_key(email))?)
    }

    pub(crate) fn save_user(&self, user: &User) -> AppResult<()> {
        save_json(&*self.store, &user_key(&user.email), user)?;
        Ok(())
    }

    fn start_session(&self, email: &str) -> AppResult<()> {
        let session = Session {
            email: email.to_string(),
            signed_in_at: Utc::now(),
        };
        save_json(&*self.store, CURRENT_USER_KEY, &session)?;
        Ok(())
    }
}
