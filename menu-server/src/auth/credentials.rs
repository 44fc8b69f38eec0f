//! Administrator credentials
//!
//! 单一管理员账号，启动时对配置中的密码做 argon2 哈希，明文不常驻内存

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::utils::AppError;

#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AdminCredentials {
    pub fn new(username: &str, password: &str) -> Result<Self, AppError> {
        Ok(Self {
            username: username.to_string(),
            password_hash: hash_password(password)?,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Check a login attempt. The hash is verified even for a wrong username.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let password_ok = verify_password(&self.password_hash, password);
        password_ok && username == self.username
    }
}

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))
}

pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Stored admin password hash is malformed");
            false
        }
    }
}
