use std::sync::Arc;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::User;
use crate::store::UserStore;

/// Registers accounts and checks login attempts against stored bcrypt hashes.
///
/// Hashing and verification run on the blocking pool, never on a request worker.
#[derive(Clone)]
pub struct CredentialService {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl CredentialService {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Stores a new account. Fails with `Conflict` when the email is taken.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = blocking(move || hash_password(&password, cost)).await?;

        let user = self.users.insert(email, &password_hash).await?;
        log::info!("registered user {}", user.id);
        Ok(user)
    }

    /// Returns the account for `email` if `password` matches its hash.
    ///
    /// Unknown emails and wrong passwords produce the same `Unauthorized` error, and both
    /// pay one bcrypt round at the configured cost.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, AppError> {
        let password = password.to_owned();
        let user = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let cost = self.bcrypt_cost;
                blocking(move || {
                    let _ = hash_password(&password, cost);
                    Ok(())
                })
                .await?;
                return Err(invalid_credentials());
            }
        };

        let stored_hash = user.password_hash.clone();
        let matches = blocking(move || verify_password(&password, &stored_hash)).await?;

        if !matches {
            return Err(invalid_credentials());
        }
        Ok(user)
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".into())
}

async fn blocking<F, T>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Password worker failed: {}", e)))?
}
