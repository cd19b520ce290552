use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service for registration, login and profile management.
///
/// Argon2 work runs on the blocking pool so a slow hash never holds up the
/// async workers serving other requests.
pub struct AuthenticationService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthenticationService<UR>
where
    UR: UserRepository,
{
    /// Create a new authentication service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Password hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.expose()))
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
            .map_err(|e| UserError::PasswordHashing(e.to_string()))
    }

    async fn ensure_username_available(&self, username: &Username) -> Result<(), UserError> {
        if self.repository.exists_by_username(username).await? {
            return Err(UserError::UsernameAlreadyExists(username.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthenticationService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        self.ensure_username_available(&command.username).await?;

        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::EmailAlreadyExists(command.email.to_string()));
        }

        let password_hash = self.hash_password(command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            display_name: command.display_name,
            password_hash,
            created_at: now,
            updated_at: now,
        };

        // The unique constraints still guard against a concurrent registration.
        let created_user = self.repository.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(
        &self,
        username: &Username,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, UserError> {
        let Some(user) = self.repository.find_by_username(username).await? else {
            tracing::debug!(username = %username, "Login for unknown username");
            // Pay for a full verification so timing does not reveal the miss.
            let authenticator = Arc::clone(&self.authenticator);
            let password = password.to_string();
            tokio::task::spawn_blocking(move || authenticator.reject_unknown_user(&password))
                .await
                .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?;
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let stored_hash = user.password_hash.clone();
        let subject = user.id.to_string();
        let login_name = user.username.as_str().to_string();

        let token = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&password, &stored_hash, &subject, &login_name, now)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Verification task failed: {}", e)))?
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %user.id, "Login with wrong password");
                UserError::InvalidCredentials
            }
            AuthenticationError::Token(err) => UserError::TokenSigning(err.to_string()),
        })?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome { token, user })
    }

    async fn get_by_id(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))?;

        if let Some(new_username) = command.username {
            if new_username != user.username {
                self.ensure_username_available(&new_username).await?;
                user.username = new_username;
            }
        }

        if let Some(new_email) = command.email {
            if new_email != user.email {
                if self.repository.exists_by_email(&new_email).await? {
                    return Err(UserError::EmailAlreadyExists(new_email.to_string()));
                }
                user.email = new_email;
            }
        }

        user.display_name = command.display_name.apply(user.display_name);

        if let Some(new_password) = command.password {
            user.password_hash = self.hash_password(new_password).await?;
        }

        user.updated_at = Utc::now();

        self.repository.update(user).await
    }
}
