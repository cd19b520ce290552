use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginOutcome;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for registration, login and profile operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Username and email uniqueness are both checked before anything is written.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, password and profile fields
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `PasswordHashing` - Hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a token.
    ///
    /// An unknown username and a wrong password produce the same error.
    ///
    /// # Arguments
    /// * `username` - Username to log in as
    /// * `password` - Plaintext password as submitted
    /// * `now` - Issue time of the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password
    /// * `TokenSigning` - Token could not be signed
    /// * `DatabaseError` - Database operation failed
    async fn login(
        &self,
        username: &Username,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_by_id(&self, id: &UserId) -> Result<User, UserError>;

    /// Apply a partial profile update.
    ///
    /// # Arguments
    /// * `id` - User being updated
    /// * `command` - Only the fields present in the command are changed
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update_profile(
        &self,
        id: &UserId,
        command: UpdateProfileCommand,
    ) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username unique constraint violated
    /// * `EmailAlreadyExists` - Email unique constraint violated
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier (None if not found).
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username (None if not found).
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address (None if not found).
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Update existing user in storage.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `UsernameAlreadyExists` - New username is already taken
    /// * `EmailAlreadyExists` - New email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;
}
