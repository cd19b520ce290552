use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Deserialize;

use super::deserialize_present;
use super::ApiError;
use super::ApiSuccess;
use super::JsonBody;
use super::UserData;
use crate::domain::field_update::FieldUpdate;
use crate::domain::user::models::DisplayName;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::UpdateProfileCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// HTTP request body for a partial profile update (raw JSON)
///
/// Every key may be omitted. `display_name: null` clears the display name;
/// `null` on any other field is rejected.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "deserialize_present")]
    pub username: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub password: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub display_name: Option<Option<String>>,
}

fn required(field: &str, value: Option<Option<String>>) -> Result<Option<String>, UserError> {
    match value {
        Some(None) => Err(UserError::InvalidUpdate(format!("{} cannot be null", field))),
        Some(Some(v)) => Ok(Some(v)),
        None => Ok(None),
    }
}

impl UpdateProfileRequest {
    fn try_into_command(self) -> Result<UpdateProfileCommand, UserError> {
        let username = required("username", self.username)?
            .map(Username::new)
            .transpose()?;
        let email = required("email", self.email)?
            .map(EmailAddress::new)
            .transpose()?;
        let password = required("password", self.password)?
            .map(Password::new)
            .transpose()?;
        let display_name =
            FieldUpdate::from_present(self.display_name).try_map(DisplayName::new)?;

        Ok(UpdateProfileCommand {
            username,
            email,
            password,
            display_name,
        })
    }
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<AuthenticatedUser>,
    JsonBody(req): JsonBody<UpdateProfileRequest>,
) -> Result<ApiSuccess<UserData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .auth_service
        .update_profile(&principal.user_id, command)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, "Profile updated", user.into()))
}
