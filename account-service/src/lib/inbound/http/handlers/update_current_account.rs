use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

use super::AccountData;
use super::ApiError;
use super::ApiSuccess;
use crate::account::errors::AccountError;
use crate::account::models::AccountUpdate;
use crate::account::models::EmailAddress;
use crate::account::models::Password;
use crate::account::models::UpdateAccountCommand;
use crate::inbound::http::middleware::CurrentIdentity;
use crate::inbound::http::router::AppState;

/// HTTP request body for updating the current account (raw JSON)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl UpdateAccountRequest {
    fn try_into_command(self) -> Result<UpdateAccountCommand, AccountError> {
        // Blank fields mean "leave unchanged".
        let email = self
            .email
            .filter(|email| !email.trim().is_empty())
            .map(EmailAddress::new)
            .transpose()?;

        let password = self
            .password
            .filter(|password| !password.trim().is_empty())
            .map(Password::new)
            .transpose()?;

        Ok(UpdateAccountCommand { email, password })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateAccountResponseData {
    #[serde(flatten)]
    pub account: AccountData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<AccountUpdate> for UpdateAccountResponseData {
    fn from(update: AccountUpdate) -> Self {
        Self {
            account: (&update.account).into(),
            token: update.token,
        }
    }
}

pub async fn update_current_account(
    State(state): State<AppState>,
    CurrentIdentity(identity): CurrentIdentity,
    Json(req): Json<UpdateAccountRequest>,
) -> Result<ApiSuccess<UpdateAccountResponseData>, ApiError> {
    let command = req.try_into_command()?;

    state
        .account_service
        .update_current_account(&identity, command)
        .await
        .map_err(ApiError::from)
        .map(|update| ApiSuccess::new(StatusCode::OK, update.into()))
}
