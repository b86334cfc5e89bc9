//! Settings page: profile form, password form and the usage snapshot.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use crate::error::StudioError;
use crate::net::client::ApiClient;
use crate::net::types::{PaymentResponse, UpdatePassword, UsageInfo, UserPublic, UserUpdateMe};

#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    pub user: Option<UserPublic>,
    pub usage: Option<UsageInfo>,
    pub full_name: String,
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
    pub profile_status: Option<String>,
    pub password_status: Option<String>,
}

impl SettingsState {
    /// Fetch the user, seed the profile form from it, then fetch usage.
    ///
    /// # Errors
    ///
    /// Errors from either call; a usage failure leaves `usage` empty.
    pub async fn load(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        let user = client.current_user().await?;
        self.full_name = user.full_name.clone().unwrap_or_default();
        self.email = user.email.clone();
        self.user = Some(user);
        self.usage = None;
        self.usage = Some(client.usage().await?);
        Ok(())
    }

    /// Send only the profile fields that differ from the loaded user.
    ///
    /// # Errors
    ///
    /// Validation or API errors; `profile_status` reflects the outcome.
    pub async fn save_profile(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        let update = self.profile_changes();
        if update.full_name.is_none() && update.email.is_none() {
            self.profile_status = Some("Nothing to update".to_owned());
            return Ok(());
        }
        match client.update_me(&update).await {
            Ok(user) => {
                self.user = Some(user);
                self.profile_status = Some("Profile updated".to_owned());
                Ok(())
            }
            Err(e) => {
                self.profile_status = Some(failure("Failed to update profile", &e));
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Validation or API errors; `password_status` reflects the outcome.
    pub async fn change_password(&mut self, client: &ApiClient) -> Result<(), StudioError> {
        let change = UpdatePassword {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        };
        match client.update_password(&change, &self.confirm_password).await {
            Ok(_) => {
                self.current_password.clear();
                self.new_password.clear();
                self.confirm_password.clear();
                self.password_status = Some("Password updated".to_owned());
                Ok(())
            }
            Err(e) => {
                self.password_status = Some(failure("Failed to update password", &e));
                Err(e)
            }
        }
    }

    /// Start a plan upgrade and return the checkout to open.
    ///
    /// # Errors
    ///
    /// Validation or API errors from billing.
    pub async fn upgrade(&self, client: &ApiClient, plan: &str) -> Result<PaymentResponse, StudioError> {
        client.create_payment(plan).await
    }

    /// Diff of the form against the loaded user.
    #[must_use]
    pub fn profile_changes(&self) -> UserUpdateMe {
        let current_name = self.user.as_ref().and_then(|u| u.full_name.as_deref()).unwrap_or_default();
        let current_email = self.user.as_ref().map(|u| u.email.as_str()).unwrap_or_default();
        let name = self.full_name.trim();
        let email = self.email.trim();
        UserUpdateMe {
            full_name: (name != current_name).then(|| name.to_owned()),
            email: (!email.is_empty() && email != current_email).then(|| email.to_owned()),
        }
    }
}

/// Share of the free daily quota already used, `0..=100`.
#[must_use]
pub fn daily_used_percent(usage: &UsageInfo) -> u8 {
    if usage.free_daily_limit <= 0 {
        return 0;
    }
    let used = usage.free_daily_used.clamp(0, usage.free_daily_limit);
    u8::try_from(used * 100 / usage.free_daily_limit).unwrap_or(100)
}

/// Whether the next generation would be refused for quota reasons.
#[must_use]
pub fn is_quota_exhausted(usage: &UsageInfo) -> bool {
    let daily_blocked = usage.free_daily_remaining <= 0 && usage.credits_balance <= 0;
    let rate_blocked = usage.rate_limit_per_minute > 0 && usage.used_last_minute >= usage.rate_limit_per_minute;
    daily_blocked || rate_blocked
}

fn failure(prefix: &str, err: &StudioError) -> String {
    if err.is_validation() {
        err.display_message()
    } else {
        format!("{prefix}: {}", err.display_message())
    }
}
