//! Account flows: login, signup, password recovery, profile and admin.

#[cfg(test)]
#[path = "users_test.rs"]
mod users_test;

use super::client::ApiClient;
use super::types::{
    AccessToken, AdminUserUpdate, Message, NewPassword, UpdatePassword, UsageInfo, UserPublic, UserRegister,
    UserUpdateMe, UsersPublic,
};
use crate::auth::{validate_confirmation, validate_email, validate_password};
use crate::error::StudioError;

/// Rows per page on the admin user list.
pub const USERS_PER_PAGE: u32 = 5;

impl ApiClient {
    /// Exchange credentials for a token and persist it.
    ///
    /// # Errors
    ///
    /// Validation errors for malformed input; API errors for bad credentials.
    pub async fn login(&self, email: &str, password: &str) -> Result<UserPublic, StudioError> {
        validate_email(email)?;
        validate_password(password)?;
        let builder = self
            .http
            .post(self.url("/api/v1/login/access-token"))
            .form(&[("username", email.trim()), ("password", password)]);
        let token: AccessToken = self.send_json("login", builder).await?;
        self.tokens().save(&token.access_token)?;
        let user = self.current_user().await?;
        tracing::info!(email = %user.email, "logged in");
        Ok(user)
    }

    /// Forget the stored token. No server call is made.
    ///
    /// # Errors
    ///
    /// Fails only when the token file cannot be rewritten.
    pub fn logout(&self) -> Result<(), StudioError> {
        self.tokens().clear()?;
        tracing::info!("logged out");
        Ok(())
    }

    /// # Errors
    ///
    /// Validation errors before dispatch, API errors after.
    pub async fn signup(&self, register: &UserRegister, confirm_password: &str) -> Result<UserPublic, StudioError> {
        validate_email(&register.email)?;
        validate_password(&register.password)?;
        validate_confirmation(&register.password, confirm_password)?;
        let builder = self.http.post(self.url("/api/v1/users/signup")).json(register);
        self.send_json("signup", builder).await
    }

    /// Ask the backend to mail a reset link.
    ///
    /// # Errors
    ///
    /// Validation errors before dispatch, API errors after.
    pub async fn recover_password(&self, email: &str) -> Result<Message, StudioError> {
        validate_email(email)?;
        let path = format!("/api/v1/password-recovery/{}", urlencoding::encode(email.trim()));
        let builder = self.http.post(self.url(&path));
        self.send_json("recover_password", builder).await
    }

    /// Set a new password using the token from the reset link.
    ///
    /// # Errors
    ///
    /// Validation errors before dispatch, API errors after.
    pub async fn reset_password(&self, token: &str, new_password: &str, confirm: &str) -> Result<Message, StudioError> {
        if token.trim().is_empty() {
            return Err(StudioError::validation("Reset token is missing"));
        }
        validate_password(new_password)?;
        validate_confirmation(new_password, confirm)?;
        let body = NewPassword { token: token.trim().to_owned(), new_password: new_password.to_owned() };
        let builder = self.http.post(self.url("/api/v1/reset-password/")).json(&body);
        self.send_json("reset_password", builder).await
    }

    /// # Errors
    ///
    /// [`StudioError::Unauthenticated`] without a token, API errors otherwise.
    pub async fn current_user(&self) -> Result<UserPublic, StudioError> {
        let builder = self.authorize_required(self.http.get(self.url("/api/v1/users/me")))?;
        self.send_json("current_user", builder).await
    }

    /// # Errors
    ///
    /// [`StudioError::Unauthenticated`] without a token, API errors otherwise.
    pub async fn usage(&self) -> Result<UsageInfo, StudioError> {
        let builder = self.authorize_required(self.http.get(self.url("/api/v1/users/me/usage")))?;
        self.send_json("usage", builder).await
    }

    /// # Errors
    ///
    /// Validation errors for a malformed email, API errors otherwise.
    pub async fn update_me(&self, update: &UserUpdateMe) -> Result<UserPublic, StudioError> {
        if let Some(email) = &update.email {
            validate_email(email)?;
        }
        let builder = self.authorize_required(self.http.patch(self.url("/api/v1/users/me")).json(update))?;
        self.send_json("update_me", builder).await
    }

    /// # Errors
    ///
    /// Validation errors before dispatch, API errors after.
    pub async fn update_password(&self, change: &UpdatePassword, confirm: &str) -> Result<Message, StudioError> {
        validate_password(&change.new_password)?;
        validate_confirmation(&change.new_password, confirm)?;
        if change.current_password == change.new_password {
            return Err(StudioError::validation("New password must differ from the current one"));
        }
        let builder =
            self.authorize_required(self.http.patch(self.url("/api/v1/users/me/password")).json(change))?;
        self.send_json("update_password", builder).await
    }

    /// One page of users, 1-based.
    ///
    /// # Errors
    ///
    /// API errors; non-superusers get a 403 from the backend.
    pub async fn list_users(&self, page: u32) -> Result<UsersPublic, StudioError> {
        let (skip, limit) = page_window(page, USERS_PER_PAGE);
        let builder = self
            .authorize_required(self.http.get(self.url("/api/v1/users/")))?
            .query(&[("skip", skip), ("limit", limit)]);
        self.send_json("list_users", builder).await
    }

    /// # Errors
    ///
    /// API errors.
    pub async fn admin_update_user(&self, user_id: &str, update: &AdminUserUpdate) -> Result<UserPublic, StudioError> {
        if update.credits_balance.is_some_and(|credits| credits < 0) {
            return Err(StudioError::validation("Credits cannot be negative"));
        }
        let path = format!("/api/v1/users/{user_id}");
        let builder = self.authorize_required(self.http.patch(self.url(&path)).json(update))?;
        self.send_json("admin_update_user", builder).await
    }

    /// Delete another account. Administrators cannot delete themselves.
    ///
    /// # Errors
    ///
    /// Validation error for self-deletion, API errors otherwise.
    pub async fn admin_delete_user(&self, acting: &UserPublic, user_id: &str) -> Result<Message, StudioError> {
        if acting.id == user_id {
            return Err(StudioError::validation("You cannot delete your own account here"));
        }
        let path = format!("/api/v1/users/{user_id}");
        let builder = self.authorize_required(self.http.delete(self.url(&path)))?;
        self.send_json("admin_delete_user", builder).await
    }
}

/// `(skip, limit)` for a 1-based page; page 0 is treated as page 1.
#[must_use]
pub fn page_window(page: u32, per_page: u32) -> (u32, u32) {
    (page.max(1).saturating_sub(1).saturating_mul(per_page), per_page)
}

/// Whether a "next page" exists after `page` given `count` total rows.
#[must_use]
pub fn has_next_page(page: u32, per_page: u32, count: u64) -> bool {
    u64::from(page.max(1)) * u64::from(per_page) < count
}
