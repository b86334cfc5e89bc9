//! Route table, auth gate and credential validation.
//!
//! DESIGN
//! ======
//! The gate is a pure function of the requested route and whether a token
//! is stored: protected pages bounce to `/login` without a token, and the
//! public auth pages bounce to `/` when one exists. The admin page
//! additionally requires a superuser, which needs the current user and is
//! checked separately by [`guard_with_user`].

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::fmt;
use std::str::FromStr;

use crate::error::StudioError;
use crate::net::types::UserPublic;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Every page the studio frontend knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Signup,
    RecoverPassword,
    ResetPassword,
    Home,
    Items,
    Settings,
    Studio,
    Admin,
}

impl Route {
    pub const ALL: [Route; 9] = [
        Route::Login,
        Route::Signup,
        Route::RecoverPassword,
        Route::ResetPassword,
        Route::Home,
        Route::Items,
        Route::Settings,
        Route::Studio,
        Route::Admin,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Signup => "/signup",
            Self::RecoverPassword => "/recover-password",
            Self::ResetPassword => "/reset-password",
            Self::Home => "/",
            Self::Items => "/items",
            Self::Settings => "/settings",
            Self::Studio => "/studio",
            Self::Admin => "/admin",
        }
    }

    /// Auth pages reachable without a token.
    #[must_use]
    pub fn is_public(self) -> bool {
        matches!(self, Self::Login | Self::Signup | Self::RecoverPassword | Self::ResetPassword)
    }

    #[must_use]
    pub fn requires_superuser(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl FromStr for Route {
    type Err = StudioError;

    /// Parses a path, ignoring any query string and a trailing slash.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        let path = if path.is_empty() { "/" } else { path };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .ok_or_else(|| StudioError::validation(format!("unknown route: {raw}")))
    }
}

/// Outcome of the gate for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Token-only gate evaluated before a page loads.
#[must_use]
pub fn guard(route: Route, logged_in: bool) -> RouteDecision {
    match (route.is_public(), logged_in) {
        (false, false) => RouteDecision::Redirect(Route::Login),
        (true, true) => RouteDecision::Redirect(Route::Home),
        _ => RouteDecision::Allow,
    }
}

/// Full gate once the current user is known; non-superusers are sent home
/// from the admin page.
#[must_use]
pub fn guard_with_user(route: Route, user: Option<&UserPublic>) -> RouteDecision {
    match guard(route, user.is_some()) {
        RouteDecision::Allow if route.requires_superuser() && !user.is_some_and(|u| u.is_superuser) => {
            RouteDecision::Redirect(Route::Home)
        }
        decision => decision,
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// Check the `local@domain.tld` shape the signup and login forms accept.
///
/// # Errors
///
/// Returns [`StudioError::Validation`] with `Invalid email`.
pub fn validate_email(email: &str) -> Result<(), StudioError> {
    if is_valid_email(email.trim()) {
        Ok(())
    } else {
        Err(StudioError::validation("Invalid email"))
    }
}

/// # Errors
///
/// Returns [`StudioError::Validation`] when empty or shorter than
/// [`MIN_PASSWORD_LEN`] characters.
pub fn validate_password(password: &str) -> Result<(), StudioError> {
    if password.is_empty() {
        return Err(StudioError::validation("Password is required"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(StudioError::validation(format!("Minimum {MIN_PASSWORD_LEN} characters")));
    }
    Ok(())
}

/// # Errors
///
/// Fails when the two entries differ.
pub fn validate_confirmation(password: &str, confirm: &str) -> Result<(), StudioError> {
    if password == confirm {
        Ok(())
    } else {
        Err(StudioError::validation("The passwords do not match"))
    }
}

const FORBIDDEN: &[char] = &['<', '>', '(', ')', '[', ']', '\\', ',', ';', ':', '"', '@'];

fn is_atom(part: &str) -> bool {
    !part.is_empty() && !part.chars().any(|c| c.is_whitespace() || c == '.' || FORBIDDEN.contains(&c))
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let local_ok = if local.len() >= 3 && local.starts_with('"') && local.ends_with('"') {
        true
    } else {
        local.split('.').all(is_atom)
    };
    let labels: Vec<&str> = domain.split('.').collect();
    let domain_ok = labels.len() >= 2
        && labels.iter().all(|label| is_atom(label))
        && labels.last().is_some_and(|tld| tld.chars().count() >= 2);
    local_ok && domain_ok
}
