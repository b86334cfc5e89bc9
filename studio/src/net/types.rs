//! Wire types exchanged with the Molbert API.

use serde::{Deserialize, Serialize};

/// Body of every image operation; only the link is consumed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileResult {
    #[serde(default)]
    pub file_url: Option<String>,
}

/// One row of the generation history panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationEntry {
    pub id: String,
    pub mode: String,
    pub prompt: String,
    pub file_url: String,
    pub created_at: String,
}

/// Plan and quota snapshot for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageInfo {
    pub plan: String,
    pub credits_balance: i64,
    pub free_daily_limit: i64,
    pub free_daily_used: i64,
    pub free_daily_remaining: i64,
    pub rate_limit_per_minute: i64,
    pub used_last_minute: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_superuser: bool,
    #[serde(default = "default_plan")]
    pub plan: String,
    #[serde(default)]
    pub credits_balance: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UsersPublic {
    pub data: Vec<UserPublic>,
    pub count: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

/// Generic `{ "message": ... }` acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRegister {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UserUpdateMe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdatePassword {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPassword {
    pub token: String,
    pub new_password: String,
}

/// Fields an administrator may change on another account.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AdminUserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_balance: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_superuser: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub owner_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ItemsPublic {
    pub data: Vec<Item>,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub plan: String,
}

/// Hosted checkout the user is sent to after an upgrade request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentResponse {
    pub confirmation_url: String,
    pub payment_id: String,
}

fn default_true() -> bool {
    true
}

fn default_plan() -> String {
    "free".to_owned()
}

fn default_token_type() -> String {
    "bearer".to_owned()
}
