//! Item CRUD under `/api/v1/items/`.

#[cfg(test)]
#[path = "items_test.rs"]
mod items_test;

use super::client::ApiClient;
use super::types::{Item, ItemCreate, ItemUpdate, ItemsPublic, Message};
use super::users::page_window;
use crate::error::StudioError;

pub const ITEMS_PER_PAGE: u32 = 5;

const TITLE_MAX: usize = 255;

impl ApiClient {
    /// One page of the caller's items, 1-based.
    ///
    /// # Errors
    ///
    /// [`StudioError::Unauthenticated`] without a token, API errors otherwise.
    pub async fn list_items(&self, page: u32) -> Result<ItemsPublic, StudioError> {
        let (skip, limit) = page_window(page, ITEMS_PER_PAGE);
        let builder = self
            .authorize_required(self.http.get(self.url("/api/v1/items/")))?
            .query(&[("skip", skip), ("limit", limit)]);
        let mut page: ItemsPublic = self.send_json("list_items", builder).await?;
        page.data.truncate(ITEMS_PER_PAGE as usize);
        Ok(page)
    }

    /// # Errors
    ///
    /// Validation errors for a bad title, API errors otherwise.
    pub async fn create_item(&self, item: &ItemCreate) -> Result<Item, StudioError> {
        validate_title(&item.title)?;
        let builder = self.authorize_required(self.http.post(self.url("/api/v1/items/")).json(item))?;
        self.send_json("create_item", builder).await
    }

    /// # Errors
    ///
    /// Validation errors for a bad title, API errors otherwise.
    pub async fn update_item(&self, id: &str, update: &ItemUpdate) -> Result<Item, StudioError> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        let path = format!("/api/v1/items/{id}");
        let builder = self.authorize_required(self.http.put(self.url(&path)).json(update))?;
        self.send_json("update_item", builder).await
    }

    /// # Errors
    ///
    /// API errors.
    pub async fn delete_item(&self, id: &str) -> Result<Message, StudioError> {
        let path = format!("/api/v1/items/{id}");
        let builder = self.authorize_required(self.http.delete(self.url(&path)))?;
        self.send_json("delete_item", builder).await
    }
}

fn validate_title(title: &str) -> Result<(), StudioError> {
    let len = title.trim().chars().count();
    if len == 0 {
        return Err(StudioError::validation("Title is required"));
    }
    if len > TITLE_MAX {
        return Err(StudioError::validation(format!("Title must be at most {TITLE_MAX} characters")));
    }
    Ok(())
}
