//! # Menu Routes
//!
//! Catalog management for the staff screens. Responses use
//! [`MenuItemDto`], which flattens the item status into the two flags the
//! menu UI renders.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiJson, ApiQuery};
use crate::error::ApiError;
use crate::state::AppState;
use tabletop_core::{MenuItem, MenuItemPatch, Money, NewMenuItem};

/// Menu item as the UI sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDto {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub category: String,
    pub is_available: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MenuItem> for MenuItemDto {
    fn from(item: MenuItem) -> Self {
        MenuItemDto {
            is_available: item.is_available(),
            is_deleted: item.is_deleted(),
            id: item.id,
            name: item.name,
            price: item.price,
            category: item.category,
            created_at: item.created_at,
            updated_at: item.updated_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<MenuQuery>,
) -> Result<Json<Vec<MenuItemDto>>, ApiError> {
    let items = state.catalog.list(query.category.as_deref()).await?;
    Ok(Json(items.into_iter().map(MenuItemDto::from).collect()))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    Ok(Json(state.catalog.categories().await?))
}

pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItemDto>, ApiError> {
    Ok(Json(state.catalog.get(&id).await?.into()))
}

pub async fn create_item(
    State(state): State<AppState>,
    ApiJson(new_item): ApiJson<NewMenuItem>,
) -> Result<(StatusCode, Json<MenuItemDto>), ApiError> {
    let item = state.catalog.create(new_item).await?;
    Ok((StatusCode::CREATED, Json(item.into())))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<MenuItemPatch>,
) -> Result<Json<MenuItemDto>, ApiError> {
    Ok(Json(state.catalog.update(&id, patch).await?.into()))
}

pub async fn toggle_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MenuItemDto>, ApiError> {
    Ok(Json(state.catalog.toggle_availability(&id).await?.into()))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.soft_delete(&id).await?;
    Ok(Json(MessageResponse {
        message: "Item deleted successfully (soft delete)",
    }))
}
