//! Order routes: finalize a cart, look bills up.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::{ApiJson, ApiQuery};
use crate::error::ApiError;
use crate::state::AppState;
use tabletop_core::{FinalizeOrderRequest, Order};

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub limit: Option<i64>,
}

pub async fn finalize_order(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<FinalizeOrderRequest>,
) -> Result<(StatusCode, Json<Order>), ApiError> {
    let order = state.finalizer.finalize(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<OrderListQuery>,
) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.finalizer.list_recent(query.limit).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.finalizer.get_order(&id).await?))
}

pub async fn get_by_bill(
    State(state): State<AppState>,
    Path(bill_number): Path<String>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.finalizer.get_by_bill_number(&bill_number).await?))
}
