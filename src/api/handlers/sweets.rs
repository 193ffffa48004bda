use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::inventory_error;
use crate::api::middleware::{CurrentIdentity, RequireIdentity};
use crate::api::response::{ApiError, AppJson, AppPath, AppQuery, JSend};
use crate::inventory::{self, SearchFilter};
use crate::storage::models::{Sweet, SweetData};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

/// Body for creating or fully replacing a sweet
#[derive(Debug, Deserialize, Serialize)]
pub struct SweetRequest {
    pub category: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default)]
    pub quantity: u32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SweetResponse {
    pub category: String,
    pub id: u64,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct RestockParams {
    pub qty: i64,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn create_sweet(
    State(state): State<Arc<AppState>>,
    RequireIdentity(identity): RequireIdentity,
    AppJson(req): AppJson<SweetRequest>,
) -> Result<Json<JSend<SweetResponse>>, ApiError> {
    let sweet = inventory::add(&state.db, req.into()).map_err(inventory_error)?;
    tracing::info!(id = sweet.id, username = %identity.username, "Sweet created");
    Ok(JSend::success(sweet.into()))
}

pub async fn list_sweets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<JSend<Vec<SweetResponse>>>, ApiError> {
    let sweets = inventory::get_all(&state.db).map_err(inventory_error)?;
    Ok(JSend::success(to_responses(sweets)))
}

pub async fn search_sweets(
    State(state): State<Arc<AppState>>,
    AppQuery(filter): AppQuery<SearchFilter>,
) -> Result<Json<JSend<Vec<SweetResponse>>>, ApiError> {
    let sweets = inventory::search(&state.db, &filter).map_err(inventory_error)?;
    Ok(JSend::success(to_responses(sweets)))
}

pub async fn get_sweet(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<JSend<SweetResponse>>, ApiError> {
    let sweet = inventory::get(&state.db, id).map_err(inventory_error)?;
    Ok(JSend::success(sweet.into()))
}

pub async fn update_sweet(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
    AppJson(req): AppJson<SweetRequest>,
) -> Result<Json<JSend<SweetResponse>>, ApiError> {
    let sweet = inventory::update(&state.db, id, req.into()).map_err(inventory_error)?;
    Ok(JSend::success(sweet.into()))
}

pub async fn delete_sweet(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
) -> Result<Json<JSend<()>>, ApiError> {
    inventory::delete(&state.db, id).map_err(inventory_error)?;
    Ok(JSend::success(()))
}

pub async fn purchase_sweet(
    State(state): State<Arc<AppState>>,
    CurrentIdentity(identity): CurrentIdentity,
    AppPath(id): AppPath<u64>,
) -> Result<Json<JSend<SweetResponse>>, ApiError> {
    let sweet = inventory::purchase(&state.db, id).map_err(inventory_error)?;
    // Purchases are open to anonymous callers
    let buyer = identity.map(|i| i.username);
    tracing::info!(id, buyer = ?buyer, remaining = sweet.quantity, "Sweet purchased");
    Ok(JSend::success(sweet.into()))
}

pub async fn restock_sweet(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<u64>,
    AppQuery(params): AppQuery<RestockParams>,
) -> Result<Json<JSend<SweetResponse>>, ApiError> {
    let sweet = inventory::restock(&state.db, id, params.qty).map_err(inventory_error)?;
    Ok(JSend::success(sweet.into()))
}

// ============================================================================
// Helpers
// ============================================================================

impl From<SweetRequest> for SweetData {
    fn from(req: SweetRequest) -> Self {
        SweetData {
            category: req.category,
            name: req.name,
            price: req.price,
            quantity: req.quantity,
        }
    }
}

impl From<Sweet> for SweetResponse {
    fn from(sweet: Sweet) -> Self {
        SweetResponse {
            category: sweet.category,
            id: sweet.id,
            name: sweet.name,
            price: sweet.price,
            quantity: sweet.quantity,
        }
    }
}

fn to_responses(sweets: Vec<Sweet>) -> Vec<SweetResponse> {
    sweets.into_iter().map(SweetResponse::from).collect()
}
