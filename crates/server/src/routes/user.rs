//! User RPC handlers. Each accepts the access token in the request body
//! (`access_token`) or, when that is empty, an `Authorization: Bearer` header.

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::errors::ApiError;

#[derive(Debug, Default, Deserialize)]
pub struct UserRequest {
    #[serde(default)]
    pub access_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdatePreferenceRequest {
    #[serde(default)]
    pub access_token: String,
    pub preference_name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProductRequest {
    #[serde(default)]
    pub access_token: String,
    pub product_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetProductsResponse {
    pub product_names: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetPreferenceResponse {
    pub preference_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    fn ok() -> Json<Self> {
        Json(Self { success: true })
    }
}

/// Pick the body token, falling back to the bearer header.
fn access_token(headers: &HeaderMap, body_token: String) -> Result<String, ApiError> {
    if !body_token.trim().is_empty() {
        return Ok(body_token);
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(ApiError::unauthorized)
}

pub async fn get_user_products(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UserRequest>,
) -> Result<Json<GetProductsResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    let products = state.accounts.get_products(&token).await?;
    Ok(Json(GetProductsResponse { product_names: products.into_iter().collect() }))
}

pub async fn get_user_preference(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UserRequest>,
) -> Result<Json<GetPreferenceResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    let preference_name = state.accounts.get_preference(&token).await?;
    Ok(Json(GetPreferenceResponse { preference_name }))
}

pub async fn update_user_preference(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdatePreferenceRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    state.accounts.upsert_preference(&token, &req.preference_name).await?;
    Ok(SuccessResponse::ok())
}

pub async fn remove_user_preference(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UserRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    state.accounts.remove_preference(&token).await?;
    Ok(SuccessResponse::ok())
}

pub async fn add_user_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    state.accounts.add_product(&token, &req.product_name).await?;
    Ok(SuccessResponse::ok())
}

pub async fn remove_user_product(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ProductRequest>,
) -> Result<Json<SuccessResponse>, ApiError> {
    let token = access_token(&headers, req.access_token)?;
    state.accounts.remove_product(&token, &req.product_name).await?;
    Ok(SuccessResponse::ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn body_token_wins_over_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header-token"));
        assert_eq!(access_token(&headers, "body-token".into()).unwrap(), "body-token");
        assert_eq!(access_token(&headers, String::new()).unwrap(), "header-token");
    }

    #[test]
    fn missing_token_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert!(access_token(&headers, "  ".into()).is_err());
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert!(access_token(&headers, String::new()).is_err());
    }
}
