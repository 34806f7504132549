//! # Request Handlers
//!
//! Axum request handlers for the cart API.
//! Every mutation holds the cart lock for the duration of one store operation.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{
    parse_price, Cart, CartError, CartLine, CatalogProduct, CheckoutPayload, Decimal, ProductId,
    SnapshotStore,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add-to-cart request
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    /// Product ID
    pub product_id: u64,
    /// Quantity
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    /// Unit price as a numeric string; looked up in the catalog when absent
    #[serde(default)]
    pub price: Option<String>,
    /// Display name (ignored when pricing from the catalog)
    #[serde(default)]
    pub name: Option<String>,
    /// Image URL
    #[serde(default)]
    pub image: Option<String>,
    /// Variant attributes
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

fn default_quantity() -> u32 {
    1
}

/// Set-quantity request
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    /// New absolute quantity; zero or below removes the line
    pub quantity: i64,
}

/// Cart response
#[derive(Debug, Serialize)]
pub struct CartView {
    pub lines: Vec<CartLine>,
    pub total_items: u64,
    pub total_price: Decimal,
    pub is_empty: bool,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            lines: cart.lines().to_vec(),
            total_items: cart.total_items(),
            total_price: cart.total_price(),
            is_empty: cart.is_empty(),
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn cart_error_to_response(err: CartError) -> ApiError {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

fn parse_product_id(raw: &str) -> Result<ProductId, ApiError> {
    raw.parse::<ProductId>().map_err(cart_error_to_response)
}

/// Build the line to add from an explicit price, or from the catalog
fn line_for_request(
    catalog: &cart_core::ProductCatalog,
    request: AddItemRequest,
) -> Result<CartLine, CartError> {
    let product_id = ProductId::new(request.product_id)?;

    let Some(price) = request.price else {
        return catalog
            .purchasable(product_id)
            .map(|product: &CatalogProduct| product.to_line(request.quantity));
    };

    let mut line = CartLine::new(product_id, request.quantity, parse_price(&price)?);
    line.name = request.name;
    line.image = request.image;
    line.attributes = request.attributes;
    Ok(line)
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let cart = state.cart.lock().await;
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-cart",
        "version": env!("CARGO_PKG_VERSION"),
        "storage": cart.storage().backend_name(),
        "persisted": !cart.is_dirty(),
    }))
}

/// Current cart with totals
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    let cart = state.cart.lock().await;
    Json(CartView::from(cart.cart()))
}

/// Add a line, merging with an existing line for the same product
#[instrument(skip(state, request), fields(product_id = request.product_id, quantity = request.quantity))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<CartView>), ApiError> {
    let line = line_for_request(&state.catalog, request).map_err(|e| {
        warn!("Rejected add to cart: {}", e);
        cart_error_to_response(e)
    })?;

    let mut cart = state.cart.lock().await;
    cart.add_item(line).map_err(cart_error_to_response)?;

    info!(
        "Cart now has {} items, total={}",
        cart.total_items(),
        cart.total_price()
    );

    Ok((StatusCode::CREATED, Json(CartView::from(cart.cart()))))
}

/// Set a line's quantity (zero or below removes it)
#[instrument(skip(state, product_id, request), fields(product_id = %product_id, quantity = request.quantity))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartView>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let mut cart = state.cart.lock().await;
    cart.update_quantity(product_id, request.quantity)
        .map_err(cart_error_to_response)?;

    Ok(Json(CartView::from(cart.cart())))
}

/// Remove a line; removing an absent product is not an error
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<CartView>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let mut cart = state.cart.lock().await;
    cart.remove_item(product_id);

    Ok(Json(CartView::from(cart.cart())))
}

/// Empty the cart
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Json<CartView> {
    let mut cart = state.cart.lock().await;
    cart.clear_cart();
    Json(CartView::from(cart.cart()))
}

/// Order line items for the current cart.
///
/// The payload reflects the cart at the moment of the call.
pub async fn checkout_payload(
    State(state): State<AppState>,
) -> Result<Json<CheckoutPayload>, ApiError> {
    let snapshot = state.cart.lock().await.cart().clone();

    CheckoutPayload::from_cart(&snapshot).map(Json).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("Cart is empty", 400)),
        )
    })
}

/// Get products list
pub async fn list_products(State(state): State<AppState>) -> impl IntoResponse {
    let products: Vec<_> = state.catalog.active_products().collect();
    Json(serde_json::json!({
        "products": products,
        "count": products.len()
    }))
}

/// Get single product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<CatalogProduct>, ApiError> {
    let product_id = parse_product_id(&product_id)?;

    let product = state.catalog.get(product_id).ok_or_else(|| {
        cart_error_to_response(CartError::ProductNotFound {
            product_id: product_id.get(),
        })
    })?;

    Ok(Json(product.clone()))
}
