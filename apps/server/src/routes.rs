//! # HTTP Routes
//!
//! | Route             | Method     | Response                                  |
//! |-------------------|------------|-------------------------------------------|
//! | `/`               | GET        | 303 → `/get_orders`                       |
//! | `/item_list`      | GET        | stock rows                                |
//! | `/enter_invoice`  | GET        | form data: title, stock rows, currencies  |
//! | `/create_invoice` | GET / POST | 303 → `/showInvoice?orderId=N`            |
//! | `/get_orders`     | GET        | orders, newest first                      |
//! | `/showInvoice`    | GET        | display rows of one order                 |
//! | `/health`         | GET        | `OK`                                      |

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::routing::get;
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tally_core::{to_display_rows, Currency, DisplayRow, OrderId, OrderLine, StockItem};
use tally_store::InvoiceRequest;
use tracing::debug;
use ts_rs::TS;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

// =============================================================================
// DTOs
// =============================================================================

/// One row of the stock table.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockRow {
    /// 1-based item number, as entered in the invoice form.
    pub number: usize,
    pub name: String,
    pub unit_price: String,
    pub quantity: i64,
}

impl StockRow {
    fn new(index: usize, item: &StockItem) -> Self {
        StockRow {
            number: index + 1,
            name: item.name.clone(),
            unit_price: item.unit_price.to_string(),
            quantity: item.quantity,
        }
    }
}

/// Everything the invoice entry form needs.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceForm {
    pub title: String,
    pub items: Vec<StockRow>,
    pub currencies: Vec<String>,
}

/// An order in the ledger listing.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: OrderId,
    #[serde(flatten)]
    pub line: OrderLine,
}

/// A single invoice ready for display.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceView {
    pub order_id: OrderId,
    pub rows: Vec<DisplayRow>,
}

/// Invoice form fields. Kept as strings so bad input gets our own 400 body.
#[derive(Debug, Default, Deserialize)]
pub struct CreateInvoiceParams {
    #[serde(default)]
    pub item: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub selccy: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowInvoiceParams {
    #[serde(default)]
    pub order_id: String,
}

// =============================================================================
// Router
// =============================================================================

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/item_list", get(item_list))
        .route("/enter_invoice", get(enter_invoice))
        .route(
            "/create_invoice",
            get(create_invoice_query).post(create_invoice_form),
        )
        .route("/get_orders", get(get_orders))
        .route("/showInvoice", get(show_invoice))
        .route("/health", get(health))
}

// =============================================================================
// Handlers
// =============================================================================

async fn index() -> Redirect {
    Redirect::to("/get_orders")
}

async fn health() -> &'static str {
    "OK"
}

async fn stock_rows(state: &AppState) -> ApiResult<Vec<StockRow>> {
    let catalog = state.store.catalog().await?;
    Ok(catalog
        .items()
        .iter()
        .enumerate()
        .map(|(idx, item)| StockRow::new(idx, item))
        .collect())
}

async fn item_list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<StockRow>>> {
    Ok(Json(stock_rows(&state).await?))
}

async fn enter_invoice(State(state): State<Arc<AppState>>) -> ApiResult<Json<InvoiceForm>> {
    Ok(Json(InvoiceForm {
        title: "Enter Invoice".to_string(),
        items: stock_rows(&state).await?,
        currencies: Currency::codes().into_iter().map(String::from).collect(),
    }))
}

async fn create_invoice_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CreateInvoiceParams>,
) -> ApiResult<Redirect> {
    create_invoice(&state, params).await
}

async fn create_invoice_form(
    State(state): State<Arc<AppState>>,
    Form(params): Form<CreateInvoiceParams>,
) -> ApiResult<Redirect> {
    create_invoice(&state, params).await
}

/// Turns form fields into an order request. Item numbers are 1-based.
fn parse_invoice_params(params: &CreateInvoiceParams) -> ApiResult<InvoiceRequest> {
    let item: i64 = params
        .item
        .trim()
        .parse()
        .map_err(|_| ApiError::validation(format!("item must be a number, got '{}'", params.item)))?;
    if item < 1 {
        return Err(ApiError::validation("item must be at least 1"));
    }

    let quantity: i64 = params.quantity.trim().parse().map_err(|_| {
        ApiError::validation(format!("quantity must be a number, got '{}'", params.quantity))
    })?;

    let currency: Currency = params.selccy.parse()?;

    Ok(InvoiceRequest::new((item - 1) as usize, quantity, currency))
}

async fn create_invoice(state: &AppState, params: CreateInvoiceParams) -> ApiResult<Redirect> {
    let request = parse_invoice_params(&params)?;
    debug!(?request, "Invoice requested");

    let receipt = state.store.create_invoice(request).await?;
    Ok(Redirect::to(&format!(
        "/showInvoice?orderId={}",
        receipt.order_id
    )))
}

async fn get_orders(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<OrderSummary>>> {
    let orders = state.store.orders().await?;
    Ok(Json(
        orders
            .into_iter()
            .map(|(order_id, line)| OrderSummary { order_id, line })
            .collect(),
    ))
}

async fn show_invoice(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ShowInvoiceParams>,
) -> ApiResult<Json<InvoiceView>> {
    let order_id: OrderId = params.order_id.parse().map_err(|_| {
        ApiError::validation(format!("orderId must be a number, got '{}'", params.order_id))
    })?;

    let line = state.store.order(order_id).await?;
    Ok(Json(InvoiceView {
        order_id,
        rows: to_display_rows(&line),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    fn params(item: &str, quantity: &str, selccy: &str) -> CreateInvoiceParams {
        CreateInvoiceParams {
            item: item.to_string(),
            quantity: quantity.to_string(),
            selccy: selccy.to_string(),
        }
    }

    #[test]
    fn test_parse_invoice_params() {
        let request = parse_invoice_params(&params("1", "3", "EUR")).unwrap();
        assert_eq!(request, InvoiceRequest::new(0, 3, Currency::Eur));

        let request = parse_invoice_params(&params(" 2 ", "1", "GBP")).unwrap();
        assert_eq!(request.item_index, 1);
    }

    #[test]
    fn test_parse_invoice_params_rejects_bad_fields() {
        let err = parse_invoice_params(&params("0", "3", "EUR")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = parse_invoice_params(&params("one", "3", "EUR")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = parse_invoice_params(&params("1", "", "EUR")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = parse_invoice_params(&params("1", "3", "JPY")).unwrap_err();
        assert_eq!(err.code, ErrorCode::UnsupportedCurrency);
    }
}
