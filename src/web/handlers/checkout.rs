//! Checkout handlers - purchase execution and purchase history.
//!
//! `buy` is where the configured plain-text failure bodies are rendered: the
//! core reports `InsufficientFunds`/`InsufficientStock` and the handler swaps
//! in the message strings from settings.

use crate::{
    core::purchase,
    errors::{Error, Result},
    web::{AppState, pages, session},
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono_tz::Tz;

/// Header carrying the buyer's IANA timezone name
pub const TIMEZONE_HEADER: &str = "x-timezone";

/// Parses the buyer's declared timezone, falling back to UTC on anything odd.
fn buyer_timezone(headers: &HeaderMap) -> Option<Tz> {
    headers
        .get(TIMEZONE_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|name| name.parse().ok())
}

/// `POST /buy` - purchases the visitor's entire cart.
pub async fn buy(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    match purchase::execute_purchase(&state.db, buyer.id, buyer_timezone(&headers)).await {
        Ok(purchases) => {
            tracing::info!(buyer = %buyer.username, lines = purchases.len(), "cart purchased");
            Ok(Redirect::to("/").into_response())
        }
        Err(Error::InsufficientFunds { .. }) => Ok((
            StatusCode::PAYMENT_REQUIRED,
            state.settings.messages.insufficient_funds.clone(),
        )
            .into_response()),
        Err(Error::InsufficientStock { product, .. }) => Ok((
            StatusCode::CONFLICT,
            state.settings.messages.insufficient_stock_for(&product),
        )
            .into_response()),
        Err(other) => Err(other),
    }
}

/// `GET /purchase.html` - the visitor's purchase history.
pub async fn history(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    let purchases = purchase::purchases_for_buyer(&state.db, buyer.id).await?;
    let body = if purchases.is_empty() {
        "<p>No purchases yet.</p>".to_string()
    } else {
        let lines: String = purchases
            .iter()
            .map(|(p, product)| {
                let name = product
                    .as_ref()
                    .map_or("(removed product)".to_string(), |pr| {
                        pages::escape(&pr.name)
                    });
                let return_form = if p.is_active {
                    format!(
                        "<form method=\"post\" action=\"/return/{}\" style=\"display:inline\">\
                         <button type=\"submit\">Return</button></form>",
                        p.id,
                    )
                } else {
                    "<em>return requested</em>".to_string()
                };
                format!(
                    "<li>{quantity} x {name} for {total} on {date} {return_form}</li>",
                    quantity = p.quantity,
                    total = p.total_price,
                    date = p.purchase_date_user.format("%Y-%m-%d %H:%M"),
                )
            })
            .collect();
        format!("<ul>{lines}</ul>")
    };

    Ok(Html(pages::page("Previous purchases", Some(&buyer), &body)).into_response())
}
