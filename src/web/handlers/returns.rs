//! Return handlers - buyer requests and admin review.

use crate::{
    core::returns,
    errors::{Error, Result},
    web::{AppState, pages, session},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

fn expired_response(state: &AppState) -> Response {
    (
        StatusCode::GONE,
        state.settings.messages.return_window_expired.clone(),
    )
        .into_response()
}

/// `GET /returns.html` - admin review screen listing pending returns.
pub async fn pending(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let admin = session::require_admin(&state.db, &jar).await?;

    let rows = returns::pending_returns(&state.db).await?;
    let body = if rows.is_empty() {
        "<p>No pending returns.</p>".to_string()
    } else {
        let lines: String = rows
            .iter()
            .map(|(ret, purchase, product)| {
                format!(
                    "<li>{quantity} x {name} bought on {date} \
                     <form method=\"post\" action=\"/notice_return/{id}\" style=\"display:inline\">\
                     <button type=\"submit\">Approve</button></form>\
                     <form method=\"post\" action=\"/vitality_return/{id}\" style=\"display:inline\">\
                     <button type=\"submit\">Reject</button></form></li>",
                    quantity = purchase.quantity,
                    name = pages::escape(&product.name),
                    date = purchase.purchase_date.format("%Y-%m-%d %H:%M"),
                    id = ret.id,
                )
            })
            .collect();
        format!("<ul>{lines}</ul>")
    };

    Ok(Html(pages::page("Pending returns", Some(&admin), &body)).into_response())
}

/// `POST /return/{purchase_pk}` - buyer requests a return for a purchase.
pub async fn request(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(purchase_pk): Path<i64>,
) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    let window = state.settings.shop.return_window_secs;
    match returns::request_return(&state.db, buyer.id, purchase_pk, window).await {
        Ok(_) => Ok(Redirect::to("/purchase.html").into_response()),
        Err(Error::ReturnWindowExpired { .. }) => Ok(expired_response(&state)),
        Err(other) => Err(other),
    }
}

/// `POST /notice_return/{return_pk}` - admin approves a pending return.
pub async fn approve(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(return_pk): Path<i64>,
) -> Result<Response> {
    let admin = session::require_admin(&state.db, &jar).await?;

    let window = state.settings.shop.return_window_secs;
    match returns::approve_return(&state.db, return_pk, window).await {
        Ok(approved) => {
            tracing::info!(
                admin = %admin.username,
                return_id = approved.id,
                refund = %approved.return_price,
                "return approved"
            );
            Ok(Redirect::to("/returns.html").into_response())
        }
        Err(Error::ReturnWindowExpired { .. }) => Ok(expired_response(&state)),
        Err(other) => Err(other),
    }
}

/// `POST /vitality_return/{return_pk}` - admin rejects a pending return.
pub async fn reject(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(return_pk): Path<i64>,
) -> Result<Response> {
    session::require_admin(&state.db, &jar).await?;

    returns::reject_return(&state.db, return_pk).await?;
    Ok(Redirect::to("/returns.html").into_response())
}
