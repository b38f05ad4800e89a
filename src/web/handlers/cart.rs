//! Cart handlers - adding, viewing and removing cart lines.

use crate::{
    core::cart,
    errors::Result,
    web::{AppState, pages, session},
};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

/// Form body for `POST /add_cart/{slug}`
#[derive(Debug, Deserialize)]
pub struct AddCartForm {
    /// Units to add
    pub quantity: i32,
}

/// `POST /add_cart/{slug}` - adds a product to the visitor's cart.
pub async fn add(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
    Form(form): Form<AddCartForm>,
) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    cart::add_to_cart(&state.db, buyer.id, &slug, form.quantity).await?;
    Ok(Redirect::to("/").into_response())
}

/// `POST /remove_cart/{item_id}` - removes a line from the visitor's cart.
pub async fn remove(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(item_id): Path<i64>,
) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    cart::remove_from_cart(&state.db, buyer.id, item_id).await?;
    Ok(Redirect::to("/cart.html").into_response())
}

/// `GET /cart.html` - the visitor's cart with its computed total.
pub async fn view(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let Some(buyer) = session::current_user(&state.db, &jar).await? else {
        return Ok(Redirect::to("/signin.html").into_response());
    };

    let items = cart::cart_items_with_products(state.db.as_ref(), buyer.id).await?;
    let total = cart::cart_total(&state.db, buyer.id).await?;

    let body = if items.is_empty() {
        "<p>Your cart is empty.</p>".to_string()
    } else {
        let lines: String = items
            .iter()
            .map(|(item, product)| {
                format!(
                    "<li>{quantity} x {name} at {price} \
                     <form method=\"post\" action=\"/remove_cart/{id}\" style=\"display:inline\">\
                     <button type=\"submit\">Remove</button></form></li>",
                    quantity = item.quantity,
                    name = pages::escape(&product.name),
                    price = product.price,
                    id = item.id,
                )
            })
            .collect();
        format!(
            "<ul>{lines}</ul><p>Total: {total}</p>\
             <form method=\"post\" action=\"/buy\"><button type=\"submit\">Buy</button></form>",
        )
    };

    Ok(Html(pages::page("Cart", Some(&buyer), &body)).into_response())
}
