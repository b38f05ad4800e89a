//! Catalog handlers - product listing, detail and admin management.

use crate::{
    core::product,
    errors::{Error, Result},
    web::{AppState, pages, session},
};
use axum::{
    Form,
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Form body for admin product creation and editing
#[derive(Debug, Deserialize)]
pub struct ProductForm {
    /// Display name
    pub name: String,
    /// Detail-page description
    #[serde(default)]
    pub description: String,
    /// Unit price
    pub price: Decimal,
    /// Initial or updated stock
    pub quantity: i32,
    /// Optional image path or URL
    pub image: Option<String>,
}

fn product_card(p: &crate::entities::product::Model, signed_in: bool) -> String {
    let add_form = if signed_in && p.available_quantity > 0 {
        format!(
            "<form method=\"post\" action=\"/add_cart/{slug}\">\
             <input name=\"quantity\" type=\"number\" value=\"1\" min=\"1\">\
             <button type=\"submit\">Add to cart</button></form>",
            slug = p.slug,
        )
    } else {
        String::new()
    };
    format!(
        "<li><a href=\"/product_detail/{slug}\">{name}</a> \
         &mdash; {price} ({stock} in stock){add_form}</li>",
        slug = p.slug,
        name = pages::escape(&p.name),
        price = p.price,
        stock = p.available_quantity,
    )
}

/// `GET /` - home page with the product listing.
pub async fn home(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let current = session::current_user(&state.db, &jar).await?;
    let products = product::list_products(&state.db).await?;

    let (title, body) = if products.is_empty() {
        (state.settings.messages.empty_catalog.clone(), String::new())
    } else {
        let cards: String = products
            .iter()
            .map(|p| product_card(p, current.is_some()))
            .collect();
        ("Our products".to_string(), format!("<ul>{cards}</ul>"))
    };

    Ok(Html(pages::page(&title, current.as_ref(), &body)).into_response())
}

/// `GET /product_detail/{slug}` - product detail page.
pub async fn detail(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> Result<Response> {
    let current = session::current_user(&state.db, &jar).await?;
    let product = product::get_product_by_slug(&state.db, &slug)
        .await?
        .ok_or(Error::ProductNotFound { name: slug })?;

    let image = product.image.as_deref().map_or_else(String::new, |src| {
        format!("<img src=\"{}\" alt=\"\">", pages::escape(src))
    });
    let edit_link = if current.as_ref().is_some_and(|u| u.is_admin) {
        format!(
            "<p><a href=\"/product_detail/{}/edit\">Edit</a></p>",
            product.slug
        )
    } else {
        String::new()
    };
    let body = format!(
        "{image}<p>{description}</p><p>Price: {price}</p>\
         <p>In stock: {stock}</p>{card}{edit_link}",
        description = pages::escape(&product.description),
        price = product.price,
        stock = product.available_quantity,
        card = product_card(&product, current.is_some()),
    );

    Ok(Html(pages::page(&product.name, current.as_ref(), &body)).into_response())
}

fn product_form_html(action: &str, existing: Option<&crate::entities::product::Model>) -> String {
    let (name, description, price, quantity, image) = existing.map_or_else(
        || (String::new(), String::new(), String::new(), 0, String::new()),
        |p| {
            (
                pages::escape(&p.name),
                pages::escape(&p.description),
                p.price.to_string(),
                p.available_quantity,
                p.image.as_deref().map(pages::escape).unwrap_or_default(),
            )
        },
    );
    format!(
        "<form method=\"post\" action=\"{action}\">\
         <label>Name <input name=\"name\" value=\"{name}\"></label><br>\
         <label>Description <textarea name=\"description\">{description}</textarea></label><br>\
         <label>Price <input name=\"price\" value=\"{price}\"></label><br>\
         <label>Quantity <input name=\"quantity\" type=\"number\" value=\"{quantity}\"></label><br>\
         <label>Image <input name=\"image\" value=\"{image}\"></label><br>\
         <button type=\"submit\">Save</button></form>",
    )
}

/// `GET /add_product.html` - admin product creation form.
pub async fn add_form(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let admin = session::require_admin(&state.db, &jar).await?;
    let body = product_form_html("/add_product.html", None);
    Ok(Html(pages::page("Add product", Some(&admin), &body)).into_response())
}

/// `POST /add_product.html` - creates a product and returns to the form.
pub async fn add(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    session::require_admin(&state.db, &jar).await?;

    let image = form.image.filter(|i| !i.trim().is_empty());
    let created = product::create_product(
        &state.db,
        form.name,
        form.description,
        form.price,
        image,
        form.quantity,
    )
    .await?;

    tracing::info!(product = %created.name, slug = %created.slug, "product created");
    Ok(Redirect::to("/add_product.html").into_response())
}

/// `GET /product_detail/{slug}/edit` - admin product edit form.
pub async fn edit_form(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
) -> Result<Response> {
    let admin = session::require_admin(&state.db, &jar).await?;
    let product = product::get_product_by_slug(&state.db, &slug)
        .await?
        .ok_or(Error::ProductNotFound { name: slug })?;

    let action = format!("/product_detail/{}/edit", product.slug);
    let body = product_form_html(&action, Some(&product));
    let title = format!("Edit {}", product.name);
    Ok(Html(pages::page(&title, Some(&admin), &body)).into_response())
}

/// `POST /product_detail/{slug}/edit` - applies an admin edit.
pub async fn edit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(slug): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    session::require_admin(&state.db, &jar).await?;
    let existing = product::get_product_by_slug(&state.db, &slug)
        .await?
        .ok_or(Error::ProductNotFound { name: slug })?;

    let image = form.image.filter(|i| !i.trim().is_empty());
    let updated = product::update_product(
        &state.db,
        existing.id,
        form.name,
        form.description,
        form.price,
        image,
        form.quantity,
    )
    .await?;

    Ok(Redirect::to(&format!("/product_detail/{}", updated.slug)).into_response())
}
