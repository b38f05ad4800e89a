//! Auth lifecycle handlers - signup, signin and logout.
//!
//! Thin collaborators around [`crate::core::user`]: they move form fields into
//! core calls and translate the outcome into a cookie plus redirect.

use crate::{
    core::user,
    errors::Result,
    web::{AppState, pages, session},
};
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

/// Form body for `POST /signup.html`
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    /// Desired login name
    pub username: String,
    /// Desired password
    pub password: String,
    /// Optional wallet currency; the configured default applies when absent
    pub currency: Option<String>,
}

/// Form body for `POST /signin.html`
#[derive(Debug, Deserialize)]
pub struct SigninForm {
    /// Login name
    pub username: String,
    /// Password
    pub password: String,
}

/// `GET /signup.html` - renders the registration form.
pub async fn signup_form(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let current = session::current_user(&state.db, &jar).await?;
    let body = "<form method=\"post\" action=\"/signup.html\">\
         <label>Username <input name=\"username\"></label><br>\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\
         <label>Currency <select name=\"currency\">\
         <option>UAH</option><option>USD</option><option>EUR</option><option>GBP</option>\
         </select></label><br>\
         <button type=\"submit\">Sign up</button></form>";
    Ok(Html(pages::page("Sign up", current.as_ref(), body)).into_response())
}

/// `POST /signup.html` - creates the account and signs it in.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let account = user::signup(
        &state.db,
        form.username,
        &form.password,
        form.currency,
        state.settings.shop.starting_wallet_balance,
        &state.settings.shop.default_currency,
    )
    .await?;

    tracing::info!(user = %account.username, "new account registered");
    let jar = session::sign_in(jar, account.id);
    Ok((jar, Redirect::to("/")).into_response())
}

/// `GET /signin.html` - renders the login form.
pub async fn signin_form(State(state): State<AppState>, jar: CookieJar) -> Result<Response> {
    let current = session::current_user(&state.db, &jar).await?;
    let body = "<form method=\"post\" action=\"/signin.html\">\
         <label>Username <input name=\"username\"></label><br>\
         <label>Password <input name=\"password\" type=\"password\"></label><br>\
         <button type=\"submit\">Sign in</button></form>";
    Ok(Html(pages::page("Sign in", current.as_ref(), body)).into_response())
}

/// `POST /signin.html` - verifies credentials and starts a session.
pub async fn signin(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SigninForm>,
) -> Result<Response> {
    match user::authenticate(&state.db, &form.username, &form.password).await? {
        Some(account) => {
            let jar = session::sign_in(jar, account.id);
            Ok((jar, Redirect::to("/")).into_response())
        }
        None => Ok((
            StatusCode::UNAUTHORIZED,
            "invalid username or password".to_string(),
        )
            .into_response()),
    }
}

/// `POST /logout.html` - ends the session.
pub async fn logout(jar: CookieJar) -> Response {
    (session::sign_out(jar), Redirect::to("/")).into_response()
}
