//! Cookie-based session glue.
//!
//! The shop treats authentication as a thin collaborator: a signed-in visitor
//! is identified by a cookie holding their user id. Swapping this for a real
//! session store would not touch the handlers beyond this module.

use crate::{
    core::user,
    entities,
    errors::{Error, Result},
};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use sea_orm::DatabaseConnection;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "sweetshop_session";

/// Resolves the current visitor from the session cookie, if any.
///
/// A missing or unparsable cookie and a stale user id both resolve to `None`.
///
/// # Errors
/// Returns an error if the user lookup fails.
pub async fn current_user(
    db: &DatabaseConnection,
    jar: &CookieJar,
) -> Result<Option<entities::user::Model>> {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let Ok(user_id) = cookie.value().parse::<i64>() else {
        return Ok(None);
    };
    user::get_user_by_id(db, user_id).await
}

/// Resolves the current visitor, failing for anonymous requests.
///
/// # Errors
/// Returns `Forbidden` when no valid session is present.
pub async fn require_user(
    db: &DatabaseConnection,
    jar: &CookieJar,
) -> Result<entities::user::Model> {
    current_user(db, jar).await?.ok_or(Error::Forbidden)
}

/// Resolves the current visitor, failing unless they are an administrator.
///
/// # Errors
/// Returns `Forbidden` for anonymous and non-admin sessions.
pub async fn require_admin(
    db: &DatabaseConnection,
    jar: &CookieJar,
) -> Result<entities::user::Model> {
    let user = require_user(db, jar).await?;
    if !user.is_admin {
        return Err(Error::Forbidden);
    }
    Ok(user)
}

/// Adds the session cookie for a freshly signed-in user.
#[must_use]
pub fn sign_in(jar: CookieJar, user_id: i64) -> CookieJar {
    let mut cookie = Cookie::new(SESSION_COOKIE, user_id.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    jar.add(cookie)
}

/// Removes the session cookie.
#[must_use]
pub fn sign_out(jar: CookieJar) -> CookieJar {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    jar.remove(cookie)
}
