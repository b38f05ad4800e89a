//! Minimal server-rendered HTML for the storefront pages.
//!
//! The shop renders plain HTML strings; there is no template engine on
//! purpose. Presentation strings that carry policy (error bodies, empty-state
//! text) come from [`crate::config::settings::Messages`]; the static chrome
//! below is layout only.

use crate::entities::user;

/// Navigation entries shown to administrators
pub const MENU_ADMIN: &[(&str, &str)] = &[
    ("/", "View products"),
    ("/add_product.html", "Add product"),
    ("/returns.html", "Pending returns"),
];

/// Navigation entries shown to signed-in shoppers
pub const MENU_USER: &[(&str, &str)] = &[
    ("/", "View products"),
    ("/purchase.html", "Previous purchases"),
    ("/cart.html", "Cart"),
];

/// Navigation entries shown to anonymous visitors
pub const MENU_ANONYMOUS: &[(&str, &str)] = &[
    ("/", "View products"),
    ("/signin.html", "Sign in"),
    ("/signup.html", "Sign up"),
];

/// Escapes text for safe interpolation into HTML bodies and attributes.
#[must_use]
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Picks the navigation menu for the current visitor.
#[must_use]
pub fn menu_for(current: Option<&user::Model>) -> &'static [(&'static str, &'static str)] {
    match current {
        Some(u) if u.is_admin => MENU_ADMIN,
        Some(_) => MENU_USER,
        None => MENU_ANONYMOUS,
    }
}

/// Wraps a body fragment in the shared page chrome.
#[must_use]
pub fn page(title: &str, current: Option<&user::Model>, body: &str) -> String {
    let nav = menu_for(current)
        .iter()
        .map(|(href, label)| format!("<a href=\"{href}\">{label}</a>"))
        .collect::<Vec<_>>()
        .join(" | ");

    let account = current.map_or_else(String::new, |u| {
        format!(
            "<p>Signed in as {} &mdash; wallet {} {} \
             <form method=\"post\" action=\"/logout.html\" style=\"display:inline\">\
             <button type=\"submit\">Sign out</button></form></p>",
            escape(&u.username),
            u.wallet_balance,
            escape(&u.wallet_currency),
        )
    });

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\">\
         <title>{title}</title></head>\
         <body><nav>{nav}</nav>{account}<h1>{title}</h1>{body}</body></html>",
        title = escape(title),
    )
}
