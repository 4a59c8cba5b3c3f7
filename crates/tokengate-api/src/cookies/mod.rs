//! Token cookies
//!
//! Reads presented tokens from requests and writes token cookies through
//! `CookieJar`. Cookies are `HttpOnly`, `SameSite=Lax`, scoped to `/`, and
//! `Secure` only when requested.

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use cookie::time::Duration;
use tokengate_common::TokenPair;
use tokengate_service::PresentedCredentials;

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

fn token_cookie(name: &'static str, value: String, max_age: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::seconds(max_age))
        .build()
}

fn removal_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    let mut cookie = token_cookie(name, String::new(), 0, secure);
    cookie.make_removal();
    cookie
}

/// Add both tokens of a freshly issued pair
pub fn with_tokens(jar: CookieJar, pair: &TokenPair, secure: bool) -> CookieJar {
    jar.add(token_cookie(
        ACCESS_TOKEN_COOKIE,
        pair.access_token.clone(),
        pair.expires_in,
        secure,
    ))
    .add(token_cookie(
        REFRESH_TOKEN_COOKIE,
        pair.refresh_token.clone(),
        pair.refresh_expires_in,
        secure,
    ))
}

/// Make the client drop both tokens
///
/// Removal cookies are written even when the request carried no cookie, so a
/// body-token logout also clears any copy the client holds.
pub fn without_tokens(jar: CookieJar, secure: bool) -> CookieJar {
    jar.add(removal_cookie(ACCESS_TOKEN_COOKIE, secure))
        .add(removal_cookie(REFRESH_TOKEN_COOKIE, secure))
}

fn non_empty(jar: &CookieJar, name: &str) -> Option<String> {
    jar.get(name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}

/// Refresh token from the `refresh_token` cookie, if any
pub fn refresh_token(jar: &CookieJar) -> Option<String> {
    non_empty(jar, REFRESH_TOKEN_COOKIE)
}

/// Collect the tokens a request carries
///
/// The access token may come as `Authorization: Bearer`, which wins over
/// the cookie.
pub fn presented_credentials(headers: &HeaderMap) -> PresentedCredentials {
    let jar = CookieJar::from_headers(headers);
    let bearer = headers
        .typed_get::<Authorization<Bearer>>()
        .map(|Authorization(bearer)| bearer.token().to_string());

    PresentedCredentials {
        access: bearer.or_else(|| non_empty(&jar, ACCESS_TOKEN_COOKIE)),
        refresh: refresh_token(&jar),
    }
}
