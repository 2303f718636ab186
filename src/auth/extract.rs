//! Authorization header parsing

use crate::auth::AuthError;
use axum::http::{header::AUTHORIZATION, HeaderMap};

const BEARER_SCHEME: &str = "Bearer";
const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`
pub fn extract_bearer(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`
pub fn extract_api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    extract_credential(headers, API_KEY_SCHEME)
}

fn extract_credential(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let mut values = headers.get_all(AUTHORIZATION).iter();

    let value = values.next().ok_or(AuthError::MissingHeader)?;
    if values.next().is_some() {
        return Err(AuthError::MalformedHeader);
    }

    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?.trim();

    let (presented_scheme, rest) = match value.split_once(char::is_whitespace) {
        Some((s, rest)) => (s, rest.trim()),
        None => (value, ""),
    };

    if !presented_scheme.eq_ignore_ascii_case(scheme) {
        return Err(AuthError::MissingHeader);
    }

    if rest.is_empty() || rest.contains(char::is_whitespace) {
        return Err(AuthError::MalformedHeader);
    }

    Ok(rest.to_string())
}
