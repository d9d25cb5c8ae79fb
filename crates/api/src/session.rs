//! Session and customer identity at the HTTP edge.
//!
//! The cart session rides in a `session_id` cookie, treated as an opaque key.
//! Handlers that create a session on first touch append a `Set-Cookie` to their
//! response. Customer identity (for order ownership and early access) arrives
//! as an `x-customer-id` header; absence simply means anonymous.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::Response;

use dropfront_core::{CustomerId, SessionId};

use crate::app::errors;

pub const SESSION_COOKIE: &str = "session_id";

/// Cookie lifetime matches the cart's 7-day expiry.
const SESSION_MAX_AGE_SECONDS: u64 = 7 * 24 * 60 * 60;

pub struct SessionHandle {
    pub session: SessionId,
    pub is_new: bool,
}

/// Pull the session id out of the `Cookie` header, minting one if absent.
pub fn session_from_headers(headers: &HeaderMap) -> SessionHandle {
    for value in headers.get_all(header::COOKIE) {
        let Ok(raw) = value.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=') {
                if name == SESSION_COOKIE && !value.is_empty() {
                    return SessionHandle {
                        session: SessionId::from(value),
                        is_new: false,
                    };
                }
            }
        }
    }

    SessionHandle {
        session: SessionId::generate(),
        is_new: true,
    }
}

/// Attach the `Set-Cookie` for a freshly minted session.
pub fn attach_session_cookie(mut response: Response, handle: &SessionHandle) -> Response {
    if !handle.is_new {
        return response;
    }

    let cookie = format!(
        "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECONDS}",
        handle.session.as_str()
    );
    if let Ok(value) = HeaderValue::from_str(&cookie) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }
    response
}

/// Optional customer identity; a malformed id is a client error, not anonymity.
pub fn customer_from_headers(headers: &HeaderMap) -> Result<Option<CustomerId>, Response> {
    let Some(value) = headers.get("x-customer-id") else {
        return Ok(None);
    };

    let raw = value.to_str().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
    })?;

    let customer: CustomerId = raw.parse().map_err(|_| {
        errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid customer id")
    })?;

    Ok(Some(customer))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_round_trips() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; session_id=session_abc123"),
        );

        let handle = session_from_headers(&headers);
        assert!(!handle.is_new);
        assert_eq!(handle.session.as_str(), "session_abc123");
    }

    #[test]
    fn missing_cookie_mints_a_session() {
        let handle = session_from_headers(&HeaderMap::new());
        assert!(handle.is_new);
        assert!(handle.session.as_str().starts_with("session_"));
    }

    #[test]
    fn bad_customer_header_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert("x-customer-id", HeaderValue::from_static("not-a-uuid"));
        assert!(customer_from_headers(&headers).is_err());
    }

    #[test]
    fn absent_customer_header_is_anonymous() {
        assert!(customer_from_headers(&HeaderMap::new()).unwrap().is_none());
    }
}
