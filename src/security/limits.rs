//! Request body limits.
//!
//! # Responsibilities
//! - Read the declared `Content-Length` bytes of a forwarded body
//! - Enforce maximum request body size
//!
//! # Design Decisions
//! - Declared length checked before any body byte is read (early rejection)
//! - The read itself is capped too, so a lying declaration cannot bypass the limit
//! - Oversize returns 413 Payload Too Large

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, Method},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::http::error::ProxyError;

/// Only these methods have their body forwarded.
pub fn carries_body(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT
}

/// Parsed `Content-Length`, `None` when absent.
pub fn declared_length(headers: &HeaderMap) -> Result<Option<u64>, ProxyError> {
    let Some(value) = headers.get(header::CONTENT_LENGTH) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Some)
        .ok_or_else(|| ProxyError::Internal("invalid Content-Length header".to_string()))
}

/// Read the body announced by `headers`, up to `limit` bytes.
///
/// Absent or zero `Content-Length` means no body is forwarded at all.
pub async fn read_declared_body(
    headers: &HeaderMap,
    body: Body,
    limit: usize,
) -> Result<Option<Bytes>, ProxyError> {
    let declared = match declared_length(headers)? {
        None | Some(0) => return Ok(None),
        Some(n) => n,
    };
    if declared > limit as u64 {
        return Err(ProxyError::PayloadTooLarge { limit });
    }

    let collected = Limited::new(body, limit).collect().await.map_err(|e| {
        if e.is::<LengthLimitError>() {
            ProxyError::PayloadTooLarge { limit }
        } else {
            ProxyError::Internal(format!("failed to read request body: {e}"))
        }
    })?;
    Ok(Some(collected.to_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn with_length(len: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static(len));
        headers
    }

    #[test]
    fn only_post_and_put_carry_bodies() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PUT));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::DELETE));
    }

    #[tokio::test]
    async fn reads_declared_body() {
        let body = read_declared_body(&with_length("12"), Body::from(r#"{"name":"x"}"#), 1024)
            .await
            .unwrap();
        assert_eq!(body.as_deref(), Some(&br#"{"name":"x"}"#[..]));
    }

    #[tokio::test]
    async fn missing_or_zero_length_means_no_body() {
        let none = read_declared_body(&HeaderMap::new(), Body::from("ignored"), 1024)
            .await
            .unwrap();
        assert!(none.is_none());

        let zero = read_declared_body(&with_length("0"), Body::empty(), 1024)
            .await
            .unwrap();
        assert!(zero.is_none());
    }

    #[tokio::test]
    async fn declared_oversize_rejected_before_reading() {
        let err = read_declared_body(&with_length("2048"), Body::empty(), 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::PayloadTooLarge { limit: 1024 }));
    }

    #[tokio::test]
    async fn understated_length_still_capped() {
        let err = read_declared_body(&with_length("4"), Body::from(vec![b'a'; 64]), 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::PayloadTooLarge { limit: 16 }));
    }

    #[test]
    fn garbage_length_is_internal_error() {
        let err = declared_length(&with_length("abc")).unwrap_err();
        assert!(matches!(err, ProxyError::Internal(_)));
    }
}
