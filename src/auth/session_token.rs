//! Opaque session tokens and the cookie/header transport around them.

use axum::http::{HeaderMap, header};
use rand::{RngCore, rngs::OsRng};

use crate::config::AuthConfig;

const TOKEN_BYTES: usize = 32;

/// 32 random bytes, hex encoded.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// `Authorization: Bearer` wins over the session cookie.
pub fn read_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    bearer_token(headers).or_else(|| cookie_value(headers, cookie_name))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"').to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for a fresh session. `persistent = false` leaves out
/// `Max-Age` so the browser drops the cookie when it closes.
pub fn session_cookie(cfg: &AuthConfig, token: &str, persistent: bool) -> String {
    let mut cookie = format!("{}={token}; Path=/; HttpOnly; SameSite=Lax", cfg.cookie_name);
    if persistent {
        cookie.push_str(&format!("; Max-Age={}", cfg.session_ttl_days * 24 * 60 * 60));
    }
    if cfg.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

pub fn clear_cookie(cfg: &AuthConfig) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        cfg.cookie_name
    );
    if cfg.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::*;

    #[test]
    fn tokens_are_64_hex_chars_and_unique() {
        let first = generate_token();
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|ch| ch.is_ascii_hexdigit()));
        assert_ne!(first, generate_token());
    }

    #[test]
    fn reads_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; shiftbook.session_token=abc123; lang=sv"),
        );
        assert_eq!(
            read_token(&headers, "shiftbook.session_token"),
            Some("abc123".to_string())
        );
        assert_eq!(read_token(&headers, "missing"), None);
    }

    #[test]
    fn bearer_header_takes_precedence() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok-1"));
        headers.insert(header::COOKIE, HeaderValue::from_static("sid=tok-2"));
        assert_eq!(read_token(&headers, "sid"), Some("tok-1".to_string()));
    }

    #[test]
    fn cookie_attributes_follow_config() {
        let mut cfg = AuthConfig::default();
        cfg.cookie_name = "sid".to_string();
        cfg.session_ttl_days = 7;

        assert_eq!(
            session_cookie(&cfg, "tok", true),
            "sid=tok; Path=/; HttpOnly; SameSite=Lax; Max-Age=604800"
        );
        assert!(!session_cookie(&cfg, "tok", false).contains("Max-Age"));

        cfg.cookie_secure = true;
        assert!(session_cookie(&cfg, "tok", false).ends_with("; Secure"));
        assert!(clear_cookie(&cfg).contains("Max-Age=0"));
    }
}
