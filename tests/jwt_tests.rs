//! 访问令牌编解码测试
//!
//! 签发、过期、签名篡改与密钥不匹配

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chirpy::auth::{jwt::JwtService, AuthError};
use chrono::Duration;
use uuid::Uuid;

const SECRET: &[u8] = b"test_secret_key_32_characters_long!";
const OTHER_SECRET: &[u8] = b"another_secret_key_32_characters_long";

fn flip_signature_bit(token: &str) -> String {
    let (message, signature) = token.rsplit_once('.').unwrap();
    let mut bytes = URL_SAFE_NO_PAD.decode(signature).unwrap();
    bytes[0] ^= 0x01;
    format!("{}.{}", message, URL_SAFE_NO_PAD.encode(bytes))
}

#[test]
fn test_validate_returns_subject_within_lifetime() {
    let service = JwtService::new(SECRET).unwrap();
    let user_id = Uuid::new_v4();

    let token = service.issue(user_id, Duration::minutes(5)).unwrap();

    assert_eq!(service.validate(&token), Ok(user_id));
}

#[test]
fn test_expired_token() {
    let service = JwtService::new(SECRET).unwrap();

    let token = service.issue(Uuid::new_v4(), Duration::seconds(-1)).unwrap();

    assert_eq!(service.validate(&token), Err(AuthError::Expired));
}

#[test]
fn test_expired_is_reported_before_signature() {
    let service = JwtService::new(SECRET).unwrap();
    let foreign = JwtService::new(OTHER_SECRET).unwrap();

    let token = foreign.issue(Uuid::new_v4(), Duration::seconds(-60)).unwrap();
    assert_eq!(service.validate(&token), Err(AuthError::Expired));

    let tampered = flip_signature_bit(&service.issue(Uuid::new_v4(), Duration::zero()).unwrap());
    assert_eq!(service.validate(&tampered), Err(AuthError::Expired));
}

#[test]
fn test_single_bit_signature_change() {
    let service = JwtService::new(SECRET).unwrap();
    let token = service.issue_access_token(Uuid::new_v4()).unwrap();

    let tampered = flip_signature_bit(&token);

    assert_ne!(token, tampered);
    assert_eq!(service.validate(&tampered), Err(AuthError::BadSignature));
}

#[test]
fn test_wrong_secret() {
    let service = JwtService::new(SECRET).unwrap();
    let foreign = JwtService::new(OTHER_SECRET).unwrap();

    let token = foreign.issue_access_token(Uuid::new_v4()).unwrap();

    assert_eq!(service.validate(&token), Err(AuthError::BadSignature));
}

#[test]
fn test_malformed_tokens() {
    let service = JwtService::new(SECRET).unwrap();

    for token in ["", "abc", "a.b.c", "a.b", "...."] {
        assert_eq!(service.validate(token), Err(AuthError::MalformedToken), "{}", token);
    }
}

#[test]
fn test_errors_do_not_echo_token() {
    let service = JwtService::new(SECRET).unwrap();
    let token = service.issue(Uuid::new_v4(), Duration::seconds(-1)).unwrap();

    let message = service.validate(&token).unwrap_err().to_string();
    assert!(!message.contains(&token));
}
