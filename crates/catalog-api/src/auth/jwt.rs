//! JWT 토큰 처리.
//!
//! Access Token 및 Refresh Token 발급/검증 로직.
//!
//! 토큰은 저장되지 않습니다. 서버는 서명 키만 보유하며, Refresh Token은
//! 회전되거나 폐기 목록으로 관리되지 않습니다.

use std::fmt;
use std::sync::Arc;

use catalog_core::{AuthConfig, REFRESH_TOKEN_TTL_SECS};
use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// 토큰 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT 페이로드.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - 사용자 ID (문자열)
    pub sub: String,
    /// Issued At - 토큰 발급 시간 (Unix timestamp)
    pub iat: i64,
    /// Expiration - 토큰 만료 시간 (Unix timestamp)
    pub exp: i64,
    /// JWT ID - 토큰 고유 식별자
    pub jti: String,
    /// 토큰 종류
    pub token_type: TokenKind,
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `kind` - 토큰 종류
    /// * `ttl_secs` - 유효 기간 (초)
    pub fn new(user_id: i64, kind: TokenKind, ttl_secs: i64) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: kind,
        }
    }
}

/// 검증된 토큰에서 얻은 신원.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
}

/// Access Token + Refresh Token 페어.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// JWT 토큰 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("토큰 인코딩 실패: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
    #[error("잘못된 토큰 형식 또는 서명")]
    TokenInvalid,
    #[error("토큰이 만료되었습니다")]
    TokenExpired,
    #[error("{expected} 토큰이 필요하지만 {found} 토큰이 제시되었습니다")]
    TokenKindMismatch { expected: TokenKind, found: TokenKind },
}

struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// 토큰 발급/검증 서비스.
///
/// 서명 키 외에는 상태가 없으며, 복제 비용이 낮아 요청마다 공유할 수 있습니다.
#[derive(Clone)]
pub struct TokenService {
    keys: Arc<TokenKeys>,
    access_ttl_secs: i64,
}

impl TokenService {
    /// 서명 키와 Access Token 유효 기간(분)으로 생성.
    pub fn new(secret: &[u8], access_ttl_minutes: i64) -> Self {
        Self {
            keys: Arc::new(TokenKeys {
                encoding: EncodingKey::from_secret(secret),
                decoding: DecodingKey::from_secret(secret),
            }),
            access_ttl_secs: access_ttl_minutes * 60,
        }
    }

    /// 인증 설정에서 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            config.secret_key.expose_secret().as_bytes(),
            config.access_token_minutes,
        )
    }

    /// Access Token 발급.
    pub fn issue_access(&self, user_id: i64) -> Result<String, JwtError> {
        self.encode_claims(&Claims::new(user_id, TokenKind::Access, self.access_ttl_secs))
    }

    /// Refresh Token 발급 (유효 기간 7일 고정).
    pub fn issue_refresh(&self, user_id: i64) -> Result<String, JwtError> {
        self.encode_claims(&Claims::new(
            user_id,
            TokenKind::Refresh,
            REFRESH_TOKEN_TTL_SECS,
        ))
    }

    /// Access Token + Refresh Token 쌍 발급.
    pub fn issue_pair(&self, user_id: i64) -> Result<TokenPair, JwtError> {
        Ok(TokenPair {
            access_token: self.issue_access(user_id)?,
            refresh_token: self.issue_refresh(user_id)?,
        })
    }

    /// 토큰 검증.
    ///
    /// 서명, 만료, 종류를 차례로 확인합니다.
    ///
    /// # Errors
    ///
    /// - [`JwtError::TokenInvalid`]: 서명/형식 오류 또는 숫자가 아닌 subject
    /// - [`JwtError::TokenExpired`]: 만료된 토큰
    /// - [`JwtError::TokenKindMismatch`]: 기대한 종류와 다른 토큰
    pub fn verify(&self, token: &str, expected: TokenKind) -> Result<Identity, JwtError> {
        let claims = self.decode_claims(token)?;

        if claims.token_type != expected {
            return Err(JwtError::TokenKindMismatch {
                expected,
                found: claims.token_type,
            });
        }

        let user_id = claims.sub.parse().map_err(|_| JwtError::TokenInvalid)?;
        Ok(Identity { user_id })
    }

    /// Refresh Token으로 새 Access Token 발급.
    ///
    /// Refresh Token 자체는 그대로 유효합니다.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, JwtError> {
        let identity = self.verify(refresh_token, TokenKind::Refresh)?;
        self.issue_access(identity.user_id)
    }

    fn encode_claims(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys.encoding).map_err(JwtError::from)
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        decode::<Claims>(token, &self.keys.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                _ => JwtError::TokenInvalid,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-testing";

    fn service() -> TokenService {
        TokenService::new(TEST_SECRET, 15)
    }

    #[test]
    fn test_issue_and_verify_access() {
        let tokens = service();
        let token = tokens.issue_access(42).unwrap();

        let identity = tokens.verify(&token, TokenKind::Access).unwrap();
        assert_eq!(identity.user_id, 42);
    }

    #[test]
    fn test_refresh_lifetime_is_exactly_seven_days() {
        let tokens = service();
        let token = tokens.issue_refresh(1).unwrap();

        let claims = tokens.decode_claims(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 604_800);
        assert_eq!(claims.token_type, TokenKind::Refresh);
    }

    #[test]
    fn test_access_lifetime_shorter_than_refresh() {
        let tokens = service();
        let access = tokens.decode_claims(&tokens.issue_access(1).unwrap()).unwrap();

        assert_eq!(access.exp - access.iat, 15 * 60);
        assert!(access.exp - access.iat < REFRESH_TOKEN_TTL_SECS);
    }

    #[test]
    fn test_kind_mismatch() {
        let tokens = service();
        let pair = tokens.issue_pair(7).unwrap();

        assert!(matches!(
            tokens.verify(&pair.refresh_token, TokenKind::Access),
            Err(JwtError::TokenKindMismatch {
                expected: TokenKind::Access,
                found: TokenKind::Refresh
            })
        ));
        assert!(matches!(
            tokens.verify(&pair.access_token, TokenKind::Refresh),
            Err(JwtError::TokenKindMismatch { .. })
        ));
    }

    #[test]
    fn test_expired_token() {
        let tokens = service();
        let claims = Claims::new(1, TokenKind::Access, -10);
        let token = tokens.encode_claims(&claims).unwrap();

        assert!(matches!(
            tokens.verify(&token, TokenKind::Access),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_wrong_secret() {
        let token = service().issue_access(1).unwrap();
        let other = TokenService::new(b"another-secret-key-for-testing", 15);

        assert!(matches!(
            other.verify(&token, TokenKind::Access),
            Err(JwtError::TokenInvalid)
        ));
    }

    #[test]
    fn test_malformed_token() {
        assert!(matches!(
            service().verify("invalid.token.here", TokenKind::Access),
            Err(JwtError::TokenInvalid)
        ));
        assert!(matches!(
            service().verify("", TokenKind::Access),
            Err(JwtError::TokenInvalid)
        ));
    }

    #[test]
    fn test_non_numeric_subject() {
        let tokens = service();
        let mut claims = Claims::new(1, TokenKind::Access, 60);
        claims.sub = "admin".to_string();
        let token = tokens.encode_claims(&claims).unwrap();

        assert!(matches!(
            tokens.verify(&token, TokenKind::Access),
            Err(JwtError::TokenInvalid)
        ));
    }

    #[test]
    fn test_refresh_issues_access_for_same_identity() {
        let tokens = service();
        let pair = tokens.issue_pair(9).unwrap();

        let access = tokens.refresh(&pair.refresh_token).unwrap();
        assert_eq!(tokens.verify(&access, TokenKind::Access).unwrap().user_id, 9);

        // Refresh Token은 회전되지 않으므로 재사용 가능
        assert!(tokens.refresh(&pair.refresh_token).is_ok());

        assert!(matches!(
            tokens.refresh(&pair.access_token),
            Err(JwtError::TokenKindMismatch { .. })
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_identity_survives_round_trip(user_id in 1i64..i64::MAX / 2) {
            let tokens = service();
            let pair = tokens.issue_pair(user_id).unwrap();
            prop_assert_eq!(tokens.verify(&pair.access_token, TokenKind::Access).unwrap().user_id, user_id);
            prop_assert_eq!(tokens.verify(&pair.refresh_token, TokenKind::Refresh).unwrap().user_id, user_id);
        }
    }
}
