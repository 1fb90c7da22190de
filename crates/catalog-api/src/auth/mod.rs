//! 인증.
//!
//! 토큰 기반 신원 확인을 제공합니다.
//!
//! # 구성 요소
//!
//! - [`TokenService`]: Access/Refresh Token 발급 및 검증
//! - [`JwtAuth`]: Access Token 검증 추출기, [`BearerToken`]: 토큰 원문 추출기
//! - [`hash_password`], [`verify_password`]: Argon2 비밀번호 해싱
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! // 보호된 라우트에서 JwtAuth 추출기 사용
//! async fn protected_handler(
//!     JwtAuth(identity): JwtAuth,
//! ) -> impl IntoResponse {
//!     format!("Hola, {}!", identity.user_id)
//! }
//! ```

mod jwt;
mod middleware;
mod password;

pub use jwt::{Claims, Identity, JwtError, TokenKind, TokenPair, TokenService};
pub use middleware::{BearerToken, JwtAuth, JwtAuthError};
pub use password::{hash_password, verify_password, PasswordError};
