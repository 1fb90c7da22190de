//! Argon2id 비밀번호 해시.
//!
//! 저장 형식은 솔트가 포함된 PHC 문자열입니다. 평문은 어디에도 남기지 않습니다.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// 비밀번호 처리 에러.
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("비밀번호 해싱 실패")]
    HashingFailed,
}

/// 새 솔트로 해시를 만듭니다. 같은 입력이라도 결과는 매번 다릅니다.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|phc| phc.to_string())
        .map_err(|_| PasswordError::HashingFailed)
}

/// 저장된 해시와 비교합니다. 해석할 수 없는 해시는 불일치로 취급합니다.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|phc| {
            Argon2::default()
                .verify_password(password.as_bytes(), &phc)
                .is_ok()
        })
        .unwrap_or(false)
}
