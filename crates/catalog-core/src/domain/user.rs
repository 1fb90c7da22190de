//! 사용자 (자격증명 저장소 레코드).

use serde::{Deserialize, Serialize};

/// 사용자 레코드 (`usuario` 테이블).
///
/// 비밀번호 해시를 포함하므로 직렬화하지 않습니다. 외부로 노출할 때는
/// [`UserProfile`]을 사용합니다.
#[derive(Clone)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
pub struct User {
    /// 대리 키
    pub id: i64,
    /// 고유 식별자 (전화번호 등), 생성 후 변경 불가
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "numero"))]
    pub handle: String,
    /// 이름
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "nombre"))]
    pub given_name: String,
    /// 성
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "apellido"))]
    pub family_name: String,
    /// 솔트 포함 PHC 형식 해시
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "contrasena"))]
    pub password_hash: String,
}

impl User {
    /// 외부 노출용 프로필.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            handle: self.handle.clone(),
            given_name: self.given_name.clone(),
            family_name: self.family_name.clone(),
        }
    }
}

impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("handle", &self.handle)
            .field("given_name", &self.given_name)
            .field("family_name", &self.family_name)
            .field("password_hash", &"[REDACTED]")
            .finish()
    }
}

/// 신규 사용자 입력 (해시는 호출자가 미리 계산).
#[derive(Clone)]
pub struct NewUser {
    pub handle: String,
    pub given_name: String,
    pub family_name: String,
    pub password_hash: String,
}

impl NewUser {
    /// 주어진 id로 레코드를 구성합니다.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            handle: self.handle,
            given_name: self.given_name,
            family_name: self.family_name,
            password_hash: self.password_hash,
        }
    }
}

/// 사용자 공개 정보 (`usuario` 응답 객체).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct UserProfile {
    pub id: i64,
    #[serde(rename = "numero")]
    pub handle: String,
    #[serde(rename = "nombre")]
    pub given_name: String,
    #[serde(rename = "apellido")]
    pub family_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        NewUser {
            handle: "555".to_string(),
            given_name: "Ana".to_string(),
            family_name: "Gomez".to_string(),
            password_hash: "$argon2id$v=19$secret".to_string(),
        }
        .into_user(1)
    }

    #[test]
    fn test_profile_hides_password_hash() {
        let json = serde_json::to_value(sample_user().profile()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 1, "numero": "555", "nombre": "Ana", "apellido": "Gomez"})
        );
    }

    #[test]
    fn test_debug_redacts_password_hash() {
        let debug = format!("{:?}", sample_user());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("argon2id"));
    }
}
