//! 카테고리.

use serde::{Deserialize, Serialize};

/// 카테고리 레코드 (`categortia` 테이블).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Category {
    /// 대리 키
    pub id: i64,
    /// 카테고리 이름
    #[serde(rename = "nombre")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "nombre"))]
    pub name: String,
}

/// 카테고리 생성/수정 입력 (id 제외 전체 필드).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFields {
    pub name: String,
}

impl CategoryFields {
    /// 주어진 id로 레코드를 구성합니다.
    pub fn into_category(self, id: i64) -> Category {
        Category {
            id,
            name: self.name,
        }
    }
}
