//! 상품.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 상품 레코드 (`producto` 테이블).
///
/// `category_id`는 존재하는 카테고리를 가리켜야 하지만, 이는 저장소 제약이 아니라
/// 애플리케이션 수준의 참조 검사로 보장됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx-support", derive(sqlx::FromRow))]
#[cfg_attr(feature = "utoipa-support", derive(utoipa::ToSchema))]
pub struct Product {
    /// 대리 키
    pub id: i64,
    /// 상품 이름
    #[serde(rename = "nombre")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "nombre"))]
    pub name: String,
    /// 가격
    #[serde(rename = "precio", with = "rust_decimal::serde::float")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "precio"))]
    #[cfg_attr(feature = "utoipa-support", schema(value_type = f64))]
    pub price: Decimal,
    /// 설명 (선택)
    #[serde(rename = "descripcion")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "descripcion"))]
    pub description: Option<String>,
    /// 소속 카테고리 id
    #[serde(rename = "categortia_id")]
    #[cfg_attr(feature = "sqlx-support", sqlx(rename = "categortia_id"))]
    pub category_id: i64,
}

/// 상품 생성/수정 입력 (id 제외 전체 필드).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFields {
    pub name: String,
    pub price: Decimal,
    pub description: Option<String>,
    pub category_id: i64,
}

impl ProductFields {
    /// 주어진 id로 레코드를 구성합니다.
    pub fn into_product(self, id: i64) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            description: self.description,
            category_id: self.category_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_product_wire_format() {
        let product = ProductFields {
            name: "Cola".to_string(),
            price: dec!(10.5),
            description: None,
            category_id: 1,
        }
        .into_product(7);

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 7,
                "nombre": "Cola",
                "precio": 10.5,
                "descripcion": null,
                "categortia_id": 1
            })
        );
    }
}
