//! 도메인 모델.
//!
//! 필드 이름은 Rust 쪽에서는 영어, JSON 및 테이블 컬럼은 기존 시스템과의
//! 호환을 위해 스페인어 이름(`nombre`, `precio`, `categortia_id` 등)을 사용합니다.

pub mod category;
pub mod product;
pub mod user;

pub use category::{Category, CategoryFields};
pub use product::{Product, ProductFields};
pub use user::{NewUser, User, UserProfile};
