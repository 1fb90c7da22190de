//! 카탈로그 시스템의 공통 에러 타입.

use thiserror::Error;

/// 핵심 에러.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 설정 소스 로드/역직렬화 에러
    #[error("설정 로드 실패: {0}")]
    Config(#[from] config::ConfigError),

    /// 값은 읽었지만 유효하지 않은 설정
    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),
}

/// 핵심 작업을 위한 Result 타입.
pub type CatalogResult<T> = Result<T, CatalogError>;

impl CatalogError {
    /// 잘못된 설정 에러 생성.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = CatalogError::invalid_config("port must be set");
        assert_eq!(err.to_string(), "잘못된 설정: port must be set");
    }
}
