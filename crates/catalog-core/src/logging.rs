//! tracing 기반 구조화 로깅.
//!
//! 서버 프로세스당 한 번 [`init_logging`]을 호출합니다. 출력 형식은 설정의
//! `logging.format`으로 고르고, 레벨은 `RUST_LOG`가 있으면 그 값을 우선합니다.

use serde::Deserialize;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// 로그 출력 형식.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 여러 줄, 색상 포함 (개발용)
    #[default]
    Pretty,
    /// 한 줄 JSON (로그 수집기용)
    Json,
    /// 한 줄 텍스트
    Compact,
}

/// 로깅 초기화 옵션.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// 기본 필터 지시자 (예: "info", "catalog_api=debug")
    pub level: String,
    pub format: LogFormat,
    /// 요청 단위 HTTP 트레이스(`tower_http`)를 debug 레벨로 출력
    pub http_trace: bool,
}

impl LogConfig {
    pub fn new(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            format: LogFormat::default(),
            http_trace: false,
        }
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_http_trace(mut self, enabled: bool) -> Self {
        self.http_trace = enabled;
        self
    }

    /// 설정 값으로 필터 지시자 문자열을 만듭니다.
    fn directives(&self) -> String {
        if self.http_trace {
            format!("{},tower_http=debug", self.level)
        } else {
            self.level.clone()
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::new("info")
    }
}

fn build_filter(config: &LogConfig) -> Result<EnvFilter, tracing_subscriber::filter::ParseError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(config.directives()),
    }
}

fn format_layer(format: LogFormat) -> Box<dyn Layer<Registry> + Send + Sync> {
    match format {
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
        LogFormat::Json => fmt::layer().json().with_current_span(false).boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(false).boxed(),
    }
}

/// 전역 subscriber 설치.
///
/// 이미 설치되어 있거나 필터 지시자가 잘못되면 에러를 반환합니다.
///
/// ```no_run
/// use catalog_core::logging::{init_logging, LogConfig, LogFormat};
///
/// init_logging(LogConfig::new("catalog_api=debug").with_format(LogFormat::Json)).unwrap();
/// ```
pub fn init_logging(config: LogConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = build_filter(&config)?;

    tracing_subscriber::registry()
        .with(format_layer(config.format))
        .with(filter)
        .try_init()?;

    tracing::info!(format = ?config.format, level = %config.level, "Logging initialized");
    Ok(())
}
