//! 설정 관리.
//!
//! 애플리케이션 설정은 프로세스 시작 시 한 번 로드되며 이후 변경되지 않습니다.
//! 각 컴포넌트는 전역 조회 대신 이 구조체를 참조로 전달받습니다.
//!
//! # 소스 우선순위 (낮음 → 높음)
//!
//! 1. 내장 기본값
//! 2. `config/default.toml` (선택)
//! 3. `CATALOG__` 접두사 환경 변수 (예: `CATALOG__DATABASE__HOST`)

use std::net::SocketAddr;
use std::path::Path;

use rand::RngCore;
use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::error::{CatalogError, CatalogResult};
use crate::logging::{LogConfig, LogFormat};

/// Refresh Token 유효 기간 (초). 7일 고정.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 604_800;

/// 환경 변수 접두사.
pub const ENV_PREFIX: &str = "CATALOG";

/// 애플리케이션 설정.
#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// 서버 설정
    pub server: ServerConfig,
    /// 데이터베이스 설정
    pub database: DatabaseConfig,
    /// 인증 설정
    pub auth: AuthConfig,
    /// 로깅 설정
    pub logging: LoggingConfig,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
}

impl ServerConfig {
    /// 소켓 주소 반환.
    ///
    /// # Errors
    /// `host:port` 형식이 유효하지 않으면 `AddrParseError`를 반환합니다.
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

/// 저장소 백엔드 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL (운영)
    Postgres,
    /// 프로세스 내 메모리 (개발/테스트)
    Memory,
}

/// 데이터베이스 설정.
#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// 저장소 백엔드
    pub backend: StoreBackend,
    /// 호스트
    pub host: String,
    /// 포트
    pub port: u16,
    /// 사용자
    pub user: String,
    /// 비밀번호
    #[serde(deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    /// 데이터베이스 이름
    pub name: String,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 획득 타임아웃 (초)
    pub acquire_timeout_secs: u64,
}

/// 인증 설정.
///
/// 서명 키가 설정되지 않으면 로드 시점에 무작위 키를 한 번 생성합니다.
/// 이 경우 재시작 전에 발급된 토큰은 재시작 후 검증되지 않습니다.
#[derive(Debug, Deserialize)]
#[serde(from = "RawAuthConfig")]
pub struct AuthConfig {
    /// 토큰 서명 키
    pub secret_key: SecretString,
    /// 서명 키가 자동 생성되었는지 여부
    pub secret_generated: bool,
    /// Access Token 유효 기간 (분)
    pub access_token_minutes: i64,
}

#[derive(Deserialize)]
struct RawAuthConfig {
    #[serde(default)]
    secret_key: Option<String>,
    access_token_minutes: i64,
}

impl From<RawAuthConfig> for AuthConfig {
    fn from(raw: RawAuthConfig) -> Self {
        match raw.secret_key.filter(|s| !s.is_empty()) {
            Some(secret) => Self {
                secret_key: SecretString::from(secret),
                secret_generated: false,
                access_token_minutes: raw.access_token_minutes,
            },
            None => Self {
                secret_key: SecretString::from(generate_secret()),
                secret_generated: true,
                access_token_minutes: raw.access_token_minutes,
            },
        }
    }
}

/// `CATALOG__*` 환경 변수 소스.
///
/// 값은 문자열 그대로 전달되고 숫자 필드만 역직렬화 시점에 변환됩니다.
/// 숫자처럼 보이는 비밀번호나 서명 키의 앞자리 0이 사라지지 않습니다.
fn env_source() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator("__")
}

/// 32자 16진수 무작위 서명 키 생성.
fn generate_secret() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨 필터
    pub level: String,
    /// 로그 형식
    pub format: LogFormat,
    /// HTTP 요청 트레이스 출력 여부
    pub http_trace: bool,
}

impl From<&LoggingConfig> for LogConfig {
    fn from(config: &LoggingConfig) -> Self {
        LogConfig::new(config.level.clone())
            .with_format(config.format)
            .with_http_trace(config.http_trace)
    }
}

impl AppConfig {
    /// 기본값이 채워진 설정 빌더.
    pub fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError>
    {
        config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.backend", "postgres")?
            .set_default("database.host", "localhost")?
            .set_default("database.port", 5432)?
            .set_default("database.user", "postgres")?
            .set_default("database.password", "")?
            .set_default("database.name", "tienda_online")?
            .set_default("database.max_connections", 10)?
            .set_default("database.acquire_timeout_secs", 30)?
            .set_default("auth.access_token_minutes", 15)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("logging.http_trace", false)
    }

    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없으면 기본값과 환경 변수만 사용합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CatalogResult<Self> {
        let builder = Self::defaults()?
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(env_source());

        Self::from_builder(builder)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CatalogResult<Self> {
        Self::load("config/default.toml")
    }

    /// 준비된 빌더에서 설정을 만들고 검증합니다.
    pub fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> CatalogResult<Self> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 설정 값 검증.
    pub fn validate(&self) -> CatalogResult<()> {
        let access_minutes = self.auth.access_token_minutes;
        if access_minutes <= 0 {
            return Err(CatalogError::invalid_config(
                "auth.access_token_minutes must be positive",
            ));
        }
        if access_minutes.saturating_mul(60) >= REFRESH_TOKEN_TTL_SECS {
            return Err(CatalogError::invalid_config(
                "auth.access_token_minutes must be shorter than the refresh token lifetime",
            ));
        }

        if self.database.max_connections == 0 {
            return Err(CatalogError::invalid_config(
                "database.max_connections must be at least 1",
            ));
        }

        if self.database.backend == StoreBackend::Postgres && self.database.name.is_empty() {
            return Err(CatalogError::invalid_config("database.name must be set"));
        }

        Ok(())
    }
}
