pub mod logger;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DeskError {
    #[error("配置错误: {0}")]
    ConfigError(#[from] config::ConfigError),

    #[error("数据库错误: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("网络请求错误: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML序列化错误: {0}")]
    TomlError(#[from] toml::ser::Error),

    /// 所有地址变体都无法访问
    #[error("无法访问 {input}: {message}")]
    Unreachable { input: String, message: String },

    /// 抓取到的内容不是HTML（通常是PDF）
    #[error("内容无法解析为HTML: {0}")]
    NotMarkup(String),
}

pub type DeskResult<T> = Result<T, DeskError>;
