use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::utils::DeskResult;

pub const SETTINGS_PATH: &str = "config/settings.toml";
const ENV_PREFIX: &str = "PAPERDESK";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub storage: StorageConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FetchConfig {
    pub user_agent: String,
    /// 单次请求超时（秒），不设置则使用HTTP客户端默认行为
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    pub database_path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// 首页展示最近多少天延长过的投稿
    pub window_days: i64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("paperdesk/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: "./data/paperdesk.db".to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { window_days: 7 }
    }
}

impl AppConfig {
    /// 读取 config/settings.toml（可选），再叠加 PAPERDESK__SECTION__KEY 环境变量
    pub fn load() -> DeskResult<Self> {
        Self::load_from(SETTINGS_PATH)
    }

    pub fn load_from(path: impl AsRef<Path>) -> DeskResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> DeskResult<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn database_url(&self) -> String {
        format!("sqlite:{}", self.storage.database_path)
    }
}
