use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::config::FetchConfig;
use crate::utils::DeskResult;

/// 一次GET请求的结果
#[derive(Debug, Clone)]
pub struct Page {
    pub status: u16,
    pub body: String,
}

impl Page {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// 网页抓取能力，管道只通过它访问网络
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &str) -> DeskResult<Page>;
}

pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> DeskResult<Self> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn get(&self, url: &str) -> DeskResult<Page> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("GET {} -> {} ({} 字节)", url, status, body.len());
        Ok(Page { status, body })
    }
}

/// 测试用的脚本化抓取器：按URL返回预置页面，未登记的URL视为网络故障
#[cfg(test)]
pub(crate) mod scripted {
    use super::*;
    use crate::utils::DeskError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct ScriptedFetcher {
        pages: HashMap<String, Page>,
        pub requested: Mutex<Vec<String>>,
    }

    impl ScriptedFetcher {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn page(mut self, url: &str, status: u16, body: &str) -> Self {
            self.pages.insert(
                url.to_string(),
                Page {
                    status,
                    body: body.to_string(),
                },
            );
            self
        }

        pub fn requests(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Fetch for ScriptedFetcher {
        async fn get(&self, url: &str) -> DeskResult<Page> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| {
                DeskError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    format!("no route to {url}"),
                ))
            })
        }
    }
}
