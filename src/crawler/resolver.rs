use tracing::{debug, info, warn};

use super::fetch::Fetch;

/// 成功访问到的地址及其HTML
#[derive(Debug, Clone)]
pub struct Resolved {
    pub url: String,
    pub html: String,
}

/// 依次尝试原地址、加 http:// 、加 http://www. ，返回第一个200的页面
pub async fn resolve<F: Fetch + ?Sized>(fetcher: &F, address: &str) -> Option<Resolved> {
    for candidate in candidates(address) {
        match fetcher.get(&candidate).await {
            Ok(page) if page.is_ok() => {
                info!("地址可访问: {}", candidate);
                return Some(Resolved {
                    url: candidate,
                    html: page.body,
                });
            }
            Ok(page) => debug!("{} 返回 {}", candidate, page.status),
            Err(e) => warn!("请求 {} 失败: {}", candidate, e),
        }
    }

    warn!("所有地址变体都无法访问: {}", address);
    None
}

/// 只请求一次，不做地址变体回退
pub async fn fetch_once<F: Fetch + ?Sized>(fetcher: &F, url: &str) -> Option<String> {
    match fetcher.get(url).await {
        Ok(page) if page.is_ok() => Some(page.body),
        Ok(page) => {
            warn!("重新抓取 {} 返回 {}", url, page.status);
            None
        }
        Err(e) => {
            warn!("重新抓取 {} 失败: {}", url, e);
            None
        }
    }
}

fn candidates(address: &str) -> Vec<String> {
    let mut out = vec![address.to_string()];
    if !address.starts_with("http://") {
        out.push(format!("http://{address}"));
        if !address.starts_with("http://www.") {
            out.push(format!("http://www.{address}"));
        }
    }
    out
}
