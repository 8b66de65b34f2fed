pub mod arxiv;
pub mod dispatch;
pub mod passthrough;

pub use dispatch::{extract, route_for, Route, Source, ROUTES};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;
use tracing::warn;

use crate::utils::{DeskError, DeskResult};

static HTML_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("invalid comment regex"));

static RELATIVE_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="/([^/"])"#).expect("invalid href regex"));

static PARENTHETICAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^()]*\)").expect("invalid parenthesis regex"));

/// 常见二进制文件头，抓到这些说明拿到的不是网页
/// PNG 的首字节 0x89 不是合法UTF-8，按文本读出来会变成替换字符
const BINARY_SIGNATURES: &[&str] = &[
    "%PDF-",
    "PK\u{3}\u{4}",
    "GIF87a",
    "GIF89a",
    "\u{fffd}PNG",
];

/// 去掉注释后解析HTML；内容是PDF等二进制时直接失败
pub fn parse_markup(html: &str, url: &str) -> DeskResult<Html> {
    let head = html.trim_start();
    if html.contains('\0') || BINARY_SIGNATURES.iter().any(|sig| head.starts_with(sig)) {
        warn!("{} 返回的不是HTML", url);
        return Err(DeskError::NotMarkup(url.to_string()));
    }

    let cleaned = HTML_COMMENT.replace_all(html, "");
    Ok(Html::parse_document(&cleaned))
}

/// 逐字段抽取：单个字段失败只降级该字段并记下软错误
#[derive(Debug, Default)]
pub struct FieldGrabber {
    pub soft_error: bool,
}

impl FieldGrabber {
    pub fn new() -> Self {
        Self::default()
    }

    /// 失败时返回 "Error Grabbing <field>"
    pub fn text(&mut self, field: &str, attempt: impl FnOnce() -> Option<String>) -> String {
        self.or(field, placeholder(field), attempt)
    }

    pub fn or<T>(&mut self, field: &str, fallback: T, attempt: impl FnOnce() -> Option<T>) -> T {
        match attempt() {
            Some(value) => value,
            None => {
                warn!("抽取 {} 失败", field);
                self.soft_error = true;
                fallback
            }
        }
    }
}

pub fn placeholder(field: &str) -> String {
    format!("Error Grabbing {field}")
}

/// 把 href="/..." 形式的站内链接补成绝对地址
pub fn absolutize_links(html: &str, base: &str) -> String {
    let replacement = format!("href=\"{}/${{1}}", base.trim_end_matches('/'));
    RELATIVE_HREF.replace_all(html, replacement.as_str()).into_owned()
}

/// 去掉括号里的单位注释，做两遍以处理嵌套括号
pub fn strip_parentheticals(s: &str) -> String {
    let once = PARENTHETICAL.replace_all(s, "");
    PARENTHETICAL.replace_all(&once, "").into_owned()
}
