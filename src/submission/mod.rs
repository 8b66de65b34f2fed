pub mod pipeline;

pub use pipeline::{get_submission, intake};

use chrono::{Local, NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::warn;

use crate::crawler::{resolver, Fetch};
use crate::parser::Source;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 一次投稿：从用户输入到抽取出的文献信息
#[derive(Debug, Clone, Serialize)]
pub struct Submission {
    pub url: String,
    pub author: String,
    pub author_number: usize,
    pub title: String,
    pub date_submitted: NaiveDateTime,
    pub date_extended: NaiveDateTime,
    /// 来源页面上最近一次修订的日期
    pub date: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub subject: String,
    pub sources: String,
    pub volunteer: Option<String>,
    pub discussed: bool,
    /// 是否产出了记录（字段级抽取失败不影响）
    pub ok: bool,
    pub error: Option<String>,
    /// 至少有一个字段没抽出来
    pub soft_error: bool,
    pub source: Option<Source>,
    #[serde(skip)]
    pub raw_input: String,
    #[serde(skip)]
    pub html: String,
    #[serde(skip)]
    pub is_arxiv: bool,
}

impl Submission {
    pub fn new(raw_input: &str) -> Self {
        Self::at(raw_input, Local::now().naive_local())
    }

    pub fn at(raw_input: &str, now: NaiveDateTime) -> Self {
        // 存储按秒精度
        let now = now.with_nanosecond(0).unwrap_or(now);
        Self {
            url: String::new(),
            author: String::new(),
            author_number: 0,
            title: String::new(),
            date_submitted: now,
            date_extended: now,
            date: String::new(),
            abstract_text: String::new(),
            subject: String::new(),
            sources: String::new(),
            volunteer: None,
            discussed: false,
            ok: true,
            error: None,
            soft_error: false,
            source: None,
            raw_input: raw_input.to_string(),
            html: String::new(),
            is_arxiv: false,
        }
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.ok = false;
        self.error = Some(message.into());
    }

    /// 按已解析的地址重新抓一次HTML，不做地址变体回退
    pub async fn retrieve_html<F: Fetch + ?Sized>(&mut self, fetcher: &F) {
        if self.url.is_empty() {
            return;
        }
        match resolver::fetch_once(fetcher, &self.url).await {
            Some(html) => self.html = html,
            None => {
                warn!("无法重新读取 {}", self.url);
                self.fail(format!("Error reading {}", self.url));
            }
        }
    }

    pub fn has_fields(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.date,
            &self.abstract_text,
            &self.subject,
            &self.sources,
        ]
        .iter()
        .any(|f| !f.is_empty())
    }

    /// 交给了未实现的站点抽取器，什么也没抽出来
    pub fn is_unsupported(&self) -> bool {
        self.ok && !self.has_fields() && self.source.map_or(false, |s| !s.is_supported())
    }

    pub fn submitted_at(&self) -> String {
        self.date_submitted.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn extended_at(&self) -> String {
        self.date_extended.format(TIMESTAMP_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetch::scripted::ScriptedFetcher;

    #[test]
    fn fresh_record_is_ok_and_empty() {
        let s = Submission::new("1604.03939");
        assert!(s.ok);
        assert!(s.error.is_none());
        assert!(!s.has_fields());
        assert_eq!(s.date_submitted, s.date_extended);
        assert_eq!(s.submitted_at().len(), 19);
    }

    #[test]
    fn unsupported_needs_a_stub_source() {
        let mut s = Submission::new("x");
        assert!(!s.is_unsupported());
        s.source = Some(Source::Web);
        assert!(s.is_unsupported());
        s.title = "Something".to_string();
        assert!(!s.is_unsupported());
    }

    #[test]
    fn html_is_not_serialized() {
        let mut s = Submission::new("x");
        s.html = "<html>secret</html>".to_string();
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"abstract\""));
    }

    #[tokio::test]
    async fn retrieve_html_fills_markup() {
        let fetcher = ScriptedFetcher::new().page("http://example.com", 200, "<p>hi</p>");
        let mut s = Submission::new("example.com");
        s.url = "http://example.com".to_string();
        s.retrieve_html(&fetcher).await;
        assert_eq!(s.html, "<p>hi</p>");
        assert!(s.ok);
    }

    #[tokio::test]
    async fn retrieve_html_records_address_on_failure() {
        let fetcher = ScriptedFetcher::new().page("http://example.com", 503, "");
        let mut s = Submission::new("example.com");
        s.url = "http://example.com".to_string();
        s.retrieve_html(&fetcher).await;
        assert!(!s.ok);
        assert_eq!(s.error.as_deref(), Some("Error reading http://example.com"));
    }

    #[tokio::test]
    async fn retrieve_html_skips_empty_address() {
        let fetcher = ScriptedFetcher::new();
        let mut s = Submission::new("whatever");
        s.retrieve_html(&fetcher).await;
        assert!(fetcher.requests().is_empty());
        assert!(s.ok);
    }
}
