use tracing::{debug, info, warn};

use super::Submission;
use crate::crawler::{normalize, resolve, Fetch};
use crate::parser;
use crate::utils::{DeskError, DeskResult};

/// 规范化地址并找到可访问的页面；失败时把错误记在投稿上
pub async fn intake<F: Fetch + ?Sized>(fetcher: &F, raw: &str) -> Submission {
    let mut submission = Submission::new(raw);

    let normalized = normalize(raw);
    debug!("规范化: {:?} -> {} (arxiv={})", raw, normalized.url, normalized.is_arxiv);
    submission.is_arxiv = normalized.is_arxiv;

    match resolve(fetcher, &normalized.url).await {
        Some(resolved) => {
            submission.url = resolved.url;
            submission.html = resolved.html;
        }
        None => {
            submission.url.clear();
            submission.fail(format!("Error reading {raw}"));
        }
    }

    submission
}

/// 处理一条投稿：规范化、抓取、按来源抽取
pub async fn get_submission<F: Fetch + ?Sized>(fetcher: &F, raw: &str) -> DeskResult<Submission> {
    info!("处理投稿: {}", raw);
    let mut submission = intake(fetcher, raw).await;

    if submission.ok && submission.html.is_empty() {
        submission.retrieve_html(fetcher).await;
    }

    if !submission.ok {
        let message = submission.error.clone().unwrap_or_default();
        warn!("投稿处理失败: {}", message);
        return Err(DeskError::Unreachable {
            input: raw.to_string(),
            message,
        });
    }

    parser::extract(submission)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetch::scripted::ScriptedFetcher;
    use crate::parser::arxiv::tests::ABS_PAGE;
    use crate::parser::Source;

    #[tokio::test]
    async fn bare_arxiv_id_end_to_end() {
        let fetcher = ScriptedFetcher::new().page("http://arxiv.org/abs/1604.03939", 200, ABS_PAGE);

        let s = get_submission(&fetcher, "1604.03939").await.unwrap();
        assert_eq!(s.url, "http://arxiv.org/abs/1604.03939");
        assert!(s.is_arxiv);
        assert_eq!(s.source, Some(Source::Arxiv));
        assert!(s.ok);
        assert!(!s.soft_error);
        assert_eq!(s.title, "Testing the cosmic shear with strong lenses");
        assert_eq!(s.author_number, 5);
        assert_eq!(s.subject, "Cosmology and Nongalactic Astrophysics (astro-ph.CO)");
        assert!(!s.is_unsupported());
    }

    #[tokio::test]
    async fn pdf_payload_produces_no_record() {
        let fetcher = ScriptedFetcher::new().page(
            "http://example.com/paper.pdf",
            200,
            "%PDF-1.4\n1 0 obj << /Type /Catalog >> endobj",
        );
        let err = get_submission(&fetcher, "http://example.com/paper.pdf").await.unwrap_err();
        assert!(matches!(err, DeskError::NotMarkup(_)));
    }

    #[tokio::test]
    async fn unreachable_names_the_raw_input() {
        let fetcher = ScriptedFetcher::new();
        let s = intake(&fetcher, "nowhere.invalid/x").await;
        assert!(!s.ok);
        assert!(s.url.is_empty());
        assert_eq!(s.error.as_deref(), Some("Error reading nowhere.invalid/x"));

        let err = get_submission(&fetcher, "nowhere.invalid/x").await.unwrap_err();
        match err {
            DeskError::Unreachable { input, message } => {
                assert_eq!(input, "nowhere.invalid/x");
                assert_eq!(message, "Error reading nowhere.invalid/x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn schemeless_link_resolves_to_www_form() {
        let fetcher = ScriptedFetcher::new()
            .page("http://www.example.com/paper", 200, "<html><body>paper</body></html>");
        let s = get_submission(&fetcher, "example.com/paper").await.unwrap();
        assert_eq!(s.url, "http://www.example.com/paper");
    }

    #[tokio::test]
    async fn unknown_site_is_unsupported_not_an_error() {
        let fetcher = ScriptedFetcher::new()
            .page("http://www.example.com/blog", 200, "<html><h1>Blog</h1></html>");
        let s = get_submission(&fetcher, "http://www.example.com/blog").await.unwrap();
        assert!(s.ok);
        assert_eq!(s.source, Some(Source::Web));
        assert!(s.is_unsupported());
        assert!(s.title.is_empty());
    }

    #[tokio::test]
    async fn science_link_gets_full_suffix_before_fetching() {
        let fetcher = ScriptedFetcher::new().page(
            "https://science.sciencemag.org/content/123/456.full",
            200,
            "<html></html>",
        );
        let s = get_submission(&fetcher, "https://science.sciencemag.org/content/123/456")
            .await
            .unwrap();
        assert_eq!(s.url, "https://science.sciencemag.org/content/123/456.full");
        assert_eq!(s.source, Some(Source::Science));
        assert!(s.is_unsupported());
    }

    #[tokio::test]
    async fn empty_page_is_fetched_again() {
        let fetcher = ScriptedFetcher::new().page("http://www.example.com/empty", 200, "");
        let s = get_submission(&fetcher, "http://www.example.com/empty").await.unwrap();
        assert_eq!(
            fetcher.requests(),
            vec!["http://www.example.com/empty", "http://www.example.com/empty"]
        );
        assert!(s.is_unsupported());
    }
}
