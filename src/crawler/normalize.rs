//! 把用户提交的链接或arXiv编号整理成统一的地址

pub const ARXIV_ABS_PREFIX: &str = "http://arxiv.org/abs/";

/// 纯数字编号至少要这么长才认为是arXiv编号，避免误判短数字
const MIN_ARXIV_ID_LEN: usize = 9;

/// 规范化后的地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub url: String,
    pub is_arxiv: bool,
}

pub fn normalize(raw: &str) -> Normalized {
    let url = clean_url(raw);
    to_arxiv_url(url)
}

/// 修正几个期刊网站常见的地址形态
pub fn clean_url(raw: &str) -> String {
    let mut url = raw.trim().to_string();

    // arXiv的PDF链接：只保留编号
    if url.contains("pdf") && url.contains("arxiv.org") {
        url = arxiv_id_from_pdf(&url);
    }

    // Science 需要指向全文页
    if url.contains("science.sciencemag.org") && !url.contains(".full") {
        url.push_str(".full");
    }

    // PRL 的PDF链接换成摘要页
    if url.contains("journals.aps.org/prl") && url.contains("/pdf/") {
        url = url.replace("/pdf/", "/abstract/");
    }

    url
}

fn arxiv_id_from_pdf(url: &str) -> String {
    match url.rfind("pdf/") {
        Some(idx) => {
            let id = &url[idx + "pdf/".len()..];
            id.strip_suffix(".pdf").unwrap_or(id).to_string()
        }
        None => url.to_string(),
    }
}

/// 识别 1604.03939 这类纯编号和 arXiv:1604.03939 这类简写
pub fn to_arxiv_url(url: String) -> Normalized {
    if is_numeric_id(&url) {
        let is_arxiv = url.len() >= MIN_ARXIV_ID_LEN;
        // 短数字只有带小数点才像编号，否则原样返回
        if is_arxiv || url.contains('.') {
            return Normalized {
                url: format!("{ARXIV_ABS_PREFIX}{url}"),
                is_arxiv,
            };
        }
    }

    let mentions_arxiv = url.contains("arxiv") || url.contains("arXiv");
    if mentions_arxiv && !url.contains(".org") && !url.contains(".gov") {
        return Normalized {
            url: format!("{ARXIV_ABS_PREFIX}{url}"),
            is_arxiv: true,
        };
    }

    Normalized {
        url,
        is_arxiv: false,
    }
}

fn is_numeric_id(s: &str) -> bool {
    let digits = s.chars().filter(|c| c.is_ascii_digit()).count();
    let dots = s.chars().filter(|&c| c == '.').count();
    digits > 0 && dots <= 1 && digits + dots == s.chars().count()
}
