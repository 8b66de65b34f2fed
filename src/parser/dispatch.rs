use scraper::Html;
use serde::Serialize;
use tracing::info;

use super::{arxiv, parse_markup, passthrough};
use crate::submission::Submission;
use crate::utils::DeskResult;

/// 处理投稿的站点抽取器
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Web,
    Nature,
    Ads,
    Arxiv,
    Aanda,
    Mnras,
    Science,
    PhysicsToday,
    Prl,
    VoxCharta,
    Vixra,
}

impl Source {
    pub fn name(self) -> &'static str {
        match self {
            Source::Web => "web",
            Source::Nature => "nature",
            Source::Ads => "ads",
            Source::Arxiv => "arxiv",
            Source::Aanda => "aanda",
            Source::Mnras => "mnras",
            Source::Science => "science",
            Source::PhysicsToday => "physicstoday",
            Source::Prl => "prl",
            Source::VoxCharta => "voxcharta",
            Source::Vixra => "vixra",
        }
    }

    /// 目前只有arXiv抽取器真正实现了
    pub fn is_supported(self) -> bool {
        matches!(self, Source::Arxiv)
    }
}

pub type ExtractFn = fn(&Html, &mut Submission);

/// 一条分发规则：地址包含任一片段（或是arXiv编号）即命中
pub struct Route {
    pub source: Source,
    pub patterns: &'static [&'static str],
    pub takes_arxiv_ids: bool,
    pub extract: ExtractFn,
}

impl Route {
    pub fn matches(&self, url: &str, is_arxiv: bool) -> bool {
        (self.takes_arxiv_ids && is_arxiv) || self.patterns.iter().any(|p| url.contains(p))
    }
}

/// 按顺序匹配，先具体后笼统
pub static ROUTES: &[Route] = &[
    Route {
        source: Source::Web,
        patterns: &["nature.com/news/"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Nature,
        patterns: &["nature.com"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Ads,
        patterns: &["adsabs.harvard.edu"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Arxiv,
        patterns: &["arxiv.org", "xxx.lanl.gov"],
        takes_arxiv_ids: true,
        extract: arxiv::extract,
    },
    Route {
        source: Source::Aanda,
        patterns: &["aanda.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Mnras,
        patterns: &["mnras.oxfordjournals.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Science,
        patterns: &["science.sciencemag.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::PhysicsToday,
        patterns: &["physicstoday.scitation.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Prl,
        patterns: &["journals.aps.org/prl/"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::VoxCharta,
        patterns: &["voxcharta.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
    Route {
        source: Source::Vixra,
        patterns: &["vixra.org"],
        takes_arxiv_ids: false,
        extract: passthrough::extract,
    },
];

static FALLBACK: Route = Route {
    source: Source::Web,
    patterns: &[],
    takes_arxiv_ids: false,
    extract: passthrough::extract,
};

pub fn route_for(url: &str, is_arxiv: bool) -> &'static Route {
    ROUTES
        .iter()
        .find(|route| route.matches(url, is_arxiv))
        .unwrap_or(&FALLBACK)
}

/// 解析已抓到的HTML并交给匹配的站点抽取器
pub fn extract(mut submission: Submission) -> DeskResult<Submission> {
    let doc = parse_markup(&submission.html, &submission.url)?;

    let route = route_for(&submission.url, submission.is_arxiv);
    info!("使用 {} 抽取器处理 {}", route.source.name(), submission.url);
    submission.source = Some(route.source);
    (route.extract)(&doc, &mut submission);

    if submission.is_unsupported() {
        info!("{} 抽取器尚未实现，未抽取到任何字段", route.source.name());
    }
    Ok(submission)
}
