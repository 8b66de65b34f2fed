//! arXiv 摘要页抽取

use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

use super::{absolutize_links, placeholder, strip_parentheticals, FieldGrabber};
use crate::submission::Submission;

const ARXIV_HOST: &str = "http://arxiv.org";
/// 作者栏最多显示几位
const MAX_LISTED_AUTHORS: usize = 4;

pub fn extract(doc: &Html, submission: &mut Submission) {
    let mut grab = FieldGrabber::new();

    submission.title = grab.text("Title", || title(doc));

    let (author, author_number) = grab.or(
        "Authors",
        (placeholder("Authors"), submission.author_number),
        || authors(doc),
    );
    submission.author = author;
    submission.author_number = author_number;

    submission.date = grab.text("Date", || revision_date(doc));
    submission.abstract_text = grab.text("Abstract", || abstract_text(doc));
    submission.sources = grab.or("Sources", String::new(), || sources(doc));
    submission.subject = grab.text("Subject", || subject(doc));

    submission.soft_error |= grab.soft_error;
}

fn first<'a>(doc: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel).next()
}

fn anchors(element: ElementRef<'_>) -> Option<Vec<String>> {
    let sel = Selector::parse("a").ok()?;
    Some(
        element
            .select(&sel)
            .map(|a| absolutize_links(&a.html(), ARXIV_HOST))
            .collect(),
    )
}

/// 标题是 h1 里 "Title:" 标签之后的文本
fn title(doc: &Html) -> Option<String> {
    let h1 = first(doc, "h1.title.mathjax")?;
    h1.children()
        .filter_map(|node| node.value().as_text())
        .map(|text| text.trim())
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

/// 返回 (前几位作者的链接串, 作者总数)
fn authors(doc: &Html) -> Option<(String, usize)> {
    let div = first(doc, "div.authors")?;
    let links = anchors(div)?;
    let listed = links
        .iter()
        .take(MAX_LISTED_AUTHORS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    Some((strip_parentheticals(&listed), links.len()))
}

/// 修订历史的最后一条，如 "Mon, 5 Sep 2016 18:41:12 UTC" 取 "5 Sep 2016"
fn revision_date(doc: &Html) -> Option<String> {
    let history = first(doc, "div.submission-history")?;
    let mut seen = HashSet::new();
    let last = history
        .text()
        .filter(|text| !text.trim().is_empty())
        .filter(|text| seen.insert(*text))
        .last()?;

    let tokens: Vec<&str> = last.split_whitespace().collect();
    if tokens.len() < 4 {
        return None;
    }
    Some(tokens[1..4].join(" "))
}

/// 摘要块的第三个子节点：跳过开头空白和 "Abstract:" 标签
fn abstract_text(doc: &Html) -> Option<String> {
    let block = first(doc, "blockquote.abstract.mathjax")?;
    let node = block.children().nth(2)?;
    let text = match node.value() {
        Node::Text(text) => text.trim().to_string(),
        Node::Element(_) => ElementRef::wrap(node)?.text().collect(),
        _ => return None,
    };
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

fn sources(doc: &Html) -> Option<String> {
    let full_text = first(doc, "div.full-text")?;
    let kept: Vec<String> = anchors(full_text)?
        .into_iter()
        .map(|link| {
            link.replace("PostScript", "PS")
                .replace("Other formats", "Other")
        })
        .filter(|link| !link.contains("license"))
        .collect();
    Some(kept.join(" "))
}

fn subject(doc: &Html) -> Option<String> {
    let span = first(doc, "span.primary-subject")?;
    let text = span.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
