use scraper::Html;
use tracing::debug;

use crate::submission::Submission;

/// 尚未实现的站点：不填任何字段，调用方据此判断为不支持的来源
pub fn extract(_doc: &Html, submission: &mut Submission) {
    debug!("跳过抽取: {}", submission.url);
}
