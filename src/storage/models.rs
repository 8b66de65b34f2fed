use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredSubmission {
    pub id: i64,
    pub url: String,
    pub author: String,
    pub author_number: i64,
    pub title: String,
    pub date_submitted: String,
    pub date_extended: String,
    #[sqlx(rename = "abstract")]
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub subject: String,
    pub sources: String,
    pub volunteer: Option<String>,
    pub discussed: bool,
}

/// 展示窗口内的投稿，按是否已讨论分成两栏
#[derive(Debug, Default, Serialize)]
pub struct Board {
    pub new_papers: Vec<StoredSubmission>,
    pub discussed_papers: Vec<StoredSubmission>,
}

impl Board {
    pub fn from_rows(rows: Vec<StoredSubmission>) -> Self {
        let (discussed_papers, new_papers) = rows.into_iter().partition(|row| row.discussed);
        Self {
            new_papers,
            discussed_papers,
        }
    }
}
