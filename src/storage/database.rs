use chrono::{Duration, NaiveDateTime};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tracing::info;

use crate::storage::models::StoredSubmission;
use crate::submission::{Submission, TIMESTAMP_FORMAT};
use crate::utils::DeskResult;

pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> DeskResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                database_url
                    .parse::<sqlx::sqlite::SqliteConnectOptions>()?
                    .create_if_missing(true),
            )
            .await?;

        info!("数据库连接成功: {}", database_url);
        Ok(Self { pool })
    }

    /// 内存库只能有一个连接，否则每个连接看到的是不同的库
    #[cfg(test)]
    pub async fn in_memory() -> DeskResult<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn init_schema(&self) -> DeskResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS submissions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                author TEXT NOT NULL DEFAULT '',
                author_number INTEGER NOT NULL DEFAULT 0,
                title TEXT NOT NULL DEFAULT '',
                date_submitted TEXT NOT NULL,
                date_extended TEXT NOT NULL,
                abstract TEXT NOT NULL DEFAULT '',
                subject TEXT NOT NULL DEFAULT '',
                sources TEXT NOT NULL DEFAULT '',
                volunteer TEXT,
                discussed INTEGER NOT NULL DEFAULT 0
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_submissions_extended ON submissions (date_extended)",
        )
        .execute(&self.pool)
        .await?;

        info!("数据库表结构初始化完成");
        Ok(())
    }

    /// 保存投稿，返回新记录的ID
    pub async fn save_submission(&self, submission: &Submission) -> DeskResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO submissions (url, author, author_number, title, date_submitted,
                                     date_extended, abstract, subject, sources, volunteer, discussed)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&submission.url)
        .bind(&submission.author)
        .bind(submission.author_number as i64)
        .bind(&submission.title)
        .bind(submission.submitted_at())
        .bind(submission.extended_at())
        .bind(&submission.abstract_text)
        .bind(&submission.subject)
        .bind(&submission.sources)
        .bind(&submission.volunteer)
        .bind(submission.discussed)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// date_extended 落在 [now - days, now] 内的投稿
    pub async fn recent(&self, now: NaiveDateTime, days: i64) -> DeskResult<Vec<StoredSubmission>> {
        let since = (now - Duration::days(days)).format(TIMESTAMP_FORMAT).to_string();
        let until = now.format(TIMESTAMP_FORMAT).to_string();

        let rows = sqlx::query_as::<_, StoredSubmission>(
            r#"
            SELECT id, url, author, author_number, title, date_submitted, date_extended,
                   abstract, subject, sources, volunteer, discussed
            FROM submissions
            WHERE date_extended BETWEEN ? AND ?
            ORDER BY date_extended DESC, id DESC
            "#,
        )
        .bind(since)
        .bind(until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// 标记为已讨论，返回是否找到该记录
    pub async fn mark_discussed(&self, id: i64) -> DeskResult<bool> {
        let result = sqlx::query("UPDATE submissions SET discussed = 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn clear_all_tables(&self) -> DeskResult<()> {
        sqlx::query("DELETE FROM submissions")
            .execute(&self.pool)
            .await?;
        info!("已清空投稿表");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::Board;
    use chrono::NaiveDate;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 4, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn submission(title: &str, when: NaiveDateTime) -> Submission {
        let mut s = Submission::at("1604.03939", when);
        s.url = "http://arxiv.org/abs/1604.03939".to_string();
        s.title = title.to_string();
        s.author_number = 3;
        s
    }

    async fn db() -> Database {
        let db = Database::in_memory().await.unwrap();
        db.init_schema().await.unwrap();
        db
    }

    #[tokio::test]
    async fn saved_rows_come_back_in_window() {
        let db = db().await;
        db.save_submission(&submission("old", at(1, 12))).await.unwrap();
        db.save_submission(&submission("recent", at(10, 12))).await.unwrap();
        db.save_submission(&submission("newest", at(14, 9))).await.unwrap();

        let rows = db.recent(at(14, 12), 7).await.unwrap();
        let titles: Vec<&str> = rows.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["newest", "recent"]);
        assert_eq!(rows[0].author_number, 3);
        assert_eq!(rows[0].date_extended, "2016-04-14 09:00:00");
        assert!(!rows[0].discussed);
    }

    #[tokio::test]
    async fn discussed_rows_move_to_their_own_list() {
        let db = db().await;
        let first = db.save_submission(&submission("a", at(13, 8))).await.unwrap();
        db.save_submission(&submission("b", at(13, 9))).await.unwrap();

        assert!(db.mark_discussed(first).await.unwrap());
        assert!(!db.mark_discussed(9999).await.unwrap());

        let board = Board::from_rows(db.recent(at(14, 0), 7).await.unwrap());
        assert_eq!(board.new_papers.len(), 1);
        assert_eq!(board.new_papers[0].title, "b");
        assert_eq!(board.discussed_papers.len(), 1);
        assert_eq!(board.discussed_papers[0].title, "a");
    }

    #[tokio::test]
    async fn clear_empties_the_table() {
        let db = db().await;
        db.save_submission(&submission("a", at(13, 8))).await.unwrap();
        db.clear_all_tables().await.unwrap();
        assert!(db.recent(at(14, 0), 7).await.unwrap().is_empty());
    }
}
