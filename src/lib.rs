//! paperdesk — 把投稿的链接或arXiv编号整理成文献条目

pub mod config;
pub mod crawler;
pub mod parser;
pub mod storage;
pub mod submission;
pub mod utils;

pub use crawler::{Fetch, HttpFetcher};
pub use submission::{get_submission, Submission};
pub use utils::{DeskError, DeskResult};
