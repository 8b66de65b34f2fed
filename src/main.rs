use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use paperdesk::config::{AppConfig, SETTINGS_PATH};
use paperdesk::storage::{Board, Database, StoredSubmission};
use paperdesk::utils::logger;
use paperdesk::{get_submission, DeskError, HttpFetcher, Submission};

#[derive(Parser)]
#[command(name = "paperdesk")]
#[command(about = "收集组会要讨论的论文：提交链接或arXiv编号，自动抓取题目、作者和摘要", long_about = None)]
struct Cli {
    /// 输出调试日志
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 初始化配置和数据库
    Init,
    /// 提交一篇论文（链接、PDF链接或arXiv编号）
    Submit {
        input: String,
        /// 只抓取不入库
        #[arg(long)]
        dry_run: bool,
        /// 以JSON输出抓取结果
        #[arg(long)]
        json: bool,
    },
    /// 按地址重新抓取一次页面（不做地址回退）
    Fetch { url: String },
    /// 列出展示窗口内的投稿
    List {
        /// 窗口天数，默认取配置
        #[arg(short, long)]
        days: Option<i64>,
        #[arg(long)]
        json: bool,
    },
    /// 标记投稿为已讨论
    Discuss { id: i64 },
    /// 清空投稿表
    Clean,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(cli.verbose);

    match cli.command {
        Commands::Init => init_command().await?,
        Commands::Submit {
            input,
            dry_run,
            json,
        } => submit_command(&input, dry_run, json).await?,
        Commands::Fetch { url } => fetch_command(&url).await?,
        Commands::List { days, json } => list_command(days, json).await?,
        Commands::Discuss { id } => discuss_command(id).await?,
        Commands::Clean => clean_command().await?,
    }

    Ok(())
}

async fn open_database(config: &AppConfig) -> Result<Database> {
    if let Some(parent) = std::path::Path::new(&config.storage.database_path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let db = Database::new(&config.database_url()).await?;
    db.init_schema().await?;
    Ok(db)
}

async fn init_command() -> Result<()> {
    info!("初始化系统...");

    tokio::fs::create_dir_all("config").await?;
    if tokio::fs::try_exists(SETTINGS_PATH).await? {
        info!("配置文件已存在，保留: {}", SETTINGS_PATH);
    } else {
        AppConfig::default().save(SETTINGS_PATH)?;
        info!("已生成配置文件: {}", SETTINGS_PATH);
    }

    let config = AppConfig::load()?;
    open_database(&config).await?;
    info!("数据库初始化完成: {}", config.storage.database_path);

    info!("✅ 系统初始化完成！运行 'paperdesk submit <链接或arXiv编号>' 提交论文");
    Ok(())
}

async fn submit_command(input: &str, dry_run: bool, json: bool) -> Result<()> {
    let config = AppConfig::load()?;
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let submission = match get_submission(&fetcher, input).await {
        Ok(submission) => submission,
        Err(e @ (DeskError::Unreachable { .. } | DeskError::NotMarkup(_))) => {
            warn!("{}", e);
            println!("❌ 无法处理该链接或arXiv编号，请确认输入是否有效");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&submission)?);
    } else {
        print_submission(&submission);
    }

    if submission.is_unsupported() {
        println!("⚠️ 暂不支持从该网站抽取信息，仅记录链接");
    }

    if dry_run {
        return Ok(());
    }

    let db = open_database(&config).await?;
    let id = db.save_submission(&submission).await?;
    info!("投稿已保存，ID: {}", id);
    println!("✅ 提交成功，感谢分享！(ID {})", id);
    Ok(())
}

async fn fetch_command(url: &str) -> Result<()> {
    let config = AppConfig::load()?;
    let fetcher = HttpFetcher::new(&config.fetch)?;

    let mut submission = Submission::new(url);
    submission.url = url.to_string();
    submission.retrieve_html(&fetcher).await;

    match submission.error {
        Some(message) => println!("❌ {}", message),
        None => println!("✅ {} ({} 字节)", url, submission.html.len()),
    }
    Ok(())
}

async fn list_command(days: Option<i64>, json: bool) -> Result<()> {
    let config = AppConfig::load()?;
    let db = open_database(&config).await?;
    let window = days.unwrap_or(config.display.window_days);

    let now = chrono::Local::now().naive_local();
    let board = Board::from_rows(db.recent(now, window).await?);

    if json {
        println!("{}", serde_json::to_string_pretty(&board)?);
        return Ok(());
    }

    println!("最近 {} 天的投稿", window);
    print_rows("待讨论", &board.new_papers);
    print_rows("已讨论", &board.discussed_papers);
    Ok(())
}

async fn discuss_command(id: i64) -> Result<()> {
    let config = AppConfig::load()?;
    let db = open_database(&config).await?;
    if db.mark_discussed(id).await? {
        println!("✅ 投稿 {} 已标记为已讨论", id);
    } else {
        println!("❌ 没有ID为 {} 的投稿", id);
    }
    Ok(())
}

async fn clean_command() -> Result<()> {
    let config = AppConfig::load()?;
    let db = open_database(&config).await?;
    db.clear_all_tables().await?;
    println!("✅ 清理完成");
    Ok(())
}

fn print_submission(s: &Submission) {
    println!("地址: {}", s.url);
    if let Some(source) = s.source {
        println!("来源: {}", source.name());
    }
    if !s.title.is_empty() {
        println!("标题: {}", s.title);
    }
    if !s.author.is_empty() {
        println!("作者 ({}): {}", s.author_number, s.author);
    }
    if !s.date.is_empty() {
        println!("日期: {}", s.date);
    }
    if !s.subject.is_empty() {
        println!("分类: {}", s.subject);
    }
    if !s.abstract_text.is_empty() {
        println!("摘要: {}", s.abstract_text);
    }
    if !s.sources.is_empty() {
        println!("全文: {}", s.sources);
    }
    if s.soft_error {
        println!("⚠️ 部分字段未能抽取");
    }
}

fn print_rows(label: &str, rows: &[StoredSubmission]) {
    println!("── {} ({}) ──", label, rows.len());
    for row in rows {
        let title = if row.title.is_empty() { &row.url } else { &row.title };
        println!("  [{}] {}  {}", row.id, row.date_extended, title);
    }
}
