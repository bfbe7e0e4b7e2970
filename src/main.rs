//! `newsrec` command-line interface.
//!
//! ```bash
//! newsrec recommend --query "mental health" --documents catalog.json \
//!     --history seen.json --record -n 3
//! newsrec normalize-name "King Jr., Martin Luther"
//! newsrec normalize-date "Feb 14 2023"
//! newsrec articles --input mostpopular.json --output catalog.json \
//!     --since 2025-01-01 --until "Jan 07 2025" --strip-captions
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use newsrec::{
    articles_to_documents, build_recommender, filter_by_published_date, format_hit,
    normalize_date, normalize_person_name, parse_articles, read_documents, read_history,
    write_documents, write_history, Article, DateRange, History, NewsrecConfig, Session,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "newsrec")]
#[command(about = "Semantic news recommendations that skip what you have already read")]
#[command(version)]
struct Cli {
    /// Log filter used when RUST_LOG is not set.
    #[arg(long, global = true, env = "NEWSREC_LOG", default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rank catalog documents by closeness to a query.
    Recommend(RecommendArgs),
    /// Rewrite "Last, First" names into display order.
    NormalizeName {
        /// One or more names.
        #[arg(required = true)]
        names: Vec<String>,
    },
    /// Rewrite dates such as "Feb 14 2023" or "14/02/2023" as YYYY-MM-DD.
    NormalizeDate {
        /// One or more dates.
        #[arg(required = true)]
        dates: Vec<String>,
    },
    /// Reshape raw news-article JSON into a recommendable catalog.
    Articles(ArticlesArgs),
}

#[derive(Debug, Args)]
struct RecommendArgs {
    /// Free-text query.
    #[arg(short, long)]
    query: String,

    /// JSON array of documents.
    #[arg(short, long)]
    documents: PathBuf,

    /// JSON array of already-seen ids. A missing file is an empty history.
    #[arg(long)]
    history: Option<PathBuf>,

    /// Number of results; defaults to `recommend.default_results`.
    #[arg(short)]
    n: Option<usize>,

    /// Append the returned ids to the history file.
    #[arg(long, requires = "history")]
    record: bool,

    /// YAML config file.
    #[arg(short, long, env = "NEWSREC_CONFIG")]
    config: Option<PathBuf>,

    /// Use the offline stub embedder instead of the configured API.
    #[arg(long)]
    stub: bool,
}

#[derive(Debug, Args)]
struct ArticlesArgs {
    /// Raw API response (`{"results": [...]}`) or a bare array of articles.
    #[arg(short, long)]
    input: PathBuf,

    /// Write the catalog here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Keep only the first N articles.
    #[arg(long)]
    limit: Option<usize>,

    /// Drop articles published before this date (inclusive bound).
    #[arg(long)]
    since: Option<String>,

    /// Drop articles published after this date (inclusive bound).
    #[arg(long)]
    until: Option<String>,

    /// Remove photo captions and credits from abstracts.
    #[arg(long)]
    strip_captions: bool,
}

fn load_dotenv() {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }
}

fn init_tracing(level: &str, json: bool) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .context("invalid log filter")?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))
}

async fn run_recommend(args: RecommendArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(path) => NewsrecConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NewsrecConfig::default(),
    };
    if args.stub {
        cfg.semantic.mode = "stub".into();
    }
    cfg.apply_env();

    let recommender = build_recommender(&cfg).context("building recommender")?;
    let documents = read_documents(&args.documents)?;
    let history = match &args.history {
        Some(path) => read_history(path)?,
        None => History::new(),
    };
    let n = args.n.unwrap_or(cfg.recommend.default_results);

    let hits = match (&args.history, args.record) {
        (Some(path), true) => {
            let mut session = Session::with_history(Arc::new(recommender), history);
            let hits = session.recommend(&args.query, &documents, n).await?;
            write_history(path, session.history())?;
            hits
        }
        _ => {
            recommender
                .recommend(&args.query, &documents, &history, n)
                .await?
        }
    };

    if hits.is_empty() {
        println!("No new articles to recommend.");
    }
    for hit in &hits {
        println!("{}", format_hit(hit, &cfg.recommend));
    }
    Ok(())
}

fn run_articles(args: ArticlesArgs) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let raw: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("parsing {}", args.input.display()))?;

    let range = DateRange::parse(args.since.as_deref(), args.until.as_deref())?;
    let parsed = parse_articles(&raw, args.limit)?;
    let total = parsed.len();
    let mut articles = filter_by_published_date(parsed, &range);
    if args.strip_captions {
        articles = articles.into_iter().map(Article::without_captions).collect();
    }
    let documents = articles_to_documents(&articles);
    tracing::info!(
        count = documents.len(),
        outside_range = total - documents.len(),
        "reshaped articles"
    );

    match &args.output {
        Some(path) => write_documents(path, &documents)?,
        None => println!("{}", serde_json::to_string_pretty(&documents)?),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.log_json)?;

    match cli.command {
        Command::Recommend(args) => run_recommend(args).await,
        Command::NormalizeName { names } => {
            for name in names {
                println!("{}", normalize_person_name(&name));
            }
            Ok(())
        }
        Command::NormalizeDate { dates } => {
            for date in dates {
                println!("{}", normalize_date(&date)?);
            }
            Ok(())
        }
        Command::Articles(args) => run_articles(args),
    }
}
