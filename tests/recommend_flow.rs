use std::sync::Arc;

use newsrec::{
    articles_to_documents, build_recommender, filter_by_published_date, parse_articles,
    read_history, write_history, Article, DateRange, Document, DocumentId, History,
    NewsrecConfig, RecommendError, Session,
};
use serde_json::json;
use tempfile::TempDir;

fn stub_config() -> NewsrecConfig {
    NewsrecConfig::from_yaml(
        r#"
version: "1.0"
semantic:
  mode: "stub"
  stub_dim: 64
  normalize: true
recommend:
  default_results: 2
"#,
    )
    .expect("stub config")
}

fn catalog() -> Vec<Document> {
    let raw = json!({
        "status": "OK",
        "results": [
            { "id": 1, "title": "Walking for Mental Health", "abstract": "A daily walk lifts mood.",
              "des_facet": ["Walking", "Mental Health and Disorders"], "per_facet": ["Murthy, Vivek H"] },
            { "id": 2, "title": "Markets Rally on Rate Cut", "abstract": "Stocks climbed.",
              "des_facet": ["Stocks and Bonds"], "per_facet": "" },
            { "id": 3, "title": "How to Sleep Better", "abstract": "Routines matter.",
              "des_facet": ["Sleep"], "per_facet": [] },
            { "id": 4, "title": "A New Running Craze", "abstract": "Everyone is jogging.",
              "des_facet": ["Running"], "per_facet": [] }
        ]
    });
    let articles = parse_articles(&raw, None).expect("articles");
    articles_to_documents(&articles)
}

#[tokio::test]
async fn session_exhausts_catalog_without_repeats() -> Result<(), RecommendError> {
    let cfg = stub_config();
    let recommender = Arc::new(build_recommender(&cfg)?);
    let docs = catalog();
    let mut session = Session::new(recommender);

    let mut seen = Vec::new();
    loop {
        let hits = session
            .recommend("exercise and wellbeing", &docs, cfg.recommend.default_results)
            .await?;
        if hits.is_empty() {
            break;
        }
        for hit in hits {
            assert!(!seen.contains(&hit.document.id), "repeat {}", hit.document.id);
            assert!((0.0..=2.0).contains(&hit.distance));
            seen.push(hit.document.id);
        }
    }

    assert_eq!(seen.len(), docs.len());
    assert_eq!(session.history().len(), docs.len());
    Ok(())
}

#[tokio::test]
async fn stub_ranking_is_deterministic() -> Result<(), RecommendError> {
    let cfg = stub_config();
    let a = build_recommender(&cfg)?;
    let b = build_recommender(&cfg)?;
    let docs = catalog();
    let history = History::new();

    let first = a.recommend("sleep", &docs, &history, 4).await?;
    let second = b.recommend("sleep", &docs, &history, 4).await?;

    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0].distance <= w[1].distance));
    Ok(())
}

#[tokio::test]
async fn persisted_history_is_honoured() -> Result<(), Box<dyn std::error::Error>> {
    let dir = TempDir::new()?;
    let path = dir.path().join("history.json");
    let cfg = stub_config();
    let recommender = Arc::new(build_recommender(&cfg)?);
    let docs = catalog();

    let mut session = Session::with_history(Arc::clone(&recommender), read_history(&path)?);
    let first = session.recommend("markets", &docs, 3).await?;
    write_history(&path, session.history())?;

    let reloaded = read_history(&path)?;
    assert_eq!(reloaded.len(), 3);

    let rest = recommender.recommend("markets", &docs, &reloaded, 3).await?;
    assert_eq!(rest.len(), 1);
    assert!(first
        .iter()
        .all(|hit| hit.document.id != rest[0].document.id));
    Ok(())
}

#[test]
fn article_ids_are_strings_and_people_are_normalized() {
    let docs = catalog();
    assert_eq!(docs[0].id, DocumentId::from("1"));
    assert_eq!(docs[0].field_text("per_facet"), "Vivek H Murthy");
    assert_eq!(docs[1].field_text("per_facet"), "");
}

#[tokio::test]
async fn date_window_limits_what_can_be_recommended() -> Result<(), Box<dyn std::error::Error>> {
    let raw = json!([
        { "id": 1, "title": "Old News", "published_date": "2024-12-30" },
        { "id": 2, "title": "New Year Walks", "published_date": "2025-01-01",
          "abstract": "Walkers head out.\nPhoto by Jane Doe" },
        { "id": 3, "title": "Undated Feature" },
        { "id": 4, "title": "Late Story", "published_date": "2025-01-09" }
    ]);
    let range = DateRange::parse(Some("01/01/2025"), Some("Jan 07 2025"))?;
    let articles: Vec<Article> = filter_by_published_date(parse_articles(&raw, None)?, &range)
        .into_iter()
        .map(Article::without_captions)
        .collect();
    assert_eq!(articles[0].summary, "Walkers head out.");

    let docs = articles_to_documents(&articles);
    let recommender = build_recommender(&stub_config())?;
    let hits = recommender.recommend("walks", &docs, &History::new(), 10).await?;

    let mut ids: Vec<DocumentId> = hits.into_iter().map(|hit| hit.document.id).collect();
    ids.sort_by_key(|id| id.to_string());
    assert_eq!(ids, vec![DocumentId::from("2"), DocumentId::from("3")]);
    Ok(())
}
