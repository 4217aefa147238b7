use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// A titled, categorized text record held by the article store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub category: String,
}

/// On-disk shape of the backing file: `{ "articles": [ ... ] }`
#[derive(Debug, Deserialize)]
struct StoreFile {
    articles: Vec<Article>,
}

#[derive(Serialize)]
struct StoreFileRef<'a> {
    articles: &'a [Article],
}

/// JSON-file-backed collection of sample articles.
///
/// The store owns a path and an in-memory snapshot. The whole file is
/// loaded on open and rewritten on every mutation; there is no locking,
/// so concurrent writers against the same file race and the last write
/// wins.
#[derive(Debug)]
pub struct ArticleStore {
    path: PathBuf,
    articles: Vec<Article>,
}

impl ArticleStore {
    /// Open the store at `path`, loading the full collection into memory.
    ///
    /// A missing file is not an error: the store is initialized with the
    /// built-in seed articles and persisted immediately. A file that
    /// exists but does not parse is propagated as an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut store = Self {
            path,
            articles: Vec::new(),
        };
        store.load()?;
        Ok(store)
    }

    fn load(&mut self) -> Result<()> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => {
                let parsed: StoreFile = serde_json::from_str(&raw).with_context(|| {
                    format!("malformed article store file: {}", self.path.display())
                })?;
                debug!(count = parsed.articles.len(), path = %self.path.display(), "article store loaded");
                self.articles = parsed.articles;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "no article store found, seeding sample articles");
                self.articles = seed_articles();
                self.save().context("failed to persist seeded article store")?;
            }
            Err(e) => {
                return Err(anyhow::Error::new(e).context(format!(
                    "failed to read article store file: {}",
                    self.path.display()
                )));
            }
        }
        Ok(())
    }

    /// Rewrite the backing file from the in-memory snapshot. Not atomic:
    /// a crash mid-write can leave a truncated file behind.
    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create store directory: {}", parent.display())
                })?;
            }
        }
        let body = serde_json::to_string_pretty(&StoreFileRef {
            articles: &self.articles,
        })
        .context("failed to serialize article store")?;
        fs::write(&self.path, body).with_context(|| {
            format!("failed to write article store file: {}", self.path.display())
        })?;
        Ok(())
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All articles in insertion order.
    pub fn all(&self) -> &[Article] {
        &self.articles
    }

    /// Find one article by id. A miss is not an error.
    pub fn get(&self, id: u64) -> Option<&Article> {
        self.articles.iter().find(|a| a.id == id)
    }

    /// All articles whose category matches case-insensitively. Returns an
    /// empty vector when nothing matches.
    pub fn by_category(&self, category: &str) -> Vec<&Article> {
        let needle = category.to_lowercase();
        self.articles
            .iter()
            .filter(|a| a.category.to_lowercase() == needle)
            .collect()
    }

    /// Append a new article and persist the whole collection.
    ///
    /// The content is trimmed and the id assigned as one past the current
    /// maximum (1 for an empty store). If the write fails the appended
    /// article stays in memory; the next successful save flushes it.
    pub fn add(&mut self, title: &str, content: &str, category: &str) -> Result<u64> {
        let new_id = self.articles.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        self.articles.push(Article {
            id: new_id,
            title: title.to_string(),
            content: content.trim().to_string(),
            category: category.to_string(),
        });
        self.save()?;
        info!(id = new_id, path = %self.path.display(), "article added");
        Ok(new_id)
    }
}

/// The fixed set of three articles used to initialize an empty store.
fn seed_articles() -> Vec<Article> {
    vec![
        Article {
            id: 1,
            title: "Artificial Intelligence Revolution".to_string(),
            content: "Artificial Intelligence (AI) is rapidly transforming our world. \
                From self-driving cars and personalized recommendations to virtual assistants \
                and automated customer service, AI applications are everywhere. The technology \
                uses algorithms and large datasets to learn patterns, make decisions, and even \
                generate human-like text and images. While AI offers immense potential, it also \
                raises ethical concerns around bias, job displacement, and privacy. Understanding \
                how AI works is becoming increasingly important for both individuals and \
                organizations."
                .to_string(),
            category: "Technology".to_string(),
        },
        Article {
            id: 2,
            title: "Climate Change and Renewable Energy".to_string(),
            content: "Climate change represents one of the most pressing challenges of our time. \
                Rising global temperatures, melting ice caps, and extreme weather events are clear \
                indicators of the urgent need for action. Renewable energy sources like solar, \
                wind, and hydroelectric power offer promising solutions to reduce greenhouse gas \
                emissions. Governments worldwide are implementing policies to accelerate the \
                transition to clean energy, while businesses are investing heavily in sustainable \
                technologies. The shift towards renewable energy not only helps combat climate \
                change but also creates new economic opportunities and jobs in the green energy \
                sector."
                .to_string(),
            category: "Environment".to_string(),
        },
        Article {
            id: 3,
            title: "The Future of Remote Work".to_string(),
            content: "The COVID-19 pandemic fundamentally changed how we work, accelerating the \
                adoption of remote work technologies and practices. Companies that previously \
                resisted remote work were forced to adapt quickly, implementing video \
                conferencing, cloud-based collaboration tools, and flexible work arrangements. \
                Studies show that remote work can increase productivity and employee satisfaction \
                while reducing overhead costs for businesses. However, challenges remain, \
                including maintaining company culture, ensuring effective communication, and \
                addressing the digital divide. As we move forward, hybrid work models that \
                combine remote and in-office work are becoming the new standard."
                .to_string(),
            category: "Business".to_string(),
        },
    ]
}
