//! JSON bodies exchanged with the scraper backend.
use docscrape_core::{Article, CallOutcome};
use serde::{Deserialize, Serialize};

/// Reply of `/launch-login` and `/check-auth`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl From<AckResponse> for CallOutcome {
    fn from(ack: AckResponse) -> Self {
        if ack.success {
            CallOutcome::Accepted {
                message: ack.message,
            }
        } else {
            CallOutcome::Refused {
                message: ack.message,
            }
        }
    }
}

/// Reply of every scrape route. Public routes omit `articles`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub markdown_content: Option<String>,
    #[serde(default)]
    pub articles: Option<Vec<ArticleDto>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ArticleDto {
    pub module_name: String,
    pub category_level_1: String,
    pub category_level_2: String,
    pub article_name: String,
    pub article_url: String,
    pub content: String,
    pub related_articles: Vec<String>,
}

impl From<ArticleDto> for Article {
    fn from(dto: ArticleDto) -> Self {
        Article {
            module_name: dto.module_name,
            category_level_1: dto.category_level_1,
            category_level_2: dto.category_level_2,
            article_name: dto.article_name,
            article_url: dto.article_url,
            content: dto.content,
            related_articles: dto.related_articles,
        }
    }
}

impl From<&Article> for ArticleDto {
    fn from(article: &Article) -> Self {
        ArticleDto {
            module_name: article.module_name.clone(),
            category_level_1: article.category_level_1.clone(),
            category_level_2: article.category_level_2.clone(),
            article_name: article.article_name.clone(),
            article_url: article.article_url.clone(),
            content: article.content.clone(),
            related_articles: article.related_articles.clone(),
        }
    }
}
