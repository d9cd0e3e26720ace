use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A single news item as served by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub url: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub category: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub published_at: String,
    // Bodies travel with the payload; cards only show the summary.
    #[allow(dead_code)]
    #[serde(deserialize_with = "null_as_empty")]
    pub content: String,
    #[allow(dead_code)]
    #[serde(deserialize_with = "null_as_empty")]
    pub unbiased_content: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub image_url: String,
}

impl Article {
    pub fn image(&self) -> Option<&str> {
        let s = self.image_url.trim();
        (!s.is_empty()).then_some(s)
    }
}

fn null_as_empty<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(d)?.unwrap_or_default())
}

/// One page of the `/news` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedPage {
    pub articles: Vec<Article>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    General,
    Politics,
    Business,
    Tech,
    Entertainment,
    Sports,
    Science,
    Health,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::General,
        Category::Politics,
        Category::Business,
        Category::Tech,
        Category::Entertainment,
        Category::Sports,
        Category::Science,
        Category::Health,
    ];

    /// Query value sent to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Politics => "politics",
            Category::Business => "business",
            Category::Tech => "tech",
            Category::Entertainment => "entertainment",
            Category::Sports => "sports",
            Category::Science => "science",
            Category::Health => "health",
        }
    }

    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    pub fn parse(name: &str) -> Option<Category> {
        let n = name.trim();
        Category::ALL.into_iter().find(|c| c.as_str().eq_ignore_ascii_case(n))
    }

    /// Position in the chip row, where 0 is "All".
    pub fn chip_index(category: Option<Category>) -> usize {
        match category {
            None => 0,
            Some(c) => Category::ALL.iter().position(|x| *x == c).map_or(0, |i| i + 1),
        }
    }

    pub fn from_chip_index(idx: usize) -> Option<Category> {
        if idx == 0 { None } else { Category::ALL.get(idx - 1).copied() }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
