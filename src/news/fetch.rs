use super::model::{Category, FeedPage};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Articles requested per page.
pub const PAGE_SIZE: u32 = 3;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid api url {0}: {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered {0}")]
    Status(reqwest::StatusCode),

    #[error("response larger than {0} bytes")]
    TooLarge(usize),

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of feed pages. The controller only ever talks to this.
#[async_trait]
pub trait PageLoader {
    async fn load(&self, category: Option<Category>, page: u32) -> Result<FeedPage, FetchError>;
}

pub struct HttpLoader {
    client: Client,
    endpoint: Url,
}

impl HttpLoader {
    pub fn new(api_url: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(concat!("unbiased-news/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self { client, endpoint: news_endpoint(api_url)? })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn page_url(&self, category: Option<Category>, page: u32) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut q = url.query_pairs_mut();
            if let Some(c) = category {
                q.append_pair("category", c.as_str());
            }
            q.append_pair("page", &page.to_string());
            q.append_pair("pageSize", &PAGE_SIZE.to_string());
        }
        url
    }
}

#[async_trait]
impl PageLoader for HttpLoader {
    async fn load(&self, category: Option<Category>, page: u32) -> Result<FeedPage, FetchError> {
        let url = self.page_url(category, page);
        tracing::debug!(%url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Stream with a max size limit
        let max = max_body_bytes();
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let c = chunk?;
            if buf.len() + c.len() > max {
                return Err(FetchError::TooLarge(max));
            }
            buf.extend_from_slice(&c);
        }
        Ok(serde_json::from_slice(&buf)?)
    }
}

fn news_endpoint(api_url: &str) -> Result<Url, FetchError> {
    let joined = format!("{}/news", api_url.trim().trim_end_matches('/'));
    Url::parse(&joined).map_err(|e| FetchError::InvalidUrl(api_url.to_string(), e))
}

fn max_body_bytes() -> usize {
    // 2 MB cap; a page is three articles
    2 * 1024 * 1024
}
