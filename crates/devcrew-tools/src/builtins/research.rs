//! Web research adapter
//!
//! Searches through the DuckDuckGo Instant Answer API and extracts readable
//! text from pages. Rendering is split into pure helpers so it can be tested
//! without network access.

use crate::adapter::{Adapter, AdapterError, Args};
use crate::error::{Error, Result};
use crate::registry::{ToolCategory, ToolDefinition};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, warn};

/// Tool name exposed to the model
pub const RESEARCH_TOOL: &str = "web_research";

const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";
const TRUNCATION_MARKER: &str = "... (truncated)";
const NO_DETAILS: &str = "No detailed results found for this query";
const DOC_SITES: [&str; 2] = ["docs.python.org", "developer.mozilla.org"];

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("SCRIPT_BLOCK is a compile-time constant")
});
static STYLE_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style\s*>").expect("STYLE_BLOCK is a compile-time constant")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG is a compile-time constant"));

/// Research adapter settings
#[derive(Debug, Clone)]
pub struct ResearchConfig {
    /// Per-request timeout
    pub timeout: Duration,
    /// Scraped text longer than this is truncated
    pub max_chars: usize,
    /// Instant Answer API endpoint
    pub search_endpoint: String,
    /// User-Agent sent when scraping
    pub user_agent: String,
}

impl Default for ResearchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_chars: 2000,
            search_endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ResearchConfig {
    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the scrape truncation length
    #[must_use]
    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    /// Set the search endpoint
    #[must_use]
    pub fn with_search_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.search_endpoint = endpoint.into();
        self
    }
}

/// Web research operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResearchOperation {
    /// Instant Answer search
    Search {
        /// Search query
        query: String,
    },
    /// Readable text of a page
    Scrape {
        /// Page URL
        url: String,
    },
    /// Search restricted to documentation sites
    Documentation {
        /// Search query
        query: String,
    },
}

impl ResearchOperation {
    /// Operation tag
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Scrape { .. } => "scrape",
            Self::Documentation { .. } => "documentation",
        }
    }

    /// Parse a tool-call argument object
    pub fn from_args(value: &Value) -> std::result::Result<Self, AdapterError> {
        let operation = Args::operation(value, RESEARCH_TOOL)?;
        let args = Args::new(value, operation);

        match operation {
            "search" => Ok(Self::Search {
                query: args.non_empty("query")?,
            }),
            "scrape" => Ok(Self::Scrape {
                url: args.non_empty("url")?,
            }),
            "documentation" => Ok(Self::Documentation {
                query: args.non_empty("query")?,
            }),
            other => Err(AdapterError::UnsupportedOperation(other.to_string())),
        }
    }
}

/// Instant Answer API response, reduced to what is rendered
#[derive(Debug, Default, Deserialize)]
pub(crate) struct InstantAnswer {
    #[serde(rename = "Abstract", default)]
    abstract_text: String,
    #[serde(rename = "RelatedTopics", default)]
    related_topics: Vec<Value>,
}

/// Render an instant answer; short renderings mean nothing useful was found
pub(crate) fn format_search_results(query: &str, answer: &InstantAnswer) -> String {
    let mut result = format!("Search results for: {}\n\n", query);

    if !answer.abstract_text.is_empty() {
        result.push_str(&format!("Summary: {}\n\n", answer.abstract_text));
    }

    if !answer.related_topics.is_empty() {
        result.push_str("Related Topics:\n");
        for topic in answer.related_topics.iter().take(5) {
            if let Some(text) = topic.get("Text").and_then(Value::as_str) {
                result.push_str(&format!("- {}\n", text));
            }
        }
    }

    if result.chars().count() > 50 {
        result
    } else {
        NO_DETAILS.to_string()
    }
}

/// Readable text of an HTML document
pub(crate) fn extract_text(html: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(html, "");
    let without_styles = STYLE_BLOCK.replace_all(&without_scripts, "");
    let text = TAG.replace_all(&without_styles, "");
    let text = decode_entities(&text);

    text.lines()
        .map(str::trim)
        .flat_map(|line| line.split("  "))
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Cut `text` to `max_chars` characters, marking the cut
pub(crate) fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}{}", &text[..idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

/// Web research adapter
#[derive(Debug, Clone)]
pub struct WebResearchAdapter {
    client: reqwest::Client,
    config: ResearchConfig,
}

impl WebResearchAdapter {
    /// Create an adapter with its own HTTP client
    ///
    /// # Errors
    /// Returns [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: ResearchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Current settings
    #[must_use]
    pub fn config(&self) -> &ResearchConfig {
        &self.config
    }

    async fn search(&self, query: &str) -> std::result::Result<String, AdapterError> {
        let url = format!(
            "{}?q={}&format=json&no_html=1&skip_disambig=1",
            self.config.search_endpoint,
            urlencoding::encode(query)
        );
        debug!(query = %query, "Searching");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AdapterError::failed("search", e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(format!("Search failed with status code: {}", status.as_u16()));
        }

        // The API answers with a JS content type; parse from text
        let body = response
            .text()
            .await
            .map_err(|e| AdapterError::failed("search", e))?;
        let answer: InstantAnswer =
            serde_json::from_str(&body).map_err(|e| AdapterError::failed("search", e))?;

        Ok(format_search_results(query, &answer))
    }

    async fn scrape(&self, url: &str) -> std::result::Result<String, AdapterError> {
        debug!(url = %url, "Scraping");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.config.user_agent)
            .send()
            .await
            .map_err(|e| AdapterError::failed("scrape", e))?;

        let status = response.status();
        if !status.is_success() {
            return Ok(format!(
                "Failed to scrape URL. Status code: {}",
                status.as_u16()
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| AdapterError::failed("scrape", e))?;
        let text = truncate(&extract_text(&html), self.config.max_chars);

        Ok(format!("Content from {}:\n\n{}", url, text))
    }

    async fn documentation(&self, query: &str) -> String {
        let mut results = Vec::new();

        for site in DOC_SITES {
            let site_query = format!("site:{} {}", site, query);
            match self.search(&site_query).await {
                Ok(text) if text.starts_with("Search results for:") => results.push(text),
                Ok(_) => {}
                Err(e) => warn!(site = site, error = %e, "Documentation search failed"),
            }
        }

        if results.is_empty() {
            format!("No documentation found for: {}", query)
        } else {
            results.join("\n\n")
        }
    }
}

#[async_trait::async_trait]
impl Adapter for WebResearchAdapter {
    type Operation = ResearchOperation;

    fn definition() -> ToolDefinition {
        ToolDefinition::new(
            RESEARCH_TOOL,
            "Web research: search (DuckDuckGo instant answers), scrape (readable text of a URL) \
             or documentation (search Python and MDN docs). \
             Example: {\"operation\": \"search\", \"query\": \"REST API pagination\"}",
        )
        .with_category(ToolCategory::Search)
        .with_parameters(serde_json::json!({
            "type": "object",
            "properties": {
                "operation": {"type": "string", "enum": ["search", "scrape", "documentation"]},
                "query": {"type": "string", "description": "Search query"},
                "url": {"type": "string", "description": "URL to scrape"}
            },
            "required": ["operation"]
        }))
    }

    fn parse(args: &Value) -> std::result::Result<ResearchOperation, AdapterError> {
        ResearchOperation::from_args(args)
    }

    async fn invoke(&self, operation: ResearchOperation) -> std::result::Result<String, AdapterError> {
        match operation {
            ResearchOperation::Search { query } => self.search(&query).await,
            ResearchOperation::Scrape { url } => self.scrape(&url).await,
            ResearchOperation::Documentation { query } => Ok(self.documentation(&query).await),
        }
    }
}
