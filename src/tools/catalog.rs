//! Tools known to be served by the tool server.

use strum::{Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

use super::types::ToolParameters;

/// A named tool on the tool server, with its single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr, EnumString, EnumIter)]
pub enum ToolKind {
    #[strum(serialize = "web_crawl_tool")]
    WebCrawl,
    #[strum(serialize = "hello_tool")]
    Hello,
    #[strum(serialize = "yahoo_finance_tool")]
    YahooFinance,
    #[strum(serialize = "embedder_tool")]
    Embedder,
    #[strum(serialize = "similarity_search_tool")]
    SimilaritySearch,
}

impl ToolKind {
    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Key of the single payload entry the tool expects.
    pub fn argument(self) -> &'static str {
        match self {
            Self::WebCrawl | Self::SimilaritySearch => "query",
            Self::Hello => "name",
            Self::YahooFinance => "ticker",
            Self::Embedder => "text",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::WebCrawl => "Searches the web and crawls the top result.",
            Self::Hello => "Returns a hello message from the tool server.",
            Self::YahooFinance => "Fetches the latest price for a given ticker using Yahoo Finance.",
            Self::Embedder => "Embeds text into the hybrid search index.",
            Self::SimilaritySearch => "Returns indexed documents most similar to the query.",
        }
    }

    fn argument_description(self) -> &'static str {
        match self {
            Self::WebCrawl => "What to search the web for",
            Self::Hello => "Who to greet",
            Self::YahooFinance => "Stock ticker symbol, e.g. NVDA",
            Self::Embedder => "Text to index",
            Self::SimilaritySearch => "Search query",
        }
    }

    pub fn parameters(self) -> ToolParameters {
        ToolParameters::single_string(self.argument(), self.argument_description())
    }

    /// Tools offered to the reasoning engine.
    pub fn reasoning_tools() -> impl Iterator<Item = Self> {
        Self::iter().filter(|kind| matches!(kind, Self::WebCrawl | Self::Hello | Self::YahooFinance))
    }
}
