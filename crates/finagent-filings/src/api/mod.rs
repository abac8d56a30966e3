//! External data-provider clients

pub mod finnhub;
pub mod sec_edgar;
pub mod yahoo_search;

pub use finnhub::{EarningsSurprise, FinnhubClient, MarketDataProvider, Quote, RecommendationTrend};
pub use sec_edgar::{CompanyFacts, SecEdgarClient, SecFiling, format_cik, pad_cik};
pub use yahoo_search::{TickerMatch, TickerSearchClient};
