pub mod feed;
pub mod feed_fetcher;
pub mod merge;
pub mod ranking;
pub mod resolver;
pub mod streak;

pub use feed::normalize_feed;
pub use feed_fetcher::FeedFetcher;
pub use merge::{merge_teams, toggle_result};
pub use ranking::{sort_standings, standings_order};
pub use resolver::{resolver_for, ContainsResolver, JaroResolver, NameResolver};
pub use streak::{momentum_score, parse_streak};
