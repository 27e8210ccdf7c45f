pub mod document;
pub mod feed;
pub mod feed_list;
pub mod traits;

pub use document::HtmlDocumentSource;
pub use feed::RssFeedSource;
pub use feed_list::OpmlFeedListSource;
pub use traits::{DocumentSource, FeedListSource, FeedSource};
