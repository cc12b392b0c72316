//! Paginated lists: the document feed and the document detail feed.

mod detail_feed;
mod document_feed;
mod pager;

pub use detail_feed::{DetailKey, DocumentDetailFeed};
pub use document_feed::DocumentFeed;
pub use pager::{ActiveCount, ActiveCountGuard, FetchOutcome, InFlight, InFlightGuard, PageState};
