//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: concurrent bookkeeping shared by the worker pools during one crawl
//! - `CrawlResult`: the immutable outcome handed back to the caller

mod crawl_state;
mod result;

// Re-export main types
pub use crawl_state::CrawlState;
pub use result::CrawlResult;
