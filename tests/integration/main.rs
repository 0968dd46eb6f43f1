//! Integration tests for wavecrawl
//!
//! `crawl_tests` drives the crawler against an in-memory site whose
//! downloader counts fetches and per-host concurrency. `http_tests` uses
//! wiremock to exercise the HTTP downloader and a full crawl end-to-end.

mod crawl_tests;
