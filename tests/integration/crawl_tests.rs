//! Crawl behavior against an in-memory site

use crate::support::FakeSite;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use wavecrawl::{CrawlError, FetchError, WebCrawler};

fn crawler(
    site: &Arc<FakeSite>,
    downloaders: usize,
    extractors: usize,
    per_host: usize,
) -> WebCrawler {
    WebCrawler::new(site.clone(), downloaders, extractors, per_host).unwrap()
}

fn error_urls(result: &wavecrawl::CrawlResult) -> BTreeSet<String> {
    result.errors.keys().cloned().collect()
}

#[tokio::test]
async fn test_failed_page_is_reported_and_not_explored() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/b", "https://a.com/c"])
            .failing("https://a.com/b")
            .page("https://a.com/c", &[]),
    );
    let crawler = crawler(&site, 4, 2, 2);

    let result = crawler.download("https://a.com/", 2).await.unwrap();

    assert_eq!(result.downloaded, vec!["https://a.com/", "https://a.com/c"]);
    assert_eq!(error_urls(&result), BTreeSet::from(["https://a.com/b".to_string()]));
    assert!(matches!(
        result.errors.get("https://a.com/b"),
        Some(FetchError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_allow_list_traverses_but_does_not_report_other_hosts() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://b.com/", "https://b.com/broken"])
            .page("https://b.com/", &["https://a.com/deep"])
            .failing("https://b.com/broken")
            .page("https://a.com/deep", &[]),
    );
    let crawler = crawler(&site, 4, 2, 2);

    let result = crawler
        .download_with_hosts("https://a.com/", 3, ["a.com"])
        .await
        .unwrap();

    assert_eq!(result.downloaded, vec!["https://a.com/", "https://a.com/deep"]);
    assert!(result.errors.is_empty());

    assert_eq!(site.fetch_count("https://b.com/"), 1);
    assert_eq!(site.fetch_count("https://b.com/broken"), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_url_is_fetched_twice() {
    // Cycles, self links and a diamond
    let site = Arc::new(
        FakeSite::new()
            .page(
                "https://a.com/",
                &["https://a.com/b", "https://a.com/c", "https://a.com/"],
            )
            .page(
                "https://a.com/b",
                &["https://a.com/c", "https://a.com/", "https://a.com/d"],
            )
            .page("https://a.com/c", &["https://a.com/b", "https://a.com/d", "https://a.com/d"])
            .page("https://a.com/d", &["https://a.com/", "https://a.com/e"])
            .page("https://a.com/e", &["https://a.com/b"]),
    );
    let crawler = crawler(&site, 8, 4, 8);

    let result = crawler.download("https://a.com/", 6).await.unwrap();

    assert_eq!(result.downloaded.len(), 5);
    for (url, count) in site.fetch_counts() {
        assert_eq!(count, 1, "{} fetched {} times", url, count);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_per_host_cap_is_respected() {
    let children: Vec<String> = (0..20).map(|i| format!("https://h.com/{}", i)).collect();
    let other: Vec<String> = (0..6).map(|i| format!("https://o.com/{}", i)).collect();

    let mut links: Vec<&str> = children.iter().map(String::as_str).collect();
    links.extend(other.iter().map(String::as_str));

    let mut site = FakeSite::new()
        .page("https://h.com/", &links)
        .with_latency(Duration::from_millis(20));
    for url in children.iter().chain(other.iter()) {
        site = site.page(url, &[]);
    }
    let site = Arc::new(site);
    let crawler = crawler(&site, 8, 2, 2);

    let result = crawler.download("https://h.com/", 2).await.unwrap();

    assert_eq!(result.downloaded.len(), 27);
    assert!(result.errors.is_empty());
    assert!(site.high_water("h.com") <= 2);
    assert!(site.high_water("o.com") <= 2);
    assert!(site.high_water("h.com") >= 1);
}

#[tokio::test]
async fn test_depth_bounds_reachability() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/0", &["https://a.com/1"])
            .page("https://a.com/1", &["https://a.com/2"])
            .page("https://a.com/2", &["https://a.com/3"])
            .page("https://a.com/3", &[]),
    );
    let crawler = crawler(&site, 2, 2, 2);

    let result = crawler.download("https://a.com/0", 0).await.unwrap();
    assert!(result.downloaded.is_empty());
    assert_eq!(site.fetch_count("https://a.com/0"), 0);

    let result = crawler.download("https://a.com/0", 1).await.unwrap();
    assert_eq!(result.downloaded, vec!["https://a.com/0"]);

    let result = crawler.download("https://a.com/0", 3).await.unwrap();
    assert_eq!(
        result.downloaded,
        vec!["https://a.com/0", "https://a.com/1", "https://a.com/2"]
    );
    assert_eq!(site.fetch_count("https://a.com/3"), 0);

    // Deeper than the site: stops once the frontier is empty
    let result = crawler.download("https://a.com/0", 10).await.unwrap();
    assert_eq!(result.downloaded.len(), 4);
}

#[tokio::test]
async fn test_repeated_crawls_are_identical() {
    let site = Arc::new(
        FakeSite::new()
            .page(
                "https://a.com/",
                &["https://a.com/x", "https://b.com/", "https://a.com/gone"],
            )
            .page("https://a.com/x", &["https://b.com/y"])
            .page("https://b.com/", &["https://a.com/"])
            .failing("https://a.com/gone")
            .page("https://b.com/y", &[]),
    );
    let crawler = crawler(&site, 4, 4, 1);

    let first = crawler.download("https://a.com/", 3).await.unwrap();
    let second = crawler.download("https://a.com/", 3).await.unwrap();

    assert_eq!(first.downloaded, second.downloaded);
    assert_eq!(error_urls(&first), error_urls(&second));
    assert_eq!(first.downloaded.len(), 4);

    // Per-host limiters are reused across crawls
    assert_eq!(crawler.known_hosts(), 2);
}

#[tokio::test]
async fn test_concurrent_crawls_share_one_instance() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/1"])
            .page("https://a.com/1", &[])
            .page("https://b.com/", &["https://b.com/1"])
            .page("https://b.com/1", &[]),
    );
    let crawler = crawler(&site, 2, 2, 1);

    let (a, b) = tokio::join!(
        crawler.download("https://a.com/", 2),
        crawler.download("https://b.com/", 2)
    );

    assert_eq!(a.unwrap().downloaded, vec!["https://a.com/", "https://a.com/1"]);
    assert_eq!(b.unwrap().downloaded, vec!["https://b.com/", "https://b.com/1"]);
}

#[tokio::test]
async fn test_extraction_failure_moves_url_to_errors() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/broken"])
            .unparsable("https://a.com/broken"),
    );
    let crawler = crawler(&site, 2, 2, 2);

    let result = crawler.download("https://a.com/", 3).await.unwrap();

    assert_eq!(result.downloaded, vec!["https://a.com/"]);
    assert!(!result.is_downloaded("https://a.com/broken"));
    assert!(matches!(
        result.errors.get("https://a.com/broken"),
        Some(FetchError::Extract { .. })
    ));
}

#[tokio::test]
async fn test_extraction_runs_on_last_level() {
    let site = Arc::new(FakeSite::new().unparsable("https://a.com/"));
    let crawler = crawler(&site, 1, 1, 1);

    let result = crawler.download("https://a.com/", 1).await.unwrap();

    assert!(result.downloaded.is_empty());
    assert_eq!(error_urls(&result), BTreeSet::from(["https://a.com/".to_string()]));
}

#[tokio::test]
async fn test_download_after_close_fails() {
    let site = Arc::new(FakeSite::new().page("https://a.com/", &[]));
    let crawler = crawler(&site, 1, 1, 1);

    crawler.close();

    let result = crawler.download("https://a.com/", 1).await;
    assert!(matches!(result, Err(CrawlError::Shutdown)));
    assert_eq!(site.fetch_count("https://a.com/"), 0);
}

#[tokio::test]
async fn test_close_interrupts_running_crawl() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &[])
            .with_latency(Duration::from_secs(30)),
    );
    let crawler = Arc::new(crawler(&site, 1, 1, 1));

    let running = {
        let crawler = Arc::clone(&crawler);
        tokio::spawn(async move { crawler.download("https://a.com/", 1).await })
    };

    // Wait until the download is in flight
    while site.fetch_count("https://a.com/") == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    crawler.close();

    let result = tokio::time::timeout(Duration::from_secs(5), running)
        .await
        .expect("crawl did not stop after close")
        .unwrap();
    assert!(matches!(result, Err(CrawlError::Shutdown)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_panicking_downloader_does_not_stop_the_crawler() {
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/boom", "https://a.com/ok"])
            .panicking("https://a.com/boom")
            .page("https://a.com/ok", &[]),
    );
    let crawler = crawler(&site, 1, 1, 1);

    for _ in 0..2 {
        let crawl = crawler.download("https://a.com/", 2);
        let result = tokio::time::timeout(Duration::from_secs(5), crawl)
            .await
            .expect("crawl hung after a downloader panic")
            .unwrap();

        assert_eq!(result.downloaded, vec!["https://a.com/", "https://a.com/ok"]);
        assert_eq!(error_urls(&result), BTreeSet::from(["https://a.com/boom".to_string()]));
        assert!(matches!(
            result.errors.get("https://a.com/boom"),
            Some(FetchError::Panicked { .. })
        ));
    }
    assert!(!crawler.is_closed());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_level_extraction_finishes_before_next_level_downloads() {
    // b extracts at once while c is slow; d and e belong to the next level
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/b", "https://a.com/c"])
            .page("https://a.com/b", &["https://a.com/d"])
            .page("https://a.com/c", &["https://a.com/e"])
            .page("https://a.com/d", &[])
            .page("https://a.com/e", &[])
            .slow_extraction("https://a.com/c", Duration::from_millis(150)),
    );
    let crawler = crawler(&site, 4, 4, 4);

    let result = crawler.download("https://a.com/", 3).await.unwrap();
    assert_eq!(result.downloaded.len(), 5);

    let events = site.events();
    let position = |event: &str| -> usize {
        events
            .iter()
            .position(|logged| logged == event)
            .unwrap_or_else(|| panic!("missing event {:?} in {:?}", event, events))
    };
    let level_drained = position("extracted https://a.com/b")
        .max(position("extracted https://a.com/c"));
    assert!(position("fetch https://a.com/d") > level_drained, "{:?}", events);
    assert!(position("fetch https://a.com/e") > level_drained, "{:?}", events);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shortcut_counts_at_its_shallowest_level() {
    // d sits three hops down the chain but one hop from the seed
    let site = Arc::new(
        FakeSite::new()
            .page("https://a.com/", &["https://a.com/b", "https://a.com/d"])
            .page("https://a.com/b", &["https://a.com/c"])
            .page("https://a.com/c", &["https://a.com/d"])
            .page("https://a.com/d", &[]),
    );
    let crawler = crawler(&site, 4, 4, 4);

    let result = crawler.download("https://a.com/", 2).await.unwrap();

    assert_eq!(
        result.downloaded,
        vec!["https://a.com/", "https://a.com/b", "https://a.com/d"]
    );
    assert_eq!(site.fetch_count("https://a.com/c"), 0);
    assert_eq!(site.fetch_count("https://a.com/d"), 1);
}
