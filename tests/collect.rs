mod common;

use std::time::Duration;

use common::{listing_page, numbered, quick_timing, serve, Next};
use doclist::{
    collect, next_page, run, Advance, Config, Error, HttpView, Record, SelectorConfig, Selectors,
    Stop, Timing,
};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn selectors() -> Selectors {
    Selectors::new(&SelectorConfig::default()).unwrap()
}

fn url(server: &MockServer, at: &str) -> Url {
    Url::parse(&format!("{}{at}", server.uri())).unwrap()
}

#[tokio::test]
async fn single_page_listing_is_deduplicated_and_written() {
    let server = MockServer::start().await;
    let rows = vec![
        Record::new("Doc A", "STIG", "2023-01-01", "/d/a"),
        Record::new("Doc B", "Manual", "2023-02-01", "/d/b"),
        Record::new("Doc A", "STIG", "2023-01-01", "/d/a"),
    ];
    serve(&server, "/list/1", listing_page(Some((1, 3, 3)), &rows, Next::Dead)).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let mut config = Config::new(url(&server, "/list/1"), &output);
    config.timing = quick_timing();

    let harvest = run(&config, reqwest::Client::new()).await.expect("run ok");
    assert_eq!(harvest.records.len(), 2);
    assert_eq!(harvest.pages, 1);

    let csv = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        csv,
        "Name,Download Type,Upload Date,Link\n\
         Doc A,STIG,2023-01-01,/d/a\n\
         Doc B,Manual,2023-02-01,/d/b\n"
    );
}

#[tokio::test]
async fn walks_every_page_until_next_is_disabled() {
    let server = MockServer::start().await;
    let all = numbered(1..=25);
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 25)), &all[0..10], Next::Link("/list/2")),
    )
    .await;
    serve(
        &server,
        "/list/2",
        listing_page(Some((11, 20, 25)), &all[10..20], Next::Link("3")),
    )
    .await;
    serve(
        &server,
        "/list/3",
        listing_page(Some((21, 25, 25)), &all[20..25], Next::Disabled),
    )
    .await;

    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let harvest = collect(&mut view, &selectors(), &quick_timing())
        .await
        .unwrap();

    assert_eq!(harvest.pages, 3);
    assert_eq!(harvest.records, all);
    assert_eq!(view.url().path(), "/list/3");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn overlapping_pages_only_add_new_records() {
    let server = MockServer::start().await;
    let all = numbered(1..=15);
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 15)), &all[0..10], Next::Link("/list/2")),
    )
    .await;
    serve(
        &server,
        "/list/2",
        listing_page(Some((6, 15, 15)), &all[5..15], Next::Disabled),
    )
    .await;

    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let harvest = collect(&mut view, &selectors(), &quick_timing())
        .await
        .unwrap();

    assert_eq!(harvest.pages, 2);
    assert_eq!(harvest.records, all);
}

#[tokio::test]
async fn click_that_does_not_move_the_counter_is_no_progress() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 25)), &numbered(1..=10), Next::Link("/list/1")),
    )
    .await;

    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let outcome = next_page(&mut view, &quick_timing()).await;
    assert_eq!(outcome, Advance::Stopped(Stop::NoProgress));
}

#[tokio::test]
async fn click_onto_a_page_without_counter_is_no_progress() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 25)), &numbered(1..=10), Next::Link("/list/2")),
    )
    .await;
    serve(
        &server,
        "/list/2",
        listing_page(None, &numbered(11..=20), Next::Disabled),
    )
    .await;

    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let outcome = next_page(&mut view, &quick_timing()).await;
    assert_eq!(outcome, Advance::Stopped(Stop::NoProgress));
}

#[tokio::test]
async fn successful_click_reports_both_states() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 25)), &numbered(1..=10), Next::Link("/list/2")),
    )
    .await;
    serve(
        &server,
        "/list/2",
        listing_page(Some((11, 20, 25)), &numbered(11..=20), Next::Disabled),
    )
    .await;

    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let outcome = next_page(&mut view, &quick_timing()).await;
    assert!(outcome.is_moved());
    match outcome {
        Advance::Moved { from, to } => {
            assert_eq!((from.start, from.end, from.total), (1, 10, 25));
            assert_eq!((to.start, to.end, to.total), (11, 20, 25));
        }
        Advance::Stopped(stop) => panic!("expected to move, stopped with {stop:?}"),
    }

    assert_eq!(
        next_page(&mut view, &quick_timing()).await,
        Advance::Stopped(Stop::Disabled)
    );
}

#[tokio::test]
async fn slow_next_page_is_waited_out_by_polling() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 20)), &numbered(1..=10), Next::Link("/list/2")),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/list/2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(
                    listing_page(Some((11, 20, 20)), &numbered(11..=20), Next::Disabled),
                    "text/html; charset=utf-8",
                )
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let timing = Timing {
        click: Duration::from_millis(100),
        poll_interval: Duration::from_millis(50),
        poll_attempts: 40,
        ..quick_timing()
    };
    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let outcome = next_page(&mut view, &timing).await;
    assert!(outcome.is_moved(), "stopped with {outcome:?}");
    assert_eq!(view.url().path(), "/list/2");
}

#[tokio::test]
async fn empty_next_page_keeps_what_was_collected() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/list/1",
        listing_page(Some((1, 10, 20)), &numbered(1..=10), Next::Link("/list/2")),
    )
    .await;
    serve(
        &server,
        "/list/2",
        listing_page(Some((11, 20, 20)), &[], Next::Disabled),
    )
    .await;

    let mut timing = quick_timing();
    timing.next_rows = Duration::from_millis(100);
    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let harvest = collect(&mut view, &selectors(), &timing).await.unwrap();

    assert_eq!(harvest.pages, 1);
    assert_eq!(harvest.records, numbered(1..=10));
}

#[tokio::test]
async fn first_page_without_rows_fails_without_output() {
    let server = MockServer::start().await;
    serve(&server, "/list/1", listing_page(Some((0, 0, 0)), &[], Next::Disabled)).await;

    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.csv");
    let mut config = Config::new(url(&server, "/list/1"), &output);
    config.timing = quick_timing();
    config.timing.initial_rows = Duration::from_millis(100);

    let err = run(&config, reqwest::Client::new()).await.unwrap_err();
    assert!(matches!(err, Error::LoadTimeout { what: "listing rows", .. }));
    assert!(!output.exists());
}

#[tokio::test]
async fn first_page_without_counter_fails() {
    let server = MockServer::start().await;
    serve(&server, "/list/1", listing_page(None, &numbered(1..=3), Next::Disabled)).await;

    let mut timing = quick_timing();
    timing.indicator = Duration::from_millis(100);
    let mut view = HttpView::open(reqwest::Client::new(), url(&server, "/list/1"))
        .await
        .unwrap();
    let err = collect(&mut view, &selectors(), &timing).await.unwrap_err();
    assert!(matches!(err, Error::LoadTimeout { what: "pagination indicator", .. }));
}

#[tokio::test]
async fn unreachable_listing_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = HttpView::open(reqwest::Client::new(), url(&server, "/missing"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Reqwest(_)));
}

#[tokio::test]
async fn invalid_selector_fails_before_fetching() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::new(url(&server, "/list/1"), dir.path().join("out.csv"));
    config.selectors.rows = "table tbody tr[[".to_string();

    let err = run(&config, reqwest::Client::new()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidSelector(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}
