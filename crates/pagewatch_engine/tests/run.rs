use std::time::Duration;

use pagewatch_engine::{run_watch, BaselineStore, ChangeDetector, FetchSettings, HttpPageFetcher};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html; charset=utf-8")
}

async fn serve(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route.to_string()))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn one_failing_url_does_not_poison_the_run() {
    let server = MockServer::start().await;
    serve(&server, "/ok", "<html><body><p>fine</p></body></html>").await;
    Mock::given(method("GET"))
        .and(path("/bad"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let store = BaselineStore::open(temp.path()).unwrap();
    let fetcher = HttpPageFetcher::new(FetchSettings::default());
    let detector = ChangeDetector::new(&fetcher, &store, 0);

    let bad_url = format!("{}/bad", server.uri());
    let ok_url = format!("{}/ok", server.uri());
    let urls = vec![bad_url.clone(), ok_url.clone()];

    let report = run_watch(&detector, &urls, 0).await;

    assert_eq!(report.errors, vec![bad_url]);
    assert_eq!(report.new_pages.len(), 1);
    assert_eq!(report.new_pages[0].url, ok_url);
    assert!(report.updated.is_empty());
}

#[tokio::test]
async fn mixed_run_buckets_outcomes_and_hides_unchanged() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/fresh",
        "<html><head><title>Fresh</title></head><body><p>brand new</p></body></html>",
    )
    .await;
    serve(
        &server,
        "/steady",
        "<html><head><title>Steady</title></head><body><p>constant</p></body></html>",
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/flappy"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_raw("<html>late</html>", "text/html"),
        )
        .mount(&server)
        .await;

    let temp = TempDir::new().unwrap();
    let store = BaselineStore::open(temp.path()).unwrap();
    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = HttpPageFetcher::new(settings);
    let detector = ChangeDetector::new(&fetcher, &store, 1);

    let steady_url = format!("{}/steady", server.uri());
    store.save(&steady_url, "constant").unwrap();

    let urls = vec![
        format!("{}/flappy", server.uri()),
        format!("{}/fresh", server.uri()),
        steady_url,
    ];

    let report = run_watch(&detector, &urls, 0).await;

    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.new_pages.len(), 1);
    assert_eq!(report.new_pages[0].title, "Fresh");
    assert_eq!(report.updated.len(), 0);
}

#[tokio::test]
async fn bounded_concurrency_still_processes_every_url() {
    let server = MockServer::start().await;
    for route in ["/a", "/b", "/c", "/d"] {
        serve(
            &server,
            route,
            "<html><body><p>payload</p></body></html>",
        )
        .await;
    }

    let temp = TempDir::new().unwrap();
    let store = BaselineStore::open(temp.path()).unwrap();
    let fetcher = HttpPageFetcher::new(FetchSettings::default());
    let detector = ChangeDetector::new(&fetcher, &store, 0);

    let urls: Vec<String> = ["/a", "/b", "/c", "/d"]
        .iter()
        .map(|route| format!("{}{route}", server.uri()))
        .collect();

    let report = run_watch(&detector, &urls, 1).await;
    assert_eq!(report.new_pages.len(), 4);
    assert!(report.errors.is_empty());
}

#[tokio::test]
async fn empty_url_list_yields_an_empty_report() {
    let temp = TempDir::new().unwrap();
    let store = BaselineStore::open(temp.path()).unwrap();
    let fetcher = HttpPageFetcher::new(FetchSettings::default());
    let detector = ChangeDetector::new(&fetcher, &store, 0);

    let report = run_watch(&detector, &[], 0).await;
    assert!(report.is_empty());
}

#[tokio::test]
async fn each_url_appears_in_exactly_one_bucket() {
    let server = MockServer::start().await;
    serve(&server, "/only", "<html><body><p>once</p></body></html>").await;

    let temp = TempDir::new().unwrap();
    let store = BaselineStore::open(temp.path()).unwrap();
    let fetcher = HttpPageFetcher::new(FetchSettings::default());
    let detector = ChangeDetector::new(&fetcher, &store, 0);

    let urls = vec![format!("{}/only", server.uri())];
    let report = run_watch(&detector, &urls, 0).await;

    let total = report.new_pages.len() + report.updated.len() + report.errors.len();
    assert_eq!(total, 1);
}
