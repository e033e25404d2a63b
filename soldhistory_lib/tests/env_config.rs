//! Runs in its own test binary so the environment it sets stays local.

use soldhistory_lib::scrape_sales;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn scrape_sales_reads_settings_from_environment() {
    let server = MockServer::start().await;
    let page = std::fs::read_to_string("tests/fixtures/single_listing.html").unwrap();
    Mock::given(method("GET"))
        .and(path("/p.php"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page))
        .mount(&server)
        .await;

    std::env::set_var("SOLDHISTORY_BASE_URL", format!("{}/p.php", server.uri()));
    std::env::set_var("SOLDHISTORY_MAX_PAGES", "2");
    std::env::set_var("SOLDHISTORY_CONCURRENCY", "1");

    let report = scrape_sales(&["Testville"], "WA").await.unwrap();

    assert_eq!(report.requests, 2);
    assert!(report.failures.is_empty());
    assert_eq!(report.table.len(), 2);
    assert!(report.table.iter().all(|r| r.state == "WA"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
