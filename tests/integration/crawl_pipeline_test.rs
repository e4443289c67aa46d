// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use prodcrawl::config::settings::{ExportSettings, FetchMode, Settings, StrategyOverride};
use prodcrawl::domain::models::crawl::{CrawlStatus, Domain, FailureKind};
use prodcrawl::infrastructure::export::MultiExporter;
use prodcrawl::workers::CrawlOrchestrator;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SHOP_HOMEPAGE: &str = r##"
<!DOCTYPE html>
<html>
  <head><title>Shop</title></head>
  <body>
    <nav><a href="/about">About</a><a href="#">Top</a></nav>
    <ul>
      <li><a href="/product/1">Widget</a></li>
      <li><a href="/p/2">Gadget</a></li>
      <li><a href="/product/1">Widget again</a></li>
    </ul>
  </body>
</html>
"##;

async fn serve(status: u16, body: &str, delay: Option<Duration>) -> MockServer {
    let server = MockServer::start().await;
    let mut response = ResponseTemplate::new(status)
        .insert_header("content-type", "text/html; charset=utf-8")
        .set_body_string(body);
    if let Some(delay) = delay {
        response = response.set_delay(delay);
    }
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn host(server: &MockServer) -> String {
    server.address().to_string()
}

fn local_settings(domains: &[String]) -> Settings {
    let mut settings = Settings::for_domains(domains);
    settings.crawler.scheme = "http".to_string();
    settings.crawler.default_mode = FetchMode::Static;
    settings.crawler.domain_timeout_secs = 5;
    settings.static_fetch.timeout_secs = 5;
    // Never find a real browser, so the dynamic path fails fast
    settings.dynamic_fetch.chrome_executable = Some("/nonexistent/prodcrawl/chrome".to_string());
    settings.dynamic_fetch.timeout_secs = 5;
    settings
}

#[tokio::test]
async fn test_pipeline_reports_every_domain_and_exports() {
    let shop = serve(200, SHOP_HOMEPAGE, None).await;
    let broken = serve(500, "oops", None).await;
    let shop_host = host(&shop);
    let broken_host = host(&broken);

    let settings = local_settings(&[shop_host.clone(), broken_host.clone(), shop_host.clone()]);
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("urls.json");
    let csv_path = dir.path().join("urls.csv");
    let status_path = dir.path().join("status.json");
    let exporter = MultiExporter::from_settings(&ExportSettings {
        json_path: json_path.to_string_lossy().into_owned(),
        csv_path: csv_path.to_string_lossy().into_owned(),
        status_path: status_path.to_string_lossy().into_owned(),
    });

    let report = orchestrator
        .run_and_export(&settings.crawler.domains().unwrap(), &exporter)
        .await
        .unwrap();

    assert_eq!(report.len(), 2);

    let shop_result = report.get(&Domain::parse(&shop_host).unwrap()).unwrap();
    assert_eq!(shop_result.status, CrawlStatus::Success);
    assert_eq!(
        shop_result.urls.iter().cloned().collect::<Vec<_>>(),
        vec![
            format!("http://{}/p/2", shop_host),
            format!("http://{}/product/1", shop_host),
        ]
    );

    let broken_result = report.get(&Domain::parse(&broken_host).unwrap()).unwrap();
    assert_eq!(
        broken_result.status,
        CrawlStatus::Failure(FailureKind::Network)
    );
    assert!(broken_result.urls.is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json[&shop_host].as_array().unwrap().len(), 2);
    assert!(json[&broken_host].as_array().unwrap().is_empty());

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 3);

    let status: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&status_path).unwrap()).unwrap();
    assert_eq!(status[&shop_host]["status"], "success");
    assert_eq!(status[&broken_host]["status"], "failure");
    assert_eq!(status[&broken_host]["kind"], "network");
}

#[tokio::test]
async fn test_slow_domain_times_out_without_delaying_others() {
    let shop = serve(200, SHOP_HOMEPAGE, None).await;
    let slow = serve(200, SHOP_HOMEPAGE, Some(Duration::from_secs(10))).await;
    let shop_host = host(&shop);
    let slow_host = host(&slow);

    let mut settings = local_settings(&[shop_host.clone(), slow_host.clone()]);
    settings.crawler.domain_timeout_secs = 1;
    settings.static_fetch.timeout_secs = 30;
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    let started = std::time::Instant::now();
    let report = orchestrator
        .run(&settings.crawler.domains().unwrap())
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(
        report.get(&Domain::parse(&slow_host).unwrap()).unwrap().status,
        CrawlStatus::Failure(FailureKind::Timeout)
    );
    assert_eq!(
        report.get(&Domain::parse(&shop_host).unwrap()).unwrap().status,
        CrawlStatus::Success
    );
}

#[tokio::test]
async fn test_auto_mode_keeps_static_markup_with_products() {
    let shop = serve(200, SHOP_HOMEPAGE, None).await;
    let shop_host = host(&shop);

    let mut settings = local_settings(&[shop_host.clone()]);
    settings.crawler.default_mode = FetchMode::Auto;
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    let report = orchestrator
        .run(&settings.crawler.domains().unwrap())
        .await
        .unwrap();

    let result = report.get(&Domain::parse(&shop_host).unwrap()).unwrap();
    assert_eq!(result.status, CrawlStatus::Success);
    assert_eq!(result.urls.len(), 2);
}

#[tokio::test]
async fn test_auto_mode_degrades_when_browser_unavailable() {
    let spa = serve(200, r#"<html><body><div id="root"></div></body></html>"#, None).await;
    let spa_host = host(&spa);

    let mut settings = local_settings(&[spa_host.clone()]);
    settings.crawler.default_mode = FetchMode::Auto;
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    let report = orchestrator
        .run(&settings.crawler.domains().unwrap())
        .await
        .unwrap();

    let result = report.get(&Domain::parse(&spa_host).unwrap()).unwrap();
    assert_eq!(
        result.status,
        CrawlStatus::PartialFailure(FailureKind::Render)
    );
    assert!(result.urls.is_empty());
}

#[tokio::test]
async fn test_dynamic_override_records_render_failure() {
    let shop = serve(200, SHOP_HOMEPAGE, None).await;
    let shop_host = host(&shop);

    let mut settings = local_settings(&[shop_host.clone()]);
    settings.crawler.strategy_overrides.push(StrategyOverride {
        domain: shop_host.clone(),
        mode: FetchMode::Dynamic,
    });
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    let report = orchestrator
        .run(&settings.crawler.domains().unwrap())
        .await
        .unwrap();

    assert_eq!(
        report.get(&Domain::parse(&shop_host).unwrap()).unwrap().status,
        CrawlStatus::Failure(FailureKind::Render)
    );
}

#[tokio::test]
async fn test_empty_domain_list_aborts_before_crawling() {
    let settings = local_settings(&[]);
    let orchestrator = CrawlOrchestrator::from_settings(&settings).unwrap();

    assert!(orchestrator.run(&[]).await.is_err());
}
