use feed_checker::check::check;
use feed_checker::fetch::BasicClient;
use feed_checker::fetch::auth::{ApiKey, UrlParam};
use feed_checker::infra::transitfeeds::TransitFeedsClient;
use feed_checker::infra::transitland::TransitlandClient;
use feed_checker::input::InputSource;
use feed_checker::report::{Summary, save_json};
use feed_checker::results::{AgencyId, RegistryStatus, Status};
use feed_checker::services::registry_api::{RegistryApi, RegistryRecord};
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transitland(server: &MockServer) -> TransitlandClient<ApiKey<BasicClient>> {
    let http = ApiKey::new(BasicClient::new().unwrap(), "apikey", "tl-key").unwrap();
    TransitlandClient::new(http, &server.uri())
}

fn transitfeeds(server: &MockServer) -> TransitFeedsClient<UrlParam<BasicClient>> {
    let http = UrlParam {
        inner: BasicClient::new().unwrap(),
        param_name: "key".to_string(),
        key: "tf-key".to_string(),
    };
    TransitFeedsClient::new(http, &server.uri())
}

async fn mount_transitland_page(server: &MockServer, after: Option<&str>, body: serde_json::Value) {
    let mock = Mock::given(method("GET"))
        .and(path("/api/v2/rest/feeds"))
        .and(header("apikey", "tl-key"))
        .and(query_param("limit", "100"));
    let mock = match after {
        Some(after) => mock.and(query_param("after", after)),
        None => mock.and(query_param_is_missing("after")),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn mount_transitfeeds_page(server: &MockServer, page: &str, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/v1/getFeeds"))
        .and(query_param("key", "tf-key"))
        .and(query_param("page", page))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn empty_transitfeeds() -> serde_json::Value {
    json!({"status": "OK", "results": {"numPages": 1, "page": 1, "feeds": []}})
}

#[tokio::test]
async fn test_transitland_follows_cursor() {
    let server = MockServer::start().await;
    mount_transitland_page(
        &server,
        None,
        json!({
            "feeds": [{
                "onestop_id": "f-9q9-bart",
                "urls": {
                    "static_current": "https://www.bart.gov/dev/schedules/google_transit.zip",
                    "static_historic": ["https://old.example.com/bart.zip"],
                    "realtime_alerts": ""
                }
            }],
            "meta": {"after": 42, "next": "ignored"}
        }),
    )
    .await;
    mount_transitland_page(
        &server,
        Some("42"),
        json!({
            "feeds": [{
                "onestop_id": "f-9q9-caltrain",
                "urls": {"realtime_vehicle_positions": "https://rt.example.com/vp?api_key=x"}
            }],
            "meta": {}
        }),
    )
    .await;

    let records = transitland(&server).list_urls().await.unwrap();

    assert_eq!(
        records,
        vec![
            RegistryRecord::new(
                "https://www.transit.land/feeds/f-9q9-bart",
                "https://www.bart.gov/dev/schedules/google_transit.zip"
            ),
            RegistryRecord::new(
                "https://www.transit.land/feeds/f-9q9-bart",
                "https://old.example.com/bart.zip"
            ),
            RegistryRecord::new(
                "https://www.transit.land/feeds/f-9q9-caltrain",
                "https://rt.example.com/vp?api_key=x"
            ),
        ]
    );
}

#[tokio::test]
async fn test_transitland_error_status_propagates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v2/rest/feeds"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let err = transitland(&server).list_urls().await.unwrap_err();
    assert!(err.to_string().contains("401"));
}

#[tokio::test]
async fn test_transitfeeds_walks_all_pages() {
    let server = MockServer::start().await;
    mount_transitfeeds_page(
        &server,
        "1",
        json!({
            "status": "OK",
            "results": {
                "numPages": 2,
                "page": 1,
                "feeds": [
                    {"id": "sfmta/60", "t": "SFMTA GTFS", "u": {"d": "https://sfmta.example.com/gtfs.zip", "i": "https://sfmta.com"}},
                    {"id": "nourl/1", "t": "No URL"}
                ]
            }
        }),
    )
    .await;
    mount_transitfeeds_page(
        &server,
        "2",
        json!({
            "status": "OK",
            "results": {
                "numPages": 2,
                "page": 2,
                "feeds": [{"id": "ac-transit/121", "u": {"d": "https://ac.example.com/gtfs.zip"}}]
            }
        }),
    )
    .await;

    let records = transitfeeds(&server).list_urls().await.unwrap();

    assert_eq!(
        records,
        vec![
            RegistryRecord::new(
                "https://transitfeeds.com/p/sfmta/60",
                "https://sfmta.example.com/gtfs.zip"
            ),
            RegistryRecord::new(
                "https://transitfeeds.com/p/ac-transit/121",
                "https://ac.example.com/gtfs.zip"
            ),
        ]
    );
}

#[tokio::test]
async fn test_transitfeeds_api_error() {
    let server = MockServer::start().await;
    mount_transitfeeds_page(
        &server,
        "1",
        json!({"status": "EXCEPTION", "msg": "Invalid API key"}),
    )
    .await;

    let err = transitfeeds(&server).list_urls().await.unwrap_err();
    assert!(err.to_string().contains("Invalid API key"));
}

#[tokio::test]
async fn test_single_url_end_to_end() {
    let tl_server = MockServer::start().await;
    mount_transitland_page(
        &tl_server,
        None,
        json!({
            "feeds": [{"onestop_id": "f-x", "urls": {"static_current": "http://x.com"}}],
            "meta": {}
        }),
    )
    .await;
    let tf_server = MockServer::start().await;
    mount_transitfeeds_page(&tf_server, "1", empty_transitfeeds()).await;

    let tl = transitland(&tl_server);
    let tf = transitfeeds(&tf_server);
    let registries: [&dyn RegistryApi; 2] = [&tl, &tf];
    let source = InputSource::Url("http://x.com?api_key=SECRET".to_string());

    let results = check(&source, &registries).await.unwrap();

    let entry = results.get("http://x.com?api_key=SECRET").unwrap();
    assert_eq!(
        entry.transitland,
        RegistryStatus::present("https://www.transit.land/feeds/f-x")
    );
    assert_eq!(entry.transitfeeds.status, Status::Missing);

    let summary = Summary::from_results(&results);
    let mut out = Vec::new();
    summary.write_to(&mut out, false).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Found 1/1 urls were found\n");
}

#[tokio::test]
async fn test_manifest_end_to_end_report() {
    let tl_server = MockServer::start().await;
    mount_transitland_page(&tl_server, None, json!({"feeds": [], "meta": {}})).await;
    let tf_server = MockServer::start().await;
    mount_transitfeeds_page(
        &tf_server,
        "1",
        json!({
            "status": "OK",
            "results": {
                "numPages": 1,
                "page": 1,
                "feeds": [{"id": "acme/1", "u": {"d": "http://b.com/rt?route=1"}}]
            }
        }),
    )
    .await;

    let dir = tempfile::tempdir().unwrap();
    let manifest = dir.path().join("agencies.yml");
    let mut file = std::fs::File::create(&manifest).unwrap();
    write!(
        file,
        "acme:\n  itp_id: 10\n  feeds:\n    - static: \"http://a.com\"\n      realtime: \"http://b.com/rt?token=abc&route=1\"\n"
    )
    .unwrap();

    let tl = transitland(&tl_server);
    let tf = transitfeeds(&tf_server);
    let registries: [&dyn RegistryApi; 2] = [&tl, &tf];
    let source = InputSource::select(None, None, &manifest);

    let results = check(&source, &registries).await.unwrap();

    let summary = Summary::from_results(&results);
    assert_eq!(summary.total, 2);
    assert_eq!(summary.missing, vec!["http://a.com"]);

    let report = dir.path().join("report.json");
    save_json(&report, &results).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();

    assert_eq!(
        value,
        json!({
            "http://a.com": {
                "url_type": "static",
                "itp_id": 10,
                "url_number": 0,
                "transitfeeds": {"status": "missing"},
                "transitland": {"status": "missing"}
            },
            "http://b.com/rt?token=abc&route=1": {
                "url_type": "realtime",
                "itp_id": 10,
                "url_number": 1,
                "transitfeeds": {"status": "present", "public_web_url": "https://transitfeeds.com/p/acme/1"},
                "transitland": {"status": "missing"}
            }
        })
    );

    let provenance = results.get("http://a.com").unwrap().provenance.clone().unwrap();
    assert_eq!(provenance.itp_id, AgencyId::Number(10));
}

#[tokio::test]
async fn test_registry_failure_aborts_check() {
    let tl_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&tl_server)
        .await;
    let tf_server = MockServer::start().await;
    mount_transitfeeds_page(&tf_server, "1", empty_transitfeeds()).await;

    let tl = transitland(&tl_server);
    let tf = transitfeeds(&tf_server);
    let registries: [&dyn RegistryApi; 2] = [&tl, &tf];
    let source = InputSource::Url("http://x.com".to_string());

    assert!(check(&source, &registries).await.is_err());
}
