use reqwest::Client;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ecoroute::api::{geocode_stops, NominatimGeocoder, OsrmRouteProvider};
use ecoroute::config::RegionBias;
use ecoroute::{Error, GeoPoint, Geocoder, RouteProvider};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// Not JSON, and byte 200 falls inside a Devanagari character.
fn garbled_devanagari_body() -> String {
    format!("{}{}", "x".repeat(199), "नई दिल्ली")
}

fn waypoints() -> Vec<GeoPoint> {
    vec![
        GeoPoint::new("origin", 28.6139, 77.2090),
        GeoPoint::new("a", 28.70, 77.30),
        GeoPoint::new("b", 28.50, 77.10),
    ]
}

fn osrm_route_body() -> serde_json::Value {
    json!({
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[77.2090, 28.6139], [77.30, 28.70], [77.10, 28.50]]
            },
            "distance": 45210.4,
            "duration": 3120.0
        }],
        "waypoints": []
    })
}

#[tokio::test]
async fn osrm_route_is_mapped_to_path_result() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/route/v1/driving/77.209,28.6139;77.3,28.7;77.1,28.5"))
        .and(query_param("geometries", "geojson"))
        .and(query_param("overview", "full"))
        .and(query_param("steps", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(osrm_route_body()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let path = provider.get_route(&waypoints()).await.unwrap();

    assert_eq!(path.distance_meters, 45210.4);
    assert_eq!(path.duration_seconds, 3120.0);
    assert_eq!(path.geometry.len(), 3);
    assert_eq!(path.geometry[0], (77.2090, 28.6139));
}

#[tokio::test]
async fn osrm_no_route_maps_to_no_route_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/[-0-9.,;]+$"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"code": "NoRoute", "message": "Impossible route between points"})),
        )
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let err = provider.get_route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, Error::NoRouteFound));
}

#[tokio::test]
async fn osrm_empty_routes_maps_to_no_route_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "Ok", "routes": []})))
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let err = provider.get_route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, Error::NoRouteFound));
}

#[tokio::test]
async fn osrm_server_error_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let err = provider.get_route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnavailable(_)));
}

#[tokio::test]
async fn osrm_error_code_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"code": "TooBig", "message": "Too many coordinates"})),
        )
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    match provider.get_route(&waypoints()).await {
        Err(Error::ProviderUnavailable(msg)) => assert!(msg.contains("TooBig")),
        other => panic!("expected ProviderUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn osrm_unreachable_is_provider_unavailable() {
    let provider = OsrmRouteProvider::new(Client::new(), "http://127.0.0.1:1");
    let err = provider.get_route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnavailable(_)));
}

#[tokio::test]
async fn osrm_rejects_single_waypoint_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(osrm_route_body()))
        .expect(0)
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let err = provider.get_route(&waypoints()[..1]).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn forward_geocoding_sends_region_bias() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Connaught Place, India"))
        .and(query_param("countrycodes", "in"))
        .and(query_param("bounded", "1"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "28.6314", "lon": "77.2167", "display_name": "Connaught Place, New Delhi, India", "importance": 0.71},
            {"lat": "28.6300", "lon": "77.2200", "display_name": "Connaught Circus, New Delhi, India"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), Some(RegionBias::india()));
    let hits = geocoder.forward("Connaught Place").await.unwrap();

    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].lat, 28.6314);
    assert_eq!(hits[0].lng, 77.2167);
    assert_eq!(hits[0].importance, 0.71);
    assert_eq!(hits[1].importance, 0.0);
}

#[tokio::test]
async fn forward_geocoding_with_no_matches_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let hits = geocoder.forward("nowhere at all").await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn reverse_geocoding_returns_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .and(query_param("lat", "28.6139"))
        .and(query_param("lon", "77.209"))
        .and(query_param("zoom", "16"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"display_name": "Janpath, New Delhi, India"})),
        )
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let hit = geocoder.reverse(28.6139, 77.209).await.unwrap();
    assert_eq!(hit.display_name, "Janpath, New Delhi, India");
    assert_eq!(hit.lat, 28.6139);
}

#[tokio::test]
async fn reverse_geocoding_error_body_is_address_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Unable to geocode"})))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let err = geocoder.reverse(0.0, -150.0).await.unwrap_err();
    assert!(matches!(err, Error::AddressNotFound(_)));
}

#[tokio::test]
async fn geocode_stops_keeps_request_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Okhla"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "28.53", "lon": "77.27", "display_name": "Okhla, Delhi"}
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Rohini"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "28.74", "lon": "77.06", "display_name": "Rohini, Delhi"}
        ])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let requests = vec![
        ("s1".to_string(), "Rohini".to_string()),
        ("s2".to_string(), "Okhla".to_string()),
        ("s3".to_string(), "Rohini".to_string()),
    ];
    let points = geocode_stops(&geocoder, &requests, 2).await.unwrap();

    let ids: Vec<&str> = points.iter().map(GeoPoint::id).collect();
    assert_eq!(ids, ["s1", "s2", "s3"]);
    assert_eq!(points[0].latitude(), 28.74);
    assert_eq!(points[1].label(), Some("Okhla, Delhi"));
}

#[tokio::test]
async fn geocode_stops_fails_on_unknown_address() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let requests = vec![("s1".to_string(), "Atlantis".to_string())];
    match geocode_stops(&geocoder, &requests, 4).await {
        Err(Error::AddressNotFound(address)) => assert_eq!(address, "Atlantis"),
        other => panic!("expected AddressNotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn geocoder_http_failure_is_provider_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), None);
    let err = geocoder.forward("Saket").await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnavailable(_)));
}

#[tokio::test]
async fn osrm_garbled_multibyte_body_is_provider_unavailable() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(garbled_devanagari_body()))
        .mount(&server)
        .await;

    let provider = OsrmRouteProvider::new(Client::new(), server.uri());
    let err = provider.get_route(&waypoints()).await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnavailable(_)));
}

#[tokio::test]
async fn nominatim_garbled_multibyte_body_is_provider_unavailable() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(garbled_devanagari_body()))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(garbled_devanagari_body()))
        .mount(&server)
        .await;

    let geocoder = NominatimGeocoder::new(Client::new(), server.uri(), Some(RegionBias::india()));
    let forward = geocoder.forward("Chandni Chowk").await.unwrap_err();
    assert!(matches!(forward, Error::ProviderUnavailable(_)));

    let reverse = geocoder.reverse(28.6562, 77.2300).await.unwrap_err();
    assert!(matches!(reverse, Error::ProviderUnavailable(_)));
}
