//! Integration tests for the HTTP API.

use axum::http::StatusCode;
use axum_test::TestServer;
use carefind::FacilityDirectory;
use carefind_service::{router, AppState};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

const DIRECTORY_CSV: &str = "\
Hospital_Name,Address_Original_First_Line,Location_Coordinates
Delhi Central Hospital,Connaught Place,\"28.6139, 77.2090\"
Gurugram Care,Sector 44,\"28.4595, 77.0266\"
Noida Medical Centre,Sector 18,\"28.5355, 77.3910\"
Mumbai General,Fort,\"19.0760, 72.8777\"
Broken Row,Nowhere,\"12.9, \"
";

fn write_directory(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("hospital_directory.csv");
    fs::write(&path, contents).unwrap();
    path
}

/// Create a test server over a directory written into `temp_dir`.
fn create_test_server(temp_dir: &TempDir) -> TestServer {
    let path = write_directory(temp_dir.path(), DIRECTORY_CSV);
    let directory = FacilityDirectory::load(&path).unwrap();
    let state = Arc::new(AppState { directory });

    TestServer::new(router(state)).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/health").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["version"].is_string());
    assert_eq!(json["facilities_loaded"], 4);
}

#[tokio::test]
async fn test_nearest_hospitals() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6139, "longitude": 77.2090, "limit": 3}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["user_location"]["latitude"], 28.6139);
    assert_eq!(json["user_location"]["longitude"], 77.2090);
    assert_eq!(json["total_found"], 3);
    assert_eq!(json["total_available"], 4);

    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0]["name"], "Delhi Central Hospital");
    assert_eq!(results[0]["distance_km"], 0.0);
    assert_eq!(results[0]["distance_formatted"], "0 meters");

    let distances: Vec<f64> = results
        .iter()
        .map(|r| r["distance_km"].as_f64().unwrap())
        .collect();
    assert!(distances.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_nearest_accepts_string_numbers() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": "19.0760", "longitude": "72.8777", "limit": "1"}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_found"], 1);
    assert_eq!(json["results"][0]["name"], "Mumbai General");
}

#[tokio::test]
async fn test_nearest_default_and_clamped_limit() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    // Fewer facilities than the default limit of 5
    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6, "longitude": 77.2}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_found"], 4);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6, "longitude": 77.2, "limit": 500}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_found"], 4);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6, "longitude": 77.2, "limit": "many"}))
        .await;
    response.assert_status_ok();
}

#[tokio::test]
async fn test_nearest_missing_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["error"], "Both latitude and longitude are required");
}

#[tokio::test]
async fn test_nearest_invalid_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    for body in [
        json!({"latitude": 91.0, "longitude": 0.0}),
        json!({"latitude": 0.0, "longitude": 181.0}),
        json!({"latitude": "north", "longitude": 10.0}),
    ] {
        let response = server.post("/api/nearest-hospitals").json(&body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: Value = response.json();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .contains("Invalid coordinates"));
    }
}

#[tokio::test]
async fn test_nearest_malformed_body() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/nearest-hospitals")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_within_radius() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/hospitals/within-radius")
        .json(&json!({"latitude": 28.6139, "longitude": 77.2090, "radius_km": 30}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["search_location"]["latitude"], 28.6139);
    assert_eq!(json["radius_km"], 30.0);
    assert_eq!(json["count"], 3);

    let results = json["results"].as_array().unwrap();
    assert!(results.iter().all(|r| r["distance_km"].as_f64().unwrap() <= 30.0));
    assert!(results.iter().all(|r| r["name"] != "Mumbai General"));
}

#[tokio::test]
async fn test_within_radius_default() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/hospitals/within-radius")
        .json(&json!({"latitude": 28.6139, "longitude": 77.2090}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["radius_km"], 50.0);
}

#[tokio::test]
async fn test_within_radius_tiny_radius_is_empty() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/hospitals/within-radius")
        .json(&json!({"latitude": 10.0, "longitude": 10.0, "radius_km": 0.001}))
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["count"], 0);
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_within_radius_invalid_radius() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    for radius in [json!(0), json!(-5), json!(501)] {
        let response = server
            .post("/api/hospitals/within-radius")
            .json(&json!({"latitude": 28.6, "longitude": 77.2, "radius_km": radius}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let json: Value = response.json();
        assert!(json["error"].as_str().unwrap().contains("Invalid radius"));
    }
}

#[tokio::test]
async fn test_within_radius_missing_coordinates() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/hospitals/within-radius")
        .json(&json!({"radius_km": 10}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_all_and_search() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/hospitals/all").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total"], 4);
    assert_eq!(json["results"][0]["name"], "Delhi Central Hospital");
    assert_eq!(json["results"][0]["address"], "Connaught Place");

    let response = server
        .get("/api/hospitals/all")
        .add_query_param("search", "MEDICAL")
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total"], 1);
    assert_eq!(json["results"][0]["name"], "Noida Medical Centre");

    let response = server
        .get("/api/hospitals/all")
        .add_query_param("search", "   ")
        .await;
    let json: Value = response.json();
    assert_eq!(json["total"], 4);
}

#[tokio::test]
async fn test_count() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/hospitals/count").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total"], 4);
    assert_eq!(json["status"], "loaded");
}

#[tokio::test]
async fn test_count_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_directory(
        temp_dir.path(),
        "Hospital_Name,Address_Original_First_Line,Location_Coordinates\n",
    );
    let state = Arc::new(AppState {
        directory: FacilityDirectory::load(&path).unwrap(),
    });
    let server = TestServer::new(router(state)).unwrap();

    let json: Value = server.get("/api/hospitals/count").await.json();
    assert_eq!(json["total"], 0);
    assert_eq!(json["status"], "empty");

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6, "longitude": 77.2}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total_found"], 0);
}

#[tokio::test]
async fn test_reload_replaces_directory() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    write_directory(
        temp_dir.path(),
        "name,latitude,longitude\nChennai Apollo,13.0827,80.2707\n",
    );

    let response = server.post("/api/hospitals/reload").await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["total"], 1);

    let response = server
        .post("/api/nearest-hospitals")
        .json(&json!({"latitude": 28.6139, "longitude": 77.2090, "limit": 20}))
        .await;
    let json: Value = response.json();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["name"], "Chennai Apollo");
    assert_eq!(results[0]["address"], "Address not available");
}

#[tokio::test]
async fn test_reload_failure_keeps_directory() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    fs::remove_file(temp_dir.path().join("hospital_directory.csv")).unwrap();

    let response = server.post("/api/hospitals/reload").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("not found"));

    let json: Value = server.get("/api/hospitals/count").await.json();
    assert_eq!(json["total"], 4);
}

#[tokio::test]
async fn test_geojson_endpoint() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .get("/api/hospitals/geojson")
        .add_query_param("search", "mumbai")
        .await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["type"], "FeatureCollection");

    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0]["geometry"]["type"], "Point");

    // GeoJSON order: [lon, lat]
    let coords = features[0]["geometry"]["coordinates"].as_array().unwrap();
    assert_eq!(coords[0].as_f64().unwrap(), 72.8777);
    assert_eq!(coords[1].as_f64().unwrap(), 19.0760);
    assert_eq!(features[0]["properties"]["name"], "Mumbai General");
}

#[tokio::test]
async fn test_emergency_keywords() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server.get("/api/symptoms/emergency-keywords").await;

    response.assert_status_ok();
    let json: Value = response.json();
    let keywords = json["keywords"].as_array().unwrap();
    assert_eq!(keywords.len(), 15);
    assert!(keywords.iter().any(|k| k == "chest pain"));
}

#[tokio::test]
async fn test_check_emergency() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/symptoms/check-emergency")
        .json(&json!({"symptoms": "Sudden chest pain and sweating"}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["is_emergency"], true);

    let response = server
        .post("/api/symptoms/check-emergency")
        .json(&json!({"symptoms": "Mild cough for two days"}))
        .await;
    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["is_emergency"], false);
    assert!(json["disclaimer"].is_string());
}

#[tokio::test]
async fn test_check_emergency_rejects_bad_input() {
    let temp_dir = TempDir::new().unwrap();
    let server = create_test_server(&temp_dir);

    let response = server
        .post("/api/symptoms/check-emergency")
        .json(&json!({}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/symptoms/check-emergency")
        .json(&json!({"symptoms": "a".repeat(2001)}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}
