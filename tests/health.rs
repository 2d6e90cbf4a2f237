use axum_restaurant_api::routes::health::health_check;

#[tokio::test]
async fn health_check_reports_ok_without_pagination_meta() {
    let response = health_check().await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.as_ref().expect("health data");
    assert_eq!(data.status, "ok");

    // Plain responses serialize without a meta block.
    let body = serde_json::to_value(&response.0).expect("serializable body");
    assert_eq!(body["data"]["status"], "ok");
    assert!(body.get("meta").is_none());
}
