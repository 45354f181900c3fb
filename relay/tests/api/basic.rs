use crate::helper::spawn_app;

#[actix_web::test]
async fn health_check_works() {
    let app = spawn_app().await;
    let response = reqwest::Client::new()
        .get(&app.path("health_check"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), 200);
    assert_eq!(response.content_length(), Some(0));
}

#[actix_web::test]
async fn metrics_are_exposed_as_prometheus_text() {
    let app = spawn_app().await;
    let (_a, _) = app.registered("a").await;

    let response = reqwest::get(app.path("metrics"))
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("# TYPE relay_registrations_total counter"), "{body}");
    assert!(app.counter("relay_connections_opened_total").await >= 1);
    assert!(app.counter("relay_rosters_published_total").await >= 1);
}

#[actix_web::test]
async fn plain_get_on_ws_is_rejected() {
    let app = spawn_app().await;
    let response = reqwest::Client::new()
        .get(&app.path("ws"))
        .send()
        .await
        .expect("Failed to execute request.");
    assert_eq!(response.status(), 400);
}
