use std::collections::HashMap;

use relay::application::RegisteredDevice;

use crate::helper::spawn_app;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
struct Confirmation {
    message: String,
    device_name: String,
    ip: Option<String>,
}

#[actix_web::test]
async fn register_device_is_confirmed_and_listed() {
    let app = spawn_app().await;
    let client = reqwest::Client::new();

    for name in ["Living room TV", "Phone"] {
        let mut form = HashMap::new();
        form.insert("deviceName", name);
        let response = client
            .post(&app.path("register"))
            .json(&form)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let confirmation: Confirmation = response.json().await.unwrap();
        assert_eq!(confirmation.message, "Device registered");
        assert_eq!(confirmation.device_name, name);
        assert_eq!(confirmation.ip.as_deref(), Some("127.0.0.1"));
    }

    let devices: Vec<RegisteredDevice> = client
        .get(&app.path("devices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let names: Vec<_> = devices.into_iter().map(|d| d.device_name).collect();
    assert_eq!(names, vec!["Living room TV", "Phone"]);
}

#[actix_web::test]
async fn register_device_requires_a_name() {
    let app = spawn_app().await;
    let response = reqwest::Client::new()
        .post(&app.path("register"))
        .json(&HashMap::from([("name", "nameless")]))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
}

#[actix_web::test]
async fn http_registration_does_not_touch_the_roster() {
    let app = spawn_app().await;
    reqwest::Client::new()
        .post(&app.path("register"))
        .json(&HashMap::from([("deviceName", "Printer")]))
        .send()
        .await
        .unwrap();

    let (_a, roster) = app.registered("a").await;
    assert_eq!(roster, vec!["a"]);
}
