use std::sync::{Mutex, PoisonError};

use actix_web::{get, post, web, HttpRequest, Responder};
use tracing::info;

#[derive(Debug, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceForm {
    device_name: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredDevice {
    pub device_name: String,
    pub ip: Option<String>,
}

/// Devices announced over plain HTTP. Informational only, the signaling
/// registry never consults it.
#[derive(Debug, Default)]
pub struct DeviceBook {
    devices: Mutex<Vec<RegisteredDevice>>,
}

impl DeviceBook {
    pub fn add(&self, device: RegisteredDevice) {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(device);
    }

    pub fn list(&self) -> Vec<RegisteredDevice> {
        self.devices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[post("/register")]
pub async fn register_device(
    req: HttpRequest,
    form: web::Json<DeviceForm>,
    book: web::Data<DeviceBook>,
) -> impl Responder {
    let device = RegisteredDevice {
        device_name: form.into_inner().device_name,
        ip: req.peer_addr().map(|addr| addr.ip().to_string()),
    };
    info!(name = %device.device_name, ip = ?device.ip, "Device registered");
    book.add(device.clone());
    web::Json(serde_json::json!({
        "message": "Device registered",
        "deviceName": device.device_name,
        "ip": device.ip,
    }))
}

#[get("/devices")]
pub async fn devices(book: web::Data<DeviceBook>) -> impl Responder {
    web::Json(book.list())
}
