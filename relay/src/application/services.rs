use actix::*;
use actix_web::{get, web, Error, HttpRequest, HttpResponse, Responder};
use metrics_exporter_prometheus::PrometheusHandle;

use super::{client, registry::Registry};

mod device;
pub use device::*;

#[get("/health_check")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[get("/ws")]
async fn connect(
    req: HttpRequest,
    stream: web::Payload,
    registry: web::Data<Addr<Registry>>,
) -> Result<HttpResponse, Error> {
    let websocket = client::WsClient::new(registry.get_ref().clone());
    client::start(websocket, &req, stream)
}

/// Prometheus text exposition of the relay counters.
#[get("/metrics")]
async fn render_metrics(handle: web::Data<PrometheusHandle>) -> impl Responder {
    handle.render()
}
