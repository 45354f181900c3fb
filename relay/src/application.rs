use actix::*;
use actix_web::{dev::Server, web, App, HttpServer};
use std::net::TcpListener;
use tracing::info;

use crate::settings::Settings;

use self::{registry::Registry, services::DeviceBook};

mod broadcaster;
mod client;
pub mod metrics;
pub mod registry;
pub mod router;
mod services;
pub mod state;
#[cfg(test)]
mod testing;
use services::{connect, devices, health_check, register_device, render_metrics};

pub use services::RegisteredDevice;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(&address)?;
        let port = listener.local_addr()?.port();
        info!("Running on port: {port}");

        let server = create_server(listener)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn create_server(listener: TcpListener) -> Result<Server, anyhow::Error> {
    let prometheus = web::Data::new(self::metrics::install()?);
    let registry = web::Data::new(Registry::new().start());
    let device_book = web::Data::new(DeviceBook::default());
    Ok(HttpServer::new(move || {
        App::new()
            .app_data(prometheus.clone())
            .app_data(registry.clone())
            .app_data(device_book.clone())
            .service(health_check)
            .service(connect)
            .service(render_metrics)
            .service(register_device)
            .service(devices)
    })
    .listen(listener)?
    .run())
}
