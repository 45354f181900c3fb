use std::fmt;

pub struct ClientConfig {
    pub address: String,
    pub port: u16,
    pub path: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url())
            .finish()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8080,
            path: "/ws".to_string(),
        }
    }
}

impl ClientConfig {
    pub fn url(&self) -> String {
        format!("ws://{}:{}{}", self.address, self.port, self.path)
    }
}

#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }

    pub fn address<S: AsRef<str>>(mut self, address: S) -> Self {
        self.config.address = address.as_ref().to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn path<S: AsRef<str>>(mut self, path: S) -> Self {
        let path = path.as_ref();
        self.config.path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        self
    }
}
