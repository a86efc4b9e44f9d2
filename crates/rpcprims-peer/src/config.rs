use rpcprims_frame::FrameConfig;

/// Server-side settings.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Framing limits applied to every connection.
    pub frame: FrameConfig,
}

impl ServerConfig {
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    /// Shorthand for capping request and response payloads.
    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.frame = self.frame.with_max_payload_size(max_payload_size);
        self
    }
}

/// Client-side settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Framing limits applied to every call.
    pub frame: FrameConfig,
    /// Disable Nagle's algorithm on new connections. Default: `true`.
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            frame: FrameConfig::default(),
            nodelay: true,
        }
    }
}

impl ClientConfig {
    pub fn with_frame_config(mut self, frame: FrameConfig) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_max_payload_size(mut self, max_payload_size: usize) -> Self {
        self.frame = self.frame.with_max_payload_size(max_payload_size);
        self
    }

    pub fn with_nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }
}

#[cfg(test)]
mod tests {
    use rpcprims_frame::DEFAULT_MAX_PAYLOAD;

    use super::*;

    #[test]
    fn defaults() {
        assert_eq!(
            ServerConfig::default().frame.max_payload_size,
            DEFAULT_MAX_PAYLOAD
        );
        let client = ClientConfig::default();
        assert!(client.nodelay);
        assert_eq!(client.frame.max_payload_size, DEFAULT_MAX_PAYLOAD);
    }

    #[test]
    fn builders_override() {
        let server = ServerConfig::default().with_max_payload_size(1024);
        assert_eq!(server.frame.max_payload_size, 1024);

        let client = ClientConfig::default()
            .with_nodelay(false)
            .with_frame_config(FrameConfig::default().with_max_payload_size(16));
        assert!(!client.nodelay);
        assert_eq!(client.frame.max_payload_size, 16);
    }
}
