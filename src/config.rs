use std::path::PathBuf;

/// Runtime configuration for the bridge.
///
/// Resolution order for every field: explicit builder value, then the
/// environment (after loading `.env` via dotenvy), then the default.
/// There are no argv flags; topic and queue depth arrive through the
/// environment the way the middleware's parameter mechanism would deliver
/// them.
///
/// # Examples
///
/// ```
/// use btbridge::config::BridgeConfig;
///
/// let config = BridgeConfig::default().with_topic("/my_tree/log");
/// assert_eq!(config.topic, "/my_tree/log");
/// assert_eq!(config.queue_depth, BridgeConfig::DEFAULT_QUEUE_DEPTH);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Topic carrying behavior-tree log messages.
    pub topic: String,
    /// Bounded delivery queue depth for pending messages.
    pub queue_depth: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            topic: Self::DEFAULT_TOPIC.to_string(),
            queue_depth: Self::DEFAULT_QUEUE_DEPTH,
        }
    }
}

impl BridgeConfig {
    /// Well-known topic for behavior-tree logs.
    pub const DEFAULT_TOPIC: &'static str = "/behavior_tree_log";
    /// Default number of pending messages the delivery queue holds.
    pub const DEFAULT_QUEUE_DEPTH: usize = 10;

    /// Environment variable overriding the topic name.
    pub const TOPIC_VAR: &'static str = "BT_BRIDGE_TOPIC";
    /// Environment variable overriding the queue depth.
    pub const QUEUE_DEPTH_VAR: &'static str = "BT_BRIDGE_QUEUE_DEPTH";

    /// Resolves configuration from the process environment.
    ///
    /// A malformed `BT_BRIDGE_QUEUE_DEPTH` (not a positive integer) falls
    /// back to the default rather than failing startup.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let topic =
            std::env::var(Self::TOPIC_VAR).unwrap_or_else(|_| Self::DEFAULT_TOPIC.to_string());
        let queue_depth = std::env::var(Self::QUEUE_DEPTH_VAR)
            .ok()
            .and_then(|raw| raw.parse::<usize>().ok())
            .filter(|depth| *depth > 0)
            .unwrap_or(Self::DEFAULT_QUEUE_DEPTH);
        Self { topic, queue_depth }
    }

    #[must_use]
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = topic.into();
        self
    }

    #[must_use]
    pub fn with_queue_depth(mut self, queue_depth: usize) -> Self {
        self.queue_depth = queue_depth.max(1);
        self
    }
}

/// Resolves the middleware forwarding endpoint (a Unix socket path).
///
/// Checked in order: `BT_BRIDGE_ENDPOINT`, `$XDG_RUNTIME_DIR/btbridge.sock`,
/// `/tmp/btbridge.sock`.
pub fn resolve_endpoint() -> PathBuf {
    if let Ok(path) = std::env::var(ENDPOINT_VAR) {
        return PathBuf::from(path);
    }
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return PathBuf::from(runtime_dir).join("btbridge.sock");
    }
    PathBuf::from("/tmp/btbridge.sock")
}

/// Environment variable naming the middleware forwarding endpoint.
pub const ENDPOINT_VAR: &str = "BT_BRIDGE_ENDPOINT";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_well_known_values() {
        let config = BridgeConfig::default();
        assert_eq!(config.topic, "/behavior_tree_log");
        assert_eq!(config.queue_depth, 10);
    }

    #[test]
    fn builder_clamps_zero_depth() {
        let config = BridgeConfig::default().with_queue_depth(0);
        assert_eq!(config.queue_depth, 1);
    }
}
