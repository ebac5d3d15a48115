use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use std::time::Duration;

/// Configuration for the background tasks worker.
#[serde_as]
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TasksConfig {
    /// How long the worker sleeps when there are no queued tasks (default is 1 second).
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub poll_interval: Duration,
}

impl Default for TasksConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TasksConfig;
    use std::time::Duration;

    #[test]
    fn deserialization() {
        let config: TasksConfig = toml::from_str("poll_interval = 1000").unwrap();
        assert_eq!(config, TasksConfig::default());

        let config: TasksConfig = toml::from_str("poll_interval = 50").unwrap();
        assert_eq!(config.poll_interval, Duration::from_millis(50));
    }
}
