//! Health check model

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Health check declared on a service
///
/// Exactly one handler is expected: `http` takes precedence over `test`. Durations are
/// expressed in whole seconds in the stack document.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    /// HTTP GET check
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpHealthCheck>,

    /// Command check, passed verbatim to an exec probe
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test: Vec<String>,

    /// Grace period before the first check
    #[serde(default, with = "duration_secs")]
    pub start_period: Duration,

    /// Per-check timeout
    #[serde(default, with = "duration_secs")]
    pub timeout: Duration,

    /// Time between checks
    #[serde(default, with = "duration_secs")]
    pub interval: Duration,

    /// Consecutive failures tolerated
    #[serde(default)]
    pub retries: i32,
}

impl HealthCheck {
    /// HTTP check against `path` on `port`
    pub fn http(path: impl Into<String>, port: u16) -> Self {
        Self {
            http: Some(HttpHealthCheck {
                path: path.into(),
                port,
            }),
            ..Default::default()
        }
    }

    /// Command check
    pub fn command<I, S>(test: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            test: test.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
}

/// HTTP GET health check target
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HttpHealthCheck {
    /// Request path
    pub path: String,
    /// Container port
    pub port: u16,
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
