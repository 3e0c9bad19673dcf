//! Health check to probe translation

use std::time::Duration;

use stack_common::HealthCheck;

use crate::error::CompilationError;
use crate::k8s::{ExecAction, HttpGetAction, ProbeSpec};

/// Build a probe from a service health check
///
/// Returns `None` when the service declares no health check. The HTTP check wins when
/// both handlers are present; the command list is used verbatim.
pub fn compile_probe(
    service_name: &str,
    healthcheck: Option<&HealthCheck>,
) -> Result<Option<ProbeSpec>, CompilationError> {
    let Some(hc) = healthcheck else {
        return Ok(None);
    };

    let mut probe = ProbeSpec {
        initial_delay_seconds: whole_seconds(hc.start_period),
        period_seconds: whole_seconds(hc.interval),
        timeout_seconds: whole_seconds(hc.timeout),
        failure_threshold: hc.retries,
        ..Default::default()
    };

    if let Some(http) = &hc.http {
        probe.http_get = Some(HttpGetAction {
            path: http.path.clone(),
            port: http.port,
        });
    } else if !hc.test.is_empty() {
        probe.exec = Some(ExecAction {
            command: hc.test.clone(),
        });
    } else {
        return Err(CompilationError::invalid_healthcheck(service_name));
    }

    Ok(Some(probe))
}

fn whole_seconds(d: Duration) -> i32 {
    i32::try_from(d.as_secs()).unwrap_or(i32::MAX)
}
