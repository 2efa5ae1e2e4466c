//! Prometheus exporter for the advisor's counters and histograms.

use crate::config::MetricsSettings;
use crate::{Error, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::thread;

/// Metrics configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsConfig {
    /// Whether the exporter is installed.
    pub enabled: bool,
    /// Address the `/metrics` listener binds to.
    pub listen_addr: SocketAddr,
}

impl MetricsConfig {
    /// Builds metrics configuration from resolved settings.
    #[must_use]
    pub const fn from_settings(settings: &MetricsSettings) -> Self {
        Self {
            enabled: settings.enabled,
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), settings.port),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::from_settings(&MetricsSettings::default())
    }
}

/// Installs the Prometheus recorder and its HTTP listener.
///
/// Returns `None` when the exporter is disabled, leaving the `metrics`
/// macros as no-ops.
///
/// # Errors
///
/// Returns an error if the listener cannot be built or a global recorder is
/// already installed.
pub fn install_prometheus(config: &MetricsConfig) -> Result<Option<PrometheusHandle>> {
    if !config.enabled {
        return Ok(None);
    }

    let builder = PrometheusBuilder::new().with_http_listener(config.listen_addr);
    let handle = install_listener(builder)?;
    tracing::info!(addr = %config.listen_addr, "Prometheus exporter listening");
    Ok(Some(handle))
}

fn install_listener(builder: PrometheusBuilder) -> Result<PrometheusHandle> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        return install_with_runtime(builder, &handle);
    }
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_init".to_string(),
            cause: e.to_string(),
        })?;
    let handle = runtime.handle().clone();
    let prometheus = install_with_runtime(builder, &handle)?;
    thread::Builder::new()
        .name("uniguide-metrics-http".to_string())
        .spawn(move || runtime.block_on(std::future::pending::<()>()))
        .map_err(|e| Error::OperationFailed {
            operation: "metrics_runtime_thread".to_string(),
            cause: e.to_string(),
        })?;
    Ok(prometheus)
}

fn install_with_runtime(
    builder: PrometheusBuilder,
    runtime_handle: &tokio::runtime::Handle,
) -> Result<PrometheusHandle> {
    let (recorder, exporter) = {
        let _guard = runtime_handle.enter();
        builder.build().map_err(|e| Error::OperationFailed {
            operation: "metrics_exporter_build".to_string(),
            cause: e.to_string(),
        })?
    };
    let handle = recorder.handle();
    set_global_recorder(recorder)?;
    runtime_handle.spawn(exporter);
    Ok(handle)
}

fn set_global_recorder(recorder: PrometheusRecorder) -> Result<()> {
    metrics::set_global_recorder(recorder).map_err(|e| Error::OperationFailed {
        operation: "metrics_recorder_install".to_string(),
        cause: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_installs_nothing() {
        let config = MetricsConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.listen_addr.port(), 9090);
        assert!(install_prometheus(&config).unwrap().is_none());
    }

    #[test]
    fn test_from_settings_uses_port() {
        let settings = MetricsSettings {
            enabled: true,
            port: 9464,
        };
        let config = MetricsConfig::from_settings(&settings);
        assert!(config.enabled);
        assert_eq!(config.listen_addr.to_string(), "0.0.0.0:9464");
    }

    #[test]
    fn test_recorder_renders_advisor_counters() {
        use crate::models::{PreferenceState, UniversityRecord};
        use crate::{FuzzyRanker, recommend};

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let catalogue = vec![UniversityRecord::new("ucl.ac.uk", "UCL").with_location("London")];

        let strategy = metrics::with_local_recorder(&recorder, || {
            recommend(
                &FuzzyRanker::default(),
                None,
                &PreferenceState::new(),
                "ucl",
                &catalogue,
            )
            .strategy()
        });

        let rendered = handle.render();
        assert!(rendered.contains(&format!("strategy=\"{}\"", strategy.as_str())));
        assert!(rendered.contains("recommendations_total"));
        assert!(rendered.contains("ranking_candidates"));
    }
}
