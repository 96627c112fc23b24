use anyhow::Result;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the Prometheus recorder globally and store the handle.
///
/// Safe to call more than once; later calls reuse the installed recorder.
pub fn init_metrics() -> Result<()> {
    // ---
    HANDLE
        .get_or_try_init(|| PrometheusBuilder::new().install_recorder())
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {e}"))?;

    Ok(())
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
