use kcet_guide::catalog::{CatalogImporter, CatalogSnapshot};
use kcet_guide::config::AppConfig;
use kcet_guide::counselling::CounsellingService;
use kcet_guide::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Imports the catalog from the configured data directory and binds it to a service.
pub(crate) fn build_service(config: &AppConfig) -> Result<Arc<CounsellingService>, AppError> {
    let snapshot: CatalogSnapshot = CatalogImporter::from_dir(&config.data.data_dir)?;
    Ok(Arc::new(CounsellingService::new(
        Arc::new(snapshot),
        config.counselling.policy(),
    )))
}
