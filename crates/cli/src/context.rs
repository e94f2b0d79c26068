//! Application context - wires infra adapters into core services

use std::sync::Arc;

use dashops_core::{
    AlwaysOnChecker, BatchSubmitter, DashboardApi, MotionAlert, Notifier, PerfChecker,
    PortTrigger, ProvisionBot, ProvisioningSequencer, RandomTagPicker, SnapshotBot,
    StatusReporter,
};
use dashops_domain::{AppConfig, Result};
use dashops_infra::{
    FileArtifactStore, FileScanLogs, HttpClient, HttpSnapshotDownloader, JsonStateStore,
    MerakiClient, WebexClient,
};

/// Type alias for dashboard port trait object
type DynDashboard = dyn DashboardApi + Send + Sync + 'static;

/// Type alias for notifier port trait object
type DynNotifier = dyn Notifier + Send + Sync + 'static;

/// Configuration plus the clients every command needs.
pub struct AppContext {
    pub config: AppConfig,
    meraki: Arc<MerakiClient>,
    http: HttpClient,
}

impl AppContext {
    /// Fails with `Config` when no dashboard API key is configured.
    pub fn new(config: AppConfig) -> Result<Self> {
        let http = HttpClient::new()?;
        let meraki = MerakiClient::new(config.meraki.require_api_key()?, http.clone())
            .with_base_url(&config.meraki.base_url);
        Ok(Self { config, meraki: Arc::new(meraki), http })
    }

    pub fn org_id(&self) -> Result<&str> {
        self.config.meraki.require_org_id()
    }

    pub fn api_key(&self) -> &str {
        &self.config.meraki.api_key
    }

    pub fn dashboard(&self) -> Arc<DynDashboard> {
        self.meraki.clone()
    }

    /// Chat notifier; fails with `Config` when the bot token or recipient is
    /// missing.
    pub fn notifier(&self) -> Result<Arc<DynNotifier>> {
        let webex = &self.config.webex;
        webex.validate()?;
        Ok(Arc::new(
            WebexClient::new(&webex.token, &webex.email, self.http.clone()).with_base_url(&webex.base_url),
        ))
    }

    pub fn status_reporter(&self) -> Result<StatusReporter> {
        Ok(StatusReporter::new(self.dashboard(), self.notifier()?))
    }

    pub fn perf_checker(&self) -> Result<PerfChecker> {
        Ok(PerfChecker::new(self.dashboard(), self.notifier()?, self.config.perf.clone()))
    }

    pub fn always_on_checker(&self) -> Result<AlwaysOnChecker> {
        Ok(AlwaysOnChecker::new(self.dashboard(), self.notifier()?, self.config.always_on.tag.clone()))
    }

    pub fn provision_bot(&self) -> Result<ProvisionBot> {
        Ok(ProvisionBot::new(self.dashboard(), self.notifier()?))
    }

    pub fn port_trigger(&self) -> Result<PortTrigger> {
        Ok(PortTrigger::new(self.dashboard(), self.notifier()?))
    }

    pub fn snapshot_bot(&self) -> Result<SnapshotBot> {
        Ok(SnapshotBot::new(self.dashboard(), self.notifier()?))
    }

    pub fn motion_alert(&self) -> Result<MotionAlert> {
        let sense = &self.config.sense;
        Ok(MotionAlert::new(
            self.dashboard(),
            self.notifier()?,
            Arc::new(HttpSnapshotDownloader::new(self.http.clone(), std::env::temp_dir())),
            Arc::new(FileScanLogs::new(&sense.log_dir)),
            sense.normalized_home_macs(),
        ))
    }

    pub fn sequencer(&self) -> Result<ProvisioningSequencer> {
        let demo = &self.config.demo;
        Ok(ProvisioningSequencer::new(
            self.dashboard(),
            BatchSubmitter::new(self.meraki.clone()),
            Arc::new(JsonStateStore::new(&demo.state_path)),
            Arc::new(FileArtifactStore::new(&demo.artifact_dir)),
            self.notifier()?,
            Arc::new(HttpSnapshotDownloader::new(self.http.clone(), &demo.artifact_dir)),
            Arc::new(RandomTagPicker),
        ))
    }
}
