//! Plan command
//!
//! Runs the VIP translator against a recording device and reports the
//! appliance calls it would issue.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use lbaas_config::DeviceConfigStore;
use lbaas_core::{DeviceClient, DeviceConfig, Pool, RequestContext, StaticPoolLookup, Vip, VipEvent};
use lbaas_drivers::{DeviceCall, RecordingDeviceClient, VipDispatcher, VipHandler};

use super::OutputFormat;

/// Calls issued for one event, plus the error that ended the sequence
#[derive(Debug, Serialize)]
pub struct PlanOutcome {
    pub device: String,
    pub action: String,
    pub vip: String,
    pub calls: Vec<DeviceCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct PlanCommand {
    store: DeviceConfigStore,
    pools: Option<StaticPoolLookup>,
}

impl PlanCommand {
    pub fn new(store: DeviceConfigStore) -> Self {
        Self { store, pools: None }
    }

    /// Resolve pools from a fixed set instead of trusting the VIP
    pub fn with_pools(mut self, pools: Vec<Pool>) -> Self {
        self.pools = Some(StaticPoolLookup::with_pools(pools));
        self
    }

    /// Translate `event` for `device` without touching a real appliance
    pub async fn plan(&self, device: &str, event: &VipEvent) -> Result<PlanOutcome> {
        let pools = match &self.pools {
            Some(pools) => pools.clone(),
            None => assumed_pools(event),
        };

        let recorder = Arc::new(RecordingDeviceClient::new(device));
        let shared = Arc::clone(&recorder);
        let dispatcher = VipDispatcher::new(
            self.store.clone(),
            VipHandler::new(Arc::new(pools)),
            Box::new(move |_device: &DeviceConfig| Arc::clone(&shared) as Arc<dyn DeviceClient>),
        );

        let result = dispatcher
            .handle(&RequestContext::new(), device, event)
            .await;

        Ok(PlanOutcome {
            device: device.to_string(),
            action: event.action().to_string(),
            vip: event.vip_id().to_string(),
            calls: recorder.take_calls(),
            error: result.err().map(|e| e.to_string()),
        })
    }

    pub fn render(outcome: &PlanOutcome, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
            OutputFormat::Text => {
                let mut out = format!(
                    "Plan for {} of VIP {} on {}:\n",
                    outcome.action, outcome.vip, outcome.device
                );
                if outcome.calls.is_empty() {
                    out.push_str("  (no device calls)\n");
                }
                for (i, call) in outcome.calls.iter().enumerate() {
                    out.push_str(&format!("  {}. {}\n", i + 1, call));
                }
                if let Some(error) = &outcome.error {
                    out.push_str(&format!("Stopped: {}\n", error));
                }
                Ok(out)
            }
        }
    }

    /// Plan, print, and fail if the translator failed
    pub async fn execute(&self, device: &str, event: &VipEvent, format: OutputFormat) -> Result<()> {
        let outcome = self.plan(device, event).await?;
        println!("{}", Self::render(&outcome, format)?);

        if let Some(error) = outcome.error {
            anyhow::bail!("{} of VIP {} failed: {}", outcome.action, outcome.vip, error);
        }
        Ok(())
    }
}

/// Without a pool file the pools referenced by the event are taken to exist.
fn assumed_pools(event: &VipEvent) -> StaticPoolLookup {
    let vip = match event {
        VipEvent::Created { vip } | VipEvent::Deleted { vip } => vip,
        VipEvent::Updated { new, .. } => new,
    };
    StaticPoolLookup::with_pools(vec![Pool::new(
        vip.pool_id.clone(),
        vip.tenant_id.clone(),
        vip.protocol,
    )])
}

/// Read a VIP payload as sent by the control plane
pub fn load_vip<P: AsRef<Path>>(path: P) -> Result<Vip> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read VIP file: {}", path.display()))?;
    let vip: Vip = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse VIP file: {}", path.display()))?;
    Ok(vip)
}

/// Read a JSON array of pool records
pub fn load_pools<P: AsRef<Path>>(path: P) -> Result<Vec<Pool>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read pool file: {}", path.display()))?;
    let pools: Vec<Pool> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse pool file: {}", path.display()))?;
    Ok(pools)
}
