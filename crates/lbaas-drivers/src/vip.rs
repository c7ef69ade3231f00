//! VIP handler
//!
//! Translates VIP lifecycle operations into appliance calls. A VIP maps to
//! one virtual-server (address, state), one virtual-port bound to it
//! (protocol, port, service group) and, with session persistence, one
//! persistence template named after the VIP.

use log::{debug, info, warn};
use serde_json::Value;
use std::sync::Arc;

use lbaas_core::{
    autosnat_argument, default_vrid_argument, ipinip_argument, DeviceArgs, DeviceClient,
    DeviceConfig, LbaasError, PersistencePolicy, Pool, PoolLookup, RequestContext, Result,
    TemplateKind, Vip,
};

/// Stateless VIP translator
pub struct VipHandler {
    pools: Arc<dyn PoolLookup>,
}

impl VipHandler {
    pub fn new(pools: Arc<dyn PoolLookup>) -> Self {
        Self { pools }
    }

    /// Create virtual-server, virtual-port and, if requested, the
    /// persistence template.
    ///
    /// An unsupported persistence kind fails after the virtual-server and
    /// virtual-port exist on the device; those are left in place.
    pub async fn create(
        &self,
        context: &RequestContext,
        client: &dyn DeviceClient,
        device: &DeviceConfig,
        vip: &Vip,
    ) -> Result<()> {
        vip.validate()?;
        let pool = self.pools.get_pool(context, &vip.pool_id).await?;

        let vs_args = virtual_server_args(device, vip);
        debug!(
            "[{}] {}: slb.virtual_server.create {} {:?}",
            context.request_id, device.name, vip.id, vs_args
        );
        client.virtual_server_create(&vip.id, &vs_args).await?;

        let vport_args = virtual_port_args(device, vip, &pool);
        debug!(
            "[{}] {}: slb.virtual_server.vport.create {} {:?}",
            context.request_id, device.name, vip.id, vport_args
        );
        client
            .virtual_port_create(&vip.id, &vip.id, &vport_args)
            .await?;

        if let Some(kind) = vip.persistence_kind() {
            let policy = PersistencePolicy::for_kind(kind);
            if !policy.supported {
                return Err(LbaasError::UnsupportedFeature {
                    feature: format!("session persistence {}", kind),
                    device: device.name.clone(),
                });
            }

            debug!(
                "[{}] {}: slb.template.{}.create {}",
                context.request_id, device.name, policy.template, vip.id
            );
            client
                .persistence_template_create(policy.template, &vip.id, &DeviceArgs::new())
                .await?;

            let mut binding = DeviceArgs::new();
            binding.insert(
                policy.binding_field().to_string(),
                Value::String(vip.id.clone()),
            );
            client
                .virtual_port_update(&vip.id, &vip.id, &binding)
                .await?;
        }

        info!(
            "[{}] {}: created VIP {} ({} {}:{})",
            context.request_id, device.name, vip.id, vip.protocol, vip.address, vip.protocol_port
        );
        Ok(())
    }

    /// Bring the virtual-port in line with `new` and swap persistence
    /// templates when the kind changed. Address and identifier are taken as
    /// unchanged.
    pub async fn update(
        &self,
        context: &RequestContext,
        client: &dyn DeviceClient,
        device: &DeviceConfig,
        old: &Vip,
        new: &Vip,
    ) -> Result<()> {
        new.validate()?;
        let pool = self.pools.get_pool(context, &new.pool_id).await?;

        let old_kind = old.persistence_kind();
        let new_kind = new.persistence_kind();

        if old_kind != new_kind {
            if let Some(kind) = old_kind {
                let policy = PersistencePolicy::for_kind(kind);
                debug!(
                    "[{}] {}: slb.template.{}.delete {}",
                    context.request_id, device.name, policy.template, old.id
                );
                client
                    .persistence_template_delete(policy.template, &old.id)
                    .await?;
            }

            if let Some(kind) = new_kind {
                let policy = PersistencePolicy::for_kind(kind);
                if policy.supported {
                    debug!(
                        "[{}] {}: slb.template.{}.create {}",
                        context.request_id, device.name, policy.template, new.id
                    );
                    client
                        .persistence_template_create(policy.template, &new.id, &DeviceArgs::new())
                        .await?;
                } else {
                    warn!(
                        "[{}] {}: session persistence {} not supported, VIP {} left without persistence",
                        context.request_id, device.name, kind, new.id
                    );
                }
            }
        }

        let mut args = DeviceArgs::new();
        args.insert("protocol".to_string(), Value::from(new.protocol.to_string()));
        args.insert("port".to_string(), Value::from(new.protocol_port));
        args.insert("service_group".to_string(), Value::from(pool.id.clone()));
        args.insert("state".to_string(), Value::from(new.admin_state().as_str()));

        // Every binding field is sent; null unbinds templates of other kinds.
        let bound = new_kind
            .map(PersistencePolicy::for_kind)
            .filter(|policy| policy.supported)
            .map(|policy| policy.template);
        for template in TemplateKind::ALL {
            let value = if bound == Some(template) {
                Value::String(new.id.clone())
            } else {
                Value::Null
            };
            args.insert(template.binding_field().to_string(), value);
        }

        debug!(
            "[{}] {}: slb.virtual_server.vport.update {} {:?}",
            context.request_id, device.name, new.id, args
        );
        client.virtual_port_update(&new.id, &new.id, &args).await?;

        info!(
            "[{}] {}: updated VIP {}",
            context.request_id, device.name, new.id
        );
        Ok(())
    }

    /// Remove the persistence template (if any) and the virtual-server. The
    /// appliance drops the bound virtual-port together with its server.
    pub async fn delete(
        &self,
        context: &RequestContext,
        client: &dyn DeviceClient,
        device: &DeviceConfig,
        vip: &Vip,
    ) -> Result<()> {
        // Cleanup is attempted for unsupported kinds as well.
        if let Some(kind) = vip.persistence_kind() {
            let policy = PersistencePolicy::for_kind(kind);
            debug!(
                "[{}] {}: slb.template.{}.delete {}",
                context.request_id, device.name, policy.template, vip.id
            );
            client
                .persistence_template_delete(policy.template, &vip.id)
                .await?;
        }

        debug!(
            "[{}] {}: slb.virtual_server.delete {}",
            context.request_id, device.name, vip.id
        );
        client.virtual_server_delete(&vip.id).await?;

        info!(
            "[{}] {}: deleted VIP {}",
            context.request_id, device.name, vip.id
        );
        Ok(())
    }
}

/// Virtual-server create arguments including device overrides
fn virtual_server_args(device: &DeviceConfig, vip: &Vip) -> DeviceArgs {
    let mut args = device.virtual_server_defaults.clone();
    args.insert("address".to_string(), Value::from(vip.address.to_string()));
    args.insert("state".to_string(), Value::from(vip.admin_state().as_str()));

    // An operator-supplied vrid wins over the device default.
    if let Some((key, value)) =
        default_vrid_argument(&device.api_version, device.default_virtual_server_vrid)
    {
        args.entry(key).or_insert(value);
    }

    if let Some((key, value)) = ipinip_argument(&device.api_version, device.ipinip) {
        args.insert(key.to_string(), value);
    }

    args
}

/// Virtual-port create arguments; ports always start out enabled
fn virtual_port_args(device: &DeviceConfig, vip: &Vip, pool: &Pool) -> DeviceArgs {
    let mut args = device.virtual_port_defaults.clone();
    args.insert("protocol".to_string(), Value::from(vip.protocol.to_string()));
    args.insert("port".to_string(), Value::from(vip.protocol_port));
    args.insert("service_group".to_string(), Value::from(pool.id.clone()));
    args.insert("state".to_string(), Value::from("UP"));

    if let Some((key, value)) = autosnat_argument(&device.api_version, device.autosnat) {
        args.insert(key.to_string(), value);
    }

    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use lbaas_core::Protocol;

    fn device(version: &str) -> DeviceConfig {
        DeviceConfig::new("ax1".to_string(), "10.0.0.1".to_string(), version.to_string())
    }

    fn vip() -> Vip {
        Vip::new(
            "id1".to_string(),
            "ten1".to_string(),
            Protocol::Http,
            "1.1.1.1".parse().unwrap(),
            80,
            "pool1".to_string(),
        )
    }

    #[test]
    fn test_virtual_server_args_minimal() {
        let args = virtual_server_args(&device("3.0"), &vip());

        assert_eq!(args.len(), 2);
        assert_eq!(args["address"], "1.1.1.1");
        assert_eq!(args["state"], "UP");
    }

    #[test]
    fn test_operator_vrid_not_overridden() {
        let mut device = device("3.0");
        device.default_virtual_server_vrid = Some(7);
        device
            .virtual_server_defaults
            .insert("vrid".to_string(), Value::from(3));

        let args = virtual_server_args(&device, &vip());
        assert_eq!(args["vrid"], 3);
    }

    #[test]
    fn test_defaults_do_not_override_vip_fields() {
        let mut device = device("2.1");
        device
            .virtual_port_defaults
            .insert("port".to_string(), Value::from(8080));
        device
            .virtual_port_defaults
            .insert("conn_limit".to_string(), Value::from(100));

        let pool = Pool::new("pool1".to_string(), "ten1".to_string(), Protocol::Http);
        let args = virtual_port_args(&device, &vip(), &pool);

        assert_eq!(args["port"], 80);
        assert_eq!(args["conn_limit"], 100);
        assert_eq!(args["service_group"], "pool1");
    }
}
