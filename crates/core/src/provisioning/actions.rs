//! Action builders for the demo workflow
//!
//! Addressing plan for site number N:
//! - management VLAN: `10.N.1.0/24`, appliance at `.1`
//! - Data/Voice/Guest VLANs: id `N1`..`N3`, subnet `10.N.N1.0/24`..

use dashops_domain::constants::{DEMO_FILLER_TAGS, DEMO_NETWORK_TYPE};
use dashops_domain::{
    Action, AppliancePortUpdate, ApplianceVlan, ClaimRequest, CreateNetworkRequest, DeviceRole,
    ManagementInterfaceUpdate, Result, SwitchPortUpdate, UpdateDeviceRequest, Wan1Settings,
};

use super::policies::{group_policy, POLICY_NAMES};
use super::ports::TagPicker;

/// Names of the extra VLANs, in id order (`N1`, `N2`, `N3`).
pub const SITE_VLAN_NAMES: [&str; 3] = ["Data", "Voice", "Guest"];

/// Tags drawn per network, device and switch port.
const TAGS_PER_OBJECT: usize = 3;

/// Custom tags plus the fixed filler tags.
pub fn tag_pool(custom_tags: &[String]) -> Vec<String> {
    custom_tags
        .iter()
        .cloned()
        .chain(DEMO_FILLER_TAGS.iter().map(|t| (*t).to_string()))
        .collect()
}

/// Three random tags from the pool, space separated.
pub fn random_tags(picker: &dyn TagPicker, custom_tags: &[String]) -> String {
    picker.pick_tags(&tag_pool(custom_tags), TAGS_PER_OBJECT).join(" ")
}

pub fn management_subnet(site: u32) -> String {
    format!("10.{site}.1.0/24")
}

/// Id of extra VLAN `x` (1..=3) at `site`: the decimal concatenation `"{N}{x}"`.
pub fn site_vlan_id(site: u32, x: u32) -> u32 {
    site * 10 + x
}

pub fn site_vlan_subnet(site: u32, x: u32) -> String {
    format!("10.{site}.{}.0/24", site_vlan_id(site, x))
}

/// Clone of the base network into one demo site network.
pub fn create_network(
    org_id: &str,
    name: &str,
    tags: String,
    base_net_id: &str,
    time_zone: &str,
) -> Result<Action> {
    let mut request = CreateNetworkRequest::new(name, DEMO_NETWORK_TYPE);
    request.tags = Some(tags);
    request.copy_from_network_id = Some(base_net_id.to_string());
    request.time_zone = Some(time_zone.to_string());
    Action::create(format!("/organizations/{org_id}/networks"), &request)
}

pub fn claim_device(net_id: &str, serial: &str) -> Result<Action> {
    Action::claim(
        format!("/networks/{net_id}/devices"),
        &ClaimRequest { serial: serial.to_string() },
    )
}

/// Name, tags, placement and install note for one device.
pub fn configure_device(
    net_id: &str,
    serial: &str,
    role: DeviceRole,
    tags: String,
    address: &str,
    user_name: &str,
) -> Result<Action> {
    let request = UpdateDeviceRequest {
        name: Some(role.description().to_string()),
        tags: Some(tags),
        address: Some(address.to_string()),
        move_map_marker: Some(true),
        notes: Some(format!("installed by {user_name}")),
    };
    Action::update(format!("/networks/{net_id}/devices/{serial}"), &request)
}

/// Static management address for a switch or AP; only switches are tagged.
pub fn management_interface(
    net_id: &str,
    serial: &str,
    ip: &str,
    role: DeviceRole,
    mgmt_vlan: u32,
) -> Result<Action> {
    let vlan = (role == DeviceRole::Switch).then_some(mgmt_vlan);
    let request = ManagementInterfaceUpdate { wan1: Wan1Settings::static_ip(ip, vlan) };
    Action::update(
        format!("/networks/{net_id}/devices/{serial}/managementInterfaceSettings"),
        &request,
    )
}

/// Management VLAN plus the Data/Voice/Guest VLANs of a site.
///
/// With `mgmt_vlan == 1` the default VLAN is renumbered in place; otherwise
/// the management VLAN is created and VLAN 1 deleted.
pub fn site_vlans(net_id: &str, site: u32, mgmt_vlan: u32) -> Result<Vec<Action>> {
    let management = ApplianceVlan {
        id: mgmt_vlan,
        name: format!("Site {site} - Management"),
        subnet: management_subnet(site),
        appliance_ip: format!("10.{site}.1.1"),
    };

    let mut actions = Vec::with_capacity(5);
    if mgmt_vlan == 1 {
        actions.push(Action::update(format!("/networks/{net_id}/vlans/1"), &management)?);
    } else {
        actions.push(Action::create(format!("/networks/{net_id}/vlans"), &management)?);
        actions.push(Action::delete(format!("/networks/{net_id}/vlans/1")));
    }

    for (x, name) in (1..).zip(SITE_VLAN_NAMES) {
        let id = site_vlan_id(site, x);
        let vlan = ApplianceVlan {
            id,
            name: format!("Site {site} - {name}"),
            subnet: site_vlan_subnet(site, x),
            appliance_ip: format!("10.{site}.{id}.1"),
        };
        actions.push(Action::create(format!("/networks/{net_id}/vlans"), &vlan)?);
    }
    Ok(actions)
}

/// Executive, Guest and Sales group policies.
pub fn group_policies(net_id: &str, teleworker: bool) -> Result<Vec<Action>> {
    POLICY_NAMES
        .iter()
        .map(|name| {
            Action::create(format!("/networks/{net_id}/groupPolicies"), &group_policy(name, teleworker))
        })
        .collect()
}

/// Appliance port that provides PoE to the switch: 5 on Z3, MX67 and
/// MX100, 12 otherwise.
pub fn poe_port_for_model(model: &str) -> u32 {
    if model.contains("Z3") || model.contains("MX67") || model == "MX100" {
        5
    } else {
        12
    }
}

pub fn appliance_trunk_port(net_id: &str, model: &str, mgmt_vlan: u32) -> Result<Action> {
    let port = poe_port_for_model(model);
    Action::update(
        format!("/networks/{net_id}/appliancePorts/{port}"),
        &AppliancePortUpdate::trunk(mgmt_vlan),
    )
}

/// Switch ports 1, 3, 5 and 9 as trunks; port 7 as an access port on one of
/// the site VLANs.
pub fn switch_ports(
    serial: &str,
    site: u32,
    mgmt_vlan: u32,
    picker: &dyn TagPicker,
    custom_tags: &[String],
) -> Result<Vec<Action>> {
    let site_vlans: Vec<u32> = (1..=3).map(|x| site_vlan_id(site, x)).collect();
    let access_vlan = picker.pick_vlan(&site_vlans).unwrap_or(mgmt_vlan);

    let ports: [(u32, &str, &str, u32); 5] = [
        (1, "Uplink to MX", "trunk", mgmt_vlan),
        (3, "MR wireless AP", "trunk", mgmt_vlan),
        (5, "MV security camera", "trunk", mgmt_vlan),
        (7, "ready to connect!", "access", access_vlan),
        (9, "SFP port", "trunk", mgmt_vlan),
    ];

    ports
        .iter()
        .map(|(port, name, port_type, vlan)| {
            let update = SwitchPortUpdate {
                name: Some((*name).to_string()),
                port_type: Some((*port_type).to_string()),
                vlan: Some(*vlan),
                tags: Some(random_tags(picker, custom_tags)),
                enabled: None,
            };
            Action::update(format!("/devices/{serial}/switchPorts/{port}"), &update)
        })
        .collect()
}
