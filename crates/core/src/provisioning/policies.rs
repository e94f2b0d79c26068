//! Group policy templates
//!
//! Teleworker appliances (Z1/Z3) do not take layer 7 rules or traffic
//! shaping, so their variants carry layer 3 rules and bandwidth limits only.

use serde::{Deserialize, Serialize};

pub const POLICY_NAMES: [&str; 3] = ["Executive", "Guest", "Sales"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPolicy {
    pub name: String,
    pub splash_auth_settings: String,
    pub bandwidth: Bandwidth,
    pub firewall_and_traffic_shaping: FirewallAndTrafficShaping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bandwidth {
    pub settings: String,
    pub bandwidth_limits: BandwidthLimits,
}

/// Kbps; `None` means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandwidthLimits {
    pub limit_up: Option<u32>,
    pub limit_down: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirewallAndTrafficShaping {
    pub settings: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub l3_firewall_rules: Vec<L3FirewallRule>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub l7_firewall_rules: Vec<L7FirewallRule>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L3FirewallRule {
    pub comment: String,
    pub policy: String,
    pub protocol: String,
    pub dest_port: String,
    pub dest_cidr: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct L7FirewallRule {
    pub policy: String,
    #[serde(rename = "type")]
    pub rule_type: String,
    pub value: String,
}

/// Policy body for `name`; unknown names get an unrestricted policy.
pub fn group_policy(name: &str, teleworker: bool) -> GroupPolicy {
    let (limits, l3, l7) = match name {
        "Guest" => (
            limits(Some(1024), Some(5120)),
            vec![deny_l3("No access to internal networks", "10.0.0.0/8")],
            vec![deny_l7("applicationCategory", "meraki:layer7/category/5")],
        ),
        "Sales" => (
            limits(Some(5120), Some(10240)),
            Vec::new(),
            vec![deny_l7("applicationCategory", "meraki:layer7/category/24")],
        ),
        _ => (limits(None, None), Vec::new(), Vec::new()),
    };

    let l7 = if teleworker { Vec::new() } else { l7 };
    let settings = if l3.is_empty() && l7.is_empty() { "network default" } else { "custom" };

    GroupPolicy {
        name: name.to_string(),
        splash_auth_settings: "network default".into(),
        bandwidth: Bandwidth { settings: "custom".into(), bandwidth_limits: limits },
        firewall_and_traffic_shaping: FirewallAndTrafficShaping {
            settings: settings.into(),
            l3_firewall_rules: l3,
            l7_firewall_rules: l7,
        },
    }
}

fn limits(limit_up: Option<u32>, limit_down: Option<u32>) -> BandwidthLimits {
    BandwidthLimits { limit_up, limit_down }
}

fn deny_l3(comment: &str, dest_cidr: &str) -> L3FirewallRule {
    L3FirewallRule {
        comment: comment.into(),
        policy: "deny".into(),
        protocol: "any".into(),
        dest_port: "Any".into(),
        dest_cidr: dest_cidr.into(),
    }
}

fn deny_l7(rule_type: &str, value: &str) -> L7FirewallRule {
    L7FirewallRule { policy: "deny".into(), rule_type: rule_type.into(), value: value.into() }
}
