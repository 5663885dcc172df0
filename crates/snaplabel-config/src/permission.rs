use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PermissionPolicy {
    Granted,
    Denied,
    /// Ask on the terminal
    #[default]
    Prompt,
}

impl FromStr for PermissionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "granted" | "grant" | "allow" => Ok(Self::Granted),
            "denied" | "deny" => Ok(Self::Denied),
            "prompt" | "ask" => Ok(Self::Prompt),
            other => Err(format!("unknown permission policy '{}'", other)),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct PermissionConfig {
    pub policy: PermissionPolicy,
}

impl PermissionConfig {
    /// Unparseable values leave the policy as it was
    pub(crate) fn apply_vars(&mut self, var: &dyn Fn(&str) -> Option<String>) {
        if let Some(policy) = var("SNAPLABEL_PERMISSION").and_then(|v| v.parse().ok()) {
            self.policy = policy;
        }
    }
}
