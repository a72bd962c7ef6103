//! # Service URL Derivation
//!
//! Pure functions turning `(base URI, route template, agent id)` into the
//! URLs a ledger agent publishes.

use crate::domain::AGENT_ID_PREFIX;

/// Placeholder substituted in route templates.
pub const AGENT_ID_PLACEHOLDER: &str = ":agentId";

/// Agent id with the `urn:uuid:` scheme prefix removed.
///
/// Ids without the prefix are returned unchanged.
pub fn strip_agent_prefix(agent_id: &str) -> &str {
    agent_id.strip_prefix(AGENT_ID_PREFIX).unwrap_or(agent_id)
}

/// `base_uri + template` with every `:agentId` replaced.
pub fn derive_service_url(base_uri: &str, route_template: &str, agent_id: &str) -> String {
    let route = route_template.replace(AGENT_ID_PLACEHOLDER, strip_agent_prefix(agent_id));
    format!("{base_uri}{route}")
}

/// Root URL of a mounted plugin.
pub fn plugin_url(status_url: &str, plugin_name: &str) -> String {
    format!("{status_url}/plugins/{}", dash_case(plugin_name))
}

/// Lowercase words joined by `-`.
///
/// Word boundaries: runs of non-alphanumerics, a lowercase letter or digit
/// followed by an uppercase letter, and the last capital of an acronym
/// followed by a lowercase letter (`HTTPServer` → `http-server`).
pub fn dash_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    let mut boundary = false;

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            boundary = true;
            continue;
        }

        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower)
            {
                boundary = true;
            }
        }

        if boundary && !out.is_empty() {
            out.push('-');
        }
        boundary = false;
        out.extend(c.to_lowercase());
    }

    out
}
