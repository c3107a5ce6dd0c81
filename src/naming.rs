/// Sanitize an environment name for use in resource identifiers and script
/// arguments: lowercase, with every character outside `[a-z0-9-]` replaced
/// by a hyphen. Idempotent.
pub fn sanitize(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}

/// Resource group name for a sanitized environment name.
pub fn resource_group_name(sanitized: &str) -> String {
    format!("rg-sandbox-{sanitized}")
}

/// AKS cluster name for a sanitized environment name.
pub fn cluster_name(sanitized: &str) -> String {
    format!("aks-sandbox-{sanitized}")
}
