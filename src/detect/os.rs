//! Host applicability of actions and registry checks.

/// Identifier of the running host in rule-file vocabulary
/// (`windows`, `linux`, `darwin`, ...).
pub fn current_os() -> &'static str {
    normalize(std::env::consts::OS)
}

/// True if an item tagged with `os_list` applies to `current`.
///
/// An empty list applies everywhere; otherwise the comparison is
/// case-insensitive and treats `macos` and `darwin` as the same host.
pub fn applies(os_list: &[String], current: &str) -> bool {
    if os_list.is_empty() {
        return true;
    }
    let current = normalize(current);
    os_list
        .iter()
        .any(|os| normalize(os.trim()).eq_ignore_ascii_case(current))
}

fn normalize(os: &str) -> &str {
    if os.eq_ignore_ascii_case("macos") {
        "darwin"
    } else {
        os
    }
}
