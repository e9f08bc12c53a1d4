//! Placeholder expansion and probe strategy selection.

use std::env;
use std::path::{Path, PathBuf};

/// How an action's path is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Stat exactly one path.
    File,
    /// Expand a wildcard pattern and stat every match.
    Glob,
    /// Recursively walk a directory and stat every file below it.
    Walk,
}

impl Strategy {
    /// Pick the strategy for an action's `search` mode and resolved path.
    ///
    /// A wildcard in the path forces globbing whatever the declared mode.
    pub fn select(search: &str, resolved: &Path) -> Self {
        if search == "glob" || has_wildcard(resolved) {
            Strategy::Glob
        } else if search == "walk.files" {
            Strategy::Walk
        } else {
            Strategy::File
        }
    }
}

/// True if the path contains a `*` wildcard.
pub fn has_wildcard(path: &Path) -> bool {
    path.to_string_lossy().contains('*')
}

/// Expand `~`, `$VAR`/`${VAR}` and `%Placeholder%` tokens in a rule path.
pub fn resolve(pattern: &str) -> PathBuf {
    let expanded = expand_home(pattern);
    let expanded = expand_env(&expanded);
    PathBuf::from(expand_placeholders(&expanded))
}

fn expand_home(pattern: &str) -> String {
    let rest = match pattern.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => return pattern.to_string(),
    };
    match dirs::home_dir() {
        Some(home) => format!("{}{}", home.display(), rest),
        None => pattern.to_string(),
    }
}

/// Shell-style expansion; unset variables expand to nothing.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                out.push_str(&env::var(&braced[..end]).unwrap_or_default());
                rest = &braced[end + 1..];
                continue;
            }
            out.push('$');
            rest = after;
            continue;
        }

        let name_len = after
            .char_indices()
            .take_while(|(i, c)| c.is_ascii_alphanumeric() && !(*i == 0 && c.is_ascii_digit()) || *c == '_')
            .count();

        if name_len == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        out.push_str(&env::var(&after[..name_len]).unwrap_or_default());
        rest = &after[name_len..];
    }

    out.push_str(rest);
    out
}

/// Windows-style `%NAME%` expansion.
///
/// Well-known locations fall back to the platform directories when their
/// variable is unset; other unknown tokens are left as written.
fn expand_placeholders(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];

        let Some(end) = after.find('%') else {
            out.push('%');
            rest = after;
            continue;
        };

        let name = &after[..end];
        let valid = !name.is_empty() && !name.contains(['/', '\\']);
        match valid.then(|| placeholder(name)).flatten() {
            Some(value) => {
                out.push_str(&value);
                rest = &after[end + 1..];
            }
            None if valid => {
                out.push('%');
                out.push_str(name);
                out.push('%');
                rest = &after[end + 1..];
            }
            None => {
                out.push('%');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

fn placeholder(name: &str) -> Option<String> {
    let from_env = |var: &str| env::var(var).ok().filter(|v| !v.is_empty());
    let from_dir = |dir: Option<PathBuf>| dir.map(|d| d.display().to_string());

    match name.to_ascii_lowercase().as_str() {
        "userprofile" => from_env("USERPROFILE").or_else(|| from_dir(dirs::home_dir())),
        "appdata" => from_env("APPDATA").or_else(|| from_dir(dirs::config_dir())),
        "localappdata" => from_env("LOCALAPPDATA").or_else(|| from_dir(dirs::data_local_dir())),
        "temp" | "tmp" => from_env("TEMP")
            .or_else(|| from_env("TMP"))
            .or_else(|| from_dir(Some(env::temp_dir()))),
        "programfiles" => from_env("ProgramFiles"),
        "programfiles(x86)" => from_env("ProgramFiles(x86)"),
        "systemroot" => from_env("SystemRoot"),
        _ => from_env(name),
    }
}
