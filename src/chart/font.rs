use std::path::{Path, PathBuf};

/// Used whenever the requested family cannot be found.
pub const FALLBACK_FONT: &str = "sans-serif";

const GENERIC_FAMILIES: [&str; 5] = ["sans-serif", "serif", "monospace", "cursive", "fantasy"];
const MAX_SCAN_DEPTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontChoice {
    pub family: String,
    pub fell_back: bool,
}

/// Font directories on Linux, macOS and Windows.
pub fn system_font_dirs() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
        "C:\\Windows\\Fonts",
    ]
    .iter()
    .map(PathBuf::from)
    .collect();

    if let Some(home) = std::env::var_os("HOME") {
        let home = PathBuf::from(home);
        dirs.push(home.join(".fonts"));
        dirs.push(home.join(".local/share/fonts"));
        dirs.push(home.join("Library/Fonts"));
    }
    dirs
}

/// Pick the chart font. A missing family is not an error: warn and fall
/// back to the generic sans-serif family.
pub fn resolve_font(requested: &str, search_dirs: &[PathBuf]) -> FontChoice {
    let requested = requested.trim();
    if GENERIC_FAMILIES.contains(&requested.to_ascii_lowercase().as_str()) {
        return FontChoice {
            family: requested.to_ascii_lowercase(),
            fell_back: false,
        };
    }

    let needle = normalize(requested);
    if !needle.is_empty() && search_dirs.iter().any(|d| dir_has_font(d, &needle, 0)) {
        tracing::debug!(font = requested, "chart font found");
        return FontChoice {
            family: requested.to_string(),
            fell_back: false,
        };
    }

    tracing::warn!(font = requested, fallback = FALLBACK_FONT, "chart font not found, using fallback");
    FontChoice {
        family: FALLBACK_FONT.to_string(),
        fell_back: true,
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn dir_has_font(dir: &Path, needle: &str, depth: usize) -> bool {
    if depth > MAX_SCAN_DEPTH {
        return false;
    }
    let Ok(entries) = std::fs::read_dir(dir) else {
        return false;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if dir_has_font(&path, needle, depth + 1) {
                return true;
            }
            continue;
        }
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "woff" | "woff2"))
            .unwrap_or(false);
        let stem_matches = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| normalize(s).starts_with(needle))
            .unwrap_or(false);
        if is_font && stem_matches {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_font_dir(tag: &str, files: &[&str]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("covercall-fonts-{tag}-{}", std::process::id()));
        let nested = dir.join("truetype");
        std::fs::create_dir_all(&nested).unwrap();
        for f in files {
            std::fs::write(nested.join(f), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_generic_family_always_resolves() {
        let choice = resolve_font("Sans-Serif", &[]);
        assert_eq!(choice.family, "sans-serif");
        assert!(!choice.fell_back);
    }

    #[test]
    fn test_installed_font_is_used() {
        let dir = temp_font_dir("found", &["DejaVuSans-Bold.ttf", "readme.txt"]);
        let choice = resolve_font("DejaVu Sans", &[dir.clone()]);
        assert_eq!(choice.family, "DejaVu Sans");
        assert!(!choice.fell_back);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_missing_font_falls_back() {
        let dir = temp_font_dir("missing", &["Roboto-Regular.ttf", "simhei.txt"]);
        let choice = resolve_font("SimHei", &[dir.clone(), PathBuf::from("/nonexistent/fonts")]);
        assert_eq!(choice.family, FALLBACK_FONT);
        assert!(choice.fell_back);
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_empty_request_falls_back() {
        assert!(resolve_font("   ", &[]).fell_back);
    }
}
