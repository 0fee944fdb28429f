use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static SGR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-9;]*m").expect("SGR pattern is valid"));

/// Removes ANSI SGR sequences (`ESC [ <params> m`). Other escapes are left alone.
pub fn strip_sgr(line: &str) -> Cow<'_, str> {
    SGR.replace_all(line, "")
}
