use std::borrow::Cow;

use url::Url;

/// Reduces a URL (or URL-ish string) to `host` or `host:port`.
///
/// A missing `http://` / `https://` prefix is assumed to be `http://`. An
/// explicit port 443 is dropped when `strip_443` is set; any other explicit
/// port is kept. Strings that do not parse as a URL yield `None`.
///
/// The host is returned as written: parsing only validates the input and
/// reads the port, so case and Unicode labels survive.
pub fn to_host(input: &str, strip_443: bool) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let raw: Cow<'_, str> = if has_http_scheme(input) {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(format!("http://{input}"))
    };

    let url = Url::parse(&raw).ok()?;
    url.host_str().filter(|host| !host.is_empty())?;
    let (host, _) = split_authority(authority(&raw));
    if host.is_empty() {
        return None;
    }

    match explicit_port(&raw, &url) {
        Some(443) if strip_443 => Some(host.to_string()),
        Some(port) => Some(format!("{host}:{port}")),
        None => Some(host.to_string()),
    }
}

pub(crate) fn has_http_scheme(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// `host[:port]` as written, without scheme, userinfo or path.
fn authority(raw: &str) -> &str {
    let after_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
    let authority = after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme);
    authority.rsplit_once('@').map_or(authority, |(_, host_port)| host_port)
}

/// Splits `host:port`, keeping bracketed IPv6 hosts whole.
fn split_authority(authority: &str) -> (&str, Option<&str>) {
    let port_at = match authority.rfind(':') {
        Some(idx) if !authority[idx..].contains(']') => idx,
        _ => return (authority, None),
    };
    let (host, port) = (&authority[..port_at], &authority[port_at + 1..]);
    let bare_ipv6 = !host.starts_with('[') && host.contains(':');
    if bare_ipv6 || !port.bytes().all(|b| b.is_ascii_digit()) {
        return (authority, None);
    }
    (host, Some(port).filter(|port| !port.is_empty()))
}

/// The port written in the authority, including a scheme's default port,
/// which [`Url::port`] normalizes away.
fn explicit_port(raw: &str, url: &Url) -> Option<u16> {
    if let Some(port) = url.port() {
        return Some(port);
    }
    let default = url.port_or_known_default()?;
    let (_, port) = split_authority(authority(raw));

    (port?.parse::<u16>().ok() == Some(default)).then_some(default)
}
