use rand::{Rng, distr::Alphanumeric};

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Escapes text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Picks a device by id, or by case-insensitive name when no id matches.
pub fn find_device<'a>(
    devices: &'a [crate::types::Device],
    selector: &str,
) -> Option<&'a crate::types::Device> {
    devices.iter().find(|d| d.id == selector).or_else(|| {
        devices
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(selector.trim()))
    })
}

/// The device to use when the user did not pick one: the active device if
/// there is one, otherwise the first listed.
pub fn default_device(devices: &[crate::types::Device]) -> Option<&crate::types::Device> {
    devices
        .iter()
        .find(|d| d.is_active)
        .or_else(|| devices.first())
}
