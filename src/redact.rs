use std::borrow::Cow;

fn find_ascii_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    let hay = haystack.as_bytes();
    let nee = needle.as_bytes();
    if nee.is_empty() {
        return Some(0);
    }
    if nee.len() > hay.len() {
        return None;
    }

    for i in 0..=hay.len() - nee.len() {
        let mut matches = true;
        for j in 0..nee.len() {
            let a = hay[i + j].to_ascii_lowercase();
            let b = nee[j].to_ascii_lowercase();
            if a != b {
                matches = false;
                break;
            }
        }
        if matches {
            return Some(i);
        }
    }
    None
}

/// Replaces whatever follows `marker` (up to whitespace, `;`, `&` or `"`)
/// with `REDACTED`, keeping the marker itself.
fn redact_after_marker(text: String, marker: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text.as_str();
    loop {
        let Some(idx) = find_ascii_case_insensitive(rest, marker) else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..idx]);
        out.push_str(&rest[idx..idx + marker.len()]);
        rest = &rest[idx + marker.len()..];

        let mut consumed = 0;
        for ch in rest.chars() {
            if ch.is_whitespace() || ch == ';' || ch == '&' || ch == '"' {
                break;
            }
            consumed += ch.len_utf8();
        }
        out.push_str("REDACTED");
        rest = &rest[consumed..];
    }
    out
}

/// Scrubs bearer tokens and the persisted token keys from a message before
/// it is logged or surfaced in an error.
pub fn redact_secrets(input: &str) -> Cow<'_, str> {
    let mut value = input.to_string();

    // "token=" also covers "refresh_token=".
    for marker in ["Bearer ", "token="] {
        if find_ascii_case_insensitive(&value, marker).is_some() {
            value = redact_after_marker(value, marker);
        }
    }

    if value == input {
        Cow::Borrowed(input)
    } else {
        Cow::Owned(value)
    }
}
