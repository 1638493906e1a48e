use serde_json::Value;

/// Best-effort recovery of the first complete JSON object in `bytes`.
///
/// The scan looks for a `{`, walks the bytes tracking string and escape
/// state, and hands the slice where the braces balance to the regular
/// parser. If that slice does not parse, scanning resumes at the next `{`,
/// so an intact inner object can still be recovered from a truncated outer
/// one. Returns `None` when no balanced slice parses.
///
/// This is a degraded-mode fallback for truncated API captures; run it
/// only after regular parsing has failed.
#[must_use]
pub fn first_object(bytes: &[u8]) -> Option<Value> {
    let mut search_from = 0;
    while let Some(offset) = find_open_brace(&bytes[search_from..]) {
        let start = search_from + offset;
        if let Some(len) = balanced_len(&bytes[start..]) {
            if let Ok(value) = serde_json::from_slice(&bytes[start..start + len]) {
                return Some(value);
            }
        }
        search_from = start + 1;
    }
    None
}

fn find_open_brace(bytes: &[u8]) -> Option<usize> {
    bytes.iter().position(|&byte| byte == b'{')
}

/// Byte length of the balanced object starting at `bytes[0]`, or `None`
/// when the input ends before its braces balance.
///
/// Braces inside strings do not count; multi-byte UTF-8 sequences never
/// collide with the ASCII bytes inspected here.
fn balanced_len(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, &byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}
