//! Log sanitization utilities
//!
//! Keeps bearer tokens, phone numbers and oversized response bodies out of
//! debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 512;

/// Number of trailing phone digits left visible.
const PHONE_VISIBLE_DIGITS: usize = 3;

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

/// Truncate a response/request body for logging.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

/// Mask a phone number, keeping only the last digits (`237*******789`).
pub fn mask_phone(phone: &str) -> String {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    let hidden = digits.saturating_sub(PHONE_VISIBLE_DIGITS);
    let mut seen = 0;
    phone
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                seen += 1;
                // keep the 237 country prefix readable
                if seen <= hidden && !(seen <= 3 && phone.starts_with("237")) {
                    return '*';
                }
            }
            c
        })
        .collect()
}

/// Mask a bearer token down to its first four characters.
pub fn mask_token(token: &str) -> String {
    let cut = floor_char_boundary(token, 4);
    if cut >= token.len() {
        "****".to_string()
    } else {
        format!("{}****", &token[..cut])
    }
}
