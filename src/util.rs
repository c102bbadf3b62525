use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Integer value of the leading base-36 digits in the first six characters of `id`,
/// or `None` when the prefix does not start with one.
pub fn base36_prefix(id: &str) -> Option<u64> {
    let prefix = id.trim_start().chars().take(6);
    let mut value: Option<u64> = None;
    for ch in prefix {
        let Some(digit) = ch.to_digit(36) else {
            break;
        };
        value = Some(value.unwrap_or(0) * 36 + u64::from(digit));
    }
    value
}

pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

pub fn truncate_label(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}
