//! Stripping of characters the host download manager rejects.

/// Characters illegal in Windows paths; the host download API refuses
/// filenames containing any of them regardless of the local platform.
const ILLEGAL: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\t'];

/// Removes every illegal character from `name`. Stripping (not replacing)
/// matches what the host would otherwise reject outright.
pub fn strip_illegal_chars(name: &str) -> String {
    name.chars().filter(|c| !ILLEGAL.contains(c)).collect()
}
