//! Hex dump helpers for wire diagnostics.

use std::fmt::Write;

/// Formats up to `max` bytes as space-separated lowercase hex, noting how
/// many bytes were left out.
///
/// ```
/// use messgen_buffers::print_octets;
///
/// assert_eq!(print_octets(&[0xff, 0x01, 0x00], 16), "ff 01 00");
/// assert_eq!(print_octets(&[1, 2, 3, 4], 2), "01 02 ... (2 more)");
/// ```
pub fn print_octets(octets: &[u8], max: usize) -> String {
    let shown = octets.len().min(max);
    let mut out = String::with_capacity(shown * 3 + 16);
    for (i, byte) in octets[..shown].iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    if octets.len() > shown {
        let _ = write!(out, " ... ({} more)", octets.len() - shown);
    }
    out
}

/// [`print_octets`] capped at one 5-byte envelope header plus 27 payload bytes.
pub fn print_octets_default(octets: &[u8]) -> String {
    print_octets(octets, 32)
}
