//! A1-style cell reference handling for the worksheet XML parser and
//! human-readable output.

/// Convert a zero-based column index to its spreadsheet letter label
/// (0 -> "A", 25 -> "Z", 26 -> "AA").
pub fn column_label(col: u32) -> String {
    let mut n = col + 1;
    let mut letters = [0u8; 7];
    let mut len = 0;

    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters[len] = b'A' + rem;
        len += 1;
        n = (n - 1) / 26;
    }

    letters[..len].iter().rev().map(|&b| b as char).collect()
}

/// Format zero-based (row, col) indices as an A1 reference.
pub fn cell_ref(row: u32, col: u32) -> String {
    format!("{}{}", column_label(col), row + 1)
}

/// Parse an A1 reference into zero-based (row, col) indices.
/// Returns `None` for malformed references.
pub fn parse_cell_ref(a1: &str) -> Option<(u32, u32)> {
    let split = a1.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = a1.split_at(split);
    if letters.is_empty() || digits.is_empty() {
        return None;
    }

    let mut col: u32 = 0;
    for ch in letters.chars() {
        if !ch.is_ascii_alphabetic() {
            return None;
        }
        let v = (ch.to_ascii_uppercase() as u8 - b'A' + 1) as u32;
        col = col.checked_mul(26)?.checked_add(v)?;
    }

    let row: u32 = digits.parse().ok()?;
    if row == 0 || col == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}
