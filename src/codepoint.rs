// src/codepoint.rs
//
// Scalar-value scanning over UTF-16 text.
//
// - Offsets and counts are in UTF-16 code units.
// - A low surrogate at the scan position is a stray continuation: it is skipped
//   and counted, but never emitted by itself.
// - A high surrogate followed by a low surrogate combines into one value; a lone
//   high surrogate is returned as-is.

const HIGH_SURROGATES: std::ops::RangeInclusive<u16> = 0xD800..=0xDBFF;
const LOW_SURROGATES: std::ops::RangeInclusive<u16> = 0xDC00..=0xDFFF;

/// Returns the next code point at or after `offset` and the number of units
/// consumed from `offset` to just past it.
///
/// `None` means the buffer has no more values from `offset`; the count then
/// still includes any stray low surrogates that were skipped on the way.
pub fn next_code_point(units: &[u16], offset: usize) -> (Option<u32>, usize) {
    let mut consumed = 0usize;
    loop {
        let pos = offset + consumed;
        let Some(&unit) = units.get(pos) else {
            return (None, consumed);
        };
        consumed += 1;

        if LOW_SURROGATES.contains(&unit) {
            continue;
        }

        if HIGH_SURROGATES.contains(&unit) {
            if let Some(&low) = units.get(pos + 1) {
                if LOW_SURROGATES.contains(&low) {
                    return (Some(combine(unit, low)), consumed + 1);
                }
            }
        }
        return (Some(u32::from(unit)), consumed);
    }
}

#[inline]
fn combine(high: u16, low: u16) -> u32 {
    0x10000 + ((u32::from(high) - 0xD800) << 10) + (u32::from(low) - 0xDC00)
}
