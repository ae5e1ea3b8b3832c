//! Fixed-width `r || s` encoding of ECDSA signatures

/// Concatenate `r` and `s`, each left-padded with zeros to `width` bytes.
///
/// Leading zero bytes beyond `width` are dropped. Returns `None` when an
/// integer does not fit.
pub(crate) fn encode(r: &[u8], s: &[u8], width: usize) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(width * 2);
    pad_into(&mut out, r, width)?;
    pad_into(&mut out, s, width)?;
    Some(out)
}

/// Split a signature at its midpoint and re-pad each half to `width` bytes.
///
/// Odd-length input and halves wider than `width` yield `None`.
pub(crate) fn decode(signature: &[u8], width: usize) -> Option<Vec<u8>> {
    if signature.is_empty() || signature.len() % 2 != 0 {
        return None;
    }
    let (r, s) = signature.split_at(signature.len() / 2);
    encode(r, s, width)
}

fn pad_into(out: &mut Vec<u8>, int: &[u8], width: usize) -> Option<()> {
    let start = int.iter().position(|&b| b != 0).unwrap_or(int.len());
    let significant = &int[start..];
    if significant.len() > width {
        return None;
    }
    out.resize(out.len() + width - significant.len(), 0);
    out.extend_from_slice(significant);
    Some(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_integers() {
        assert_eq!(encode(&[1], &[2, 3], 3), Some(vec![0, 0, 1, 0, 2, 3]));
    }

    #[test]
    fn strips_redundant_leading_zeros() {
        assert_eq!(encode(&[0, 0, 0, 7], &[9], 2), Some(vec![0, 7, 0, 9]));
    }

    #[test]
    fn rejects_oversize_and_odd_input() {
        assert_eq!(encode(&[1, 2, 3], &[1], 2), None);
        assert_eq!(decode(&[1, 2, 3], 2), None);
        assert_eq!(decode(&[], 2), None);
    }

    #[test]
    fn decode_repads_halves() {
        assert_eq!(decode(&[5, 6], 2), Some(vec![0, 5, 0, 6]));
        assert_eq!(decode(&[0, 5, 0, 6], 2), Some(vec![0, 5, 0, 6]));
    }
}
