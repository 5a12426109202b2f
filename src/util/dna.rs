/// 比对中允许的缺口字符
#[inline]
pub fn is_gap(b: u8) -> bool {
    b == b'-' || b == b'.'
}

/// IUPAC 核苷酸、缺口以及 `?`（未知）
#[inline]
pub fn is_valid_residue(b: u8) -> bool {
    if is_gap(b) {
        return true;
    }
    matches!(
        b.to_ascii_uppercase(),
        b'A' | b'C'
            | b'G'
            | b'T'
            | b'U'
            | b'R'
            | b'Y'
            | b'S'
            | b'W'
            | b'K'
            | b'M'
            | b'B'
            | b'D'
            | b'H'
            | b'V'
            | b'N'
            | b'?'
    )
}

/// Canonical base code used when comparing two residues: 0..4 for A/C/G/T,
/// `None` for gaps and ambiguity codes.
#[inline]
pub fn base_code(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' | b'U' => Some(3),
        _ => None,
    }
}

/// 返回第一个非法字符的位置（0-based）
pub fn first_invalid(seq: &[u8]) -> Option<usize> {
    seq.iter().position(|&b| !is_valid_residue(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_and_ambiguity_are_valid() {
        for &b in b"ACGTUacgtuRYSWKMBDHVN?-." {
            assert!(is_valid_residue(b), "{} should be valid", b as char);
        }
        assert!(!is_valid_residue(b'X'));
        assert!(!is_valid_residue(b'*'));
    }

    #[test]
    fn base_codes() {
        assert_eq!(base_code(b'a'), Some(0));
        assert_eq!(base_code(b'U'), base_code(b'T'));
        assert_eq!(base_code(b'N'), None);
        assert_eq!(base_code(b'-'), None);
        assert_eq!(base_code(b'R'), None);
    }

    #[test]
    fn first_invalid_position() {
        assert_eq!(first_invalid(b"ACGT-N"), None);
        assert_eq!(first_invalid(b"ACXT"), Some(2));
        assert_eq!(first_invalid(b""), None);
    }
}
