const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Xorshift avalanche step applied after folding
#[inline(always)]
fn xorshift(mut seed: u64) -> u64 {
    seed ^= seed << 13;
    seed ^= seed >> 7;
    seed ^= seed << 17;
    seed
}

/// Deterministic 64-bit digest of a byte buffer: an FNV-style fold over
/// little-endian 8-byte words, then a xorshift finish.
/// Stable across platforms and runs, used to compare whole rasters.
pub fn content_hash(bytes: &[u8]) -> u64 {
    let mut h = FNV_OFFSET;
    for chunk in bytes.chunks(8) {
        let mut word = [0u8; 8];
        word[..chunk.len()].copy_from_slice(chunk);
        h ^= u64::from_le_bytes(word);
        h = h.wrapping_mul(FNV_PRIME);
    }
    xorshift(h ^ (bytes.len() as u64).wrapping_mul(2654435761))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_hash() {
        let data: Vec<u8> = (0..=255).collect();
        assert_eq!(content_hash(&data), content_hash(&data.clone()));
    }

    #[test]
    fn test_single_byte_change_changes_hash() {
        let a = vec![7u8; 4096];
        let mut b = a.clone();
        b[2049] = 8;
        assert_ne!(content_hash(&a), content_hash(&b));
    }

    #[test]
    fn test_length_is_part_of_hash() {
        assert_ne!(content_hash(&[0u8; 8]), content_hash(&[0u8; 16]));
    }
}
