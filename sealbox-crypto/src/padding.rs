//! PKCS#7 padding to 16-byte blocks.
//!
//! The envelope format frames plaintext this way before sealing, so every
//! ciphertext length is a block multiple. Unpadding only ever runs after
//! tag verification has passed.

/// Cipher block size the format pads to.
pub(crate) const BLOCK_SIZE: usize = 16;

/// Pads `data` to the next multiple of [`BLOCK_SIZE`].
///
/// Always appends between 1 and 16 bytes, each holding the pad length, so
/// the result is never empty and always unpaddable.
pub(crate) fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - (data.len() % BLOCK_SIZE);
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strips PKCS#7 padding, returning the original slice.
///
/// `None` if the input is empty, not block-aligned, the marker byte is out
/// of range, or the fill bytes disagree with the marker.
pub(crate) fn unpad(data: &[u8]) -> Option<&[u8]> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return None;
    }
    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE {
        return None;
    }
    let (rest, fill) = data.split_at(data.len() - pad_len);
    if fill.iter().any(|&b| b as usize != pad_len) {
        return None;
    }
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pad_unpad_round_trip() {
        for len in [0, 1, 15, 16, 17, 31, 32, 1000] {
            let data = vec![0xAB; len];
            let padded = pad(&data);
            assert_eq!(padded.len() % BLOCK_SIZE, 0);
            assert_eq!(unpad(&padded), Some(data.as_slice()));
        }
    }

    #[test]
    fn full_block_gets_full_block_of_padding() {
        let data = [0u8; 16];
        let padded = pad(&data);
        assert_eq!(padded.len(), 32);
        assert_eq!(&padded[16..], &[16u8; 16]);
    }

    #[test]
    fn empty_input_pads_to_one_block() {
        let padded = pad(b"");
        assert_eq!(padded, vec![16u8; 16]);
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(unpad(&[]), None);
    }

    #[test]
    fn rejects_unaligned_length() {
        assert_eq!(unpad(&[1u8; 17]), None);
    }

    #[test]
    fn rejects_zero_marker() {
        assert_eq!(unpad(&[0u8; 16]), None);
    }

    #[test]
    fn rejects_oversized_marker() {
        let mut block = [0u8; 16];
        block[15] = 17;
        assert_eq!(unpad(&block), None);
    }

    #[test]
    fn rejects_inconsistent_fill() {
        let mut padded = pad(b"abc");
        // pad bytes are 13s; corrupt one in the middle of the fill
        padded[7] ^= 0x01;
        assert_eq!(unpad(&padded), None);
    }
}
