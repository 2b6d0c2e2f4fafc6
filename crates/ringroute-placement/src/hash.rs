//! Hash functions that fix node and key positions on the ring.
//!
//! The two functions are deliberately different and must not be swapped:
//! node points come from MD5, key positions from CRC-32 (IEEE).

/// Format the virtual key for a node's `index`-th point: `"<name>:<index>"`.
pub fn virtual_key(name: &str, index: usize) -> String {
    format!("{name}:{index}")
}

/// Position of a virtual node: first 4 bytes of `md5(virtual_key)`, big-endian.
pub fn server_hash(virtual_key: &str) -> u32 {
    let digest = md5::compute(virtual_key.as_bytes());
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

/// Position of a key: CRC-32 (ISO-HDLC) over the raw key bytes.
///
/// No normalization is applied. Hash tags such as `{user:42}` are hashed as
/// literal bytes along with the rest of the key.
pub fn key_hash(key: &[u8]) -> u32 {
    crc32fast::hash(key)
}
