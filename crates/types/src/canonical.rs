//! Canonical, deterministic byte layouts for signed and hashed material.
//!
//! Everything that is covered by a signature or a hash goes through this
//! module, so all components agree on one binary representation. Layouts
//! are fixed-order, big-endian, with variable-length fields prefixed by a
//! big-endian u16 length (`len16`). Centralizing the layouts here prevents
//! two components from signing different encodings of the same record.

use crate::agent::AgentId;
use crate::chain::StateEntry;
use crate::proof::ProofBundle;
use crate::NONCE_LEN;

/// An append-only buffer enforcing the canonical layout rules.
#[derive(Debug, Default)]
pub struct CanonicalWriter {
    buf: Vec<u8>,
}

impl CanonicalWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a single byte.
    pub fn put_u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    /// Appends a big-endian u32.
    pub fn put_u32(&mut self, v: u32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Appends a big-endian u64.
    pub fn put_u64(&mut self, v: u64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_be_bytes());
        self
    }

    /// Appends raw bytes whose length is fixed by the layout.
    pub fn put_fixed(&mut self, v: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(v);
        self
    }

    /// Appends a `len16`-prefixed variable-length field.
    ///
    /// All variable-length inputs are bounded well below `u16::MAX` by the
    /// types that own them; exceeding it is a layout invariant violation.
    pub fn put_var(&mut self, v: &[u8]) -> &mut Self {
        let len = u16::try_from(v.len()).expect("canonical field exceeds u16 length prefix");
        self.buf.extend_from_slice(&len.to_be_bytes());
        self.buf.extend_from_slice(v);
        self
    }

    /// Consumes the writer and returns the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Canonical signing bytes of a lease acquire request:
/// `pubkey(32) || len16(session_id) || ts_be64 || nonce(16) || ttl_be32`,
/// signed under the `agent.lease.v1` domain.
pub fn lease_request_bytes(
    agent_id: &AgentId,
    session_id: &str,
    timestamp_unix: u64,
    nonce: &[u8; NONCE_LEN],
    ttl_seconds: u32,
) -> Vec<u8> {
    let mut w = CanonicalWriter::new();
    w.put_fixed(agent_id.as_bytes())
        .put_var(session_id.as_bytes())
        .put_u64(timestamp_unix)
        .put_fixed(nonce)
        .put_u32(ttl_seconds);
    w.into_bytes()
}

/// Canonical signing bytes of a state entry: every field except the
/// signature and the entry hash, signed under `agent.state.v1`.
pub fn entry_signing_bytes(entry: &StateEntry) -> Vec<u8> {
    let mut w = CanonicalWriter::new();
    w.put_fixed(entry.agent_id.as_bytes())
        .put_u64(entry.sequence)
        .put_fixed(&entry.prev_hash)
        .put_var(entry.timestamp.as_bytes())
        .put_var(entry.action_type.as_str().as_bytes())
        .put_var(entry.action_summary.as_bytes())
        .put_fixed(&entry.action_data_hash);
    w.into_bytes()
}

/// The preimage of an entry hash: the canonical signing bytes followed by
/// the 64-byte signature.
pub fn entry_hash_preimage(entry: &StateEntry) -> Vec<u8> {
    let mut bytes = entry_signing_bytes(entry);
    bytes.extend_from_slice(&entry.signature);
    bytes
}

/// The complete canonical encoding of a signed entry, including its hash.
/// This is the representation embedded in proof bundles.
pub fn entry_wire_bytes(entry: &StateEntry) -> Vec<u8> {
    let mut bytes = entry_hash_preimage(entry);
    bytes.extend_from_slice(&entry.entry_hash);
    bytes
}

/// Canonical signing bytes of a proof bundle: every field except the
/// bundle signature, signed under `agent.proof.v1`.
pub fn bundle_signing_bytes(bundle: &ProofBundle) -> Vec<u8> {
    let mut w = CanonicalWriter::new();
    w.put_fixed(bundle.agent_id.as_bytes())
        .put_var(bundle.lease_token.as_bytes())
        .put_var(&entry_wire_bytes(&bundle.state_head))
        .put_var(bundle.challenge.as_ref())
        .put_fixed(&bundle.challenge_signature)
        .put_var(bundle.bundle_timestamp.as_bytes());
    w.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_layout() {
        let mut w = CanonicalWriter::new();
        w.put_u8(0x01).put_u32(0x0203_0405).put_var(b"ab");
        assert_eq!(
            w.into_bytes(),
            vec![0x01, 0x02, 0x03, 0x04, 0x05, 0x00, 0x02, b'a', b'b']
        );
    }

    #[test]
    fn var_prefix_is_big_endian() {
        let mut w = CanonicalWriter::new();
        w.put_var(&[0u8; 300]);
        let bytes = w.into_bytes();
        assert_eq!(&bytes[..2], &[0x01, 0x2c]);
        assert_eq!(bytes.len(), 302);
    }
}
