use did_helper_keys::Algorithm;

/// [Multicodec](https://github.com/multiformats/multicodec) prefix of a key type.
pub trait Multicodec {
    fn code_u64(&self) -> u64;

    /// Unsigned varint encoding of [Multicodec::code_u64].
    fn code(&self) -> Vec<u8> {
        let mut buffer = unsigned_varint::encode::u64_buffer();
        unsigned_varint::encode::u64(self.code_u64(), &mut buffer).to_vec()
    }
}

impl Multicodec for Algorithm {
    fn code_u64(&self) -> u64 {
        match self {
            Algorithm::P256 => 0x1200,
            Algorithm::P384 => 0x1201,
            Algorithm::Ed25519 => 0xed,
        }
    }
}
