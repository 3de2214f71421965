//! SHA-224, SHA-256, SHA-384, and SHA-512 hash functions specified by [FIPS
//! 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
//!
//! All four variants share one engine: a 512-bit-block, 32-bit-word core for
//! [SHA-224](Sha224)/[SHA-256](Sha256), and a 1024-bit-block, 64-bit-word core
//! for [SHA-384](Sha384)/[SHA-512](Sha512). The two cores share all
//! structural code (message schedule, compression rounds, buffering) through
//! the [`Word`] trait, and differ only in the [`Params`] they are built from:
//! round constants, initial state, rotation amounts, and digest truncation.
//!
//! Unlike a one-shot hash that only accepts a complete preimage, SHA-2 is
//! exposed here as an incremental hasher: [`update`](Sha256::update) may be
//! called any number of times with arbitrarily sized chunks, and
//! [`digest`](Sha256::digest) may be called at any point without disturbing
//! the accumulated state, so that hashing a multi-gigabyte file never
//! requires holding it in memory at once.

use {
    docext::docext,
    std::{fmt, io},
};

mod tables;

/// Number of bytes used to serialize one word of the hash state.
const WORD_BYTES_32: usize = 4;
const WORD_BYTES_64: usize = 8;

/// Largest block size among all variants (1024 bits, used by SHA-384/512).
/// SHA-224/256 use only the first 64 bytes of this buffer.
const MAX_BLOCK_BYTES: usize = 128;

/// A word-sized integer usable as the internal state of a SHA-2 core.
///
/// Implemented for `u32` (SHA-224/256) and `u64` (SHA-384/512). This trait
/// exists purely so that the message schedule, compression function, and
/// streaming state machine below can be written once and instantiated at
/// both widths, instead of duplicating the same logic twice.
pub trait Word:
    Copy
    + Default
    + PartialEq
    + fmt::Debug
    + std::ops::BitAnd<Output = Self>
    + std::ops::BitXor<Output = Self>
    + std::ops::Not<Output = Self>
    + std::ops::Shr<u32, Output = Self>
{
    /// Size of this word in bytes (4 for `u32`, 8 for `u64`).
    const BYTES: usize;

    fn wrapping_add(self, rhs: Self) -> Self;
    fn rotate_right(self, n: u32) -> Self;
    fn from_be_bytes(bytes: &[u8]) -> Self;
    /// Writes this word's big-endian representation into the first
    /// [`Word::BYTES`] bytes of `out`.
    fn write_be_bytes(self, out: &mut [u8]);
}

impl Word for u32 {
    const BYTES: usize = WORD_BYTES_32;

    fn wrapping_add(self, rhs: Self) -> Self {
        u32::wrapping_add(self, rhs)
    }

    fn rotate_right(self, n: u32) -> Self {
        u32::rotate_right(self, n)
    }

    fn from_be_bytes(bytes: &[u8]) -> Self {
        u32::from_be_bytes(bytes.try_into().expect("expected 4 bytes"))
    }

    fn write_be_bytes(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_be_bytes());
    }
}

impl Word for u64 {
    const BYTES: usize = WORD_BYTES_64;

    fn wrapping_add(self, rhs: Self) -> Self {
        u64::wrapping_add(self, rhs)
    }

    fn rotate_right(self, n: u32) -> Self {
        u64::rotate_right(self, n)
    }

    fn from_be_bytes(bytes: &[u8]) -> Self {
        u64::from_be_bytes(bytes.try_into().expect("expected 8 bytes"))
    }

    fn write_be_bytes(self, out: &mut [u8]) {
        out[..8].copy_from_slice(&self.to_be_bytes());
    }
}

/// Three rotation amounts used by a $\Sigma$ or $\sigma$ function. For the two
/// $\sigma$ functions, the last amount is a right-shift rather than a
/// rotation.
pub type RotationTriple = (u32, u32, u32);

/// Helper function $Ch$.
///
/// $$
/// Ch(x, y, z) = (x \land y) \oplus (\neg x \land z)
/// $$
#[docext]
pub(crate) fn ch<W: Word>(x: W, y: W, z: W) -> W {
    (x & y) ^ ((!x) & z)
}

/// Helper function $Maj$.
///
/// $$
/// Maj(x, y, z) = (x \land y) \oplus (x \land z) \oplus (y \land z)
/// $$
#[docext]
pub(crate) fn maj<W: Word>(x: W, y: W, z: W) -> W {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Helper function $\Sigma_0$ or $\Sigma_1$, built from three rotations.
///
/// $$
/// \Sigma(x) = \mathrm{ROTR}(x, a) \oplus \mathrm{ROTR}(x, b) \oplus
/// \mathrm{ROTR}(x, c)
/// $$
#[docext]
pub(crate) fn big_sigma<W: Word>(x: W, (a, b, c): RotationTriple) -> W {
    x.rotate_right(a) ^ x.rotate_right(b) ^ x.rotate_right(c)
}

/// Helper function $\sigma_0$ or $\sigma_1$, built from two rotations and a
/// right shift.
///
/// $$
/// \sigma(x) = \mathrm{ROTR}(x, a) \oplus \mathrm{ROTR}(x, b) \oplus (x \gg c)
/// $$
#[docext]
pub(crate) fn small_sigma<W: Word>(x: W, (a, b, c): RotationTriple) -> W {
    x.rotate_right(a) ^ x.rotate_right(b) ^ (x >> c)
}

/// The immutable per-variant parameters that drive the engine below.
///
/// `ROUNDS` is 64 for the 32-bit core and 80 for the 64-bit core; it is a
/// const generic rather than a runtime field so that the round-constant
/// table and message schedule can live in fixed-size, stack-allocated arrays.
#[derive(Debug, Clone, Copy)]
pub struct Params<W: Word, const ROUNDS: usize> {
    /// Size of one message block in bytes (64 or 128).
    pub block_bytes: usize,
    /// Size of the trailing length field appended during padding (8 or 16).
    pub length_field_bytes: usize,
    /// Round constants $K_0 .. K_{\texttt{ROUNDS}-1}$.
    pub k: [W; ROUNDS],
    /// Initial hash value $H_0$.
    pub h0: [W; 8],
    /// Number of leading state words included in the digest.
    pub digest_words: usize,
    pub sigma_big_0: RotationTriple,
    pub sigma_big_1: RotationTriple,
    pub sigma_small_0: RotationTriple,
    pub sigma_small_1: RotationTriple,
}

impl<W: Word, const ROUNDS: usize> Params<W, ROUNDS> {
    /// One past the largest bit length representable in this variant's
    /// length field (`2^64` for SHA-224/256), or `None` when the field is a
    /// full `u128` (SHA-384/512), in which case every value a `u128` counter
    /// can hold is representable.
    fn max_bits(&self) -> Option<u128> {
        if self.length_field_bytes >= 16 {
            None
        } else {
            Some(1u128 << (8 * self.length_field_bytes))
        }
    }
}

/// Failure to extend a hasher's message length: the total number of bits
/// passed to [`update`](Sha256::update) would exceed what the variant's
/// length field can represent (`2^64` bits for SHA-224/256, `2^128` bits for
/// SHA-384/512).
///
/// Checked before any state is mutated, so a hasher that returns this error
/// is left exactly as it was before the call.
#[derive(Debug)]
pub struct LengthOverflow;

impl fmt::Display for LengthOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("message length exceeds what the SHA-2 length field can represent")
    }
}

impl std::error::Error for LengthOverflow {}

/// Expands the 16 words parsed from a block into the full `ROUNDS`-long
/// message schedule.
///
/// $$
/// W_i = \sigma_1(W_{i-2}) + W_{i-7} + \sigma_0(W_{i-15}) + W_{i-16} \pmod{2^W}
/// $$
#[docext]
fn message_schedule<W: Word, const ROUNDS: usize>(
    params: &Params<W, ROUNDS>,
    block: &[u8],
) -> [W; ROUNDS] {
    let mut w = [W::default(); ROUNDS];
    for (i, slot) in w.iter_mut().take(16).enumerate() {
        *slot = W::from_be_bytes(&block[i * W::BYTES..(i + 1) * W::BYTES]);
    }
    for i in 16..ROUNDS {
        let s1 = small_sigma(w[i - 2], params.sigma_small_1);
        let s0 = small_sigma(w[i - 15], params.sigma_small_0);
        w[i] = w[i - 16].wrapping_add(s0).wrapping_add(w[i - 7]).wrapping_add(s1);
    }
    w
}

/// Compresses a single message block into `state`, per FIPS 180-4 §6.2.2 /
/// §6.4.2.
///
/// $$
/// T_1 = h + \Sigma_1(e) + Ch(e, f, g) + K_t + W_t \pmod{2^W}\\
/// T_2 = \Sigma_0(a) + Maj(a, b, c) \pmod{2^W}\\
/// h \gets g;\ g \gets f;\ f \gets e;\ e \gets d + T_1;\\
/// d \gets c;\ c \gets b;\ b \gets a;\ a \gets T_1 + T_2
/// $$
#[docext]
fn compress<W: Word, const ROUNDS: usize>(
    params: &Params<W, ROUNDS>,
    state: &mut [W; 8],
    block: &[u8],
) {
    let w = message_schedule(params, block);

    let [mut a, mut b, mut c, mut d, mut e, mut f, mut g, mut h] = *state;
    for t in 0..ROUNDS {
        let t1 = h
            .wrapping_add(big_sigma(e, params.sigma_big_1))
            .wrapping_add(ch(e, f, g))
            .wrapping_add(params.k[t])
            .wrapping_add(w[t]);
        let t2 = big_sigma(a, params.sigma_big_0).wrapping_add(maj(a, b, c));

        h = g;
        g = f;
        f = e;
        e = d.wrapping_add(t1);
        d = c;
        c = b;
        b = a;
        a = t1.wrapping_add(t2);
    }

    for (s, v) in state.iter_mut().zip([a, b, c, d, e, f, g, h]) {
        *s = s.wrapping_add(v);
    }
}

/// A generic streaming SHA-2 hasher, parameterised over word width (`W`) and
/// round count (`ROUNDS`).
///
/// This is the shared engine behind [`Sha224`], [`Sha256`], [`Sha384`], and
/// [`Sha512`]; those types are thin, fixed-width wrappers around it. Most
/// callers should use one of those instead of this type directly.
#[derive(Debug, Clone)]
pub struct Sha2Hasher<W: Word, const ROUNDS: usize> {
    params: Params<W, ROUNDS>,
    state: [W; 8],
    buffer: [u8; MAX_BLOCK_BYTES],
    buffer_len: usize,
    bits_consumed: u128,
}

impl<W: Word, const ROUNDS: usize> Sha2Hasher<W, ROUNDS> {
    pub fn new(params: Params<W, ROUNDS>) -> Self {
        Self {
            state: params.h0,
            params,
            buffer: [0; MAX_BLOCK_BYTES],
            buffer_len: 0,
            bits_consumed: 0,
        }
    }

    /// Constructs a hasher already seeded with `message`.
    pub fn with_message(params: Params<W, ROUNDS>, message: &[u8]) -> Result<Self, LengthOverflow> {
        let mut hasher = Self::new(params);
        hasher.update(message)?;
        Ok(hasher)
    }

    /// Total number of input bits passed to [`update`](Self::update) so far.
    pub fn message_length(&self) -> u128 {
        self.bits_consumed
    }

    /// Feeds `data` into the hasher, compressing every full block formed and
    /// retaining the remainder in an internal buffer.
    ///
    /// An empty slice is a valid no-op. Returns [`LengthOverflow`] (without
    /// mutating the hasher) if accounting for `data` would push the total
    /// message length past what the variant's length field can represent.
    pub fn update(&mut self, data: &[u8]) -> Result<(), LengthOverflow> {
        let added_bits = 8u128.checked_mul(data.len() as u128).ok_or(LengthOverflow)?;
        let new_total = self.bits_consumed.checked_add(added_bits).ok_or(LengthOverflow)?;
        if let Some(max_bits) = self.params.max_bits() {
            if new_total >= max_bits {
                return Err(LengthOverflow);
            }
        }

        let block_bytes = self.params.block_bytes;
        let mut offset = 0;

        if self.buffer_len > 0 {
            let to_fill = block_bytes - self.buffer_len;
            let available = to_fill.min(data.len());
            self.buffer[self.buffer_len..self.buffer_len + available]
                .copy_from_slice(&data[..available]);
            self.buffer_len += available;
            offset += available;

            if self.buffer_len == block_bytes {
                let block = self.buffer;
                compress(&self.params, &mut self.state, &block[..block_bytes]);
                self.buffer_len = 0;
            }
        }

        while offset + block_bytes <= data.len() {
            compress(&self.params, &mut self.state, &data[offset..offset + block_bytes]);
            offset += block_bytes;
        }

        let remaining = data.len() - offset;
        if remaining > 0 {
            self.buffer[..remaining].copy_from_slice(&data[offset..]);
            self.buffer_len = remaining;
        }

        self.bits_consumed = new_total;
        Ok(())
    }

    /// Feeds a [`Read`](io::Read) source into the hasher in bounded memory,
    /// equivalent to calling [`update`](Self::update) on each chunk read.
    pub fn update_reader<R: io::Read>(&mut self, mut reader: R) -> io::Result<()> {
        let mut chunk = [0u8; 64 * 1024];
        loop {
            let n = reader.read(&mut chunk)?;
            if n == 0 {
                return Ok(());
            }
            self.update(&chunk[..n])
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        }
    }

    /// Returns the digest without disturbing the hasher: padding and the
    /// final compression run against a clone of `(state, buffer)`, so
    /// further [`update`](Self::update) calls continue the original message.
    pub fn digest(&self) -> Vec<u8> {
        let mut state = self.state;
        let mut buffer = self.buffer;
        let block_bytes = self.params.block_bytes;
        let length_field_bytes = self.params.length_field_bytes;

        let mut fill_from = self.buffer_len;
        buffer[fill_from] = 0x80;
        fill_from += 1;

        if block_bytes - fill_from < length_field_bytes {
            buffer[fill_from..block_bytes].fill(0);
            compress(&self.params, &mut state, &buffer[..block_bytes]);
            buffer = [0; MAX_BLOCK_BYTES];
            fill_from = 0;
        }
        buffer[fill_from..block_bytes - length_field_bytes].fill(0);

        let length_bytes = self.bits_consumed.to_be_bytes();
        buffer[block_bytes - length_field_bytes..block_bytes]
            .copy_from_slice(&length_bytes[16 - length_field_bytes..]);
        compress(&self.params, &mut state, &buffer[..block_bytes]);

        let mut out = Vec::with_capacity(self.params.digest_words * W::BYTES);
        for word in &state[..self.params.digest_words] {
            let mut bytes = [0u8; 8];
            word.write_be_bytes(&mut bytes);
            out.extend_from_slice(&bytes[..W::BYTES]);
        }
        out
    }

    /// Lowercase hexadecimal encoding of [`digest`](Self::digest). Each byte
    /// is formatted independently, so leading zero bytes are never dropped.
    pub fn hex_digest(&self) -> String {
        use std::fmt::Write;
        let mut out = String::with_capacity(2 * self.params.digest_words * W::BYTES);
        for byte in self.digest() {
            write!(out, "{byte:02x}").expect("writing to a String cannot fail");
        }
        out
    }
}

#[cfg(test)]
impl<W: Word, const ROUNDS: usize> Sha2Hasher<W, ROUNDS> {
    /// Test-only hook for exercising the overflow check in [`update`] without
    /// actually streaming exabytes of input.
    pub(crate) fn set_bits_consumed_for_test(&mut self, bits: u128) {
        self.bits_consumed = bits;
    }
}

macro_rules! sha2_variant {
    (
        $(#[$meta:meta])*
        $name:ident, $word:ty, $rounds:expr, $digest_bytes:expr, $params_fn:path
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(Sha2Hasher<$word, $rounds>);

        impl Default for $name {
            fn default() -> Self {
                Self(Sha2Hasher::new($params_fn()))
            }
        }

        impl $name {
            /// Constructs a hasher with empty state.
            pub fn new() -> Self {
                Self::default()
            }

            /// Constructs a hasher already seeded with `message`.
            pub fn with_message(message: &[u8]) -> Result<Self, LengthOverflow> {
                let mut hasher = Self::new();
                hasher.update(message)?;
                Ok(hasher)
            }

            /// Feeds more input into the hasher. See [`Sha2Hasher::update`].
            pub fn update(&mut self, data: &[u8]) -> Result<(), LengthOverflow> {
                self.0.update(data)
            }

            /// Feeds a [`Read`](io::Read) source into the hasher in bounded
            /// memory. See [`Sha2Hasher::update_reader`].
            pub fn update_reader<R: io::Read>(&mut self, reader: R) -> io::Result<()> {
                self.0.update_reader(reader)
            }

            /// Returns the digest without consuming or resetting the hasher.
            pub fn digest(&self) -> [u8; $digest_bytes] {
                self.0
                    .digest()
                    .try_into()
                    .expect("digest length is fixed by the variant's Params")
            }

            /// Lowercase hexadecimal encoding of [`digest`](Self::digest).
            pub fn hex_digest(&self) -> String {
                self.0.hex_digest()
            }

            /// Total number of input bits consumed so far.
            pub fn message_length(&self) -> u128 {
                self.0.message_length()
            }
        }

        #[cfg(test)]
        impl $name {
            /// Test-only hook, see [`Sha2Hasher::set_bits_consumed_for_test`].
            pub(crate) fn set_bits_consumed_for_test(&mut self, bits: u128) {
                self.0.set_bits_consumed_for_test(bits);
            }
        }
    };
}

sha2_variant!(
    /// SHA-256 hash specified by [FIPS
    /// 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
    ///
    /// SHA-256 is vulnerable to length-extension attacks; prefer
    /// [SHA-224](Sha224) if that property matters and truncation is
    /// acceptable.
    Sha256, u32, 64, 32, tables::sha256_params
);

sha2_variant!(
    /// SHA-224 hash specified by [FIPS
    /// 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
    ///
    /// SHA-224 is [SHA-256](Sha256) with a different initial state and the
    /// digest truncated to 224 bits. Due to the truncation, SHA-224 is not
    /// vulnerable to length-extension attacks, unlike SHA-256.
    Sha224, u32, 64, 28, tables::sha224_params
);

sha2_variant!(
    /// SHA-512 hash specified by [FIPS
    /// 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
    ///
    /// Uses the same round structure as [SHA-256](Sha256) but with 64-bit
    /// words, 80 rounds, and 1024-bit blocks.
    Sha512, u64, 80, 64, tables::sha512_params
);

sha2_variant!(
    /// SHA-384 hash specified by [FIPS
    /// 180-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.180-4.pdf).
    ///
    /// SHA-384 is [SHA-512](Sha512) with a different initial state and the
    /// digest truncated to 384 bits.
    Sha384, u64, 80, 48, tables::sha384_params
);
