use {
    crate::{
        hash::sha2::{big_sigma, ch, maj, small_sigma},
        Sha224, Sha256, Sha384, Sha512,
    },
    rand::RngCore,
};

fn hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(2 * bytes.len());
    for byte in bytes {
        write!(out, "{byte:02x}").unwrap();
    }
    out
}

/// `!!x == x`: bitwise NOT is its own inverse.
#[test]
fn bit_not_is_involution() {
    let x: u32 = 0xA9524A56;
    assert_eq!(!(!x), x);
    assert_eq!(!0x92u32, 0xFFFFFF6Du32);
}

/// Rotating right by `a` then by `b` is the same as rotating right by
/// `a + b` in one step, for any split of the total.
#[test]
fn rotate_right_composes() {
    let x: u32 = 0xA9524A56;
    for total in [1u32, 7, 13, 31] {
        for a in 0..=total {
            let b = total - a;
            assert_eq!(x.rotate_right(a).rotate_right(b), x.rotate_right(total));
        }
    }
}

/// `Ch(x, y, z)` selects bits of `y` where `x` is set and bits of `z`
/// elsewhere.
#[test]
fn ch_selects_bits() {
    assert_eq!(ch(0x2Au32, 0x24, 0x2E), 0x24);
    assert_eq!(ch(0x3Fu32, 0x2A, 0x2B), 0x2A);
    assert_eq!(ch(0x0u32, 0x25, 0x3A), 0x3A);
}

/// `Maj(x, x, x) == x`: the majority of three equal values is that value.
#[test]
fn maj_of_equal_inputs_is_identity() {
    for x in [0u32, 0x2A, 0xFFFFFFFF, 0xA9524A56] {
        assert_eq!(maj(x, x, x), x);
    }
}

/// `Maj` is symmetric in its three arguments.
#[test]
fn maj_is_symmetric() {
    let (x, y, z) = (0x2Au32, 0x24, 0x2E);
    assert_eq!(maj(x, y, z), maj(y, x, z));
    assert_eq!(maj(x, y, z), maj(z, y, x));
}

/// $\Sigma$/$\sigma$ are each the XOR of their three rotated/shifted terms,
/// so swapping the first two rotation amounts leaves the result unchanged.
#[test]
fn sigma_functions_are_order_independent_in_first_two_terms() {
    let x: u32 = 0xA9524A56;
    assert_eq!(big_sigma(x, (2, 13, 22)), big_sigma(x, (13, 2, 22)));
    assert_eq!(small_sigma(x, (7, 18, 3)), small_sigma(x, (18, 7, 3)));
}

/// SHA-256 test vectors (FIPS 180-4 Appendix B, plus the NIST "three block"
/// message).
#[test]
fn sha256_vectors() {
    assert_eq!(
        Sha256::with_message(b"").unwrap().hex_digest(),
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b85",
    );
    assert_eq!(
        Sha256::with_message(b"abc").unwrap().hex_digest(),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad",
    );
    assert_eq!(
        Sha256::with_message(
            b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq"
        )
        .unwrap()
        .hex_digest(),
        "248d6a61d20638b8e5c026930c3e6039a33ce45964ff2167f6ecedd419db06c1",
    );
}

/// SHA-224 test vectors (FIPS 180-4 Appendix B).
#[test]
fn sha224_vectors() {
    assert_eq!(
        Sha224::with_message(b"").unwrap().hex_digest(),
        "d14a028c2a3a2bc9476102bb288234c415a2b01f828ea62ac5b3e42f",
    );
    assert_eq!(
        Sha224::with_message(b"abc").unwrap().hex_digest(),
        "23097d223405d8228642a477bda255b32aadbce4bda0b3f7e36c9da7",
    );
}

/// SHA-512 test vectors (FIPS 180-4 Appendix C).
#[test]
fn sha512_vectors() {
    assert_eq!(
        Sha512::with_message(b"").unwrap().hex_digest(),
        "cf83e1357eefb8bdf1542850d66d8007d620e4050b5715dc83f4a921d36ce9ce47d0d13c5d85f2b0ff8318d2877eec2f63b931bd47417a81a538327af927da3e",
    );
    assert_eq!(
        Sha512::with_message(b"abc").unwrap().hex_digest(),
        "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
    );
}

/// SHA-384 test vector (FIPS 180-4 Appendix D).
#[test]
fn sha384_vectors() {
    assert_eq!(
        Sha384::with_message(b"abc").unwrap().hex_digest(),
        "cb00753f45a35e8bb5a03d699ac65007272c32ab0eded1631a8b605a43ff5bed8086072ba1e7cc2358baeca134c825a7",
    );
}

/// Splitting the same message across several `update` calls must produce the
/// same digest as a single call with the concatenation, regardless of where
/// the splits fall relative to block boundaries.
#[test]
fn streaming_matches_one_shot() {
    let whole = b"abcdbcdecdefdefgefghfghighijhijkijkljklmklmnlmnomnopnopq";

    let mut streamed = Sha256::new();
    streamed.update(b"abcdbcdecdefdefg").unwrap();
    streamed.update(b"efghfghighijhijkijkljklmklm").unwrap();
    streamed.update(b"nlmnomnopnopq").unwrap();

    let one_shot = Sha256::with_message(whole).unwrap();
    assert_eq!(streamed.hex_digest(), one_shot.hex_digest());
}

/// Randomised check of the same property across many arbitrary partitions,
/// for every variant.
#[test]
fn streaming_matches_one_shot_random_splits() {
    let mut rng = rand::thread_rng();
    for _ in 0..32 {
        let len = (rng.next_u32() % 4096) as usize;
        let mut message = vec![0u8; len];
        rng.fill_bytes(&mut message);

        let one_shot = Sha256::with_message(&message).unwrap().hex_digest();

        let mut streamed = Sha256::new();
        let mut offset = 0;
        while offset < message.len() {
            let chunk_len = 1 + (rng.next_u32() as usize % 97).min(message.len() - offset);
            streamed.update(&message[offset..offset + chunk_len]).unwrap();
            offset += chunk_len;
        }
        assert_eq!(streamed.hex_digest(), one_shot);
    }
}

/// `digest` must not disturb the hasher: calling it, then feeding more input,
/// must yield the hash of the full extended message.
#[test]
fn digest_is_non_destructive() {
    let mut hasher = Sha256::new();
    hasher.update(b"abc").unwrap();
    let mid_digest = hasher.hex_digest();
    assert_eq!(mid_digest, Sha256::with_message(b"abc").unwrap().hex_digest());

    hasher.update(b"def").unwrap();
    assert_eq!(hasher.hex_digest(), Sha256::with_message(b"abcdef").unwrap().hex_digest());
}

/// An empty `update` call is a no-op.
#[test]
fn empty_update_is_noop() {
    let mut hasher = Sha256::new();
    hasher.update(b"abc").unwrap();
    hasher.update(b"").unwrap();
    assert_eq!(hasher.hex_digest(), Sha256::with_message(b"abc").unwrap().hex_digest());
}

/// `update_reader` must agree with feeding the same bytes directly.
#[test]
fn update_reader_matches_update() {
    let message = b"the quick brown fox jumps over the lazy dog".repeat(200);

    let mut via_update = Sha256::new();
    via_update.update(&message).unwrap();

    let mut via_reader = Sha256::new();
    via_reader.update_reader(&message[..]).unwrap();

    assert_eq!(via_update.hex_digest(), via_reader.hex_digest());
}

/// `message_length` reports the bit count of everything passed to `update`.
#[test]
fn message_length_counts_bits() {
    let mut hasher = Sha256::new();
    hasher.update(b"abc").unwrap();
    assert_eq!(hasher.message_length(), 24);
    hasher.update(b"de").unwrap();
    assert_eq!(hasher.message_length(), 40);
}

/// `hex_digest` always has the expected length, with no leading zero bytes
/// dropped.
#[test]
fn hex_digest_length_is_fixed() {
    assert_eq!(Sha224::new().hex_digest().len(), 56);
    assert_eq!(Sha256::new().hex_digest().len(), 64);
    assert_eq!(Sha384::new().hex_digest().len(), 96);
    assert_eq!(Sha512::new().hex_digest().len(), 128);
}

/// `hex` helper round-trips a known all-zero-leading-byte digest without
/// dropping any zero nibbles.
#[test]
fn hex_formatting_keeps_leading_zeros() {
    assert_eq!(hex(&[0x00, 0x0f, 0xff]), "000fff");
}

/// An `update` call that would push the accumulated bit count past what the
/// variant's length field can represent must fail without mutating state,
/// per the fail-fast overflow policy.
#[test]
fn update_rejects_length_overflow() {
    let mut hasher = Sha256::new();
    hasher.set_bits_consumed_for_test(u128::MAX - 4);
    let before = hasher.hex_digest();

    let result = hasher.update(b"abc");
    assert!(result.is_err());
    assert_eq!(hasher.hex_digest(), before, "a rejected update must not mutate the hasher");
}
