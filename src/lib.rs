#[cfg(test)]
mod test;

mod hash;

pub use hash::{LengthOverflow, Params, Sha2Hasher, Sha224, Sha256, Sha384, Sha512, Word};
