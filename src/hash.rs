pub mod sha2;

pub use sha2::{LengthOverflow, Params, Sha2Hasher, Sha224, Sha256, Sha384, Sha512, Word};
