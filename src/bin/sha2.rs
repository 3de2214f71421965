//! `sha2` — read a file (or standard input) and print its SHA-2 digest, in
//! the spirit of the coreutils `sha256sum` family but covering all four
//! FIPS 180-4 variants behind one flag.

use {
    clap::{Parser, ValueEnum},
    sha2fips::{Sha224, Sha256, Sha384, Sha512},
    std::{
        fs::File,
        io::{self, Read},
        path::PathBuf,
        process::ExitCode,
    },
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Variant {
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

/// Print the SHA-2 digest of a file, or of standard input if no file is given.
#[derive(Debug, Parser)]
#[command(name = "sha2")]
struct Args {
    /// File to hash. Reads standard input if omitted.
    filename: Option<PathBuf>,

    /// Which SHA-2 variant to compute.
    #[arg(long, value_enum, default_value_t = Variant::Sha256)]
    variant: Variant,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let (hex_digest, label) = match &args.filename {
        Some(path) => {
            let file = match File::open(path) {
                Ok(file) => file,
                Err(err) => {
                    eprintln!("sha2: {}: {err}", path.display());
                    return ExitCode::FAILURE;
                }
            };
            match hash_reader(args.variant, file) {
                Ok(hex) => (hex, path.display().to_string()),
                Err(err) => {
                    eprintln!("sha2: {}: {err}", path.display());
                    return ExitCode::FAILURE;
                }
            }
        }
        None => match hash_reader(args.variant, io::stdin().lock()) {
            Ok(hex) => (hex, "-".to_string()),
            Err(err) => {
                eprintln!("sha2: stdin: {err}");
                return ExitCode::FAILURE;
            }
        },
    };

    println!("{hex_digest} {label}");
    ExitCode::SUCCESS
}

fn hash_reader<R: Read>(variant: Variant, reader: R) -> io::Result<String> {
    Ok(match variant {
        Variant::Sha224 => {
            let mut hasher = Sha224::new();
            hasher.update_reader(reader)?;
            hasher.hex_digest()
        }
        Variant::Sha256 => {
            let mut hasher = Sha256::new();
            hasher.update_reader(reader)?;
            hasher.hex_digest()
        }
        Variant::Sha384 => {
            let mut hasher = Sha384::new();
            hasher.update_reader(reader)?;
            hasher.hex_digest()
        }
        Variant::Sha512 => {
            let mut hasher = Sha512::new();
            hasher.update_reader(reader)?;
            hasher.hex_digest()
        }
    })
}
