//! MD5-backed hashing helpers.

use md5::{Digest, Md5};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use uuid::Uuid;

use crate::errors::Result;

/// Produces a repeatable UUID from the MD5 digest of `s`.
///
/// The 16 digest bytes are used verbatim, so the result carries no RFC 4122
/// version bits. Every process hashing the same string gets the same UUID.
#[must_use]
pub fn uuid_from_string(s: &str) -> Uuid {
    let digest = Md5::digest(s.as_bytes());
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&digest);
    Uuid::from_bytes(bytes)
}

/// Hex encoded MD5 checksum of an in-memory buffer.
#[must_use]
pub fn md5sum_bytes(data: &[u8]) -> String {
    hex::encode(Md5::digest(data))
}

/// Hex encoded MD5 checksum of a file, read in chunks.
pub fn md5sum(path: &Path) -> Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buf = [0u8; 4096];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_uuid_from_string_matches_md5_digest() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        let id = uuid_from_string("");
        assert_eq!(id.to_string(), "d41d8cd9-8f00-b204-e980-0998ecf8427e");
    }

    #[test]
    fn test_uuid_from_string_is_deterministic() {
        assert_eq!(uuid_from_string("case-iter-0"), uuid_from_string("case-iter-0"));
        assert_ne!(uuid_from_string("case-iter-0"), uuid_from_string("case-iter-1"));
    }

    #[test]
    fn test_md5sum_file_and_bytes_agree() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(b"some data").unwrap();
        tmp.flush().unwrap();
        assert_eq!(md5sum(tmp.path()).unwrap(), md5sum_bytes(b"some data"));
        assert_eq!(md5sum_bytes(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }
}
