use crate::error::{Error, Result};
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DigestAlgorithm {
    Md5,
    Sha256,
}

impl DigestAlgorithm {
    pub fn as_str(&self) -> &str {
        match self {
            DigestAlgorithm::Md5 => "md5",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }

    /// Length of the hex rendering of a digest.
    pub fn hex_len(&self) -> usize {
        match self {
            DigestAlgorithm::Md5 => 32,
            DigestAlgorithm::Sha256 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "md5" => Ok(DigestAlgorithm::Md5),
            "sha256" => Ok(DigestAlgorithm::Sha256),
            other => Err(Error::InvalidConfig(format!(
                "unknown digest algorithm: {}",
                other
            ))),
        }
    }
}

/// Streams bytes through a digest in fixed-size chunks and renders the
/// result as lowercase hex.
#[derive(Debug, Clone, Copy)]
pub struct Hasher {
    algorithm: DigestAlgorithm,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new(DigestAlgorithm::Md5)
    }
}

impl Hasher {
    pub fn new(algorithm: DigestAlgorithm) -> Self {
        Self {
            algorithm,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn hash_bytes(&self, data: &[u8]) -> String {
        match self.algorithm {
            DigestAlgorithm::Md5 => hex::encode(Md5::digest(data)),
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        }
    }

    pub fn hash_reader<R: Read>(&self, reader: R) -> io::Result<String> {
        match self.algorithm {
            DigestAlgorithm::Md5 => stream::<Md5, R>(reader, self.chunk_size),
            DigestAlgorithm::Sha256 => stream::<Sha256, R>(reader, self.chunk_size),
        }
    }

    /// Hashes the file's content. The handle is closed before returning,
    /// whether or not hashing succeeded.
    pub fn hash_file(&self, path: &Path) -> Result<String> {
        let unreadable = |source: io::Error| Error::Unreadable {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(unreadable)?;
        self.hash_reader(file).map_err(unreadable)
    }
}

fn stream<D: Digest, R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = D::new();
    let mut buffer = vec![0u8; chunk_size];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_md5_known_vectors() {
        let hasher = Hasher::default();

        assert_eq!(hasher.hash_bytes(b""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(hasher.hash_bytes(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn test_sha256_known_vector() {
        let hasher = Hasher::new(DigestAlgorithm::Sha256);

        assert_eq!(
            hasher.hash_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_chunked_matches_whole() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

        for algorithm in [DigestAlgorithm::Md5, DigestAlgorithm::Sha256] {
            let whole = Hasher::new(algorithm).hash_bytes(&data);
            let chunked = Hasher::new(algorithm)
                .with_chunk_size(7)
                .hash_reader(Cursor::new(&data))
                .unwrap();

            assert_eq!(whole, chunked);
            assert_eq!(whole.len(), algorithm.hex_len());
        }
    }

    #[test]
    fn test_hash_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        std::fs::write(&path, b"abc").unwrap();

        let hasher = Hasher::default();

        assert_eq!(hasher.hash_file(&path).unwrap(), hasher.hash_bytes(b"abc"));
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let temp_dir = TempDir::new().unwrap();
        let result = Hasher::default().hash_file(&temp_dir.path().join("missing"));

        assert!(matches!(result, Err(Error::Unreadable { .. })));
    }

    #[test]
    fn test_algorithm_parse() {
        assert_eq!("MD5".parse::<DigestAlgorithm>().unwrap(), DigestAlgorithm::Md5);
        assert_eq!(
            "sha256".parse::<DigestAlgorithm>().unwrap(),
            DigestAlgorithm::Sha256
        );
        assert!("blake3".parse::<DigestAlgorithm>().is_err());
    }
}
