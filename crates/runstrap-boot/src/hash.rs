use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use runstrap_core::errors::{ErrorInfo, RunError};
use sha2::{Digest, Sha256};

const CHUNK_SIZE: usize = 1024 * 1024;

/// Streams a file through SHA-256 and returns the lowercase hex digest.
pub fn sha256_file(path: &Path) -> Result<String, RunError> {
    let mut file = File::open(path).map_err(|err| read_error(path, err))?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(read_error(path, err)),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

fn read_error(path: &Path, err: std::io::Error) -> RunError {
    RunError::Io(
        ErrorInfo::new("hash-read", "failed to read file for hashing")
            .with_context("path", path.display().to_string())
            .with_hint(err.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn known_digests() {
        let dir = tempfile::tempdir().expect("tempdir");
        let empty = dir.path().join("empty");
        fs::write(&empty, b"").expect("write");
        assert_eq!(
            sha256_file(&empty).expect("hash"),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let abc = dir.path().join("abc");
        fs::write(&abc, b"abc").expect("write");
        assert_eq!(
            sha256_file(&abc).expect("hash"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn multi_chunk_file_matches_one_shot_digest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("large.bin");
        let bytes: Vec<u8> = (0..CHUNK_SIZE * 2 + 17).map(|i| (i % 251) as u8).collect();
        fs::write(&path, &bytes).expect("write");
        assert_eq!(
            sha256_file(&path).expect("hash"),
            hex::encode(Sha256::digest(&bytes))
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = sha256_file(&dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, RunError::Io(_)));
        assert_eq!(err.code(), "hash-read");
    }
}
