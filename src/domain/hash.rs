use std::{fmt::Display, fs::File, io, path::Path};

use blake3::Hash;

/// Content hash of an audio file.
///
/// Identifies an audio file regardless of its name, so a separated file
/// is recognised again even after being renamed or re-downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioHash(pub Hash);

impl AudioHash {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(blake3::hash(bytes))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    pub fn from_file(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        io::copy(&mut file, &mut hasher)?;
        Ok(Self(hasher.finalize()))
    }
}

impl Display for AudioHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::AudioHash;

    #[test]
    fn test_file_hash_matches_content_hash() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let path = tmp.path().join("song.wav");
        std::fs::write(&path, b"RIFF fake wave data")?;

        assert_eq!(
            AudioHash::from_file(&path)?,
            AudioHash::from_bytes(b"RIFF fake wave data")
        );
        Ok(())
    }

    #[test]
    fn test_hash_ignores_file_name() -> anyhow::Result<()> {
        let tmp = tempfile::tempdir()?;
        let a = tmp.path().join("a.wav");
        let b = tmp.path().join("b.wav");
        std::fs::write(&a, b"same")?;
        std::fs::write(&b, b"same")?;

        assert_eq!(AudioHash::from_file(&a)?, AudioHash::from_file(&b)?);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(AudioHash::from_file("/definitely/not/here.wav".as_ref()).is_err());
    }
}
