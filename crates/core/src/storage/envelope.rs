use crate::errors::CoreError;

use super::cipher::{KdfParams, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a portfolio-lens session file.
pub const MAGIC: &[u8; 4] = b"PLSS";

/// Current envelope version.
pub const CURRENT_VERSION: u16 = 1;

/// magic(4) + version(2) + kdf(12) + salt(16) + nonce(12) + ciphertext_len(8)
pub const HEADER_LEN: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Encrypted session as stored on disk.
///
/// ```text
/// [PLSS: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext + GCM tag]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEnvelope {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
}

impl SessionEnvelope {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_LEN + self.ciphertext.len());
        buf.extend_from_slice(MAGIC);
        buf.extend_from_slice(&self.version.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.memory_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.time_cost.to_le_bytes());
        buf.extend_from_slice(&self.kdf_params.parallelism.to_le_bytes());
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.nonce);
        buf.extend_from_slice(&(self.ciphertext.len() as u64).to_le_bytes());
        buf.extend_from_slice(&self.ciphertext);
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, CoreError> {
        if data.len() < HEADER_LEN {
            return Err(CoreError::InvalidFileFormat(format!(
                "{} bytes is shorter than the {HEADER_LEN}-byte header",
                data.len()
            )));
        }

        let mut reader = Reader { data, offset: 0 };

        if reader.take::<4>()? != *MAGIC {
            return Err(CoreError::InvalidFileFormat(
                "missing PLSS magic bytes".into(),
            ));
        }

        let version = u16::from_le_bytes(reader.take::<2>()?);
        if version == 0 || version > CURRENT_VERSION {
            return Err(CoreError::UnsupportedVersion(version));
        }

        let kdf_params = KdfParams {
            memory_cost: u32::from_le_bytes(reader.take::<4>()?),
            time_cost: u32::from_le_bytes(reader.take::<4>()?),
            parallelism: u32::from_le_bytes(reader.take::<4>()?),
        };
        check_kdf_bounds(&kdf_params)?;

        let salt = reader.take::<SALT_LEN>()?;
        let nonce = reader.take::<NONCE_LEN>()?;
        let declared = u64::from_le_bytes(reader.take::<8>()?);

        let remaining = data.len() - reader.offset;
        let ciphertext_len = usize::try_from(declared)
            .ok()
            .filter(|len| *len <= remaining)
            .ok_or_else(|| {
                CoreError::InvalidFileFormat(format!(
                    "truncated: header declares {declared} ciphertext bytes, {remaining} present"
                ))
            })?;

        Ok(Self {
            version,
            kdf_params,
            salt,
            nonce,
            ciphertext: data[reader.offset..reader.offset + ciphertext_len].to_vec(),
        })
    }
}

/// Crafted files must not be able to make key derivation arbitrarily expensive.
fn check_kdf_bounds(params: &KdfParams) -> Result<(), CoreError> {
    if !(8..=1_048_576).contains(&params.memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of range: {} KiB",
            params.memory_cost
        )));
    }
    if !(1..=20).contains(&params.time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of range: {}",
            params.time_cost
        )));
    }
    if !(1..=16).contains(&params.parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of range: {}",
            params.parallelism
        )));
    }
    Ok(())
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat("unexpected end of header".into()))?;
        self.offset = end;
        Ok(bytes)
    }
}
