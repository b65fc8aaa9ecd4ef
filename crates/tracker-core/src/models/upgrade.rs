//! Firmware upgrade payload

use bytes::Bytes;
use crc::{Crc, CRC_32_ISO_HDLC};
use serde::{Deserialize, Serialize};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Raw upgrade file content selected for an in-progress firmware upgrade.
///
/// The payload is reference counted, so copying it into a snapshot does not
/// duplicate the bytes.
///
/// Only `content` is read when deserializing; the checksum is always
/// recomputed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UpgradeFileContent")]
pub struct UpgradeFile {
    content: Bytes,
    crc32: u32,
}

#[derive(Deserialize)]
struct UpgradeFileContent {
    content: Bytes,
}

impl From<UpgradeFileContent> for UpgradeFile {
    fn from(raw: UpgradeFileContent) -> Self {
        Self::new(raw.content)
    }
}

impl UpgradeFile {
    pub fn new(content: impl Into<Bytes>) -> Self {
        let content = content.into();
        let crc32 = CRC32.checksum(&content);
        Self { content, crc32 }
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// CRC-32 (ISO-HDLC) of the content, computed once on construction
    pub fn crc32(&self) -> u32 {
        self.crc32
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc32_check_value() {
        // Standard check input for CRC-32/ISO-HDLC
        let file = UpgradeFile::new(&b"123456789"[..]);
        assert_eq!(file.crc32(), 0xCBF4_3926);
        assert_eq!(file.len(), 9);
    }

    #[test]
    fn test_clone_shares_payload() {
        let file = UpgradeFile::new(vec![0xAB; 4096]);
        let copy = file.clone();
        assert_eq!(file.content().as_ptr(), copy.content().as_ptr());
    }

    #[test]
    fn test_deserialize_recomputes_crc() {
        let json = r#"{"content":[49,50,51,52,53,54,55,56,57],"crc32":7}"#;
        let file: UpgradeFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.crc32(), 0xCBF4_3926);
        assert_eq!(file, UpgradeFile::new(&b"123456789"[..]));
    }
}
