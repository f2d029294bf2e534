//! Point-set container header definition.

/// Magic bytes for the .pcls container.
pub const PCLS_MAGIC: [u8; 4] = *b"PCLS";

/// Current container version.
pub const PCLS_VERSION: u16 = 1;

/// Header size in bytes.
pub const HEADER_SIZE: usize = 32;

/// Point-set container header.
///
/// Layout (32 bytes total):
/// - Bytes 0-3: Magic "PCLS"
/// - Bytes 4-5: version (u16 LE)
/// - Bytes 6-7: flags (u16 LE)
/// - Bytes 8-11: num_samples (u32 LE)
/// - Bytes 12-15: points_per_sample (u32 LE)
/// - Bytes 16-19: num_classes (u32 LE)
/// - Bytes 20-31: reserved (12 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointSetHeader {
    /// Magic bytes "PCLS".
    pub magic: [u8; 4],
    /// Container version.
    pub version: u16,
    /// Flags (reserved for future use).
    pub flags: u16,
    /// Number of samples in the file.
    pub num_samples: u32,
    /// Points stored per sample.
    pub points_per_sample: u32,
    /// Number of classes labels are drawn from.
    pub num_classes: u32,
    /// Reserved bytes for future expansion.
    pub reserved: [u8; 12],
}

impl PointSetHeader {
    /// Create a header for the current version.
    pub fn new(num_samples: u32, points_per_sample: u32, num_classes: u32) -> Self {
        Self {
            magic: PCLS_MAGIC,
            version: PCLS_VERSION,
            flags: 0,
            num_samples,
            points_per_sample,
            num_classes,
            reserved: [0; 12],
        }
    }

    /// Validate the header magic bytes.
    pub fn is_valid(&self) -> bool {
        self.magic == PCLS_MAGIC
    }

    /// Serialize the header to a byte array.
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.num_samples.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.points_per_sample.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.num_classes.to_le_bytes());
        bytes[20..32].copy_from_slice(&self.reserved);

        bytes
    }

    /// Deserialize a header from a byte array.
    pub fn from_bytes(bytes: &[u8; HEADER_SIZE]) -> Self {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        let num_samples = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);
        let points_per_sample = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);
        let num_classes = u32::from_le_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]);

        let mut reserved = [0u8; 12];
        reserved.copy_from_slice(&bytes[20..32]);

        Self {
            magic,
            version,
            flags,
            num_samples,
            points_per_sample,
            num_classes,
            reserved,
        }
    }
}

/// Expected file size for a container.
pub fn compute_file_size(num_samples: usize, points_per_sample: usize) -> usize {
    // Header + xyz f32 per point + u32 label per sample
    HEADER_SIZE + num_samples * points_per_sample * 3 * 4 + num_samples * 4
}
