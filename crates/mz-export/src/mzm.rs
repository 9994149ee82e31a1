use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use mz_core::error::MzmError;
use mz_core::frame::{Layer, TileCell};

/// Magic MZM version 3.
pub const MAGIC: &[u8; 4] = b"MZM3";
/// Taille fixe de l'en-tête.
pub const HEADER_LEN: usize = 20;
/// Storage mode 1 : layer plat (pas de RLE).
pub const STORAGE_MODE_LAYER: u8 = 1;
/// Version mineure du format monde.
pub const WORLD_VERSION_MINOR: u8 = 0x5C;
/// Version majeure du format monde.
pub const WORLD_VERSION_MAJOR: u8 = 2;

/// En-tête MZM3, 20 octets little-endian.
///
/// Robot data is never emitted: `robot_offset` and `robot_count` are zero
/// and `savegame` is false.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MzmHeader {
    /// Width in cells.
    pub width: u16,
    /// Height in cells.
    pub height: u16,
    /// Offset of robot data (always 0).
    pub robot_offset: u32,
    /// Number of robots (always 0).
    pub robot_count: u8,
    /// Storage mode (always 1, flat layer).
    pub storage_mode: u8,
    /// Savegame flag.
    pub savegame: bool,
    /// World version, (major, minor).
    pub version: (u8, u8),
}

impl MzmHeader {
    /// Header for a plain layer of `width`×`height` cells.
    #[must_use]
    pub fn for_layer(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            robot_offset: 0,
            robot_count: 0,
            storage_mode: STORAGE_MODE_LAYER,
            savegame: false,
            version: (WORLD_VERSION_MAJOR, WORLD_VERSION_MINOR),
        }
    }

    /// Serialize to the 20-byte on-disk form.
    ///
    /// # Example
    /// ```
    /// use mz_export::mzm::MzmHeader;
    /// let bytes = MzmHeader::for_layer(80, 25).to_bytes();
    /// assert_eq!(&bytes[..4], b"MZM3");
    /// assert_eq!(&bytes[4..8], &[80, 0, 25, 0]);
    /// assert_eq!(&bytes[13..20], &[1, 0, 0x5C, 2, 0, 0, 0]);
    /// ```
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..4].copy_from_slice(MAGIC);
        out[4..6].copy_from_slice(&self.width.to_le_bytes());
        out[6..8].copy_from_slice(&self.height.to_le_bytes());
        out[8..12].copy_from_slice(&self.robot_offset.to_le_bytes());
        out[12] = self.robot_count;
        out[13] = self.storage_mode;
        out[14] = u8::from(self.savegame);
        out[15] = self.version.1;
        out[16] = self.version.0;
        // 17..20 : padding
        out
    }

    /// Parse the first 20 bytes of an MZM file.
    ///
    /// # Errors
    /// `MzmError::MalformedMzm` on short input, wrong magic, or a storage
    /// mode other than a flat layer.
    pub fn parse(bytes: &[u8]) -> Result<Self, MzmError> {
        let Some(h) = bytes.get(..HEADER_LEN) else {
            return Err(MzmError::MalformedMzm(format!(
                "en-tête tronqué : {} octets",
                bytes.len()
            )));
        };
        if &h[0..4] != MAGIC {
            return Err(MzmError::MalformedMzm(format!("magic {:?}", &h[0..4])));
        }
        if h[13] != STORAGE_MODE_LAYER {
            return Err(MzmError::MalformedMzm(format!(
                "storage mode {} non supporté",
                h[13]
            )));
        }
        Ok(Self {
            width: u16::from_le_bytes([h[4], h[5]]),
            height: u16::from_le_bytes([h[6], h[7]]),
            robot_offset: u32::from_le_bytes([h[8], h[9], h[10], h[11]]),
            robot_count: h[12],
            storage_mode: h[13],
            savegame: h[14] != 0,
            version: (h[16], h[15]),
        })
    }
}

/// Encode a layer as a complete MZM file image (header + payload).
///
/// # Example
/// ```
/// use mz_core::frame::Layer;
/// use mz_export::mzm::encode_mzm;
/// assert_eq!(encode_mzm(&Layer::new(80, 25)).len(), 4020);
/// ```
#[must_use]
pub fn encode_mzm(layer: &Layer) -> Vec<u8> {
    let header = MzmHeader::for_layer(layer.width, layer.height);
    let mut out = Vec::with_capacity(HEADER_LEN + layer.cells.len() * 2);
    out.extend_from_slice(&header.to_bytes());
    out.extend_from_slice(&layer.to_bytes());
    out
}

/// Écrit le layer dans `path` au format MZM3.
///
/// The file is created only here, after the layer is complete. A failed
/// write may leave a partial file behind; callers treat it as invalid.
///
/// # Errors
/// `MzmError::Io` on any create/write/flush failure.
pub fn write_mzm(path: &Path, layer: &Layer) -> Result<(), MzmError> {
    let header = MzmHeader::for_layer(layer.width, layer.height).to_bytes();
    log::debug!("en-tête MZM : {header:02x?}");

    let mut out = BufWriter::new(File::create(path)?);
    out.write_all(&header)?;
    out.write_all(&layer.to_bytes())?;
    out.flush()?;
    log::info!(
        "{} : {} octets écrits",
        path.display(),
        HEADER_LEN + layer.cells.len() * 2
    );
    Ok(())
}

/// Decode an MZM3 flat layer from bytes.
///
/// # Errors
/// `MzmError::MalformedMzm` on a bad header or a payload shorter than
/// `2 * width * height`.
pub fn decode_mzm(bytes: &[u8]) -> Result<(MzmHeader, Layer), MzmError> {
    let header = MzmHeader::parse(bytes)?;
    let count = usize::from(header.width) * usize::from(header.height);
    let payload = &bytes[HEADER_LEN..];
    if payload.len() < count * 2 {
        return Err(MzmError::MalformedMzm(format!(
            "{} octets de données, {} attendus",
            payload.len(),
            count * 2
        )));
    }

    let mut layer = Layer::new(header.width, header.height);
    for (cell, pair) in layer.cells.iter_mut().zip(payload.chunks_exact(2)) {
        *cell = TileCell {
            glyph: pair[0],
            color: pair[1],
        };
    }
    Ok((header, layer))
}

/// Relit un fichier MZM3.
///
/// # Errors
/// `MzmError::Io` if the file cannot be read, `MzmError::MalformedMzm` if
/// it is not a flat MZM3 layer.
pub fn read_mzm(path: &Path) -> Result<(MzmHeader, Layer), MzmError> {
    decode_mzm(&std::fs::read(path)?)
}
