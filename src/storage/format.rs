//! Binary container for trained models.
//!
//! ## Format Layout
//!
//! ```text
//! +-------------------+
//! | Header (48 bytes) |
//! +-------------------+
//! | Model name (UTF-8)|
//! +-------------------+
//! | Mapping ranges    |
//! | (12 bytes each)   |
//! +-------------------+
//! | Padding to 4-byte |
//! | alignment         |
//! +-------------------+
//! | Weight blob (f32) |
//! +-------------------+
//! ```
//!
//! ### Header (48 bytes)
//! - Magic number (4 bytes): "SEAB"
//! - Version (2 bytes)
//! - Flags (2 bytes)
//! - `num_index` (4 bytes)
//! - `embedding_size` (4 bytes)
//! - `hunits` (4 bytes)
//! - Number of mapping ranges (4 bytes)
//! - Name length in bytes (4 bytes)
//! - Weight blob offset (4 bytes)
//! - Weight blob length in elements (4 bytes)
//! - Reserved (12 bytes)
//!
//! All integers and floats are little-endian. The weight blob offset is
//! 4-byte aligned so the blob can be viewed in place from a memory map.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use memmap2::MmapOptions;

use crate::error::{Result, SeabreakError};
use crate::model::{CodepointMap, LstmModel, MapRange};

/// Magic number for Seabreak model files.
const MAGIC: &[u8; 4] = b"SEAB";

/// Current format version.
const VERSION: u16 = 1;

/// Header size in bytes.
const HEADER_SIZE: usize = 48;

/// Bytes per stored mapping range.
const RANGE_SIZE: usize = 12;

#[derive(Debug, Clone)]
struct ModelHeader {
    num_index: u32,
    embedding_size: u32,
    hunits: u32,
    num_ranges: u32,
    name_len: u32,
    matrices_offset: u32,
    matrices_len: u32,
    version: u16,
    flags: u16,
}

impl ModelHeader {
    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(MAGIC);
        bytes[4..6].copy_from_slice(&self.version.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.flags.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.num_index.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.embedding_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.hunits.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.num_ranges.to_le_bytes());
        bytes[24..28].copy_from_slice(&self.name_len.to_le_bytes());
        bytes[28..32].copy_from_slice(&self.matrices_offset.to_le_bytes());
        bytes[32..36].copy_from_slice(&self.matrices_len.to_le_bytes());
        // Reserved (bytes 36-47)
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(SeabreakError::InvalidFormat("header too short".to_string()));
        }
        if &bytes[0..4] != MAGIC {
            return Err(SeabreakError::InvalidFormat(
                "invalid magic number".to_string(),
            ));
        }
        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(SeabreakError::InvalidFormat(format!(
                "unsupported version {version}"
            )));
        }
        let flags = u16::from_le_bytes([bytes[6], bytes[7]]);
        let le_u32 =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        Ok(Self {
            num_index: le_u32(8),
            embedding_size: le_u32(12),
            hunits: le_u32(16),
            num_ranges: le_u32(20),
            name_len: le_u32(24),
            matrices_offset: le_u32(28),
            matrices_len: le_u32(32),
            version,
            flags,
        })
    }
}

fn parse_sections(bytes: &[u8], header: &ModelHeader) -> Result<(String, CodepointMap)> {
    let name_start = HEADER_SIZE;
    let name_end = name_start + header.name_len as usize;
    let ranges_end = name_end + header.num_ranges as usize * RANGE_SIZE;
    if ranges_end > bytes.len() || header.matrices_offset as usize > bytes.len() {
        return Err(SeabreakError::InvalidFormat("file truncated".to_string()));
    }

    let name = std::str::from_utf8(&bytes[name_start..name_end])
        .map_err(|_| SeabreakError::InvalidFormat("model name is not UTF-8".to_string()))?
        .to_string();

    let mut ranges = Vec::with_capacity(header.num_ranges as usize);
    for at in (name_end..ranges_end).step_by(RANGE_SIZE) {
        let le_u32 =
            |at: usize| u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]]);
        ranges.push(MapRange {
            first: le_u32(at),
            last: le_u32(at + 4),
            base: le_u32(at + 8),
        });
    }
    let mapping = CodepointMap::from_ranges(ranges, header.num_index as usize)
        .ok_or_else(|| SeabreakError::InvalidFormat("malformed mapping ranges".to_string()))?;
    Ok((name, mapping))
}

/// Binary reader/writer for `.seab` model files.
pub struct ModelFormat;

impl ModelFormat {
    /// Writes a model to a binary file.
    pub fn write<P: AsRef<Path>>(path: P, model: &LstmModel) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let name = model.name().as_bytes();
        let ranges = model.mapping().ranges();
        let matrices = model.matrices();

        let sections_end = HEADER_SIZE + name.len() + ranges.len() * RANGE_SIZE;
        let matrices_offset = sections_end.next_multiple_of(4);

        let header = ModelHeader {
            num_index: model.num_index() as u32,
            embedding_size: model.embedding_size() as u32,
            hunits: model.hunits() as u32,
            num_ranges: ranges.len() as u32,
            name_len: name.len() as u32,
            matrices_offset: matrices_offset as u32,
            matrices_len: matrices.len() as u32,
            version: VERSION,
            flags: 0,
        };

        writer.write_all(&header.to_bytes())?;
        writer.write_all(name)?;
        for range in ranges {
            writer.write_all(&range.first.to_le_bytes())?;
            writer.write_all(&range.last.to_le_bytes())?;
            writer.write_all(&range.base.to_le_bytes())?;
        }
        for _ in sections_end..matrices_offset {
            writer.write_all(&[0u8])?;
        }
        for value in matrices {
            writer.write_all(&value.to_le_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Reads a model into owned memory.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<LstmModel> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SeabreakError::FileNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path)?;
        let header = ModelHeader::from_bytes(&bytes)?;
        let (name, mapping) = parse_sections(&bytes, &header)?;

        let start = header.matrices_offset as usize;
        let end = start + header.matrices_len as usize * 4;
        if end > bytes.len() {
            return Err(SeabreakError::InvalidFormat("file truncated".to_string()));
        }
        let matrices: Vec<f32> = bytes[start..end]
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        let model = LstmModel::new(
            name,
            header.num_index as usize,
            header.embedding_size as usize,
            header.hunits as usize,
            mapping,
            matrices,
        )?;
        info!(
            "loaded model {} ({} classes, E={}, H={})",
            model.name(),
            model.num_index(),
            model.embedding_size(),
            model.hunits()
        );
        Ok(model)
    }

    /// Memory-maps a model so the weight blob is viewed in place.
    pub fn mmap<P: AsRef<Path>>(path: P) -> Result<LstmModel> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SeabreakError::FileNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let mmap = unsafe { MmapOptions::new().map(&file)? };

        let header = ModelHeader::from_bytes(&mmap)?;
        let (name, mapping) = parse_sections(&mmap, &header)?;

        let model = LstmModel::from_mmap(
            name,
            header.num_index as usize,
            header.embedding_size as usize,
            header.hunits as usize,
            mapping,
            mmap,
            header.matrices_offset as usize,
            header.matrices_len as usize,
        )?;
        info!(
            "mapped model {} ({} classes, E={}, H={})",
            model.name(),
            model.num_index(),
            model.embedding_size(),
            model.hunits()
        );
        Ok(model)
    }
}
