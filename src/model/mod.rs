//! Trained model data: dimensions, code-point mapping and the weight blob.
//!
//! A [`LstmModel`] is immutable after construction. The weight blob is a
//! single contiguous run of `f32`s holding nine tensors in a fixed order
//! (see [`weights`]); construction validates the blob length against the
//! declared dimensions so downstream binding is pure offset arithmetic.

mod map;
pub(crate) mod weights;

pub use map::{CodepointMap, MapRange};

use memmap2::Mmap;

use crate::error::{Result, SeabreakError};

/// A trained per-script BiLSTM segmentation model.
///
/// Holds the three dimensions, the code-point mapping and the contiguous
/// float blob. The blob may be owned or borrowed from a memory-mapped file;
/// either way it is read-only for the life of the model.
#[derive(Debug)]
pub struct LstmModel {
    name: String,
    num_index: usize,
    embedding_size: usize,
    hunits: usize,
    mapping: CodepointMap,
    store: MatrixStore,
}

#[derive(Debug)]
enum MatrixStore {
    Owned(Vec<f32>),
    Mapped {
        mmap: Mmap,
        /// Byte offset of the float section; always 4-byte aligned.
        offset: usize,
        /// Length in elements.
        len: usize,
    },
}

impl LstmModel {
    /// Creates a model from an owned weight blob.
    ///
    /// Fails if the blob length does not match the shape table for the
    /// given dimensions, or if the mapping's out-of-vocabulary index is not
    /// `num_index`.
    pub fn new(
        name: impl Into<String>,
        num_index: usize,
        embedding_size: usize,
        hunits: usize,
        mapping: CodepointMap,
        matrices: Vec<f32>,
    ) -> Result<Self> {
        let expected = Self::expected_matrix_len(num_index, embedding_size, hunits);
        if matrices.len() != expected {
            return Err(SeabreakError::InvalidModel(format!(
                "weight blob holds {} floats, expected {} for N={} E={} H={}",
                matrices.len(),
                expected,
                num_index,
                embedding_size,
                hunits
            )));
        }
        Self::check_mapping(num_index, &mapping)?;
        Ok(Self {
            name: name.into(),
            num_index,
            embedding_size,
            hunits,
            mapping,
            store: MatrixStore::Owned(matrices),
        })
    }

    /// Creates a model whose weight blob lives in a memory-mapped file.
    ///
    /// `offset` is the byte offset of the float section inside `mmap` and
    /// must be 4-byte aligned; `len` is the element count. The section must
    /// contain little-endian `f32`s, the on-disk representation produced by
    /// [`crate::storage::ModelFormat`].
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_mmap(
        name: impl Into<String>,
        num_index: usize,
        embedding_size: usize,
        hunits: usize,
        mapping: CodepointMap,
        mmap: Mmap,
        offset: usize,
        len: usize,
    ) -> Result<Self> {
        let expected = Self::expected_matrix_len(num_index, embedding_size, hunits);
        if len != expected {
            return Err(SeabreakError::InvalidFormat(format!(
                "float section holds {len} elements, expected {expected}"
            )));
        }
        if offset % std::mem::align_of::<f32>() != 0 {
            return Err(SeabreakError::InvalidFormat(format!(
                "float section offset {offset} is not 4-byte aligned"
            )));
        }
        let end = offset
            .checked_add(len * std::mem::size_of::<f32>())
            .ok_or_else(|| SeabreakError::InvalidFormat("float section overflows".into()))?;
        if end > mmap.len() {
            return Err(SeabreakError::InvalidFormat(format!(
                "float section ends at {end}, file is {} bytes",
                mmap.len()
            )));
        }
        Self::check_mapping(num_index, &mapping)?;
        Ok(Self {
            name: name.into(),
            num_index,
            embedding_size,
            hunits,
            mapping,
            store: MatrixStore::Mapped { mmap, offset, len },
        })
    }

    fn check_mapping(num_index: usize, mapping: &CodepointMap) -> Result<()> {
        if mapping.oov_index() != num_index {
            return Err(SeabreakError::InvalidModel(format!(
                "mapping folds out-of-vocabulary characters to {}, expected {}",
                mapping.oov_index(),
                num_index
            )));
        }
        if let Some(max) = mapping.max_index() {
            if max >= num_index {
                return Err(SeabreakError::InvalidModel(format!(
                    "mapping emits index {max}, vocabulary has {num_index} classes"
                )));
            }
        }
        Ok(())
    }

    /// Total float count of the nine concatenated tensors:
    /// `(N+1)*E + 2*(E*4H + H*4H + 4H) + 8H + 4`.
    pub fn expected_matrix_len(num_index: usize, embedding_size: usize, hunits: usize) -> usize {
        let embedding = (num_index + 1) * embedding_size;
        let per_direction = embedding_size * 4 * hunits + hunits * 4 * hunits + 4 * hunits;
        embedding + 2 * per_direction + 8 * hunits + 4
    }

    /// Model name, taken from the training metadata or file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of in-vocabulary character classes.
    #[inline]
    pub fn num_index(&self) -> usize {
        self.num_index
    }

    /// Embedding vector width.
    #[inline]
    pub fn embedding_size(&self) -> usize {
        self.embedding_size
    }

    /// Hidden-state width of each LSTM direction.
    #[inline]
    pub fn hunits(&self) -> usize {
        self.hunits
    }

    /// The code-point mapping.
    #[inline]
    pub fn mapping(&self) -> &CodepointMap {
        &self.mapping
    }

    /// The contiguous weight blob.
    pub(crate) fn matrices(&self) -> &[f32] {
        match &self.store {
            MatrixStore::Owned(data) => data,
            MatrixStore::Mapped { mmap, offset, len } => {
                let bytes = &mmap[*offset..*offset + *len * std::mem::size_of::<f32>()];
                // Alignment was validated at construction, so the prefix and
                // suffix are empty.
                let (prefix, floats, suffix) = unsafe { bytes.align_to::<f32>() };
                debug_assert!(prefix.is_empty() && suffix.is_empty());
                floats
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_mapping(num_index: usize) -> CodepointMap {
        CodepointMap::from_pairs((0..num_index as u32).map(|i| (0x0E01 + i, i)), num_index)
    }

    #[test]
    fn test_expected_matrix_len() {
        // N=2, E=2, H=1: 3*2 + 2*(2*4 + 1*4 + 4) + 8 + 4 = 50
        assert_eq!(LstmModel::expected_matrix_len(2, 2, 1), 50);
    }

    #[test]
    fn test_new_validates_length() {
        let len = LstmModel::expected_matrix_len(2, 2, 1);
        let model = LstmModel::new("tiny", 2, 2, 1, tiny_mapping(2), vec![0.0; len]);
        assert!(model.is_ok());

        let short = LstmModel::new("tiny", 2, 2, 1, tiny_mapping(2), vec![0.0; len - 1]);
        assert!(matches!(short, Err(SeabreakError::InvalidModel(_))));
    }

    #[test]
    fn test_new_validates_mapping_bounds() {
        let len = LstmModel::expected_matrix_len(2, 2, 1);
        // Mapping emits indices up to 2 but claims OOV is also 2.
        let mapping = CodepointMap::from_pairs([(0x0E01, 0), (0x0E02, 1), (0x0E03, 2)], 2);
        let model = LstmModel::new("tiny", 2, 2, 1, mapping, vec![0.0; len]);
        assert!(matches!(model, Err(SeabreakError::InvalidModel(_))));
    }
}
