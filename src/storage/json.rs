//! Import of ICU `weights.json` model files.
//!
//! The upstream training pipeline publishes one JSON file per script with
//! a character dictionary `dic` and nine matrices `mat1`..`mat9`. The
//! importer coalesces the dictionary into contiguous code-point ranges,
//! concatenates the matrices in their fixed order and validates every
//! declared shape against the model dimensions.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SeabreakError};
use crate::model::{CodepointMap, LstmModel};

#[derive(Debug, Deserialize)]
struct RawMatrix {
    dim: Vec<usize>,
    data: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct RawWeights {
    #[serde(default)]
    model: Option<String>,
    dic: HashMap<String, u32>,
    mat1: RawMatrix,
    mat2: RawMatrix,
    mat3: RawMatrix,
    mat4: RawMatrix,
    mat5: RawMatrix,
    mat6: RawMatrix,
    mat7: RawMatrix,
    mat8: RawMatrix,
    mat9: RawMatrix,
}

/// Reads and parses an ICU `weights.json` file.
///
/// The file stem is used as the model name when the JSON carries none.
pub fn import_weights<P: AsRef<Path>>(path: P) -> Result<LstmModel> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SeabreakError::FileNotFound(path.to_path_buf()));
    }
    let fallback = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unnamed".to_string());
    let json = std::fs::read_to_string(path)?;
    parse_weights(&json, &fallback)
}

/// Parses ICU `weights.json` content.
pub fn parse_weights(json: &str, fallback_name: &str) -> Result<LstmModel> {
    let raw: RawWeights = serde_json::from_str(json)?;

    let num_index = raw.dic.len();
    if raw.mat1.dim.len() < 2 {
        return Err(SeabreakError::InvalidModel(
            "mat1 must declare two dimensions".to_string(),
        ));
    }
    let embedding_size = raw.mat1.dim[1];
    if raw.mat3.dim.is_empty() {
        return Err(SeabreakError::InvalidModel(
            "mat3 must declare its dimensions".to_string(),
        ));
    }
    let hunits = raw.mat3.dim[0];

    let mut pairs = Vec::with_capacity(num_index);
    for (key, &index) in &raw.dic {
        let mut chars = key.chars();
        let ch = chars.next().ok_or_else(|| {
            SeabreakError::InvalidModel("empty dictionary key".to_string())
        })?;
        if chars.next().is_some() {
            return Err(SeabreakError::InvalidModel(format!(
                "dictionary key {key:?} holds more than one code point; \
                 only codepoints models are supported"
            )));
        }
        if index as usize >= num_index {
            return Err(SeabreakError::InvalidModel(format!(
                "dictionary index {index} out of range for {num_index} classes"
            )));
        }
        pairs.push((ch as u32, index));
    }
    let mapping = CodepointMap::from_pairs(pairs, num_index);

    let h4 = 4 * hunits;
    let expected: [(&str, &RawMatrix, usize); 9] = [
        ("mat1", &raw.mat1, (num_index + 1) * embedding_size),
        ("mat2", &raw.mat2, embedding_size * h4),
        ("mat3", &raw.mat3, hunits * h4),
        ("mat4", &raw.mat4, h4),
        ("mat5", &raw.mat5, embedding_size * h4),
        ("mat6", &raw.mat6, hunits * h4),
        ("mat7", &raw.mat7, h4),
        ("mat8", &raw.mat8, 2 * hunits * 4),
        ("mat9", &raw.mat9, 4),
    ];

    let mut matrices = Vec::with_capacity(LstmModel::expected_matrix_len(
        num_index,
        embedding_size,
        hunits,
    ));
    for (name, matrix, count) in expected {
        let declared: usize = matrix.dim.iter().product();
        if declared != matrix.data.len() {
            return Err(SeabreakError::InvalidModel(format!(
                "{name} declares {declared} elements but carries {}",
                matrix.data.len()
            )));
        }
        if matrix.data.len() != count {
            return Err(SeabreakError::InvalidModel(format!(
                "{name} holds {} elements, expected {count}",
                matrix.data.len()
            )));
        }
        matrices.extend_from_slice(&matrix.data);
    }

    let name = raw.model.unwrap_or_else(|| fallback_name.to_string());
    LstmModel::new(name, num_index, embedding_size, hunits, mapping, matrices)
}
