//! Integration tests for the Seabreak word-boundary engine.
//!
//! The published Unicode models are external artifacts, so these tests run
//! synthetic models with seeded random weights and check the engine against
//! an independent naive BiLSTM written with plain index loops.

use std::sync::Arc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use seabreak::{
    CodepointMap, LstmModel, ModelFormat, Registry, Script, SeabreakError,
};
use tempfile::tempdir;

/// A model kept in tensor-per-field form so the reference implementation
/// can use it without going through the crate's binding code.
struct SyntheticModel {
    num_index: usize,
    embedding_size: usize,
    hunits: usize,
    /// `(code point, index)` pairs, with a deliberate gap in the middle.
    pairs: Vec<(u32, u32)>,
    embedding: Vec<f32>,
    forward_w: Vec<f32>,
    forward_u: Vec<f32>,
    forward_b: Vec<f32>,
    backward_w: Vec<f32>,
    backward_u: Vec<f32>,
    backward_b: Vec<f32>,
    output_w: Vec<f32>,
    output_b: Vec<f32>,
}

fn script_base(script: Script) -> u32 {
    match script {
        Script::Thai => 0x0E00,
        Script::Lao => 0x0E80,
        Script::Burmese => 0x1000,
        Script::Khmer => 0x1780,
    }
}

impl SyntheticModel {
    fn random(script: Script, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (num_index, embedding_size, hunits) = (8usize, 3usize, 2usize);
        let base = script_base(script);

        // Two coalescible runs with a hole between them.
        let mut pairs = Vec::new();
        for i in 0..4u32 {
            pairs.push((base + 1 + i, i));
        }
        for i in 0..4u32 {
            pairs.push((base + 6 + i, 4 + i));
        }

        let mut tensor = |n: usize| -> Vec<f32> {
            (0..n).map(|_| rng.gen_range(-1.5..1.5)).collect()
        };
        let h4 = 4 * hunits;
        Self {
            num_index,
            embedding_size,
            hunits,
            pairs,
            embedding: tensor((num_index + 1) * embedding_size),
            forward_w: tensor(embedding_size * h4),
            forward_u: tensor(hunits * h4),
            forward_b: tensor(h4),
            backward_w: tensor(embedding_size * h4),
            backward_u: tensor(hunits * h4),
            backward_b: tensor(h4),
            output_w: tensor(2 * hunits * 4),
            output_b: tensor(4),
        }
    }

    fn blob(&self) -> Vec<f32> {
        let mut blob = Vec::new();
        blob.extend_from_slice(&self.embedding);
        blob.extend_from_slice(&self.forward_w);
        blob.extend_from_slice(&self.forward_u);
        blob.extend_from_slice(&self.forward_b);
        blob.extend_from_slice(&self.backward_w);
        blob.extend_from_slice(&self.backward_u);
        blob.extend_from_slice(&self.backward_b);
        blob.extend_from_slice(&self.output_w);
        blob.extend_from_slice(&self.output_b);
        blob
    }

    fn build(&self, name: &str) -> Arc<LstmModel> {
        let mapping = CodepointMap::from_pairs(self.pairs.iter().copied(), self.num_index);
        Arc::new(
            LstmModel::new(
                name,
                self.num_index,
                self.embedding_size,
                self.hunits,
                mapping,
                self.blob(),
            )
            .unwrap(),
        )
    }

    fn map(&self, ch: char) -> usize {
        let cp = ch as u32;
        self.pairs
            .iter()
            .find(|&&(mapped, _)| mapped == cp)
            .map(|&(_, index)| index as usize)
            .unwrap_or(self.num_index)
    }

    fn embedding_row(&self, index: usize) -> &[f32] {
        &self.embedding[index * self.embedding_size..(index + 1) * self.embedding_size]
    }

    /// One forget-gate LSTM step with plain loops, accumulating in the same
    /// order as the engine so labels match exactly.
    #[allow(clippy::too_many_arguments)]
    fn step(
        &self,
        w: &[f32],
        u: &[f32],
        b: &[f32],
        x: &[f32],
        h_prev: &[f32],
        c_prev: &[f32],
    ) -> (Vec<f32>, Vec<f32>) {
        let hunits = self.hunits;
        let h4 = 4 * hunits;
        let mut gates = vec![0.0f32; h4];
        for (k, gate) in gates.iter_mut().enumerate() {
            let mut acc = b[k];
            for (j, &xj) in x.iter().enumerate() {
                acc += xj * w[j * h4 + k];
            }
            for (j, &hj) in h_prev.iter().enumerate() {
                acc += hj * u[j * h4 + k];
            }
            *gate = acc;
        }
        let sigmoid = |v: f32| 1.0 / (1.0 + (-v).exp());
        let mut h = vec![0.0f32; hunits];
        let mut c = vec![0.0f32; hunits];
        for k in 0..hunits {
            let i = sigmoid(gates[k]);
            let f = sigmoid(gates[hunits + k]);
            let c_tilde = gates[2 * hunits + k].tanh();
            let o = sigmoid(gates[3 * hunits + k]);
            c[k] = c_prev[k] * f + i * c_tilde;
            h[k] = c[k].tanh() * o;
        }
        (h, c)
    }

    /// Reference BiLSTM decode of one same-script run.
    fn reference_breaks(&self, text: &[char], start: usize, end: usize) -> Vec<usize> {
        let len = end - start;
        let hunits = self.hunits;

        let indices: Vec<usize> = text[start..end].iter().map(|&ch| self.map(ch)).collect();

        let mut h_backward = vec![vec![0.0f32; hunits]; len];
        let mut h = vec![0.0f32; hunits];
        let mut c = vec![0.0f32; hunits];
        for i in (0..len).rev() {
            let (new_h, new_c) = self.step(
                &self.backward_w,
                &self.backward_u,
                &self.backward_b,
                self.embedding_row(indices[i]),
                &h,
                &c,
            );
            h_backward[i] = new_h.clone();
            h = new_h;
            c = new_c;
        }

        let mut breaks = Vec::new();
        let mut h = vec![0.0f32; hunits];
        let mut c = vec![0.0f32; hunits];
        for i in 0..len {
            let (new_h, new_c) = self.step(
                &self.forward_w,
                &self.forward_u,
                &self.forward_b,
                self.embedding_row(indices[i]),
                &h,
                &c,
            );
            h = new_h;
            c = new_c;

            let mut logits = self.output_b.clone();
            for (k, logit) in logits.iter_mut().enumerate() {
                for j in 0..hunits {
                    *logit += h[j] * self.output_w[j * 4 + k];
                }
                for j in 0..hunits {
                    *logit += h_backward[i][j] * self.output_w[(hunits + j) * 4 + k];
                }
            }
            let mut label = 0;
            for k in 1..4 {
                if logits[k] > logits[label] {
                    label = k;
                }
            }
            // Begin or Single opens a word.
            if (label == 0 || label == 3) && i != 0 {
                breaks.push(start + i);
            }
        }
        breaks
    }
}

fn random_run(script: Script, rng: &mut ChaCha8Rng, len: usize) -> Vec<char> {
    let base = script_base(script);
    (0..len)
        .map(|_| char::from_u32(base + rng.gen_range(1..=10)).unwrap())
        .collect()
}

fn four_script_registry(seed: u64) -> (Registry, Vec<SyntheticModel>) {
    let models: Vec<SyntheticModel> = Script::ALL
        .iter()
        .enumerate()
        .map(|(i, &script)| SyntheticModel::random(script, seed + i as u64))
        .collect();
    let registry = Registry::new(
        models[0].build("thai"),
        models[1].build("lao"),
        models[2].build("burmese"),
        models[3].build("khmer"),
    );
    (registry, models)
}

fn reference_line_breaks(models: &[SyntheticModel], text: &[char], start: usize, end: usize) -> Vec<usize> {
    let model_for = |script: Script| {
        let index = Script::ALL.iter().position(|&s| s == script).unwrap();
        &models[index]
    };
    let mut breaks = Vec::new();
    let mut chunk_start = start;
    let mut chunk_script: Option<Script> = None;
    for pos in start..end {
        let script = Script::of(text[pos]);
        if script != chunk_script {
            if let Some(active) = chunk_script {
                breaks.extend(model_for(active).reference_breaks(text, chunk_start, pos));
            }
            chunk_script = script;
            chunk_start = pos;
        }
    }
    if chunk_start != end {
        if let Some(active) = chunk_script {
            breaks.extend(model_for(active).reference_breaks(text, chunk_start, end));
        }
    }
    breaks
}

#[test]
fn test_engine_matches_reference_bilstm() {
    for seed in [7u64, 21, 1234] {
        let model = SyntheticModel::random(Script::Thai, seed);
        let engine = seabreak::LstmBreakEngine::new(model.build("thai"));

        let mut rng = ChaCha8Rng::seed_from_u64(seed ^ 0xBEEF);
        let text = random_run(Script::Thai, &mut rng, 48);

        let mut got = Vec::new();
        engine
            .break_word(&text, 0, text.len(), &mut |pos| got.push(pos))
            .unwrap();
        let expected = model.reference_breaks(&text, 0, text.len());
        assert_eq!(got, expected, "seed {seed}");
        assert!(!got.contains(&0), "no break at the run start");
    }
}

#[test]
fn test_dispatcher_matches_reference_on_mixed_text() {
    let (registry, models) = four_script_registry(40);
    let mut rng = ChaCha8Rng::seed_from_u64(4040);

    // Latin, Thai, spaces, Khmer, Lao and Burmese runs back to back.
    let mut text: Vec<char> = Vec::new();
    text.extend("some latin ".chars());
    text.extend(random_run(Script::Thai, &mut rng, 19));
    text.push(' ');
    text.extend(random_run(Script::Khmer, &mut rng, 11));
    text.extend(random_run(Script::Lao, &mut rng, 13));
    text.extend(" and ".chars());
    text.extend(random_run(Script::Burmese, &mut rng, 17));

    let got = registry.breaks(&text, 0, text.len()).unwrap();
    let expected = reference_line_breaks(&models, &text, 0, text.len());
    assert_eq!(got, expected);
}

#[test]
fn test_breaks_are_strictly_increasing_and_interior() {
    let (registry, _) = four_script_registry(81);
    let mut rng = ChaCha8Rng::seed_from_u64(8181);

    let mut text: Vec<char> = Vec::new();
    for _ in 0..6 {
        let script = Script::ALL[rng.gen_range(0..4)];
        let run_len = rng.gen_range(1..20);
        text.extend(random_run(script, &mut rng, run_len));
        if rng.gen_bool(0.5) {
            text.push(' ');
        }
    }

    let start = 1.min(text.len());
    let end = text.len();
    let breaks = registry.breaks(&text, start, end).unwrap();
    for window in breaks.windows(2) {
        assert!(window[0] < window[1], "positions must strictly increase");
    }
    for &pos in &breaks {
        assert!(pos > start && pos < end);
    }
}

#[test]
fn test_deterministic_across_registries_and_calls() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let mut text: Vec<char> = random_run(Script::Lao, &mut rng, 40);
    text.extend(random_run(Script::Burmese, &mut rng, 25));

    let (first_registry, _) = four_script_registry(90);
    let (second_registry, _) = four_script_registry(90);

    let first = first_registry.breaks(&text, 0, text.len()).unwrap();
    let again = first_registry.breaks(&text, 0, text.len()).unwrap();
    let second = second_registry.breaks(&text, 0, text.len()).unwrap();
    assert_eq!(first, again);
    assert_eq!(first, second);
}

#[test]
fn test_empty_range_reports_nothing() {
    let (registry, _) = four_script_registry(3);
    let text: Vec<char> = "กขค".chars().collect();
    assert!(registry.breaks(&text, 2, 2).unwrap().is_empty());
}

#[test]
fn test_oversize_run_fails_without_callbacks() {
    let (registry, _) = four_script_registry(11);
    let text: Vec<char> = (0..3000).map(|_| 'ก').collect();

    let mut fired = 0usize;
    let err = registry
        .break_line(&text, 0, text.len(), |_| fired += 1)
        .unwrap_err();
    assert!(matches!(err, SeabreakError::RangeTooLong { .. }));
    assert_eq!(fired, 0);
}

#[test]
fn test_model_roundtrip_preserves_breaks() {
    let synthetic = SyntheticModel::random(Script::Khmer, 55);
    let model = synthetic.build("khmer");
    let engine = seabreak::LstmBreakEngine::new(model);

    let dir = tempdir().unwrap();
    let path = dir.path().join("khmer.seab");
    ModelFormat::write(&path, engine.model()).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(555);
    let text = random_run(Script::Khmer, &mut rng, 30);

    let mut direct = Vec::new();
    engine
        .break_word(&text, 0, text.len(), &mut |pos| direct.push(pos))
        .unwrap();

    // Both the owned reader and the memory-mapped loader must reproduce
    // the in-memory model's output exactly.
    for loaded in [ModelFormat::read(&path).unwrap(), ModelFormat::mmap(&path).unwrap()] {
        let engine = seabreak::LstmBreakEngine::new(Arc::new(loaded));
        let mut got = Vec::new();
        engine
            .break_word(&text, 0, text.len(), &mut |pos| got.push(pos))
            .unwrap();
        assert_eq!(got, direct);
    }
}

#[test]
fn test_global_registry_install_once() {
    let (registry, models) = four_script_registry(77);
    seabreak::install(registry).unwrap();

    let (second, _) = four_script_registry(78);
    assert!(matches!(
        seabreak::install(second),
        Err(SeabreakError::RegistryInstalled)
    ));

    let mut rng = ChaCha8Rng::seed_from_u64(7777);
    let text = random_run(Script::Thai, &mut rng, 22);
    let mut got = Vec::new();
    seabreak::break_line(&text, 0, text.len(), |pos| got.push(pos)).unwrap();
    assert_eq!(got, reference_line_breaks(&models, &text, 0, text.len()));
    assert!(seabreak::global().is_some());
}
