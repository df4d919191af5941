//! Script dispatch: chunking a range by script and routing each chunk to
//! its per-script engine.
//!
//! A [`Registry`] owns the four models and lazily builds one immortal
//! engine per script on first use. Engines are immutable after
//! construction, so concurrent [`Registry::break_line`] calls need no
//! locking; the one-time engine construction is guarded by
//! [`once_cell::sync::OnceCell`]. A process-wide registry can be installed
//! once with [`install`] and used through the free [`break_line`].

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::ModelPaths;
use crate::engine::LstmBreakEngine;
use crate::error::{Result, SeabreakError};
use crate::model::LstmModel;
use crate::script::Script;
use crate::storage::ModelFormat;

#[derive(Debug)]
struct Slot {
    model: Arc<LstmModel>,
    engine: OnceCell<LstmBreakEngine>,
}

impl Slot {
    fn new(model: Arc<LstmModel>) -> Self {
        Self {
            model,
            engine: OnceCell::new(),
        }
    }

    fn engine(&self) -> &LstmBreakEngine {
        self.engine
            .get_or_init(|| LstmBreakEngine::new(self.model.clone()))
    }
}

/// The four per-script models with lazily constructed engines.
#[derive(Debug)]
pub struct Registry {
    slots: [Slot; 4],
}

impl Registry {
    /// Creates a registry from the four per-script models.
    pub fn new(
        thai: Arc<LstmModel>,
        lao: Arc<LstmModel>,
        burmese: Arc<LstmModel>,
        khmer: Arc<LstmModel>,
    ) -> Self {
        Self {
            slots: [
                Slot::new(thai),
                Slot::new(lao),
                Slot::new(burmese),
                Slot::new(khmer),
            ],
        }
    }

    /// Memory-maps the four model files named by `paths`.
    pub fn from_paths(paths: &ModelPaths) -> Result<Self> {
        let load = |script: Script| -> Result<Arc<LstmModel>> {
            Ok(Arc::new(ModelFormat::mmap(paths.get(script))?))
        };
        Ok(Self::new(
            load(Script::Thai)?,
            load(Script::Lao)?,
            load(Script::Burmese)?,
            load(Script::Khmer)?,
        ))
    }

    fn slot(&self, script: Script) -> &Slot {
        let index = match script {
            Script::Thai => 0,
            Script::Lao => 1,
            Script::Burmese => 2,
            Script::Khmer => 3,
        };
        &self.slots[index]
    }

    /// The model registered for a script.
    pub fn model(&self, script: Script) -> &LstmModel {
        &self.slot(script).model
    }

    /// The engine for a script, built on first use.
    pub fn engine(&self, script: Script) -> &LstmBreakEngine {
        self.slot(script).engine()
    }

    /// Finds word boundaries in `text[start..end]`.
    ///
    /// The range is cut into maximal same-script chunks; each chunk of a
    /// supported script is handed to that script's engine, and chunks
    /// outside the four scripts are skipped. `on_break` receives absolute
    /// positions in strictly increasing order. A script transition is not
    /// itself reported; the caller's own line-break logic owns those
    /// boundaries. The first engine error aborts the walk.
    pub fn break_line<F>(&self, text: &[char], start: usize, end: usize, mut on_break: F) -> Result<()>
    where
        F: FnMut(usize),
    {
        debug_assert!(start <= end && end <= text.len());
        let mut chunk_start = start;
        let mut chunk_script: Option<Script> = None;

        for pos in start..end {
            let script = Script::of(text[pos]);
            if script != chunk_script {
                if let Some(active) = chunk_script {
                    self.engine(active)
                        .break_word(text, chunk_start, pos, &mut on_break)?;
                }
                chunk_script = script;
                chunk_start = pos;
            }
        }
        if chunk_start != end {
            if let Some(active) = chunk_script {
                self.engine(active)
                    .break_word(text, chunk_start, end, &mut on_break)?;
            }
        }
        Ok(())
    }

    /// Collects the break positions of [`break_line`] into a vector.
    ///
    /// [`break_line`]: Registry::break_line
    pub fn breaks(&self, text: &[char], start: usize, end: usize) -> Result<Vec<usize>> {
        let mut positions = Vec::new();
        self.break_line(text, start, end, |pos| positions.push(pos))?;
        Ok(positions)
    }
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();

/// Installs the process-wide registry.
///
/// May be called at most once; later calls fail with
/// [`SeabreakError::RegistryInstalled`] and leave the original in place.
pub fn install(registry: Registry) -> Result<()> {
    GLOBAL
        .set(registry)
        .map_err(|_| SeabreakError::RegistryInstalled)
}

/// The installed process-wide registry, if any.
pub fn global() -> Option<&'static Registry> {
    GLOBAL.get()
}

/// [`Registry::break_line`] on the installed process-wide registry.
pub fn break_line<F>(text: &[char], start: usize, end: usize, on_break: F) -> Result<()>
where
    F: FnMut(usize),
{
    global()
        .ok_or(SeabreakError::RegistryMissing)?
        .break_line(text, start, end, on_break)
}
