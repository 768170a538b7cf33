//! Reads tuning files and resolves them into a validated [`GameConfig`].
//!
//! Provides format detection (RON/JSON/TOML), file discovery, and the
//! name lookups that turn data-file strings into core enums.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use alembic_core::brew::BrewTable;
use alembic_core::config::{ConfigError, GameConfig};
use alembic_core::fluid::FluidColor;
use alembic_core::tile::PipeShape;
use serde::de::DeserializeOwned;

use crate::schema::TuningData;

/// Base name of the tuning file, without extension.
pub const TUNING_FILE: &str = "tuning";

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur while loading tuning data.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// Two files with the same base name but different formats exist.
    #[error("conflicting formats: {a} and {b}")]
    ConflictingFormats { a: PathBuf, b: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A name could not be resolved.
    #[error("unresolved {expected_kind} name '{name}' in {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        expected_kind: &'static str,
    },

    /// The same name was given twice where each may appear once.
    #[error("duplicate name '{name}' in {file}")]
    DuplicateName { file: PathBuf, name: String },

    /// The file parsed but describes an unplayable game.
    #[error("invalid tuning in {file}: {source}")]
    Invalid {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// File discovery
// ===========================================================================

/// Scan a directory for a data file with the given base name (without extension).
///
/// Looks for `{base_name}.ron`, `{base_name}.toml`, and `{base_name}.json`.
/// Returns `Ok(None)` if no file is found, or `Err(ConflictingFormats)` if
/// multiple formats exist for the same base name.
pub fn find_data_file(dir: &Path, base_name: &str) -> Result<Option<PathBuf>, DataLoadError> {
    let mut found: Option<PathBuf> = None;

    for ext in ["ron", "toml", "json"] {
        let candidate = dir.join(format!("{base_name}.{ext}"));
        if candidate.exists() {
            if let Some(existing) = found {
                return Err(DataLoadError::ConflictingFormats {
                    a: existing,
                    b: candidate,
                });
            }
            found = Some(candidate);
        }
    }

    Ok(found)
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

/// Deserialize already-read content. `path` is only used in error messages.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    path: &Path,
) -> Result<T, DataLoadError> {
    let parse_error = |detail: String| DataLoadError::Parse {
        file: path.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_error(e.to_string())),
    }
}

// ===========================================================================
// Name resolution helpers
// ===========================================================================

/// Look up a name in a map, returning an `UnresolvedRef` error if not found.
pub fn resolve_name<'a, V>(
    map: &'a HashMap<String, V>,
    name: &str,
    file: &Path,
    expected_kind: &'static str,
) -> Result<&'a V, DataLoadError> {
    map.get(name).ok_or_else(|| DataLoadError::UnresolvedRef {
        file: file.to_path_buf(),
        name: name.to_string(),
        expected_kind,
    })
}

fn shape_names() -> HashMap<String, PipeShape> {
    PipeShape::all()
        .into_iter()
        .map(|s| (s.name().to_string(), s))
        .collect()
}

fn color_names() -> HashMap<String, FluidColor> {
    FluidColor::all()
        .into_iter()
        .map(|c| (c.name().to_string(), c))
        .collect()
}

// ===========================================================================
// Resolution
// ===========================================================================

/// Turn parsed tuning data into a validated config.
pub fn resolve_tuning(data: TuningData, file: &Path) -> Result<GameConfig, DataLoadError> {
    let shapes = shape_names();
    let colors = color_names();

    let mut distribution = Vec::new();
    for entry in &data.distribution {
        let shape = *resolve_name(&shapes, &entry.shape, file, "shape")?;
        distribution.extend(std::iter::repeat_n(shape, entry.weight as usize));
    }

    let mut brew = BrewTable {
        max_potency: data.max_potency,
        ..BrewTable::default()
    };
    let mut overridden = HashSet::new();
    for entry in &data.brew {
        let color = *resolve_name(&colors, &entry.color, file, "color")?;
        if !overridden.insert(color) {
            return Err(DataLoadError::DuplicateName {
                file: file.to_path_buf(),
                name: entry.color.clone(),
            });
        }
        brew.outputs[color.index() as usize] = entry.output;
    }

    let config = GameConfig {
        dim: data.dim,
        brew,
        distribution,
        starting_counts: data.starting_counts,
        initial_mulligans: data.initial_mulligans,
        max_mulligans: data.max_mulligans,
    };
    config.validate().map_err(|source| DataLoadError::Invalid {
        file: file.to_path_buf(),
        source,
    })?;
    Ok(config)
}

/// Load and validate a tuning file.
pub fn load_config(path: &Path) -> Result<GameConfig, DataLoadError> {
    let data: TuningData = deserialize_file(path)?;
    let config = resolve_tuning(data, path)?;
    log::info!(
        "loaded tuning from {}: {}x{} board, max potency {}",
        path.display(),
        config.dim,
        config.dim,
        config.brew.max_potency
    );
    Ok(config)
}

/// Load `tuning.{ron,toml,json}` from `dir`, or the shipped defaults when
/// the directory has none.
pub fn load_config_dir(dir: &Path) -> Result<GameConfig, DataLoadError> {
    match find_data_file(dir, TUNING_FILE)? {
        Some(path) => load_config(&path),
        None => {
            log::debug!("no tuning file in {}, using defaults", dir.display());
            Ok(GameConfig::default())
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
