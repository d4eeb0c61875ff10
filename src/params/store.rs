use serde_json::{Map, Value};

use crate::foundation::error::{CanvasError, CanvasResult};
use crate::params::catalog::{Background, BackgroundCatalog};

/// Catalog index selected before anything is loaded.
pub const DEFAULT_SELECTED: usize = 4;

/// Serializable record of the user's choices.
///
/// `selected` is the only reserved field; any other field is carried through verbatim.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Configuration {
    /// Index into the background catalog.
    pub selected: usize,
    /// Further fields, kept in key order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Configuration {
    /// Configuration with the given selection and no further fields.
    pub fn with_selected(selected: usize) -> Self {
        Self {
            selected,
            extra: Map::new(),
        }
    }
}

/// One display attribute (OpenSea metadata format).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Trait name.
    pub trait_type: String,
    /// Trait value.
    pub value: String,
}

/// Ordered attribute pairs derived from a configuration.
pub type AttributeList = Vec<Attribute>;

/// Where the current configuration came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreState {
    /// Startup defaults.
    Default,
    /// Adopted from a params file or a host restore.
    Loaded,
}

/// Outcome of a host `restore`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Host had saved data and it was adopted.
    Adopted,
    /// Host had nothing saved; the current configuration is kept.
    Fresh,
    /// Saved data was unusable; the current configuration is kept.
    Rejected,
}

/// In-memory configuration with its catalog.
///
/// Every write path clamps `selected` into the catalog, so [`ParameterStore::background`]
/// can never index out of range.
#[derive(Clone, Debug)]
pub struct ParameterStore {
    catalog: BackgroundCatalog,
    config: Configuration,
    default_selected: usize,
    state: StoreState,
    saves: u64,
}

impl ParameterStore {
    /// Store over `catalog`, starting at [`DEFAULT_SELECTED`] (clamped).
    pub fn new(catalog: BackgroundCatalog) -> Self {
        Self::with_default(catalog, DEFAULT_SELECTED)
    }

    /// Store over `catalog` with a custom default selection (clamped).
    pub fn with_default(catalog: BackgroundCatalog, default_selected: usize) -> Self {
        let default_selected =
            catalog.clamp_index(i64::try_from(default_selected).unwrap_or(i64::MAX));
        Self {
            catalog,
            config: Configuration::with_selected(default_selected),
            default_selected,
            state: StoreState::Default,
            saves: 0,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Current catalog index.
    pub fn selected(&self) -> usize {
        self.config.selected
    }

    /// Currently selected background.
    pub fn background(&self) -> &Background {
        // `selected` is clamped on every write and the catalog is never empty.
        &self.catalog.entries()[self.config.selected]
    }

    /// Background catalog.
    pub fn catalog(&self) -> &BackgroundCatalog {
        &self.catalog
    }

    /// Load state.
    pub fn state(&self) -> StoreState {
        self.state
    }

    /// Number of completed save round-trips.
    pub fn saves(&self) -> u64 {
        self.saves
    }

    /// Select a background; out-of-range values are clamped. Returns the stored index.
    pub fn set_selected(&mut self, raw: i64) -> usize {
        self.config.selected = self.catalog.clamp_index(raw);
        self.config.selected
    }

    /// Set one field. `selected` must be numeric and is clamped.
    pub fn set_field(&mut self, key: &str, value: Value) -> CanvasResult<()> {
        if key == "selected" {
            let idx = self.selected_from(&value).ok_or_else(|| {
                CanvasError::validation(format!("selected must be a number, got {value}"))
            })?;
            self.config.selected = idx;
            return Ok(());
        }
        self.config.extra.insert(key.to_string(), value);
        Ok(())
    }

    /// Replace the configuration from a serialized params file.
    ///
    /// On error the store is left untouched.
    pub fn load_json(&mut self, bytes: &[u8]) -> CanvasResult<()> {
        let value: Value = serde_json::from_slice(bytes)?;
        self.adopt(&value)
    }

    /// Apply a host `restore` body.
    pub fn restore(&mut self, restored: Option<&Value>) -> RestoreOutcome {
        let Some(value) = restored else {
            return RestoreOutcome::Fresh;
        };
        match self.adopt(value) {
            Ok(()) => RestoreOutcome::Adopted,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unusable restore payload");
                RestoreOutcome::Rejected
            }
        }
    }

    /// Replace the configuration wholesale from untrusted JSON.
    ///
    /// The value must be an object. `selected` is clamped into the catalog; when it is missing or
    /// not a number the default selection is used.
    pub fn adopt(&mut self, value: &Value) -> CanvasResult<()> {
        let obj = value
            .as_object()
            .ok_or_else(|| CanvasError::validation("configuration must be a JSON object"))?;

        let mut extra = obj.clone();
        let selected = match extra.remove("selected") {
            Some(raw) => self.selected_from(&raw).unwrap_or_else(|| {
                tracing::warn!(%raw, "non-numeric selected; using default");
                self.default_selected
            }),
            None => self.default_selected,
        };

        self.config = Configuration { selected, extra };
        self.state = StoreState::Loaded;
        tracing::debug!(selected, "configuration adopted");
        Ok(())
    }

    /// Attributes derived from the current configuration.
    pub fn attributes(&self) -> AttributeList {
        vec![Attribute {
            trait_type: "Background".to_string(),
            value: self.background().name.clone(),
        }]
    }

    /// Record a completed save round-trip.
    pub fn mark_saved(&mut self) {
        self.saves += 1;
    }

    fn selected_from(&self, raw: &Value) -> Option<usize> {
        let Value::Number(n) = raw else {
            return None;
        };
        let idx = if let Some(i) = n.as_i64() {
            i
        } else if n.as_u64().is_some() {
            i64::MAX
        } else {
            let f = n.as_f64()?;
            if !f.is_finite() {
                return None;
            }
            // Saturating float-to-int cast.
            f.floor() as i64
        };
        Some(self.catalog.clamp_index(idx))
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(BackgroundCatalog::template())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/store.rs"]
mod tests;
