use crate::foundation::error::{CanvasError, CanvasResult};

/// One selectable background.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Background {
    /// Image path relative to the template root.
    pub path: String,
    /// Display name, also used as the attribute value.
    pub name: String,
}

/// Fixed, ordered catalog of backgrounds; `Configuration::selected` indexes into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BackgroundCatalog {
    entries: Vec<Background>,
}

const TEMPLATE_BACKGROUNDS: [(&str, &str); 12] = [
    ("./textured/textured-0.png", "Horizon Sunset"),
    ("./textured/textured-1.png", "Horizon Dusk"),
    ("./textured/textured-2.png", "Sandstorm"),
    ("./textured/textured-3.png", "Sunrise"),
    ("./cityscape/cityscape-0.png", "Red Cityscape"),
    ("./cityscape/cityscape-1.png", "Desert Cityscape"),
    ("./cityscape/cityscape-2.png", "Wired Cityscape"),
    ("./cityscape/cityscape-3.png", "Blue Sunrise Cityscape"),
    ("./waterfall/waterfall-0.png", "Waterfall from Above"),
    ("./waterfall/waterfall-1.png", "Waterfall from Heavens"),
    ("./waterfall/waterfall-2.png", "Waterfall of Light"),
    ("./waterfall/waterfall-3.png", "Waterfall into Glowing Pool"),
];

impl BackgroundCatalog {
    /// Build a catalog; it must not be empty.
    pub fn new(entries: Vec<Background>) -> CanvasResult<Self> {
        if entries.is_empty() {
            return Err(CanvasError::validation(
                "background catalog must not be empty",
            ));
        }
        Ok(Self { entries })
    }

    /// The twelve backgrounds shipped with the template.
    pub fn template() -> Self {
        Self {
            entries: TEMPLATE_BACKGROUNDS
                .iter()
                .map(|(path, name)| Background {
                    path: (*path).to_string(),
                    name: (*name).to_string(),
                })
                .collect(),
        }
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Background> {
        self.entries.get(index)
    }

    /// All entries in catalog order.
    pub fn entries(&self) -> &[Background] {
        &self.entries
    }

    /// Clamp any integer into `[0, len)`.
    pub fn clamp_index(&self, raw: i64) -> usize {
        let max = (self.entries.len() - 1) as i64;
        raw.clamp(0, max) as usize
    }
}

impl Default for BackgroundCatalog {
    fn default() -> Self {
        Self::template()
    }
}
