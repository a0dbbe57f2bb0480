use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::models::Species;

/// Species → portrait image lookup, built once at start-up.
///
/// Only files that exist when the table is built are kept, so callers can
/// fall back to a text-only reply for the rest.
#[derive(Debug, Default)]
pub struct PortraitTable {
    portraits: HashMap<Species, PathBuf>,
}

impl PortraitTable {
    /// File name of a species' portrait inside the asset directory.
    pub fn file_name(species: Species) -> &'static str {
        match species {
            Species::Rabbit => "Rabbit_portrait.png",
            Species::Owl => "Owl_portrait.png",
            Species::Hedgehog => "Hedgehog_portrait.png",
            Species::Monkey => "Monkey_portrait.png",
        }
    }

    /// Scan `dir` for the known portrait files.
    pub fn load(dir: &Path) -> Self {
        let portraits: HashMap<Species, PathBuf> = Species::ALL
            .into_iter()
            .map(|sp| (sp, dir.join(Self::file_name(sp))))
            .filter(|(_, path)| path.is_file())
            .collect();

        log::info!("Loaded {} portraits from {}", portraits.len(), dir.display());
        Self { portraits }
    }

    pub fn get(&self, species: Species) -> Option<&Path> {
        self.portraits.get(&species).map(|p| p.as_path())
    }

    pub fn len(&self) -> usize {
        self.portraits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.portraits.is_empty()
    }
}
