//! Icon and font loading with a per-process cache

use ab_glyph::FontVec;
use image::DynamicImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use super::RenderError;
use crate::keys::style::IconRef;

/// Loads assets relative to a root directory and keeps them decoded
pub struct AssetStore {
    root: PathBuf,
    icons: HashMap<IconRef, Arc<DynamicImage>>,
    fonts: HashMap<String, Arc<FontVec>>,
}

impl AssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            icons: HashMap::new(),
            fonts: HashMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of an icon
    pub fn icon_path(&self, icon: IconRef) -> PathBuf {
        self.root.join(icon.relative_path())
    }

    /// Decoded icon, loading it on first use
    pub fn icon(&mut self, icon: IconRef) -> Result<Arc<DynamicImage>, RenderError> {
        if let Some(cached) = self.icons.get(&icon) {
            return Ok(Arc::clone(cached));
        }
        let path = self.icon_path(icon);
        let bytes = read(&path)?;
        let decoded = image::load_from_memory(&bytes)
            .map_err(|source| RenderError::Image { path: path.clone(), source })?;
        debug!("Loaded icon {:?} ({}x{})", path, decoded.width(), decoded.height());

        let decoded = Arc::new(decoded);
        self.icons.insert(icon, Arc::clone(&decoded));
        Ok(decoded)
    }

    /// Parsed font, loading it on first use
    pub fn font(&mut self, name: &str) -> Result<Arc<FontVec>, RenderError> {
        if let Some(cached) = self.fonts.get(name) {
            return Ok(Arc::clone(cached));
        }
        let path = self.root.join(name);
        let bytes = read(&path)?;
        let font = FontVec::try_from_vec(bytes).map_err(|_| RenderError::Font { path: path.clone() })?;
        debug!("Loaded font {:?}", path);

        let font = Arc::new(font);
        self.fonts.insert(name.to_string(), Arc::clone(&font));
        Ok(font)
    }
}

fn read(path: &Path) -> Result<Vec<u8>, RenderError> {
    std::fs::read(path).map_err(|source| RenderError::Asset {
        path: path.to_path_buf(),
        source,
    })
}
