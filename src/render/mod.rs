//! Render module - key tile generation from icons, fonts and labels

mod assets;
mod glyph;

pub use assets::AssetStore;
pub use glyph::{
    label_line, list_lines, list_window, render_icon_label, render_list, scaled_key_image,
    KeyImage, KeyShape, TextLine, DIMMED, PRIMARY, REFERENCE_SIZE,
};

use std::path::PathBuf;
use thiserror::Error;

use crate::core::state::ItemList;
use crate::keys::style::KeyStyle;

/// Errors while producing a key tile
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to read asset {path:?}: {source}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode icon {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("{path:?} is not a usable font")]
    Font { path: PathBuf },
    #[error("cannot render an empty item list")]
    NoItems,
}

/// Produces the tile for one resolved key style
pub trait TileRenderer: Send {
    fn render(
        &mut self,
        shape: KeyShape,
        style: &KeyStyle,
        items: &ItemList,
    ) -> Result<KeyImage, RenderError>;
}

/// Renders tiles from files under the asset root
pub struct GlyphRenderer {
    assets: AssetStore,
    /// Font size in points on a 64px reference tile
    font_size: f32,
}

impl GlyphRenderer {
    pub fn new(assets: AssetStore, font_size: f32) -> Self {
        Self { assets, font_size }
    }
}

impl TileRenderer for GlyphRenderer {
    fn render(
        &mut self,
        shape: KeyShape,
        style: &KeyStyle,
        items: &ItemList,
    ) -> Result<KeyImage, RenderError> {
        let font = self.assets.font(&style.font)?;
        match style.icon {
            Some(icon_ref) => {
                let icon = self.assets.icon(icon_ref)?;
                Ok(render_icon_label(
                    shape,
                    &icon,
                    font.as_ref(),
                    self.font_size,
                    &style.label,
                ))
            }
            None => render_list(
                shape,
                font.as_ref(),
                self.font_size,
                items.items(),
                items.selected(),
            ),
        }
    }
}
