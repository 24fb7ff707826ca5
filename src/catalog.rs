//! Model and shading catalogs
//!
//! The viewer cycles through a fixed list of models and a fixed list of
//! shading modes. Both are plain bounded counters; switching never touches
//! per-slot interaction state.

use std::fmt;

/// One loadable model. Paths are opaque and handed to the loader unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAsset {
    pub name: String,
    pub object_file: String,
    pub material_file: String,
}

impl ModelAsset {
    pub fn new(name: &str, object_file: &str, material_file: &str) -> Self {
        Self {
            name: name.to_owned(),
            object_file: object_file.to_owned(),
            material_file: material_file.to_owned(),
        }
    }
}

/// How loaded models are lit and textured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadingMode {
    TexturedWithDetailedSpecular,
    TexturedWithSpecular,
    TexturelessWithDiffuse,
}

impl ShadingMode {
    pub const ALL: [ShadingMode; 3] = [
        ShadingMode::TexturedWithDetailedSpecular,
        ShadingMode::TexturedWithSpecular,
        ShadingMode::TexturelessWithDiffuse,
    ];

    /// Shader-side mode code.
    pub fn code(self) -> u32 {
        match self {
            ShadingMode::TexturedWithDetailedSpecular => 0,
            ShadingMode::TexturedWithSpecular => 1,
            ShadingMode::TexturelessWithDiffuse => 2,
        }
    }

    pub fn is_textured(self) -> bool {
        !matches!(self, ShadingMode::TexturelessWithDiffuse)
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ShadingMode::TexturedWithDetailedSpecular => "Textured, detailed specular",
            ShadingMode::TexturedWithSpecular => "Textured, specular",
            ShadingMode::TexturelessWithDiffuse => "Textureless, diffuse",
        };
        f.write_str(label)
    }
}

/// An index that wraps around a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CyclicIndex {
    index: usize,
    len: usize,
}

impl CyclicIndex {
    /// Starting index is reduced modulo `len`.
    pub fn new(index: usize, len: usize) -> Self {
        let index = if len == 0 { 0 } else { index % len };
        Self { index, len }
    }

    pub fn get(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Steps forward, wrapping to zero, and returns the new index.
    pub fn advance(&mut self) -> usize {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
        self.index
    }
}

/// Current model and shading selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelCatalog {
    models: Vec<ModelAsset>,
    model: CyclicIndex,
    shading: CyclicIndex,
}

impl ModelCatalog {
    pub fn new(models: Vec<ModelAsset>, model_index: usize, shading_index: usize) -> Self {
        let model = CyclicIndex::new(model_index, models.len());
        Self {
            models,
            model,
            shading: CyclicIndex::new(shading_index, ShadingMode::ALL.len()),
        }
    }

    pub fn models(&self) -> &[ModelAsset] {
        &self.models
    }

    pub fn model_index(&self) -> usize {
        self.model.get()
    }

    pub fn shading_index(&self) -> usize {
        self.shading.get()
    }

    pub fn current_model(&self) -> Option<&ModelAsset> {
        self.models.get(self.model.get())
    }

    pub fn shading(&self) -> ShadingMode {
        ShadingMode::ALL[self.shading.get()]
    }

    pub fn next_model(&mut self) -> usize {
        self.model.advance()
    }

    pub fn next_shading(&mut self) -> ShadingMode {
        self.shading.advance();
        self.shading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_models() -> Vec<ModelAsset> {
        vec![
            ModelAsset::new("a", "a.obj", "a.mtl"),
            ModelAsset::new("b", "b.obj", "b.mtl"),
            ModelAsset::new("c", "c.obj", "c.mtl"),
        ]
    }

    #[test]
    fn test_cycle_wraps_to_zero() {
        let mut catalog = ModelCatalog::new(three_models(), 2, 0);
        assert_eq!(catalog.model_index(), 2);
        assert_eq!(catalog.next_model(), 0);
        assert_eq!(catalog.current_model().map(|m| m.name.as_str()), Some("a"));
    }

    #[test]
    fn test_shading_cycle() {
        let mut catalog = ModelCatalog::new(three_models(), 0, 0);
        assert_eq!(catalog.next_shading(), ShadingMode::TexturedWithSpecular);
        assert_eq!(catalog.next_shading(), ShadingMode::TexturelessWithDiffuse);
        assert_eq!(catalog.next_shading(), ShadingMode::TexturedWithDetailedSpecular);
    }

    #[test]
    fn test_out_of_range_start_is_reduced() {
        let catalog = ModelCatalog::new(three_models(), 7, 4);
        assert_eq!(catalog.model_index(), 1);
        assert_eq!(catalog.shading_index(), 1);
    }

    #[test]
    fn test_empty_catalog_stays_put() {
        let mut catalog = ModelCatalog::new(Vec::new(), 3, 0);
        assert_eq!(catalog.next_model(), 0);
        assert!(catalog.current_model().is_none());
    }
}
