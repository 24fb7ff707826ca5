//! Asset loading: OBJ/MTL models through `tobj`, images through [`TextureSource`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use cgmath::{InnerSpace, Vector3};
use log::{info, warn};

use crate::error::{Result, ViewerError};
use crate::gfx::scene::vertex::TexturedVertex;

/// Decoded RGBA8 pixels, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            width: 1,
            height: 1,
            rgba: rgba.to_vec(),
        }
    }

    /// `cells` x `cells` checkerboard, `cell_size` pixels per cell.
    pub fn checkerboard(cells: u32, cell_size: u32, a: [u8; 4], b: [u8; 4]) -> Self {
        let size = cells * cell_size;
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let even = (x / cell_size + y / cell_size) % 2 == 0;
                rgba.extend_from_slice(if even { &a } else { &b });
            }
        }
        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Filled disc on a transparent square; stands in for missing light icons.
    pub fn disc(size: u32, rgba: [u8; 4]) -> Self {
        let radius = size as f32 / 2.0;
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - radius;
                let dy = y as f32 + 0.5 - radius;
                if dx * dx + dy * dy <= radius * radius {
                    data.extend_from_slice(&rgba);
                } else {
                    data.extend_from_slice(&[0, 0, 0, 0]);
                }
            }
        }
        Self {
            width: size,
            height: size,
            rgba: data,
        }
    }
}

/// Something that can turn an image path into pixels.
pub trait TextureSource {
    fn load_image(&self, path: &Path) -> Result<ImageData>;
}

/// Decodes PNG and JPEG files from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageFileSource;

impl TextureSource for ImageFileSource {
    fn load_image(&self, path: &Path) -> Result<ImageData> {
        let image = image::open(path).map_err(|e| ViewerError::TextureLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        info!("Loaded texture: {} ({}x{})", path.display(), width, height);

        Ok(ImageData {
            width,
            height,
            rgba: rgba.into_raw(),
        })
    }
}

/// Loads `path`, logging and substituting `fallback` on failure.
pub fn load_image_or(
    source: &dyn TextureSource,
    path: &Path,
    fallback: impl FnOnce() -> ImageData,
) -> ImageData {
    match source.load_image(path) {
        Ok(image) => image,
        Err(e) => {
            warn!("{}; using a generated texture", e);
            fallback()
        }
    }
}

/// Model geometry ready for upload, normalized into a unit box at the origin.
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub vertices: Vec<TexturedVertex>,
    pub indices: Vec<u32>,
    pub diffuse_color: [f32; 3],
    /// Diffuse texture file from the material, relative to the texture directory
    pub diffuse_texture: Option<String>,
}

/// Loads an OBJ file, taking materials from `material_path` rather than the
/// file's own `mtllib`.
pub fn load_model(object_path: &Path, material_path: &Path) -> Result<LoadedModel> {
    let file = File::open(object_path).map_err(|_| ViewerError::ModelLoad {
        path: object_path.to_path_buf(),
        source: tobj::LoadError::OpenFileFailed,
    })?;
    let mut reader = BufReader::new(file);
    let material_path = material_path.to_path_buf();

    let model = parse_model(&mut reader, object_path, move |_| {
        tobj::load_mtl(&material_path)
    })?;

    info!(
        "Loaded model {}: {} vertices, {} triangles",
        object_path.display(),
        model.vertices.len(),
        model.indices.len() / 3
    );
    Ok(model)
}

/// Parses OBJ text from `reader`. `origin` only labels errors.
pub fn parse_model<B, ML>(reader: &mut B, origin: &Path, material_loader: ML) -> Result<LoadedModel>
where
    B: BufRead,
    ML: Fn(&Path) -> tobj::MTLLoadResult,
{
    let (models, materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        material_loader,
    )
    .map_err(|source| ViewerError::ModelLoad {
        path: origin.to_path_buf(),
        source,
    })?;

    let materials = materials.unwrap_or_else(|e| {
        warn!("No usable material for {}: {}", origin.display(), e);
        Vec::new()
    });

    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for model in &models {
        let mesh = &model.mesh;
        let base = vertices.len() as u32;
        let count = mesh.positions.len() / 3;
        let has_normals = mesh.normals.len() == mesh.positions.len();
        let normals = if has_normals {
            mesh.normals.clone()
        } else {
            calculate_vertex_normals(&mesh.positions, &mesh.indices)
        };

        for i in 0..count {
            let uv = if mesh.texcoords.len() >= 2 * (i + 1) {
                // OBJ puts the texture origin bottom-left.
                [mesh.texcoords[2 * i], 1.0 - mesh.texcoords[2 * i + 1]]
            } else {
                [0.0, 0.0]
            };
            vertices.push(TexturedVertex {
                position: [
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                ],
                normal: [normals[3 * i], normals[3 * i + 1], normals[3 * i + 2]],
                uv,
            });
        }
        indices.extend(mesh.indices.iter().map(|&index| base + index));
    }

    if indices.is_empty() {
        return Err(ViewerError::EmptyModel(origin.to_path_buf()));
    }

    normalize_to_unit_box(&mut vertices);

    let material = models
        .iter()
        .find_map(|model| model.mesh.material_id)
        .and_then(|id| materials.get(id))
        .or_else(|| materials.first());

    Ok(LoadedModel {
        vertices,
        indices,
        diffuse_color: material
            .and_then(|m| m.diffuse)
            .unwrap_or([1.0, 1.0, 1.0]),
        diffuse_texture: material
            .and_then(|m| m.diffuse_texture.clone())
            .filter(|name| !name.is_empty()),
    })
}

/// Smooth normals from area-weighted face normals.
pub fn calculate_vertex_normals(positions: &[f32], indices: &[u32]) -> Vec<f32> {
    let vertex_count = positions.len() / 3;
    let mut accumulated = vec![Vector3::new(0.0f32, 0.0, 0.0); vertex_count];
    let position = |i: usize| Vector3::new(positions[3 * i], positions[3 * i + 1], positions[3 * i + 2]);

    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= vertex_count || b >= vertex_count || c >= vertex_count {
            continue;
        }
        let face = (position(b) - position(a)).cross(position(c) - position(a));
        accumulated[a] += face;
        accumulated[b] += face;
        accumulated[c] += face;
    }

    accumulated
        .into_iter()
        .flat_map(|n| {
            let n = if n.magnitude2() > 0.0 {
                n.normalize()
            } else {
                Vector3::unit_y()
            };
            [n.x, n.y, n.z]
        })
        .collect()
}

/// Centres the bounding box on the origin and scales its largest side to 1.
pub fn normalize_to_unit_box(vertices: &mut [TexturedVertex]) {
    let Some(first) = vertices.first() else {
        return;
    };
    let mut min = first.position;
    let mut max = first.position;
    for vertex in vertices.iter() {
        for axis in 0..3 {
            min[axis] = min[axis].min(vertex.position[axis]);
            max[axis] = max[axis].max(vertex.position[axis]);
        }
    }

    let extent = (0..3).map(|axis| max[axis] - min[axis]).fold(0.0f32, f32::max);
    let scale = if extent > 0.0 { 1.0 / extent } else { 1.0 };
    let center = [
        (min[0] + max[0]) / 2.0,
        (min[1] + max[1]) / 2.0,
        (min[2] + max[2]) / 2.0,
    ];

    for vertex in vertices.iter_mut() {
        for axis in 0..3 {
            vertex.position[axis] = (vertex.position[axis] - center[axis]) * scale;
        }
    }
}

/// Joins a material texture name onto the texture directory.
pub fn texture_path(texture_dir: &Path, name: &str) -> PathBuf {
    texture_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const TRIANGLE_OBJ: &str = "\
v 0.0 0.0 0.0
v 4.0 0.0 0.0
v 0.0 2.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
f 1/1 2/2 3/3
";

    fn no_materials(_: &Path) -> tobj::MTLLoadResult {
        Err(tobj::LoadError::OpenFileFailed)
    }

    #[test]
    fn test_parse_triangle_normalizes_and_computes_normals() {
        let mut reader = Cursor::new(TRIANGLE_OBJ);
        let model = parse_model(&mut reader, Path::new("triangle.obj"), no_materials).unwrap();

        assert_eq!(model.vertices.len(), 3);
        assert_eq!(model.indices, vec![0, 1, 2]);
        assert_eq!(model.diffuse_texture, None);

        // 4 x 2 box scaled to 1 x 0.5 and centred.
        assert_eq!(model.vertices[0].position, [-0.5, -0.25, 0.0]);
        assert_eq!(model.vertices[1].position, [0.5, -0.25, 0.0]);
        assert_eq!(model.vertices[2].position, [-0.5, 0.25, 0.0]);

        for vertex in &model.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
        }
        // V flipped to a top-left origin.
        assert_eq!(model.vertices[0].uv, [0.0, 1.0]);
        assert_eq!(model.vertices[2].uv, [0.0, 0.0]);
    }

    #[test]
    fn test_empty_obj_is_rejected() {
        let mut reader = Cursor::new("# nothing here\n");
        let result = parse_model(&mut reader, Path::new("empty.obj"), no_materials);
        assert!(matches!(result, Err(ViewerError::EmptyModel(_))));
    }

    #[test]
    fn test_missing_model_file() {
        let result = load_model(Path::new("/nonexistent/model.obj"), Path::new("model.mtl"));
        assert!(matches!(result, Err(ViewerError::ModelLoad { .. })));
    }

    #[test]
    fn test_checkerboard_and_disc() {
        let board = ImageData::checkerboard(2, 2, [255; 4], [0, 0, 0, 255]);
        assert_eq!((board.width, board.height), (4, 4));
        assert_eq!(board.rgba.len(), 64);
        assert_eq!(&board.rgba[0..4], &[255; 4]);
        assert_eq!(&board.rgba[8..12], &[0, 0, 0, 255]);

        let disc = ImageData::disc(8, [255; 4]);
        let alpha = |x: u32, y: u32| disc.rgba[((y * 8 + x) * 4 + 3) as usize];
        assert_eq!(alpha(4, 4), 255);
        assert_eq!(alpha(0, 0), 0);
    }

    #[test]
    fn test_missing_image_falls_back() {
        let image = load_image_or(&ImageFileSource, Path::new("/nonexistent/icon.png"), || {
            ImageData::solid([1, 2, 3, 4])
        });
        assert_eq!(image, ImageData::solid([1, 2, 3, 4]));
    }
}
