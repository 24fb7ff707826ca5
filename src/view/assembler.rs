//! # Stage Assembly
//!
//! [`ViewAssembler`] turns meshes, loaded models and images into
//! [`Drawable`]s. [`StageScene`] owns those drawables together with the
//! spin animations and the touch registry, and is the [`ViewerHost`] the
//! interaction controller drives.
//!
//! The GPU-free part of the scene lives in [`StageState`] so layout, hit
//! testing and animation bookkeeping can be exercised without a device.

use std::rc::Rc;
use std::sync::Arc;

use cgmath::{Quaternion, Vector2, Vector3};
use log::{info, warn};

use super::loader::{self, ImageData, LoadedModel, TextureSource};
use crate::animation::{AnimationControl, AnimationHandle, SpinAnimation, SpinAnimator};
use crate::catalog::{ModelAsset, ShadingMode};
use crate::config::{BackdropConfig, ModelSlot, ViewerConfig};
use crate::gfx::geometry::{build_cuboid, Mesh};
use crate::gfx::rendering::{DrawBatch, BACKDROP_PIPELINE, MODEL_PIPELINE, OVERLAY_PIPELINE};
use crate::gfx::resources::TextureResource;
use crate::gfx::scene::drawable::{DrawLayouts, Drawable, GpuMesh, Transform, SHADING_UNLIT};
use crate::interaction::{EntityId, EntityRegistry, EntityTag, ScreenRect, ViewerHost};

const WHITE: [u8; 4] = [255, 255, 255, 255];

/// Backdrop cube: `width_scale * min(w, h)` on each side, bottom edge on the
/// stage bottom, pushed `depth` toward the viewer.
pub fn backdrop_transform(stage_extent: Vector2<f32>, backdrop: &BackdropConfig) -> Transform {
    let side = backdrop.width_scale * stage_extent.x.min(stage_extent.y);
    Transform {
        center: Vector3::new(stage_extent.x / 2.0, stage_extent.y - side / 2.0, backdrop.depth),
        scale: Vector3::new(side, side, side),
        ..Default::default()
    }
}

/// Unit-box model fitted into the slot's shorter side.
pub fn slot_transform(slot: &ModelSlot, stage_extent: Vector2<f32>) -> Transform {
    let size = slot.size(stage_extent);
    let side = size.x.min(size.y);
    let center = slot.center(stage_extent);
    Transform {
        center: Vector3::new(center.x, center.y, 0.0),
        scale: Vector3::new(side, side, side),
        ..Default::default()
    }
}

/// Edge of the square light proxy.
pub fn light_proxy_size(stage_extent: Vector2<f32>, light_scale: f32) -> f32 {
    light_scale * stage_extent.x.min(stage_extent.y)
}

/// Stage bookkeeping that does not need a GPU.
pub struct StageState {
    stage_extent: Vector2<f32>,
    slots: Vec<ModelSlot>,
    light_scale: f32,
    animator: SpinAnimator,
    animations: Vec<AnimationHandle>,
    registry: EntityRegistry,
    slot_entities: Vec<EntityId>,
    light_entity: EntityId,
    light_position: Vector3<f32>,
    proxy_position: Vector2<f32>,
    proxy_visible: bool,
    proxy_front: bool,
}

impl StageState {
    /// One paused spin and one touch target per configured slot, with the
    /// light proxy registered on top.
    pub fn new(config: &ViewerConfig, stage_extent: Vector2<f32>) -> Self {
        let mut animator = SpinAnimator::new();
        let animations: Vec<AnimationHandle> = (0..config.model_slots.len())
            .map(|slot| {
                animator.spawn(SpinAnimation::new(
                    config.spin_period,
                    ViewerConfig::spin_direction(slot),
                ))
            })
            .collect();

        let mut registry = EntityRegistry::new();
        registry.register(EntityTag::Other, None);
        let slot_entities = config
            .model_slots
            .iter()
            .enumerate()
            .map(|(slot, layout)| {
                registry.register(
                    EntityTag::Model { slot },
                    Some(ScreenRect::from_origin_size(
                        layout.origin(stage_extent),
                        layout.size(stage_extent),
                    )),
                )
            })
            .collect();
        let light_entity = registry.register(EntityTag::LightProxy, None);
        registry.set_visible(light_entity, false);

        let mut state = Self {
            stage_extent,
            slots: config.model_slots.clone(),
            light_scale: config.light_scale,
            animator,
            animations,
            registry,
            slot_entities,
            light_entity,
            light_position: Vector3::new(0.0, 0.0, 0.0),
            proxy_position: Vector2::new(0.0, 0.0),
            proxy_visible: false,
            proxy_front: true,
        };
        state.update_proxy_bounds();
        state
    }

    pub fn stage_extent(&self) -> Vector2<f32> {
        self.stage_extent
    }

    pub fn slots(&self) -> &[ModelSlot] {
        &self.slots
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Animation handles in slot order.
    pub fn animations(&self) -> &[AnimationHandle] {
        &self.animations
    }

    pub fn classify(&self, point: Vector2<f32>) -> EntityTag {
        self.registry.classify(point)
    }

    pub fn resize(&mut self, stage_extent: Vector2<f32>) {
        self.stage_extent = stage_extent;
        for (slot, &id) in self.slots.iter().zip(&self.slot_entities) {
            self.registry.set_bounds(
                id,
                ScreenRect::from_origin_size(slot.origin(stage_extent), slot.size(stage_extent)),
            );
        }
        self.update_proxy_bounds();
    }

    pub fn tick(&mut self, delta_time: f32) {
        self.animator.tick(delta_time);
    }

    pub fn model_orientation(&self, slot: usize) -> Quaternion<f32> {
        self.animations
            .get(slot)
            .map_or(Quaternion::new(1.0, 0.0, 0.0, 0.0), |&handle| {
                self.animator.orientation(handle)
            })
    }

    pub fn set_model_orientation(&mut self, slot: usize, orientation: Quaternion<f32>) {
        if let Some(&handle) = self.animations.get(slot) {
            self.animator.set_orientation(handle, orientation);
        }
    }

    pub fn light_position(&self) -> Vector3<f32> {
        self.light_position
    }

    pub fn set_light_position(&mut self, position: Vector3<f32>) {
        self.light_position = position;
    }

    pub fn proxy_position(&self) -> Vector2<f32> {
        self.proxy_position
    }

    pub fn set_proxy_position(&mut self, screen_pos: Vector2<f32>) {
        self.proxy_position = screen_pos;
        self.update_proxy_bounds();
    }

    pub fn proxy_visible(&self) -> bool {
        self.proxy_visible
    }

    /// A hidden proxy cannot be touched.
    pub fn set_proxy_visible(&mut self, visible: bool) {
        self.proxy_visible = visible;
        self.registry.set_visible(self.light_entity, visible);
    }

    pub fn proxy_front(&self) -> bool {
        self.proxy_front
    }

    pub fn set_proxy_front(&mut self, front: bool) {
        self.proxy_front = front;
    }

    pub fn proxy_size(&self) -> f32 {
        light_proxy_size(self.stage_extent, self.light_scale)
    }

    fn update_proxy_bounds(&mut self) {
        let size = self.proxy_size();
        self.registry.set_bounds(
            self.light_entity,
            ScreenRect::from_center_size(self.proxy_position, Vector2::new(size, size)),
        );
    }
}

impl AnimationControl for StageState {
    fn play(&mut self, handle: AnimationHandle) {
        self.animator.play(handle);
    }

    fn pause(&mut self, handle: AnimationHandle) {
        self.animator.pause(handle);
    }

    fn is_playing(&self, handle: AnimationHandle) -> bool {
        self.animator.is_playing(handle)
    }
}

/// Builds drawables on one device.
pub struct ViewAssembler {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    layouts: DrawLayouts,
}

impl ViewAssembler {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>, layouts: DrawLayouts) -> Self {
        Self {
            device,
            queue,
            layouts,
        }
    }

    pub fn texture(&self, image: &ImageData, label: &str) -> TextureResource {
        TextureResource::create_from_rgba_data(
            &self.device,
            &self.queue,
            &image.rgba,
            image.width,
            image.height,
            label,
        )
    }

    /// Drawable for a generated mesh.
    pub fn mesh_drawable(&self, mesh: &Mesh, texture: &TextureResource, label: &str) -> Drawable {
        let gpu_mesh = Rc::new(GpuMesh::from_mesh(&self.device, mesh, label));
        Drawable::new(&self.device, &self.layouts, gpu_mesh, texture, label)
    }

    /// `count` drawables sharing one upload of `model`.
    pub fn model_drawables(
        &self,
        model: &LoadedModel,
        texture: &TextureResource,
        count: usize,
        label: &str,
    ) -> Vec<Drawable> {
        let gpu_mesh = Rc::new(GpuMesh::from_indexed(
            &self.device,
            &model.vertices,
            &model.indices,
            label,
        ));
        (0..count)
            .map(|slot| {
                Drawable::new(
                    &self.device,
                    &self.layouts,
                    gpu_mesh.clone(),
                    texture,
                    &format!("{} {}", label, slot),
                )
            })
            .collect()
    }

    pub fn set_texture(&self, drawable: &mut Drawable, texture: &TextureResource) {
        drawable.set_texture(&self.device, &self.layouts, texture);
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}

/// Everything drawn on the stage.
pub struct StageScene {
    state: StageState,
    assembler: ViewAssembler,
    textures: Box<dyn TextureSource>,
    config: ViewerConfig,
    backdrop: Drawable,
    models: Vec<Drawable>,
    light_proxy: Drawable,
    light_front: TextureResource,
    light_back: TextureResource,
}

impl StageScene {
    /// Builds the backdrop and the light proxy. Models arrive through
    /// [`ViewerHost::reload_models`].
    pub fn new(
        config: &ViewerConfig,
        assembler: ViewAssembler,
        textures: Box<dyn TextureSource>,
        stage_extent: Vector2<f32>,
    ) -> Self {
        let state = StageState::new(config, stage_extent);

        let backdrop_image = loader::load_image_or(
            textures.as_ref(),
            &config.image_path(&config.backdrop.texture),
            || ImageData::checkerboard(8, 32, [200, 200, 200, 255], [120, 120, 120, 255]),
        );
        let backdrop_texture = assembler.texture(&backdrop_image, "Backdrop Texture");
        let mut backdrop = assembler.mesh_drawable(
            &build_cuboid(Vector3::new(1.0, 1.0, 1.0), true),
            &backdrop_texture,
            "Backdrop",
        );
        backdrop.shading_mode = SHADING_UNLIT;
        backdrop.color = config.backdrop.color;

        let light_front = load_icon(
            &assembler,
            textures.as_ref(),
            config,
            &config.light_icon_front,
            [255, 240, 160, 255],
        );
        let light_back = load_icon(
            &assembler,
            textures.as_ref(),
            config,
            &config.light_icon_back,
            [120, 120, 160, 255],
        );
        let mut light_proxy = assembler.mesh_drawable(
            &build_cuboid(Vector3::new(1.0, 1.0, 0.0), true),
            &light_front,
            "Light Proxy",
        );
        light_proxy.shading_mode = SHADING_UNLIT;
        light_proxy.visible = false;

        let mut scene = Self {
            state,
            assembler,
            textures,
            config: config.clone(),
            backdrop,
            models: Vec::new(),
            light_proxy,
            light_front,
            light_back,
        };
        scene.sync_transforms();
        scene
    }

    pub fn state(&self) -> &StageState {
        &self.state
    }

    pub fn animations(&self) -> Vec<AnimationHandle> {
        self.state.animations().to_vec()
    }

    pub fn classify(&self, point: Vector2<f32>) -> EntityTag {
        self.state.classify(point)
    }

    pub fn light_position(&self) -> Vector3<f32> {
        self.state.light_position()
    }

    pub fn resize(&mut self, stage_extent: Vector2<f32>) {
        self.state.resize(stage_extent);
        self.sync_transforms();
    }

    /// Advances the spins and uploads every drawable's uniforms.
    pub fn update(&mut self, delta_time: f32) {
        self.state.tick(delta_time);
        self.sync_transforms();

        let queue = self.assembler.queue();
        self.backdrop.prepare(queue);
        for model in self.models.iter_mut() {
            model.prepare(queue);
        }
        self.light_proxy.prepare(queue);
    }

    /// Backdrop, then models, then the light proxy.
    pub fn batches(&self) -> Vec<DrawBatch<'_>> {
        vec![
            DrawBatch {
                pipeline: BACKDROP_PIPELINE,
                drawables: vec![&self.backdrop],
            },
            DrawBatch {
                pipeline: MODEL_PIPELINE,
                drawables: self.models.iter().collect(),
            },
            DrawBatch {
                pipeline: OVERLAY_PIPELINE,
                drawables: vec![&self.light_proxy],
            },
        ]
    }

    fn sync_transforms(&mut self) {
        let extent = self.state.stage_extent();
        self.backdrop.transform = backdrop_transform(extent, &self.config.backdrop);

        for (slot, model) in self.models.iter_mut().enumerate() {
            if let Some(layout) = self.state.slots().get(slot) {
                model.transform = Transform {
                    orientation: self.state.model_orientation(slot),
                    ..slot_transform(layout, extent)
                };
            }
        }

        let size = self.state.proxy_size();
        let proxy = self.state.proxy_position();
        self.light_proxy.transform = Transform {
            center: Vector3::new(proxy.x, proxy.y, 0.0),
            scale: Vector3::new(size, size, 1.0),
            ..Default::default()
        };
        self.light_proxy.visible = self.state.proxy_visible();
    }

    fn model_texture(&self, model: &LoadedModel, shading: ShadingMode) -> ImageData {
        if !shading.is_textured() {
            return ImageData::solid(WHITE);
        }
        match &model.diffuse_texture {
            Some(name) => loader::load_image_or(
                self.textures.as_ref(),
                &loader::texture_path(&self.config.image_dir, name),
                || ImageData::checkerboard(8, 8, WHITE, [255, 0, 255, 255]),
            ),
            None => ImageData::solid(WHITE),
        }
    }
}

fn load_icon(
    assembler: &ViewAssembler,
    textures: &dyn TextureSource,
    config: &ViewerConfig,
    file: &str,
    fallback: [u8; 4],
) -> TextureResource {
    let image = loader::load_image_or(textures, &config.image_path(file), || {
        ImageData::disc(64, fallback)
    });
    assembler.texture(&image, file)
}

impl AnimationControl for StageScene {
    fn play(&mut self, handle: AnimationHandle) {
        self.state.play(handle);
    }

    fn pause(&mut self, handle: AnimationHandle) {
        self.state.pause(handle);
    }

    fn is_playing(&self, handle: AnimationHandle) -> bool {
        self.state.is_playing(handle)
    }
}

impl ViewerHost for StageScene {
    fn set_model_orientation(&mut self, slot: usize, orientation: Quaternion<f32>) {
        self.state.set_model_orientation(slot, orientation);
    }

    fn set_light_position(&mut self, position: Vector3<f32>) {
        self.state.set_light_position(position);
    }

    fn set_light_proxy_position(&mut self, screen_pos: Vector2<f32>) {
        self.state.set_proxy_position(screen_pos);
    }

    fn set_light_proxy_visible(&mut self, visible: bool) {
        self.state.set_proxy_visible(visible);
        self.light_proxy.visible = visible;
    }

    fn set_light_proxy_front(&mut self, front: bool) {
        if front == self.state.proxy_front() {
            return;
        }
        self.state.set_proxy_front(front);
        let texture = if front {
            &self.light_front
        } else {
            &self.light_back
        };
        self.assembler.set_texture(&mut self.light_proxy, texture);
    }

    /// A model that fails to load leaves the current drawables in place.
    fn reload_models(&mut self, model: &ModelAsset, shading: ShadingMode) {
        let object_path = self.config.model_path(&model.object_file);
        let material_path = self.config.model_path(&model.material_file);
        let loaded = match loader::load_model(&object_path, &material_path) {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!("Keeping previous model: {}", e);
                return;
            }
        };

        let image = self.model_texture(&loaded, shading);
        let texture = self.assembler.texture(&image, &format!("{} Texture", model.name));
        let color = if shading.is_textured() {
            [1.0, 1.0, 1.0, 1.0]
        } else {
            let [r, g, b] = loaded.diffuse_color;
            [r, g, b, 1.0]
        };

        let mut drawables =
            self.assembler
                .model_drawables(&loaded, &texture, self.state.slot_count(), &model.name);
        for drawable in drawables.iter_mut() {
            drawable.color = color;
            drawable.shading_mode = shading.code();
        }
        self.models = drawables;
        self.sync_transforms();

        info!("Showing {} ({})", model.name, shading);
    }
}
