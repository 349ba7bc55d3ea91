//! Routes input to the active surface and fans display settings out to all surfaces.

use std::path::{Path, PathBuf};

use image::RgbaImage;
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::error::{MyofinderError, Result};
use crate::ids::{IdGenerator, SurfaceId};
use crate::input::InputEvent;
use crate::io::csv::SummaryRow;
use crate::io::image_io::load_raster;
use crate::io::processing::ProcessingResult;
use crate::io::project::{Project, ProjectImage};
use crate::surface::{EventOutcome, PendingSurface, Surface};

pub struct Workspace {
    config: ViewerConfig,
    ids: IdGenerator,
    surfaces: Vec<Surface>,
    active: Option<SurfaceId>,
}

impl Workspace {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            ids: IdGenerator::new(),
            surfaces: Vec::new(),
            active: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Surfaces in the order they were added.
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter()
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.iter().find(|s| s.id() == id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Option<&mut Surface> {
        self.surfaces.iter_mut().find(|s| s.id() == id)
    }

    pub fn active_id(&self) -> Option<SurfaceId> {
        self.active
    }

    pub fn active(&self) -> Option<&Surface> {
        self.active.and_then(|id| self.surface(id))
    }

    pub fn active_mut(&mut self) -> Option<&mut Surface> {
        let id = self.active?;
        self.surface_mut(id)
    }

    /// Create a surface from an already decoded raster.
    pub fn add_raster(&mut self, name: impl Into<String>, raster: RgbaImage) -> Result<SurfaceId> {
        let id = self.ids.next_surface();
        let surface = Surface::new(id, name, raster, self.config.surface)?;
        self.attach(surface)
    }

    /// Decode `path` and add it as a new surface.
    pub fn open(&mut self, path: &Path) -> Result<SurfaceId> {
        let id = self.ids.next_surface();
        let surface = Surface::open(id, path, self.config.surface)?;
        self.attach(surface)
    }

    /// Start decoding `path` in the background. Pass the resolved surface to
    /// [`attach`](Self::attach).
    pub fn begin_open(&mut self, path: PathBuf) -> PendingSurface {
        PendingSurface::spawn(self.ids.next_surface(), path, self.config.surface)
    }

    /// Take ownership of a ready surface. The first surface becomes active.
    pub fn attach(&mut self, mut surface: Surface) -> Result<SurfaceId> {
        let id = surface.id();
        if self.surface(id).is_some() {
            return Err(MyofinderError::DuplicateSurface(id));
        }
        self.ids.reserve(id);

        let channels = self.config.channels;
        surface.set_channels(channels.red, channels.green, channels.blue);
        surface.show_nuclei(self.config.display.show_nuclei);
        surface.show_fibers(self.config.display.show_fibers);

        self.surfaces.push(surface);
        if self.active.is_none() {
            self.active = Some(id);
            self.render_active();
        }
        Ok(id)
    }

    /// Make `id` the surface that receives input; the previous one is blanked.
    pub fn select(&mut self, id: SurfaceId) -> Result<()> {
        if self.surface(id).is_none() {
            return Err(MyofinderError::SurfaceNotFound(id));
        }
        if let Some(previous) = self.active_mut() {
            previous.clear();
        }
        self.active = Some(id);
        self.render_active();
        Ok(())
    }

    /// Drop a surface. If it was active, the first remaining surface takes over.
    pub fn remove(&mut self, id: SurfaceId) -> Result<Surface> {
        let index = self
            .surfaces
            .iter()
            .position(|s| s.id() == id)
            .ok_or(MyofinderError::SurfaceNotFound(id))?;
        let removed = self.surfaces.remove(index);
        if self.active == Some(id) {
            self.active = self.surfaces.first().map(Surface::id);
            self.render_active();
        }
        Ok(removed)
    }

    /// Forward an input event to the active surface, if there is one.
    pub fn route(&mut self, event: InputEvent) -> Option<EventOutcome> {
        self.active_mut().map(|s| s.handle_event(event))
    }

    pub fn set_channels(&mut self, red: bool, green: bool, blue: bool) {
        self.config.channels.red = red;
        self.config.channels.green = green;
        self.config.channels.blue = blue;
        for surface in &mut self.surfaces {
            surface.set_channels(red, green, blue);
        }
        self.render_active();
    }

    pub fn show_nuclei(&mut self, show: bool) {
        self.config.display.show_nuclei = show;
        for surface in &mut self.surfaces {
            surface.show_nuclei(show);
        }
        self.render_active();
    }

    pub fn show_fibers(&mut self, show: bool) {
        self.config.display.show_fibers = show;
        for surface in &mut self.surfaces {
            surface.show_fibers(show);
        }
        self.render_active();
    }

    /// Apply a segmentation result to the surfaces it names. Returns how many
    /// surfaces were updated; entries for unknown surfaces are skipped.
    pub fn ingest_result(&mut self, result: &ProcessingResult) -> usize {
        let mut applied = 0;
        for (key, layer) in result.layers() {
            let Some(surface) = key
                .parse::<u64>()
                .ok()
                .and_then(|id| self.surface_mut(SurfaceId(id)))
            else {
                warn!(layer = key, "No surface for processing result, skipped");
                continue;
            };
            surface.add_nuclei_batch(&layer.nuclei);
            surface.add_fibers_batch(&layer.fibers);
            applied += 1;
        }
        info!(applied, "Processing result ingested");
        applied
    }

    pub fn summary(&self) -> Vec<SummaryRow> {
        self.surfaces.iter().map(SummaryRow::from_surface).collect()
    }

    /// Collect every surface and its markers into a project document.
    pub fn to_project(&self, title: impl Into<String>) -> Result<Project> {
        let mut project = Project::new(title);
        for surface in &self.surfaces {
            let image_path = surface.source().ok_or_else(|| {
                MyofinderError::InvalidProject(format!(
                    "image '{}' was not loaded from a file",
                    surface.name()
                ))
            })?;
            project.data.insert(
                surface.id().to_string(),
                ProjectImage {
                    name_image: surface.name().to_string(),
                    image_path: image_path.to_path_buf(),
                    fiber_data: surface.fiber_records(),
                    nuclei_data: surface.nucleus_records(),
                },
            );
        }
        Ok(project)
    }

    /// Rebuild a workspace from a project, decoding every image.
    ///
    /// Relative image paths are resolved against `base_dir`, and surfaces keep
    /// the resolved path so a later save does not depend on `base_dir`.
    pub fn from_project(project: &Project, base_dir: &Path, config: ViewerConfig) -> Result<Self> {
        let viewport = config.surface;
        let mut workspace = Self::new(config);
        for (key, image) in project.images() {
            let id = key.parse::<u64>().map(SurfaceId).map_err(|_| {
                MyofinderError::InvalidProject(format!("image key '{key}' is not an id"))
            })?;
            let path = base_dir.join(&image.image_path);
            let raster = load_raster(&path)?;
            let mut surface =
                Surface::new(id, image.name_image.clone(), raster, viewport)?.with_source(path);
            surface.load_nucleus_records(&image.nuclei_data)?;
            surface.load_fiber_records(&image.fiber_data);
            workspace.attach(surface)?;
        }
        info!(title = %project.title, images = workspace.len(), "Project opened");
        Ok(workspace)
    }

    fn render_active(&mut self) {
        if let Some(surface) = self.active_mut() {
            surface.render();
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(ViewerConfig::default())
    }
}
