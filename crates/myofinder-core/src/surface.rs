//! One loaded image with its viewport, markers, channel mask and renderer.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use image::RgbaImage;
use kurbo::{Point, Size, Vec2};
use tracing::{debug, info};

use crate::channel::ChannelMask;
use crate::config::SurfaceConfig;
use crate::error::{MyofinderError, Result};
use crate::ids::{MarkerId, SurfaceId};
use crate::input::{ClientRect, InputEvent, MouseButton};
use crate::io::image_io::load_raster;
use crate::io::processing::{FiberBatch, NucleiBatch};
use crate::markers::fiber::area_ratio;
use crate::markers::record::to_points;
use crate::markers::{
    Classification, Fiber, FiberRecord, MarkerStore, Nucleus, NucleusRecord,
};
use crate::notify::{MarkerObserver, MarkerSnapshot, NotificationBridge};
use crate::render::{FrameInputs, LayerVisibility, RasterPaint, ViewportRenderer};
use crate::transform::TransformEngine;

/// What a routed input event did to the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EventOutcome {
    Ignored,
    DragStarted,
    Panned,
    DragEnded,
    Zoomed,
    NucleusAdded(Nucleus),
}

pub struct Surface {
    id: SurfaceId,
    name: String,
    source: Option<PathBuf>,
    raster: RgbaImage,
    paint: RasterPaint,
    client_rect: ClientRect,
    engine: TransformEngine,
    markers: MarkerStore,
    mask: ChannelMask,
    renderer: ViewportRenderer,
    bridge: NotificationBridge,
}

impl Surface {
    /// Build a surface around a decoded raster, fitted to a `viewport`-sized frame.
    pub fn new(
        id: SurfaceId,
        name: impl Into<String>,
        raster: RgbaImage,
        viewport: SurfaceConfig,
    ) -> Result<Self> {
        let (width, height) = raster.dimensions();
        let paint = RasterPaint::from_rgba(&raster)?;
        let renderer = ViewportRenderer::new(viewport.width, viewport.height)?;

        let surface_size = Size::new(f64::from(viewport.width), f64::from(viewport.height));
        let content_size = Size::new(f64::from(width), f64::from(height));
        let engine = TransformEngine::new(surface_size, content_size);
        let name = name.into();

        info!(
            id = %id,
            name = %name,
            image = ?(width, height),
            scale = engine.scale(),
            "Surface created"
        );

        Ok(Self {
            id,
            name,
            source: None,
            raster,
            paint,
            client_rect: ClientRect::unscaled(surface_size),
            engine,
            markers: MarkerStore::new(),
            mask: ChannelMask::new(),
            renderer,
            bridge: NotificationBridge::new(),
        })
    }

    /// Decode `path` and build a surface from it. Nothing is created if decoding fails.
    pub fn open(id: SurfaceId, path: &Path, viewport: SurfaceConfig) -> Result<Self> {
        let raster = load_raster(path)?;
        let name = display_name(path);
        Ok(Self::new(id, name, raster, viewport)?.with_source(path.to_path_buf()))
    }

    pub fn with_source(mut self, source: PathBuf) -> Self {
        self.source = Some(source);
        self
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// File the image was decoded from, if known.
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    pub fn engine(&self) -> &TransformEngine {
        &self.engine
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn channel_mask(&self) -> ChannelMask {
        self.mask
    }

    pub fn visibility(&self) -> LayerVisibility {
        self.renderer.visibility()
    }

    /// The last rendered frame.
    pub fn frame(&self) -> &RgbaImage {
        self.renderer.frame()
    }

    pub fn frames_rendered(&self) -> u64 {
        self.renderer.frames_rendered()
    }

    pub fn client_rect(&self) -> ClientRect {
        self.client_rect
    }

    /// Where the surface currently sits on screen; used to map client coordinates.
    pub fn set_client_rect(&mut self, rect: ClientRect) {
        self.client_rect = rect;
    }

    pub fn subscribe(&mut self, observer: impl MarkerObserver + 'static) {
        self.bridge.subscribe(observer);
    }

    pub fn snapshot(&self) -> MarkerSnapshot {
        MarkerSnapshot::from(self.markers.stats())
    }

    pub fn render(&mut self) {
        self.renderer.render(FrameInputs {
            raster: &self.paint,
            view: self.engine.transform(),
            mask: &self.mask,
            markers: &self.markers,
        });
    }

    pub fn clear(&mut self) {
        self.renderer.clear();
    }

    // -- view -------------------------------------------------------------

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.engine.pan(dx, dy);
        self.render();
    }

    pub fn zoom_at(&mut self, cursor: Point, wheel_delta: f64) {
        self.engine.zoom_at(cursor, wheel_delta);
        self.render();
    }

    pub fn set_view(&mut self, scale: f64, pan: Vec2) {
        self.engine.set_view(scale, pan);
        self.render();
    }

    pub fn fit_to_view(&mut self) {
        let (surface, content) = (self.engine.surface_size(), self.engine.content_size());
        self.engine.fit_to_view(surface, content);
        self.render();
    }

    /// Takes effect on the next render.
    pub fn set_channels(&mut self, red: bool, green: bool, blue: bool) {
        self.mask.set_channels(red, green, blue);
    }

    /// Takes effect on the next render.
    pub fn show_nuclei(&mut self, show: bool) {
        self.renderer.show_nuclei(show);
    }

    /// Takes effect on the next render.
    pub fn show_fibers(&mut self, show: bool) {
        self.renderer.show_fibers(show);
    }

    // -- input ------------------------------------------------------------

    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::PointerDown {
                button: MouseButton::Middle,
                client,
            } => {
                self.engine.begin_drag(client);
                EventOutcome::DragStarted
            }
            InputEvent::PointerDown { .. } => EventOutcome::Ignored,
            InputEvent::PointerMove { client } => {
                if self.engine.drag_to(client) {
                    self.render();
                    EventOutcome::Panned
                } else {
                    EventOutcome::Ignored
                }
            }
            InputEvent::PointerUp | InputEvent::PointerLeave => {
                self.engine.end_drag();
                EventOutcome::DragEnded
            }
            InputEvent::Wheel { client, delta_y } => {
                let cursor = self.client_rect.relative(client);
                self.zoom_at(cursor, delta_y);
                EventOutcome::Zoomed
            }
            InputEvent::Click { button, client } => {
                let classification = match button {
                    MouseButton::Primary => Classification::Inside,
                    MouseButton::Secondary => Classification::Outside,
                    _ => return EventOutcome::Ignored,
                };
                let backing = self
                    .client_rect
                    .to_backing(client, self.engine.surface_size());
                let world = self.engine.screen_to_world(backing);
                EventOutcome::NucleusAdded(self.add_nucleus(world.x, world.y, classification))
            }
        }
    }

    // -- markers ----------------------------------------------------------

    pub fn add_nucleus(&mut self, x: f64, y: f64, classification: Classification) -> Nucleus {
        let nucleus = self
            .markers
            .nuclei
            .append(self.id, x, y, classification);
        debug!(surface = %self.id, id = %nucleus.id(), ?classification, "Nucleus added");
        self.markers_changed();
        nucleus
    }

    /// Add a fiber polygon; its ratio is taken against this surface's image size.
    pub fn add_fiber(&mut self, path: Vec<Point>, area: f64) -> MarkerId {
        let ratio = self.fiber_ratio(area);
        let id = self.markers.fibers.append(self.id, path, area, ratio).id();
        debug!(surface = %self.id, id = %id, area, "Fiber added");
        self.markers_changed();
        id
    }

    /// Add every nucleus of `batch`, then render and notify once.
    pub fn add_nuclei_batch(&mut self, batch: &NucleiBatch) {
        for &[x, y] in &batch.nuclei_in {
            self.markers
                .nuclei
                .append(self.id, x, y, Classification::Inside);
        }
        for &[x, y] in &batch.nuclei_out {
            self.markers
                .nuclei
                .append(self.id, x, y, Classification::Outside);
        }
        info!(
            surface = %self.id,
            inside = batch.nuclei_in.len(),
            outside = batch.nuclei_out.len(),
            "Nuclei ingested"
        );
        self.markers_changed();
    }

    /// Add every fiber of `batch` in id order, then render and notify once.
    pub fn add_fibers_batch(&mut self, batch: &FiberBatch) {
        for (_, entry) in batch.ordered() {
            let ratio = self.fiber_ratio(entry.fiber_area);
            self.markers.fibers.append(
                self.id,
                to_points(&entry.fiber_path),
                entry.fiber_area,
                ratio,
            );
        }
        info!(surface = %self.id, fibers = batch.len(), "Fibers ingested");
        self.markers_changed();
    }

    /// Replay persisted nuclei as one batch. Fails without adding anything if
    /// any record carries an unknown type code.
    pub fn load_nucleus_records(&mut self, records: &[NucleusRecord]) -> Result<()> {
        let classified = records
            .iter()
            .map(|r| -> Result<(f64, f64, Classification)> {
                Ok((r.x_pos, r.y_pos, Classification::try_from(r.kind)?))
            })
            .collect::<Result<Vec<_>>>()?;
        for (x, y, classification) in classified {
            self.markers.nuclei.append(self.id, x, y, classification);
        }
        self.markers_changed();
        Ok(())
    }

    /// Replay persisted fibers as one batch.
    pub fn load_fiber_records(&mut self, records: &[FiberRecord]) {
        for record in records {
            let ratio = self.fiber_ratio(record.area);
            self.markers
                .fibers
                .append(self.id, record.points(), record.area, ratio);
        }
        self.markers_changed();
    }

    pub fn remove_nucleus(&mut self, nucleus: &Nucleus) -> Result<()> {
        self.markers.nuclei.remove(nucleus)?;
        self.markers_changed();
        Ok(())
    }

    pub fn remove_fiber(&mut self, fiber: &Fiber) -> Result<()> {
        self.markers.fibers.remove(fiber)?;
        self.markers_changed();
        Ok(())
    }

    pub fn reset_markers(&mut self) {
        self.markers.reset();
        self.markers_changed();
    }

    pub fn nucleus_records(&self) -> Vec<NucleusRecord> {
        self.markers.nucleus_records()
    }

    pub fn fiber_records(&self) -> Vec<FiberRecord> {
        self.markers.fiber_records()
    }

    fn fiber_ratio(&self, area: f64) -> f64 {
        area_ratio(area, self.raster.width(), self.raster.height())
    }

    /// Re-render, then tell observers. Runs after every marker mutation.
    fn markers_changed(&mut self) {
        self.render();
        let snapshot = self.snapshot();
        self.bridge.notify(&snapshot);
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("image", &self.raster.dimensions())
            .field("nuclei", &self.markers.nuclei.len())
            .field("fibers", &self.markers.fibers.len())
            .finish()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Result of polling a [`PendingSurface`].
pub enum LoadState {
    Pending(PendingSurface),
    Ready(Surface),
}

/// A surface whose image is still being decoded on a worker thread.
///
/// Resolves exactly once, to a ready [`Surface`] or to the decode error.
pub struct PendingSurface {
    id: SurfaceId,
    source: PathBuf,
    viewport: SurfaceConfig,
    rx: mpsc::Receiver<Result<RgbaImage>>,
}

impl PendingSurface {
    pub fn spawn(id: SurfaceId, source: PathBuf, viewport: SurfaceConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        let path = source.clone();
        thread::spawn(move || {
            let _ = tx.send(load_raster(&path));
        });
        Self {
            id,
            source,
            viewport,
            rx,
        }
    }

    pub fn id(&self) -> SurfaceId {
        self.id
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Block until decoding settles.
    pub fn wait(self) -> Result<Surface> {
        let raster = self
            .rx
            .recv()
            .map_err(|_| MyofinderError::LoaderDisconnected)??;
        self.finish(raster)
    }

    /// Check for a result without blocking.
    pub fn poll(self) -> Result<LoadState> {
        match self.rx.try_recv() {
            Ok(raster) => Ok(LoadState::Ready(self.finish(raster?)?)),
            Err(mpsc::TryRecvError::Empty) => Ok(LoadState::Pending(self)),
            Err(mpsc::TryRecvError::Disconnected) => Err(MyofinderError::LoaderDisconnected),
        }
    }

    fn finish(self, raster: RgbaImage) -> Result<Surface> {
        let name = display_name(&self.source);
        Ok(Surface::new(self.id, name, raster, self.viewport)?.with_source(self.source))
    }
}
