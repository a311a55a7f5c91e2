use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info};
use velvet_comet::{
    lifecycle::seed_from_env,
    renderer::Renderer,
    scene::{DrawList, Frame, SceneRenderer, Sketch, Viewport},
    sketches,
    window::Window as _,
};
use winit::{event::VirtualKeyCode, window::Window};

/// Most drawables any sketch keeps alive at once, with headroom.
const DRAWABLE_CAPACITY: usize = 4096;

/// The sketches, the drawables they share and which one is running.
struct Stage<R: SceneRenderer> {
    scene: R,
    sketches: Vec<Box<dyn Sketch<R>>>,
    active: usize,
    viewport: Viewport,
    last_time: f32,
    failed: bool,
}

impl<R: SceneRenderer> Stage<R> {
    fn new(scene: R, sketches: Vec<Box<dyn Sketch<R>>>, viewport: Viewport) -> Self {
        Self {
            scene,
            sketches,
            active: 0,
            viewport,
            last_time: 0.,
            failed: false,
        }
    }

    fn sketch(&self) -> &dyn Sketch<R> {
        self.sketches[self.active].as_ref()
    }

    fn load(&mut self, index: usize) -> Result<()> {
        self.active = index;
        self.last_time = 0.;
        self.failed = false;

        let viewport = self.viewport;
        let sketch = self.sketches[self.active].as_mut();
        let name = sketch.name();
        info!("Loading sketch {}", name);
        sketch.on_resize(viewport);
        let loaded = sketch
            .on_load(&mut self.scene)
            .with_context(|| format!("Failed to load sketch {}", name));
        if loaded.is_err() {
            self.failed = true;
        }
        loaded
    }

    fn unload(&mut self) -> Result<()> {
        let sketch = self.sketches[self.active].as_mut();
        let name = sketch.name();
        sketch
            .on_unload(&mut self.scene)
            .with_context(|| format!("Failed to unload sketch {}", name))?;
        info!("Unloaded sketch {}", name);
        Ok(())
    }

    /// Leaves the current sketch in place when it cannot be torn down, so its
    /// leftover drawables never show up under another sketch.
    fn switch_to(&mut self, index: usize) -> Result<bool> {
        if index >= self.sketches.len() || index == self.active {
            return Ok(false);
        }
        if let Err(e) = self.unload() {
            self.failed = true;
            return Err(e.context("Not switching sketches"));
        }
        self.load(index)?;
        Ok(true)
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.sketches[self.active].on_resize(viewport);
    }

    /// Runs one frame of the active sketch. A failed frame stops the sketch.
    fn advance(&mut self, time: f32) {
        if self.failed {
            return;
        }
        let frame = Frame {
            time,
            delta: time - self.last_time,
        };
        self.last_time = time;

        let sketch = self.sketches[self.active].as_mut();
        if let Err(e) = sketch.on_frame(&mut self.scene, frame) {
            error!("Sketch {} stopped: {}", sketch.name(), e);
            self.failed = true;
        }
    }
}

pub struct App {
    window: Window,
    renderer: Renderer,
    stage: Stage<DrawList>,
    loaded_at: Instant,
}

impl App {
    pub async fn new(window: Window) -> Result<Self> {
        let renderer = Renderer::new(&window, DRAWABLE_CAPACITY).await?;
        let stage = Stage::new(
            DrawList::with_capacity(renderer.capacity()),
            sketches::all(seed_from_env()),
            window.viewport(),
        );

        let mut app = Self {
            window,
            renderer,
            stage,
            loaded_at: Instant::now(),
        };
        app.stage.load(0)?;
        app.set_title();

        Ok(app)
    }

    fn set_title(&self) {
        self.window
            .set_title(&format!("velvet-comet: {}", self.stage.sketch().name()));
    }

    /// Tears down the active sketch. Called again on exit.
    pub fn unload(&mut self) -> Result<()> {
        self.stage.unload()
    }

    pub fn switch_to(&mut self, index: usize) {
        match self.stage.switch_to(index) {
            Ok(false) => (),
            Ok(true) => {
                self.loaded_at = Instant::now();
                self.set_title();
            }
            Err(e) => {
                error!("{:#}", e);
                self.set_title();
            }
        }
    }

    pub fn on_resize(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        let viewport = Viewport {
            pixel_ratio: self.window.scale_factor(),
            width: size.width,
            height: size.height,
        };
        self.renderer.resize(viewport.into());
        self.stage.resize(viewport);
    }

    pub fn on_key_up(&mut self, keycode: VirtualKeyCode) {
        let index = match keycode {
            VirtualKeyCode::Key1 => 0,
            VirtualKeyCode::Key2 => 1,
            VirtualKeyCode::Key3 => 2,
            VirtualKeyCode::Key4 => 3,
            VirtualKeyCode::Key5 => 4,
            _ => return,
        };
        self.switch_to(index);
    }

    pub fn render(&mut self) {
        self.stage.advance(self.loaded_at.elapsed().as_secs_f32());

        let sketch = self.stage.sketch();
        let mut camera = sketch.camera();
        camera.aspect_ratio = self.stage.viewport.aspect_ratio();
        let background = sketch.background();

        if let Err(e) = self
            .renderer
            .render(&self.stage.scene, &camera, background)
        {
            error!("{:#}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use velvet_comet::{entity::Camera, Error};

    use super::*;

    /// Registers one drawable on load and fails to release it when asked to.
    struct Sticky {
        handle: Option<<DrawList as SceneRenderer>::Handle>,
        release: bool,
    }

    impl Sketch<DrawList> for Sticky {
        fn name(&self) -> &'static str {
            "sticky"
        }

        fn camera(&self) -> Camera {
            Camera::default()
        }

        fn background(&self) -> Vec3 {
            Vec3::ZERO
        }

        fn on_load(&mut self, scene: &mut DrawList) -> velvet_comet::Result<()> {
            self.handle = Some(scene.register_drawable(&Default::default())?);
            Ok(())
        }

        fn on_frame(&mut self, _scene: &mut DrawList, _frame: Frame) -> velvet_comet::Result<()> {
            Ok(())
        }

        fn on_unload(&mut self, scene: &mut DrawList) -> velvet_comet::Result<()> {
            if !self.release {
                return Err(Error::renderer_unavailable("device lost"));
            }
            match self.handle.take() {
                Some(handle) => scene.unregister_drawable(handle),
                None => Ok(()),
            }
        }
    }

    fn stage(first_releases: bool) -> Stage<DrawList> {
        let sketches: Vec<Box<dyn Sketch<DrawList>>> = vec![
            Box::new(Sticky {
                handle: None,
                release: first_releases,
            }),
            Box::new(Sticky {
                handle: None,
                release: true,
            }),
        ];
        let viewport = Viewport {
            pixel_ratio: 1.,
            width: 640,
            height: 360,
        };
        Stage::new(DrawList::with_capacity(8), sketches, viewport)
    }

    #[test]
    fn switch_unloads_before_loading() {
        let mut stage = stage(true);
        stage.load(0).unwrap();
        assert_eq!(stage.scene.len(), 1);

        assert!(stage.switch_to(1).unwrap());
        assert_eq!(stage.active, 1);
        assert_eq!(stage.scene.len(), 1);
        assert!(!stage.failed);
    }

    #[test]
    fn failed_unload_keeps_current_sketch() {
        let mut stage = stage(false);
        stage.load(0).unwrap();

        assert!(stage.switch_to(1).is_err());
        assert_eq!(stage.active, 0);
        assert!(stage.failed);
        assert_eq!(stage.scene.len(), 1);
    }

    #[test]
    fn switching_to_current_or_missing_sketch_is_a_no_op() {
        let mut stage = stage(true);
        stage.load(0).unwrap();
        assert!(!stage.switch_to(0).unwrap());
        assert!(!stage.switch_to(7).unwrap());
        assert_eq!(stage.scene.len(), 1);
    }
}
