//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to drive the event
//! loop: window and GPU creation on `resumed`, keyboard and resize handling,
//! and one [`FrameDriver`] frame per `RedrawRequested`. Each frame ends by
//! requesting the next redraw, so frames follow the display's refresh.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::frame::FrameDriver;
use crate::input::{ControlPanel, Input, KeyBindings};
use crate::render::{GpuContext, WgpuBackend};
use crate::time::FrameClock;

/// The application state that winit drives.
pub(crate) struct WinitApp {
    config: ViewerConfig,
    driver: FrameDriver,
    controls: ControlPanel,
    keys: Input<KeyCode>,
    bindings: KeyBindings,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    backend: Option<WgpuBackend>,
    /// First fatal error; ends the event loop and is returned from `run`.
    error: Option<ViewerError>,
    #[cfg(feature = "panel")]
    overlay: Option<crate::panel::PanelOverlay>,
    #[cfg(feature = "diagnostics")]
    diag: Option<crate::diag::DiagSender>,
}

impl WinitApp {
    pub fn new(config: ViewerConfig, bindings: KeyBindings) -> Self {
        let driver = FrameDriver::from_config(&config);
        let view = config.default_view();
        let mut controls = ControlPanel::new(&view.parameters, view.wireframe, &view.background);
        driver.sync_controls(&mut controls);

        Self {
            config,
            driver,
            controls,
            keys: Input::new(),
            bindings,
            clock: FrameClock::new(),
            window: None,
            backend: None,
            error: None,
            #[cfg(feature = "panel")]
            overlay: None,
            #[cfg(feature = "diagnostics")]
            diag: match crate::diag::DiagSender::new() {
                Ok(sender) => Some(sender),
                Err(e) => {
                    log::warn!("diagnostics disabled: {e}");
                    None
                }
            },
        }
    }

    /// The error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<ViewerError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: ViewerError) {
        log::error!("{error}");
        self.error = Some(error);
        event_loop.exit();
    }

    /// Create the window, GPU backend, and overlay, then upload the model.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), ViewerError> {
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.width as f64,
                self.config.height as f64,
            ));
        let window = Arc::new(event_loop.create_window(attrs).map_err(ViewerError::Window)?);

        let gpu = GpuContext::new(window.clone())?;
        let mut backend = WgpuBackend::new(gpu);
        self.driver.startup(&mut backend)?;

        #[cfg(feature = "panel")]
        {
            self.overlay = Some(crate::panel::PanelOverlay::new(
                backend.gpu(),
                &window,
                self.config.panel_visible,
            ));
        }

        window.request_redraw();
        self.backend = Some(backend);
        self.window = Some(window);
        Ok(())
    }

    fn on_key(&mut self, event: &KeyEvent, consumed: bool) {
        let PhysicalKey::Code(key_code) = event.physical_key else {
            return;
        };

        #[cfg(feature = "panel")]
        if !consumed
            && key_code == KeyCode::F12
            && event.state == ElementState::Pressed
            && !event.repeat
        {
            if let Some(overlay) = self.overlay.as_mut() {
                overlay.toggle();
            }
        }

        track_key(&mut self.keys, key_code, event.state, consumed);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let Some(backend) = self.backend.as_mut() else {
            return;
        };

        let dt = self.clock.tick();
        self.bindings.apply(&self.keys, &mut self.controls, dt);
        self.keys.clear_just();

        self.driver.handle_events(&mut self.controls);
        self.driver.run_frame(&mut self.controls, backend, dt);

        // Build the panel after the frame so it shows this frame's values.
        #[cfg(feature = "panel")]
        let result = {
            if let (Some(window), Some(overlay)) = (&self.window, self.overlay.as_mut()) {
                overlay.build_ui(
                    window,
                    &mut self.controls,
                    self.driver.last_stats(),
                    self.clock.fps(),
                );
            }
            let overlay = &mut self.overlay;
            backend.submit(|frame| {
                if let Some(overlay) = overlay.as_mut() {
                    overlay.render_overlay(frame);
                }
            })
        };
        #[cfg(not(feature = "panel"))]
        let result = backend.submit(|_| {});

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                backend.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("Out of GPU memory!");
                event_loop.exit();
            }
            Err(e) => {
                log::warn!("Surface error: {e:?}");
            }
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for WinitApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        #[cfg(feature = "panel")]
        let consumed = match (&self.window, self.overlay.as_mut()) {
            (Some(window), Some(overlay)) => overlay.on_window_event(window, &event),
            _ => false,
        };
        #[cfg(not(feature = "panel"))]
        let consumed = false;

        if let WindowEvent::KeyboardInput { event, .. } = &event {
            self.on_key(event, consumed);
            return;
        }
        if consumed {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if let Some(backend) = self.backend.as_mut() {
                    backend.resize(size.width, size.height);
                    self.driver.resize(backend, size.width, size.height);
                }
            }

            WindowEvent::Focused(false) => self.keys.release_all(),

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(feature = "diagnostics")]
        if let Some(diag) = self.diag.as_mut() {
            diag.send(&self.clock, &self.driver);
        }
    }
}

/// Feed one key transition into `keys`.
///
/// A press the panel consumed is not tracked. A release always is, so a key
/// held while a panel widget takes focus does not stay down.
fn track_key(keys: &mut Input<KeyCode>, key: KeyCode, state: ElementState, consumed: bool) {
    match state {
        ElementState::Pressed if !consumed => keys.press(key),
        ElementState::Pressed => {}
        ElementState::Released => keys.release(key),
    }
}
