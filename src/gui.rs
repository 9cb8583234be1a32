//! eframe/egui frontend.
//!
//! eframe calls `App::logic` and then `App::ui` once per frame. In `logic`
//! the app builds a short-lived `EguiDisplay` around the egui context,
//! collects released keys and close requests into [`InputEvent`]s, and lets
//! the session consume them; `ui` only paints the current photo. Pixels are
//! shrunk to the drawn size before upload, which also keeps large photos under
//! the renderer's texture limit. The session's layout is in physical pixels; viewport commands are
//! issued in points, so everything is divided by `pixels_per_point` on the
//! way out.
//!
//! Keys: Enter likes, Backspace dislikes, Escape quits. Keys act on release,
//! so the Enter that launched the program from a shell is not taken as a like
//! (together with the session's startup grace period).

use crate::config::ViewerConfig;
use crate::display::{Display, InputEvent, LogicalKey};
use crate::imaging::{
    DecodedImage, Dimensions, ImageDecoder, Layout, resize_for_texture, texture_size,
};
use crate::session::{Flow, SessionReport, ViewerSession};
use std::collections::VecDeque;
use std::sync::mpsc::{Sender, channel};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GuiError {
    #[error("Window system error: {0}")]
    Eframe(#[from] eframe::Error),
}

/// Map a physical key to its meaning during review.
pub fn map_key(key: egui::Key) -> Option<LogicalKey> {
    match key {
        egui::Key::Escape => Some(LogicalKey::Quit),
        egui::Key::Enter => Some(LogicalKey::Accept),
        egui::Key::Backspace => Some(LogicalKey::Reject),
        _ => None,
    }
}

/// The photo currently on screen.
struct Shown {
    texture: egui::TextureHandle,
    layout: Layout,
}

/// [`Display`] over one frame of an egui context.
struct EguiDisplay<'a> {
    ctx: &'a egui::Context,
    events: VecDeque<InputEvent>,
    fallback_screen: Dimensions,
    title: &'a str,
    shown: &'a mut Option<Shown>,
}

impl<'a> EguiDisplay<'a> {
    fn new(
        ctx: &'a egui::Context,
        fallback_screen: Dimensions,
        title: &'a str,
        shown: &'a mut Option<Shown>,
    ) -> Self {
        let events = ctx.input(|i| {
            let mut events: VecDeque<InputEvent> = i
                .events
                .iter()
                .filter_map(|event| match event {
                    egui::Event::Key {
                        key,
                        pressed: false,
                        ..
                    } => map_key(*key).map(InputEvent::Key),
                    _ => None,
                })
                .collect();
            if i.viewport().close_requested() {
                events.push_back(InputEvent::Close);
            }
            events
        });
        Self {
            ctx,
            events,
            fallback_screen,
            title,
            shown,
        }
    }

    fn to_points(&self, pixels: f32) -> f32 {
        pixels / self.ctx.pixels_per_point()
    }

    fn max_texture_side(&self) -> u32 {
        let side = self.ctx.input(|i| i.max_texture_side);
        u32::try_from(side).unwrap_or(u32::MAX)
    }
}

impl Display for EguiDisplay<'_> {
    fn screen_size(&self) -> Dimensions {
        let ppp = self.ctx.pixels_per_point();
        match self.ctx.input(|i| i.viewport().monitor_size) {
            Some(size) if size.x >= 1.0 && size.y >= 1.0 => {
                Dimensions::new((size.x * ppp) as u32, (size.y * ppp) as u32)
            }
            _ => {
                log::warn!("monitor size unknown, assuming {}", self.fallback_screen);
                self.fallback_screen
            }
        }
    }

    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    fn configure_surface(&mut self, layout: &Layout) {
        let size = egui::vec2(
            self.to_points(layout.content_width as f32),
            self.to_points(layout.content_height as f32),
        );
        let position = egui::pos2(
            self.to_points(layout.window_x as f32),
            self.to_points(layout.window_y as f32),
        );
        log::debug!("window {size:?} at {position:?}");
        self.ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::OuterPosition(position));
    }

    fn present(&mut self, path: &str, image: DecodedImage, layout: &Layout) {
        let image = resize_for_texture(image, texture_size(layout, self.max_texture_side()));
        let size = [
            image.dimensions.width as usize,
            image.dimensions.height as usize,
        ];
        let color_image = egui::ColorImage::from_rgba_unmultiplied(size, &image.rgba);
        let texture = self
            .ctx
            .load_texture(path, color_image, egui::TextureOptions::LINEAR);
        *self.shown = Some(Shown {
            texture,
            layout: *layout,
        });

        let name = std::path::Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string());
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Title(format!(
            "{} | {name}",
            self.title
        )));
    }

    fn close(&mut self) {
        *self.shown = None;
        self.ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }
}

struct ReviewApp<D> {
    session: ViewerSession<D>,
    title: String,
    fallback_screen: Dimensions,
    frame_interval: Duration,
    started: bool,
    shown: Option<Shown>,
    reports: Sender<SessionReport>,
}

impl<D: ImageDecoder> ReviewApp<D> {
    fn new(
        session: ViewerSession<D>,
        config: &ViewerConfig,
        reports: Sender<SessionReport>,
    ) -> Self {
        Self {
            session,
            title: config.window.title.clone(),
            fallback_screen: config.fallback_screen(),
            frame_interval: config.frame_interval(),
            started: false,
            shown: None,
            reports,
        }
    }

    fn draw(&self, ui: &mut egui::Ui) {
        let frame = egui::Frame::NONE.fill(egui::Color32::BLACK);
        egui::CentralPanel::default().frame(frame).show_inside(ui, |ui| {
            let Some(shown) = &self.shown else {
                return;
            };
            let ppp = ui.ctx().pixels_per_point();
            let size = egui::vec2(
                shown.layout.content_width as f32 / ppp,
                shown.layout.content_height as f32 / ppp,
            );
            let rect = egui::Rect::from_min_size(ui.max_rect().min, size);
            let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
            ui.painter()
                .image(shown.texture.id(), rect, uv, egui::Color32::WHITE);
        });
    }
}

impl<D: ImageDecoder> eframe::App for ReviewApp<D> {
    fn logic(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.session.is_finished() {
            return;
        }
        let mut display = EguiDisplay::new(ctx, self.fallback_screen, &self.title, &mut self.shown);
        let mut flow = Flow::Continue;
        if !self.started {
            self.started = true;
            flow = self.session.start(&mut display);
        }
        if flow == Flow::Continue {
            self.session.pump(&mut display);
        }
        if let Some(report) = self.session.take_report() {
            // The receiver only goes away once the event loop has returned.
            let _ = self.reports.send(report);
        }
    }

    fn ui(&mut self, ui: &mut egui::Ui, _frame: &mut eframe::Frame) {
        self.draw(ui);
        ui.ctx().request_repaint_after(self.frame_interval);
    }
}

/// Open the review window and run `session` until it ends.
///
/// Returns the session report, or `None` if the window went away before the
/// session could finish (decisions are still saved when the session drops).
pub fn run<D: ImageDecoder + 'static>(
    session: ViewerSession<D>,
    config: &ViewerConfig,
) -> Result<Option<SessionReport>, GuiError> {
    let (tx, rx) = channel();
    let app = ReviewApp::new(session, config, tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 480.0])
            .with_resizable(false)
            .with_title(config.window.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        env!("CARGO_PKG_NAME"),
        options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )?;

    Ok(rx.try_recv().ok())
}
