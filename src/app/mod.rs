use std::path::PathBuf;

use eframe::egui::{
    self, Color32, ColorImage, CursorIcon, Rect, Sense, Stroke, TextureHandle, TextureOptions,
    pos2,
};
use image::RgbaImage;
use log::{error, info};

use crate::{Config, DisplayTransform, EditorImages, LoadState, PointerEvent, ToolSession};

mod menu;
mod native;

pub use native::run_native;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Paths {
    pub original: PathBuf,
    pub matte: PathBuf,
    pub output: PathBuf,
}

pub(crate) struct RetouchApp {
    config: Config,
    paths: Paths,
    load_state: LoadState,
    session: ToolSession,
    canvas: Option<TextureHandle>,
    canvas_dirty: bool,
    pointer_inside: bool,
    status: Option<String>,
}

fn texture_options() -> TextureOptions {
    TextureOptions {
        magnification: egui::TextureFilter::Nearest,
        ..Default::default()
    }
}

impl RetouchApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: Config, paths: Paths) -> Self {
        Self {
            config,
            paths,
            load_state: LoadState::NotLoaded,
            session: ToolSession::Idle,
            canvas: None,
            canvas_dirty: true,
            pointer_inside: false,
            status: None,
        }
    }

    fn canvas_image(&self) -> Option<RgbaImage> {
        if let Some(tool) = self.session.tool() {
            return Some(tool.render());
        }
        self.load_state.images().map(|i| i.matte.clone())
    }

    /// Writes the committed result. Later sessions edit that result, and each
    /// save replaces the output file with the accumulated edits.
    fn apply(&mut self) {
        match self.session.commit_onto(Some(&mut self.load_state)) {
            Ok(Some(encoded)) => {
                self.status = Some(match encoded.write_to(&self.paths.output) {
                    Ok(()) => {
                        info!("Saved {}", self.paths.output.display());
                        format!(
                            "Saved to {}, further edits continue from this result",
                            self.paths.output.display()
                        )
                    }
                    Err(e) => {
                        error!("Saving {} failed: {e}", self.paths.output.display());
                        format!("Error during save: {e}")
                    }
                });
            }
            Ok(None) => {}
            Err(e) => {
                error!("{e}");
                self.status = Some(e.to_string());
            }
        }
        self.canvas_dirty = true;
    }

    fn cancel(&mut self) {
        self.session.cancel();
        self.canvas_dirty = true;
    }

    fn canvas(&mut self, ui: &mut egui::Ui) {
        match &self.load_state {
            LoadState::Error(e) => {
                ui.colored_label(Color32::RED, e);
                return;
            }
            LoadState::NotLoaded | LoadState::Loading(_) => {
                ui.spinner();
                return;
            }
            LoadState::Loaded(_) => {}
        }

        if self.canvas_dirty || self.canvas.is_none() {
            if let Some(image) = self.canvas_image() {
                let color_image = ColorImage::from_rgba_unmultiplied(
                    [image.width() as usize, image.height() as usize],
                    image.as_raw(),
                );
                match &mut self.canvas {
                    Some(handle) => handle.set(color_image, texture_options()),
                    None => {
                        self.canvas =
                            Some(ui.ctx().load_texture("canvas", color_image, texture_options()))
                    }
                }
            }
            self.canvas_dirty = false;
        }
        let Some((texture_id, [width, height])) = self.canvas.as_ref().map(|t| (t.id(), t.size()))
        else {
            return;
        };

        let available = ui.available_rect_before_wrap();
        let Some(transform) = DisplayTransform::fit(available, width as u32, height as u32) else {
            return;
        };
        let response = ui
            .allocate_rect(transform.rendered(), Sense::click_and_drag())
            .on_hover_cursor(CursorIcon::Crosshair);
        let painter = ui.painter_at(available);
        painter.image(
            texture_id,
            transform.rendered(),
            Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0)),
            Color32::WHITE,
        );

        if self.route_pointer(ui, &response, &transform) {
            self.canvas_dirty = true;
            ui.ctx().request_repaint();
        }

        if let (ToolSession::Retouching(retouch), Some(pointer)) =
            (&self.session, response.hover_pos())
        {
            let cursor = retouch.cursor(&transform, pointer);
            let [r, g, b] = cursor.color;
            painter.circle_stroke(
                cursor.center,
                cursor.radius,
                Stroke::new(2.0, Color32::from_rgb(r, g, b)),
            );
        }
    }

    /// Feeds this frame's pointer input to the active tool. Returns whether
    /// anything was delivered.
    fn route_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        transform: &DisplayTransform,
    ) -> bool {
        if self.session.is_idle() {
            return false;
        }
        let (pressed, released, moved, latest) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.delta() != egui::Vec2::ZERO,
                i.pointer.latest_pos(),
            )
        });
        let inside = response.contains_pointer();

        let mut events = Vec::new();
        match latest {
            Some(pos) if pressed && inside => events.push(PointerEvent::Down(pos)),
            Some(pos) if moved && inside => events.push(PointerEvent::Move(pos)),
            _ => {}
        }
        if released {
            events.push(PointerEvent::Up);
        }
        if self.pointer_inside && !inside {
            events.push(PointerEvent::Leave);
        }
        self.pointer_inside = inside;

        for event in &events {
            self.session.handle_pointer(*event, transform);
        }
        !events.is_empty()
    }
}

impl eframe::App for RetouchApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let was_loading = self.load_state.is_loading();
        let paths = &self.paths;
        self.load_state
            .update(|| EditorImages::load_files(paths.original.clone(), paths.matte.clone()));
        if self.load_state.is_loading() {
            ctx.request_repaint();
        } else if was_loading {
            self.canvas_dirty = true;
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) && !self.session.is_idle() {
            self.cancel();
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| self.menu(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.canvas(ui));
    }
}
