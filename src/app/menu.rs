use eframe::egui;

use crate::{BrushMode, BrushRadius, ToolSession};

enum MenuAction {
    StartCrop,
    StartRetouch,
    Apply,
    Cancel,
}

impl super::RetouchApp {
    pub(super) fn menu(&mut self, ui: &mut egui::Ui) {
        let mut action = None;
        let mut redraw = false;

        ui.horizontal(|ui| match &mut self.session {
            ToolSession::Idle => {
                ui.add_enabled_ui(self.load_state.images().is_some(), |ui| {
                    if ui
                        .button("Crop")
                        .on_hover_text("Select the area to keep")
                        .clicked()
                    {
                        action = Some(MenuAction::StartCrop);
                    }
                    if ui
                        .button("Retouch")
                        .on_hover_text("Paint parts of the original back in or out")
                        .clicked()
                    {
                        action = Some(MenuAction::StartRetouch);
                    }
                });
                if let Some(status) = &self.status {
                    ui.label(status);
                }
            }
            ToolSession::Cropping(crop) => {
                if ui.button("Select All").clicked() {
                    crop.select_all();
                    redraw = true;
                }
                if ui
                    .add_enabled(crop.selection().is_some(), egui::Button::new("Clear Selection"))
                    .clicked()
                {
                    crop.clear();
                    redraw = true;
                }
                match crop.info() {
                    Some(info) => ui.label(format!(
                        "{}x{}px at ({}, {})",
                        info.width, info.height, info.position.0, info.position.1
                    )),
                    None => ui.label("Click and drag to select an area to crop"),
                };
                ui.separator();
                if ui.button("Cancel").on_hover_text("Esc").clicked() {
                    action = Some(MenuAction::Cancel);
                }
                if ui
                    .add_enabled(crop.can_apply(), egui::Button::new("Apply Crop"))
                    .clicked()
                {
                    action = Some(MenuAction::Apply);
                }
            }
            ToolSession::Retouching(retouch) => {
                let mut mode = retouch.brush().mode;
                ui.selectable_value(&mut mode, BrushMode::Restore, "Restore")
                    .on_hover_text("Add back parts of the image");
                ui.selectable_value(&mut mode, BrushMode::Erase, "Erase")
                    .on_hover_text("Remove parts of the image");
                retouch.set_brush_mode(mode);

                let mut radius = retouch.brush().radius.get();
                if ui
                    .add(
                        egui::Slider::new(&mut radius, BrushRadius::MIN..=BrushRadius::MAX)
                            .text("Brush Size"),
                    )
                    .changed()
                {
                    retouch.set_brush_radius(radius);
                }

                let mut show_original = retouch.show_original();
                if ui
                    .checkbox(&mut show_original, "Show Original (50%)")
                    .changed()
                {
                    retouch.set_show_original(show_original);
                    redraw = true;
                }
                ui.separator();
                if ui.button("Cancel").on_hover_text("Esc").clicked() {
                    action = Some(MenuAction::Cancel);
                }
                if ui.button("Apply Changes").clicked() {
                    action = Some(MenuAction::Apply);
                }
            }
        });

        if redraw {
            self.canvas_dirty = true;
        }
        match action {
            Some(MenuAction::StartCrop) => {
                if let Some(images) = self.load_state.images() {
                    self.session = ToolSession::crop(images.clone(), self.config.overlay);
                    self.canvas_dirty = true;
                }
            }
            Some(MenuAction::StartRetouch) => {
                if let Some(images) = self.load_state.images() {
                    self.session = ToolSession::retouch(
                        images.clone(),
                        self.config.brush,
                        self.config.show_original,
                    );
                    self.canvas_dirty = true;
                }
            }
            Some(MenuAction::Apply) => self.apply(),
            Some(MenuAction::Cancel) => self.cancel(),
            None => {}
        }
    }
}
