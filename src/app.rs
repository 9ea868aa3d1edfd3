use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use atlas_mapper::detect::{DetectionJob, DetectionPoll};
use atlas_mapper::events::SessionEvent;
use atlas_mapper::export::{export, DEFAULT_FILE_NAME};
use atlas_mapper::import::{load_image, read_frames_file, write_json};
use atlas_mapper::model::parse_hex_color;
use atlas_mapper::session::MIN_SCALE;
use atlas_mapper::settings::{ExportFormat, SettingsPatch};
use atlas_mapper::{AtlasError, Rect, RectPatch, SelectMode, Session};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use image::RgbaImage;

const MAX_SCALE: f32 = 16.0;
const GRID_STEP: u32 = 16;
const IMAGE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "bmp", "gif", "webp"];

// ── View State ──────────────────────────────────────────────────────────────

/// Set by session listeners, consumed once per frame.
#[derive(Default)]
struct ViewFlags {
    atlas_dirty: bool,
    mask_dirty: bool,
    inspector_dirty: bool,
}

impl ViewFlags {
    /// Rect edits, undo and redo never replace the mask image, so
    /// `mask_dirty` is raised only after a successful `set_mask`.
    fn observe(&mut self, event: &SessionEvent<'_>) {
        match event {
            SessionEvent::AtlasChanged(_) => self.atlas_dirty = true,
            SessionEvent::DataChanged(_)
            | SessionEvent::SelectionChanged(_)
            | SessionEvent::RectUpdated { .. } => self.inspector_dirty = true,
            SessionEvent::ScaleChanged(_) | SessionEvent::SettingsChanged(_) => {}
        }
    }
}

/// Editable copy of the selected rect shown in the inspector.
#[derive(Default)]
struct InspectorBuffer {
    name: String,
    group: String,
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

fn to_color32(hex: &str) -> egui::Color32 {
    parse_hex_color(hex)
        .map(|[r, g, b]| egui::Color32::from_rgb(r, g, b))
        .unwrap_or(egui::Color32::from_rgb(0, 255, 127))
}

/// Top-left and bottom-right corners of `rect` in image space.
fn image_corners(rect: &Rect) -> (egui::Pos2, egui::Pos2) {
    (
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::pos2(rect.right() as f32, rect.bottom() as f32),
    )
}

fn load_texture(ctx: &egui::Context, name: &str, image: &RgbaImage) -> egui::TextureHandle {
    let size = [image.width() as usize, image.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw());
    ctx.load_texture(name, color_image, egui::TextureOptions::NEAREST)
}

// ── App ─────────────────────────────────────────────────────────────────────

pub struct AtlasApp {
    session: Session,
    flags: Rc<RefCell<ViewFlags>>,

    atlas_texture: Option<egui::TextureHandle>,
    mask_texture: Option<egui::TextureHandle>,
    detection: Option<DetectionJob>,

    inspector: InspectorBuffer,
    new_group: String,
    include_border: bool,
    show_mask: bool,
    status: Option<String>,

    // pan
    pan: egui::Vec2,
    panning: bool,
}

impl AtlasApp {
    pub fn new(atlas_path: Option<PathBuf>, mask_path: Option<PathBuf>) -> Self {
        let mut session = Session::new();
        let flags = Rc::new(RefCell::new(ViewFlags::default()));

        let listener_flags = flags.clone();
        session.subscribe(move |event: &SessionEvent<'_>| {
            listener_flags.borrow_mut().observe(event);
        });

        let mut app = Self {
            session,
            flags,
            atlas_texture: None,
            mask_texture: None,
            detection: None,
            inspector: InspectorBuffer::default(),
            new_group: String::new(),
            include_border: false,
            show_mask: false,
            status: None,
            pan: egui::Vec2::ZERO,
            panning: false,
        };
        if let Some(path) = atlas_path {
            app.load_atlas(&path);
        }
        if let Some(path) = mask_path {
            app.load_mask(&path);
        }
        app
    }

    fn report(&mut self, err: AtlasError) {
        log::warn!("{err}");
        self.status = Some(err.to_string());
    }

    // ── File actions ────────────────────────────────────────────────────────

    fn load_atlas(&mut self, path: &Path) {
        match load_image(path) {
            Ok(image) => {
                self.session.set_atlas(image);
                self.pan = egui::Vec2::ZERO;
                self.status = None;
            }
            Err(err) => self.report(err),
        }
    }

    /// Decodes the mask and starts detection in the background. A mask
    /// loaded while another is still being detected replaces it.
    fn load_mask(&mut self, path: &Path) {
        let mask = match load_image(path) {
            Ok(mask) => mask,
            Err(err) => return self.report(err),
        };
        if let Err(err) = self.session.check_mask(&mask) {
            return self.report(err);
        }
        self.detection = Some(DetectionJob::spawn(mask, self.include_border));
        self.status = None;
    }

    fn load_json(&mut self, path: &Path) {
        match read_frames_file(path) {
            Ok(rects) => {
                self.session.set_rects(rects);
                self.status = None;
            }
            Err(err) => self.report(err),
        }
    }

    fn pick_image(title: &str) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title(title)
            .add_filter("Image", &IMAGE_EXTENSIONS)
            .pick_file()
    }

    fn open_atlas(&mut self) {
        if let Some(path) = Self::pick_image("Open atlas") {
            self.load_atlas(&path);
        }
    }

    fn open_mask(&mut self) {
        if self.session.atlas().is_none() {
            return self.report(AtlasError::AtlasMissing);
        }
        if let Some(path) = Self::pick_image("Open mask") {
            self.load_mask(&path);
        }
    }

    fn open_json(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_title("Import frames JSON")
            .add_filter("JSON", &["json"])
            .pick_file()
        {
            self.load_json(&path);
        }
    }

    fn export_json(&mut self) {
        let value = match export(self.session.rects(), self.session.settings()) {
            Ok(value) => value,
            Err(err) => return self.report(err),
        };
        let format = self.session.settings().export_format;
        let Some(path) = rfd::FileDialog::new()
            .set_title("Export sprite sheet")
            .set_file_name(DEFAULT_FILE_NAME)
            .add_filter(format.label(), &[format.extension()])
            .save_file()
        else {
            return;
        };
        match write_json(&path, &value) {
            Ok(()) => self.status = Some(format!("Exported to {}", path.display())),
            Err(err) => self.report(err),
        }
    }

    fn poll_detection(&mut self, ctx: &egui::Context) {
        let Some(ref job) = self.detection else {
            return;
        };
        match job.poll() {
            DetectionPoll::Pending => ctx.request_repaint(),
            DetectionPoll::Finished { mask, rects } => {
                self.detection = None;
                match self.session.set_mask(mask, rects) {
                    Ok(()) => self.flags.borrow_mut().mask_dirty = true,
                    Err(err) => self.report(err),
                }
            }
            DetectionPoll::Lost => {
                self.detection = None;
                self.status = Some("Error processing mask.".to_string());
            }
        }
    }

    // ── Textures ────────────────────────────────────────────────────────────

    fn ensure_textures(&mut self, ctx: &egui::Context) {
        let (atlas_dirty, mask_dirty) = {
            let mut flags = self.flags.borrow_mut();
            let dirty = (flags.atlas_dirty, flags.mask_dirty);
            flags.atlas_dirty = false;
            flags.mask_dirty = false;
            dirty
        };
        if atlas_dirty {
            self.atlas_texture = self
                .session
                .atlas()
                .map(|img| load_texture(ctx, "atlas", img));
        }
        if mask_dirty {
            self.mask_texture = self
                .session
                .mask()
                .map(|img| load_texture(ctx, "mask", img));
        }
    }

    // ── Coordinates ─────────────────────────────────────────────────────────

    fn image_size(&self) -> egui::Vec2 {
        self.session
            .atlas()
            .map(|img| egui::vec2(img.width() as f32, img.height() as f32))
            .unwrap_or(egui::Vec2::ZERO)
    }

    /// Convert image-space coords to screen-space
    fn image_to_screen(&self, canvas_rect: egui::Rect, img_pos: egui::Pos2) -> egui::Pos2 {
        let center = canvas_rect.center();
        center + self.pan + (img_pos.to_vec2() - self.image_size() * 0.5) * self.session.scale()
    }

    /// Convert screen-space coords to image-space
    fn screen_to_image(&self, canvas_rect: egui::Rect, screen_pos: egui::Pos2) -> egui::Pos2 {
        let center = canvas_rect.center();
        let rel = screen_pos - center - self.pan;
        let zoom = self.session.scale();
        let size = self.image_size();
        egui::pos2(rel.x / zoom + size.x * 0.5, rel.y / zoom + size.y * 0.5)
    }

    fn image_rect_on_screen(&self, canvas_rect: egui::Rect) -> egui::Rect {
        let top_left = self.image_to_screen(canvas_rect, egui::Pos2::ZERO);
        let bot_right = self.image_to_screen(canvas_rect, self.image_size().to_pos2());
        egui::Rect::from_min_max(top_left, bot_right)
    }

    // ── Drawing ─────────────────────────────────────────────────────────────

    fn draw_grid(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let size = self.image_size();
        let stroke = egui::Stroke::new(1.0, egui::Color32::from_white_alpha(24));
        let step = GRID_STEP as f32;
        let mut x = 0.0;
        while x <= size.x {
            painter.line_segment(
                [
                    self.image_to_screen(canvas_rect, egui::pos2(x, 0.0)),
                    self.image_to_screen(canvas_rect, egui::pos2(x, size.y)),
                ],
                stroke,
            );
            x += step;
        }
        let mut y = 0.0;
        while y <= size.y {
            painter.line_segment(
                [
                    self.image_to_screen(canvas_rect, egui::pos2(0.0, y)),
                    self.image_to_screen(canvas_rect, egui::pos2(size.x, y)),
                ],
                stroke,
            );
            y += step;
        }
    }

    fn draw_rects(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        for (i, rect) in self.session.rects().iter().enumerate() {
            let (min, max) = image_corners(rect);
            let screen = egui::Rect::from_min_max(
                self.image_to_screen(canvas_rect, min),
                self.image_to_screen(canvas_rect, max),
            );
            if self.session.is_selected(i) {
                painter.rect_stroke(
                    screen,
                    0.0,
                    egui::Stroke::new(2.0, egui::Color32::from_rgb(255, 62, 62)),
                    egui::StrokeKind::Outside,
                );
                painter.text(
                    screen.left_top() - egui::vec2(0.0, 2.0),
                    egui::Align2::LEFT_BOTTOM,
                    &rect.name,
                    egui::FontId::proportional(12.0),
                    egui::Color32::WHITE,
                );
            } else {
                let color = to_color32(self.session.group_color(&rect.group));
                painter.rect_stroke(
                    screen,
                    0.0,
                    egui::Stroke::new(1.0, color),
                    egui::StrokeKind::Middle,
                );
            }
        }
    }

    // ── Panels ──────────────────────────────────────────────────────────────

    fn toolbar_ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open Atlas").clicked() {
                self.open_atlas();
            }
            let has_atlas = self.session.atlas().is_some();
            if ui.add_enabled(has_atlas, egui::Button::new("Open Mask")).clicked() {
                self.open_mask();
            }
            if ui.button("Import JSON").clicked() {
                self.open_json();
            }
            if ui
                .add_enabled(!self.session.rects().is_empty(), egui::Button::new("Export"))
                .clicked()
            {
                self.export_json();
            }
            ui.separator();
            if ui
                .add_enabled(self.session.can_undo(), egui::Button::new("Undo"))
                .clicked()
            {
                self.session.undo();
            }
            if ui
                .add_enabled(self.session.can_redo(), egui::Button::new("Redo"))
                .clicked()
            {
                self.session.redo();
            }
            if ui
                .add_enabled(!self.session.selection().is_empty(), egui::Button::new("Delete"))
                .clicked()
            {
                self.session.delete_selected();
            }
            ui.separator();
            if ui.button("-").clicked() {
                self.session.zoom_out();
            }
            ui.label(format!("Zoom: {:.0}%", self.session.scale() * 100.0));
            if ui.button("+").clicked() {
                self.session.zoom_in();
            }
            ui.separator();
            ui.checkbox(&mut self.include_border, "Include border")
                .on_hover_text("Keep the outer marker ring in detected rects");
            ui.checkbox(&mut self.show_mask, "Show mask");
        });
    }

    fn sprite_table_ui(&mut self, ui: &mut egui::Ui) {
        let modifiers = ui.input(|i| i.modifiers);
        let mut clicked = None;
        let mut renamed = None;
        {
            let session = &self.session;
            let rects = session.rects();
            TableBuilder::new(ui)
                .striped(true)
                .sense(egui::Sense::click())
                .max_scroll_height(240.0)
                .column(Column::exact(32.0))
                .column(Column::remainder().clip(true))
                .column(Column::auto())
                .header(18.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("#");
                    });
                    header.col(|ui| {
                        ui.strong("Name");
                    });
                    header.col(|ui| {
                        ui.strong("Group");
                    });
                })
                .body(|body| {
                    body.rows(20.0, rects.len(), |mut row| {
                        let index = row.index();
                        let rect = &rects[index];
                        row.set_selected(session.is_selected(index));
                        row.col(|ui| {
                            ui.label(index.to_string());
                        });
                        row.col(|ui| {
                            let mut name = rect.name.clone();
                            if ui.text_edit_singleline(&mut name).changed() {
                                renamed = Some((index, name));
                            }
                        });
                        row.col(|ui| {
                            ui.colored_label(to_color32(session.group_color(&rect.group)), "■");
                            ui.label(&rect.group);
                        });
                        if row.response().clicked() {
                            clicked = Some(index);
                        }
                    });
                });
        }

        if let Some((index, name)) = renamed {
            self.session.rename_rect(index, name);
        }
        if let Some(index) = clicked {
            let mode = if modifiers.shift {
                SelectMode::Add
            } else if modifiers.command {
                SelectMode::Toggle
            } else {
                SelectMode::Replace
            };
            self.session.select(index, mode);
        }
    }

    fn refresh_inspector(&mut self) {
        let dirty = std::mem::take(&mut self.flags.borrow_mut().inspector_dirty);
        if !dirty {
            return;
        }
        self.inspector = match self.session.current_rect() {
            Some(rect) => InspectorBuffer {
                name: rect.name.clone(),
                group: rect.group.clone(),
                x: rect.x,
                y: rect.y,
                w: rect.w,
                h: rect.h,
            },
            None => InspectorBuffer::default(),
        };
    }

    fn group_combo(ui: &mut egui::Ui, session: &Session, group: &mut String) {
        egui::ComboBox::from_id_salt("inspector_group")
            .selected_text(group.as_str())
            .show_ui(ui, |ui| {
                for name in session.groups().names() {
                    ui.selectable_value(group, name.to_string(), name);
                }
            });
    }

    fn inspector_ui(&mut self, ui: &mut egui::Ui) {
        self.refresh_inspector();
        let count = self.session.selection().len();

        match (count, self.session.selected_index()) {
            (0, _) => {
                ui.heading("Properties");
                ui.label("No selection");
            }
            (_, Some(index)) => {
                ui.heading("Properties");
                let mut commit = false;
                egui::Grid::new("inspector_grid")
                    .num_columns(2)
                    .show(ui, |ui| {
                        ui.label("Name");
                        let name = ui.text_edit_singleline(&mut self.inspector.name);
                        commit |= name.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        ui.end_row();

                        ui.label("Group");
                        Self::group_combo(ui, &self.session, &mut self.inspector.group);
                        ui.end_row();

                        for (label, value) in [
                            ("X", &mut self.inspector.x),
                            ("Y", &mut self.inspector.y),
                            ("W", &mut self.inspector.w),
                            ("H", &mut self.inspector.h),
                        ] {
                            ui.label(label);
                            ui.add(egui::DragValue::new(value));
                            ui.end_row();
                        }
                    });

                ui.horizontal(|ui| {
                    commit |= ui.button("Apply").clicked();
                    if ui.button("Duplicate").clicked() {
                        self.session.duplicate_selected();
                    }
                    if ui.button("Delete").clicked() {
                        self.session.delete_selected();
                    }
                });

                if commit {
                    let buffer = &self.inspector;
                    let patch = RectPatch {
                        x: Some(buffer.x),
                        y: Some(buffer.y),
                        w: Some(buffer.w),
                        h: Some(buffer.h),
                        name: Some(buffer.name.clone()),
                        group: Some(buffer.group.clone()),
                    };
                    self.session.update_rect(index, &patch);
                }
            }
            (count, None) => {
                ui.heading(format!("{count} items selected"));
                ui.horizontal(|ui| {
                    ui.label("Group");
                    Self::group_combo(ui, &self.session, &mut self.inspector.group);
                    if ui.button("Set for all").clicked() && !self.inspector.group.is_empty() {
                        self.session
                            .update_selected(&RectPatch::group(self.inspector.group.clone()));
                    }
                });
                if ui.button("Delete").clicked() {
                    self.session.delete_selected();
                }
            }
        }

        ui.separator();
        ui.heading("Groups");
        for (name, color) in self.session.groups().iter() {
            ui.horizontal(|ui| {
                ui.colored_label(to_color32(color), "■");
                ui.label(name);
            });
        }
        ui.horizontal(|ui| {
            ui.add(egui::TextEdit::singleline(&mut self.new_group).hint_text("New group"));
            if ui.button("Add").clicked() {
                self.session.add_group(self.new_group.trim());
                self.new_group.clear();
            }
        });
    }

    fn settings_ui(&mut self, ui: &mut egui::Ui) {
        ui.heading("Export Settings");
        let mut settings = self.session.settings().clone();

        egui::ComboBox::from_label("Format")
            .selected_text(settings.export_format.label())
            .show_ui(ui, |ui| {
                for format in ExportFormat::ALL {
                    ui.selectable_value(&mut settings.export_format, format, format.label());
                }
            });
        ui.horizontal(|ui| {
            ui.label("Global Prefix");
            ui.add(egui::TextEdit::singleline(&mut settings.global_prefix).hint_text("e.g. enemy_"));
        });
        ui.horizontal(|ui| {
            ui.label("Pivot (X, Y)");
            ui.add(egui::DragValue::new(&mut settings.pivot.x).speed(0.05).range(0.0..=1.0));
            ui.add(egui::DragValue::new(&mut settings.pivot.y).speed(0.05).range(0.0..=1.0));
        });
        ui.checkbox(&mut settings.show_grid, "Show Grid");

        if &settings != self.session.settings() {
            self.session.update_settings(SettingsPatch {
                export_format: Some(settings.export_format),
                pivot: Some(settings.pivot),
                show_grid: Some(settings.show_grid),
                global_prefix: Some(settings.global_prefix),
            });
        }

        if ui.button("Export JSON").clicked() {
            self.export_json();
        }
    }

    fn status_ui(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.detection.is_some() {
                ui.spinner();
                ui.label("Detecting regions...");
            } else if let Some(ref status) = self.status {
                ui.colored_label(egui::Color32::from_rgb(255, 120, 120), status);
            } else if let Some(rect) = self.session.current_rect() {
                ui.label(format!(
                    "{} - x:{}, y:{}, w:{}, h:{}",
                    if rect.name.is_empty() { "sprite" } else { rect.name.as_str() },
                    rect.x,
                    rect.y,
                    rect.w,
                    rect.h
                ));
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!(
                    "{} sprites | {} selected | undo {}",
                    self.session.rects().len(),
                    self.session.selection().len(),
                    self.session.undo_depth()
                ));
            });
        });
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }
        let (undo, redo, delete, select_all, duplicate, deselect) = ctx.input(|i| {
            let cmd = i.modifiers.command;
            (
                cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                cmd && ((i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || i.key_pressed(egui::Key::Y)),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                cmd && i.key_pressed(egui::Key::A),
                cmd && i.key_pressed(egui::Key::D),
                i.key_pressed(egui::Key::Escape),
            )
        });
        if undo {
            self.session.undo();
        }
        if redo {
            self.session.redo();
        }
        if delete {
            self.session.delete_selected();
        }
        if select_all {
            self.session.select_all();
        }
        if duplicate {
            self.session.duplicate_selected();
        }
        if deselect {
            self.session.clear_selection();
        }
    }

    fn canvas_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let canvas_rect = response.rect;

        // Draw background
        painter.rect_filled(canvas_rect, 0.0, egui::Color32::from_gray(40));

        let Some(ref atlas) = self.atlas_texture else {
            painter.text(
                canvas_rect.center(),
                egui::Align2::CENTER_CENTER,
                "Open an atlas image to start",
                egui::FontId::proportional(18.0),
                egui::Color32::from_gray(160),
            );
            return;
        };

        let img_rect = self.image_rect_on_screen(canvas_rect);
        let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
        painter.image(atlas.id(), img_rect, uv, egui::Color32::WHITE);
        if self.show_mask {
            if let Some(ref mask) = self.mask_texture {
                painter.image(mask.id(), img_rect, uv, egui::Color32::from_white_alpha(110));
            }
        }
        if self.session.settings().show_grid {
            self.draw_grid(&painter, canvas_rect);
        }
        self.draw_rects(&painter, canvas_rect);

        // Handle pan (middle mouse button)
        let middle_down = ctx.input(|i| i.pointer.middle_down());
        if middle_down {
            let delta = ctx.input(|i| i.pointer.delta());
            self.pan += delta;
            self.panning = true;
        } else {
            self.panning = false;
        }

        // Handle zoom (scroll wheel)
        let scroll_delta = ctx.input(|i| i.smooth_scroll_delta.y);
        if scroll_delta != 0.0 && response.hovered() {
            let zoom = self.session.scale();
            let zoom_factor = 1.0 + scroll_delta * 0.002;
            let new_zoom = (zoom * zoom_factor).clamp(MIN_SCALE, MAX_SCALE);
            if let Some(cursor) = response.hover_pos() {
                let center = canvas_rect.center();
                let cursor_rel = cursor - center - self.pan;
                self.pan -= cursor_rel * (new_zoom / zoom - 1.0);
            }
            self.session.set_scale(new_zoom);
        }

        if self.panning || !response.clicked() {
            return;
        }
        let Some(pos) = response.interact_pointer_pos() else {
            return;
        };
        let img_pos = self.screen_to_image(canvas_rect, pos);
        let hit = if img_pos.x >= 0.0 && img_pos.y >= 0.0 {
            self.session
                .rect_at(img_pos.x.floor() as u32, img_pos.y.floor() as u32)
        } else {
            None
        };
        let modifiers = ctx.input(|i| i.modifiers);
        match hit {
            Some(index) if modifiers.shift => self.session.select(index, SelectMode::Add),
            Some(index) if modifiers.command => self.session.select(index, SelectMode::Toggle),
            Some(index) => self.session.select(index, SelectMode::Replace),
            None if modifiers.shift || modifiers.command => {}
            None => self.session.clear_selection(),
        }
    }
}

// ── eframe App impl ────────────────────────────────────────────────────────

impl eframe::App for AtlasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_detection(ctx);
        self.ensure_textures(ctx);
        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.toolbar_ui(ui);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            self.status_ui(ui);
        });

        egui::SidePanel::right("sidebar")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                ui.heading("Sprites");
                self.sprite_table_ui(ui);
                ui.separator();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    self.inspector_ui(ui);
                    ui.separator();
                    self.settings_ui(ui);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ctx, ui);
        });
    }
}
