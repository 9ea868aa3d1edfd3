//! Edit session
//!
//! The single owner of everything an operator edits: atlas and mask images,
//! the rect list, the group table, the multi-selection, export settings and
//! the undo history. Every mutation commits its state change first and then
//! notifies listeners, so listeners only ever see a consistent session.

use std::collections::BTreeSet;

use image::RgbaImage;

use crate::detect::detect_image;
use crate::error::{AtlasError, Result};
use crate::events::{EventBus, EventKind, SessionEvent, SubscriptionId};
use crate::history::{History, Snapshot};
use crate::model::{GroupTable, Rect, RectPatch, DEFAULT_GROUP, DEFAULT_GROUP_COLOR};
use crate::settings::{Settings, SettingsPatch};

pub const MIN_SCALE: f32 = 0.25;
pub const ZOOM_STEP: f32 = 1.25;

/// Offset applied to a duplicated rect so the copy does not hide the original.
const DUPLICATE_OFFSET: u32 = 10;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SelectMode {
    /// Clear the selection, then select the index.
    #[default]
    Replace,
    /// Add the index to the selection.
    Add,
    /// Flip the index's membership.
    Toggle,
}

#[derive(Debug)]
pub struct Session {
    atlas: Option<RgbaImage>,
    mask: Option<RgbaImage>,
    rects: Vec<Rect>,
    groups: GroupTable,
    selection: BTreeSet<usize>,
    settings: Settings,
    scale: f32,
    history: History,
    events: EventBus,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            atlas: None,
            mask: None,
            rects: Vec::new(),
            groups: GroupTable::default(),
            selection: BTreeSet::new(),
            settings: Settings::default(),
            scale: 1.0,
            history: History::default(),
            events: EventBus::default(),
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Subscriptions ───────────────────────────────────────────────────────

    /// Registers a listener for every event kind.
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(&SessionEvent<'_>) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(None, listener)
    }

    /// Registers a listener for a single event kind.
    pub fn subscribe_to(
        &mut self,
        kind: EventKind,
        listener: impl FnMut(&SessionEvent<'_>) + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(Some(kind), listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    pub fn atlas(&self) -> Option<&RgbaImage> {
        self.atlas.as_ref()
    }

    pub fn mask(&self) -> Option<&RgbaImage> {
        self.mask.as_ref()
    }

    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    pub fn groups(&self) -> &GroupTable {
        &self.groups
    }

    /// Color of `group`, or of the default group when it is not registered.
    pub fn group_color(&self, group: &str) -> &str {
        self.groups
            .color(group)
            .or_else(|| self.groups.color(DEFAULT_GROUP))
            .unwrap_or(DEFAULT_GROUP_COLOR)
    }

    pub fn selection(&self) -> &BTreeSet<usize> {
        &self.selection
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selection.contains(&index)
    }

    /// The selected index when exactly one rect is selected.
    pub fn selected_index(&self) -> Option<usize> {
        if self.selection.len() == 1 {
            self.selection.first().copied()
        } else {
            None
        }
    }

    pub fn current_rect(&self) -> Option<&Rect> {
        self.selected_index().and_then(|i| self.rects.get(i))
    }

    /// First rect containing the image-space point.
    pub fn rect_at(&self, x: u32, y: u32) -> Option<usize> {
        self.rects.iter().position(|r| r.contains(x, y))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    pub fn redo_depth(&self) -> usize {
        self.history.redo_depth()
    }

    // ── Images ──────────────────────────────────────────────────────────────

    /// Replaces the reference atlas. Not undoable.
    pub fn set_atlas(&mut self, image: RgbaImage) {
        log::info!("Atlas set to {}x{}", image.width(), image.height());
        self.atlas = Some(image);
        self.events
            .emit(&SessionEvent::AtlasChanged(self.atlas.as_ref()));
    }

    /// Fails unless an atlas is loaded and `mask` has its dimensions.
    pub fn check_mask(&self, mask: &RgbaImage) -> Result<()> {
        let Some(ref atlas) = self.atlas else {
            return Err(AtlasError::AtlasMissing);
        };
        if mask.dimensions() != atlas.dimensions() {
            return Err(AtlasError::MaskSizeMismatch {
                mask_width: mask.width(),
                mask_height: mask.height(),
                atlas_width: atlas.width(),
                atlas_height: atlas.height(),
            });
        }
        Ok(())
    }

    /// Stores a mask together with the rects derived from it.
    ///
    /// The mask must match the atlas size; on error nothing changes.
    pub fn set_mask(&mut self, mask: RgbaImage, rects: Vec<Rect>) -> Result<()> {
        if let Err(err) = self.check_mask(&mask) {
            log::warn!("Mask rejected: {err}");
            return Err(err);
        }
        self.push_undo();
        self.mask = Some(mask);
        self.rects = rects;
        self.selection.clear();
        log::info!("Mask loaded with {} rects", self.rects.len());
        self.events.emit(&SessionEvent::DataChanged(&self.rects));
        Ok(())
    }

    /// Validates the mask, detects its regions in place and stores both.
    pub fn load_mask(&mut self, mask: RgbaImage, include_border: bool) -> Result<()> {
        if let Err(err) = self.check_mask(&mask) {
            log::warn!("Mask rejected: {err}");
            return Err(err);
        }
        let rects = detect_image(&mask, include_border);
        self.set_mask(mask, rects)
    }

    // ── Rect mutations ──────────────────────────────────────────────────────

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            rects: self.rects.clone(),
            groups: self.groups.clone(),
        }
    }

    fn push_undo(&mut self) {
        let before = self.snapshot();
        self.history.record(before);
        log::debug!("Undo recorded, stack size: {}", self.history.undo_depth());
    }

    /// Replaces the whole rect list.
    pub fn set_rects(&mut self, rects: Vec<Rect>) {
        self.push_undo();
        self.rects = rects;
        self.selection.clear();
        self.events.emit(&SessionEvent::DataChanged(&self.rects));
    }

    /// Merges `patch` into the rect at `index`; a new group in the patch is
    /// registered with a generated color. Invalid indices are ignored.
    pub fn update_rect(&mut self, index: usize, patch: &RectPatch) {
        if index >= self.rects.len() {
            return;
        }
        self.push_undo();

        let rect = &mut self.rects[index];
        rect.merge(patch);
        if self.groups.register(&rect.group) {
            log::debug!("Registered group `{}`", rect.group);
        }

        self.events.emit(&SessionEvent::RectUpdated {
            index,
            rect: &self.rects[index],
        });
        self.events.emit(&SessionEvent::DataChanged(&self.rects));
    }

    /// Applies `patch` to every selected rect, one undo step per rect.
    pub fn update_selected(&mut self, patch: &RectPatch) {
        let indices: Vec<usize> = self.selection.iter().copied().collect();
        for index in indices {
            self.update_rect(index, patch);
        }
    }

    /// Renames without recording history, for live edits while typing.
    pub fn rename_rect(&mut self, index: usize, name: impl Into<String>) {
        let Some(rect) = self.rects.get_mut(index) else {
            return;
        };
        rect.name = name.into();
        self.events.emit(&SessionEvent::RectUpdated {
            index,
            rect: &self.rects[index],
        });
    }

    /// Appends an offset copy of the single selected rect and selects it.
    pub fn duplicate_selected(&mut self) {
        let Some(rect) = self.current_rect() else {
            return;
        };
        let copy = Rect {
            x: rect.x.saturating_add(DUPLICATE_OFFSET),
            y: rect.y.saturating_add(DUPLICATE_OFFSET),
            name: format!("{}_copy", rect.name),
            ..rect.clone()
        };
        let mut rects = self.rects.clone();
        rects.push(copy);
        let index = rects.len() - 1;
        self.set_rects(rects);
        self.select(index, SelectMode::Replace);
    }

    /// Removes every selected rect and clears the selection.
    pub fn delete_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        self.push_undo();

        // Highest index first so earlier removals do not shift later ones.
        let selected = std::mem::take(&mut self.selection);
        for &index in selected.iter().rev() {
            if index < self.rects.len() {
                self.rects.remove(index);
            }
        }
        log::debug!("Deleted {} rects", selected.len());

        self.events.emit(&SessionEvent::DataChanged(&self.rects));
        self.events
            .emit(&SessionEvent::SelectionChanged(&self.selection));
    }

    // ── Groups ──────────────────────────────────────────────────────────────

    /// Registers an empty group. Blank or existing names are ignored.
    pub fn add_group(&mut self, name: &str) {
        if !self.groups.register(name) {
            return;
        }
        self.events.emit(&SessionEvent::DataChanged(&self.rects));
    }

    // ── Selection ───────────────────────────────────────────────────────────

    /// Out-of-range indices clear the selection under
    /// [`SelectMode::Replace`] and are ignored otherwise.
    pub fn select(&mut self, index: usize, mode: SelectMode) {
        if index >= self.rects.len() {
            if mode == SelectMode::Replace {
                self.selection.clear();
                self.events
                    .emit(&SessionEvent::SelectionChanged(&self.selection));
            }
            return;
        }

        match mode {
            SelectMode::Replace => {
                self.selection.clear();
                self.selection.insert(index);
            }
            SelectMode::Add => {
                self.selection.insert(index);
            }
            SelectMode::Toggle => {
                if !self.selection.remove(&index) {
                    self.selection.insert(index);
                }
            }
        }
        self.events
            .emit(&SessionEvent::SelectionChanged(&self.selection));
    }

    pub fn clear_selection(&mut self) {
        self.select_range(&[], SelectMode::Replace);
    }

    /// Batch selection. Out-of-range indices are dropped; any mode other
    /// than [`SelectMode::Replace`] adds.
    pub fn select_range(&mut self, indices: &[usize], mode: SelectMode) {
        if mode == SelectMode::Replace {
            self.selection.clear();
        }
        let len = self.rects.len();
        self.selection
            .extend(indices.iter().copied().filter(|&i| i < len));
        self.events
            .emit(&SessionEvent::SelectionChanged(&self.selection));
    }

    pub fn select_all(&mut self) {
        let all: Vec<usize> = (0..self.rects.len()).collect();
        self.select_range(&all, SelectMode::Replace);
    }

    // ── History ─────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(previous) = self.history.undo(current) else {
            return false;
        };
        self.restore(previous);
        log::debug!("Undo applied, stack size: {}", self.history.undo_depth());
        true
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        let Some(next) = self.history.redo(current) else {
            return false;
        };
        self.restore(next);
        log::debug!("Redo applied, stack size: {}", self.history.undo_depth());
        true
    }

    fn restore(&mut self, snapshot: Snapshot) {
        self.rects = snapshot.rects;
        self.groups = snapshot.groups;
        self.selection.clear();
        self.events.emit(&SessionEvent::DataChanged(&self.rects));
        self.events
            .emit(&SessionEvent::SelectionChanged(&self.selection));
    }

    // ── Settings & view ─────────────────────────────────────────────────────

    pub fn update_settings(&mut self, patch: SettingsPatch) {
        self.settings.merge(patch);
        self.events
            .emit(&SessionEvent::SettingsChanged(&self.settings));
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
        self.events.emit(&SessionEvent::ScaleChanged(self.scale));
    }

    pub fn zoom_in(&mut self) {
        self.set_scale(self.scale * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_scale((self.scale / ZOOM_STEP).max(MIN_SCALE));
    }
}
