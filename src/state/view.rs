use std::rc::Rc;
use yew::Reducible;

use crate::model::{Cell, Grid, Highlight, HighlightSet, TileKey, ViewMode};
use crate::resolve::{self, CellStyle};
use crate::state::camera::column_height;

/// What the sidebar is currently showing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SidebarFocus {
    #[default]
    Placeholder,
    Cell(TileKey),
}

/// Interaction state for the grid: dataset, click selection, externally
/// supplied highlights and the global view mode.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    pub grid: Rc<Grid>,
    pub selection: Option<TileKey>,
    pub highlights: HighlightSet,
    pub view_mode: ViewMode,
    pub sidebar: SidebarFocus,
    /// Bumped whenever per-cell styling may have changed; the canvas redraws on it.
    pub version: u64,
}

#[derive(Clone, Debug)]
pub enum ViewAction {
    LoadGrid(Rc<Grid>),
    Hover(Option<TileKey>),
    SelectTile(TileKey),
    DeselectTile,
    SetHighlights(Vec<Highlight>),
    ClearHighlights,
    SetViewMode(ViewMode),
    ToggleViewMode,
}

impl ViewState {
    pub fn style_for(&self, cell: &Cell) -> CellStyle {
        resolve::resolve_style(
            cell,
            self.selection,
            &self.highlights,
            self.view_mode,
            self.grid.max_score(),
        )
    }

    pub fn sidebar_cell(&self) -> Option<&Cell> {
        match self.sidebar {
            SidebarFocus::Placeholder => None,
            SidebarFocus::Cell(k) => self.grid.get(k),
        }
    }

    /// Looks a coordinate up without touching any state.
    pub fn search(&self, row: i32, col: i32) -> Option<TileKey> {
        let key = TileKey::new(row, col);
        self.grid.get(key).map(|c| c.key)
    }

    /// Topmost cell under a world-space point, taking column extrusion into account.
    pub fn pick(&self, world_x: f64, world_y: f64) -> Option<TileKey> {
        self.grid
            .in_draw_order()
            .rev()
            .find(|cell| {
                let x = cell.key.col as f64;
                let y = cell.key.row as f64;
                let h = column_height(resolve::resolve_elevation(cell, self.selection, &self.highlights));
                world_x >= x && world_x < x + 1.0 && world_y >= y - h && world_y < y + 1.0
            })
            .map(|c| c.key)
    }

    /// Applies `action` in place. Returns `(changed, restyle)`.
    fn apply(&mut self, action: ViewAction) -> (bool, bool) {
        use ViewAction::*;
        match action {
            LoadGrid(grid) => {
                self.grid = grid;
                self.selection = None;
                self.highlights = HighlightSet::default();
                self.sidebar = SidebarFocus::Placeholder;
                (true, true)
            }
            Hover(Some(key)) => {
                if self.selection.is_some() || self.grid.get(key).is_none() {
                    return (false, false);
                }
                let next = SidebarFocus::Cell(key);
                let changed = self.sidebar != next;
                self.sidebar = next;
                (changed, false)
            }
            Hover(None) => (false, false),
            SelectTile(key) => {
                if self.grid.get(key).is_none() {
                    return (false, false);
                }
                self.selection = Some(key);
                self.sidebar = SidebarFocus::Cell(key);
                (true, true)
            }
            DeselectTile => {
                self.selection = None;
                self.sidebar = SidebarFocus::Placeholder;
                (true, true)
            }
            SetHighlights(tiles) => {
                self.highlights = HighlightSet::new(tiles);
                self.selection = None;
                (true, true)
            }
            ClearHighlights => {
                self.selection = None;
                self.highlights = HighlightSet::default();
                self.sidebar = SidebarFocus::Placeholder;
                (true, true)
            }
            SetViewMode(mode) => {
                let changed = self.view_mode != mode;
                self.view_mode = mode;
                (changed, changed)
            }
            ToggleViewMode => {
                self.view_mode = self.view_mode.toggled();
                (true, true)
            }
        }
    }
}

impl Reducible for ViewState {
    type Action = ViewAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut new = (*self).clone();
        let (changed, restyle) = new.apply(action);
        if !changed {
            return self;
        }
        if restyle {
            new.version = new.version.wrapping_add(1);
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MAX_DEPTH, Rgba};
    use crate::resolve::{HIGHLIGHT_COLOR, SELECTED_COLOR, resolve_color};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn loaded() -> Rc<ViewState> {
        let mut cells = Vec::new();
        for row in 0..5 {
            for col in 0..5 {
                cells.push(json!({
                    "row": row, "col": col, "depth": MAX_DEPTH, "biome": "plain",
                    "score": (row * 5 + col) as f64
                }));
            }
        }
        let grid = Grid::from_json(serde_json::Value::Array(cells)).unwrap();
        Rc::new(ViewState::default()).reduce(ViewAction::LoadGrid(Rc::new(grid)))
    }

    fn color_of(state: &ViewState, row: i32, col: i32) -> Rgba {
        let cell = state.grid.get(TileKey::new(row, col)).unwrap();
        resolve_color(cell, state.selection, &state.highlights, state.view_mode, state.grid.max_score())
    }

    #[test]
    fn highlights_clear_an_active_selection() {
        let s = loaded().reduce(ViewAction::SelectTile(TileKey::new(3, 4)));
        assert_eq!(color_of(&s, 3, 4), SELECTED_COLOR);
        let s = s.reduce(ViewAction::SetHighlights(vec![Highlight::new(1, 1)]));
        assert_eq!(s.selection, None);
        assert_ne!(color_of(&s, 3, 4), SELECTED_COLOR);
        assert_eq!(color_of(&s, 1, 1), HIGHLIGHT_COLOR);
    }

    #[test]
    fn selecting_keeps_highlights() {
        let s = loaded()
            .reduce(ViewAction::SetHighlights(vec![Highlight::new(1, 1)]))
            .reduce(ViewAction::SelectTile(TileKey::new(2, 2)));
        assert_eq!(s.highlights.len(), 1);
        assert_eq!(s.sidebar, SidebarFocus::Cell(TileKey::new(2, 2)));
    }

    #[test]
    fn highlight_custom_color_is_opaque() {
        let s = loaded().reduce(ViewAction::SetHighlights(vec![
            Highlight::new(1, 1).with_color(Rgba::rgb(9, 9, 9)),
        ]));
        assert_eq!(color_of(&s, 1, 1), Rgba::new(9, 9, 9, 255));
    }

    #[test]
    fn hover_only_previews_without_selection() {
        let s = loaded().reduce(ViewAction::Hover(Some(TileKey::new(0, 1))));
        assert_eq!(s.sidebar, SidebarFocus::Cell(TileKey::new(0, 1)));
        assert_eq!(s.selection, None);

        let s = s.reduce(ViewAction::SelectTile(TileKey::new(4, 4)));
        let version = s.version;
        let s = s.reduce(ViewAction::Hover(Some(TileKey::new(0, 2))));
        assert_eq!(s.sidebar, SidebarFocus::Cell(TileKey::new(4, 4)));
        assert_eq!(s.version, version);
    }

    #[test]
    fn hover_does_not_restyle() {
        let s = loaded();
        let version = s.version;
        let s = s.reduce(ViewAction::Hover(Some(TileKey::new(1, 1))));
        assert_eq!(s.version, version);
    }

    #[test]
    fn deselect_and_clear_reset_sidebar() {
        let s = loaded()
            .reduce(ViewAction::SelectTile(TileKey::new(1, 2)))
            .reduce(ViewAction::DeselectTile);
        assert_eq!(s.selection, None);
        assert_eq!(s.sidebar, SidebarFocus::Placeholder);

        let s = s
            .reduce(ViewAction::SetHighlights(vec![Highlight::new(0, 0)]))
            .reduce(ViewAction::SelectTile(TileKey::new(1, 2)))
            .reduce(ViewAction::ClearHighlights);
        assert_eq!(s.selection, None);
        assert!(s.highlights.is_empty());
        assert_eq!(s.sidebar, SidebarFocus::Placeholder);
    }

    #[test]
    fn search_outside_grid_changes_nothing() {
        let s = loaded();
        assert_eq!(s.search(2, 3), Some(TileKey::new(2, 3)));
        assert_eq!(s.search(99, -1), None);
        let before = (*s).clone();
        let s = s.reduce(ViewAction::SelectTile(TileKey::new(99, -1)));
        assert_eq!(*s, before);
    }

    #[test]
    fn view_mode_changes_restyle() {
        let s = loaded();
        let version = s.version;
        let s = s.reduce(ViewAction::SetViewMode(ViewMode::Biome));
        assert_eq!(s.version, version);
        let s = s.reduce(ViewAction::ToggleViewMode);
        assert_eq!(s.view_mode, ViewMode::Score);
        assert!(s.version > version);
    }

    #[test]
    fn pick_hits_popped_columns_first() {
        // depth == MAX_DEPTH, so unmarked columns are flat.
        let s = loaded();
        assert_eq!(s.pick(2.5, 3.5), Some(TileKey::new(3, 2)));
        assert_eq!(s.pick(-0.5, 0.5), None);
        let s = s.reduce(ViewAction::SelectTile(TileKey::new(3, 2)));
        // Point above the selected tile's footprint now lands on its raised top.
        assert_eq!(s.pick(2.5, 2.5), Some(TileKey::new(3, 2)));
    }
}
