//! Window set, z-order stack, and the geometry helpers callers use before committing geometry.

use crate::model::{
    Viewport, WindowBounds, WindowConfig, WindowDefaults, WindowId, WindowRect, WindowState,
};

/// Layer number of `id` in a front-to-back `stack`: the front entry gets `stack.len()`, each
/// entry behind it one less. `None` when `id` is not stacked.
pub fn layer_number(stack: &[WindowId], id: WindowId) -> Option<usize> {
    stack
        .iter()
        .position(|candidate| *candidate == id)
        .map(|index| stack.len() - index)
}

/// Moves `rect` so it lies inside `viewport`. Windows larger than the viewport are pinned to the
/// top-left corner.
pub fn clamp_position(rect: WindowRect, viewport: Viewport) -> WindowRect {
    let max_x = viewport.width.saturating_sub(rect.w).max(0);
    let max_y = viewport.height.saturating_sub(rect.h).max(0);
    WindowRect {
        x: rect.x.clamp(0, max_x),
        y: rect.y.clamp(0, max_y),
        ..rect
    }
}

/// Clamps `rect`'s size to `bounds`, leaving its origin alone.
pub fn clamp_size(rect: WindowRect, bounds: WindowBounds) -> WindowRect {
    WindowRect {
        w: rect.w.min(bounds.max_width).max(bounds.min_width),
        h: rect.h.min(bounds.max_height).max(bounds.min_height),
        ..rect
    }
}

/// Geometry of a maximized window: the whole viewport, clamped to the window's size bounds.
pub fn maximized_rect(viewport: Viewport, bounds: WindowBounds) -> WindowRect {
    clamp_size(
        WindowRect {
            x: 0,
            y: 0,
            w: viewport.width,
            h: viewport.height,
        },
        bounds,
    )
}

/// Owns open windows and their front-to-back stacking order.
///
/// Every operation that names an unknown id is a no-op. Geometry setters store what they are
/// given; clamping against bounds and the live viewport happens in the caller (see
/// [`WindowFrame`](crate::frame::WindowFrame)).
#[derive(Debug, Clone, Default)]
pub struct WindowManager {
    defaults: WindowDefaults,
    windows: Vec<WindowState>,
    stack: Vec<WindowId>,
}

impl WindowManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults(defaults: WindowDefaults) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    pub fn defaults(&self) -> &WindowDefaults {
        &self.defaults
    }

    /// Opens a window on top of the stack and returns its id.
    pub fn add_window(&mut self, config: WindowConfig) -> WindowId {
        let defaults = &self.defaults;
        let bounds = WindowBounds::new(
            config.min_width.unwrap_or(defaults.min_width),
            config.min_height.unwrap_or(defaults.min_height),
            config.max_width.unwrap_or(defaults.max_width),
            config.max_height.unwrap_or(defaults.max_height),
        );
        let rect = clamp_size(
            WindowRect {
                x: config.x.unwrap_or(defaults.x),
                y: config.y.unwrap_or(defaults.y),
                w: config.width.unwrap_or(defaults.width),
                h: config.height.unwrap_or(defaults.height),
            },
            bounds,
        );
        let maximized = config.maximized.unwrap_or(false);
        let minimized = config.minimized.unwrap_or(false) && !maximized;
        let id = WindowId::next();
        self.windows.push(WindowState {
            id,
            title: config.title.unwrap_or_else(|| defaults.title.clone()),
            icon_src: config.icon_src.unwrap_or_else(|| defaults.icon_src.clone()),
            rect,
            bounds,
            minimized,
            maximized,
            args: config.args,
        });
        self.stack.insert(0, id);
        tracing::debug!(window = id.0, ?rect, "window added");
        id
    }

    pub fn remove_window(&mut self, id: WindowId) {
        let Some(index) = self.get_window_index_by_id(id) else {
            return;
        };
        self.windows.remove(index);
        self.stack.retain(|candidate| *candidate != id);
        tracing::debug!(window = id.0, "window removed");
    }

    pub fn minimize_window(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.minimized = true;
            window.maximized = false;
        }
    }

    pub fn maximize_window(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.maximized = true;
            window.minimized = false;
        }
    }

    /// Returns the window to the normal state. Geometry is the caller's to re-apply.
    pub fn restore_window(&mut self, id: WindowId) {
        if let Some(window) = self.window_mut(id) {
            window.minimized = false;
            window.maximized = false;
        }
    }

    /// Moves `id` to the front, keeping the relative order of everything else.
    pub fn make_top_most(&mut self, id: WindowId) {
        let Some(index) = self.stack.iter().position(|candidate| *candidate == id) else {
            return;
        };
        if index == 0 {
            return;
        }
        let raised = self.stack.remove(index);
        self.stack.insert(0, raised);
    }

    pub fn set_position(&mut self, id: WindowId, x: i32, y: i32) {
        if let Some(window) = self.window_mut(id) {
            window.rect.x = x;
            window.rect.y = y;
        }
    }

    pub fn set_size(&mut self, id: WindowId, w: i32, h: i32) {
        if let Some(window) = self.window_mut(id) {
            window.rect.w = w;
            window.rect.h = h;
        }
    }

    pub fn set_window_title(&mut self, id: WindowId, title: impl Into<String>) {
        if let Some(window) = self.window_mut(id) {
            window.title = title.into();
        }
    }

    pub fn get_window(&self, id: WindowId) -> Option<&WindowState> {
        self.windows.iter().find(|window| window.id == id)
    }

    /// Position of `id` in creation order.
    pub fn get_window_index_by_id(&self, id: WindowId) -> Option<usize> {
        self.windows.iter().position(|window| window.id == id)
    }

    /// Window ids front to back.
    pub fn layers(&self) -> &[WindowId] {
        &self.stack
    }

    pub fn layer_number(&self, id: WindowId) -> Option<usize> {
        layer_number(&self.stack, id)
    }

    /// Open windows in creation order.
    pub fn windows(&self) -> &[WindowState] {
        &self.windows
    }

    pub fn top_most(&self) -> Option<WindowId> {
        self.stack.first().copied()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn window_mut(&mut self, id: WindowId) -> Option<&mut WindowState> {
        self.windows.iter_mut().find(|window| window.id == id)
    }
}
