//! Caller-side interactive geometry for one window: pointer drags, edge resizes, and the
//! maximize/restore snapshot the manager itself does not keep.

use crate::model::{
    DragSession, PointerPosition, ResizeEdge, ResizeSession, Viewport, WindowBounds, WindowId,
    WindowRect,
};
use crate::window_manager::{clamp_position, clamp_size, maximized_rect, WindowManager};

/// Applies resize deltas for a given edge/corner drag.
fn resize_rect(start: WindowRect, edge: ResizeEdge, dx: i32, dy: i32) -> WindowRect {
    match edge {
        ResizeEdge::East => WindowRect {
            w: start.w + dx,
            ..start
        },
        ResizeEdge::West => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            ..start
        },
        ResizeEdge::South => WindowRect {
            h: start.h + dy,
            ..start
        },
        ResizeEdge::North => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            ..start
        },
        ResizeEdge::NorthEast => WindowRect {
            y: start.y + dy,
            h: start.h - dy,
            w: start.w + dx,
            ..start
        },
        ResizeEdge::NorthWest => WindowRect {
            x: start.x + dx,
            y: start.y + dy,
            w: start.w - dx,
            h: start.h - dy,
        },
        ResizeEdge::SouthEast => WindowRect {
            w: start.w + dx,
            h: start.h + dy,
            ..start
        },
        ResizeEdge::SouthWest => WindowRect {
            x: start.x + dx,
            w: start.w - dx,
            h: start.h + dy,
            ..start
        },
    }
}

/// Live geometry of one managed window plus its in-flight pointer sessions.
///
/// Every update clamps first and then commits through [`WindowManager::set_position`] and
/// [`WindowManager::set_size`], so the manager only ever stores clamped geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowFrame {
    id: WindowId,
    rect: WindowRect,
    bounds: WindowBounds,
    dragging: Option<DragSession>,
    resizing: Option<ResizeSession>,
    restore_rect: Option<WindowRect>,
}

impl WindowFrame {
    /// Reads the current geometry of `id`. Returns `None` for unknown windows.
    pub fn attach(manager: &WindowManager, id: WindowId) -> Option<Self> {
        let window = manager.get_window(id)?;
        Some(Self {
            id,
            rect: window.rect,
            bounds: window.bounds,
            dragging: None,
            resizing: None,
            restore_rect: None,
        })
    }

    pub fn id(&self) -> WindowId {
        self.id
    }

    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    pub fn is_moving(&self) -> bool {
        self.dragging.is_some()
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing.is_some()
    }

    /// Starts a title-bar drag and raises the window.
    pub fn begin_move(&mut self, manager: &mut WindowManager, pointer: PointerPosition) {
        manager.make_top_most(self.id);
        self.resizing = None;
        self.dragging = Some(DragSession {
            pointer_start: pointer,
            rect_start: self.rect,
        });
    }

    /// Moves by the pointer delta since [`begin_move`](Self::begin_move), kept inside `viewport`.
    pub fn update_move(
        &mut self,
        manager: &mut WindowManager,
        pointer: PointerPosition,
        viewport: Viewport,
    ) {
        let Some(session) = &self.dragging else {
            return;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        let moved = clamp_position(session.rect_start.offset(dx, dy), viewport);
        self.commit(manager, moved);
    }

    pub fn end_move(&mut self) {
        self.dragging = None;
    }

    pub fn begin_resize(
        &mut self,
        manager: &mut WindowManager,
        edge: ResizeEdge,
        pointer: PointerPosition,
    ) {
        manager.make_top_most(self.id);
        self.dragging = None;
        self.resizing = Some(ResizeSession {
            edge,
            pointer_start: pointer,
            rect_start: self.rect,
        });
    }

    /// Resizes from the grabbed edge; width and height stay within the window's bounds and the
    /// opposite edge stays put.
    pub fn update_resize(&mut self, manager: &mut WindowManager, pointer: PointerPosition) {
        let Some(session) = &self.resizing else {
            return;
        };
        let dx = pointer.x - session.pointer_start.x;
        let dy = pointer.y - session.pointer_start.y;
        let resized = clamp_size(
            resize_rect(session.rect_start, session.edge, dx, dy),
            self.bounds,
        );
        let anchored = session.edge.anchor(session.rect_start, resized);
        self.commit(manager, anchored);
    }

    pub fn end_resize(&mut self) {
        self.resizing = None;
    }

    /// Maximizes to `viewport`, or restores the geometry snapshotted when the window was
    /// maximized.
    pub fn toggle_maximize(&mut self, manager: &mut WindowManager, viewport: Viewport) {
        let maximized = manager
            .get_window(self.id)
            .map(|window| window.maximized)
            .unwrap_or(false);
        if maximized {
            self.restore(manager);
            return;
        }
        self.end_move();
        self.end_resize();
        self.restore_rect.get_or_insert(self.rect);
        manager.maximize_window(self.id);
        manager.make_top_most(self.id);
        self.commit(manager, maximized_rect(viewport, self.bounds));
    }

    /// Returns to the normal state, re-applying the pre-maximize geometry when one was taken.
    pub fn restore(&mut self, manager: &mut WindowManager) {
        manager.restore_window(self.id);
        if let Some(rect) = self.restore_rect.take() {
            self.commit(manager, rect);
        }
    }

    /// Hides the window. Stored geometry and any pre-maximize snapshot are kept.
    pub fn minimize(&mut self, manager: &mut WindowManager) {
        self.end_move();
        self.end_resize();
        manager.minimize_window(self.id);
    }

    pub fn close(self, manager: &mut WindowManager) {
        manager.remove_window(self.id);
    }

    fn commit(&mut self, manager: &mut WindowManager, rect: WindowRect) {
        self.rect = rect;
        manager.set_position(self.id, rect.x, rect.y);
        manager.set_size(self.id, rect.w, rect.h);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::WindowConfig;

    const VIEWPORT: Viewport = Viewport {
        width: 1280,
        height: 720,
    };

    fn pointer(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    fn open(manager: &mut WindowManager, rect: WindowRect) -> WindowFrame {
        let id = manager.add_window(
            WindowConfig::default()
                .with_rect(rect)
                .with_bounds(WindowBounds::new(300, 200, 800, 600)),
        );
        WindowFrame::attach(manager, id).expect("frame")
    }

    fn stored(manager: &WindowManager, frame: &WindowFrame) -> WindowRect {
        manager.get_window(frame.id()).expect("window").rect
    }

    fn start_rect() -> WindowRect {
        WindowRect {
            x: 100,
            y: 100,
            w: 400,
            h: 300,
        }
    }

    #[test]
    fn attach_rejects_unknown_windows() {
        assert_eq!(WindowFrame::attach(&WindowManager::new(), WindowId(0)), None);
    }

    #[test]
    fn move_follows_the_pointer_and_commits() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.begin_move(&mut manager, pointer(10, 10));
        frame.update_move(&mut manager, pointer(60, 30), VIEWPORT);
        frame.end_move();

        let expected = WindowRect {
            x: 150,
            y: 120,
            ..start_rect()
        };
        assert_eq!(frame.rect(), expected);
        assert_eq!(stored(&manager, &frame), expected);
        assert!(!frame.is_moving());
    }

    #[test]
    fn move_is_clamped_to_the_viewport() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.begin_move(&mut manager, pointer(0, 0));
        frame.update_move(&mut manager, pointer(5_000, -5_000), VIEWPORT);
        assert_eq!(
            stored(&manager, &frame),
            WindowRect {
                x: 880,
                y: 0,
                ..start_rect()
            }
        );
    }

    #[test]
    fn updates_without_a_session_do_nothing() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());
        frame.update_move(&mut manager, pointer(500, 500), VIEWPORT);
        frame.update_resize(&mut manager, pointer(500, 500));
        assert_eq!(stored(&manager, &frame), start_rect());
    }

    #[test]
    fn begin_move_raises_the_window() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());
        let other = manager.add_window(WindowConfig::titled("other"));
        assert_eq!(manager.top_most(), Some(other));

        frame.begin_move(&mut manager, pointer(0, 0));
        assert_eq!(manager.top_most(), Some(frame.id()));
    }

    #[test]
    fn resize_is_clamped_to_the_window_bounds() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.begin_resize(&mut manager, ResizeEdge::SouthEast, pointer(500, 400));
        frame.update_resize(&mut manager, pointer(100, 100));
        let shrunk = stored(&manager, &frame);
        assert_eq!((shrunk.w, shrunk.h), (300, 200));

        frame.update_resize(&mut manager, pointer(5_000, 5_000));
        let grown = stored(&manager, &frame);
        assert_eq!((grown.w, grown.h), (800, 600));
        frame.end_resize();
        assert!(!frame.is_resizing());
    }

    #[test]
    fn clamped_west_resize_keeps_the_right_edge_fixed() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.begin_resize(&mut manager, ResizeEdge::NorthWest, pointer(100, 100));
        frame.update_resize(&mut manager, pointer(450, 350));
        assert_eq!(
            stored(&manager, &frame),
            WindowRect {
                x: 200,
                y: 200,
                w: 300,
                h: 200
            }
        );
    }

    #[test]
    fn maximize_then_restore_returns_the_exact_geometry() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());
        let before = stored(&manager, &frame);

        frame.toggle_maximize(&mut manager, VIEWPORT);
        let window = manager.get_window(frame.id()).expect("window");
        assert!(window.maximized);
        assert_eq!(
            window.rect,
            WindowRect {
                x: 0,
                y: 0,
                w: 800,
                h: 600
            }
        );

        frame.toggle_maximize(&mut manager, VIEWPORT);
        let window = manager.get_window(frame.id()).expect("window");
        assert!(window.is_normal());
        assert_eq!(window.rect, before);
    }

    #[test]
    fn minimize_keeps_geometry_and_the_maximize_snapshot() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.toggle_maximize(&mut manager, VIEWPORT);
        let maximized = stored(&manager, &frame);
        frame.minimize(&mut manager);
        let window = manager.get_window(frame.id()).expect("window");
        assert!(window.minimized && !window.maximized);
        assert_eq!(window.rect, maximized);

        frame.restore(&mut manager);
        assert_eq!(stored(&manager, &frame), start_rect());
        assert!(manager.get_window(frame.id()).expect("window").is_normal());
    }

    #[test]
    fn maximize_after_minimizing_a_maximized_window_keeps_the_first_snapshot() {
        let mut manager = WindowManager::new();
        let mut frame = open(&mut manager, start_rect());

        frame.toggle_maximize(&mut manager, VIEWPORT);
        frame.minimize(&mut manager);
        frame.toggle_maximize(&mut manager, VIEWPORT);
        assert!(manager.get_window(frame.id()).expect("window").maximized);

        frame.toggle_maximize(&mut manager, VIEWPORT);
        assert_eq!(stored(&manager, &frame), start_rect());
        assert!(manager.get_window(frame.id()).expect("window").is_normal());
    }

    #[test]
    fn close_removes_the_window() {
        let mut manager = WindowManager::new();
        let frame = open(&mut manager, start_rect());
        let id = frame.id();
        frame.close(&mut manager);
        assert_eq!(manager.get_window(id), None);
        assert!(manager.layers().is_empty());
    }
}
