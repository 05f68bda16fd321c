use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_WINDOW_WIDTH: i32 = 400;
pub const DEFAULT_WINDOW_HEIGHT: i32 = 300;
pub const DEFAULT_MIN_WINDOW_WIDTH: i32 = 300;
pub const DEFAULT_MIN_WINDOW_HEIGHT: i32 = 200;
/// Upper bound used when a window has no maximum size.
pub const UNBOUNDED: i32 = i32::MAX;
pub const DEFAULT_WINDOW_X: i32 = 100;
pub const DEFAULT_WINDOW_Y: i32 = 100;
pub const DEFAULT_WINDOW_TITLE: &str = "My window";
pub const DEFAULT_WINDOW_ICON: &str = "/defaultWindowIcon.webp";

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub u64);

impl WindowId {
    /// Allocates an id that is unique for the lifetime of the process.
    pub fn next() -> Self {
        Self(NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl WindowRect {
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
            ..self
        }
    }

    pub fn right(self) -> i32 {
        self.x.saturating_add(self.w)
    }

    pub fn bottom(self) -> i32 {
        self.y.saturating_add(self.h)
    }
}

impl Default for WindowRect {
    fn default() -> Self {
        Self {
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
            w: DEFAULT_WINDOW_WIDTH,
            h: DEFAULT_WINDOW_HEIGHT,
        }
    }
}

/// Size limits fixed when a window is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowBounds {
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
}

impl WindowBounds {
    /// Builds bounds, lifting each maximum to at least its minimum.
    pub fn new(min_width: i32, min_height: i32, max_width: i32, max_height: i32) -> Self {
        let min_width = min_width.max(0);
        let min_height = min_height.max(0);
        Self {
            min_width,
            min_height,
            max_width: max_width.max(min_width),
            max_height: max_height.max(min_height),
        }
    }

    pub fn contains_size(self, w: i32, h: i32) -> bool {
        (self.min_width..=self.max_width).contains(&w)
            && (self.min_height..=self.max_height).contains(&h)
    }
}

impl Default for WindowBounds {
    fn default() -> Self {
        Self::new(
            DEFAULT_MIN_WINDOW_WIDTH,
            DEFAULT_MIN_WINDOW_HEIGHT,
            UNBOUNDED,
            UNBOUNDED,
        )
    }
}

/// Values applied to every [`WindowConfig`] field a caller leaves unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowDefaults {
    pub width: i32,
    pub height: i32,
    pub min_width: i32,
    pub min_height: i32,
    pub max_width: i32,
    pub max_height: i32,
    pub x: i32,
    pub y: i32,
    pub title: String,
    pub icon_src: String,
}

impl Default for WindowDefaults {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            min_width: DEFAULT_MIN_WINDOW_WIDTH,
            min_height: DEFAULT_MIN_WINDOW_HEIGHT,
            max_width: UNBOUNDED,
            max_height: UNBOUNDED,
            x: DEFAULT_WINDOW_X,
            y: DEFAULT_WINDOW_Y,
            title: DEFAULT_WINDOW_TITLE.to_string(),
            icon_src: DEFAULT_WINDOW_ICON.to_string(),
        }
    }
}

/// Request to open a window. Unset fields fall back to [`WindowDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WindowConfig {
    pub title: Option<String>,
    pub icon_src: Option<String>,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub min_width: Option<i32>,
    pub min_height: Option<i32>,
    pub max_width: Option<i32>,
    pub max_height: Option<i32>,
    /// Opens minimized. Ignored when `maximized` is also set.
    pub minimized: Option<bool>,
    pub maximized: Option<bool>,
    pub args: Value,
}

impl WindowConfig {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_rect(mut self, rect: WindowRect) -> Self {
        self.x = Some(rect.x);
        self.y = Some(rect.y);
        self.width = Some(rect.w);
        self.height = Some(rect.h);
        self
    }

    pub fn with_bounds(mut self, bounds: WindowBounds) -> Self {
        self.min_width = Some(bounds.min_width);
        self.min_height = Some(bounds.min_height);
        self.max_width = Some(bounds.max_width);
        self.max_height = Some(bounds.max_height);
        self
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }
}

/// One open window. Stacking order is kept by the manager, not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowState {
    pub id: WindowId,
    pub title: String,
    pub icon_src: String,
    pub rect: WindowRect,
    pub bounds: WindowBounds,
    pub minimized: bool,
    pub maximized: bool,
    #[serde(default)]
    pub args: Value,
}

impl WindowState {
    pub fn is_normal(&self) -> bool {
        !self.minimized && !self.maximized
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

/// Visible desktop area that windows are kept inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    fn moves_left_edge(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    fn moves_top_edge(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    /// Keeps the edge opposite the dragged one fixed when `resized` had its size clamped.
    pub(crate) fn anchor(self, start: WindowRect, resized: WindowRect) -> WindowRect {
        WindowRect {
            x: if self.moves_left_edge() {
                start.right() - resized.w
            } else {
                resized.x
            },
            y: if self.moves_top_edge() {
                start.bottom() - resized.h
            } else {
                resized.y
            },
            ..resized
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub rect_start: WindowRect,
}
