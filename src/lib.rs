// Tile Scroll Library
// Bidirectional vertical tile scroller over a circular bitplane buffer

// Public modules
pub mod app;
pub mod assets;
pub mod display;
pub mod input;
pub mod scroller;
pub mod sync;

// Re-export main types for convenience
pub use app::{AppConfig, AppError, Session};
pub use assets::{AssetError, LevelMap, TileSheet};
pub use display::{DisplayGeometry, DisplayMode, OutputDevice, Palette, Screen};
pub use input::{CancelFlag, InputDispatcher, InputEvent};
pub use scroller::{ClampMode, Direction, ScrollError, Scroller, ScrollerConfig, TickReport};
pub use sync::{FrameSync, RefreshCounter, VirtualBeam};
