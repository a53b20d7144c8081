pub mod braille;
pub mod canvas;
pub mod color;
pub mod halfblock;
pub mod terminal;

pub use canvas::{Canvas, Dimensions};
pub use color::{ColorMode, hsl, mix};
pub use terminal::{ColorDepth, RenderMode, encode};
