pub mod app;
pub mod camera;
pub mod config;
pub mod controls;
pub mod error;
pub mod framebuffer;
pub mod material;
pub mod rasterizer;
pub mod renderer;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex;

pub use error::{Error, Result};
