//! Mesh-per-draw-call renderer backend for Dear ImGui
//!
//! This crate renders Dear ImGui draw data on top of a retained renderer that
//! only exposes a handful of low-level primitives: open a 2D scope, set blend
//! and scissor state, upload a mesh, draw it, free it. Every draw command is
//! turned into one transient mesh that is uploaded, drawn and released before
//! the next command is processed.
//!
//! # Features
//!
//! - **Device seam**: the [`RenderDevice`] trait describes the primitives the
//!   renderer needs, so any retained renderer can host the UI
//! - **Scoped resources**: transient meshes and the 2D scope are guards that
//!   release on every exit path
//! - **Texture slots**: the font atlas and user textures are tracked as
//!   tagged slots keyed by [`TextureId`](dear_imgui_rs::TextureId)
//! - **OpenGL device**: [`GlowDevice`] implements the seam over `glow`
//!   (feature `glow`, enabled by default)
//!
//! # Example
//!
//! ```rust,no_run
//! use dear_imgui_rs::Context;
//! use dear_imgui_mesh::{GlTexture, GlowDevice, MeshRenderer};
//! use std::rc::Rc;
//!
//! let gl = unsafe { dear_imgui_mesh::glow::Context::from_loader_function(|_| std::ptr::null()) };
//! let mut device = GlowDevice::new(Rc::new(gl)).unwrap();
//! let mut imgui = Context::create();
//! let mut renderer = MeshRenderer::<GlTexture>::new();
//! renderer.configure_context(&mut imgui);
//!
//! // In your render loop:
//! // let ui = imgui.frame();
//! // ... build your UI ...
//! // let draw_data = imgui.render();
//! // renderer.render(&mut device, draw_data).unwrap();
//! ```

mod clip;
mod device;
mod draw_list;
mod error;
mod mesh;
mod renderer;
mod texture;

#[cfg(feature = "glow")]
mod gl_device;

#[cfg(test)]
mod test_util;

pub use clip::*;
pub use device::*;
pub use draw_list::*;
pub use error::*;
pub use mesh::*;
pub use renderer::*;
pub use texture::*;

#[cfg(feature = "glow")]
pub use gl_device::{GlMesh, GlTexture, GlVersion, GlowDevice};

// Re-export glow to make it easier for users to use the correct version.
#[cfg(feature = "glow")]
pub use glow;
