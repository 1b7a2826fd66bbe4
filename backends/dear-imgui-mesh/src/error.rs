//! Error types for the mesh renderer and its devices

use thiserror::Error;

/// Errors that can occur while creating a device
#[derive(Error, Debug)]
pub enum InitError {
    /// Failed to create a GPU buffer object
    #[error("Failed to create buffer object: {0}")]
    CreateBufferObject(String),

    /// Failed to create the default texture
    #[error("Failed to create texture: {0}")]
    CreateTexture(String),

    /// Failed to create a shader object
    #[error("Failed to create shader: {0}")]
    CreateShader(String),

    /// Failed to compile a shader stage
    #[error("Failed to compile shader: {0}")]
    CompileShader(String),

    /// Failed to link the shader program
    #[error("Failed to link program: {0}")]
    LinkProgram(String),

    /// A required vertex attribute is missing from the linked program
    #[error("Missing vertex attribute: {0}")]
    MissingAttribute(&'static str),
}

/// Errors that can occur during rendering
#[derive(Error, Debug)]
pub enum RenderError {
    /// Mesh allocation or upload failed
    #[error("Mesh upload failed: {0}")]
    MeshUpload(String),

    /// Attribute streams handed to the stager differ in length
    #[error("Mesh attribute streams differ in length (positions {positions}, texcoords {texcoords}, colors {colors})")]
    MismatchedStreams {
        positions: usize,
        texcoords: usize,
        colors: usize,
    },

    /// Texture creation or upload failed
    #[error("Texture upload failed: {0}")]
    TextureUpload(String),

    /// Texture pixel data does not match its declared size
    #[error("Invalid texture: {0}")]
    InvalidTexture(String),
}

/// Result type for device creation
pub type InitResult<T> = Result<T, InitError>;

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
