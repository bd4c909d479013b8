//! Built-in asset kinds produced by the resources folder importer

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::storage::AssetError;

/// A text document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextAsset {
    /// File contents as UTF-8
    pub text: String,
}

impl TextAsset {
    /// Create from a string
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Decode from raw bytes
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes are not valid UTF-8
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, AssetError> {
        let text = String::from_utf8(bytes).map_err(|e| AssetError::DecodeError(e.to_string()))?;
        Ok(Self { text })
    }

    /// Raw bytes of the document
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Opaque binary data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryAsset {
    /// File contents
    pub bytes: Vec<u8>,
}

/// A decoded image in RGBA8
#[derive(Debug, Clone)]
pub struct Texture2D {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA8 pixels
    pub pixels: Vec<u8>,
}

impl Texture2D {
    /// Decode an encoded image (PNG, JPEG, BMP)
    ///
    /// # Errors
    ///
    /// Returns an error if the image format is unknown or the data is corrupt
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AssetError> {
        let img =
            image::load_from_memory(bytes).map_err(|e| AssetError::DecodeError(e.to_string()))?;
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        Ok(Self {
            width,
            height,
            pixels: rgba.into_raw(),
        })
    }

    /// Get the RGBA value of a pixel
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        self.pixels.get(i..i + 4).and_then(|p| p.try_into().ok())
    }
}

/// Local placement of a prefab node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    /// Position relative to the parent
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Get the transformation matrix
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// A reusable object tree, stored as RON.
///
/// ```ron
/// (
///     name: "Main Camera",
///     transform: (position: (0.0, 5.0, 10.0)),
///     properties: {"fov": "60"},
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    /// Object name
    pub name: String,
    /// Local transform
    #[serde(default)]
    pub transform: Transform,
    /// Free-form key-value data
    #[serde(default)]
    pub properties: HashMap<String, String>,
    /// Child objects
    #[serde(default)]
    pub children: Vec<Prefab>,
}

impl Prefab {
    /// Create an empty prefab with a name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            properties: HashMap::new(),
            children: Vec::new(),
        }
    }

    /// Parse a prefab from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid prefab
    pub fn from_ron(text: &str) -> Result<Self, AssetError> {
        ron::from_str(text).map_err(|e| AssetError::DecodeError(e.to_string()))
    }

    /// Serialize to pretty RON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_ron(&self) -> Result<String, AssetError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| AssetError::DecodeError(e.to_string()))
    }

    /// Count this node and all of its descendants
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Prefab::node_count).sum::<usize>()
    }
}
