//! OpenGL version detection

use glow::{Context, HasContext};

/// OpenGL version information
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u32,
    pub minor: u32,
    pub is_es: bool,
}

impl GlVersion {
    /// Read the OpenGL version from the current context
    pub fn read(gl: &Context) -> Self {
        let version_string = unsafe { gl.get_parameter_string(glow::VERSION) };
        Self::parse(&version_string)
    }

    /// Parse a `GL_VERSION` string.
    ///
    /// Examples: `"4.6.0 NVIDIA 460.89"`, `"OpenGL ES 3.0 Mesa 23.1"`,
    /// `"WebGL 2.0 (OpenGL ES 3.0 Chromium)"`.
    pub fn parse(version_string: &str) -> Self {
        let is_es = version_string.contains("OpenGL ES") || version_string.contains("WebGL");

        let (major, minor) = if version_string.contains("WebGL 2.0") {
            (3, 0)
        } else if version_string.contains("WebGL 1.0") {
            (2, 0)
        } else {
            let fallback = if is_es { (2, 0) } else { (2, 1) };
            Self::parse_version_numbers(version_string).unwrap_or(fallback)
        };

        Self {
            major,
            minor,
            is_es,
        }
    }

    fn parse_version_numbers(version_string: &str) -> Option<(u32, u32)> {
        version_string.split_whitespace().find_map(|word| {
            let mut parts = word.split('.');
            let major = parts.next()?.parse::<u32>().ok()?;
            let minor = parts.next()?.parse::<u32>().ok()?;
            Some((major, minor))
        })
    }

    /// OpenGL 3.0+ or OpenGL ES 3.0+
    pub fn vertex_array_support(self) -> bool {
        self.major >= 3
    }

    /// `glPolygonMode` is desktop only
    pub fn polygon_mode_support(self) -> bool {
        !self.is_es
    }

    /// `#version` line for the shaders
    pub fn glsl_header(self) -> &'static str {
        if self.is_es {
            if self.major >= 3 {
                "#version 300 es\nprecision mediump float;"
            } else {
                "#version 100\nprecision mediump float;"
            }
        } else if self.major > 3 || (self.major == 3 && self.minor >= 3) {
            "#version 330 core"
        } else if self.major == 3 {
            "#version 130"
        } else {
            "#version 120"
        }
    }

    /// Whether the shaders use `attribute`/`varying` instead of `in`/`out`
    pub fn legacy_glsl(self) -> bool {
        self.major < 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_desktop_versions() {
        assert_eq!(
            GlVersion::parse("4.6.0 NVIDIA 460.89"),
            GlVersion {
                major: 4,
                minor: 6,
                is_es: false
            }
        );
        assert_eq!(GlVersion::parse("2.1 Metal - 88").major, 2);
    }

    #[test]
    fn parses_es_and_webgl() {
        let es = GlVersion::parse("OpenGL ES 3.2 Mesa 23.1.0");
        assert!(es.is_es);
        assert_eq!((es.major, es.minor), (3, 2));

        let webgl = GlVersion::parse("WebGL 2.0 (OpenGL ES 3.0 Chromium)");
        assert!(webgl.is_es);
        assert_eq!((webgl.major, webgl.minor), (3, 0));
    }

    #[test]
    fn unknown_strings_fall_back_to_the_oldest_supported_version() {
        assert_eq!(GlVersion::parse("garbage").major, 2);
        assert!(GlVersion::parse("OpenGL ES garbage").is_es);
    }

    #[test]
    fn glsl_header_matches_version() {
        assert_eq!(GlVersion::parse("3.3.0").glsl_header(), "#version 330 core");
        assert_eq!(GlVersion::parse("3.1.0").glsl_header(), "#version 130");
        assert_eq!(GlVersion::parse("2.1").glsl_header(), "#version 120");
        assert!(GlVersion::parse("OpenGL ES 3.0").glsl_header().starts_with("#version 300 es"));
        assert!(GlVersion::parse("3.0").polygon_mode_support());
        assert!(!GlVersion::parse("OpenGL ES 3.0").polygon_mode_support());
    }
}
