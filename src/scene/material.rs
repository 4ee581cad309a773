use std::borrow::Cow;

use glam::Vec4;

/// Surface description shared by one or more nodes.
///
/// Only the state the animation core mutates (opacity / transparency) and
/// what the loader reads from the asset is modelled here.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: Cow<'static, str>,
    pub color: Vec4,
    opacity: f32,
    /// Alpha blending requested by the asset, independent of any fade.
    blend: bool,
    pub transparent: bool,
    version: u64,
}

impl Material {
    #[must_use]
    pub fn new(color: Vec4) -> Self {
        Self {
            name: Cow::Borrowed(""),
            color,
            opacity: 1.0,
            blend: false,
            transparent: color.w < 1.0,
            version: 0,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Marks the material as alpha blended regardless of opacity.
    #[must_use]
    pub fn with_blend(mut self, blend: bool) -> Self {
        self.blend = blend;
        self.transparent = self.transparent || blend;
        self
    }

    #[inline]
    #[must_use]
    pub fn blend(&self) -> bool {
        self.blend
    }

    #[inline]
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Sets opacity in `[0, 1]`; the material becomes transparent below 1.
    pub fn set_opacity(&mut self, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity == self.opacity {
            return;
        }
        self.opacity = opacity;
        self.transparent = self.blend || opacity < 1.0 || self.color.w < 1.0;
        self.version = self.version.wrapping_add(1);
    }

    /// Bumped on every effective change, for renderer-side dirty tracking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec4::ONE)
    }
}
