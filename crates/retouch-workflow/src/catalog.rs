//! Static registry of the transformations the remote service understands.
//!
//! Each [`TransformationOption`] pairs a stable identifier with a display
//! label, an icon, and the literal operation fragment that gets chained
//! into the request URL. The registry is read-only at runtime.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Icon shown next to a transformation in the tool list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IconTag {
    Eraser,
    Scissors,
    Shadow,
    Sparkles,
    ZoomIn,
    Crop,
    User,
    Copy,
    Palette,
    Edit,
}

impl IconTag {
    /// Kebab-case tag name, matching the serde representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eraser => "eraser",
            Self::Scissors => "scissors",
            Self::Shadow => "shadow",
            Self::Sparkles => "sparkles",
            Self::ZoomIn => "zoom-in",
            Self::Crop => "crop",
            Self::User => "user",
            Self::Copy => "copy",
            Self::Palette => "palette",
            Self::Edit => "edit",
        }
    }
}

impl fmt::Display for IconTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TransformationOption {
    /// Unique identifier used by selections.
    pub id: &'static str,
    /// Human-readable label.
    pub name: &'static str,
    /// Icon shown in the tool list.
    pub icon: IconTag,
    /// Opaque operation fragment understood by the remote service.
    pub operation: &'static str,
}

const fn option(
    id: &'static str,
    name: &'static str,
    icon: IconTag,
    operation: &'static str,
) -> TransformationOption {
    TransformationOption {
        id,
        name,
        icon,
        operation,
    }
}

/// Every transformation the studio offers, in display order.
pub const STANDARD_OPTIONS: [TransformationOption; 10] = [
    option("bg-removal", "Remove Background", IconTag::Eraser, "e-bgremove"),
    option(
        "bg-remove-premium",
        "Premium Background Removal",
        IconTag::Scissors,
        "e-removedotbg",
    ),
    option(
        "bg-remove-shadow",
        "Remove Background + Shadow",
        IconTag::Shadow,
        "e-bgremove:e-dropshadow",
    ),
    option("enhance-basic", "Retouch", IconTag::Sparkles, "e-retouch"),
    option("upscale", "Upscale", IconTag::ZoomIn, "e-upscale"),
    option("smart-crop", "Smart Crop", IconTag::Crop, "w-400,h-400,fo-auto"),
    option("face-crop", "Face Crop", IconTag::User, "w-400,h-400,fo-face"),
    option(
        "resize-optimize",
        "Resize & Optimize",
        IconTag::Edit,
        "w-800,q-80,f-auto",
    ),
    option("variation", "Generate Variation", IconTag::Copy, "e-genvar"),
    option("grayscale", "Grayscale", IconTag::Palette, "e-grayscale"),
];

/// Ids shown in the default tool list.
const FEATURED_IDS: [&str; 6] = [
    "bg-removal",
    "bg-remove-shadow",
    "enhance-basic",
    "smart-crop",
    "face-crop",
    "resize-optimize",
];

/// Read-only view over a static list of transformation options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    options: &'static [TransformationOption],
}

impl Catalog {
    /// The built-in catalog.
    #[must_use]
    pub const fn standard() -> Self {
        Self {
            options: &STANDARD_OPTIONS,
        }
    }

    /// All options, in catalog order.
    #[must_use]
    pub const fn list_all(&self) -> &'static [TransformationOption] {
        self.options
    }

    /// Look up a single option by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&'static TransformationOption> {
        self.options.iter().find(|opt| opt.id == id)
    }

    /// The options shown in the default tool list, in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &'static TransformationOption> {
        self.options
            .iter()
            .filter(|opt| FEATURED_IDS.contains(&opt.id))
    }

    /// Map selected ids to their operation fragments, preserving order.
    ///
    /// Ids with no catalog entry are dropped silently so an outdated
    /// selection can never break URL composition.
    pub fn resolve<I, S>(&self, ids: I) -> Vec<&'static str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .filter_map(|id| self.get(id.as_ref()).map(|opt| opt.operation))
            .collect()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
