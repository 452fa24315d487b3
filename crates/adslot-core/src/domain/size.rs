use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

const FLUID_KEYWORD: &str = "fluid";

///
/// PixelSize
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[display("{width}x{height}")]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// A `[0, 0]` size is how the SDK reports "nothing was served".
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

///
/// SlotSize
///
/// Either a concrete creative size or the fluid marker, where the ad network
/// decides the final box to fit the container.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SlotSizeRepr", into = "SlotSizeRepr")]
pub enum SlotSize {
    Pixel(PixelSize),
    Fluid,
}

impl SlotSize {
    #[must_use]
    pub const fn pixel(width: u32, height: u32) -> Self {
        Self::Pixel(PixelSize::new(width, height))
    }

    #[must_use]
    pub const fn as_pixel(self) -> Option<PixelSize> {
        match self {
            Self::Pixel(size) => Some(size),
            Self::Fluid => None,
        }
    }

    #[must_use]
    pub const fn is_fluid(self) -> bool {
        matches!(self, Self::Fluid)
    }
}

impl fmt::Display for SlotSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixel(size) => write!(f, "{size}"),
            Self::Fluid => f.write_str(FLUID_KEYWORD),
        }
    }
}

///
/// SlotSizeRepr
/// Config-facing shape: `[300, 250]` or `"fluid"`.
///

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum SlotSizeRepr {
    Pair([u32; 2]),
    Keyword(String),
}

impl TryFrom<SlotSizeRepr> for SlotSize {
    type Error = String;

    fn try_from(repr: SlotSizeRepr) -> Result<Self, Self::Error> {
        match repr {
            SlotSizeRepr::Pair([width, height]) => Ok(Self::pixel(width, height)),
            SlotSizeRepr::Keyword(word) if word.eq_ignore_ascii_case(FLUID_KEYWORD) => {
                Ok(Self::Fluid)
            }
            SlotSizeRepr::Keyword(word) => Err(format!(
                "unknown size keyword '{word}' (expected [w, h] or \"{FLUID_KEYWORD}\")"
            )),
        }
    }
}

impl From<SlotSize> for SlotSizeRepr {
    fn from(size: SlotSize) -> Self {
        match size {
            SlotSize::Pixel(PixelSize { width, height }) => Self::Pair([width, height]),
            SlotSize::Fluid => Self::Keyword(FLUID_KEYWORD.to_string()),
        }
    }
}

///
/// SizeMappingEntry
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SizeMappingEntry {
    pub viewport: PixelSize,
    pub sizes: Vec<SlotSize>,
}

///
/// SizeMapping
///
/// Responsive size mapping handed to the SDK. The fluid marker cannot be
/// expressed as a literal pixel pair at define time, so any size list that
/// contains it is carried through a mapping that applies from a `0x0`
/// viewport upward.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SizeMapping {
    pub entries: Vec<SizeMappingEntry>,
}

impl SizeMapping {
    /// Build the mapping needed for `sizes`, or `None` when plain pixel
    /// sizes are enough.
    #[must_use]
    pub fn for_sizes(sizes: &[SlotSize]) -> Option<Self> {
        if !sizes.iter().any(|size| size.is_fluid()) {
            return None;
        }

        Some(Self {
            entries: vec![SizeMappingEntry {
                viewport: PixelSize::new(0, 0),
                sizes: sizes.to_vec(),
            }],
        })
    }
}

/// Pixel sizes from a mixed list, in declaration order.
#[must_use]
pub fn pixel_sizes(sizes: &[SlotSize]) -> Vec<PixelSize> {
    sizes.iter().filter_map(|size| size.as_pixel()).collect()
}

///
/// TESTS
///
