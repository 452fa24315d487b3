use crate::domain::SlotSize;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// SlotHandle
/// Opaque identity of a slot created by the ad SDK.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("slot#{_0}")]
pub struct SlotHandle(pub u64);

///
/// SlotDefinition
/// Static configuration for one placement key.
///

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SlotDefinition {
    pub placement_key: String,
    pub ad_unit_path: String,
    pub sizes: Vec<SlotSize>,
}

///
/// SlotInstance
/// A live SDK slot bound to one container.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotInstance {
    pub container_id: String,
    pub handle: SlotHandle,
    pub last_served_size: Option<SlotSize>,
    pub displayed: bool,
}

///
/// SlotInfo
/// What the SDK reports for each slot it currently knows about.
/// Out-of-page slots have no container id.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SlotInfo {
    pub handle: SlotHandle,
    pub container_id: Option<String>,
}

///
/// RenderEvent
/// Render-completion notification for a single slot.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderEvent {
    pub slot: SlotHandle,
    pub is_empty: bool,
    pub size: Option<SlotSize>,
}

///
/// OutOfPageKind
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[remain::sorted]
pub enum OutOfPageKind {
    Anchor,
    Interstitial,
}

///
/// AnchorPosition
///

#[derive(Clone, Copy, Debug, Default, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorPosition {
    #[default]
    Bottom,
    Top,
}

///
/// OutOfPageFormat
/// Concrete out-of-page format requested from the SDK.
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum OutOfPageFormat {
    Interstitial,
    #[display("anchor({_0})")]
    Anchor(AnchorPosition),
}
