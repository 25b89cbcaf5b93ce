//! Crop label and cultivation tip tables
//!
//! The classifier emits an integer class id. The mapping from id to crop is
//! closed and static; ids outside it mean "no suitable crop", not a failure.

use serde::Serialize;

/// One entry of the crop table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CropLabel {
    pub id: i64,
    pub name: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<&'static str>,
}

impl CropLabel {
    const fn new(id: i64, name: &'static str, emoji: Option<&'static str>) -> Self {
        Self { id, name, emoji }
    }

    /// Name with its decorative suffix, e.g. "Rice 🌾".
    pub fn display(&self) -> String {
        match self.emoji {
            Some(emoji) => format!("{} {}", self.name, emoji),
            None => self.name.to_string(),
        }
    }
}

/// Class id → crop, ids 1..=22.
pub const CROP_TABLE: [CropLabel; 22] = [
    CropLabel::new(1, "Rice", Some("🌾")),
    CropLabel::new(2, "Maize", Some("🌽")),
    CropLabel::new(3, "Jute", None),
    CropLabel::new(4, "Cotton", None),
    CropLabel::new(5, "Coconut", Some("🥥")),
    CropLabel::new(6, "Papaya", Some("🍈")),
    CropLabel::new(7, "Orange", Some("🍊")),
    CropLabel::new(8, "Apple", Some("🍎")),
    CropLabel::new(9, "Muskmelon", None),
    CropLabel::new(10, "Watermelon", Some("🍉")),
    CropLabel::new(11, "Grapes", Some("🍇")),
    CropLabel::new(12, "Mango", Some("🥭")),
    CropLabel::new(13, "Banana", Some("🍌")),
    CropLabel::new(14, "Pomegranate", None),
    CropLabel::new(15, "Lentil", None),
    CropLabel::new(16, "Blackgram", None),
    CropLabel::new(17, "Mungbean", None),
    CropLabel::new(18, "Mothbeans", None),
    CropLabel::new(19, "Pigeonpeas", None),
    CropLabel::new(20, "Kidneybeans", None),
    CropLabel::new(21, "Chickpea", None),
    CropLabel::new(22, "Coffee", Some("☕")),
];

/// Fallback when a crop has no dedicated tip.
pub const DEFAULT_TIP: &str =
    "Follow local agricultural guidance for sowing dates, spacing and fertilizer rates.";

pub fn lookup_crop(id: i64) -> Option<&'static CropLabel> {
    CROP_TABLE.iter().find(|c| c.id == id)
}

/// Dedicated tip for a crop, if one exists. Only a few crops have one.
pub fn cultivation_tip(name: &str) -> Option<&'static str> {
    match name {
        "Rice" => Some("Keep fields flooded 5-10 cm deep during vegetative growth and drain before harvest."),
        "Maize" => Some("Plant in well-drained soil and side-dress with nitrogen at knee height."),
        "Cotton" => Some("Needs a long frost-free season; avoid waterlogging during boll formation."),
        "Banana" => Some("Mulch heavily and keep soil moist; protect plants from strong winds."),
        "Coffee" => Some("Grow under partial shade and keep soil slightly acidic (pH 6-6.5)."),
        _ => None,
    }
}

pub fn tip_or_default(name: &str) -> &'static str {
    cultivation_tip(name).unwrap_or(DEFAULT_TIP)
}
