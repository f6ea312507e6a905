use std::fmt;

use serde::Serialize;

/// Closed set of waste categories. Every classifier label maps into exactly
/// one of these; anything the table does not know lands on `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum WasteCategory {
    Paper,
    Glass,
    Metal,
    Plastic,
    Organic,
    EWaste,
    Other,
    Unknown,
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WasteCategory::Paper => "Paper Waste",
            WasteCategory::Glass => "Glass Waste",
            WasteCategory::Metal => "Metal Waste",
            WasteCategory::Plastic => "Plastic Waste",
            WasteCategory::Organic => "Organic Waste",
            WasteCategory::EWaste => "E-Waste",
            WasteCategory::Other => "Other Waste",
            WasteCategory::Unknown => "Unknown Waste",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WasteInfo {
    pub category: WasteCategory,
    pub instruction: &'static str,
}

/// Case-insensitive label-to-category mapping. Total: an unrecognized label
/// resolves to `Unknown` with a "check locally" instruction, never an error.
pub fn waste_info(label: &str) -> WasteInfo {
    let (category, instruction) = match label.to_ascii_lowercase().as_str() {
        "cardboard" | "paper" => (WasteCategory::Paper, "Recycle in paper bin."),
        "glass" => (WasteCategory::Glass, "Recycle in glass bin."),
        "metal" => (WasteCategory::Metal, "Recycle in metal bin."),
        "plastic" => (WasteCategory::Plastic, "Recycle in plastic bin."),
        "banana" | "apple" => (WasteCategory::Organic, "Compost in organic bin."),
        "trash" => (WasteCategory::Other, "Dispose responsibly."),
        "battery" => (WasteCategory::EWaste, "Take to e-waste center."),
        _ => (WasteCategory::Unknown, "Check locally."),
    };
    WasteInfo { category, instruction }
}

/// Which household dustbin the category belongs in.
pub fn bin_label(category: WasteCategory) -> &'static str {
    match category {
        WasteCategory::Plastic | WasteCategory::Glass => "Blue Bin",
        WasteCategory::Paper => "Green Bin",
        WasteCategory::Metal => "Yellow Bin",
        WasteCategory::Organic => "Brown Bin",
        WasteCategory::EWaste => "Red Bin",
        WasteCategory::Other => "Black Bin",
        WasteCategory::Unknown => "Check locally",
    }
}

/// Reward for a correctly sorted item. Pure and total: common recyclables
/// earn 10, e-waste 20, residual waste 5, unknown nothing.
pub fn reward_points(category: WasteCategory) -> u32 {
    match category {
        WasteCategory::Paper
        | WasteCategory::Glass
        | WasteCategory::Metal
        | WasteCategory::Plastic
        | WasteCategory::Organic => 10,
        WasteCategory::EWaste => 20,
        WasteCategory::Other => 5,
        WasteCategory::Unknown => 0,
    }
}
