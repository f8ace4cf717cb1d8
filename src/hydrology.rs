//! Pure hydrology derivations for rooftop rainwater harvesting sizing.
//!
//! No I/O here. Everything is deterministic arithmetic over the inputs:
//! rooftop area and material, annual max daily/hourly rainfall, and
//! groundwater depth. Formulas follow standard RWH design practice:
//! runoff volume from rainfall depth times a material coefficient, and
//! peak flow from the Rational method (Q = C·I·A).

use crate::model::round2;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Rooftop material
// ---------------------------------------------------------------------------

/// Rooftop surface category, each with a fixed runoff coefficient.
///
/// Parsing is total: any string maps to a category, with `Other` as the
/// fallback for unrecognized materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoofMaterial {
    /// Concrete / RCC slab. C = 0.9.
    Concrete,
    /// Clay or cement tiles. C = 0.8.
    Tile,
    /// Metal sheet. C = 0.85.
    Metal,
    /// Corrugated sheet. C = 0.8.
    Corrugated,
    /// Asbestos sheet. C = 0.75.
    Asbestos,
    /// Paved or stone surface. C = 0.7.
    Paved,
    /// Green / garden roof. C = 0.5.
    Green,
    /// Unpaved surface. C = 0.4.
    Unpaved,
    /// Anything else. C = 0.8.
    Other,
}

impl RoofMaterial {
    /// Maps free-text input to a category, case- and whitespace-insensitive.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "concrete" | "rcc" | "reinforced_concrete" => RoofMaterial::Concrete,
            "tile" | "tiles" => RoofMaterial::Tile,
            "metal" => RoofMaterial::Metal,
            "corrugated" => RoofMaterial::Corrugated,
            "asbestos" => RoofMaterial::Asbestos,
            "paved" | "stone" => RoofMaterial::Paved,
            "green" | "garden" => RoofMaterial::Green,
            "unpaved" => RoofMaterial::Unpaved,
            _ => RoofMaterial::Other,
        }
    }

    /// Fraction of incident rainfall that becomes runoff for this surface.
    pub fn runoff_coefficient(self) -> f64 {
        match self {
            RoofMaterial::Concrete => 0.9,
            RoofMaterial::Tile => 0.8,
            RoofMaterial::Metal => 0.85,
            RoofMaterial::Corrugated => 0.8,
            RoofMaterial::Asbestos => 0.75,
            RoofMaterial::Paved => 0.7,
            RoofMaterial::Green => 0.5,
            RoofMaterial::Unpaved => 0.4,
            RoofMaterial::Other => 0.8,
        }
    }
}

// ---------------------------------------------------------------------------
// Runoff calculation
// ---------------------------------------------------------------------------

/// Intermediate and final values of the runoff derivation, kept together
/// so the endpoint can expose the full working in the response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunoffCalculation {
    pub runoff_coefficient: f64,
    pub rainfall_depth_m_from_max_daily: f64,
    pub runoff_depth_m: f64,
    pub runoff_volume_m3: f64,
    pub i_mm_per_hr_from_max_hourly: f64,
    pub i_m_per_hr_from_max_hourly: f64,
    pub q_cia_m3_per_hr: f64,
}

/// Derives runoff volume and Rational-method peak flow from the annual
/// rainfall maxima and rooftop attributes.
pub fn runoff(
    area_m2: f64,
    material: RoofMaterial,
    max_daily_mm: f64,
    max_hourly_mm: f64,
) -> RunoffCalculation {
    let c = material.runoff_coefficient();

    let rainfall_depth_m = max_daily_mm / 1000.0;
    let runoff_depth_m = c * rainfall_depth_m;
    let runoff_volume_m3 = runoff_depth_m * area_m2;

    let i_m_per_hr = max_hourly_mm / 1000.0;
    let q_cia_m3_per_hr = c * i_m_per_hr * area_m2;

    RunoffCalculation {
        runoff_coefficient: c,
        rainfall_depth_m_from_max_daily: rainfall_depth_m,
        runoff_depth_m,
        runoff_volume_m3,
        i_mm_per_hr_from_max_hourly: max_hourly_mm,
        i_m_per_hr_from_max_hourly: i_m_per_hr,
        q_cia_m3_per_hr,
    }
}

// ---------------------------------------------------------------------------
// Design category
// ---------------------------------------------------------------------------

/// Recommended structure mix, selected by groundwater depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesignCategory {
    /// d <= 3 m bgl: groundwater too shallow for recharge, store only.
    StorageOnly,
    /// 3 < d < 10 m bgl.
    RechargePitWithStorage,
    /// d >= 10 m bgl.
    RechargePitStorageAndTrench,
}

impl DesignCategory {
    /// Selects the category for a groundwater depth in meters bgl.
    pub fn for_depth(depth_m_bgl: f64) -> Self {
        if depth_m_bgl <= 3.0 {
            DesignCategory::StorageOnly
        } else if depth_m_bgl < 10.0 {
            DesignCategory::RechargePitWithStorage
        } else {
            DesignCategory::RechargePitStorageAndTrench
        }
    }

    pub fn components(self) -> &'static [&'static str] {
        match self {
            DesignCategory::StorageOnly => &["storage_tank"],
            DesignCategory::RechargePitWithStorage => &["recharge_pit", "storage_tank"],
            DesignCategory::RechargePitStorageAndTrench => {
                &["recharge_pit", "storage_tank", "recharge_trench"]
            }
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DesignCategory::StorageOnly => {
                "Storage only (rainwater harvesting tank). Groundwater is shallow (0-3 m bgl)."
            }
            DesignCategory::RechargePitWithStorage => {
                "Recharge pit + storage tank (depth between 3-10 m bgl)."
            }
            DesignCategory::RechargePitStorageAndTrench => {
                "Recharge pit + storage tank + recharge trench (depth >= 10 m bgl)."
            }
        }
    }
}

/// Artificial recharge is considered feasible when the water table sits
/// deeper than 3 m bgl.
pub fn recharge_feasible(depth_m_bgl: f64) -> bool {
    depth_m_bgl > 3.0
}

// ---------------------------------------------------------------------------
// Pit sizing
// ---------------------------------------------------------------------------

/// Suggested rectangular recharge pit dimensions, L:B = 2:1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PitDimensions {
    pub length_m: f64,
    pub breadth_m: f64,
    pub depth_m: f64,
}

/// Sizes a rectangular recharge pit for the given volume.
///
/// Depth is one of three fixed classes by volume (<=10 m3 -> 2.0 m,
/// <=50 m3 -> 3.0 m, beyond -> 4.0 m); length and breadth follow from
/// the L:B = 2:1 footprint and are rounded to 2 decimals. Returns `None`
/// for non-positive volumes, where no pit is needed.
pub fn pit_dimensions(volume_m3: f64) -> Option<PitDimensions> {
    if volume_m3 <= 0.0 {
        return None;
    }

    let depth = if volume_m3 <= 10.0 {
        2.0
    } else if volume_m3 <= 50.0 {
        3.0
    } else {
        4.0
    };

    let area = volume_m3 / depth;
    let breadth = (area / 2.0).sqrt();
    let length = 2.0 * breadth;

    Some(PitDimensions {
        length_m: round2(length),
        breadth_m: round2(breadth),
        depth_m: depth,
    })
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// Complete design recommendation for one rooftop.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignRecommendation {
    pub category: DesignCategory,
    pub recharge_pit_volume_m3: f64,
    pub pit: Option<PitDimensions>,
    pub feasible: bool,
}

/// Combines depth-class selection, pit volume, and pit sizing. The pit
/// volume is taken equal to the total runoff volume whenever a recharge
/// pit is part of the design, and zero otherwise.
pub fn recommend(depth_m_bgl: f64, runoff_volume_m3: f64) -> DesignRecommendation {
    let category = DesignCategory::for_depth(depth_m_bgl);
    let recharge_pit_volume_m3 = match category {
        DesignCategory::StorageOnly => 0.0,
        _ => runoff_volume_m3,
    };

    DesignRecommendation {
        category,
        recharge_pit_volume_m3,
        pit: pit_dimensions(recharge_pit_volume_m3),
        feasible: recharge_feasible(depth_m_bgl),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
