//! Linear unit conversions for the DOCX coordinate space.
//!
//! Word measures margins, indents and spacing in twips (twentieths of a
//! point); style configuration uses millimeters for page geometry and
//! points for font-relative values.

pub const TWIPS_PER_POINT: f64 = 20.0;
pub const EMU_PER_TWIP: i64 = 635;

const TWIPS_PER_MM: f64 = 56.7;

pub fn mm_to_twip(mm: f64) -> i64 {
    (mm * TWIPS_PER_MM).round() as i64
}

pub fn twip_to_mm(twip: i64) -> f64 {
    ((twip as f64 / TWIPS_PER_MM) * 100.0).round() / 100.0
}

pub fn pt_to_twip(pt: f64) -> i64 {
    (pt * TWIPS_PER_POINT).round() as i64
}

pub fn twip_to_emu(twip: i64) -> i64 {
    twip * EMU_PER_TWIP
}

/// Half-points, the unit `w:sz` uses for font sizes.
pub fn pt_to_half_points(pt: f64) -> i64 {
    (pt * 2.0).round() as i64
}
