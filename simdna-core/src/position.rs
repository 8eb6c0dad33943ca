//! Strategies for choosing where in a background an item starts.

use rand::RngCore;
use rand_distr::{Distribution, Normal};
use serde_json::{Value, json};
use tracing::warn;

use crate::consts::RETRY_WARNING_INTERVAL;
use crate::errors::SimdnaError;
use crate::models::AdditionalInfo;
use crate::utils::uniform;

pub trait PositionGenerator {
    fn name(&self) -> &str;

    /// Draw a start offset in `0..=len_background - len_item`.
    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError>;

    fn to_json(&self) -> Value;

    /// Like [`PositionGenerator::sample_pos`], recording the generator's
    /// name in `info` when one is given.
    fn generate_pos(
        &self,
        len_background: usize,
        len_item: usize,
        info: Option<&mut AdditionalInfo>,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        if let Some(info) = info {
            info.update_trace(self.name());
        }
        self.sample_pos(len_background, len_item, rng)
    }
}

///
/// Uniformly pick an offset at which an item of length `item_len` fits
/// inside a region of length `region_len`.
///
pub fn sample_index_within_region(
    region_len: usize,
    item_len: usize,
    rng: &mut dyn RngCore,
) -> Result<usize, SimdnaError> {
    if item_len > region_len {
        return Err(SimdnaError::ItemTooLong {
            item_len,
            region_len,
        });
    }
    let choices = region_len - item_len + 1;
    Ok(((uniform(rng) * choices as f64) as usize).min(choices - 1))
}

pub struct UniformPositionGenerator {
    name: String,
}

impl UniformPositionGenerator {
    pub fn new() -> Self {
        UniformPositionGenerator {
            name: "UniformPositionGenerator".to_string(),
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Default for UniformPositionGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionGenerator for UniformPositionGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        sample_index_within_region(len_background, len_item, rng)
    }

    fn to_json(&self) -> Value {
        Value::from("uniform")
    }
}

/// Positions restricted to the `central_bp` wide window in the middle of the
/// background. The window starts at `len_background / 2 - central_bp / 2`.
pub struct InsideCentralBp {
    name: String,
    central_bp: usize,
}

impl InsideCentralBp {
    pub fn new(central_bp: usize) -> Self {
        InsideCentralBp {
            name: "InsideCentralBp".to_string(),
            central_bp,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl PositionGenerator for InsideCentralBp {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        if len_background < self.central_bp {
            return Err(SimdnaError::BackgroundTooShort {
                background_len: len_background,
                central_bp: self.central_bp,
            });
        }
        let start_of_region = len_background / 2 - self.central_bp / 2;
        Ok(start_of_region + sample_index_within_region(self.central_bp, len_item, rng)?)
    }

    fn to_json(&self) -> Value {
        Value::from(format!("insideCentral-{}", self.central_bp))
    }
}

/// Positions in either flank outside the central `central_bp` window. Each
/// call picks a flank with equal probability; the left flank gets the extra
/// base when the flanks differ in length.
pub struct OutsideCentralBp {
    name: String,
    central_bp: usize,
}

impl OutsideCentralBp {
    pub fn new(central_bp: usize) -> Self {
        OutsideCentralBp {
            name: "OutsideCentralBp".to_string(),
            central_bp,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl PositionGenerator for OutsideCentralBp {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        if len_background < self.central_bp {
            return Err(SimdnaError::BackgroundTooShort {
                background_len: len_background,
                central_bp: self.central_bp,
            });
        }
        let outside = len_background - self.central_bp;
        let left = uniform(rng) > 0.5;
        let (region_start, region_len) = if left {
            (0, outside.div_ceil(2))
        } else {
            (outside.div_ceil(2) + self.central_bp, outside / 2)
        };
        Ok(region_start + sample_index_within_region(region_len, len_item, rng)?)
    }

    fn to_json(&self) -> Value {
        Value::from(format!("outsideCentral-{}", self.central_bp))
    }
}

pub struct FixedPositionGenerator {
    name: String,
    pos: usize,
}

impl FixedPositionGenerator {
    pub fn new(pos: usize) -> Self {
        FixedPositionGenerator {
            name: "FixedPositionGenerator".to_string(),
            pos,
        }
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl PositionGenerator for FixedPositionGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        _rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        if self.pos + len_item > len_background {
            return Err(SimdnaError::PositionOutOfRange {
                pos: self.pos,
                item_len: len_item,
                background_len: len_background,
            });
        }
        Ok(self.pos)
    }

    fn to_json(&self) -> Value {
        Value::from(format!("fixed{}", self.pos))
    }
}

///
/// Positions drawn from a normal distribution centered at
/// `(len_background - len_item) / 2 + offset_from_center`.
///
/// Draws outside the valid range are discarded and redrawn without limit,
/// with a warning every [`RETRY_WARNING_INTERVAL`] attempts.
///
pub struct NormalDistributionPositionGenerator {
    name: String,
    std_in_bp: f64,
    offset_from_center: f64,
}

impl NormalDistributionPositionGenerator {
    pub fn new(std_in_bp: f64, offset_from_center: f64) -> Result<Self, SimdnaError> {
        if !std_in_bp.is_finite() || std_in_bp < 0.0 || !offset_from_center.is_finite() {
            return Err(SimdnaError::InvalidParameter(format!(
                "normal position generator needs a finite non-negative std and a finite offset, got {} and {}",
                std_in_bp, offset_from_center
            )));
        }
        Ok(NormalDistributionPositionGenerator {
            name: "NormalDistributionPositionGenerator".to_string(),
            std_in_bp,
            offset_from_center,
        })
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl PositionGenerator for NormalDistributionPositionGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    fn sample_pos(
        &self,
        len_background: usize,
        len_item: usize,
        rng: &mut dyn RngCore,
    ) -> Result<usize, SimdnaError> {
        if len_item > len_background {
            return Err(SimdnaError::ItemTooLong {
                item_len: len_item,
                region_len: len_background,
            });
        }
        let last_valid = (len_background - len_item) as f64;
        let center = last_valid / 2.0;
        let normal = Normal::new(center + self.offset_from_center, self.std_in_bp)
            .map_err(|e| SimdnaError::InvalidParameter(e.to_string()))?;

        let mut tries = 0;
        loop {
            tries += 1;
            let sampled = normal.sample(rng).trunc();
            if (0.0..=last_valid).contains(&sampled) {
                return Ok(sampled as usize);
            }
            if tries % RETRY_WARNING_INTERVAL == 0 {
                warn!(
                    "made {} attempts at sampling a position with background length {} and center {} and offset {}",
                    tries, len_background, center, self.offset_from_center
                );
            }
        }
    }

    fn to_json(&self) -> Value {
        json!({
            "class": "NormalDistributionPositionGenerator",
            "stdInBp": self.std_in_bp,
            "offsetFromCenter": self.offset_from_center,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rstest::{fixture, rstest};

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(99)
    }

    #[rstest]
    fn test_uniform_stays_in_bounds(mut rng: StdRng) {
        let generator = UniformPositionGenerator::new();
        for _ in 0..2000 {
            let pos = generator.sample_pos(20, 5, &mut rng).unwrap();
            assert!(pos <= 15);
        }
        assert_eq!(generator.sample_pos(5, 5, &mut rng).unwrap(), 0);
        assert!(matches!(
            generator.sample_pos(4, 5, &mut rng),
            Err(SimdnaError::ItemTooLong { .. })
        ));
    }

    #[rstest]
    fn test_generate_pos_records_name(mut rng: StdRng) {
        let generator = UniformPositionGenerator::new().with_name("centerish");
        let mut info = AdditionalInfo::new();
        generator
            .generate_pos(10, 2, Some(&mut info), &mut rng)
            .unwrap();
        generator.generate_pos(10, 2, None, &mut rng).unwrap();
        assert_eq!(info.trace_count("centerish"), 1);
    }

    #[rstest]
    // even background, odd window: the window is [48, 53)
    #[case(100, 5, 1, 48, 52)]
    #[case(100, 10, 2, 45, 53)]
    #[case(11, 3, 1, 4, 6)]
    fn test_inside_central_bp(
        mut rng: StdRng,
        #[case] len_background: usize,
        #[case] central_bp: usize,
        #[case] len_item: usize,
        #[case] lowest: usize,
        #[case] highest: usize,
    ) {
        let generator = InsideCentralBp::new(central_bp);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..2000 {
            seen.insert(generator.sample_pos(len_background, len_item, &mut rng).unwrap());
        }
        assert_eq!(seen.first(), Some(&lowest));
        assert_eq!(seen.last(), Some(&highest));
    }

    #[rstest]
    fn test_inside_central_bp_needs_long_background(mut rng: StdRng) {
        let generator = InsideCentralBp::new(50);
        assert!(matches!(
            generator.sample_pos(40, 5, &mut rng),
            Err(SimdnaError::BackgroundTooShort { .. })
        ));
    }

    #[rstest]
    fn test_outside_central_bp_avoids_center(mut rng: StdRng) {
        // flanks are [0, 46) and [66, 111)
        let generator = OutsideCentralBp::new(20);
        let (mut left, mut right) = (0, 0);
        for _ in 0..4000 {
            let pos = generator.sample_pos(111, 6, &mut rng).unwrap();
            if pos < 46 {
                assert!(pos + 6 <= 46);
                left += 1;
            } else {
                assert!(pos >= 66 && pos + 6 <= 111);
                right += 1;
            }
        }
        assert!((left as f64 / 4000.0 - 0.5).abs() < 0.03);
        assert!((right as f64 / 4000.0 - 0.5).abs() < 0.03);
    }

    #[rstest]
    #[case(0, 5, 10, true)]
    #[case(5, 5, 10, true)]
    #[case(6, 5, 10, false)]
    fn test_fixed_position(
        mut rng: StdRng,
        #[case] pos: usize,
        #[case] len_item: usize,
        #[case] len_background: usize,
        #[case] fits: bool,
    ) {
        let result = FixedPositionGenerator::new(pos).sample_pos(len_background, len_item, &mut rng);
        match fits {
            true => assert_eq!(result.unwrap(), pos),
            false => assert!(matches!(result, Err(SimdnaError::PositionOutOfRange { .. }))),
        }
    }

    #[rstest]
    fn test_normal_position_centers(mut rng: StdRng) {
        let generator = NormalDistributionPositionGenerator::new(3.0, 10.0).unwrap();
        let n = 5000;
        let mut total = 0usize;
        for _ in 0..n {
            let pos = generator.sample_pos(100, 10, &mut rng).unwrap();
            assert!(pos <= 90);
            total += pos;
        }
        // center 45 + offset 10, truncation pulls the mean down by about half a base
        let mean = total as f64 / n as f64;
        assert!((mean - 54.5).abs() < 0.3);
    }

    #[rstest]
    fn test_to_json() {
        assert_eq!(UniformPositionGenerator::new().to_json(), json!("uniform"));
        assert_eq!(InsideCentralBp::new(20).to_json(), json!("insideCentral-20"));
        assert_eq!(OutsideCentralBp::new(20).to_json(), json!("outsideCentral-20"));
        assert_eq!(FixedPositionGenerator::new(3).to_json(), json!("fixed3"));
    }
}
