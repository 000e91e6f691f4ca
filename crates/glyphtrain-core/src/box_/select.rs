//! Box selection and merging

use super::{Box, Boxa};

/// Comparison applied to a box dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeRelation {
    /// Keep if strictly less than the threshold
    LessThan,
    /// Keep if strictly greater than the threshold
    GreaterThan,
    /// Keep if less than or equal to the threshold
    LessThanOrEqual,
    /// Keep if greater than or equal to the threshold
    GreaterThanOrEqual,
}

impl SizeRelation {
    fn holds(self, value: i32, threshold: i32) -> bool {
        match self {
            SizeRelation::LessThan => value < threshold,
            SizeRelation::GreaterThan => value > threshold,
            SizeRelation::LessThanOrEqual => value <= threshold,
            SizeRelation::GreaterThanOrEqual => value >= threshold,
        }
    }
}

/// Selection mode for size-based filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSelectType {
    /// Select based on width only
    Width,
    /// Select based on height only
    Height,
    /// Select if either width or height satisfies the relation
    Either,
    /// Select only if both width and height satisfy the relation
    Both,
}

impl Boxa {
    /// Keep the boxes whose dimensions satisfy `relation` against
    /// `width`/`height`, combined according to `select_type`.
    pub fn select_by_size(
        &self,
        width: i32,
        height: i32,
        select_type: SizeSelectType,
        relation: SizeRelation,
    ) -> Boxa {
        self.iter()
            .filter(|b| {
                let w_ok = relation.holds(b.w, width);
                let h_ok = relation.holds(b.h, height);
                match select_type {
                    SizeSelectType::Width => w_ok,
                    SizeSelectType::Height => h_ok,
                    SizeSelectType::Either => w_ok || h_ok,
                    SizeSelectType::Both => w_ok && h_ok,
                }
            })
            .copied()
            .collect()
    }

    /// Replace every group of overlapping boxes with its bounding box.
    ///
    /// Merging repeats until no two remaining boxes overlap, so chains of
    /// boxes that only overlap transitively end up as a single box.
    pub fn combine_overlaps(&self) -> Boxa {
        let mut boxes: Vec<Box> = self.boxes.iter().filter(|b| !b.is_empty()).copied().collect();
        loop {
            let mut merged = false;
            let mut i = 0;
            while i < boxes.len() {
                let mut j = i + 1;
                while j < boxes.len() {
                    if boxes[i].overlaps(&boxes[j]) {
                        boxes[i] = boxes[i].union(&boxes[j]);
                        boxes.remove(j);
                        merged = true;
                    } else {
                        j += 1;
                    }
                }
                i += 1;
            }
            if !merged {
                break;
            }
        }
        Boxa { boxes }
    }
}
