/// Vision settings used when refreshing fog of war.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisionConfig {
    /// How far viewers can see, in squares.
    pub radius_squares: u32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self { radius_squares: 12 }
    }
}

impl VisionConfig {
    /// Set the vision radius in squares.
    pub fn with_radius(mut self, squares: u32) -> Self {
        self.radius_squares = squares;
        self
    }

    /// Set the vision radius in feet, rounded down to whole squares.
    pub fn with_radius_feet(mut self, feet: u32) -> Self {
        self.radius_squares = feet / crate::distance::FEET_PER_SQUARE;
        self
    }

    /// The vision radius in feet.
    pub fn radius_feet(&self) -> u32 {
        self.radius_squares * crate::distance::FEET_PER_SQUARE
    }
}
