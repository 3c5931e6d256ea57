//! Exponentially eased scalar properties.

/// Convergence threshold for quantities measured in pixels.
pub const PIXEL_EPSILON: f32 = 1.0;

/// Convergence threshold for normalized quantities (opacity, progress).
pub const NORMALIZED_EPSILON: f32 = 0.01;

/// Lower bound for the easing factor. Zero would never converge.
const MIN_EASING: f32 = 0.001;

/// Named property a panel animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    /// Surface opacity. The dominant visibility property.
    Opacity,
    /// Margin toward the anchored edge, in pixels.
    Offset,
    /// Height of the list container, in pixels.
    ContentHeight,
    /// Opacity of the filter field (clipboard fades it separately).
    SearchOpacity,
    /// Normalized OSD volume bar.
    Volume,
    /// Normalized OSD brightness bar.
    Brightness,
}

impl PropertyId {
    /// Whether the property is measured in pixels (as opposed to 0..=1).
    #[must_use]
    pub const fn is_pixels(self) -> bool {
        matches!(self, PropertyId::Offset | PropertyId::ContentHeight)
    }
}

/// A scalar moving toward a target by a fixed fraction of the remaining
/// distance per step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimatableProperty {
    current: f32,
    target: f32,
    easing: f32,
    epsilon: f32,
}

impl AnimatableProperty {
    /// Create a property resting at `value`.
    ///
    /// `easing` is clamped into `(0, 1]`; 1.0 reaches the target in one step.
    #[must_use]
    pub fn new(value: f32, easing: f32, epsilon: f32) -> Self {
        Self {
            current: value,
            target: value,
            easing: easing.clamp(MIN_EASING, 1.0),
            epsilon: epsilon.abs(),
        }
    }

    #[must_use]
    pub fn pixels(value: f32, easing: f32) -> Self {
        Self::new(value, easing, PIXEL_EPSILON)
    }

    #[must_use]
    pub fn normalized(value: f32, easing: f32) -> Self {
        Self::new(value, easing, NORMALIZED_EPSILON)
    }

    /// Build the right flavour for a property id.
    #[must_use]
    pub fn for_property(id: PropertyId, value: f32, easing: f32) -> Self {
        if id.is_pixels() {
            Self::pixels(value, easing)
        } else {
            Self::normalized(value, easing)
        }
    }

    #[must_use]
    pub fn current(&self) -> f32 {
        self.current
    }

    #[must_use]
    pub fn target(&self) -> f32 {
        self.target
    }

    #[must_use]
    pub fn easing(&self) -> f32 {
        self.easing
    }

    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Move `current` without animating (start position of a transition).
    pub fn jump_to(&mut self, value: f32) {
        self.current = value;
    }

    /// Advance one step toward the target.
    pub fn step(&mut self) {
        self.current += (self.target - self.current) * self.easing;
    }

    #[must_use]
    pub fn is_converged(&self) -> bool {
        (self.target - self.current).abs() < self.epsilon
    }

    /// Land exactly on the target, dropping asymptotic residue.
    pub fn snap(&mut self) {
        self.current = self.target;
    }
}
