#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Easing curve applied to normalized animation progress.
///
/// Serialized with the editor's curve names (`"easeInOutCubic"`, ...). Unknown names
/// deserialize as [`Ease::Linear`].
pub enum Ease {
    /// Quadratic ease-in.
    #[serde(rename = "easeInQuad")]
    InQuad,
    /// Quadratic ease-out.
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    /// Quadratic ease-in-out.
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    /// Cubic ease-in.
    #[serde(rename = "easeInCubic")]
    InCubic,
    /// Cubic ease-out.
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    /// Cubic ease-in-out.
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    /// Sine ease-in.
    #[serde(rename = "easeInSine")]
    InSine,
    /// Sine ease-out.
    #[serde(rename = "easeOutSine")]
    OutSine,
    /// Sine ease-in-out.
    #[serde(rename = "easeInOutSine")]
    InOutSine,
    /// Constant speed.
    #[default]
    #[serde(rename = "linear", other)]
    Linear,
}

impl Ease {
    /// Map linear progress `t` (clamped to `[0, 1]`) through the curve.
    pub fn apply(self, t: f64) -> f64 {
        use std::f64::consts::PI;

        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::InSine => 1.0 - (t * PI / 2.0).cos(),
            Self::OutSine => (t * PI / 2.0).sin(),
            Self::InOutSine => -((PI * t).cos() - 1.0) / 2.0,
        }
    }
}
