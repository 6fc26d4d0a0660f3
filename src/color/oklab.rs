//! Oklab perceptual color space.
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;

/// A color in Oklab: lightness `l` (0 black, 1 white) and the green-red
/// `a` and blue-yellow `b` axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

impl Oklab {
    #[inline]
    pub fn new(l: f64, a: f64, b: f64) -> Self {
        Self { l, a, b }
    }

    /// Distance from the neutral axis.
    #[inline]
    pub fn chroma(self) -> f64 {
        self.a.hypot(self.b)
    }
}

impl From<LinearRgb> for Oklab {
    fn from(rgb: LinearRgb) -> Self {
        let l = 0.412_221_470_8 * rgb.r + 0.536_332_536_3 * rgb.g + 0.051_445_992_9 * rgb.b;
        let m = 0.211_903_498_2 * rgb.r + 0.680_699_545_1 * rgb.g + 0.107_396_956_6 * rgb.b;
        let s = 0.088_302_461_9 * rgb.r + 0.281_718_837_6 * rgb.g + 0.629_978_700_5 * rgb.b;

        let (l, m, s) = (l.cbrt(), m.cbrt(), s.cbrt());

        Self {
            l: 0.210_454_255_3 * l + 0.793_617_785_0 * m - 0.004_072_046_8 * s,
            a: 1.977_998_495_1 * l - 2.428_592_205_0 * m + 0.450_593_709_9 * s,
            b: 0.025_904_037_1 * l + 0.782_771_766_2 * m - 0.808_675_766_0 * s,
        }
    }
}

impl From<Oklab> for LinearRgb {
    fn from(lab: Oklab) -> Self {
        let l = lab.l + 0.396_337_777_4 * lab.a + 0.215_803_757_3 * lab.b;
        let m = lab.l - 0.105_561_345_8 * lab.a - 0.063_854_172_8 * lab.b;
        let s = lab.l - 0.089_484_177_5 * lab.a - 1.291_485_548_0 * lab.b;

        let (l, m, s) = (l.powi(3), m.powi(3), s.powi(3));

        Self {
            r: 4.076_741_662_1 * l - 3.307_711_591_3 * m + 0.230_969_929_2 * s,
            g: -1.268_438_004_6 * l + 2.609_757_401_1 * m - 0.341_319_396_5 * s,
            b: -0.004_196_086_3 * l - 0.703_418_614_7 * m + 1.707_614_701_0 * s,
        }
    }
}
