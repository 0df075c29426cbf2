use image::Rgb;

use crate::topo::Sample;

#[cfg(test)]
mod tests {
    use image::Rgb;
    use rstest::rstest;
    use crate::heatmap::ColorScale;
    use crate::topo::Sample;

    #[rstest]
    #[case(0.0, Rgb([0, 255, 0]))]
    #[case(12.0, Rgb([0, 0, 0]))]
    #[case(6.0, Rgb([0, 128, 0]))]
    #[case(1.0, Rgb([0, 234, 0]))]
    #[case(-1.0, Rgb([0, 0, 253]))]
    #[case(-100.0, Rgb([0, 0, 0]))]
    #[case(-50.0, Rgb([0, 0, 128]))]
    fn two_sided_scale(#[case] altitude: f64, #[case] expected: Rgb<u8>) {
        let scale = ColorScale::new(-100.0, 12.0);
        assert_eq!(expected, scale.color(altitude));
    }

    #[test]
    fn land_only_scale_never_touches_blue() {
        let scale = ColorScale::new(1.0, 12.0);
        for altitude in [1.0, 3.0, 6.0, 9.0, 12.0] {
            let Rgb([r, _, b]) = scale.color(altitude);
            assert_eq!((0, 0), (r, b));
        }
    }

    #[test]
    fn sea_only_scale_never_touches_green() {
        let scale = ColorScale::new(-4000.0, -1.0);
        for altitude in [-4000.0, -2500.5, -10.0, -1.0] {
            let Rgb([r, g, _]) = scale.color(altitude);
            assert_eq!((0, 0), (r, g));
        }
    }

    #[test]
    fn flat_sea_level_is_pure_green() {
        let scale = ColorScale::new(0.0, 0.0);
        assert_eq!(Rgb([0, 255, 0]), scale.color(0.0));
    }

    #[test]
    fn missing_side_falls_back_to_full_channel() {
        // altitudes outside the range of the scale do not divide by zero
        assert_eq!(Rgb([0, 0, 255]), ColorScale::new(0.0, 10.0).color(-5.0));
        assert_eq!(Rgb([0, 255, 0]), ColorScale::new(-10.0, 0.0).color(5.0));
    }

    #[test]
    fn out_of_range_altitudes_saturate() {
        let scale = ColorScale::new(-10.0, 10.0);
        assert_eq!(Rgb([0, 0, 0]), scale.color(20.0));
        assert_eq!(Rgb([0, 0, 0]), scale.color(-20.0));
    }

    #[test]
    fn scale_spans_all_samples() {
        let samples = [Sample::new(1.0, 1.0, 4.0), Sample::new(1.0, 2.0, -7.5), Sample::new(2.0, 1.0, 12.0)];
        assert_eq!(Some(ColorScale::new(-7.5, 12.0)), ColorScale::from_samples(&samples));
        assert_eq!(None, ColorScale::from_samples(&[]));
    }
}

/// Diverging land/sea scale. Above sea level green fades from 255 to 0 at `max`,
/// below it blue fades from 255 to 0 at `min`. Each side is normalized on its own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    min: f64,
    max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        ColorScale { min, max }
    }

    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let first = samples.first()?.altitude;
        let (min, max) = samples
            .iter()
            .fold((first, first), |(min, max), s| (min.min(s.altitude), max.max(s.altitude)));

        Some(ColorScale::new(min, max))
    }

    pub fn color(&self, altitude: f64) -> Rgb<u8> {
        if altitude < 0.0 {
            if self.min >= 0.0 {
                return Rgb([0, 0, 255]);
            }
            Rgb([0, 0, fade(altitude.abs() / self.min.abs())])
        } else {
            if self.max <= 0.0 {
                return Rgb([0, 255, 0]);
            }
            Rgb([0, fade(altitude / self.max), 0])
        }
    }
}

fn fade(fraction: f64) -> u8 {
    let fraction = fraction.clamp(0.0, 1.0);
    (255.0 - (fraction * 255.0).floor()) as u8
}
