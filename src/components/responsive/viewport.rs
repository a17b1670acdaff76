/// Widths strictly below this are laid out for phones.
pub const MOBILE_BREAKPOINT: f64 = 768.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
	Mobile,
	Desktop,
}

/// Classify a viewport width in CSS pixels. Anything that is not a width
/// below the breakpoint (NaN included) counts as desktop.
pub fn classify(width: f64) -> Mode {
	if width < MOBILE_BREAKPOINT {
		Mode::Mobile
	} else {
		Mode::Desktop
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn breakpoint_is_exclusive_on_the_mobile_side() {
		assert_eq!(classify(0.0), Mode::Mobile);
		assert_eq!(classify(767.9), Mode::Mobile);
		assert_eq!(classify(768.0), Mode::Desktop);
		assert_eq!(classify(1920.0), Mode::Desktop);
	}

	#[test]
	fn degenerate_widths_fall_back_to_desktop() {
		assert_eq!(classify(f64::NAN), Mode::Desktop);
		assert_eq!(classify(f64::INFINITY), Mode::Desktop);
		assert_eq!(classify(-1.0), Mode::Mobile);
	}
}
