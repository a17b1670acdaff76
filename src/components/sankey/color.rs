//! Ordinal type palette and hex color helpers.

/// Leading whitespace-delimited token of a type tag.
pub fn type_group(kind: &str) -> &str {
	kind.split_whitespace().next().unwrap_or("")
}

/// Maps type groups to palette slots in first-seen order, seeded with a fixed domain.
#[derive(Clone, Debug, Default)]
pub struct TypePalette {
	domain: Vec<String>,
}

impl TypePalette {
	pub fn new(seed: &[String]) -> Self {
		let mut palette = Self::default();
		for group in seed {
			palette.slot(group);
		}
		palette
	}

	/// Slot for a group, registering it when unseen.
	pub fn slot(&mut self, group: &str) -> usize {
		if let Some(pos) = self.domain.iter().position(|g| g == group) {
			return pos;
		}
		self.domain.push(group.to_owned());
		self.domain.len() - 1
	}

	pub fn len(&self) -> usize {
		self.domain.len()
	}

	pub fn is_empty(&self) -> bool {
		self.domain.is_empty()
	}
}

/// Pick from a color range, cycling when the slot exceeds it.
pub fn pick(colors: &[String], slot: usize) -> &str {
	if colors.is_empty() {
		return "#000000";
	}
	&colors[slot % colors.len()]
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgb {
	pub r: f64,
	pub g: f64,
	pub b: f64,
}

impl Rgb {
	pub fn parse(hex: &str) -> Option<Self> {
		let hex = hex.strip_prefix('#')?;
		let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(f64::from);
		match hex.len() {
			6 => Some(Self {
				r: channel(&hex[0..2])?,
				g: channel(&hex[2..4])?,
				b: channel(&hex[4..6])?,
			}),
			3 => {
				let expand = |i: usize| channel(&hex[i..i + 1].repeat(2));
				Some(Self {
					r: expand(0)?,
					g: expand(1)?,
					b: expand(2)?,
				})
			}
			_ => None,
		}
	}

	pub fn darker(self, k: f64) -> Self {
		let f = 0.7_f64.powf(k);
		Self {
			r: self.r * f,
			g: self.g * f,
			b: self.b * f,
		}
	}

	pub fn to_hex(self) -> String {
		let c = |v: f64| v.round().clamp(0.0, 255.0) as u8;
		format!("#{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b))
	}
}

/// Stroke color for a fill; unparseable colors pass through.
pub fn darker(hex: &str, k: f64) -> String {
	Rgb::parse(hex)
		.map(|rgb| rgb.darker(k).to_hex())
		.unwrap_or_else(|| hex.to_owned())
}
