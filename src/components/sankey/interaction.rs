//! Pointer input → model intents.
//!
//! Time is passed in as millisecond timestamps so every transition here is
//! deterministic; the component feeds it `Date.now()`.

use std::fmt;
use std::str::FromStr;

use log::trace;

use super::model::SankeyModel;
use super::render::Highlight;
use crate::config::SankeyConfig;

/// Something under the pointer. Encoded in the `data-hit` attribute of drawn elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
	Node(usize),
	Link(usize),
	Collapser(usize),
}

impl fmt::Display for Target {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Node(i) => write!(f, "node:{i}"),
			Self::Link(i) => write!(f, "link:{i}"),
			Self::Collapser(i) => write!(f, "collapser:{i}"),
		}
	}
}

/// A `data-hit` value that names no [`Target`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("not a hit target: `{0}`")]
pub struct UnknownTarget(String);

impl FromStr for Target {
	type Err = UnknownTarget;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let unknown = || UnknownTarget(s.to_owned());
		let (kind, index) = s.split_once(':').ok_or_else(unknown)?;
		let index = index.parse().map_err(|_| unknown())?;
		match kind {
			"node" => Ok(Self::Node(index)),
			"link" => Ok(Self::Link(index)),
			"collapser" => Ok(Self::Collapser(index)),
			_ => Err(unknown()),
		}
	}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	#[default]
	Unselected,
	Selected(usize),
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ClickState {
	#[default]
	Idle,
	/// A first click waiting to see whether a second one follows.
	Pending {
		node: usize,
		deadline: f64,
		token: u64,
	},
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
	#[default]
	Idle,
	Pressed {
		node: usize,
		pointer: (f64, f64),
		origin: (f64, f64),
	},
	Dragging {
		node: usize,
		pointer: (f64, f64),
		origin: (f64, f64),
	},
	/// Drag finished; the click the browser fires next belongs to it.
	Dragged,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Cooldown {
	#[default]
	Settled,
	Until(f64),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
	/// Call back with [`InteractionController::click_timer`] after the delay.
	ScheduleClick { token: u64, delay_ms: f64 },
	Select(Option<usize>),
	Toggle(usize),
	Move { node: usize, x: f64, y: f64 },
}

#[derive(Clone, Debug)]
pub struct InteractionController {
	debounce_ms: f64,
	cooldown_ms: f64,
	drag_tolerance: f64,
	selection: Selection,
	click: ClickState,
	gesture: Gesture,
	cooldown: Cooldown,
	hover: Option<Target>,
	next_token: u64,
}

impl InteractionController {
	pub fn new(config: &SankeyConfig) -> Self {
		Self {
			debounce_ms: config.debounce_ms,
			cooldown_ms: config.cooldown_ms(),
			drag_tolerance: config.drag_tolerance,
			selection: Selection::default(),
			click: ClickState::default(),
			gesture: Gesture::default(),
			cooldown: Cooldown::default(),
			hover: None,
			next_token: 0,
		}
	}

	pub fn selection(&self) -> Selection {
		self.selection
	}

	pub fn hover(&self) -> Option<Target> {
		self.hover
	}

	pub fn gesture(&self) -> Gesture {
		self.gesture
	}

	pub fn is_cooling(&self, now: f64) -> bool {
		matches!(self.cooldown, Cooldown::Until(until) if now < until)
	}

	/// Lock out input while a structural transition plays.
	pub fn begin_cooldown(&mut self, now: f64) {
		self.cooldown = Cooldown::Until(now + self.cooldown_ms);
	}

	/// What the renderer should emphasize: the selection wins over any hover.
	pub fn highlight(&self) -> Highlight {
		match (self.selection, self.hover) {
			(Selection::Selected(node), _) => Highlight::Node(node),
			(_, Some(Target::Node(node))) => Highlight::Node(node),
			(_, Some(Target::Link(link))) => Highlight::Link(link),
			(_, Some(Target::Collapser(node))) => Highlight::Collapser(node),
			(_, None) => Highlight::None,
		}
	}

	/// Returns true when the hover target changed.
	pub fn set_hover(&mut self, target: Option<Target>, now: f64) -> bool {
		if self.hover == target {
			return false;
		}
		if self.is_cooling(now) {
			trace!("hover dropped during transition");
			return false;
		}
		self.hover = target;
		true
	}

	pub fn pointer_down(&mut self, node: usize, pointer: (f64, f64), origin: (f64, f64), now: f64) {
		if self.is_cooling(now) {
			trace!("drag dropped during transition");
			return;
		}
		self.gesture = Gesture::Pressed {
			node,
			pointer,
			origin,
		};
	}

	pub fn pointer_move(&mut self, pointer: (f64, f64)) -> Option<Intent> {
		let (node, start, origin) = match self.gesture {
			Gesture::Pressed {
				node,
				pointer: start,
				origin,
			} => {
				let (dx, dy) = (pointer.0 - start.0, pointer.1 - start.1);
				if dx.abs() <= self.drag_tolerance && dy.abs() <= self.drag_tolerance {
					return None;
				}
				self.gesture = Gesture::Dragging {
					node,
					pointer: start,
					origin,
				};
				(node, start, origin)
			}
			Gesture::Dragging {
				node,
				pointer: start,
				origin,
			} => (node, start, origin),
			Gesture::Idle | Gesture::Dragged => return None,
		};
		Some(Intent::Move {
			node,
			x: origin.0 + pointer.0 - start.0,
			y: origin.1 + pointer.1 - start.1,
		})
	}

	pub fn pointer_up(&mut self) {
		self.gesture = match self.gesture {
			Gesture::Dragging { .. } => Gesture::Dragged,
			_ => Gesture::Idle,
		};
	}

	/// Pointer left the drawing; nothing is being pressed or hovered any more.
	pub fn pointer_cancel(&mut self) {
		self.gesture = Gesture::Idle;
	}

	pub fn click(&mut self, node: usize, now: f64) -> Vec<Intent> {
		if self.gesture == Gesture::Dragged {
			self.gesture = Gesture::Idle;
			trace!("click swallowed by drag");
			return Vec::new();
		}
		if self.is_cooling(now) {
			trace!("click dropped during transition");
			return Vec::new();
		}

		let mut intents = Vec::new();
		if let ClickState::Pending {
			node: pending,
			deadline,
			..
		} = self.click
		{
			self.click = ClickState::Idle;
			if pending == node && now < deadline {
				intents.push(Intent::Toggle(node));
				return intents;
			}
			intents.push(self.toggle_selection(pending));
		}

		self.next_token += 1;
		self.click = ClickState::Pending {
			node,
			deadline: now + self.debounce_ms,
			token: self.next_token,
		};
		intents.push(Intent::ScheduleClick {
			token: self.next_token,
			delay_ms: self.debounce_ms,
		});
		intents
	}

	/// Debounce timer expiry: a still-pending click becomes a selection toggle.
	pub fn click_timer(&mut self, token: u64) -> Option<Intent> {
		match self.click {
			ClickState::Pending {
				node, token: t, ..
			} if t == token => {
				self.click = ClickState::Idle;
				Some(self.toggle_selection(node))
			}
			_ => None,
		}
	}

	pub fn collapser_double_click(&mut self, node: usize, now: f64) -> Option<Intent> {
		if self.is_cooling(now) {
			trace!("double click dropped during transition");
			return None;
		}
		Some(Intent::Toggle(node))
	}

	fn toggle_selection(&mut self, node: usize) -> Intent {
		self.selection = if self.selection == Selection::Selected(node) {
			Selection::Unselected
		} else {
			Selection::Selected(node)
		};
		Intent::Select(match self.selection {
			Selection::Selected(node) => Some(node),
			Selection::Unselected => None,
		})
	}

	/// Settle after an expand/collapse: start the cool-down, drop stale
	/// pointer state and keep the selection on a drawn node. Returns the new
	/// selection when it had to move.
	pub fn structure_changed(&mut self, model: &SankeyModel, now: f64) -> Option<Option<usize>> {
		self.begin_cooldown(now);
		self.hover = None;
		self.click = ClickState::Idle;
		self.gesture = Gesture::Idle;

		let Selection::Selected(node) = self.selection else {
			return None;
		};
		match model.representative(node) {
			Ok(Some(rep)) if rep == node => None,
			Ok(Some(rep)) => {
				self.selection = Selection::Selected(rep);
				Some(Some(rep))
			}
			_ => {
				self.selection = Selection::Unselected;
				Some(None)
			}
		}
	}
}
