use leptos::callback::{Callable, UnsyncCallback};
use log::{debug, warn};

use super::interaction::{Intent, InteractionController, Selection, Target};
use super::model::SankeyModel;
use super::render::{self, Scene};
use super::types::{GraphData, SelectedArtifact};
use crate::config::SankeyConfig;
use crate::error::Result;

/// What the caller has to do after feeding an event in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
	pub redraw: bool,
	/// `(token, delay_ms)` for the click debounce timer.
	pub schedule_click: Option<(u64, f64)>,
}

impl Outcome {
	pub fn merge(self, other: Outcome) -> Outcome {
		Outcome {
			redraw: self.redraw || other.redraw,
			schedule_click: other.schedule_click.or(self.schedule_click),
		}
	}
}

/// One rendered relationship view: the model plus everything the pointer did to it.
pub struct SankeyState {
	pub model: SankeyModel,
	pub controller: InteractionController,
	pub config: SankeyConfig,
	/// Told about selection changes; `None` means the selection was cleared.
	listener: Option<UnsyncCallback<Option<SelectedArtifact>>>,
}

impl SankeyState {
	/// Build, lay out and lock input for the initial entry transition.
	pub fn new(data: &GraphData, config: SankeyConfig, now: f64) -> Result<Self> {
		let mut model = SankeyModel::build(data, &config)?;
		model.layout(config.layout_iterations);
		let mut controller = InteractionController::new(&config);
		controller.begin_cooldown(now);
		Ok(Self {
			model,
			controller,
			config,
			listener: None,
		})
	}

	pub fn with_listener(mut self, listener: Option<UnsyncCallback<Option<SelectedArtifact>>>) -> Self {
		self.listener = listener;
		self
	}

	pub fn scene(&self) -> Scene {
		render::project(&self.model, self.controller.highlight(), &self.config)
	}

	pub fn selected(&self) -> Option<SelectedArtifact> {
		match self.controller.selection() {
			Selection::Selected(i) => Some(self.artifact(i)),
			Selection::Unselected => None,
		}
	}

	fn artifact(&self, i: usize) -> SelectedArtifact {
		let node = self.model.node(i);
		SelectedArtifact {
			id: node.id.clone(),
			name: node.name.clone(),
		}
	}

	/// Pointer pressed on a node, in drawing coordinates.
	pub fn on_pointer_down(&mut self, node: usize, pointer: (f64, f64), now: f64) {
		let n = self.model.node(node);
		self.controller.pointer_down(node, pointer, (n.x, n.y), now);
	}

	pub fn on_pointer_move(&mut self, pointer: (f64, f64), now: f64) -> Outcome {
		let intents = self.controller.pointer_move(pointer).into_iter().collect();
		self.apply(intents, now)
	}

	pub fn on_pointer_up(&mut self) {
		self.controller.pointer_up();
	}

	pub fn on_pointer_leave(&mut self, now: f64) -> Outcome {
		self.controller.pointer_cancel();
		self.on_hover(None, now)
	}

	pub fn on_hover(&mut self, target: Option<Target>, now: f64) -> Outcome {
		Outcome {
			redraw: self.controller.set_hover(target, now),
			..Default::default()
		}
	}

	pub fn on_click(&mut self, node: usize, now: f64) -> Outcome {
		let intents = self.controller.click(node, now);
		self.apply(intents, now)
	}

	pub fn on_click_timer(&mut self, token: u64, now: f64) -> Outcome {
		let intents = self.controller.click_timer(token).into_iter().collect();
		self.apply(intents, now)
	}

	pub fn on_collapser_double_click(&mut self, node: usize, now: f64) -> Outcome {
		let intents = self
			.controller
			.collapser_double_click(node, now)
			.into_iter()
			.collect();
		self.apply(intents, now)
	}

	fn apply(&mut self, intents: Vec<Intent>, now: f64) -> Outcome {
		let mut outcome = Outcome::default();
		for intent in intents {
			match intent {
				Intent::ScheduleClick { token, delay_ms } => {
					outcome.schedule_click = Some((token, delay_ms));
				}
				Intent::Select(selected) => {
					debug!("selection -> {selected:?}");
					self.notify();
					outcome.redraw = true;
				}
				Intent::Toggle(node) => match self.model.toggle(node) {
					Ok(true) => {
						self.model.layout(self.config.layout_iterations);
						if self.controller.structure_changed(&self.model, now).is_some() {
							self.notify();
						}
						outcome.redraw = true;
					}
					Ok(false) => {}
					Err(err) => warn!("toggle ignored: {err}"),
				},
				Intent::Move { node, x, y } => match self.model.move_node(node, x, y) {
					Ok(_) => outcome.redraw = true,
					Err(err) => warn!("move ignored: {err}"),
				},
			}
		}
		outcome
	}

	fn notify(&self) {
		if let Some(listener) = &self.listener {
			listener.run(self.selected());
		}
	}
}
