use std::fmt::Display;
use std::str::FromStr;

use leptos::prelude::*;
use strum::IntoEnumIterator;

use super::timeline::TimelineControl;
use crate::analysis::{AnimationKind, MinimizationView};
use crate::api::{AnalysisMode, CommunityAlgorithm, ProbabilityModel, PropagationModel, SeedGenerationMode};
use crate::controller::{ActionsPanel, AnimationButton, Controller};

fn enum_select<T>(
	label: &'static str,
	current: Signal<T>,
	disabled: Signal<bool>,
	on_pick: impl Fn(T) + Send + Sync + 'static,
) -> impl IntoView
where
	T: IntoEnumIterator + FromStr + Display + Copy + PartialEq + Send + Sync + 'static,
{
	view! {
		<div class="form-group">
			<label>{label}</label>
			<select
				prop:value=move || current.get().to_string()
				disabled=move || disabled.get()
				on:change=move |ev| {
					if let Ok(v) = event_target_value(&ev).parse::<T>() {
						on_pick(v);
					}
				}
			>
				{T::iter()
					.map(|v| {
						let name = v.to_string();
						view! { <option value=name.clone()>{name.clone()}</option> }
					})
					.collect_view()}
			</select>
		</div>
	}
}

fn number_field(
	label: Signal<&'static str>,
	current: Signal<u32>,
	disabled: Signal<bool>,
	on_change: impl Fn(u32) + Send + Sync + 'static,
) -> impl IntoView {
	view! {
		<div class="form-group">
			<label>{move || label.get()}</label>
			<input
				type="number"
				min="1"
				prop:value=move || current.get().to_string()
				disabled=move || disabled.get()
				on:input=move |ev| {
					if let Ok(v) = event_target_value(&ev).trim().parse::<u32>() {
						on_change(v);
					}
				}
			/>
		</div>
	}
}

fn seed_mode_radios(
	name: &'static str,
	current: Signal<SeedGenerationMode>,
	disabled: Signal<bool>,
	on_pick: impl Fn(SeedGenerationMode) + Copy + Send + Sync + 'static,
) -> impl IntoView {
	view! {
		<div class="form-group inline">
			<label>"Seed Type"</label>
			<div class="radio-group">
				{SeedGenerationMode::iter()
					.map(|m| {
						view! {
							<label class="radio-label">
								<input
									type="radio"
									name=name
									prop:checked=move || current.get() == m
									disabled=move || disabled.get()
									on:change=move |_| on_pick(m)
								/>
								{match m {
									SeedGenerationMode::Imm => "IMM",
									SeedGenerationMode::Random => "Random",
								}}
							</label>
						}
					})
					.collect_view()}
			</div>
		</div>
	}
}

#[component]
pub fn ControlPanel(ctl: Controller) -> impl IntoView {
	let form = ctl.form;
	let (busy, analysis) = (ctl.busy, ctl.analysis);
	let mode = Memo::new(move |_| form.with(|f| f.mode));
	let interactive = Memo::new(move |_| analysis.with(|s| s.interactive.enabled));
	let locked = Signal::derive(move || busy.get() || interactive.get());

	let dataset_select = view! {
		<div class="form-group">
			<label>"Dataset"</label>
			<select
				prop:value=move || form.with(|f| f.dataset_id.clone())
				disabled=move || locked.get()
				on:change=move |ev| ctl.change_dataset(event_target_value(&ev))
			>
				{ctl
					.datasets()
					.into_iter()
					.map(|d| view! { <option value=d.clone()>{d.clone()}</option> })
					.collect_view()}
			</select>
		</div>
	};

	let mode_radios = view! {
		<div class="form-group">
			<label>"Analysis Mode"</label>
			<div class="radio-group">
				{AnalysisMode::iter()
					.map(|m| {
						view! {
							<label class="radio-label">
								<input
									type="radio"
									name="mode"
									prop:checked=move || mode.get() == m
									disabled=move || busy.get()
									on:change=move |_| ctl.set_mode(m)
								/>
								{m.label()}
							</label>
						}
					})
					.collect_view()}
			</div>
		</div>
	};

	let models = view! {
		{enum_select(
			"Propagation Model",
			Signal::derive(move || form.with(|f| f.propagation_model)),
			locked,
			move |v: PropagationModel| form.update(|f| f.propagation_model = v),
		)}
		{enum_select(
			"Probability Model",
			Signal::derive(move || form.with(|f| f.probability_model)),
			locked,
			move |v: ProbabilityModel| form.update(|f| f.probability_model = v),
		)}
		{number_field(
			Signal::derive(move || form.with(|f| f.budget_label())),
			Signal::derive(move || form.with(|f| f.budget)),
			locked,
			move |v| form.update(|f| f.budget = v),
		)}
	};

	let minimization_fields = move || {
		(mode.get() == AnalysisMode::Minimization).then(|| {
			view! {
				{number_field(
					Signal::derive(|| "Negative Seeds"),
					Signal::derive(move || form.with(|f| f.neg_num)),
					locked,
					move |v| form.update(|f| f.neg_num = v),
				)}
				{seed_mode_radios(
					"min_seed_mode",
					Signal::derive(move || form.with(|f| f.min_seed_mode)),
					locked,
					move |m| form.update(|f| f.min_seed_mode = m),
				)}
				<div class="form-group">
					<label>"Seed Nodes (optional)"</label>
					<textarea
						placeholder="e.g. 12, 48, 305"
						prop:value=move || form.with(|f| f.seed_nodes.clone())
						disabled=move || locked.get()
						on:input=move |ev| form.update(|f| f.seed_nodes = event_target_value(&ev))
					/>
				</div>
			}
		})
	};

	let community_fields = move || {
		(mode.get() == AnalysisMode::CommunitySearch).then(|| {
			let algorithm = Memo::new(move |_| form.with(|f| f.community_algorithm));
			view! {
				<div class="form-group">
					<label>"Algorithm"</label>
					<div class="radio-group">
						{CommunityAlgorithm::iter()
							.map(|a| {
								view! {
									<label class="radio-label">
										<input
											type="radio"
											name="community_algorithm"
											prop:checked=move || algorithm.get() == a
											disabled=move || locked.get()
											on:change=move |_| form.update(|f| f.community_algorithm = a)
										/>
										{a.label()}
									</label>
								}
							})
							.collect_view()}
					</div>
				</div>
				{number_field(
					Signal::derive(|| "Param (K)"),
					Signal::derive(move || form.with(|f| f.k_param)),
					locked,
					move |v| form.update(|f| f.k_param = v),
				)}
				<div class:hidden=move || !algorithm.get().uses_l_param()>
					{number_field(
						Signal::derive(|| "Param (L)"),
						Signal::derive(move || form.with(|f| f.l_param)),
						locked,
						move |v| form.update(|f| f.l_param = v),
					)}
				</div>
				{seed_mode_radios(
					"cs_seed_mode",
					Signal::derive(move || form.with(|f| f.cs_seed_mode)),
					locked,
					move |m| form.update(|f| f.cs_seed_mode = m),
				)}
				<div class="form-group">
					<label>"Seed Nodes (optional)"</label>
					<textarea
						placeholder="e.g. 12, 48, 305"
						prop:value=move || form.with(|f| f.cs_seed_nodes.clone())
						disabled=move || locked.get()
						on:input=move |ev| form.update(|f| f.cs_seed_nodes = event_target_value(&ev))
					/>
				</div>
			}
		})
	};

	let interactive_toggle = move || {
		mode.get().supports_interactive().then(|| {
			view! {
				<div class="control-sub-panel">
					<h4 class="sub-panel-title">"🕹️ Interactive Mode"</h4>
					<div class="control-row">
						<label>"Enable Real-time Analysis"</label>
						<label class="toggle-switch">
							<input
								type="checkbox"
								prop:checked=move || interactive.get()
								disabled=move || busy.get()
								on:change=move |ev| ctl.set_interactive(event_target_checked(&ev))
							/>
							<span class="slider"></span>
						</label>
					</div>
				</div>
			}
		})
	};

	let run_label = move || {
		if busy.get() {
			"⏳ Calculating...".to_string()
		} else {
			mode.get().run_label().to_string()
		}
	};

	view! {
		<form
			class="control-panel"
			on:submit=move |ev| {
				ev.prevent_default();
				ctl.submit();
			}
		>
			<div class="control-sub-panel">
				<h4 class="sub-panel-title">"⚙️ Parameters"</h4>
				{dataset_select}
				{mode_radios}
				{models}
				{minimization_fields}
				{community_fields}
			</div>
			<button type="submit" class="run-button" disabled=move || locked.get()>
				{run_label}
			</button>
			{interactive_toggle}
			<ActionsControls ctl=ctl />
		</form>
	}
}

fn animation_label(state: AnimationButton, idle: &'static str) -> &'static str {
	match state {
		AnimationButton::Idle => idle,
		AnimationButton::Loading => "⏳ Loading Animation...",
		AnimationButton::Loaded => "✅ Animation Loaded",
	}
}

#[component]
fn ActionsControls(ctl: Controller) -> impl IntoView {
	let actions = ctl.actions;

	move || match actions.get() {
		ActionsPanel::Hidden => ().into_any(),
		ActionsPanel::Maximization {
			animation,
			analyzing_path,
		} => view! {
			<div class="control-sub-panel">
				<h4 class="sub-panel-title">"⚡ Actions"</h4>
				<div class="form-group actions">
					<button
						type="button"
						class="action-button"
						disabled={animation != AnimationButton::Idle}
						on:click=move |_| ctl.start_animation(AnimationKind::Propagation)
					>
						{animation_label(animation, "Play Animation")}
					</button>
					<button
						type="button"
						class="action-button"
						disabled=analyzing_path
						on:click=move |_| ctl.find_critical_path()
					>
						{if analyzing_path { "⏳ Analyzing..." } else { "🔗 Find Critical Chain" }}
					</button>
				</div>
				<TimelineControl ctl=ctl />
			</div>
		}
		.into_any(),
		ActionsPanel::Minimization { view: shown, animation } => view! {
			<div class="control-sub-panel">
				<h4 class="sub-panel-title">"👁️ Actions & Visualization"</h4>
				<div class="form-group inline">
					<label>"View State"</label>
					<div class="radio-group">
						<label class="radio-label">
							<input
								type="radio"
								name="min-view"
								prop:checked={shown == MinimizationView::Before}
								on:change=move |_| ctl.show_minimization_view(MinimizationView::Before)
							/>
							"Before"
						</label>
						<label class="radio-label">
							<input
								type="radio"
								name="min-view"
								prop:checked={shown == MinimizationView::After}
								on:change=move |_| ctl.show_minimization_view(MinimizationView::After)
							/>
							"After"
						</label>
					</div>
				</div>
				<div class="form-group actions">
					<button
						type="button"
						class="action-button"
						disabled={animation != AnimationButton::Idle}
						on:click=move |_| ctl.start_animation(AnimationKind::Blocking)
					>
						{animation_label(animation, "Play Blocking Animation")}
					</button>
				</div>
				<TimelineControl ctl=ctl />
			</div>
		}
		.into_any(),
		ActionsPanel::Community { aggregated } => view! {
			<div class="control-sub-panel">
				<h4 class="sub-panel-title">"👀 Visualization"</h4>
				<div class="control-row">
					<label>"Aggregate Community"</label>
					<label class="toggle-switch">
						<input
							type="checkbox"
							prop:checked=aggregated
							on:change=move |ev| ctl.toggle_aggregation(event_target_checked(&ev))
						/>
						<span class="slider"></span>
					</label>
				</div>
			</div>
		}
		.into_any(),
	}
}
