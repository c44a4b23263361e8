use leptos::prelude::*;

use crate::controller::Controller;

#[component]
pub fn TimelineControl(ctl: Controller) -> impl IntoView {
	let analysis = ctl.analysis;
	let markers = Memo::new(move |_| analysis.with(|s| s.playback.markers()));
	let progress = Memo::new(move |_| analysis.with(|s| s.playback.progress()));
	let playing = Memo::new(move |_| analysis.with(|s| s.playback.is_playing()));

	move || {
		let items = markers.get();
		if items.is_empty() {
			return ().into_any();
		}
		view! {
			<div class="timeline-container">
				<div class="timeline-track-wrap">
					<div
						class="timeline-progress"
						style:transform=move || format!("scaleX({})", progress.get())
					></div>
					<ol class="timeline-track">
						{items
							.into_iter()
							.map(|m| {
								let class = match (m.completed, m.label.is_some()) {
									(true, true) => "timeline-step completed timeline-step-endpoint",
									(true, false) => "timeline-step completed",
									(false, true) => "timeline-step timeline-step-endpoint",
									(false, false) => "timeline-step",
								};
								view! {
									<li
										class=class
										on:click=move |_| {
											ctl.pause();
											ctl.show_step(m.index);
										}
									>
										<div class="timeline-marker"></div>
										{m.label.map(|l| view! { <div class="timeline-label">{l}</div> })}
									</li>
								}
							})
							.collect_view()}
					</ol>
				</div>
				<div class="control-row timeline-buttons">
					<button
						type="button"
						class="action-button action-button-secondary"
						on:click=move |_| ctl.toggle_playback()
					>
						{move || if playing.get() { "Pause" } else { "Play" }}
					</button>
					<button
						type="button"
						class="action-button action-button-secondary"
						on:click=move |_| ctl.step_forward()
					>
						"Step"
					</button>
				</div>
			</div>
		}
		.into_any()
	}
}
