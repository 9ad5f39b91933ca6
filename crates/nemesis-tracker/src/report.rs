//! Plain-text rendering of a decision cycle.
//!
//! Turns a `CycleReport` into the lines shown to the player: the goal and
//! its next steps, the ready recipes by grouping, and the guidance for the
//! tracked recipe.

use nemesis_core::{
    CycleReport, GroupedStep, RecipeBook, RecipeEntry, TrackEvent, TrackedGuidance,
    TrackerSession,
};

/// Joins grouped steps as "2x Assassin, Toxic".
fn join_grouped(steps: &[GroupedStep]) -> String {
    steps
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn push_group(lines: &mut Vec<String>, heading: &str, recipes: &[&RecipeEntry]) {
    if recipes.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    for recipe in recipes {
        lines.push(format!("  - {} ({})", recipe.name, recipe.recipe.join(", ")));
    }
}

/// Renders the goal section.
#[must_use]
pub fn render_goal(report: &CycleReport<'_>) -> Vec<String> {
    let Some(goal) = report.goal else {
        return vec!["No goal recipe selected.".to_string()];
    };

    let mut lines = vec![format!("Working towards {}.", goal.name)];
    let steps = &report.next_steps;
    if !steps.recipes_to_run.is_empty() {
        lines.push(format!("Run {}", join_grouped(&steps.grouped_recipes())));
    }
    if !steps.items_to_collect.is_empty() {
        lines.push(format!("Collect {}", join_grouped(&steps.grouped_items())));
    }
    if steps.is_empty() {
        lines.push("Umm... nothing to be done!".to_string());
    }
    lines
}

/// Renders the tracked recipe guidance.
#[must_use]
pub fn render_guidance(guidance: &TrackedGuidance) -> Vec<String> {
    match guidance {
        TrackedGuidance::Complete { recipe } => vec![format!("Recipe {recipe} is complete!")],
        TrackedGuidance::MissingComponents { recipe, missing } => vec![format!(
            "You are missing components of recipe {recipe}: {}",
            missing.join(", ")
        )],
        TrackedGuidance::InProgress {
            recipe,
            extraneous,
            order,
        } => {
            let mut lines = Vec::new();
            if !extraneous.is_empty() {
                lines.push(format!(
                    "You put in components the recipe {recipe} doesn't use: {}",
                    extraneous.join(", ")
                ));
            }
            lines.push(format!("Next for {recipe}:"));
            lines.extend(order.iter().map(|(item, index)| format!("  {index}. {item}")));
            lines
        },
    }
}

/// Renders a whole cycle.
#[must_use]
pub fn render(report: &CycleReport<'_>) -> Vec<String> {
    let mut lines = render_goal(report);

    if let Some(tracked) = report.tracked_not_ready {
        lines.push(format!("{} (not enough ingredients)", tracked.name));
    }
    push_group(&mut lines, "Ready toward the goal:", &report.toward_goal);
    push_group(
        &mut lines,
        "Not worked towards currently, but marked as desired:",
        &report.desired,
    );
    push_group(
        &mut lines,
        "Not marked as desired, but ready anyway:",
        &report.other,
    );

    if !report.completed.is_empty() {
        let names: Vec<&str> = report.completed.iter().map(|r| r.name.as_str()).collect();
        lines.push(format!("Complete in crafting slots: {}", names.join(", ")));
    }
    if !report.combinable.is_empty() {
        let left: Vec<&str> = report.combinable.iter().map(String::as_str).collect();
        lines.push(format!("Left over in crafting slots: {}", left.join(", ")));
    }

    if let Some(guidance) = &report.guidance {
        lines.extend(render_guidance(guidance));
    }
    if let Some(line) = report.track_event.as_ref().and_then(render_event) {
        lines.push(line);
    }
    lines
}

/// Line announcing the end of tracking, if the event is one.
pub fn render_event(event: &TrackEvent) -> Option<String> {
    match event {
        TrackEvent::Completed(name) => Some(format!("No longer tracking {name}.")),
        TrackEvent::Dropped(name) => Some(format!("Stopped tracking {name}.")),
        _ => None,
    }
}

/// Renders the stash, marking items nothing wants.
#[must_use]
pub fn render_items<'a>(
    session: &TrackerSession,
    book: &RecipeBook,
    items: impl IntoIterator<Item = (&'a str, u32)>,
) -> Vec<String> {
    items
        .into_iter()
        .map(|(item, count)| {
            let label = if count == 1 {
                item.to_string()
            } else {
                format!("{count}x {item}")
            };
            if session.is_undesired_item(book, item) {
                format!("  {label} (not needed)")
            } else {
                format!("  {label}")
            }
        })
        .collect()
}
