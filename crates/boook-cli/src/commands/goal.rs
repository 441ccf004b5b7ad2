//! Reading goal command handlers

use anyhow::{bail, Result};
use chrono::Datelike;
use uuid::Uuid;

use boook_core::{BookStore, NewReadingGoal, ReadingGoalPatch};

use crate::output::Output;

/// Add a yearly reading goal
///
/// Year uniqueness is checked here; the store accepts duplicates.
pub fn add(store: &mut BookStore, year: i32, target: u32, output: &Output) -> Result<()> {
    if target == 0 {
        bail!("Target must be at least 1 book.");
    }
    if store.reading_goals().iter().any(|g| g.year == year) {
        bail!("A goal for {} already exists. Update it instead.", year);
    }

    let current_books = finished_in_year(store, year);
    let id = store.add_reading_goal(NewReadingGoal {
        year,
        target_books: target,
        current_books: current_books as u32,
    });

    output.success(&format!("Added goal for {}: {} book(s)", year, target));
    if output.is_quiet() {
        println!("{}", id);
    }
    Ok(())
}

/// List goals with the finished-count derived for each year
pub fn list(store: &BookStore, output: &Output) -> Result<()> {
    let goals: Vec<_> = store
        .reading_goals()
        .iter()
        .map(|goal| (goal, finished_in_year(store, goal.year)))
        .collect();

    output.print_goals(&goals);
    Ok(())
}

/// Update an existing goal
pub fn update(
    store: &mut BookStore,
    id: String,
    year: Option<i32>,
    target: Option<u32>,
    output: &Output,
) -> Result<()> {
    let uuid = parse_goal_id(&id, store)?;

    if target == Some(0) {
        bail!("Target must be at least 1 book.");
    }
    if let Some(new_year) = year {
        if store
            .reading_goals()
            .iter()
            .any(|g| g.year == new_year && g.id != uuid)
        {
            bail!("A goal for {} already exists.", new_year);
        }
    }

    store.update_reading_goal(
        uuid,
        ReadingGoalPatch {
            year,
            target_books: target,
            ..ReadingGoalPatch::default()
        },
    );

    output.success("Goal updated");
    Ok(())
}

/// Delete a goal
pub fn delete(store: &mut BookStore, id: String, output: &Output) -> Result<()> {
    let uuid = parse_goal_id(&id, store)?;

    store.delete_reading_goal(uuid);

    output.success(&format!("Deleted goal: {}", uuid));
    Ok(())
}

/// Count books finished in the given year
fn finished_in_year(store: &BookStore, year: i32) -> usize {
    store
        .books()
        .iter()
        .filter(|b| b.date_finished.is_some_and(|d| d.year() == year))
        .count()
}

/// Parse a goal ID (supports full UUID or prefix)
fn parse_goal_id(id: &str, store: &BookStore) -> Result<Uuid> {
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    let matches: Vec<_> = store
        .reading_goals()
        .iter()
        .filter(|g| g.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No goal found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => bail!("Ambiguous ID. Please provide more characters."),
    }
}
