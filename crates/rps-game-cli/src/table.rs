//! Help table: every move's outcome against every other move.

use rps_game_core::RelationTable;
use std::fmt::Write;

const CORNER: &str = "Player:";

/// Render the relation matrix as a bordered text table.
///
/// Rows are the player's move, columns the computer's.
pub fn render(table: &RelationTable) -> String {
    let header: Vec<&str> = std::iter::once(CORNER)
        .chain(table.moves().iter())
        .collect();
    let body: Vec<Vec<&str>> = table
        .rows()
        .map(|(name, outcomes)| {
            std::iter::once(name)
                .chain(outcomes.iter().map(|o| o.as_str()))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = (0..header.len())
        .map(|col| {
            std::iter::once(&header)
                .chain(&body)
                .map(|row| row[col].chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let rule = separator(&widths);
    out.push_str(&rule);
    push_row(&mut out, &header, &widths);
    out.push_str(&rule);
    for row in &body {
        push_row(&mut out, row, &widths);
    }
    out.push_str(&rule);
    out
}

fn separator(widths: &[usize]) -> String {
    let mut line = String::from("+");
    for width in widths {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn push_row(out: &mut String, cells: &[&str], widths: &[usize]) {
    out.push('|');
    for (cell, width) in cells.iter().zip(widths) {
        // Writing to a String cannot fail
        let _ = write!(out, " {:<width$} |", cell, width = width);
    }
    out.push('\n');
}
