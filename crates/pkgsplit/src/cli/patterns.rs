use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use pkgsplit_lib::{PackageGenerator, PRIORITY_USER};

/// Prints the registry in the order rules are consulted: priority first,
/// registration order among equals.
pub fn handle_patterns_command(generator: &PackageGenerator) -> Result<()> {
    let mut entries: Vec<(usize, &pkgsplit_lib::RegisteredPattern)> =
        generator.patterns().iter().enumerate().collect();
    entries.sort_by(|(a_index, a), (b_index, b)| {
        b.pattern
            .priority()
            .cmp(&a.pattern.priority())
            .then(a_index.cmp(b_index))
    });

    if entries.is_empty() {
        println!("{}", style("No patterns registered; every file goes to main").yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Pattern").fg(Color::Cyan),
        Cell::new("Mode").fg(Color::Cyan),
        Cell::new("Priority").fg(Color::Cyan),
        Cell::new("Package").fg(Color::Cyan),
    ]);

    for (index, entry) in entries {
        let priority = entry.pattern.priority();
        let priority_cell = if priority >= PRIORITY_USER {
            Cell::new(priority).fg(Color::Green)
        } else {
            Cell::new(priority)
        };

        table.add_row(vec![
            Cell::new(index + 1),
            Cell::new(entry.pattern.expression()),
            Cell::new(if entry.pattern.is_prefix() { "prefix" } else { "glob" }),
            priority_cell,
            Cell::new(&entry.target),
        ]);
    }

    println!("{}", table);
    Ok(())
}
