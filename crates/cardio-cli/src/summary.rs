use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use cardio_cli::types::RunResult;
use cardio_model::CheckResult;

pub fn print_summary(result: &RunResult) {
    let report = &result.report;
    println!("Input: {}", result.input.display());
    println!("Rows: {}", result.rows);
    match &result.outputs {
        Some(outputs) => {
            println!("Output: {}", result.output_dir.display());
            println!("Featured dataset: {}", outputs.featured.display());
            println!("Quality report: {}", outputs.reports.html.display());
            if !outputs.warehouse.is_empty() {
                println!("Warehouse tables: {}", outputs.warehouse.len());
            }
        }
        None => println!("Dry run: no files written"),
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Check"),
        header_cell("Evaluated"),
        header_cell("Passed"),
        header_cell("Failed"),
        header_cell("Pass rate"),
        header_cell("Status"),
    ]);
    apply_table_style(&mut table);
    for column in 1..=4 {
        align_column(&mut table, column, CellAlignment::Right);
    }
    align_column(&mut table, 5, CellAlignment::Center);
    for check in &report.checks {
        table.add_row(check_row(check));
    }
    let score = &report.score;
    table.add_row(vec![
        Cell::new("OVERALL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(score.checks_passed).add_attribute(Attribute::Bold),
        count_cell(score.checks_total - score.checks_passed).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.1}", score.overall)).add_attribute(Attribute::Bold),
        threshold_cell(score.meets_threshold),
    ]);
    println!("{table}");
    println!(
        "Clean rows: {} of {} ({:.1}%)",
        score.clean_rows,
        result.rows,
        score.clean_row_rate * 100.0
    );
    if result.below_min_score()
        && let Some(min) = result.min_score
    {
        eprintln!(
            "Overall score {:.1} is below the minimum of {min:.1}",
            score.overall
        );
    }
}

fn check_row(check: &CheckResult) -> Vec<Cell> {
    let status = if check.is_pass() {
        Cell::new("PASS")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("FAIL")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    };
    vec![
        Cell::new(check.check.label()),
        Cell::new(check.evaluated),
        Cell::new(check.passed),
        count_cell(check.failed),
        Cell::new(format!("{:.1}%", check.pass_rate * 100.0)),
        status,
    ]
}

fn threshold_cell(meets: Option<bool>) -> Cell {
    match meets {
        Some(true) => Cell::new("OK").fg(Color::Green),
        Some(false) => Cell::new("LOW")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    }
}

fn count_cell(count: u64) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Red).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}
