use console::Style;
use myofinder_core::io::csv::SummaryRow;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    missing: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            missing: Style::new().dim().yellow(),
        }
    }
}

pub fn print_project_summary(title: &str, rows: &[SummaryRow]) {
    let s = Styles::new();
    let heading = if title.is_empty() { "Myofinder Project" } else { title };

    println!();
    println!("  {}", s.title.apply_to(heading));
    println!(
        "  {}",
        s.title
            .apply_to("\u{2550}".repeat(heading.chars().count().max(16)))
    );
    println!();

    if rows.is_empty() {
        println!("  {}", s.missing.apply_to("no images"));
        println!();
        return;
    }

    for row in rows {
        println!("  {}", s.header.apply_to(&row.name));
        println!(
            "    {:<14}{}",
            s.label.apply_to("Nuclei"),
            s.value.apply_to(row.total)
        );
        println!(
            "    {:<14}{}",
            s.label.apply_to("Positive"),
            s.value.apply_to(row.positive)
        );
        let label = row.ratio_label();
        let ratio = if row.positive_ratio.is_some_and(|r| r > 0.0) {
            s.value.apply_to(label)
        } else {
            s.missing.apply_to(label)
        };
        println!("    {:<14}{}", s.label.apply_to("Fusion index"), ratio);
        println!(
            "    {:<14}{}",
            s.label.apply_to("Fiber ratio"),
            s.value.apply_to(format!("{:.4}", row.fiber_area_ratio))
        );
        println!();
    }
}
