use crate::config::ProjectConfig;
use colored::Colorize;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use stockroom::{Endpoint, Method, RouteTable, module};

pub fn run(cfg: &ProjectConfig) -> anyhow::Result<()> {
    let table = Endpoint::table()?;

    let source = match &cfg.config_path {
        Some(path) => path.display().to_string(),
        None => "built-in defaults".to_string(),
    };
    println!(
        "{} {} ({})",
        module::CODE.bold().cyan(),
        module::VERSION,
        source.bright_black()
    );
    println!("{}", render(&table));
    Ok(())
}

fn render(routes: &RouteTable<Endpoint>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Method")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
            Cell::new("Path")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
            Cell::new("Endpoint")
                .add_attribute(Attribute::Bold)
                .fg(Color::Cyan),
        ]);

    for (pattern, endpoint) in routes.iter() {
        table.add_row(vec![
            Cell::new(pattern.method().as_str()).fg(method_color(pattern.method())),
            Cell::new(format!("/{}", pattern.path())),
            Cell::new(endpoint.name()).fg(Color::DarkGrey),
        ]);
    }

    table
}

fn method_color(method: Method) -> Color {
    match method {
        Method::Get => Color::Green,
        Method::Post => Color::Yellow,
        Method::Put | Method::Patch => Color::Blue,
        Method::Delete => Color::Red,
    }
}
