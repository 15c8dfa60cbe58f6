use bates_core::bates::AllocationEntry;
use bates_core::config::LabelConfig;
use bates_core::index::{IndexTable, INDEX_COLUMNS};
use bates_core::intake::{FileKind, InputFile};
use console::Style;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    range: Style,
    unknown: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            range: Style::new().green(),
            unknown: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn print_title(s: &Styles, title: &str) {
    println!();
    println!("  {}", s.title.apply_to(title));
    println!(
        "  {}",
        s.title.apply_to("\u{2550}".repeat(title.chars().count()))
    );
    println!();
}

fn pages_text(file: &InputFile) -> String {
    match file.page_count {
        Some(n) => n.to_string(),
        None => "?".to_string(),
    }
}

pub fn print_files(files: &[InputFile]) {
    let s = Styles::new();
    print_title(&s, "Documents");

    for (i, file) in files.iter().enumerate() {
        let kind = match file.kind {
            FileKind::Document => "pdf",
            FileKind::Image => "image",
        };
        let pages = pages_text(file);
        let pages = if file.page_count.is_some() {
            s.value.apply_to(pages)
        } else {
            s.unknown.apply_to(pages)
        };
        println!(
            "  {:>3}. {:<40} {:<6} {:>5} pages  {}",
            i + 1,
            file.name,
            s.label.apply_to(kind),
            pages,
            s.path.apply_to(&file.original_path)
        );
    }

    let total: usize = files.iter().map(|f| f.effective_page_count()).sum();
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Files"),
        s.value.apply_to(files.len())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Pages"),
        s.value.apply_to(total)
    );
    println!();
}

pub fn print_label_config(config: &LabelConfig) {
    let s = Styles::new();
    println!("  {}", s.header.apply_to("Label"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Prefix"),
        s.value.apply_to(&config.prefix)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Start"),
        s.value.apply_to(config.start_number)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Digits"),
        s.value.apply_to(config.digit_width)
    );
    println!(
        "    {:<12}{} ({} pt padding)",
        s.label.apply_to("Zone"),
        s.value.apply_to(config.zone),
        config.zone_padding
    );
    println!(
        "    {:<12}{} {} pt",
        s.label.apply_to("Font"),
        s.value.apply_to(config.color.to_hex()),
        config.font_size
    );
    println!();
}

pub fn print_allocation(entries: &[AllocationEntry], config: &LabelConfig) {
    let s = Styles::new();
    print_title(&s, "Bates Ranges");
    print_label_config(config);

    println!("  {}", s.header.apply_to("Ranges"));
    for entry in entries {
        println!(
            "    {:<40} {:>5}  {}",
            entry.name,
            entry.page_count,
            s.range.apply_to(&entry.range_text)
        );
    }
    println!();
    if let Some(last) = bates_core::bates::last_number_used(entries) {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Last number"),
            s.value.apply_to(last)
        );
        println!();
    }
}

pub fn print_index(table: &IndexTable) {
    let s = Styles::new();
    print_title(&s, &table.title);
    println!(
        "  {:<14}{}",
        s.label.apply_to("Party"),
        s.value.apply_to(&table.party)
    );
    println!();

    println!(
        "  {:<12} {:<16} {:<40} {}",
        s.header.apply_to(INDEX_COLUMNS[0]),
        s.header.apply_to(INDEX_COLUMNS[1]),
        s.header.apply_to(INDEX_COLUMNS[2]),
        s.header.apply_to(INDEX_COLUMNS[3]),
    );
    for row in &table.rows {
        let [date, category, filename, range] = row.cells();
        println!(
            "  {:<12} {:<16} {:<40} {}",
            date,
            category,
            filename,
            s.range.apply_to(range)
        );
    }
    println!();
}
