use serde::Serialize;

use crate::config::LabelConfig;
use crate::intake::InputFile;

/// `prefix`, a space, then `number` zero-padded to at least `width` digits.
///
/// The width is a minimum: numbers with more digits are written in full.
pub fn format_label(prefix: &str, number: u64, width: usize) -> String {
    format!("{prefix} {number:0width$}")
}

/// The label range a single file will receive from the stamping service.
#[derive(Clone, Debug, Serialize)]
pub struct AllocationEntry {
    #[serde(skip)]
    pub file: InputFile,
    pub name: String,
    pub page_count: usize,
    pub first_number: u64,
    pub last_number: u64,
    pub first_label: String,
    pub last_label: String,
    pub range_text: String,
}

/// Assign consecutive label ranges to `files` in list order.
///
/// Pure: identical inputs always give identical output. Files whose page
/// count is still unknown are numbered as one page.
pub fn allocate(files: &[InputFile], config: &LabelConfig) -> Vec<AllocationEntry> {
    let mut counter = config.start_number;
    files
        .iter()
        .map(|file| {
            let pages = file.effective_page_count();
            let first_number = counter;
            let last_number = counter.saturating_add(pages as u64 - 1);
            counter = last_number.saturating_add(1);

            let first_label = format_label(&config.prefix, first_number, config.digit_width);
            let last_label = format_label(&config.prefix, last_number, config.digit_width);
            let range_text = if pages == 1 {
                first_label.clone()
            } else {
                format!("{first_label} - {last_label}")
            };

            AllocationEntry {
                file: file.clone(),
                name: file.name.clone(),
                page_count: pages,
                first_number,
                last_number,
                first_label,
                last_label,
                range_text,
            }
        })
        .collect()
}

/// Last number the service will stamp, or `None` when nothing is allocated.
pub fn last_number_used(entries: &[AllocationEntry]) -> Option<u64> {
    entries.last().map(|e| e.last_number)
}

/// Number stamped on one-based `page` of the file at `file_index`.
pub fn number_for_page(entries: &[AllocationEntry], file_index: usize, page: usize) -> Option<u64> {
    let entry = entries.get(file_index)?;
    if page == 0 || page > entry.page_count {
        return None;
    }
    Some(entry.first_number.saturating_add(page as u64 - 1))
}

/// Label stamped on one-based `page` of the file at `file_index`.
pub fn label_for_page(
    entries: &[AllocationEntry],
    config: &LabelConfig,
    file_index: usize,
    page: usize,
) -> Option<String> {
    let number = number_for_page(entries, file_index, page)?;
    Some(format_label(&config.prefix, number, config.digit_width))
}
