#[allow(dead_code)]
mod common;

use bates_core::error::PreviewError;
use bates_core::intake::{self, FileKind, NamedPayload, Selection};

use common::{build_letter_pdf, build_png, build_zip, build_zip_declaring_size, names};

#[test]
fn test_archive_skips_junk_and_sorts_naturally() {
    let pdf = build_letter_pdf(1);
    let png = build_png(4, 4, [0, 0, 0, 255]);
    let bundle = build_zip(&[
        ("docs/", b""),
        ("docs/b10.pdf", &pdf),
        ("docs/b2.pdf", &pdf),
        ("__MACOSX/docs/._b2.pdf", b"junk"),
        ("docs/.DS_Store", b"junk"),
        ("docs/notes.txt", b"hello"),
        ("docs/Scan.PNG", &png),
    ]);

    let files = intake::resolve(Selection::Single(NamedPayload::new("prod.zip", bundle)))
        .expect("resolve bundle");

    assert_eq!(names(&files), vec!["b2.pdf", "b10.pdf", "Scan.PNG"]);
    assert_eq!(files[0].original_path, "docs/b2.pdf");
    assert_eq!(files[0].kind, FileKind::Document);
    assert_eq!(files[0].page_count, None);
    assert_eq!(files[2].kind, FileKind::Image);
    assert_eq!(files[2].page_count, Some(1));
    assert_eq!(&*files[0].payload, pdf.as_slice());
}

#[test]
fn test_archive_with_only_junk_is_empty() {
    let bundle = build_zip(&[
        ("__MACOSX/._a.pdf", b"junk"),
        ("readme.txt", b"hi"),
        ("Thumbs.db", b"junk"),
    ]);
    let result = intake::resolve(Selection::Single(NamedPayload::new("empty.zip", bundle)));
    assert!(matches!(result, Err(PreviewError::EmptyArchive)));
}

#[test]
fn test_corrupt_archive_fails_to_decode() {
    let result = intake::resolve(Selection::Single(NamedPayload::new(
        "broken.zip",
        b"not a zip".to_vec(),
    )));
    assert!(matches!(result, Err(PreviewError::DecodeFailure(_))));
}

#[test]
fn test_archive_declaring_huge_entry_fails_to_decode() {
    let bundle = build_zip_declaring_size("a.pdf", b"%PDF-", 0xFFFF_FFFF_FFFF_FFF0);
    let result = intake::resolve(Selection::Single(NamedPayload::new("bundle.zip", bundle)));
    assert!(matches!(result, Err(PreviewError::DecodeFailure(_))));
}

#[test]
fn test_archive_entry_size_mismatch_fails_to_decode() {
    let bundle = build_zip_declaring_size("a.pdf", b"%PDF-", 4096);
    let result = intake::resolve(Selection::Single(NamedPayload::new("bundle.zip", bundle)));
    assert!(matches!(result, Err(PreviewError::DecodeFailure(_))));
}

#[test]
fn test_single_document_is_one_entry() {
    let files = intake::resolve(Selection::Single(NamedPayload::new(
        "Motion.PDF",
        build_letter_pdf(2),
    )))
    .expect("resolve pdf");
    assert_eq!(names(&files), vec!["Motion.PDF"]);
    assert_eq!(files[0].kind, FileKind::Document);
}

#[test]
fn test_single_unsupported_file_is_rejected() {
    let result = intake::resolve(Selection::Single(NamedPayload::new(
        "memo.docx",
        b"PK".to_vec(),
    )));
    match result {
        Err(PreviewError::UnsupportedInput(name)) => assert_eq!(name, "memo.docx"),
        other => panic!("expected UnsupportedInput, got {other:?}"),
    }
}

#[test]
fn test_single_junk_file_is_rejected() {
    let result = intake::resolve(Selection::Single(NamedPayload::new(
        "__MACOSX/._report.pdf",
        build_letter_pdf(1),
    )));
    assert!(matches!(result, Err(PreviewError::UnsupportedInput(_))));

    let result = intake::resolve(Selection::Single(NamedPayload::new(
        "._report.pdf",
        build_letter_pdf(1),
    )));
    assert!(matches!(result, Err(PreviewError::UnsupportedInput(_))));
}

#[test]
fn test_multiple_selection_expands_bundles() {
    let pdf = build_letter_pdf(1);
    let bundle = build_zip(&[("inner/exhibit 3.pdf", &pdf), ("inner/exhibit 12.pdf", &pdf)]);
    let selection = Selection::from(vec![
        NamedPayload::new("exhibit 20.pdf", pdf.clone()),
        NamedPayload::new("exhibits.zip", bundle),
        NamedPayload::new("notes.txt", b"skip".to_vec()),
        NamedPayload::new(".DS_Store", b"skip".to_vec()),
        NamedPayload::new("photo.jpeg", build_png(2, 2, [1, 2, 3, 255])),
    ]);

    let files = intake::resolve(selection).expect("resolve selection");
    assert_eq!(
        names(&files),
        vec!["exhibit 3.pdf", "exhibit 12.pdf", "exhibit 20.pdf", "photo.jpeg"]
    );
    assert_eq!(files[0].original_path, "inner/exhibit 3.pdf");
}

#[test]
fn test_multiple_selection_with_nothing_supported() {
    let selection = Selection::Multiple(vec![
        NamedPayload::new("a.txt", b"a".to_vec()),
        NamedPayload::new("b.doc", b"b".to_vec()),
    ]);
    assert!(matches!(
        intake::resolve(selection),
        Err(PreviewError::UnsupportedInput(_))
    ));
}

#[test]
fn test_multiple_selection_of_bad_bundles_keeps_their_error() {
    let selection = Selection::Multiple(vec![
        NamedPayload::new("broken.zip", b"not a zip".to_vec()),
        NamedPayload::new("notes.txt", b"skip".to_vec()),
    ]);
    assert!(matches!(
        intake::resolve(selection),
        Err(PreviewError::DecodeFailure(_))
    ));

    let empty = build_zip(&[("__MACOSX/._a.pdf", b"junk"), ("readme.txt", b"hi")]);
    let selection = Selection::Multiple(vec![
        NamedPayload::new("empty.zip", empty.clone()),
        NamedPayload::new("also-empty.zip", empty),
    ]);
    assert!(matches!(
        intake::resolve(selection),
        Err(PreviewError::EmptyArchive)
    ));
}

#[test]
fn test_multiple_selection_skips_bad_bundle_beside_documents() {
    let selection = Selection::Multiple(vec![
        NamedPayload::new("broken.zip", b"not a zip".to_vec()),
        NamedPayload::new("a.pdf", build_letter_pdf(1)),
    ]);
    let files = intake::resolve(selection).expect("resolve selection");
    assert_eq!(names(&files), vec!["a.pdf"]);
}

#[test]
fn test_single_payload_vec_becomes_single_selection() {
    let selection = Selection::from(vec![NamedPayload::new("a.zip", Vec::new())]);
    assert!(matches!(selection, Selection::Single(_)));
}

#[test]
fn test_natural_order_ignores_case_and_padding() {
    let mut names = vec!["Page10.pdf", "page2.pdf", "page1.pdf", "Page02b.pdf"];
    names.sort_by(|a, b| intake::natural_cmp(a, b));
    assert_eq!(names, vec!["page1.pdf", "page2.pdf", "Page02b.pdf", "Page10.pdf"]);
}
