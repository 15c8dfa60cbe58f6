use std::io::{Cursor, Write};

use bates_core::intake::{FileKind, InputFile};
use lopdf::{dictionary, Dictionary, Document as LoDocument, Object as LoObject, Stream};

/// Build a PDF with one page per entry of `page_sizes` (width, height in points).
pub fn build_pdf(page_sizes: &[(f32, f32)]) -> Vec<u8> {
    let mut doc = LoDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::with_capacity(page_sizes.len());
    for &(width, height) in page_sizes {
        let content_id = doc.add_object(Stream::new(dictionary! {}, b"q Q".to_vec()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), LoObject::Real(width), LoObject::Real(height)],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_sizes.len() as i64,
    };
    doc.objects.insert(pages_id, LoObject::Dictionary(pages));
    finish_pdf(doc, pages_id)
}

/// One page of `size` drawing `content`. `xobjects` adds any XObjects it
/// needs to the document and returns the page's `/XObject` dictionary.
pub fn build_pdf_with_content(
    size: (f32, f32),
    content: &[u8],
    xobjects: impl FnOnce(&mut LoDocument) -> Dictionary,
) -> Vec<u8> {
    let mut doc = LoDocument::with_version("1.5");
    let pages_id = doc.new_object_id();
    let xobject_dict = xobjects(&mut doc);
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.to_vec()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), LoObject::Real(size.0), LoObject::Real(size.1)],
        "Resources" => dictionary! { "XObject" => xobject_dict },
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, LoObject::Dictionary(pages));
    finish_pdf(doc, pages_id)
}

/// Letter-sized PDF with `pages` pages.
pub fn build_letter_pdf(pages: usize) -> Vec<u8> {
    build_pdf(&vec![(612.0, 792.0); pages])
}

/// PDF whose pages carry no MediaBox of their own. When `inherited` is
/// given, the page tree root declares it instead.
pub fn build_pdf_without_page_media_box(pages: usize, inherited: Option<(f32, f32)>) -> Vec<u8> {
    let mut doc = LoDocument::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<LoObject> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            })
            .into()
        })
        .collect();

    let mut root = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
    };
    if let Some((width, height)) = inherited {
        root.set(
            "MediaBox",
            vec![0.into(), 0.into(), LoObject::Real(width), LoObject::Real(height)],
        );
    }
    doc.objects.insert(pages_id, LoObject::Dictionary(root));
    finish_pdf(doc, pages_id)
}

fn finish_pdf(mut doc: LoDocument, pages_id: lopdf::ObjectId) -> Vec<u8> {
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out).expect("save test pdf");
    out
}

/// Encode a solid-color PNG.
pub fn build_png(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}

/// Build a zip bundle. Entries whose name ends in `/` become directories.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for (name, bytes) in entries {
        if name.ends_with('/') {
            writer.add_directory(*name, options).expect("zip dir");
        } else {
            writer.start_file(*name, options).expect("zip entry");
            writer.write_all(bytes).expect("zip write");
        }
    }
    writer.finish().expect("zip finish").into_inner()
}

/// One stored entry whose central directory claims `declared_size`
/// uncompressed bytes through a zip64 extra field, whatever `data` holds.
pub fn build_zip_declaring_size(name: &str, data: &[u8], declared_size: u64) -> Vec<u8> {
    let crc = crc32(data);
    let name_len = name.len() as u16;
    let data_len = data.len() as u32;
    let mut out = Vec::new();

    // Local file header.
    out.extend_from_slice(&0x0403_4b50u32.to_le_bytes());
    for field in [45u16, 0, 0, 0, 0x21] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&name_len.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(data);

    // Central directory header with a zip64 uncompressed size.
    let cd_offset = out.len() as u32;
    out.extend_from_slice(&0x0201_4b50u32.to_le_bytes());
    for field in [45u16, 45, 0, 0, 0, 0x21] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&crc.to_le_bytes());
    out.extend_from_slice(&data_len.to_le_bytes());
    out.extend_from_slice(&u32::MAX.to_le_bytes());
    for field in [name_len, 12, 0, 0, 0] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes());
    out.extend_from_slice(name.as_bytes());
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&8u16.to_le_bytes());
    out.extend_from_slice(&declared_size.to_le_bytes());
    let cd_size = out.len() as u32 - cd_offset;

    // End of central directory.
    out.extend_from_slice(&0x0605_4b50u32.to_le_bytes());
    for field in [0u16, 0, 1, 1] {
        out.extend_from_slice(&field.to_le_bytes());
    }
    out.extend_from_slice(&cd_size.to_le_bytes());
    out.extend_from_slice(&cd_offset.to_le_bytes());
    out.extend_from_slice(&0u16.to_le_bytes());
    out
}

fn crc32(data: &[u8]) -> u32 {
    let mut crc = !0u32;
    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            let mask = (crc & 1).wrapping_neg();
            crc = (crc >> 1) ^ (0xEDB8_8320 & mask);
        }
    }
    !crc
}

/// A document entry with a known page count and a placeholder payload.
pub fn document(path: &str, pages: Option<usize>) -> InputFile {
    let mut file = InputFile::new(path, b"%PDF-1.5".to_vec(), FileKind::Document);
    file.page_count = pages;
    file
}

/// A real PDF entry whose page count is not yet known.
pub fn pdf_file(path: &str, pages: usize) -> InputFile {
    InputFile::new(path, build_letter_pdf(pages), FileKind::Document)
}

pub fn image_file(path: &str) -> InputFile {
    InputFile::new(path, build_png(8, 8, [200, 200, 200, 255]), FileKind::Image)
}

pub fn names(files: &[InputFile]) -> Vec<&str> {
    files.iter().map(|f| f.name.as_str()).collect()
}
