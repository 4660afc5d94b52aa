//! Test fixtures: file blobs with real leading signatures.

#![allow(dead_code)]

pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

/// A PNG signature padded with zeros to `len` bytes.
pub fn png_of_size(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len.max(PNG_SIGNATURE.len())];
    data[..PNG_SIGNATURE.len()].copy_from_slice(&PNG_SIGNATURE);
    data
}

/// Minimal PDF document bytes.
pub fn minimal_pdf() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n"
        .to_vec()
}
