//! `LopdfExtractor` against PDFs built in memory, including the two kinds of
//! encrypted file.

mod common;

use common::{encrypted_pdf, pageless_pdf, sample_pdf};
use pdf_summarizer::{LopdfExtractor, PdfTextExtractor, SummarizeError};

#[test]
fn pages_are_joined_in_order() {
    let doc = LopdfExtractor
        .extract(&sample_pdf(&["Hello world.", "Page two."]))
        .unwrap();
    assert_eq!(doc.page_count(), 2);
    assert_eq!(doc.char_count(), 23);
    let first = doc.text().find("Hello world.").unwrap();
    let second = doc.text().find("Page two.").unwrap();
    assert!(first < second, "{:?}", doc.text());
}

#[test]
fn owner_password_only_pdf_is_read() {
    let doc = LopdfExtractor
        .extract(&encrypted_pdf(&["Restricted but readable."], true))
        .unwrap();
    assert_eq!(doc.page_count(), 1);
    assert!(
        doc.text().contains("Restricted but readable."),
        "{:?}",
        doc.text()
    );
}

#[test]
fn user_password_pdf_needs_a_password() {
    let err = LopdfExtractor
        .extract(&encrypted_pdf(&["Hidden."], false))
        .unwrap_err();
    assert!(
        matches!(err, SummarizeError::PasswordRequired),
        "got: {err:?}"
    );
}

#[test]
fn empty_page_tree_is_no_pages() {
    let err = LopdfExtractor.extract(&pageless_pdf()).unwrap_err();
    assert!(matches!(err, SummarizeError::NoPages), "got: {err:?}");
}
