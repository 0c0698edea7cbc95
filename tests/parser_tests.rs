use std::io::Write;

use wikisieve::PageRecord;
use wikisieve::dump::{DumpError, PageStream};

fn articles_only() -> wikisieve::dump::NsFilter {
    Box::new(|ns| ns == Some(0))
}

fn parse_all(xml: &str) -> Vec<PageRecord> {
    PageStream::from_xml(xml, articles_only())
        .collect::<Result<Vec<_>, _>>()
        .expect("stream should parse cleanly")
}

const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<mediawiki xmlns="http://www.mediawiki.org/xml/export-0.10/">
  <page>
    <title>Cat</title>
    <ns>0</ns>
    <id>1</id>
    <revision>
      <id>100</id>
      <text>Cats are small felines.</text>
    </revision>
  </page>
  <page>
    <title>Dog</title>
    <ns>0</ns>
    <id>2</id>
    <redirect title="Canine" />
    <revision>
      <id>101</id>
      <text>#REDIRECT [[Canine]]</text>
    </revision>
  </page>
  <page>
    <title>Talk:Cat</title>
    <ns>1</ns>
    <id>3</id>
    <revision>
      <id>102</id>
      <text>Discussion page.</text>
    </revision>
  </page>
</mediawiki>
"#;

#[test]
fn emits_namespace_zero_pages_in_document_order() {
    let pages = parse_all(SAMPLE_XML);
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].title, "Cat");
    assert_eq!(pages[0].text, "Cats are small felines.");
    assert_eq!(pages[0].redirect, None);
    assert_eq!(pages[1].title, "Dog");
}

#[test]
fn redirect_target_comes_from_the_attribute() {
    let pages = parse_all(SAMPLE_XML);
    assert_eq!(pages[1].redirect.as_deref(), Some("Canine"));
}

#[test]
fn nonzero_namespace_is_dropped_before_the_queue() {
    let pages = parse_all(SAMPLE_XML);
    assert!(pages.iter().all(|p| p.title != "Talk:Cat"));
}

#[test]
fn namespace_predicate_is_pluggable() {
    let pages: Vec<_> = PageStream::from_xml(SAMPLE_XML, Box::new(|_| true))
        .collect::<Result<Vec<_>, _>>()
        .unwrap();
    assert_eq!(pages.len(), 3);
}

#[test]
fn page_without_text_element_produces_no_record() {
    let xml = r#"<mediawiki>
  <page>
    <title>Stub</title>
    <ns>0</ns>
  </page>
  <page>
    <title>Real</title>
    <ns>0</ns>
    <revision><text>body</text></revision>
  </page>
</mediawiki>"#;
    let pages = parse_all(xml);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "Real");
}

#[test]
fn page_without_namespace_is_dropped() {
    let xml = r#"<mediawiki>
  <page>
    <title>NoNs</title>
    <revision><text>body</text></revision>
  </page>
</mediawiki>"#;
    assert!(parse_all(xml).is_empty());
}

#[test]
fn unparsable_namespace_is_dropped() {
    let xml = r#"<mediawiki>
  <page>
    <title>BadNs</title>
    <ns>zero</ns>
    <revision><text>body</text></revision>
  </page>
</mediawiki>"#;
    assert!(parse_all(xml).is_empty());
}

#[test]
fn namespace_does_not_leak_into_the_next_page() {
    // First page is namespace 0; second carries no <ns> at all.
    let xml = r#"<mediawiki>
  <page>
    <title>First</title>
    <ns>0</ns>
    <revision><text>a</text></revision>
  </page>
  <page>
    <title>Second</title>
    <revision><text>b</text></revision>
  </page>
</mediawiki>"#;
    let pages = parse_all(xml);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].title, "First");
}

#[test]
fn self_closing_text_counts_as_present_but_empty() {
    let xml = r#"<mediawiki>
  <page>
    <title>Empty</title>
    <ns>0</ns>
    <revision><text bytes="0" /></revision>
  </page>
</mediawiki>"#;
    let pages = parse_all(xml);
    assert_eq!(pages.len(), 1);
    assert_eq!(pages[0].text, "");
}

#[test]
fn entities_and_cdata_accumulate_into_fields() {
    let xml = r#"<mediawiki>
  <page>
    <title>Tom &amp; Jerry</title>
    <ns>0</ns>
    <revision><text><![CDATA[a < b]]> and more</text></revision>
  </page>
</mediawiki>"#;
    let pages = parse_all(xml);
    assert_eq!(pages[0].title, "Tom & Jerry");
    assert_eq!(pages[0].text, "a < b and more");
}

#[test]
fn characters_outside_tracked_elements_are_discarded() {
    // <id> content arrives while the stack top is the page itself.
    let xml = r#"<mediawiki>
  <page>
    <title>Plain</title>
    <ns>0</ns>
    <id>42</id>
    <revision><id>7</id><text>body</text></revision>
  </page>
</mediawiki>"#;
    let pages = parse_all(xml);
    assert_eq!(pages[0].text, "body");
    assert_eq!(pages[0].title, "Plain");
}

#[test]
fn eof_inside_a_page_reports_truncation() {
    let xml = r#"<mediawiki>
  <page>
    <title>Cut</title>
    <ns>0</ns>
    <revision><text>the text just stop"#;
    let results: Vec<_> = PageStream::from_xml(xml, articles_only()).collect();
    assert!(matches!(
        results.last(),
        Some(Err(DumpError::Truncated)) | Some(Err(DumpError::Xml(_)))
    ));
}

#[test]
fn iterator_fuses_after_an_error() {
    let xml = "<mediawiki><page><title>Cut</title>";
    let mut stream = PageStream::from_xml(xml, articles_only());
    assert!(matches!(stream.next(), Some(Err(_))));
    assert!(stream.next().is_none());
}

#[test]
fn reads_bzip2_compressed_dumps() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mini.xml.bz2");
    let file = std::fs::File::create(&path)?;
    let mut encoder = bzip2::write::BzEncoder::new(file, bzip2::Compression::default());
    encoder.write_all(SAMPLE_XML.as_bytes())?;
    encoder.finish()?;

    let pages: Vec<_> = PageStream::articles(&path)?.collect::<Result<Vec<_>, _>>()?;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].title, "Cat");
    Ok(())
}

#[test]
fn truncated_bzip2_stream_surfaces_an_error() -> anyhow::Result<()> {
    // One large page so the cut point lands mid-page however the
    // decompressed prefix comes out.
    let big_text = "lorem ipsum dolor sit amet ".repeat(20_000);
    let xml = format!(
        "<mediawiki><page><title>Big</title><ns>0</ns><revision><text>{big_text}</text></revision></page></mediawiki>"
    );
    let mut compressed = Vec::new();
    {
        let mut encoder =
            bzip2::write::BzEncoder::new(&mut compressed, bzip2::Compression::default());
        encoder.write_all(xml.as_bytes())?;
        encoder.finish()?;
    }
    compressed.truncate(compressed.len() / 2);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("cut.xml.bz2");
    std::fs::write(&path, &compressed)?;

    let results: Vec<_> = PageStream::articles(&path)?.collect();
    assert!(matches!(results.last(), Some(Err(_))));
    Ok(())
}
