//! Streaming extraction of `<data>` entries from `.resx` documents.
//!
//! Entries are produced lazily in document order. Any well-formedness problem ends the
//! stream with an [`Error::InputFormat`]; callers that collect into a `Result` therefore
//! never observe a partial entry list.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufRead, BufReader, Read},
    iter::FusedIterator,
    path::Path,
};

use encoding_rs::Encoding;
use encoding_rs_io::{DecodeReaderBytes, DecodeReaderBytesBuilder};
use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{error::Error, ident, types::ResourceEntry};

/// A byte stream transcoded to UTF-8.
pub type DecodedReader<R> = BufReader<DecodeReaderBytes<R, Vec<u8>>>;

/// Wraps `reader` so that UTF-16 and BOM-prefixed input reaches the XML parser as UTF-8.
///
/// With `encoding` unset the encoding is sniffed from the BOM and BOM-less input passes
/// through untouched.
pub fn decode<R: Read>(reader: R, encoding: Option<&'static Encoding>) -> DecodedReader<R> {
    BufReader::new(
        DecodeReaderBytesBuilder::new()
            .encoding(encoding)
            .bom_override(true)
            .strip_bom(true)
            .build(reader),
    )
}

/// Lazy iterator over the entries of one resource document.
pub struct ResxReader<R: BufRead> {
    reader: Reader<R>,
    depth: usize,
    seen_root: bool,
    root_closed: bool,
    finished: bool,
    pending: VecDeque<ResourceEntry>,
}

impl ResxReader<DecodedReader<File>> {
    /// Opens a resource file, sniffing its encoding from the BOM.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let file = File::open(path).map_err(Error::ResourceUnavailable)?;
        Ok(Self::from_reader(decode(file, None)))
    }
}

impl<'a> ResxReader<&'a [u8]> {
    /// Reads entries from an in-memory UTF-8 document.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Self::from_reader(s.as_bytes())
    }
}

impl<R: BufRead> ResxReader<R> {
    pub fn from_reader(reader: R) -> Self {
        let mut reader = Reader::from_reader(reader);
        reader.config_mut().trim_text(false);
        Self {
            reader,
            depth: 0,
            seen_root: false,
            root_closed: false,
            finished: false,
            pending: VecDeque::new(),
        }
    }

    fn byte_position(&self) -> u64 {
        self.reader.buffer_position() as u64
    }

    fn open_element(&mut self, position: u64) -> Result<(), Error> {
        if self.depth == 0 {
            if self.root_closed {
                return Err(Error::input_format(
                    position,
                    "document has more than one root element",
                ));
            }
            self.seen_root = true;
        }
        self.depth += 1;
        Ok(())
    }

    fn close_element(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.root_closed = true;
        }
    }

    fn next_entry(&mut self) -> Result<Option<ResourceEntry>, Error> {
        if let Some(entry) = self.pending.pop_front() {
            return Ok(Some(entry));
        }

        let mut buf = Vec::new();
        loop {
            buf.clear();
            let position = self.byte_position();
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::from_xml(position, e))?;

            match event {
                Event::Start(ref e) => {
                    self.open_element(position)?;
                    if self.depth > 1 && e.name().as_ref() == b"data" {
                        let key = data_key(e, position)?;
                        let mut entries = self.read_data_tree(key, position)?.into_iter();
                        let first = entries.next();
                        self.pending.extend(entries);
                        return Ok(first);
                    }
                }
                Event::Empty(ref e) => {
                    self.open_element(position)?;
                    let is_data = self.depth > 1 && e.name().as_ref() == b"data";
                    self.close_element();
                    if is_data {
                        let key = data_key(e, position)?;
                        return Err(missing_value(&key, position));
                    }
                }
                Event::End(_) => self.close_element(),
                Event::Text(ref t) if self.depth == 0 => {
                    if !t.iter().all(u8::is_ascii_whitespace) {
                        return Err(Error::input_format(
                            position,
                            "text content outside of the root element",
                        ));
                    }
                }
                Event::CData(_) if self.depth == 0 => {
                    return Err(Error::input_format(
                        position,
                        "CDATA section outside of the root element",
                    ));
                }
                Event::Eof => {
                    if self.depth > 0 {
                        return Err(Error::input_format(
                            position,
                            "unexpected end of document: unclosed element",
                        ));
                    }
                    if !self.seen_root {
                        return Err(Error::input_format(position, "root element is missing"));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    /// Consumes a `<data>` element up to its end tag.
    ///
    /// Returns the element's entry followed by the entries of any `<data>` elements nested
    /// inside it, in start-tag order. Each entry takes the text of its own first `<value>`
    /// descendant.
    fn read_data_tree(&mut self, key: String, start: u64) -> Result<Vec<ResourceEntry>, Error> {
        let mut frames = vec![DataFrame::new(key, start, self.depth)];
        let mut open = vec![0usize];
        let mut buf = Vec::new();

        while let Some(&innermost) = open.last() {
            buf.clear();
            let position = self.byte_position();
            let event = self
                .reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::from_xml(position, e))?;

            match event {
                Event::Start(ref e) => {
                    self.open_element(position)?;
                    match e.name().as_ref() {
                        b"value" => {
                            for &i in &open {
                                frames[i].begin_value(self.depth);
                            }
                        }
                        b"data" => {
                            let key = data_key(e, position)?;
                            open.push(frames.len());
                            frames.push(DataFrame::new(key, position, self.depth));
                        }
                        _ => {}
                    }
                }
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"value" => {
                        for &i in &open {
                            frames[i].empty_value();
                        }
                    }
                    b"data" => {
                        let key = data_key(e, position)?;
                        return Err(missing_value(&key, position));
                    }
                    _ => {}
                },
                Event::End(_) => {
                    for &i in &open {
                        frames[i].end_element(self.depth);
                    }
                    if frames[innermost].depth == self.depth {
                        open.pop();
                    }
                    self.close_element();
                }
                Event::Text(ref t) if open.iter().any(|&i| frames[i].is_capturing()) => {
                    let unescaped = t.unescape().map_err(|e| Error::from_xml(position, e))?;
                    for &i in &open {
                        frames[i].push_text(&unescaped);
                    }
                }
                Event::CData(ref c) if open.iter().any(|&i| frames[i].is_capturing()) => {
                    let decoded = std::str::from_utf8(c).map_err(|e| {
                        Error::input_format(position, format!("invalid UTF-8 in CDATA: {e}"))
                    })?;
                    for &i in &open {
                        frames[i].push_text(decoded);
                    }
                }
                Event::Eof => {
                    return Err(Error::input_format(
                        position,
                        format!(
                            "unexpected end of document inside `data` element `{}`",
                            frames[innermost].key
                        ),
                    ));
                }
                _ => {}
            }
        }

        frames.into_iter().map(DataFrame::into_entry).collect()
    }
}

/// Value capture state of one open `<data>` element.
struct DataFrame {
    key: String,
    start: u64,
    /// Element depth of the `<data>` start tag.
    depth: usize,
    capture_depth: Option<usize>,
    text: String,
    value: Option<String>,
}

impl DataFrame {
    fn new(key: String, start: u64, depth: usize) -> Self {
        Self {
            key,
            start,
            depth,
            capture_depth: None,
            text: String::new(),
            value: None,
        }
    }

    fn is_capturing(&self) -> bool {
        self.capture_depth.is_some()
    }

    fn begin_value(&mut self, depth: usize) {
        if self.value.is_none() && self.capture_depth.is_none() {
            self.capture_depth = Some(depth);
        }
    }

    fn empty_value(&mut self) {
        if self.value.is_none() && self.capture_depth.is_none() {
            self.value = Some(String::new());
        }
    }

    fn end_element(&mut self, depth: usize) {
        if self.capture_depth == Some(depth) {
            self.value = Some(std::mem::take(&mut self.text));
            self.capture_depth = None;
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.is_capturing() {
            self.text.push_str(text);
        }
    }

    fn into_entry(self) -> Result<ResourceEntry, Error> {
        match self.value {
            Some(value) => Ok(ResourceEntry {
                key: self.key,
                value,
            }),
            None => Err(missing_value(&self.key, self.start)),
        }
    }
}

impl<R: BufRead> Iterator for ResxReader<R> {
    type Item = Result<ResourceEntry, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_entry() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for ResxReader<R> {}

/// Reads and validates the `name` attribute of a `<data>` element.
fn data_key(e: &BytesStart, position: u64) -> Result<String, Error> {
    let mut name = None;
    let mut kind = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::input_format(position, e.to_string()))?;
        match attr.key.as_ref() {
            b"name" => {
                name = Some(
                    attr.unescape_value()
                        .map_err(|e| Error::from_xml(position, e))?
                        .into_owned(),
                );
            }
            b"type" | b"mimetype" => {
                kind = Some(
                    attr.unescape_value()
                        .map_err(|e| Error::from_xml(position, e))?
                        .into_owned(),
                );
            }
            _ => {}
        }
    }

    let name = name.ok_or_else(|| {
        Error::input_format(position, "`data` element is missing its `name` attribute")
    })?;
    if !ident::is_valid_identifier(&name) {
        return Err(Error::input_format(
            position,
            format!("resource key `{name}` is not a valid identifier"),
        ));
    }
    if let Some(kind) = kind {
        tracing::warn!(key = %name, kind = %kind, "typed resource entry is generated as a string accessor");
    }
    Ok(name)
}

fn missing_value(key: &str, position: u64) -> Error {
    Error::input_format(
        position,
        format!("`data` element `{key}` has no `value` child"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn read_all(xml: &str) -> Result<Vec<ResourceEntry>, Error> {
        ResxReader::from_str(xml).collect()
    }

    #[test]
    fn test_reads_entries_in_document_order() {
        let entries = read_all(indoc! {r#"
            <?xml version="1.0" encoding="utf-8"?>
            <root>
              <resheader name="resmimetype"><value>text/microsoft-resx</value></resheader>
              <data name="Zebra" xml:space="preserve"><value>Z</value></data>
              <data name="Apple" xml:space="preserve">
                <value>A</value>
                <comment>ignored</comment>
              </data>
            </root>
        "#})
        .unwrap();

        assert_eq!(
            entries,
            vec![ResourceEntry::new("Zebra", "Z"), ResourceEntry::new("Apple", "A")]
        );
    }

    #[test]
    fn test_nested_data_elements_are_found() {
        let entries =
            read_all(r#"<root><group><data name="Deep"><value>x</value></data></group></root>"#)
                .unwrap();
        assert_eq!(entries, vec![ResourceEntry::new("Deep", "x")]);
    }

    #[test]
    fn test_data_inside_data_yields_both_in_document_order() {
        let entries = read_all(indoc! {r#"
            <root>
              <data name="Outer">
                <value>o</value>
                <data name="Inner"><value>i</value></data>
              </data>
              <data name="After"><value>a</value></data>
            </root>
        "#})
        .unwrap();

        assert_eq!(
            entries,
            vec![
                ResourceEntry::new("Outer", "o"),
                ResourceEntry::new("Inner", "i"),
                ResourceEntry::new("After", "a"),
            ]
        );
    }

    #[test]
    fn test_deeply_nested_data_keeps_start_tag_order() {
        let keys: Vec<String> = read_all(
            r#"<root><data name="A"><data name="B"><data name="C"><value>c</value></data><value>b</value></data><value>a</value></data></root>"#,
        )
        .unwrap()
        .into_iter()
        .map(|e| e.key)
        .collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_nested_data_without_value_is_fatal() {
        let err = read_all(
            r#"<root><data name="Outer"><value>o</value><data name="Inner"><comment/></data></data></root>"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("`Inner` has no `value` child"));
    }

    #[test]
    fn test_root_named_data_is_not_an_entry() {
        let entries = read_all(r#"<data name="Root"><value>x</value></data>"#).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn test_value_is_unescaped_and_untrimmed() {
        let entries = read_all(
            "<root><data name=\"Markup\"><value>  &lt;b&gt; &amp; &#x41;\nnext  </value></data></root>",
        )
        .unwrap();
        assert_eq!(entries[0].value, "  <b> & A\nnext  ");
    }

    #[test]
    fn test_cdata_value() {
        let entries =
            read_all(r#"<root><data name="Raw"><value><![CDATA[<i>raw</i>]]></value></data></root>"#)
                .unwrap();
        assert_eq!(entries[0].value, "<i>raw</i>");
    }

    #[test]
    fn test_first_value_wins() {
        let entries = read_all(
            r#"<root><data name="Twice"><value>first</value><value>second</value></data></root>"#,
        )
        .unwrap();
        assert_eq!(entries[0].value, "first");
    }

    #[test]
    fn test_empty_value_element() {
        let entries = read_all(r#"<root><data name="Empty"><value/></data></root>"#).unwrap();
        assert_eq!(entries[0].value, "");
    }

    #[test]
    fn test_missing_name_is_fatal() {
        let err = read_all(r#"<root><data><value>x</value></data></root>"#).unwrap_err();
        assert!(err.is_input_format());
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_missing_value_is_fatal() {
        let err = read_all(r#"<root><data name="NoValue"><comment>c</comment></data></root>"#)
            .unwrap_err();
        assert!(err.to_string().contains("`NoValue` has no `value` child"));

        let err = read_all(r#"<root><data name="SelfClosing"/></root>"#).unwrap_err();
        assert!(err.to_string().contains("`SelfClosing` has no `value` child"));
    }

    #[test]
    fn test_invalid_key_is_fatal() {
        let err =
            read_all(r#"<root><data name="Hello World"><value>x</value></data></root>"#).unwrap_err();
        assert!(err.is_input_format());
        assert!(err.to_string().contains("not a valid identifier"));
    }

    #[test]
    fn test_malformed_documents() {
        for xml in [
            "",
            "<root>",
            "<root><data name=\"A\"><value>x</data></root>",
            "<root/><root/>",
            "junk<root/>",
            "<root><data name=\"A\"><value>&bogus;</value></data></root>",
        ] {
            let err = read_all(xml).unwrap_err();
            assert!(err.is_input_format(), "{xml:?} gave {err:?}");
        }
    }

    #[test]
    fn test_entries_before_error_are_still_yielded_lazily() {
        let mut reader = ResxReader::from_str(
            r#"<root><data name="Ok"><value>x</value></data><data name="Bad"/></root>"#,
        );
        assert_eq!(reader.next().unwrap().unwrap().key, "Ok");
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let xml = r#"<root><data name="Greeting"><value>Grüß</value></data></root>"#;
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let entries: Vec<_> = ResxReader::from_reader(decode(bytes.as_slice(), None))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries, vec![ResourceEntry::new("Greeting", "Grüß")]);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(br#"<root><data name="A"><value>a</value></data></root>"#);
        let entries: Vec<_> = ResxReader::from_reader(decode(bytes.as_slice(), None))
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_explicit_encoding() {
        let bytes = b"<root><data name=\"A\"><value>caf\xe9</value></data></root>";
        let entries: Vec<_> =
            ResxReader::from_reader(decode(bytes.as_slice(), Some(encoding_rs::WINDOWS_1252)))
                .collect::<Result<_, _>>()
                .unwrap();
        assert_eq!(entries[0].value, "café");
    }

    #[test]
    fn test_open_missing_file() {
        let err = ResxReader::open("/definitely/not/here.resx").err().unwrap();
        assert!(err.is_resource_unavailable());
    }
}
