//! Streaming reader for the dictionary XML dump.
//!
//! # Responsibility
//! - Turn the `<channel><item>...</item>...</channel>` document into
//!   `RawItem` records, one at a time, in document order.
//! - Read only the fields the importer uses, by exact element path.
//!
//! # Invariants
//! - Only direct `item` children of the root element are items.
//! - Fields are matched by full path below the item, so same-named elements
//!   nested elsewhere (relation or example blocks) never leak in.
//! - The first occurrence of a field wins.
//! - A field's value is its leading text; text after a child element is
//!   ignored.
//! - Escaped markup in text is unescaped exactly once.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub type SourceResult<T> = Result<T, SourceError>;

#[derive(Debug)]
pub enum SourceError {
    Io(std::io::Error),
    Xml { position: u64, message: String },
    MissingField { item: usize, field: &'static str },
    InvalidField {
        item: usize,
        field: &'static str,
        value: String,
    },
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "failed to read dictionary source: {err}"),
            Self::Xml { position, message } => {
                write!(f, "malformed dictionary XML at byte {position}: {message}")
            }
            Self::MissingField { item, field } => {
                write!(f, "item #{item} is missing required field `{field}`")
            }
            Self::InvalidField { item, field, value } => {
                write!(f, "item #{item} has invalid `{field}` value `{value}`")
            }
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SourceError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// One `original_language_info` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOriginalLanguage {
    /// Text of `original_language`; empty when absent.
    pub text: String,
    /// `language_type`, e.g. `한자` or `/(병기)`.
    pub language_type: Option<String>,
}

/// One `sense_info` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSense {
    pub sense_code: i64,
    pub definition: String,
    pub definition_original: String,
    pub categories: Vec<String>,
}

/// One `pos_info` block with the senses of every `comm_pattern_info` in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPosGroup {
    pub pos: Option<String>,
    pub senses: Vec<RawSense>,
}

/// One source `item`, untouched apart from XML unescaping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub target_code: i64,
    pub word: String,
    pub word_unit: String,
    pub word_type: Option<String>,
    pub original_languages: Vec<RawOriginalLanguage>,
    pub pos_groups: Vec<RawPosGroup>,
}

#[derive(Default)]
struct SenseDraft {
    sense_code: Option<String>,
    definition: Option<String>,
    definition_original: Option<String>,
    categories: Vec<String>,
}

#[derive(Default)]
struct PosDraft {
    pos: Option<String>,
    senses: Vec<SenseDraft>,
}

#[derive(Default)]
struct LanguageDraft {
    text: Option<String>,
    language_type: Option<String>,
}

#[derive(Default)]
struct ItemDraft {
    target_code: Option<String>,
    word: Option<String>,
    word_unit: Option<String>,
    word_type: Option<String>,
    original_languages: Vec<LanguageDraft>,
    pos_groups: Vec<PosDraft>,
}

const ITEM: &[u8] = b"item";
const WORD_INFO: &[u8] = b"word_info";
const ORIGINAL_LANGUAGE_INFO: &[u8] = b"original_language_info";
const POS_INFO: &[u8] = b"pos_info";
const COMM_PATTERN_INFO: &[u8] = b"comm_pattern_info";
const SENSE_INFO: &[u8] = b"sense_info";
const CAT_INFO: &[u8] = b"cat_info";

/// Pull-based iterator over dictionary items.
pub struct ItemReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    /// Open element names from the root down.
    path: Vec<Vec<u8>>,
    /// Leading text of each open element, parallel to `path`.
    texts: Vec<LeadingText>,
    draft: Option<ItemDraft>,
    items_read: usize,
    finished: bool,
}

impl ItemReader<BufReader<File>> {
    /// Opens a dictionary dump from disk.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> ItemReader<R> {
    pub fn new(source: R) -> Self {
        let mut reader = Reader::from_reader(source);
        reader.config_mut().expand_empty_elements = true;
        Self {
            reader,
            buf: Vec::new(),
            path: Vec::new(),
            texts: Vec::new(),
            draft: None,
            items_read: 0,
            finished: false,
        }
    }

    fn read_next(&mut self) -> SourceResult<Option<RawItem>> {
        loop {
            self.buf.clear();
            let step = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(start)) => Step::Open(start.name().as_ref().to_vec()),
                Ok(Event::Text(text)) if self.draft.is_some() => {
                    let unescaped = text
                        .unescape()
                        .map_err(|err| xml_error(&self.reader, err))?;
                    Step::Text(unescaped.into_owned())
                }
                Ok(Event::CData(data)) if self.draft.is_some() => {
                    let raw = String::from_utf8(data.into_inner().into_owned())
                        .map_err(|err| xml_error(&self.reader, err))?;
                    Step::Text(raw)
                }
                Ok(Event::End(_)) => Step::Close,
                Ok(Event::Eof) => Step::Eof,
                Ok(_) => Step::Skip,
                Err(err) => return Err(xml_error(&self.reader, err)),
            };

            match step {
                Step::Open(name) => {
                    if let Some(parent) = self.texts.last_mut() {
                        parent.sealed = true;
                    }
                    self.path.push(name);
                    self.texts.push(LeadingText::default());
                    self.open_element();
                }
                Step::Text(text) => {
                    if let Some(current) = self.texts.last_mut() {
                        current.push(&text);
                    }
                }
                Step::Close => {
                    let text = self
                        .texts
                        .pop()
                        .map(|leading| leading.text)
                        .unwrap_or_default();
                    let finished_item = self.close_element(text);
                    self.path.pop();
                    if let Some(draft) = finished_item {
                        self.items_read += 1;
                        return draft.finish(self.items_read).map(Some);
                    }
                }
                Step::Eof => {
                    if self.draft.is_some() {
                        return Err(xml_error(&self.reader, "document ended inside an item"));
                    }
                    return Ok(None);
                }
                Step::Skip => {}
            }
        }
    }

    fn open_element(&mut self) {
        if is_item_element(&self.path) {
            self.draft = Some(ItemDraft::default());
            return;
        }
        let Some(path) = item_relative(&self.path) else {
            return;
        };
        let Some(draft) = self.draft.as_mut() else {
            return;
        };
        match path.as_slice() {
            [WORD_INFO, ORIGINAL_LANGUAGE_INFO] => {
                draft.original_languages.push(LanguageDraft::default());
            }
            [WORD_INFO, POS_INFO] => draft.pos_groups.push(PosDraft::default()),
            [WORD_INFO, POS_INFO, COMM_PATTERN_INFO, SENSE_INFO] => {
                if let Some(group) = draft.pos_groups.last_mut() {
                    group.senses.push(SenseDraft::default());
                }
            }
            _ => {}
        }
    }

    /// Stores the collected text for leaf fields; returns the draft when `item` closes.
    fn close_element(&mut self, text: String) -> Option<ItemDraft> {
        if is_item_element(&self.path) {
            return self.draft.take();
        }
        let path = item_relative(&self.path)?;
        let draft = self.draft.as_mut()?;

        let slot = match path.as_slice() {
            [b"target_code"] => &mut draft.target_code,
            [WORD_INFO, b"word"] => &mut draft.word,
            [WORD_INFO, b"word_unit"] => &mut draft.word_unit,
            [WORD_INFO, b"word_type"] => &mut draft.word_type,
            [WORD_INFO, ORIGINAL_LANGUAGE_INFO, b"original_language"] => {
                &mut draft.original_languages.last_mut()?.text
            }
            [WORD_INFO, ORIGINAL_LANGUAGE_INFO, b"language_type"] => {
                &mut draft.original_languages.last_mut()?.language_type
            }
            [WORD_INFO, POS_INFO, b"pos"] => &mut draft.pos_groups.last_mut()?.pos,
            [WORD_INFO, POS_INFO, COMM_PATTERN_INFO, SENSE_INFO, field] => {
                let sense = draft.pos_groups.last_mut()?.senses.last_mut()?;
                match *field {
                    b"sense_code" => &mut sense.sense_code,
                    b"definition" => &mut sense.definition,
                    b"definition_original" => &mut sense.definition_original,
                    _ => return None,
                }
            }
            [WORD_INFO, POS_INFO, COMM_PATTERN_INFO, SENSE_INFO, CAT_INFO, b"cat"] => {
                let sense = draft.pos_groups.last_mut()?.senses.last_mut()?;
                sense.categories.push(text);
                return None;
            }
            _ => return None,
        };
        if slot.is_none() {
            *slot = Some(text);
        }
        None
    }
}

/// Text collected for one open element until its first child opens.
#[derive(Default)]
struct LeadingText {
    text: String,
    sealed: bool,
}

impl LeadingText {
    fn push(&mut self, fragment: &str) {
        if !self.sealed {
            self.text.push_str(fragment);
        }
    }
}

/// Owned form of one parser event, so the read buffer is free again.
enum Step {
    Open(Vec<u8>),
    Text(String),
    Close,
    Eof,
    Skip,
}

fn xml_error<R>(reader: &Reader<R>, message: impl Display) -> SourceError {
    SourceError::Xml {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}

/// `true` when the innermost open element is an `item` directly under the root.
fn is_item_element(path: &[Vec<u8>]) -> bool {
    path.len() == 2 && path[1] == ITEM
}

/// Element path below the enclosing `item`, if inside one.
fn item_relative(path: &[Vec<u8>]) -> Option<Vec<&[u8]>> {
    if path.len() >= 2 && path[1] == ITEM {
        Some(path[2..].iter().map(Vec::as_slice).collect())
    } else {
        None
    }
}

impl<R: BufRead> Iterator for ItemReader<R> {
    type Item = SourceResult<RawItem>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.read_next() {
            Ok(Some(item)) => Some(Ok(item)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(err) => {
                self.finished = true;
                Some(Err(err))
            }
        }
    }
}

fn required(
    value: Option<String>,
    item: usize,
    field: &'static str,
) -> SourceResult<String> {
    value.ok_or(SourceError::MissingField { item, field })
}

fn parse_code(value: Option<String>, item: usize, field: &'static str) -> SourceResult<i64> {
    let value = required(value, item, field)?;
    value
        .trim()
        .parse()
        .map_err(|_| SourceError::InvalidField { item, field, value })
}

impl ItemDraft {
    fn finish(self, item: usize) -> SourceResult<RawItem> {
        let mut pos_groups = Vec::with_capacity(self.pos_groups.len());
        for group in self.pos_groups {
            let mut senses = Vec::with_capacity(group.senses.len());
            for sense in group.senses {
                senses.push(RawSense {
                    sense_code: parse_code(sense.sense_code, item, "sense_code")?,
                    definition: required(sense.definition, item, "definition")?,
                    definition_original: required(
                        sense.definition_original,
                        item,
                        "definition_original",
                    )?,
                    categories: sense.categories,
                });
            }
            pos_groups.push(RawPosGroup {
                pos: group.pos,
                senses,
            });
        }

        Ok(RawItem {
            target_code: parse_code(self.target_code, item, "target_code")?,
            word: required(self.word, item, "word")?,
            word_unit: required(self.word_unit, item, "word_unit")?,
            word_type: self.word_type.filter(|value| !value.is_empty()),
            original_languages: self
                .original_languages
                .into_iter()
                .map(|language| RawOriginalLanguage {
                    text: language.text.unwrap_or_default(),
                    language_type: language.language_type,
                })
                .collect(),
            pos_groups,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_all(xml: &str) -> SourceResult<Vec<RawItem>> {
        ItemReader::new(xml.as_bytes()).collect()
    }

    #[test]
    fn reads_nested_fields_and_ignores_relation_words() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<channel>
  <total>1</total>
  <item>
    <target_code>23828</target_code>
    <word_info>
      <word>고식05</word>
      <word_unit>단어</word_unit>
      <word_type>한자어</word_type>
      <original_language_info>
        <original_language>苦&lt;equ&gt;&amp;#x27139;&lt;/equ&gt;</original_language>
        <language_type>한자</language_type>
      </original_language_info>
      <pos_info>
        <pos>명사</pos>
        <comm_pattern_info>
          <sense_info>
            <sense_code>1001</sense_code>
            <definition>뜻</definition>
            <definition_original><![CDATA[<word_no>7</word_no>]]></definition_original>
            <cat_info><cat>의학</cat></cat_info>
            <relation_info><word>관련어</word></relation_info>
          </sense_info>
        </comm_pattern_info>
      </pos_info>
    </word_info>
  </item>
</channel>"#;

        let items = read_all(xml).unwrap();
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.target_code, 23828);
        assert_eq!(item.word, "고식05");
        assert_eq!(item.word_type.as_deref(), Some("한자어"));
        assert_eq!(item.original_languages[0].text, "苦<equ>&#x27139;</equ>");
        let sense = &item.pos_groups[0].senses[0];
        assert_eq!(item.pos_groups[0].pos.as_deref(), Some("명사"));
        assert_eq!(sense.sense_code, 1001);
        assert_eq!(sense.definition_original, "<word_no>7</word_no>");
        assert_eq!(sense.categories, vec!["의학".to_string()]);
    }

    #[test]
    fn empty_word_type_and_missing_original_language_are_tolerated() {
        let xml = "<channel><item><target_code>5</target_code><word_info>\
            <word>가</word><word_unit>단어</word_unit><word_type/>\
            <original_language_info><language_type>한자</language_type></original_language_info>\
            </word_info></item></channel>";
        let items = read_all(xml).unwrap();
        assert_eq!(items[0].word_type, None);
        assert_eq!(items[0].original_languages[0].text, "");
    }

    #[test]
    fn missing_target_code_is_reported() {
        let xml = "<channel><item><word_info><word>가</word><word_unit>단어</word_unit>\
            </word_info></item></channel>";
        let err = read_all(xml).unwrap_err();
        assert!(matches!(
            err,
            SourceError::MissingField {
                item: 1,
                field: "target_code"
            }
        ));
    }

    #[test]
    fn non_numeric_sense_code_is_reported() {
        let xml = "<channel><item><target_code>1</target_code><word_info><word>가</word>\
            <word_unit>단어</word_unit><pos_info><comm_pattern_info><sense_info>\
            <sense_code>x1</sense_code><definition>d</definition>\
            <definition_original>d</definition_original>\
            </sense_info></comm_pattern_info></pos_info></word_info></item></channel>";
        let err = read_all(xml).unwrap_err();
        assert!(matches!(
            err,
            SourceError::InvalidField {
                field: "sense_code",
                ..
            }
        ));
    }

    #[test]
    fn truncated_document_is_an_error() {
        let xml = "<channel><item><target_code>1</target_code>";
        assert!(read_all(xml).is_err());
    }

    #[test]
    fn field_with_child_markup_keeps_only_leading_text() {
        let xml = "<channel><item><target_code>1</target_code><word_info>\
            <word>가<sup>1</sup>뒤</word><word_unit>단어</word_unit>\
            <pos_info><comm_pattern_info><sense_info>\
            <sense_code>10</sense_code>\
            <definition>앞 <b>중간</b> 뒤</definition>\
            <definition_original>앞 <b>중간</b> 뒤</definition_original>\
            </sense_info></comm_pattern_info></pos_info>\
            </word_info></item></channel>";
        let items = read_all(xml).unwrap();
        assert_eq!(items[0].word, "가");
        let sense = &items[0].pos_groups[0].senses[0];
        assert_eq!(sense.definition, "앞 ");
        assert_eq!(sense.definition_original, "앞 ");
    }

    #[test]
    fn field_starting_with_child_markup_reads_as_empty() {
        let xml = "<channel><item><target_code>2</target_code><word_info>\
            <word><b>굵은</b>말</word><word_unit>단어</word_unit>\
            </word_info></item></channel>";
        let items = read_all(xml).unwrap();
        assert_eq!(items[0].word, "");
    }
}
