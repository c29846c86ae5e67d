//! Event-level XML filter keeping only selected repeating elements.

use std::collections::BTreeSet;
use std::mem;

use quick_xml::events::{BytesDecl, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::XmlSubsetError;
use crate::project::SubsetRule;

const CHILD_INDENT: &str = "\n    ";

/// A repeating element being buffered until its end tag.
struct PendingElement {
  events: Vec<Event<'static>>,
  depth: usize,
  key: Option<String>,
  key_depth: Option<usize>,
  key_text: String,
}

impl PendingElement {
  fn open(start: BytesStart<'static>) -> Self {
    Self {
      events: vec![Event::Start(start)],
      depth: 1,
      key: None,
      key_depth: None,
      key_text: String::new(),
    }
  }

  fn searching_key(&self) -> bool {
    self.key.is_none() && self.key_depth.is_none()
  }

  /// Buffer `event`; returns `true` once the element is closed.
  fn push(&mut self, event: Event<'static>, key_field: &[u8]) -> Result<bool, XmlSubsetError> {
    match &event {
      Event::Start(element) => {
        self.depth += 1;
        if self.searching_key() && element.name().as_ref() == key_field {
          self.key_depth = Some(self.depth);
        }
      }
      Event::Empty(element) => {
        if self.searching_key() && element.name().as_ref() == key_field {
          self.key = Some(String::new());
        }
      }
      Event::Text(text) if self.key_depth.is_some() => {
        self.key_text.push_str(&text.unescape()?);
      }
      Event::CData(data) if self.key_depth.is_some() => {
        self.key_text.push_str(&String::from_utf8_lossy(data));
      }
      Event::End(_) => {
        if self.key_depth == Some(self.depth) {
          self.key = Some(mem::take(&mut self.key_text).trim().to_string());
          self.key_depth = None;
        }
        self.depth -= 1;
      }
      _ => {}
    }

    self.events.push(event);
    Ok(self.depth == 0)
  }

  fn is_accepted(&self, accepted: &BTreeSet<String>) -> bool {
    self
      .key
      .as_deref()
      .is_some_and(|key| !key.is_empty() && accepted.contains(key))
  }
}

/// Filter `source`, keeping the first `rule.container` element (without children) and
/// every `rule.repeating` element whose `rule.key_field` text is in `accepted`.
///
/// Kept elements are copied event for event in their original order. Comments,
/// processing instructions and whitespace between kept elements are not preserved.
pub fn subset_document(
  source: &str,
  rule: &SubsetRule,
  accepted: &BTreeSet<String>,
) -> Result<Vec<u8>, XmlSubsetError> {
  let container = rule.container.as_bytes();
  let repeating = rule.repeating.as_bytes();
  let key_field = rule.key_field.as_bytes();

  let mut reader = Reader::from_str(source);
  let mut root: Option<BytesStart<'static>> = None;
  let mut pending: Option<PendingElement> = None;
  let mut kept: Vec<Vec<Event<'static>>> = Vec::new();

  loop {
    let event = reader.read_event()?.into_owned();

    if let Some(mut element) = pending.take() {
      if matches!(event, Event::Eof) {
        return Err(XmlSubsetError::Truncated(rule.repeating.clone()));
      }
      if element.push(event, key_field)? {
        if element.is_accepted(accepted) {
          kept.push(element.events);
        }
      } else {
        pending = Some(element);
      }
      continue;
    }

    match event {
      Event::Start(element) | Event::Empty(element)
        if root.is_none() && element.name().as_ref() == container =>
      {
        root = Some(element);
      }
      Event::Start(element) if element.name().as_ref() == repeating => {
        pending = Some(PendingElement::open(element));
      }
      Event::Eof => break,
      _ => {}
    }
  }

  let root = root.ok_or_else(|| XmlSubsetError::MissingContainer(rule.container.clone()))?;
  write_document(&root, kept)
}

fn write_document(
  root: &BytesStart<'static>,
  children: Vec<Vec<Event<'static>>>,
) -> Result<Vec<u8>, XmlSubsetError> {
  let mut writer = Writer::new(Vec::new());
  let has_children = !children.is_empty();

  writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
  writer.write_event(Event::Text(BytesText::new("\n")))?;
  writer.write_event(Event::Start(root.clone()))?;
  for child in children {
    writer.write_event(Event::Text(BytesText::new(CHILD_INDENT)))?;
    for event in child {
      writer.write_event(event)?;
    }
  }
  if has_children {
    writer.write_event(Event::Text(BytesText::new("\n")))?;
  }
  writer.write_event(Event::End(root.to_end()))?;
  writer.write_event(Event::Text(BytesText::new("\n")))?;

  Ok(writer.into_inner())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn rule() -> SubsetRule {
    SubsetRule::new("CustomLabels", "labels", "fullName")
  }

  fn accepted(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|name| name.to_string()).collect()
  }

  fn label(name: &str) -> String {
    format!(
      "<labels>\n        <fullName>{name}</fullName>\n        <language>en_US</language>\n        <value>{name} value</value>\n    </labels>"
    )
  }

  fn labels_document(names: &[&str]) -> String {
    let body: Vec<String> = names.iter().map(|name| format!("    {}", label(name))).collect();
    format!(
      "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<CustomLabels xmlns=\"http://soap.sforce.com/2006/04/metadata\">\n{}\n</CustomLabels>\n",
      body.join("\n")
    )
  }

  #[test]
  fn keeps_matching_children_in_source_order() {
    let source = labels_document(&["One", "Two", "Three", "Four", "Five"]);
    let output = subset_document(&source, &rule(), &accepted(&["Four", "Two"])).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert_eq!(text.matches("<labels>").count(), 2);
    let two = text.find(&label("Two")).expect("Two copied verbatim");
    let four = text.find(&label("Four")).expect("Four copied verbatim");
    assert!(two < four);
    assert!(!text.contains("<fullName>One</fullName>"));
    assert!(!text.contains("<fullName>Five</fullName>"));
  }

  #[test]
  fn preserves_root_attributes() {
    let source = labels_document(&["One"]);
    let output = subset_document(&source, &rule(), &accepted(&["One"])).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(text.contains("<CustomLabels xmlns=\"http://soap.sforce.com/2006/04/metadata\">"));
    assert!(text.trim_end().ends_with("</CustomLabels>"));
  }

  #[test]
  fn empty_selection_keeps_only_the_root() {
    let source = labels_document(&["One", "Two"]);
    let output = subset_document(&source, &rule(), &accepted(&[])).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(!text.contains("<labels>"));
    assert!(text.contains("</CustomLabels>"));
  }

  #[test]
  fn reads_escaped_and_cdata_keys() {
    let source = "<CustomLabels><labels><fullName>A&amp;B</fullName></labels><labels><fullName><![CDATA[ C ]]></fullName></labels><labels><fullName/></labels></CustomLabels>";
    let output = subset_document(source, &rule(), &accepted(&["A&B", "C", ""])).unwrap();
    let text = String::from_utf8(output).unwrap();

    assert!(text.contains("<fullName>A&amp;B</fullName>"));
    assert!(text.contains("<![CDATA[ C ]]>"));
    assert!(!text.contains("<fullName/>"));
  }

  #[test]
  fn uses_the_first_key_field_only() {
    let source = "<Translations><customLabels><label>Hola</label><name>Greeting</name><name>Other</name></customLabels></Translations>";
    let rule = SubsetRule::new("Translations", "customLabels", "name");

    let kept = subset_document(source, &rule, &accepted(&["Greeting"])).unwrap();
    assert!(String::from_utf8(kept).unwrap().contains("<label>Hola</label>"));

    let dropped = subset_document(source, &rule, &accepted(&["Other"])).unwrap();
    assert!(!String::from_utf8(dropped).unwrap().contains("customLabels>"));
  }

  #[test]
  fn accepts_self_closing_container() {
    let output = subset_document("<CustomLabels a=\"1\"/>", &rule(), &accepted(&["One"])).unwrap();
    let text = String::from_utf8(output).unwrap();
    assert!(text.contains("<CustomLabels a=\"1\"></CustomLabels>"));
  }

  #[test]
  fn reports_missing_container() {
    let err = subset_document("<Other/>", &rule(), &accepted(&["One"])).unwrap_err();
    assert!(matches!(err, XmlSubsetError::MissingContainer(name) if name == "CustomLabels"));
  }

  #[test]
  fn reports_malformed_documents() {
    let err = subset_document(
      "<CustomLabels><labels><fullName>One</labels></CustomLabels>",
      &rule(),
      &accepted(&["One"]),
    )
    .unwrap_err();
    assert!(matches!(err, XmlSubsetError::Syntax(_)));
  }

  #[test]
  fn reports_truncated_documents() {
    let err = subset_document(
      "<CustomLabels><labels><fullName>One</fullName>",
      &rule(),
      &accepted(&["One"]),
    )
    .unwrap_err();
    assert!(matches!(
      err,
      XmlSubsetError::Truncated(_) | XmlSubsetError::Syntax(_)
    ));
  }
}
