use quick_xml::Reader;
use quick_xml::events::Event;

use crate::models::ManifestEntry;

#[derive(Clone, Copy)]
enum TypesField {
    Members,
    Name,
}

/// Extract `Type/Member` keys from a `package.xml` document, in document order.
///
/// Each `<types>` block contributes one entry per `<members>` value, prefixed by the
/// block's `<name>`. Blocks without a name are ignored.
pub fn parse_package_manifest(xml: &str) -> Result<Vec<ManifestEntry>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut in_types = false;
    let mut field = None;
    let mut text = String::new();
    let mut members: Vec<String> = Vec::new();
    let mut type_name: Option<String> = None;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"types" => {
                    in_types = true;
                    members.clear();
                    type_name = None;
                }
                b"members" if in_types => {
                    field = Some(TypesField::Members);
                    text.clear();
                }
                b"name" if in_types => {
                    field = Some(TypesField::Name);
                    text.clear();
                }
                _ => {}
            },
            Event::Text(value) if field.is_some() => text.push_str(&value.unescape()?),
            Event::CData(value) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&value));
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"members" | b"name" => {
                    let value = text.trim().to_string();
                    match field.take() {
                        Some(TypesField::Members) if !value.is_empty() => members.push(value),
                        Some(TypesField::Name) => type_name = Some(value),
                        _ => {}
                    }
                }
                b"types" => {
                    if let Some(name) = type_name.take().filter(|name| !name.is_empty()) {
                        entries.extend(
                            members
                                .drain(..)
                                .map(|member| ManifestEntry::from_parts(&name, &member)),
                        );
                    }
                    members.clear();
                    in_types = false;
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(entries)
}
