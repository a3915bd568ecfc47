//! XFDF field template.
//!
//! The template is read once at start-up. Only the field names matter; each
//! fill writes a fresh XFDF document with every template field in template
//! order. Nested `<field>` elements are flattened to dotted names.

use std::collections::BTreeMap;
use std::io::Cursor;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const XFDF_NS: &str = "http://ns.adobe.com/xfdf/";

/// Template could not be parsed or filled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormTemplateError {
    #[error("malformed form template: {0}")]
    Malformed(String),
    #[error("form template declares no fields")]
    NoFields,
    #[error("form template field without a name")]
    UnnamedField,
    #[error("could not write form document: {0}")]
    Write(String),
}

/// Parsed XFDF template.
///
/// # Examples
/// ```
/// use std::collections::BTreeMap;
/// use repair_desk::domain::FormTemplate;
///
/// let template = FormTemplate::parse(
///     r#"<xfdf><fields><field name="name"><value/></field></fields></xfdf>"#,
/// )
/// .unwrap();
/// let filled = template
///     .fill(&BTreeMap::from([("name".to_owned(), "Eleni".to_owned())]))
///     .unwrap();
/// assert!(filled.contains("<value>Eleni</value>"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormTemplate {
    fields: Vec<String>,
}

fn write_err(err: impl std::fmt::Display) -> FormTemplateError {
    FormTemplateError::Write(err.to_string())
}

fn field_name(element: &BytesStart<'_>) -> Result<String, FormTemplateError> {
    let attribute = element
        .try_get_attribute("name")
        .map_err(|err| FormTemplateError::Malformed(err.to_string()))?
        .ok_or(FormTemplateError::UnnamedField)?;
    let value = attribute
        .unescape_value()
        .map_err(|err| FormTemplateError::Malformed(err.to_string()))?;
    if value.trim().is_empty() {
        return Err(FormTemplateError::UnnamedField);
    }
    Ok(value.into_owned())
}

impl FormTemplate {
    pub fn parse(xml: &str) -> Result<Self, FormTemplateError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut fields = Vec::new();
        // Names of the open <field> elements, outermost first.
        let mut open: Vec<(String, bool)> = Vec::new();
        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) if e.local_name().as_ref() == b"field" => {
                    if let Some(parent) = open.last_mut() {
                        parent.1 = true;
                    }
                    open.push((field_name(&e)?, false));
                }
                Ok(Event::Empty(e)) if e.local_name().as_ref() == b"field" => {
                    if let Some(parent) = open.last_mut() {
                        parent.1 = true;
                    }
                    let name = field_name(&e)?;
                    let mut path: Vec<&str> = open.iter().map(|(name, _)| name.as_str()).collect();
                    path.push(&name);
                    fields.push(path.join("."));
                }
                Ok(Event::End(e)) if e.local_name().as_ref() == b"field" => {
                    let path: Vec<&str> = open.iter().map(|(name, _)| name.as_str()).collect();
                    let joined = path.join(".");
                    if let Some((_, has_children)) = open.pop() {
                        if !has_children {
                            fields.push(joined);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(err) => return Err(FormTemplateError::Malformed(err.to_string())),
            }
        }

        if fields.is_empty() {
            return Err(FormTemplateError::NoFields);
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// XFDF document with every template field set from `values`; fields
    /// without a value are written empty.
    pub fn fill(&self, values: &BTreeMap<String, String>) -> Result<String, FormTemplateError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;
        let root = BytesStart::new("xfdf")
            .with_attributes([("xmlns", XFDF_NS), ("xml:space", "preserve")]);
        writer.write_event(Event::Start(root)).map_err(write_err)?;
        writer
            .write_event(Event::Start(BytesStart::new("fields")))
            .map_err(write_err)?;

        for name in &self.fields {
            let value = values.get(name).map(String::as_str).unwrap_or_default();
            let field = BytesStart::new("field").with_attributes([("name", name.as_str())]);
            writer.write_event(Event::Start(field)).map_err(write_err)?;
            writer
                .write_event(Event::Start(BytesStart::new("value")))
                .map_err(write_err)?;
            writer
                .write_event(Event::Text(BytesText::new(value)))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new("value")))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new("field")))
                .map_err(write_err)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("fields")))
            .map_err(write_err)?;
        writer
            .write_event(Event::End(BytesEnd::new("xfdf")))
            .map_err(write_err)?;

        String::from_utf8(writer.into_inner().into_inner())
            .map_err(write_err)
    }
}
