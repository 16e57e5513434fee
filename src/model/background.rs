//! Per-slide background overrides.
//!
//! A slide without an override shows its layout's background. An override is
//! the slide's own `<p:bg>` element, kept as an opaque XML fragment: the editor
//! never interprets or re-encodes the fill, it only copies it. The one thing it
//! does look at is the `r:*` attributes, because a picture fill refers to an
//! image through the slide's relationship table and those references must be
//! carried along when the fragment moves to another slide.

use crate::error::{EditError, Result};
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What kind of fill a background override uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundFill {
    Solid,
    Gradient,
    Picture,
    Pattern,
    /// Explicit `a:noFill`
    NoFill,
    /// `p:bgRef`, a reference into the theme's background fill styles
    ThemeReference,
    Unknown,
}

/// An opaque `<p:bg>` fragment attached to a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BackgroundOverride {
    xml: String,
}

impl BackgroundOverride {
    /// Wrap a background fragment.
    ///
    /// The fragment must be well-formed XML with a single `bg` root element
    /// (any namespace prefix).
    pub fn from_xml(xml: impl Into<String>) -> Result<Self> {
        let xml = xml.into();
        validate_fragment(&xml)?;
        Ok(Self { xml })
    }

    /// A solid color background, e.g. `BackgroundOverride::solid("1F3864")`.
    pub fn solid(hex_color: &str) -> Result<Self> {
        Self::from_xml(format!(
            r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#,
            crate::model::escape_attr(hex_color)
        ))
    }

    /// A picture background filled from the image behind relationship `r_id`.
    pub fn picture(r_id: &str) -> Result<Self> {
        Self::from_xml(format!(
            r#"<p:bg><p:bgPr><a:blipFill dpi="0" rotWithShape="1"><a:blip r:embed="{}"/><a:stretch><a:fillRect/></a:stretch></a:blipFill><a:effectLst/></p:bgPr></p:bg>"#,
            crate::model::escape_attr(r_id)
        ))
    }

    /// The raw fragment.
    #[inline]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    /// Detect the fill kind of this background.
    pub fn fill_kind(&self) -> BackgroundFill {
        let mut reader = Reader::from_str(&self.xml);
        reader.config_mut().trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.local_name().as_ref() {
                    b"solidFill" => return BackgroundFill::Solid,
                    b"gradFill" => return BackgroundFill::Gradient,
                    b"blipFill" => return BackgroundFill::Picture,
                    b"pattFill" => return BackgroundFill::Pattern,
                    b"noFill" => return BackgroundFill::NoFill,
                    b"bgRef" => return BackgroundFill::ThemeReference,
                    _ => {},
                },
                Ok(Event::Eof) | Err(_) => return BackgroundFill::Unknown,
                _ => {},
            }
        }
    }

    /// Relationship IDs referenced by `r:*` attributes, in document order, without duplicates.
    pub fn relationship_ids(&self) -> Vec<String> {
        let mut reader = Reader::from_str(&self.xml);
        let mut ids: Vec<String> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                    for attr in e.attributes().flatten() {
                        if is_relationship_attr(attr.key.as_ref()) {
                            let id = String::from_utf8_lossy(&attr.value).into_owned();
                            if !ids.contains(&id) {
                                ids.push(id);
                            }
                        }
                    }
                },
                Ok(Event::Eof) | Err(_) => break,
                _ => {},
            }
        }

        ids
    }

    /// Copy of this fragment with relationship IDs rewritten through `map`.
    ///
    /// IDs absent from `map` are kept as they are.
    pub fn remap_relationships(&self, map: &HashMap<String, String>) -> Result<Self> {
        if map.iter().all(|(from, to)| from == to) {
            return Ok(self.clone());
        }

        let mut reader = Reader::from_str(&self.xml);
        let mut writer = Writer::new(Vec::with_capacity(self.xml.len()));

        loop {
            let event = reader.read_event()?;
            let written = match event {
                Event::Start(e) => writer.write_event(Event::Start(remap_element(&e, map))),
                Event::Empty(e) => writer.write_event(Event::Empty(remap_element(&e, map))),
                Event::Eof => break,
                other => writer.write_event(other),
            };
            written.map_err(|e| EditError::Xml(e.to_string()))?;
        }

        let xml = String::from_utf8(writer.into_inner())
            .map_err(|e| EditError::Xml(e.to_string()))?;
        Ok(Self { xml })
    }
}

impl TryFrom<String> for BackgroundOverride {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        BackgroundOverride::from_xml(value).map_err(|e| e.to_string())
    }
}

impl From<BackgroundOverride> for String {
    fn from(bg: BackgroundOverride) -> Self {
        bg.xml
    }
}

/// `r:embed`, `r:link`, `r:id` and friends.
#[inline]
fn is_relationship_attr(key: &[u8]) -> bool {
    key.starts_with(b"r:")
}

fn remap_element(e: &BytesStart<'_>, map: &HashMap<String, String>) -> BytesStart<'static> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut out = BytesStart::new(name);

    for attr in e.attributes().flatten() {
        let key = attr.key.as_ref();
        let value: &[u8] = &attr.value;
        let replacement = if is_relationship_attr(key) {
            std::str::from_utf8(value).ok().and_then(|id| map.get(id))
        } else {
            None
        };
        match replacement {
            Some(new_id) => out.push_attribute((key, new_id.as_bytes())),
            None => out.push_attribute((key, value)),
        }
    }

    out
}

fn validate_fragment(xml: &str) -> Result<()> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut roots = 0usize;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if depth == 0 {
                    check_root(e.local_name().as_ref(), &mut roots)?;
                }
                depth += 1;
            },
            Event::Empty(e) => {
                if depth == 0 {
                    check_root(e.local_name().as_ref(), &mut roots)?;
                }
            },
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    EditError::Xml("Unbalanced end tag in background fragment".to_string())
                })?;
            },
            Event::Text(_) if depth == 0 => {
                return Err(EditError::Xml(
                    "Text outside the background element".to_string(),
                ));
            },
            Event::Eof => break,
            _ => {},
        }
    }

    if depth != 0 {
        return Err(EditError::Xml(
            "Unclosed element in background fragment".to_string(),
        ));
    }
    if roots == 0 {
        return Err(EditError::Xml("Empty background fragment".to_string()));
    }
    Ok(())
}

fn check_root(local_name: &[u8], roots: &mut usize) -> Result<()> {
    *roots += 1;
    if *roots > 1 {
        return Err(EditError::Xml(
            "Background fragment has more than one root element".to_string(),
        ));
    }
    if local_name != b"bg" {
        return Err(EditError::Xml(format!(
            "Expected a bg element, found {}",
            String::from_utf8_lossy(local_name)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_background() {
        let bg = BackgroundOverride::solid("1F3864").unwrap();
        assert_eq!(bg.fill_kind(), BackgroundFill::Solid);
        assert!(bg.relationship_ids().is_empty());
        assert!(bg.xml().contains(r#"val="1F3864""#));
    }

    #[test]
    fn test_theme_reference_background() {
        let bg = BackgroundOverride::from_xml(
            r#"<p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg>"#,
        )
        .unwrap();
        assert_eq!(bg.fill_kind(), BackgroundFill::ThemeReference);
    }

    #[test]
    fn test_rejects_malformed_fragments() {
        assert!(BackgroundOverride::from_xml("<p:bg><p:bgPr></p:bg>").is_err());
        assert!(BackgroundOverride::from_xml("<p:spTree/>").is_err());
        assert!(BackgroundOverride::from_xml("<p:bg/><p:bg/>").is_err());
        assert!(BackgroundOverride::from_xml("").is_err());
        assert!(BackgroundOverride::from_xml("<bg/>").is_ok());
    }

    #[test]
    fn test_picture_relationships() {
        let bg = BackgroundOverride::picture("rId7").unwrap();
        assert_eq!(bg.fill_kind(), BackgroundFill::Picture);
        assert_eq!(bg.relationship_ids(), vec!["rId7".to_string()]);
    }

    #[test]
    fn test_remap_relationships() {
        let bg = BackgroundOverride::picture("rId7").unwrap();
        let map = HashMap::from([("rId7".to_string(), "rId2".to_string())]);

        let moved = bg.remap_relationships(&map).unwrap();
        assert_eq!(moved.relationship_ids(), vec!["rId2".to_string()]);
        assert_eq!(moved.fill_kind(), BackgroundFill::Picture);
        assert!(moved.xml().contains(r#"dpi="0""#));
        // The original is untouched.
        assert_eq!(bg.relationship_ids(), vec!["rId7".to_string()]);
    }

    #[test]
    fn test_identity_remap_is_clone() {
        let bg = BackgroundOverride::picture("rId3").unwrap();
        let map = HashMap::from([("rId3".to_string(), "rId3".to_string())]);
        assert_eq!(bg.remap_relationships(&map).unwrap(), bg);
    }
}
