/// Slide duplication and template-based slide creation.
use crate::editor::merge::merge_text;
use crate::editor::structure::LayoutRole;
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::model::{Document, Slide};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Text to put on a slide created from a template.
///
/// `body` wins over `bullets` when both are given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideContent {
    pub title: Option<String>,
    #[serde(alias = "content")]
    pub body: Option<String>,
    #[serde(alias = "content_items")]
    pub bullets: Option<Vec<String>>,
}

impl SlideContent {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = Some(bullets.into_iter().map(Into::into).collect());
        self
    }
}

impl Editor {
    /// Duplicate the slide at `source_position`.
    ///
    /// The copy uses the source's layout, receives the source's placeholder
    /// text, clones of its free shapes and a copy of its background override,
    /// and is inserted at `insert_position` (default: right after the
    /// source). A source placeholder whose slot the layout lacks is copied
    /// over with a warning. Free shapes that cannot be cloned are skipped with a warning.
    /// Returns the position of the new slide.
    pub fn duplicate_slide(
        &mut self,
        source_position: usize,
        insert_position: Option<usize>,
    ) -> Result<usize> {
        let count = self.document.slide_count();
        self.document.check_position(source_position)?;
        let target_position = insert_position.unwrap_or(source_position + 1);
        if target_position == 0 || target_position > count + 1 {
            return Err(EditError::out_of_range(target_position, count));
        }

        let source = self.document.slide(source_position)?.clone();
        let appended = self.document.add_slide_with_layout(source.layout)?;

        let populated = self
            .document
            .slide_mut(appended)
            .and_then(|target| populate(&source, target));
        if let Err(err) = populated {
            discard_last(&mut self.document, appended);
            return Err(err);
        }

        let entry = self.document.remove_at(appended)?;
        self.document.insert_at(target_position, entry)?;
        debug!(
            source = source_position,
            position = target_position,
            slides = self.document.slide_count();
            "Duplicated slide"
        );
        Ok(target_position)
    }

    /// Duplicate a template slide and fill it with `content`.
    ///
    /// Content fields whose placeholder is missing on the new slide are
    /// skipped with a warning. Returns the position of the new slide.
    pub fn add_slide_from_template(
        &mut self,
        template_position: usize,
        insert_position: Option<usize>,
        content: &SlideContent,
    ) -> Result<usize> {
        let position = self.duplicate_slide(template_position, insert_position)?;
        self.apply_content(
            position,
            content.title.as_deref(),
            content.body.as_deref(),
            content.bullets.as_deref(),
        )?;
        Ok(position)
    }

    /// Append one slide per entry of `contents`, each a copy of the template.
    ///
    /// Returns the number of slides added.
    pub fn add_slides_from_template(
        &mut self,
        template_position: usize,
        contents: &[SlideContent],
    ) -> Result<usize> {
        self.document.check_position(template_position)?;
        for content in contents {
            let end = self.document.slide_count() + 1;
            self.add_slide_from_template(template_position, Some(end), content)?;
        }
        Ok(contents.len())
    }

    /// Position of the slide best suited as a template for `role`.
    ///
    /// The first slide with exactly that role wins. When looking for content,
    /// the last content or two-column slide is the fallback; otherwise slide 1.
    pub fn find_best_template_slide(&self, role: LayoutRole) -> Result<usize> {
        if self.document.slide_count() == 0 {
            return Err(EditError::NotFound(
                "template slide in an empty document".to_string(),
            ));
        }

        let mut best = 1;
        for position in 1..=self.document.slide_count() {
            let found = self.classify(position)?.layout_role;
            if found == role {
                return Ok(position);
            }
            if role == LayoutRole::Content
                && matches!(found, LayoutRole::Content | LayoutRole::TwoColumn)
            {
                best = position;
            }
        }
        Ok(best)
    }

    /// Write title, body or bullets onto the slide at `position`.
    ///
    /// A field whose placeholder is missing is logged and skipped; the other
    /// fields still apply. Returns whether every requested field was written.
    pub(crate) fn apply_content(
        &mut self,
        position: usize,
        title: Option<&str>,
        body: Option<&str>,
        bullets: Option<&[String]>,
    ) -> Result<bool> {
        let mut complete = true;

        if let Some(title) = title {
            complete &= tolerate_missing(position, "title", self.set_title(position, title))?;
        }
        if let Some(body) = body {
            complete &= tolerate_missing(position, "body", self.set_body(position, body))?;
        } else if let Some(bullets) = bullets {
            complete &= tolerate_missing(position, "bullets", self.set_bullets(position, bullets))?;
        }

        Ok(complete)
    }
}

fn tolerate_missing(position: usize, field: &str, result: Result<()>) -> Result<bool> {
    match result {
        Ok(()) => Ok(true),
        Err(EditError::NotFound(what)) => {
            warn!(slide = position, field = field; "Skipping content field: {} not found", what);
            Ok(false)
        },
        Err(err) => Err(err),
    }
}

fn populate(source: &Slide, target: &mut Slide) -> Result<()> {
    for shape in &source.shapes {
        let Some(idx) = shape.placeholder_index() else {
            continue;
        };
        match target.placeholder_mut(idx) {
            Some(placeholder) => {
                merge_text(shape, placeholder);
                if shape.geometry.is_some() {
                    placeholder.geometry = shape.geometry;
                }
            },
            None => {
                warn!(
                    idx = idx,
                    shape = shape.id;
                    "Layout has no placeholder for source index; copying it as is"
                );
                let mut orphan = shape.clone();
                orphan.id = target.next_shape_id();
                target.shapes.push(orphan);
            },
        }
    }

    for shape in source.shapes.iter().filter(|s| !s.is_placeholder()) {
        match shape.clone_onto(&source.relationships, target) {
            Ok(_) => {},
            Err(EditError::UnsupportedClone(reason)) => {
                warn!(shape = shape.id; "Dropping free shape from duplicate: {}", reason);
            },
            Err(err) => return Err(err),
        }
    }

    if let Some(background) = source.background_override() {
        let mut mapping = HashMap::new();
        for r_id in background.relationship_ids() {
            match source.relationships.get(&r_id) {
                Some(rel) => {
                    let new_id = target.relationships.get_or_add(rel.kind, &rel.target);
                    mapping.insert(r_id, new_id);
                },
                None => warn!(r_id = r_id.as_str(); "Background references a missing relationship"),
            }
        }
        target.set_background_override(background.remap_relationships(&mapping)?);
    }

    Ok(())
}

fn discard_last(document: &mut Document, position: usize) {
    if let Ok(entry) = document.remove_at(position) {
        document.drop_rel(&entry.rel_id);
    }
}
