/// Text operations that keep run formatting intact.
///
/// Runs are mutated in place rather than recreated, so bold, size, family and
/// color of existing text survive every edit made here.
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::model::{Document, Font, Shape, Slide, TextFrame};
use log::debug;
use memchr::memmem;
use serde::Serialize;

/// Which slides a text operation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Every slide in presentation order
    Document,
    /// A single slide, by 1-indexed position
    Slide(usize),
}

impl Scope {
    fn positions(self, document: &Document) -> Result<Vec<usize>> {
        match self {
            Scope::Document => Ok((1..=document.slide_count()).collect()),
            Scope::Slide(position) => {
                document.check_position(position)?;
                Ok(vec![position])
            },
        }
    }
}

/// A run containing a searched substring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub slide: usize,
    /// Name of the shape holding the run
    pub shape: String,
    /// Full text of the run
    pub text: String,
    /// Matches within the run
    pub count: usize,
}

impl Editor {
    /// Replace every occurrence of `find` with `replace` inside runs.
    ///
    /// Matches are searched run by run, so text split across two runs is not
    /// found. Group members are searched as well. Returns the number of
    /// substitutions; an empty `find` replaces nothing. Slides without a match
    /// are left untouched, so a call that finds nothing keeps the document
    /// clean.
    pub fn replace_text(&mut self, scope: Scope, find: &str, replace: &str) -> Result<usize> {
        let positions = scope.positions(&self.document)?;
        if find.is_empty() {
            return Ok(0);
        }

        let finder = memmem::Finder::new(find.as_bytes());
        let mut total = 0;
        for position in positions {
            if !contains_match(self.document.slide(position)?, &finder) {
                continue;
            }
            let slide = self.document.slide_mut(position)?;
            for shape in slide.shapes.iter_mut() {
                for frame in shape.text_frames_mut() {
                    for run in frame.paragraphs.iter_mut().flat_map(|p| p.runs.iter_mut()) {
                        let hits = finder.find_iter(run.text.as_bytes()).count();
                        if hits > 0 {
                            run.text = run.text.replace(find, replace);
                            total += hits;
                        }
                    }
                }
            }
        }

        debug!(find = find, replace = replace, count = total; "Replaced text");
        Ok(total)
    }

    /// Runs that [`Editor::replace_text`] would touch, without changing anything.
    pub fn count_occurrences(&self, scope: Scope, find: &str) -> Result<Vec<Occurrence>> {
        let positions = scope.positions(&self.document)?;
        if find.is_empty() {
            return Ok(Vec::new());
        }

        let finder = memmem::Finder::new(find.as_bytes());
        let mut found = Vec::new();
        for position in positions {
            let slide = self.document.slide(position)?;
            for shape in &slide.shapes {
                visit_frames(shape, &mut |owner, frame| {
                    for run in frame.paragraphs.iter().flat_map(|p| p.runs.iter()) {
                        let count = finder.find_iter(run.text.as_bytes()).count();
                        if count > 0 {
                            found.push(Occurrence {
                                slide: position,
                                shape: owner.name.clone(),
                                text: run.text.clone(),
                                count,
                            });
                        }
                    }
                });
            }
        }
        Ok(found)
    }

    /// Set the title text of the slide at `position`.
    ///
    /// The first run keeps its formatting and receives `text`; the other runs
    /// are blanked. Fails with [`EditError::NotFound`] when the slide has no
    /// title placeholder.
    pub fn set_title(&mut self, position: usize, text: &str) -> Result<()> {
        let shape = self
            .classify(position)?
            .title_shape
            .ok_or_else(|| EditError::NotFound(format!("title placeholder on slide {}", position)))?;
        self.with_text_frame(position, shape, |frame| overwrite_frame(frame, text))?;
        debug!(slide = position; "Set slide title");
        Ok(())
    }

    /// Set the body text of the slide at `position`, formatted like the
    /// existing first run.
    pub fn set_body(&mut self, position: usize, text: &str) -> Result<()> {
        let shape = self.body_shape(position)?;
        self.with_text_frame(position, shape, |frame| overwrite_frame(frame, text))?;
        debug!(slide = position; "Set slide body");
        Ok(())
    }

    /// Replace the body with one top-level paragraph per item.
    ///
    /// Size, family and bold of the body's first run are applied to every
    /// bullet. Existing paragraphs are reused in order and leftovers beyond
    /// the last item are removed.
    pub fn set_bullets<S: AsRef<str>>(&mut self, position: usize, items: &[S]) -> Result<()> {
        let shape = self.body_shape(position)?;
        self.with_text_frame(position, shape, |frame| fill_bullets(frame, items))?;
        debug!(slide = position, bullets = items.len(); "Set slide bullets");
        Ok(())
    }

    fn body_shape(&self, position: usize) -> Result<usize> {
        let info = self.classify(position)?;
        let slide = self.document.slide(position)?;
        info.primary_content(slide)
            .ok_or_else(|| EditError::NotFound(format!("body placeholder on slide {}", position)))
    }

    /// Run `edit` on the text frame of shape `index`; shapes without text are skipped.
    fn with_text_frame<F>(&mut self, position: usize, index: usize, edit: F) -> Result<()>
    where
        F: FnOnce(&mut TextFrame),
    {
        let slide = self.document.slide_mut(position)?;
        let shape = slide
            .shapes
            .get_mut(index)
            .ok_or_else(|| EditError::NotFound(format!("shape {} on slide {}", index, position)))?;
        if let Some(frame) = shape.text_frame_mut() {
            edit(frame);
        }
        Ok(())
    }
}

fn contains_match(slide: &Slide, finder: &memmem::Finder<'_>) -> bool {
    let mut found = false;
    for shape in &slide.shapes {
        visit_frames(shape, &mut |_, frame| {
            found |= frame
                .paragraphs
                .iter()
                .flat_map(|p| p.runs.iter())
                .any(|run| finder.find(run.text.as_bytes()).is_some());
        });
    }
    found
}

fn visit_frames<'a, F>(shape: &'a Shape, visit: &mut F)
where
    F: FnMut(&'a Shape, &'a TextFrame),
{
    if let Some(frame) = shape.text_frame() {
        visit(shape, frame);
    }
    for child in shape.children() {
        visit_frames(child, visit);
    }
}

fn overwrite_frame(frame: &mut TextFrame, text: &str) {
    let first = frame.first_paragraph_mut();
    match first.runs.split_first_mut() {
        Some((run, rest)) => {
            run.text = text.to_string();
            for run in rest {
                run.text.clear();
            }
        },
        None => first.set_text(text),
    }
    for paragraph in frame.paragraphs.iter_mut().skip(1) {
        paragraph.clear();
    }
}

fn fill_bullets<S: AsRef<str>>(frame: &mut TextFrame, items: &[S]) {
    let template = frame
        .paragraphs
        .first()
        .and_then(|p| p.runs.first())
        .map(|run| bullet_font(&run.font));

    frame.paragraphs.truncate(items.len().max(1));
    for paragraph in frame.paragraphs.iter_mut() {
        paragraph.clear();
    }

    for (i, item) in items.iter().enumerate() {
        let paragraph = if i == 0 {
            frame.first_paragraph_mut()
        } else if i < frame.paragraphs.len() {
            &mut frame.paragraphs[i]
        } else {
            frame.add_paragraph()
        };
        paragraph.set_text(item.as_ref());
        paragraph.level = 0;
        if let (Some(font), Some(run)) = (&template, paragraph.runs.first_mut()) {
            run.font = font.clone();
        }
    }
}

/// The attributes bullets inherit from the body's first run.
fn bullet_font(font: &Font) -> Font {
    Font {
        bold: font.bold,
        size: font.size,
        family: font.family.clone(),
        ..Font::default()
    }
}
