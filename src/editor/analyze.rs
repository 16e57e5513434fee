/// Editing reports: what can be changed safely on each slide.
use crate::editor::structure::{LayoutRole, StructureInfo};
use crate::editor::text_ops::Scope;
use crate::editor::Editor;
use crate::error::{EditError, Result};
use crate::model::{BackgroundFill, Shape, Slide};
use serde::Serialize;

/// Separator between slides in extracted text.
const SLIDE_SEPARATOR: &str = "\n\n---\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Title,
    Subtitle,
    Content,
}

/// A text-bearing shape that may be edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditableElement {
    pub kind: ElementKind,
    /// Rank among the slide's content shapes, for content elements
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub shape_id: u32,
    pub current_text: String,
    /// Non-blank paragraphs
    pub paragraph_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlideReport {
    pub slide_number: usize,
    pub layout_name: String,
    pub layout_role: LayoutRole,
    pub has_background_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_fill: Option<BackgroundFill>,
    pub editable_elements: Vec<EditableElement>,
    pub decorative_count: usize,
    pub image_count: usize,
    pub word_count: usize,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    pub total_slides: usize,
    pub total_word_count: usize,
    pub slides: Vec<SlideReport>,
}

impl DocumentReport {
    /// Render the report as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| EditError::Parse(format!("Failed to serialize report: {}", e)))
    }
}

impl Editor {
    /// Report on every slide.
    pub fn analyze(&self) -> Result<DocumentReport> {
        let slides = (1..=self.document.slide_count())
            .map(|position| self.analyze_slide(position))
            .collect::<Result<Vec<_>>>()?;
        Ok(DocumentReport {
            total_slides: slides.len(),
            total_word_count: slides.iter().map(|s| s.word_count).sum(),
            slides,
        })
    }

    /// Report on the slide at `position`.
    pub fn analyze_slide(&self, position: usize) -> Result<SlideReport> {
        let info = self.classify(position)?;
        let slide = self.document.slide(position)?;

        let mut warnings = Vec::new();
        if !info.decorative_shapes.is_empty() {
            warnings.push(format!(
                "Contains {} decorative element(s); leave them unchanged",
                info.decorative_shapes.len()
            ));
        }

        let background_fill = slide.background_override().map(|bg| bg.fill_kind());
        let word_count = paragraph_texts(slide)
            .iter()
            .map(|t| t.split_whitespace().count())
            .sum();

        Ok(SlideReport {
            slide_number: position,
            editable_elements: editable_elements(slide, &info),
            layout_name: info.layout_name,
            layout_role: info.layout_role,
            has_background_override: info.has_background_override,
            background_fill,
            decorative_count: info.decorative_shapes.len(),
            image_count: info.image_shapes.len(),
            word_count,
            warnings,
        })
    }

    /// Visible text of the slides in `scope`, one line per paragraph, slides
    /// separated by a `---` line.
    pub fn extract_text(&self, scope: Scope) -> Result<String> {
        let positions: Vec<usize> = match scope {
            Scope::Document => (1..=self.document.slide_count()).collect(),
            Scope::Slide(position) => vec![position],
        };
        let texts = positions
            .into_iter()
            .map(|position| Ok(paragraph_texts(self.document.slide(position)?).join("\n")))
            .collect::<Result<Vec<_>>>()?;
        Ok(texts.join(SLIDE_SEPARATOR))
    }
}

/// Trimmed, non-blank paragraph texts of the slide's top-level shapes.
fn paragraph_texts(slide: &Slide) -> Vec<String> {
    slide
        .shapes
        .iter()
        .filter_map(Shape::text_frame)
        .flat_map(|frame| frame.paragraphs.iter())
        .map(|p| p.text().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn editable_elements(slide: &Slide, info: &StructureInfo) -> Vec<EditableElement> {
    let element = |kind: ElementKind, index: Option<usize>, shape: &Shape| {
        let frame = shape.text_frame()?;
        let paragraphs: Vec<String> = frame
            .paragraphs
            .iter()
            .map(|p| p.text())
            .filter(|t| !t.trim().is_empty())
            .collect();
        Some(EditableElement {
            kind,
            index,
            shape_id: shape.id,
            current_text: match kind {
                ElementKind::Content => paragraphs.join("\n"),
                _ => frame.text(),
            },
            paragraph_count: paragraphs.len(),
        })
    };

    let mut elements = Vec::new();
    if let Some(i) = info.title_shape {
        elements.extend(element(ElementKind::Title, None, &slide.shapes[i]));
    }
    if let Some(i) = info.subtitle_shape {
        elements.extend(element(ElementKind::Subtitle, None, &slide.shapes[i]));
    }
    for (rank, &i) in info.content_shapes.iter().enumerate() {
        elements.extend(element(ElementKind::Content, Some(rank), &slide.shapes[i]));
    }
    elements
}
