/// Slide structure classification.
///
/// Classification is a heuristic aid for choosing which shapes to edit. It
/// never changes the document and nothing correctness-critical depends on it
/// beyond locating title and body placeholders.
use crate::model::{PlaceholderRole, Shape, Slide};
use serde::Serialize;

/// Role of a slide, inferred from its layout name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutRole {
    Title,
    Content,
    TwoColumn,
    Section,
    Blank,
}

impl LayoutRole {
    /// Infer the role from a layout name.
    ///
    /// Matching is case-insensitive and checked in order: `title` without
    /// `content`, then `content`/`body`, then `two`/`comparison`, then
    /// `blank`, then `section`. Anything else is a content layout, so
    /// "Two Content" is a content layout.
    pub fn from_layout_name(name: &str) -> Self {
        let name = name.to_lowercase();
        if name.contains("title") && !name.contains("content") {
            LayoutRole::Title
        } else if name.contains("content") || name.contains("body") {
            LayoutRole::Content
        } else if name.contains("two") || name.contains("comparison") {
            LayoutRole::TwoColumn
        } else if name.contains("blank") {
            LayoutRole::Blank
        } else if name.contains("section") {
            LayoutRole::Section
        } else {
            LayoutRole::Content
        }
    }
}

/// Which shapes of a slide play which part.
///
/// Shape references are indices into [`Slide::shapes`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructureInfo {
    pub layout_role: LayoutRole,
    pub layout_name: String,
    pub title_shape: Option<usize>,
    pub subtitle_shape: Option<usize>,
    pub content_shapes: Vec<usize>,
    pub image_shapes: Vec<usize>,
    pub decorative_shapes: Vec<usize>,
    pub has_background_override: bool,
}

impl StructureInfo {
    /// First body shape, preferring placeholders over free text.
    ///
    /// `slide` should be the slide this info was classified from; indices it
    /// does not have are never treated as placeholders.
    pub fn primary_content(&self, slide: &Slide) -> Option<usize> {
        self.content_shapes
            .iter()
            .copied()
            .find(|&i| slide.shapes.get(i).is_some_and(Shape::is_placeholder))
            .or_else(|| self.content_shapes.first().copied())
    }
}

/// Classify the shapes of `slide`.
///
/// Placeholders are routed by role: title and centered title to the title
/// slot, subtitle to the subtitle slot, body and object to content, picture
/// to images and everything else (date, footer, slide number, chart, table)
/// to decorative. Only the first title and subtitle fill their slot; repeats
/// count as decorative. Free pictures are images. Free shapes whose trimmed
/// text is longer than `short_text_threshold` characters are content; the
/// remaining free shapes are decorative.
pub fn classify(slide: &Slide, layout_name: &str, short_text_threshold: usize) -> StructureInfo {
    let mut info = StructureInfo {
        layout_role: LayoutRole::from_layout_name(layout_name),
        layout_name: layout_name.to_string(),
        title_shape: None,
        subtitle_shape: None,
        content_shapes: Vec::new(),
        image_shapes: Vec::new(),
        decorative_shapes: Vec::new(),
        has_background_override: slide.background_override().is_some(),
    };

    for (index, shape) in slide.shapes.iter().enumerate() {
        match shape.placeholder_role() {
            Some(role) if role.is_title() && info.title_shape.is_none() => {
                info.title_shape = Some(index);
            },
            Some(PlaceholderRole::Subtitle) if info.subtitle_shape.is_none() => {
                info.subtitle_shape = Some(index);
            },
            Some(PlaceholderRole::Body | PlaceholderRole::Object) => {
                info.content_shapes.push(index);
            },
            Some(PlaceholderRole::Picture) => info.image_shapes.push(index),
            Some(_) => info.decorative_shapes.push(index),
            None if shape.is_picture() => info.image_shapes.push(index),
            None => {
                let long_text = shape
                    .text_frame()
                    .map(|frame| frame.text().trim().chars().count() > short_text_threshold)
                    .unwrap_or(false);
                if long_text {
                    info.content_shapes.push(index);
                } else {
                    info.decorative_shapes.push(index);
                }
            },
        }
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BackgroundOverride, LayoutId, Shape, TextFrame};

    #[test]
    fn test_layout_role_rules() {
        assert_eq!(LayoutRole::from_layout_name("Title Slide"), LayoutRole::Title);
        assert_eq!(LayoutRole::from_layout_name("Title Only"), LayoutRole::Title);
        assert_eq!(
            LayoutRole::from_layout_name("Title and Content"),
            LayoutRole::Content
        );
        assert_eq!(
            LayoutRole::from_layout_name("Two Content"),
            LayoutRole::Content
        );
        assert_eq!(
            LayoutRole::from_layout_name("Two Column Text"),
            LayoutRole::TwoColumn
        );
        assert_eq!(
            LayoutRole::from_layout_name("COMPARISON"),
            LayoutRole::TwoColumn
        );
        assert_eq!(
            LayoutRole::from_layout_name("Section Header"),
            LayoutRole::Section
        );
        assert_eq!(
            LayoutRole::from_layout_name("Blank Section"),
            LayoutRole::Blank
        );
        assert_eq!(LayoutRole::from_layout_name("Blank"), LayoutRole::Blank);
        assert_eq!(LayoutRole::from_layout_name("Custom"), LayoutRole::Content);
    }

    #[test]
    fn test_classify_routes_shapes() {
        let mut slide = Slide::new(LayoutId(1));
        slide
            .shapes
            .push(Shape::placeholder(2, "Title 1", 0, PlaceholderRole::Title));
        slide
            .shapes
            .push(Shape::placeholder(3, "Content 2", 1, PlaceholderRole::Body));
        slide
            .shapes
            .push(Shape::placeholder(4, "Footer 3", 11, PlaceholderRole::Footer));
        slide.shapes.push(Shape::picture(5, "Logo", "rId2"));
        slide.shapes.push(Shape::text_box(
            6,
            "Note",
            TextFrame::from_text("A free text box with a long sentence"),
        ));
        slide
            .shapes
            .push(Shape::text_box(7, "Tag", TextFrame::from_text("  short  ")));
        slide.shapes.push(Shape::auto_shape(8, "Bar", "rect"));
        slide.set_background_override(BackgroundOverride::solid("FFFFFF").unwrap());

        let info = classify(&slide, "Title and Content", 20);
        assert_eq!(info.layout_role, LayoutRole::Content);
        assert_eq!(info.title_shape, Some(0));
        assert_eq!(info.subtitle_shape, None);
        assert_eq!(info.content_shapes, vec![1, 4]);
        assert_eq!(info.image_shapes, vec![3]);
        assert_eq!(info.decorative_shapes, vec![2, 5, 6]);
        assert!(info.has_background_override);
        assert_eq!(info.primary_content(&slide), Some(1));
    }

    #[test]
    fn test_threshold_counts_trimmed_chars() {
        let mut slide = Slide::new(LayoutId(1));
        slide
            .shapes
            .push(Shape::text_box(2, "A", TextFrame::from_text("  twenty characters!!!  ")));
        slide
            .shapes
            .push(Shape::text_box(3, "B", TextFrame::from_text("twenty-one characters")));

        let info = classify(&slide, "Blank", 20);
        assert_eq!(info.layout_role, LayoutRole::Blank);
        assert_eq!(info.decorative_shapes, vec![0]);
        assert_eq!(info.content_shapes, vec![1]);
        assert_eq!(info.primary_content(&slide), Some(1));
    }

    #[test]
    fn test_primary_content_on_a_shorter_slide() {
        let mut classified = Slide::new(LayoutId(1));
        classified.shapes.push(Shape::text_box(
            2,
            "Note",
            TextFrame::from_text("A free text box with a long sentence"),
        ));
        classified
            .shapes
            .push(Shape::placeholder(3, "Content 2", 1, PlaceholderRole::Body));
        let info = classify(&classified, "Title and Content", 20);
        assert_eq!(info.primary_content(&classified), Some(1));

        let other = Slide::new(LayoutId(1));
        assert_eq!(info.primary_content(&other), Some(0));
    }
}
