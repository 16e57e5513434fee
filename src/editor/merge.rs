/// Copy text content between shapes while keeping the target's own formatting.
use crate::model::{Color, Font, Paragraph, Run, Shape, TextFrame};

/// Copy the text of `source` into `target`.
///
/// The target keeps its first paragraph, so whatever paragraph defaults it
/// inherited from its layout survive; every later paragraph is replaced. For
/// each source paragraph the alignment and outline level are copied (an
/// inherited alignment clears the target's) and the
/// runs are recreated with only the attributes the source set explicitly.
/// Scheme colors are left to inherit. Shapes without a text body on either
/// side are left alone.
pub fn merge_text(source: &Shape, target: &mut Shape) {
    let (Some(from), Some(into)) = (source.text_frame(), target.text_frame_mut()) else {
        return;
    };
    merge_frame(from, into);
}

pub(crate) fn merge_frame(source: &TextFrame, target: &mut TextFrame) {
    target.paragraphs.truncate(1);
    target.first_paragraph_mut().clear();

    for (i, paragraph) in source.paragraphs.iter().enumerate() {
        let into = if i == 0 {
            target.first_paragraph_mut()
        } else {
            target.add_paragraph()
        };
        copy_paragraph(paragraph, into);
    }
}

fn copy_paragraph(source: &Paragraph, target: &mut Paragraph) {
    target.alignment = source.alignment;
    target.level = source.level;
    target.runs.clear();
    target.runs.extend(
        source
            .runs
            .iter()
            .map(|run| Run::with_font(run.text.clone(), explicit_font(&run.font))),
    );
}

fn explicit_font(font: &Font) -> Font {
    Font {
        bold: font.bold,
        italic: font.italic,
        size: font.size,
        family: font.family.clone(),
        color: font.color.as_ref().and_then(Color::rgb).map(Color::Rgb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Alignment, FontSize, PlaceholderRole, RgbColor};

    fn body(id: u32) -> Shape {
        Shape::placeholder(id, "Content", 1, PlaceholderRole::Body)
    }

    #[test]
    fn test_run_counts_and_attributes() {
        let mut source = body(2);
        let frame = source.text_frame_mut().unwrap();
        frame.paragraphs = vec![
            Paragraph {
                alignment: Some(Alignment::Center),
                level: 0,
                runs: vec![
                    Run::with_font(
                        "Bold ",
                        Font {
                            bold: Some(true),
                            size: Some(FontSize::from_points(24.0)),
                            ..Font::default()
                        },
                    ),
                    Run::new("plain"),
                ],
                default_font: Font::default(),
            },
            Paragraph {
                alignment: None,
                level: 2,
                runs: vec![Run::with_font(
                    "Nested",
                    Font {
                        family: Some("Calibri".to_string()),
                        color: Some(Color::Rgb(RgbColor(0xFF, 0, 0))),
                        ..Font::default()
                    },
                )],
                default_font: Font::default(),
            },
        ];

        let mut target = body(3);
        let target_frame = target.text_frame_mut().unwrap();
        target_frame.paragraphs[0].default_font.size = Some(FontSize::from_points(18.0));
        target_frame.paragraphs.push(Paragraph::from_run(Run::new("stale")));
        target_frame.paragraphs.push(Paragraph::from_run(Run::new("stale")));

        merge_text(&source, &mut target);

        let merged = target.text_frame().unwrap();
        assert_eq!(merged.paragraphs.len(), 2);
        assert_eq!(merged.paragraphs[0].runs.len(), 2);
        assert_eq!(merged.paragraphs[1].runs.len(), 1);
        assert_eq!(merged.text(), "Bold plain\nNested");

        assert_eq!(merged.paragraphs[0].alignment, Some(Alignment::Center));
        assert_eq!(merged.paragraphs[1].level, 2);
        assert_eq!(
            merged.paragraphs[0].default_font.size,
            Some(FontSize::from_points(18.0))
        );
        assert_eq!(merged.paragraphs[0].runs[0].font.bold, Some(true));
        assert!(merged.paragraphs[0].runs[1].font.is_inherited());
        assert_eq!(
            merged.paragraphs[1].runs[0].font.color,
            Some(Color::Rgb(RgbColor(0xFF, 0, 0)))
        );
    }

    #[test]
    fn test_inherited_alignment_resets_target() {
        let mut source = body(2);
        source.text_frame_mut().unwrap().paragraphs[0].set_text("Left to the layout");

        let mut target = body(3);
        let first = &mut target.text_frame_mut().unwrap().paragraphs[0];
        first.alignment = Some(Alignment::Right);
        first.set_text("old");

        merge_text(&source, &mut target);
        let merged = &target.text_frame().unwrap().paragraphs[0];
        assert_eq!(merged.alignment, None);
        assert_eq!(merged.text(), "Left to the layout");
    }

    #[test]
    fn test_scheme_color_is_not_copied() {
        let mut source = body(2);
        source.text_frame_mut().unwrap().paragraphs[0]
            .runs
            .push(Run::with_font(
                "Accent",
                Font {
                    italic: Some(true),
                    color: Some(Color::Scheme("accent1".to_string())),
                    ..Font::default()
                },
            ));

        let mut target = body(3);
        merge_text(&source, &mut target);

        let run = &target.text_frame().unwrap().paragraphs[0].runs[0];
        assert_eq!(run.font.italic, Some(true));
        assert_eq!(run.font.color, None);
    }

    #[test]
    fn test_empty_source_clears_target() {
        let mut source = body(2);
        source.text_frame_mut().unwrap().paragraphs.clear();

        let mut target = body(3);
        target.text_frame_mut().unwrap().paragraphs[0].set_text("old");

        merge_text(&source, &mut target);
        let frame = target.text_frame().unwrap();
        assert_eq!(frame.paragraphs.len(), 1);
        assert!(frame.paragraphs[0].runs.is_empty());
    }

    #[test]
    fn test_shapes_without_text_are_ignored() {
        let source = Shape::picture(2, "Photo", "rId2");
        let mut target = body(3);
        target.text_frame_mut().unwrap().paragraphs[0].set_text("kept");

        merge_text(&source, &mut target);
        assert_eq!(target.text(), "kept");
    }
}
