/// Shapes on a slide: placeholders bound to layout slots and free shapes.
use crate::error::{EditError, Result};
use crate::model::rels::Relationships;
use crate::model::slide::Slide;
use crate::model::text::TextFrame;
use serde::{Deserialize, Serialize};

/// Role of a placeholder within its layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderRole {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    Object,
    Picture,
    Chart,
    Table,
    Date,
    Footer,
    SlideNumber,
}

impl PlaceholderRole {
    /// Title or centered title.
    #[inline]
    pub fn is_title(self) -> bool {
        matches!(self, PlaceholderRole::Title | PlaceholderRole::CenterTitle)
    }

    /// Whether a placeholder of this role carries a text body.
    #[inline]
    pub fn has_text(self) -> bool {
        !matches!(
            self,
            PlaceholderRole::Picture | PlaceholderRole::Chart | PlaceholderRole::Table
        )
    }
}

/// Placeholder binding: the layout slot index and its role.
///
/// `idx` is unique within a slide and stable across every slide that uses the
/// same layout, which makes it the matching key when content moves between
/// slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaceholderFormat {
    pub idx: u32,
    pub role: PlaceholderRole,
}

/// Position and size in EMUs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub cx: i64,
    pub cy: i64,
}

impl Geometry {
    pub fn new(x: i64, y: i64, cx: i64, cy: i64) -> Self {
        Self { x, y, cx, cy }
    }
}

/// Content of a graphic frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphicKind {
    /// Inline table, no related part
    Table,
    Chart,
    OleObject,
    Diagram,
}

/// What a shape is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    /// Placeholder bound to a layout slot
    Placeholder(PlaceholderFormat),
    /// Preset geometry (`rect`, `ellipse`, `line`...), usually decorative
    AutoShape { preset: String },
    /// Free-standing text box
    TextBox,
    /// Picture whose image lives behind a slide relationship
    Picture {
        image_rel: String,
        #[serde(default)]
        description: Option<String>,
    },
    Connector,
    Group { children: Vec<Shape> },
    /// Table, chart, OLE object or diagram
    GraphicFrame {
        graphic: GraphicKind,
        #[serde(default)]
        part_rel: Option<String>,
    },
}

/// A shape on a slide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    /// Shape ID, unique within the slide
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    pub kind: ShapeKind,
    #[serde(default)]
    pub text_frame: Option<TextFrame>,
}

impl Shape {
    /// A placeholder shape with an empty text body (when its role has text).
    pub fn placeholder(id: u32, name: impl Into<String>, idx: u32, role: PlaceholderRole) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::Placeholder(PlaceholderFormat { idx, role }),
            text_frame: role.has_text().then(TextFrame::new),
        }
    }

    /// A free-standing text box.
    pub fn text_box(id: u32, name: impl Into<String>, text_frame: TextFrame) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::TextBox,
            text_frame: Some(text_frame),
        }
    }

    /// A preset-geometry shape without text.
    pub fn auto_shape(id: u32, name: impl Into<String>, preset: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::AutoShape {
                preset: preset.into(),
            },
            text_frame: None,
        }
    }

    /// A picture referencing the image behind relationship `image_rel`.
    pub fn picture(id: u32, name: impl Into<String>, image_rel: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::Picture {
                image_rel: image_rel.into(),
                description: None,
            },
            text_frame: None,
        }
    }

    /// A group of shapes.
    pub fn group(id: u32, name: impl Into<String>, children: Vec<Shape>) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::Group { children },
            text_frame: None,
        }
    }

    /// A graphic frame, optionally bound to a related part.
    pub fn graphic_frame(
        id: u32,
        name: impl Into<String>,
        graphic: GraphicKind,
        part_rel: Option<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            geometry: None,
            kind: ShapeKind::GraphicFrame { graphic, part_rel },
            text_frame: None,
        }
    }

    /// Builder method: set position and size.
    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Builder method: set the text body.
    pub fn with_text_frame(mut self, text_frame: TextFrame) -> Self {
        self.text_frame = Some(text_frame);
        self
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ShapeKind::Placeholder(_))
    }

    /// Placeholder binding, if this is a placeholder.
    #[inline]
    pub fn placeholder_format(&self) -> Option<PlaceholderFormat> {
        match self.kind {
            ShapeKind::Placeholder(format) => Some(format),
            _ => None,
        }
    }

    #[inline]
    pub fn placeholder_index(&self) -> Option<u32> {
        self.placeholder_format().map(|f| f.idx)
    }

    #[inline]
    pub fn placeholder_role(&self) -> Option<PlaceholderRole> {
        self.placeholder_format().map(|f| f.role)
    }

    #[inline]
    pub fn is_picture(&self) -> bool {
        matches!(self.kind, ShapeKind::Picture { .. })
    }

    #[inline]
    pub fn text_frame(&self) -> Option<&TextFrame> {
        self.text_frame.as_ref()
    }

    #[inline]
    pub fn text_frame_mut(&mut self) -> Option<&mut TextFrame> {
        self.text_frame.as_mut()
    }

    /// Text of the shape, empty when it has no text body.
    pub fn text(&self) -> String {
        self.text_frame().map(TextFrame::text).unwrap_or_default()
    }

    /// Child shapes of a group; empty for every other kind.
    pub fn children(&self) -> &[Shape] {
        match &self.kind {
            ShapeKind::Group { children } => children,
            _ => &[],
        }
    }

    /// Mutable access to the text frames of this shape and, for groups, all descendants.
    pub fn text_frames_mut(&mut self) -> Vec<&mut TextFrame> {
        let mut frames = Vec::new();
        collect_frames_mut(self, &mut frames);
        frames
    }

    /// Highest shape ID in this subtree.
    pub(crate) fn max_id(&self) -> u32 {
        self.children()
            .iter()
            .map(Shape::max_id)
            .fold(self.id, u32::max)
    }

    /// Deep-clone this free shape onto `target`, returning the clone's shape ID.
    ///
    /// `source_rels` are the relationships of the slide this shape lives on.
    /// The clone gets fresh shape IDs on the target, and every relationship it
    /// references is re-created in the target's table. Placeholders belong to
    /// their layout and are never cloned; graphic frames bound to a part owned
    /// by the source slide (charts, OLE objects, diagrams) cannot be shared.
    /// Both fail with [`EditError::UnsupportedClone`], leaving `target`
    /// untouched.
    pub fn clone_onto(&self, source_rels: &Relationships, target: &mut Slide) -> Result<u32> {
        let mut clone = self.clone();
        let mut rels = target.relationships.clone();
        let mut next_id = target.next_shape_id();

        relink(&mut clone, source_rels, &mut rels, &mut next_id)?;

        let id = clone.id;
        target.relationships = rels;
        target.shapes.push(clone);
        Ok(id)
    }
}

fn collect_frames_mut<'a>(shape: &'a mut Shape, out: &mut Vec<&'a mut TextFrame>) {
    let Shape {
        kind, text_frame, ..
    } = shape;
    if let Some(frame) = text_frame.as_mut() {
        out.push(frame);
    }
    if let ShapeKind::Group { children } = kind {
        for child in children.iter_mut() {
            collect_frames_mut(child, out);
        }
    }
}

fn relink(
    shape: &mut Shape,
    source_rels: &Relationships,
    target_rels: &mut Relationships,
    next_id: &mut u32,
) -> Result<()> {
    let unsupported = |shape: &Shape, why: &str| {
        EditError::UnsupportedClone(format!("shape {} '{}' {}", shape.id, shape.name, why))
    };

    match &shape.kind {
        ShapeKind::Placeholder(_) => {
            return Err(unsupported(shape, "is a placeholder bound to its layout"));
        },
        ShapeKind::Picture { image_rel, .. } => {
            let rel = source_rels
                .get(image_rel)
                .ok_or_else(|| unsupported(shape, "references a missing image relationship"))?;
            if !rel.kind.is_shareable() {
                return Err(unsupported(shape, "references a part owned by its slide"));
            }
            let new_rel = target_rels.get_or_add(rel.kind, &rel.target);
            if let ShapeKind::Picture { image_rel, .. } = &mut shape.kind {
                *image_rel = new_rel;
            }
        },
        ShapeKind::GraphicFrame {
            part_rel: Some(part_rel),
            graphic,
        } => {
            let rel = source_rels
                .get(part_rel)
                .ok_or_else(|| unsupported(shape, "references a missing part relationship"))?;
            if !rel.kind.is_shareable() {
                let why = format!("holds a {:?} part owned by its slide", graphic);
                return Err(unsupported(shape, &why));
            }
            let new_rel = target_rels.get_or_add(rel.kind, &rel.target);
            if let ShapeKind::GraphicFrame { part_rel, .. } = &mut shape.kind {
                *part_rel = Some(new_rel);
            }
        },
        _ => {},
    }

    shape.id = *next_id;
    *next_id += 1;

    if let ShapeKind::Group { children } = &mut shape.kind {
        for child in children.iter_mut() {
            relink(child, source_rels, target_rels, next_id)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::layout::LayoutId;
    use crate::model::rels::RelKind;
    use crate::model::text::{Paragraph, Run};

    fn slide_with_image() -> Slide {
        let mut slide = Slide::new(LayoutId(1));
        slide.relationships.insert("rId2", RelKind::Image, "/ppt/media/logo.png");
        slide.relationships.insert("rId3", RelKind::Chart, "/ppt/charts/chart1.xml");
        slide.shapes.push(Shape::picture(4, "Logo", "rId2"));
        slide
    }

    #[test]
    fn test_placeholder_accessors() {
        let shape = Shape::placeholder(2, "Title 1", 0, PlaceholderRole::Title);
        assert!(shape.is_placeholder());
        assert_eq!(shape.placeholder_index(), Some(0));
        assert_eq!(shape.placeholder_role(), Some(PlaceholderRole::Title));
        assert!(shape.text_frame().is_some());

        let pic = Shape::placeholder(3, "Picture 2", 1, PlaceholderRole::Picture);
        assert!(pic.text_frame().is_none());
    }

    #[test]
    fn test_clone_picture_relinks_image() {
        let source = slide_with_image();
        let mut target = Slide::new(LayoutId(1));
        target.relationships.insert("rId1", RelKind::Hyperlink, "https://example.com");

        let id = source.shapes[0]
            .clone_onto(&source.relationships, &mut target)
            .unwrap();

        assert_eq!(target.shapes.len(), 1);
        assert_eq!(target.shapes[0].id, id);
        let ShapeKind::Picture { image_rel, .. } = &target.shapes[0].kind else {
            panic!("expected a picture");
        };
        let rel = target.relationships.get(image_rel).unwrap();
        assert_eq!(rel.target, "/ppt/media/logo.png");
        assert_eq!(rel.kind, RelKind::Image);
    }

    #[test]
    fn test_clone_chart_is_unsupported() {
        let source = slide_with_image();
        let chart = Shape::graphic_frame(5, "Chart 4", GraphicKind::Chart, Some("rId3".into()));
        let mut target = Slide::new(LayoutId(1));

        let err = chart.clone_onto(&source.relationships, &mut target).unwrap_err();
        assert!(matches!(err, EditError::UnsupportedClone(_)));
        assert!(target.shapes.is_empty());
        assert!(target.relationships.is_empty());
    }

    #[test]
    fn test_clone_placeholder_is_unsupported() {
        let source = slide_with_image();
        let title = Shape::placeholder(2, "Title 1", 0, PlaceholderRole::Title);
        let mut target = Slide::new(LayoutId(1));
        assert!(matches!(
            title.clone_onto(&source.relationships, &mut target),
            Err(EditError::UnsupportedClone(_))
        ));
    }

    #[test]
    fn test_clone_group_renumbers_children() {
        let source = slide_with_image();
        let group = Shape::group(
            10,
            "Badge",
            vec![
                Shape::auto_shape(11, "Ring", "ellipse"),
                Shape::picture(12, "Icon", "rId2"),
            ],
        );
        let mut target = Slide::new(LayoutId(1));
        target.shapes.push(Shape::placeholder(2, "Title 1", 0, PlaceholderRole::Title));

        let id = group.clone_onto(&source.relationships, &mut target).unwrap();
        assert_eq!(id, 3);
        let cloned = &target.shapes[1];
        let ids: Vec<u32> = cloned.children().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![4, 5]);
        assert_eq!(target.relationships.len(), 1);
    }

    #[test]
    fn test_text_frames_mut_descends_into_groups() {
        let label = Shape::text_box(
            3,
            "Label",
            TextFrame {
                paragraphs: vec![Paragraph::from_run(Run::new("inner"))],
            },
        );
        let mut group = Shape::group(2, "Group", vec![label]);
        assert_eq!(group.text_frames_mut().len(), 1);
        assert_eq!(group.max_id(), 3);
    }
}
