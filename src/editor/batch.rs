/// Multi-slide updates and whole-sequence operations.
use crate::editor::Editor;
use crate::editor::text_ops::Scope;
use crate::error::{EditError, Result};
use fixedbitset::FixedBitSet;
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// One entry of a batch update.
///
/// Deserializes from YAML or JSON-shaped data:
///
/// ```yaml
/// - slide_num: 2
///   title: Results
///   content_items: [Revenue up, Costs down]
///   replacements:
///     "2024": "2025"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SlideUpdate {
    #[serde(alias = "slide_num")]
    pub slide_position: usize,
    pub title: Option<String>,
    #[serde(alias = "content")]
    pub body: Option<String>,
    #[serde(alias = "content_items")]
    pub bullets: Option<Vec<String>>,
    /// Find/replace pairs, applied in order
    pub replacements: IndexMap<String, String>,
}

impl SlideUpdate {
    pub fn new(slide_position: usize) -> Self {
        Self {
            slide_position,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn bullets<I, S>(mut self, bullets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullets = Some(bullets.into_iter().map(Into::into).collect());
        self
    }

    pub fn replace(mut self, find: impl Into<String>, replace: impl Into<String>) -> Self {
        self.replacements.insert(find.into(), replace.into());
        self
    }
}

impl Editor {
    /// Apply `updates` in order.
    ///
    /// Directives for slides that do not exist are skipped. A directive is
    /// counted when its slide exists and every field it requests could be
    /// written; a missing placeholder is logged and the remaining fields of
    /// that directive still apply. Returns the number of directives counted.
    pub fn batch_update(&mut self, updates: &[SlideUpdate]) -> Result<usize> {
        let mut applied = 0;
        for (n, update) in updates.iter().enumerate() {
            let position = update.slide_position;
            if self.document.check_position(position).is_err() {
                warn!(
                    directive = n,
                    slide = position,
                    slides = self.document.slide_count();
                    "Skipping batch directive for missing slide"
                );
                continue;
            }

            let mut complete = self.apply_content(
                position,
                update.title.as_deref(),
                update.body.as_deref(),
                update.bullets.as_deref(),
            )?;
            for (find, replace) in &update.replacements {
                if find.is_empty() {
                    warn!(directive = n; "Ignoring replacement with an empty search string");
                    complete = false;
                    continue;
                }
                self.replace_text(Scope::Slide(position), find, replace)?;
            }

            if complete {
                applied += 1;
            }
        }

        debug!(directives = updates.len(), applied = applied; "Batch update finished");
        Ok(applied)
    }

    /// Delete the slides at `positions`, all or nothing.
    ///
    /// Every position is checked against the current slide count before
    /// anything changes. Duplicates are ignored. Slides are removed from the
    /// highest position down and their parts are released. Returns the number
    /// of slides deleted.
    pub fn delete_slides(&mut self, positions: &[usize]) -> Result<usize> {
        for &position in positions {
            self.document.check_position(position)?;
        }

        let mut ordered = positions.to_vec();
        ordered.sort_unstable();
        ordered.dedup();

        for &position in ordered.iter().rev() {
            let entry = self.document.remove_at(position)?;
            self.document.drop_rel(&entry.rel_id);
        }

        debug!(deleted = ordered.len(), slides = self.document.slide_count(); "Deleted slides");
        Ok(ordered.len())
    }

    /// Reorder slides; `new_order[i]` is the current position of the slide
    /// that should end up at position `i + 1`.
    ///
    /// Anything but a permutation of `1..=slide_count` fails with
    /// [`EditError::InvalidOrder`] and leaves the document untouched.
    pub fn reorder_slides(&mut self, new_order: &[usize]) -> Result<()> {
        let count = self.document.slide_count();
        if new_order.len() != count {
            return Err(EditError::InvalidOrder(format!(
                "expected {} positions, got {}",
                count,
                new_order.len()
            )));
        }

        let mut seen = FixedBitSet::with_capacity(count);
        for &position in new_order {
            if position == 0 || position > count {
                return Err(EditError::InvalidOrder(format!(
                    "position {} is outside 1..={}",
                    position, count
                )));
            }
            if seen.put(position - 1) {
                return Err(EditError::InvalidOrder(format!(
                    "position {} appears more than once",
                    position
                )));
            }
        }

        let snapshot = self.document.slide_ids().to_vec();
        let reordered = new_order
            .iter()
            .map(|&position| snapshot[position - 1].clone())
            .collect();
        self.document.replace_sequence(reordered)?;
        debug!(slides = count; "Reordered slides");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_from_yaml_with_aliases() {
        let yaml = "\
- slide_num: 2
  title: Results
  content_items: [Revenue up, Costs down]
  replacements:
    zeta: z
    alpha: a
- slide_position: 1
  content: Plain body
";
        let updates: Vec<SlideUpdate> = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(
            updates[0],
            SlideUpdate::new(2)
                .title("Results")
                .bullets(["Revenue up", "Costs down"])
                .replace("zeta", "z")
                .replace("alpha", "a")
        );
        let keys: Vec<&str> = updates[0].replacements.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zeta", "alpha"]);
        assert_eq!(updates[1], SlideUpdate::new(1).body("Plain body"));
    }
}
