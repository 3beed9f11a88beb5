//! Pairwise transform for text0 components.

use crate::error::{Error, Result};
use crate::transform::bootstrap::ComponentTransform;
use crate::types::Side;

use super::{append, char_len, char_slice, end_of, Text0, TextComponent, TextEdit};

/// Where offset `pos` ends up after `other` is applied. With `insert_after`,
/// a concurrent insert at exactly `pos` stays before it.
pub fn transform_position(pos: usize, other: &TextComponent, insert_after: bool) -> Result<usize> {
    match &other.edit {
        TextEdit::Insert(text) => {
            if other.pos < pos || (other.pos == pos && insert_after) {
                end_of(pos, text)
            } else {
                Ok(pos)
            }
        }
        TextEdit::Delete(text) => {
            if pos <= other.pos {
                Ok(pos)
            } else if pos <= end_of(other.pos, text)? {
                Ok(other.pos)
            } else {
                Ok(pos - char_len(text))
            }
        }
    }
}

impl ComponentTransform for Text0 {
    type Component = TextComponent;
    type Error = Error;

    fn check_valid_op(&self, _op: &[TextComponent]) -> Result<()> {
        Ok(())
    }

    fn transform_component(
        &self,
        dest: &mut Vec<TextComponent>,
        c: &TextComponent,
        other: &TextComponent,
        side: Side,
    ) -> Result<()> {
        let deleted = match &c.edit {
            TextEdit::Insert(text) => {
                let pos = transform_position(c.pos, other, side == Side::Right)?;
                append(dest, TextComponent::insert(pos, text.clone()));
                return Ok(());
            }
            TextEdit::Delete(deleted) => deleted,
        };

        match &other.edit {
            // The insert may land inside our delete; the delete is split around it.
            TextEdit::Insert(inserted) => {
                let mut rest = deleted.as_str();
                if c.pos < other.pos {
                    let before = other.pos - c.pos;
                    append(dest, TextComponent::delete(c.pos, char_slice(rest, 0, before)));
                    rest = char_slice(rest, before, char_len(rest));
                }
                if !rest.is_empty() {
                    append(dest, TextComponent::delete(end_of(c.pos, inserted)?, rest));
                }
            }
            TextEdit::Delete(other_deleted) => {
                let len = char_len(deleted);
                let other_len = char_len(other_deleted);
                let c_end = end_of(c.pos, deleted)?;
                let other_end = end_of(other.pos, other_deleted)?;
                if c.pos >= other_end {
                    append(dest, TextComponent::delete(c.pos - other_len, deleted.clone()));
                } else if c_end <= other.pos {
                    append(dest, c.clone());
                } else {
                    // Overlap: only the part the other side left behind survives.
                    let mut remaining = String::new();
                    if c.pos < other.pos {
                        remaining.push_str(char_slice(deleted, 0, other.pos - c.pos));
                    }
                    if c_end > other_end {
                        remaining.push_str(char_slice(deleted, other_end - c.pos, len));
                    }

                    let start = c.pos.max(other.pos);
                    let end = c_end.min(other_end);
                    let ours = char_slice(deleted, start - c.pos, end - c.pos);
                    let theirs = char_slice(other_deleted, start - other.pos, end - other.pos);
                    if ours != theirs {
                        return Err(Error::Precondition {
                            path: format!("offset {start}"),
                            expected: format!("{ours:?}"),
                            actual: format!("{theirs:?}"),
                        });
                    }

                    if !remaining.is_empty() {
                        let pos = transform_position(c.pos, other, false)?;
                        append(dest, TextComponent::delete(pos, remaining));
                    }
                }
            }
        }
        Ok(())
    }

    fn append(&self, dest: &mut Vec<TextComponent>, c: TextComponent) -> Result<()> {
        append(dest, c);
        Ok(())
    }
}
