//! PDF text reader — walks every page's content stream and produces positioned
//! [`TextItem`]s in the order the producer emitted them.
//!
//! Items are NOT re-sorted by y coordinate even when a design tool wrote the
//! stream out of visual order. Auto-sorting is unreliable across rotated and
//! multi-column layouts and can make a broken document look falsely correct;
//! the caller sees exactly what the document contains.

use std::collections::BTreeMap;

use anyhow::{anyhow, bail};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};

use crate::errors::AppError;
use crate::extract::models::TextItem;

const PDF_MAGIC: &[u8] = b"%PDF";

/// The identity 2x3 text matrix: [a, b, c, d, tx, ty].
const IDENTITY_MATRIX: [f32; 6] = [1.0, 0.0, 0.0, 1.0, 0.0, 0.0];

/// Approximate glyph width as a fraction of font size. Used only for the
/// surfaced width estimate and horizontal advance; 0.5 is a reasonable
/// default for proportional fonts.
const APPROX_CHAR_WIDTH_RATIO: f32 = 0.5;

/// Some PDF producers emit a hyphen as "-" followed by a soft hyphen and
/// U+2010. Normalize that one known artifact back to a plain "-"; anything
/// broader would corrupt legitimate soft-hyphen usage.
const SOFT_HYPHEN_ARTIFACT: &str = "-\u{AD}\u{2010}";

/// Reads a PDF byte buffer into one flat item sequence across all pages,
/// page order preserved, in-page order as emitted by the content stream.
pub fn read_pdf(bytes: &[u8]) -> Result<Vec<TextItem>, AppError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(AppError::MalformedDocument(
            "missing %PDF header".to_string(),
        ));
    }

    let doc = Document::load_mem(bytes)
        .map_err(|e| AppError::MalformedDocument(format!("invalid PDF structure: {e}")))?;

    let mut items = Vec::new();
    // Pages are walked sequentially; later pages may reference font objects
    // already touched by earlier ones.
    for (page_number, page_id) in doc.get_pages() {
        let fonts = resolve_page_fonts(&doc, page_id);

        let content_bytes = doc.get_page_content(page_id).map_err(|e| {
            AppError::ExtractionFailed(format!("page {page_number}: unreadable content: {e}"))
        })?;
        let content = Content::decode(&content_bytes).map_err(|e| {
            AppError::ExtractionFailed(format!("page {page_number}: invalid content stream: {e}"))
        })?;

        let page_items = walk_text_operations(&content.operations, &fonts)
            .map_err(|e| AppError::ExtractionFailed(format!("page {page_number}: {e}")))?;
        items.extend(filter_noise(page_items));
    }

    Ok(items)
}

/// Joins items into the text payload handed to the section classifier:
/// newline after a run that ends its line, single space otherwise.
pub fn items_to_text(items: &[TextItem]) -> String {
    let mut text = String::new();
    for item in items {
        text.push_str(&item.text);
        text.push(if item.has_eol { '\n' } else { ' ' });
    }
    text
}

/// Drops whitespace-only items that do not mark a line break — they are
/// rendering artifacts, not content.
fn filter_noise(items: Vec<TextItem>) -> Vec<TextItem> {
    items.into_iter().filter(|i| !i.is_empty_space()).collect()
}

/// Maps each font resource key (e.g. `F1`) on the page to its declared
/// `BaseFont` name with any subset prefix stripped.
fn resolve_page_fonts(doc: &Document, page_id: ObjectId) -> BTreeMap<Vec<u8>, String> {
    doc.get_page_fonts(page_id)
        .into_iter()
        .filter_map(|(key, font)| {
            let base = font.get(b"BaseFont").ok()?.as_name().ok()?;
            let name = strip_subset_prefix(&String::from_utf8_lossy(base));
            Some((key, name))
        })
        .collect()
}

/// Embedded subset fonts carry a generated `ABCDEF+` tag in front of the real
/// name. Strip it so callers see `Arial-BoldMT` rather than the alias.
fn strip_subset_prefix(name: &str) -> String {
    let bytes = name.as_bytes();
    if bytes.len() > 7
        && bytes[6] == b'+'
        && bytes[..6].iter().all(|b| b.is_ascii_uppercase())
    {
        name[7..].to_string()
    } else {
        name.to_string()
    }
}

/// Mutable state tracked while walking a page's content stream.
struct TextState {
    /// Resolved name of the current font; empty until the first `Tf`.
    font_name: String,
    font_size: f32,
    /// Elements [a, b, c, d, tx, ty] of the current text matrix.
    text_matrix: [f32; 6],
    /// Text line matrix — set by BT/Tm and updated by Td/TD/T*.
    line_matrix: [f32; 6],
    /// Horizontal scaling factor (Tz, percent / 100).
    horiz_scale: f32,
    char_spacing: f32,
    word_spacing: f32,
    leading: f32,
}

impl Default for TextState {
    fn default() -> Self {
        Self {
            font_name: String::new(),
            font_size: 0.0,
            text_matrix: IDENTITY_MATRIX,
            line_matrix: IDENTITY_MATRIX,
            horiz_scale: 1.0,
            char_spacing: 0.0,
            word_spacing: 0.0,
            leading: 0.0,
        }
    }
}

impl TextState {
    /// Translation components of the text matrix are the item's placement.
    fn x(&self) -> f32 {
        self.text_matrix[4]
    }

    fn y(&self) -> f32 {
        self.text_matrix[5]
    }

    fn effective_font_size(&self) -> f32 {
        let scale = (self.text_matrix[1].powi(2) + self.text_matrix[3].powi(2)).sqrt();
        (self.font_size * scale).abs()
    }

    /// Multiply the line matrix by a translation (Td / TD / T*).
    fn translate_line(&mut self, tx: f32, ty: f32) {
        let new_tx = self.line_matrix[0] * tx + self.line_matrix[2] * ty + self.line_matrix[4];
        let new_ty = self.line_matrix[1] * tx + self.line_matrix[3] * ty + self.line_matrix[5];
        self.line_matrix[4] = new_tx;
        self.line_matrix[5] = new_ty;
        self.text_matrix = self.line_matrix;
    }

    /// Advance the text matrix horizontally after showing `text`.
    fn advance_after_show(&mut self, text: &str) {
        let mut dx = 0.0;
        for ch in text.chars() {
            dx += self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale + self.char_spacing;
            if ch == ' ' {
                dx += self.word_spacing;
            }
        }
        self.text_matrix[4] += dx * self.text_matrix[0];
        self.text_matrix[5] += dx * self.text_matrix[1];
    }

    fn estimate_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.font_size * APPROX_CHAR_WIDTH_RATIO * self.horiz_scale
    }
}

/// Runs the text-rendering state machine over one page's operations.
///
/// Every text-showing operator emits one item; line-advance operators mark the
/// previously emitted item as ending its line.
fn walk_text_operations(
    ops: &[Operation],
    fonts: &BTreeMap<Vec<u8>, String>,
) -> anyhow::Result<Vec<TextItem>> {
    let mut state = TextState::default();
    let mut items: Vec<TextItem> = Vec::new();

    for op in ops {
        match op.operator.as_str() {
            "BT" => {
                state.text_matrix = IDENTITY_MATRIX;
                state.line_matrix = IDENTITY_MATRIX;
            }
            "ET" => {
                // Font state is kept across text objects; some producers set
                // the font once and reuse it.
            }
            "Tf" => {
                let key = match op.operands.first() {
                    Some(Object::Name(name)) => name.clone(),
                    _ => continue,
                };
                // A font the page's font table cannot resolve is surfaced as
                // an error, never silently guessed around.
                let resolved = fonts.get(&key).ok_or_else(|| {
                    anyhow!(
                        "font resource '{}' is not defined in the page font table",
                        String::from_utf8_lossy(&key)
                    )
                })?;
                state.font_name = resolved.clone();
                state.font_size = op.operands.get(1).and_then(operand_number).unwrap_or(0.0);
            }
            "Tm" => {
                let vals: Vec<f32> = op
                    .operands
                    .iter()
                    .take(6)
                    .filter_map(operand_number)
                    .collect();
                if vals.len() == 6 {
                    mark_line_end(&mut items);
                    state.text_matrix = [vals[0], vals[1], vals[2], vals[3], vals[4], vals[5]];
                    state.line_matrix = state.text_matrix;
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = operand_pair(&op.operands) {
                    mark_line_end(&mut items);
                    state.translate_line(tx, ty);
                }
            }
            "TD" => {
                // TD is `-ty TL; tx ty Td`
                if let (Some(tx), Some(ty)) = operand_pair(&op.operands) {
                    mark_line_end(&mut items);
                    state.leading = -ty;
                    state.translate_line(tx, ty);
                }
            }
            "T*" => {
                mark_line_end(&mut items);
                state.translate_line(0.0, -state.leading);
            }
            "TL" => {
                if let Some(v) = op.operands.first().and_then(operand_number) {
                    state.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = op.operands.first().and_then(operand_number) {
                    state.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = op.operands.first().and_then(operand_number) {
                    state.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = op.operands.first().and_then(operand_number) {
                    state.horiz_scale = v / 100.0;
                }
            }
            "Tj" => {
                if let Some(operand) = op.operands.first() {
                    show_string(operand, &mut state, &mut items)?;
                }
            }
            "TJ" => {
                if let Some(Object::Array(arr)) = op.operands.first() {
                    show_array(arr, &mut state, &mut items)?;
                }
            }
            "'" => {
                mark_line_end(&mut items);
                state.translate_line(0.0, -state.leading);
                if let Some(operand) = op.operands.first() {
                    show_string(operand, &mut state, &mut items)?;
                }
            }
            "\"" => {
                // " aw ac string  =>  set Tw, Tc, then ' behavior
                if op.operands.len() >= 3 {
                    if let Some(aw) = operand_number(&op.operands[0]) {
                        state.word_spacing = aw;
                    }
                    if let Some(ac) = operand_number(&op.operands[1]) {
                        state.char_spacing = ac;
                    }
                    mark_line_end(&mut items);
                    state.translate_line(0.0, -state.leading);
                    show_string(&op.operands[2], &mut state, &mut items)?;
                }
            }
            _ => {}
        }
    }

    Ok(items)
}

/// Flags the most recently emitted item as the end of its line.
fn mark_line_end(items: &mut [TextItem]) {
    if let Some(last) = items.last_mut() {
        last.has_eol = true;
    }
}

fn show_string(
    operand: &Object,
    state: &mut TextState,
    items: &mut Vec<TextItem>,
) -> anyhow::Result<()> {
    if state.font_name.is_empty() {
        bail!("text shown before any font was selected");
    }
    let text = repair_hyphen_artifact(&decode_string_bytes(operand.as_str().map_err(
        |e| anyhow!("text operand is not a string: {e}"),
    )?));
    emit_item(text, state, items);
    Ok(())
}

/// A `TJ` array interleaves strings with kerning adjustments (thousandths of
/// a text-space unit). Contiguous strings merge into one item; a displacement
/// wide enough to read as a word gap becomes a literal space.
fn show_array(
    arr: &[Object],
    state: &mut TextState,
    items: &mut Vec<TextItem>,
) -> anyhow::Result<()> {
    if state.font_name.is_empty() {
        bail!("text shown before any font was selected");
    }

    let origin_x = state.x();
    let origin_y = state.y();
    let mut buf = String::new();

    for elem in arr {
        match elem {
            Object::String(bytes, _) => {
                let fragment = repair_hyphen_artifact(&decode_string_bytes(bytes));
                buf.push_str(&fragment);
                state.advance_after_show(&fragment);
            }
            other => {
                if let Some(adj) = operand_number(other) {
                    let dx = -adj / 1000.0 * state.font_size * state.horiz_scale;
                    let gap_threshold =
                        state.font_size * APPROX_CHAR_WIDTH_RATIO * state.horiz_scale * 0.3;
                    if dx > gap_threshold && !buf.is_empty() {
                        buf.push(' ');
                    }
                    state.text_matrix[4] += dx * state.text_matrix[0];
                    state.text_matrix[5] += dx * state.text_matrix[1];
                }
            }
        }
    }

    items.push(TextItem {
        width: state.estimate_width(&buf),
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
        text: buf,
        x: origin_x,
        y: origin_y,
        has_eol: false,
    });
    Ok(())
}

fn emit_item(text: String, state: &mut TextState, items: &mut Vec<TextItem>) {
    items.push(TextItem {
        width: state.estimate_width(&text),
        font_size: state.effective_font_size(),
        font_name: state.font_name.clone(),
        x: state.x(),
        y: state.y(),
        has_eol: false,
        text: text.clone(),
    });
    state.advance_after_show(&text);
}

/// PDF string operands are either UTF-16BE (with BOM) or byte strings.
fn decode_string_bytes(bytes: &[u8]) -> String {
    if bytes.starts_with(&[0xFE, 0xFF]) {
        let code_units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&code_units)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

fn repair_hyphen_artifact(text: &str) -> String {
    text.replace(SOFT_HYPHEN_ARTIFACT, "-")
}

fn operand_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

fn operand_pair(operands: &[Object]) -> (Option<f32>, Option<f32>) {
    (
        operands.first().and_then(operand_number),
        operands.get(1).and_then(operand_number),
    )
}
