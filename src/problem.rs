use std::fs;
use std::path::Path;

use crate::board::Board;
use crate::error::{Result, SolverError};
use crate::rotation::Rotation;

/// A parsed problem document: the board side length and the row-major labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub size: usize,
    pub entities: Vec<i32>,
}

impl Problem {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_text(&text)
    }

    /// Token-scanning parser. The documents are JSON-shaped but are not
    /// required to be strict JSON: the first `"size"` and `"entities"` keys
    /// win, and entity extraction only cares about integer literals between
    /// the balanced array brackets.
    pub fn from_text(text: &str) -> Result<Self> {
        let size = parse_size(text)?;
        let entities = parse_entities(text, size)?;
        Ok(Self { size, entities })
    }

    pub fn make_board(&self) -> Result<Board> {
        Board::new(self.size, self.entities.clone())
    }
}

fn parse_size(text: &str) -> Result<usize> {
    let key = "\"size\"";
    let key_pos = text
        .find(key)
        .ok_or_else(|| SolverError::invalid_input("problem document does not contain \"size\""))?;
    parse_unsigned_after_colon(text, key_pos + key.len())
}

fn parse_entities(text: &str, size: usize) -> Result<Vec<i32>> {
    let key = "\"entities\"";
    let key_pos = text.find(key).ok_or_else(|| {
        SolverError::invalid_input("problem document does not contain \"entities\"")
    })?;
    let open = text[key_pos + key.len()..]
        .find('[')
        .map(|offset| key_pos + key.len() + offset)
        .ok_or_else(|| SolverError::invalid_input("entities array is missing"))?;
    let close = matching_bracket(text, open)?;

    let mut values = Vec::with_capacity(size * size);
    let mut number = String::new();
    for &byte in &text.as_bytes()[open..=close] {
        let ch = byte as char;
        if ch.is_ascii_digit() {
            number.push(ch);
        } else if ch == '-' && number.is_empty() {
            number.push(ch);
        } else if !number.is_empty() {
            values.push(parse_literal(&number)?);
            number.clear();
        }
    }
    if !number.is_empty() {
        values.push(parse_literal(&number)?);
    }

    if values.len() != size * size {
        return Err(SolverError::invalid_input(format!(
            "entities count {} does not match size {size}",
            values.len()
        )));
    }
    Ok(values)
}

fn parse_literal(number: &str) -> Result<i32> {
    number
        .parse()
        .map_err(|_| SolverError::invalid_input(format!("malformed integer literal: {number}")))
}

fn parse_unsigned_after_colon(text: &str, from: usize) -> Result<usize> {
    let bytes = text.as_bytes();
    let colon = text[from..]
        .find(':')
        .map(|offset| from + offset)
        .ok_or_else(|| SolverError::invalid_input("malformed field: missing ':'"))?;
    let mut index = colon + 1;
    while index < bytes.len() && bytes[index].is_ascii_whitespace() {
        index += 1;
    }
    let start = index;
    while index < bytes.len() && bytes[index].is_ascii_digit() {
        index += 1;
    }
    if start == index {
        return Err(SolverError::invalid_input(
            "malformed field: unsigned integer expected",
        ));
    }
    text[start..index]
        .parse()
        .map_err(|_| SolverError::invalid_input("malformed field: integer out of range"))
}

fn matching_bracket(text: &str, open: usize) -> Result<usize> {
    let mut depth = 0_usize;
    for (offset, &byte) in text.as_bytes()[open..].iter().enumerate() {
        match byte {
            b'[' => depth += 1,
            b']' => {
                if depth == 0 {
                    return Err(SolverError::invalid_input("stray closing bracket"));
                }
                depth -= 1;
                if depth == 0 {
                    return Ok(open + offset);
                }
            }
            _ => {}
        }
    }
    Err(SolverError::invalid_input("bracket not closed"))
}

/// Serialises an operation sequence as the answer document: one op per line,
/// two-space indentation per level, no trailing comma.
pub fn serialize_answer(operations: &[Rotation]) -> String {
    if operations.is_empty() {
        return "{\n  \"ops\": []\n}".to_string();
    }
    let mut out = String::from("{\n  \"ops\": [");
    for (index, rotation) in operations.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            "\n    {{\"x\":{},\"y\":{},\"n\":{}}}",
            rotation.x, rotation.y, rotation.size
        ));
    }
    out.push_str("\n  ]\n}");
    out
}

/// Parses an answer document back into an operation sequence. A document
/// without an `"ops"` key yields an empty sequence.
pub fn parse_answer(text: &str) -> Result<Vec<Rotation>> {
    let mut operations = Vec::new();
    let key = "\"ops\"";
    let Some(key_pos) = text.find(key) else {
        return Ok(operations);
    };
    let open = text[key_pos + key.len()..]
        .find('[')
        .map(|offset| key_pos + key.len() + offset)
        .ok_or_else(|| SolverError::invalid_input("answer document: ops array is missing"))?;
    let close = matching_bracket(text, open)?;

    let mut cursor = open;
    loop {
        let Some(x_pos) = find_key_before(text, "\"x\"", cursor, close) else {
            break;
        };
        let x = parse_unsigned_after_colon(text, x_pos + 3)?;
        let y_pos = find_key_before(text, "\"y\"", x_pos + 3, close)
            .ok_or_else(|| SolverError::invalid_input("answer document: missing y"))?;
        let y = parse_unsigned_after_colon(text, y_pos + 3)?;
        let n_pos = find_key_before(text, "\"n\"", y_pos + 3, close)
            .ok_or_else(|| SolverError::invalid_input("answer document: missing n"))?;
        let n = parse_unsigned_after_colon(text, n_pos + 3)?;
        operations.push(Rotation::new(x, y, n));
        cursor = n_pos + 3;
    }
    Ok(operations)
}

fn find_key_before(text: &str, key: &str, from: usize, limit: usize) -> Option<usize> {
    text[from..]
        .find(key)
        .map(|offset| from + offset)
        .filter(|&position| position <= limit)
}
