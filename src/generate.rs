use std::fs;
use std::path::Path;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::error::{Result, SolverError};

/// Renders a random problem document: every label in `0..size²/2` appears
/// exactly twice, permuted by the seeded generator. Identical size and seed
/// produce a byte-identical document.
pub fn generate_document(size: usize, seed: u64) -> Result<String> {
    if size % 2 != 0 || !(4..=24).contains(&size) {
        return Err(SolverError::invalid_input(format!(
            "size must be an even integer between 4 and 24, got {size}"
        )));
    }

    let cell_count = size * size;
    let mut values: Vec<i32> = Vec::with_capacity(cell_count);
    for label in 0..(cell_count / 2) as i32 {
        values.push(label);
        values.push(label);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    values.shuffle(&mut rng);

    let mut doc = String::new();
    doc.push_str("{\n");
    doc.push_str("  \"startsAt\": 0,\n");
    doc.push_str("  \"problem\": {\n");
    doc.push_str("    \"field\": {\n");
    doc.push_str(&format!("      \"size\": {size},\n"));
    doc.push_str("      \"entities\": [\n");
    for y in 0..size {
        doc.push_str("        [");
        for x in 0..size {
            if x > 0 {
                doc.push_str(", ");
            }
            doc.push_str(&values[y * size + x].to_string());
        }
        doc.push(']');
        if y + 1 != size {
            doc.push(',');
        }
        doc.push('\n');
    }
    doc.push_str("      ]\n");
    doc.push_str("    }\n");
    doc.push_str("  }\n");
    doc.push_str("}\n");
    Ok(doc)
}

/// Writes a generated problem to `path`, returning the seed that was used.
pub fn write_problem(path: &Path, size: usize, seed: Option<u64>) -> Result<u64> {
    let seed = seed.unwrap_or_else(rand::random);
    let doc = generate_document(size, seed)?;
    fs::write(path, doc)?;
    Ok(seed)
}
