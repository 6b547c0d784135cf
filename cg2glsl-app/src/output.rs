use anyhow::{Context, Result};
use cg2glsl_core::TranslationResult;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Writes the assembled shader to `path`, or to stdout when no path is given.
pub fn write_result(result: &TranslationResult, path: Option<&Path>) -> Result<()> {
    let assembled = result.assemble();
    match path {
        Some(path) => {
            log::info!("Writing converted shader to {:?}", path);
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {:?}", path))?;
            let mut writer = BufWriter::new(file);
            writer
                .write_all(assembled.as_bytes())
                .with_context(|| format!("Failed to write output file: {:?}", path))?;
            writer
                .flush()
                .context("Failed to flush writer for output file")?;
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            lock.write_all(assembled.as_bytes())
                .context("Failed to write converted shader to stdout")?;
            lock.flush().context("Failed to flush stdout")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_assembled_text_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.glsl");
        let result = TranslationResult {
            vertex_shader: "VS".to_owned(),
            fragment_shader: "FS".to_owned(),
            diagnostic_log: "// log\n".to_owned(),
            matrix_load_order: "// #o3d MatrixLoadOrder ColumnMajor".to_owned(),
        };

        write_result(&result, Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), result.assemble());
    }

    #[test]
    fn test_unwritable_path_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.glsl");
        let result = TranslationResult {
            vertex_shader: String::new(),
            fragment_shader: String::new(),
            diagnostic_log: String::new(),
            matrix_load_order: String::new(),
        };

        let err = write_result(&result, Some(&path)).unwrap_err();
        assert!(err.to_string().contains("Failed to create output file"));
    }
}
