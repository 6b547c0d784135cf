// The stub compilers are shell scripts.
#![cfg(unix)]

use predicates::prelude::*; // Used for writing assertions
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use assert_cmd::Command; // Run programs
use tempfile::{tempdir, TempDir}; // Create temporary directories for testing

const SOURCE: &str = "\
// #o3d VertexShaderEntryPoint vs_main
// #o3d PixelShaderEntryPoint ps_main
// #o3d MatrixLoadOrder RowMajor
float4x4 worldViewProjection : WORLDVIEWPROJECTION;
float4 tint;
struct VertexShaderInput {
  float4 position : POSITION;
  float3 normal : NORMAL;
};
float4 vs_main(VertexShaderInput input) : POSITION {
  return mul(input.position, worldViewProjection) + float4(input.normal, 0);
}
float4 ps_main() : COLOR { return tint; }
";

const STUB_CGC: &str = r#"#!/bin/sh
cat > /dev/null
echo "stub cgc $*" >&2
if [ "$2" = "glslv" ]; then
cat <<'EOF'
// glslv output by Cg compiler
//var float4x4 worldViewProjection : WORLDVIEWPROJECTION : _ZZ2SworldViewProjection[0], 4 : -1 : 1
//var float3 input.normal : $vin.ATTR8 : ATTR8 : 0 : 1

attribute vec4 ATTR8;
uniform vec4 _ZZ2SworldViewProjection[4];
void main()
{
    gl_Position = gl_Vertex.x*_ZZ2SworldViewProjection[0] + ATTR8;
}
EOF
else
cat <<'EOF'
// glslf output by Cg compiler
//var float4 tint :  : _tint1 : 1 : 1

uniform vec4 _tint1;
void main()
{
    gl_FragColor = _tint1;
}
EOF
fi
"#;

// Helper function to write an executable stub compiler
fn write_stub(dir: &TempDir, name: &str, script: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, script).expect("Failed to write stub compiler");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make stub compiler executable");
    path
}

fn converter(dir: &Path, cgc: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("cg2glsl-app")?;
    cmd.current_dir(dir)
        .env_remove("CG2GLSL_CGC")
        .env_remove("CG2GLSL_TIMEOUT")
        .env("RUST_LOG", "warn")
        .arg("--cgc")
        .arg(cgc);
    Ok(cmd)
}

fn position_of(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("{needle:?} missing from output:\n{haystack}"))
}

#[test]
fn test_missing_compiler_fails_before_reading_input() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let missing = tmp_dir.path().join("no-cgc");

    converter(tmp_dir.path(), &missing)?
        .write_stdin(SOURCE)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "is not found, use --cgc option to specify its location",
        ));

    Ok(())
}

#[test]
fn test_empty_input_prints_usage() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", STUB_CGC);

    converter(tmp_dir.path(), &cgc)?
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"));

    Ok(())
}

#[test]
fn test_converts_from_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", STUB_CGC);

    let output = converter(tmp_dir.path(), &cgc)?
        .write_stdin(SOURCE)
        .output()?;
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout)?;

    assert!(stdout.starts_with(
        "// glslv profile log:\n// stub cgc -profile glslv -entry vs_main\n\n\
         // glslf profile log:\n// stub cgc -profile glslf -entry ps_main\n\n"
    ));

    let vertex_at = position_of(&stdout, "// glslv output by Cg compiler");
    let marker_at = position_of(&stdout, "\n// #o3d SplitMarker\n// #o3d MatrixLoadOrder RowMajor\n\n");
    let fragment_at = position_of(&stdout, "// glslf output by Cg compiler");
    assert!(vertex_at < marker_at && marker_at < fragment_at);

    for line in [
        "attribute vec4 position;",
        "vec4 _glPositionTemp;",
        "uniform vec4 dx_clipping;",
        "attribute vec4 normal;",
        "uniform mat4 worldViewProjection;",
        "    _glPositionTemp = position.x*worldViewProjection[0] + normal; gl_Position = vec4(",
        "uniform vec4 tint;",
        "    gl_FragColor = tint;",
    ] {
        position_of(&stdout, line);
    }
    assert!(!stdout.contains("ATTR8;"));

    Ok(())
}

#[test]
fn test_repeated_runs_are_byte_identical() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", STUB_CGC);

    let first = converter(tmp_dir.path(), &cgc)?.write_stdin(SOURCE).output()?;
    let second = converter(tmp_dir.path(), &cgc)?.write_stdin(SOURCE).output()?;
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    Ok(())
}

#[test]
fn test_input_and_output_files() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", STUB_CGC);
    let input = tmp_dir.path().join("shader.fx");
    let output_file = tmp_dir.path().join("shader.glsl");
    fs::write(&input, SOURCE)?;

    converter(tmp_dir.path(), &cgc)?
        .arg("-i")
        .arg(&input)
        .arg("-o")
        .arg(&output_file)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written = fs::read_to_string(&output_file)?;
    assert!(written.contains("// #o3d SplitMarker"));
    assert!(written.contains("uniform vec4 tint;"));

    Ok(())
}

#[test]
fn test_ambiguous_clip_assignment_prints_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let script = STUB_CGC.replace(
        "    gl_Position = gl_Vertex",
        "    gl_Position = vec4(0.0);\n    gl_Position = gl_Vertex",
    );
    let cgc = write_stub(&tmp_dir, "cgc", &script);

    converter(tmp_dir.path(), &cgc)?
        .write_stdin(SOURCE)
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("vertex stage: Multiple clip assignments"))
        .stderr(predicate::str::contains("// stub cgc -profile glslv -entry vs_main"));

    Ok(())
}

#[test]
fn test_hung_compiler_times_out() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", "#!/bin/sh\nexec sleep 10\n");

    converter(tmp_dir.path(), &cgc)?
        .arg("--timeout")
        .arg("300ms")
        .write_stdin(SOURCE)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("External tool error: cgc did not finish within 300ms"));

    Ok(())
}

#[test]
fn test_missing_entry_point_directive() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let cgc = write_stub(&tmp_dir, "cgc", STUB_CGC);
    let source = SOURCE.replace("// #o3d PixelShaderEntryPoint ps_main\n", "");

    converter(tmp_dir.path(), &cgc)?
        .write_stdin(source)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing '#o3d PixelShaderEntryPoint' directive"));

    Ok(())
}
