//! # STL Export
//!
//! Writes meshes as binary or ASCII STL.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count (0)
//! end
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use tracing::info;

use crate::error::MeshResult;
use crate::mesh::Mesh;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Size of one triangle record in binary STL.
pub const TRIANGLE_RECORD_SIZE: usize = 50;

/// Unit facet normal, or zero for a degenerate triangle.
fn facet_normal([a, b, c]: [DVec3; 3]) -> DVec3 {
    (b - a).cross(c - a).normalize_or_zero()
}

fn write_vec3<W: Write>(writer: &mut W, v: DVec3) -> MeshResult<()> {
    // STL stores single precision.
    for component in [v.x as f32, v.y as f32, v.z as f32] {
        writer.write_all(&component.to_le_bytes())?;
    }
    Ok(())
}

/// Writes `mesh` as binary STL.
pub fn write_stl_binary<W: Write>(mesh: &Mesh, mut writer: W) -> MeshResult<()> {
    let mut header = [b' '; HEADER_SIZE];
    let text = b"woodwind-mesh binary STL";
    header[..text.len()].copy_from_slice(text);
    writer.write_all(&header)?;

    let count = mesh.triangle_count() as u32;
    writer.write_all(&count.to_le_bytes())?;

    for corners in mesh.triangle_positions() {
        write_vec3(&mut writer, facet_normal(corners))?;
        for v in corners {
            write_vec3(&mut writer, v)?;
        }
        writer.write_all(&0u16.to_le_bytes())?;
    }

    Ok(())
}

/// Writes `mesh` as ASCII STL under the solid name `name`.
pub fn write_stl_ascii<W: Write>(mesh: &Mesh, name: &str, mut writer: W) -> MeshResult<()> {
    writeln!(writer, "solid {name}")?;

    for corners in mesh.triangle_positions() {
        let n = facet_normal(corners);
        writeln!(writer, "  facet normal {:.6e} {:.6e} {:.6e}", n.x, n.y, n.z)?;
        writeln!(writer, "    outer loop")?;
        for v in corners {
            writeln!(writer, "      vertex {:.6e} {:.6e} {:.6e}", v.x, v.y, v.z)?;
        }
        writeln!(writer, "    endloop")?;
        writeln!(writer, "  endfacet")?;
    }

    writeln!(writer, "endsolid {name}")?;
    Ok(())
}

/// Saves `mesh` to `path` as binary or ASCII STL.
///
/// The file is buffered and flushed before returning; it is closed on
/// every path, including errors.
pub fn save_stl<P: AsRef<Path>>(mesh: &Mesh, path: P, binary: bool) -> MeshResult<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);

    if binary {
        write_stl_binary(mesh, &mut writer)?;
    } else {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("woodwind");
        write_stl_ascii(mesh, name, &mut writer)?;
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        triangles = mesh.triangle_count(),
        binary,
        "wrote STL"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::block;

    fn unit_cube() -> Mesh {
        block(DVec3::ZERO, DVec3::ONE).unwrap()
    }

    #[test]
    fn test_binary_layout() {
        let mesh = unit_cube();
        let mut bytes = Vec::new();
        write_stl_binary(&mesh, &mut bytes).unwrap();

        assert_eq!(bytes.len(), HEADER_SIZE + 4 + 12 * TRIANGLE_RECORD_SIZE);
        let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]);
        assert_eq!(count, 12);

        // First facet is the bottom face: normal -Z.
        let nz = f32::from_le_bytes([bytes[92], bytes[93], bytes[94], bytes[95]]);
        assert_eq!(nz, -1.0);
    }

    #[test]
    fn test_ascii_structure() {
        let mut bytes = Vec::new();
        write_stl_ascii(&unit_cube(), "cube", &mut bytes).unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("solid cube\n"));
        assert!(text.trim_end().ends_with("endsolid cube"));
        assert_eq!(text.matches("facet normal").count(), 12);
        assert_eq!(text.matches("vertex").count(), 36);
    }

    #[test]
    fn test_save_stl_round_trip_size() {
        let dir = std::env::temp_dir().join(format!("woodwind-mesh-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("cube.stl");

        save_stl(&unit_cube(), &path, true).unwrap();
        let len = std::fs::metadata(&path).unwrap().len() as usize;
        assert_eq!(len, HEADER_SIZE + 4 + 12 * TRIANGLE_RECORD_SIZE);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_save_stl_missing_directory() {
        let path = std::env::temp_dir().join("woodwind-missing-dir/none/cube.stl");
        let err = save_stl(&unit_cube(), path, false).unwrap_err();
        assert!(matches!(err, crate::MeshError::Io(_)));
    }
}
