//! # Script Back End
//!
//! Prints a composition tree as OpenSCAD source, one statement per line,
//! children indented four spaces inside `{ }` blocks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use glam::DVec3;
use tracing::info;

use super::{render, SolidBackend};
use crate::error::ModelResult;
use crate::node::{BooleanOperation, Primitive, SolidNode, Transform};

const INDENT: &str = "    ";

/// Back end producing OpenSCAD source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptEmitter;

fn vec3(v: DVec3) -> String {
    format!("[{}, {}, {}]", v.x, v.y, v.z)
}

fn block(header: &str, children: Vec<String>) -> String {
    let mut out = format!("{header} {{\n");
    for child in children {
        for line in child.lines() {
            out.push_str(INDENT);
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push('}');
    out
}

impl SolidBackend for ScriptEmitter {
    type Output = String;

    fn primitive(&self, primitive: &Primitive) -> ModelResult<String> {
        Ok(match primitive {
            Primitive::Cylinder {
                height,
                radius_bottom,
                radius_top,
                facets,
            } => format!("cylinder(h={height}, r1={radius_bottom}, r2={radius_top}, $fn={facets});"),
            Primitive::Block { min, max } => {
                format!("translate({}) cube({});", vec3(*min), vec3(*max - *min))
            }
            Primitive::Polyhedron(mesh) => {
                let points = mesh
                    .vertices()
                    .iter()
                    .map(|v| vec3(*v))
                    .collect::<Vec<_>>()
                    .join(", ");
                // OpenSCAD faces wind clockwise seen from outside.
                let mut faces = String::new();
                for (i, [a, b, c]) in mesh.triangles().iter().enumerate() {
                    if i > 0 {
                        faces.push_str(", ");
                    }
                    faces.push_str(&format!("[{a}, {c}, {b}]"));
                }
                format!("polyhedron(points=[{points}], faces=[{faces}]);")
            }
        })
    }

    fn labelled(&self, name: &str, child: String) -> ModelResult<String> {
        Ok(format!("// {name}\n{child}"))
    }

    fn boolean(&self, operation: BooleanOperation, children: Vec<String>) -> ModelResult<String> {
        Ok(block(&format!("{}()", operation.name()), children))
    }

    fn transform(&self, transform: Transform, children: Vec<String>) -> ModelResult<String> {
        let header = format!("{}({})", transform.name(), vec3(transform.vector()));
        Ok(block(&header, children))
    }
}

/// Renders `node` to OpenSCAD source.
pub fn to_script(node: &SolidNode) -> ModelResult<String> {
    render(&ScriptEmitter, node)
}

/// Writes `node` as an OpenSCAD file at `path`.
pub fn write_script<P: AsRef<Path>>(node: &SolidNode, path: P) -> ModelResult<()> {
    let path = path.as_ref();
    let source = to_script(node)?;

    let mut writer = BufWriter::new(File::create(path)?);
    writeln!(writer, "{source}")?;
    writer.flush()?;

    info!(path = %path.display(), nodes = node.node_count(), "wrote script");
    Ok(())
}
