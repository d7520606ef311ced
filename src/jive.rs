//! Jive data file output.
//!
//! The whole document is rendered before anything is written, so a model
//! with a missing reference produces no output at all.

use std::fmt::Write as _;
use std::io;

use tracing::debug;

use crate::keyword::{Error, Key, Map, Model, Result, Value};

/// Translational constraint axes and the SPC flag each one reads.
const AXES: [(&str, &str); 3] = [("u", "dofx"), ("v", "dofy"), ("w", "dofz")];

/// Solid elements are all written with this element type.
const SOLID_TYPE: &str = "'Continuum'";

/// Shortest round trip form, always with a fractional part or an exponent
/// (`0.0`, `2.5`, `1e+16`, `1e-05`).
pub fn format_float(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    let s = format!("{:?}", f);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => s,
    }
}

/// Looks up `key` in a record, naming the full path when it is missing.
fn field<'a>(record: &'a Map, path: &str, key: &str) -> Result<&'a Value> {
    record
        .get(key)
        .ok_or_else(|| Error::MissingReference(format!("{}.{}", path, key)))
}

fn entry<'a>(section: &'a Map, name: &str, key: &Key) -> Result<&'a Map> {
    let path = format!("{}.{}", name, key);
    section
        .get(key.clone())
        .ok_or_else(|| Error::MissingReference(path.clone()))?
        .as_map(&path)
}

/// Space separated ids, no leading or trailing space.
fn write_ids(out: &mut String, ids: &[Value], path: &str) -> Result<()> {
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(out, "{}", id.as_int(path)?)?;
    }
    Ok(())
}

fn write_nodes(out: &mut String, model: &Model) -> Result<()> {
    writeln!(out, "<Nodes>")?;
    for (nid, node) in model.section("nodes")?.iter() {
        let [x, y, z] = node.as_coords(&format!("nodes.{}", nid))?;
        writeln!(
            out,
            "{} {} {} {};",
            nid,
            format_float(x),
            format_float(y),
            format_float(z)
        )?;
    }
    writeln!(out, "</Nodes>")?;
    Ok(())
}

fn write_elements(out: &mut String, model: &Model) -> Result<()> {
    writeln!(out, "<Elements>")?;
    let solids = match model.maybe_section("elements")? {
        Some(elements) => elements.get("solid"),
        None => None,
    };
    if let Some(solids) = solids {
        for (eid, nodes) in solids.as_map("elements.solid")?.iter() {
            let path = format!("elements.solid.{}", eid);
            write!(out, "{} {} ", eid, SOLID_TYPE)?;
            write_ids(out, nodes.as_list(&path)?, &path)?;
            writeln!(out, ";")?;
        }
    }
    writeln!(out, "</Elements>")?;
    Ok(())
}

fn write_node_groups(out: &mut String, model: &Model) -> Result<()> {
    let nodelists = match model.maybe_section("nodelist")? {
        Some(nodelists) => nodelists,
        None => return Ok(()),
    };
    for (sid, nodelist) in nodelists.iter() {
        let path = format!("nodelist.{}", sid);
        let nodelist = nodelist.as_map(&path)?;
        let title = field(nodelist, &path, "title")?.as_text(&path)?;
        writeln!(out, "<NodeGroup name = \"{}\">", title)?;
        write!(out, "{{ ")?;
        let nodes = field(nodelist, &path, "nodes")?.as_list(&path)?;
        write_ids(out, nodes, &path)?;
        writeln!(out, " }}")?;
        writeln!(out, "</NodeGroup>")?;
    }
    Ok(())
}

// A set flag means the axis is fixed, which the solver expects as 0.0.
fn write_constraints(out: &mut String, model: &Model) -> Result<()> {
    writeln!(out, "<NodeConstraints>")?;
    if let Some(boundary) = model.maybe_section("boundary")? {
        for (name, spc) in boundary.iter() {
            let path = format!("boundary.{}", name);
            let spc = spc.as_map(&path)?;
            for &(axis, dof) in AXES.iter() {
                let fixed = field(spc, &path, dof)?.as_int(&path)? != 0;
                let value = if fixed { 0.0 } else { 1.0 };
                writeln!(out, "{}[{}] = {};", axis, name, format_float(value))?;
            }
        }
    }
    writeln!(out, "</NodeConstraints>")?;
    Ok(())
}

/// Maps a load's curve id to an axis. Decks number their load curves 1-3 so
/// the id doubles as the direction of the force.
fn load_axis(lcid: i64) -> Result<&'static str> {
    match lcid {
        1 => Ok("u"),
        2 => Ok("v"),
        3 => Ok("w"),
        _ => Err(Error::UnknownAxis(lcid)),
    }
}

fn write_forces(out: &mut String, model: &Model) -> Result<()> {
    writeln!(out, "<ExternalForces>")?;
    if let Some(nodesets) = model.maybe_section("nodesets")? {
        for (nsid, load) in nodesets.iter() {
            let path = format!("nodesets.{}", nsid);
            let load = load.as_map(&path)?;
            let lcid = field(load, &path, "lcid")?.as_int(&path)?;
            let curve = entry(model.section("curves")?, "curves", &Key::Int(lcid))?;
            let curve_path = format!("curves.{}", lcid);
            let force = field(curve, &curve_path, "sfo")?.as_float(&curve_path)?;
            let axis = load_axis(lcid)?;
            let nodelist = match model.maybe_section("nodelist")? {
                Some(nodelists) => entry(nodelists, "nodelist", nsid)?,
                None => return Err(Error::MissingReference(format!("nodelist.{}", nsid))),
            };
            let list_path = format!("nodelist.{}", nsid);
            let nodes = field(nodelist, &list_path, "nodes")?.as_list(&list_path)?;
            debug!(%nsid, lcid, nodes = nodes.len(), "writing node set load");
            for node in nodes {
                writeln!(
                    out,
                    "{}[{}] = {};",
                    axis,
                    node.as_int(&list_path)?,
                    format_float(force)
                )?;
            }
        }
    }
    writeln!(out, "</ExternalForces>")?;
    Ok(())
}

/// Renders a model as a Jive data file.
pub fn render(model: &Model) -> Result<String> {
    let mut out = String::new();
    write_nodes(&mut out, model)?;
    write_elements(&mut out, model)?;
    write_node_groups(&mut out, model)?;
    write_constraints(&mut out, model)?;
    write_forces(&mut out, model)?;
    Ok(out)
}

pub fn write<W: io::Write>(writer: &mut W, model: &Model) -> Result<()> {
    let rendered = render(model)?;
    writer.write_all(rendered.as_bytes())?;
    Ok(())
}
