//! Block parsers, one per handled keyword.
//!
//! Each parser takes the data rows of a block and returns the fragment it
//! contributes to the model. Row level failures carry the source line.

use std::sync::LazyLock;

use regex::Regex;

use crate::keyword::parser::row::{parse_int, parse_ints, parse_record, parse_values, Cast};
use crate::keyword::parser::{Keyword, Row};
use crate::keyword::{Error, Map, Result, Scalar, Value};
use crate::map;

const NODE: [Cast; 4] = [Cast::Int, Cast::Float, Cast::Float, Cast::Float];

const CURVE_HEADER: [(&str, Cast); 8] = [
    ("lcid", Cast::Int),
    ("sidr", Cast::Int),
    ("sfa", Cast::Float),
    ("sfo", Cast::Float),
    ("offa", Cast::Float),
    ("offo", Cast::Float),
    ("dattyp", Cast::Int),
    ("lcint", Cast::Int),
];

const SPC: [(&str, Cast); 8] = [
    ("nsid", Cast::Int),
    ("cid", Cast::Int),
    ("dofx", Cast::Int),
    ("dofy", Cast::Int),
    ("dofz", Cast::Int),
    ("dofrx", Cast::Int),
    ("dofry", Cast::Int),
    ("dofrz", Cast::Int),
];

const NODE_LIST_HEADER: [(&str, Cast); 6] = [
    ("sid", Cast::Int),
    ("da1", Cast::Float),
    ("da2", Cast::Float),
    ("da3", Cast::Float),
    ("da4", Cast::Float),
    ("solver", Cast::Text),
];

const LOAD_NODE_SET: [(&str, Cast); 8] = [
    ("nsid", Cast::Int),
    ("dof", Cast::Int),
    ("lcid", Cast::Int),
    ("sf", Cast::Float),
    ("cid", Cast::Int),
    ("m1", Cast::Int),
    ("m2", Cast::Int),
    ("m3", Cast::Int),
];

// eid, pid, n1..n8
const SOLID_FIELDS: usize = 10;

// Some decks print da4 and the solver name without a separator, e.g.
// `1  0.0  0.0  0.0  0.0MECH`.
static SOLVER_GAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9])([A-Z]+)$").expect("Invalid solver regex"));

fn require(keyword: Keyword, rows: &[Row], expected: usize) -> Result<()> {
    if rows.len() < expected {
        Err(Error::MissingLines {
            keyword: keyword.name(),
            expected,
            found: rows.len(),
        })
    } else {
        Ok(())
    }
}

/// Removes the integer id a record is keyed by.
fn pop_id(record: &mut Map, field: &'static str) -> Result<i64> {
    match record.remove(field) {
        Some(Value::Scalar(Scalar::Int(id))) => Ok(id),
        Some(_) => Err(Error::UnexpectedValue(field.to_owned(), "integer")),
        None => Err(Error::MissingField(field)),
    }
}

fn on_row<T>(row: &Row, f: impl FnOnce(&str) -> Result<T>) -> Result<T> {
    f(&row.text).map_err(|e| e.on_line(row.line))
}

pub fn title(rows: &[Row]) -> Result<Map> {
    require(Keyword::Title, rows, 1)?;
    Ok(map! { "title" => rows[0].text.as_str() })
}

pub fn node(rows: &[Row]) -> Result<Map> {
    let mut nodes = Map::new();
    for row in rows {
        let (nid, coords) = on_row(row, |text| {
            let values = parse_values(text, &NODE)?;
            match values.as_slice() {
                [Scalar::Int(nid), Scalar::Float(x), Scalar::Float(y), Scalar::Float(z)] => {
                    Ok((*nid, [*x, *y, *z]))
                }
                v => Err(Error::MissingFields {
                    expected: NODE.len(),
                    found: v.len(),
                }),
            }
        })?;
        nodes.insert(nid, coords);
    }
    Ok(map! { "nodes" => nodes })
}

pub fn define_curve_title(rows: &[Row]) -> Result<Map> {
    require(Keyword::DefineCurveTitle, rows, 2)?;
    let mut curve = map! { "title" => rows[0].text.as_str() };
    for (key, value) in on_row(&rows[1], |text| parse_record(text, &CURVE_HEADER))? {
        curve.insert(key, value);
    }
    let points = rows[2..]
        .iter()
        .map(|row| {
            on_row(row, |text| {
                text.split_whitespace()
                    .map(|token| Cast::Float.apply(token).map(Value::from))
                    .collect::<Result<Vec<_>>>()
                    .map(Value::List)
            })
        })
        .collect::<Result<Vec<_>>>()?;
    curve.insert("points", points);
    let lcid = pop_id(&mut curve, "lcid").map_err(|e| e.on_line(rows[1].line))?;
    Ok(map! { "curves" => map! { lcid => curve } })
}

pub fn boundary_spc_set_id(rows: &[Row]) -> Result<Map> {
    require(Keyword::BoundarySpcSetId, rows, 2)?;
    // The first card glues the set id to its heading; the key drops the
    // leading character.
    let name: String = rows[0].text.chars().skip(1).collect();
    let dofs = on_row(&rows[1], |text| parse_record(text, &SPC))?;
    Ok(map! { "boundary" => map! { name => dofs } })
}

pub fn set_node_list_title(rows: &[Row]) -> Result<Map> {
    require(Keyword::SetNodeListTitle, rows, 2)?;
    let mut nodelist = map! { "title" => rows[0].text.as_str() };
    let header = SOLVER_GAP.replace(&rows[1].text, "${1} ${2}");
    for (key, value) in on_row(&rows[1], |_| parse_record(&header, &NODE_LIST_HEADER))? {
        nodelist.insert(key, value);
    }
    let mut nodes = Vec::new();
    for row in &rows[2..] {
        for token in row.text.split_whitespace() {
            let nid = on_row(row, |_| parse_int(token))?;
            // zero pads the fixed width card, it is never a node
            if nid != 0 {
                nodes.push(Value::from(nid));
            }
        }
    }
    nodelist.insert("nodes", nodes);
    let sid = pop_id(&mut nodelist, "sid").map_err(|e| e.on_line(rows[1].line))?;
    Ok(map! { "nodelist" => map! { sid => nodelist } })
}

pub fn element_solid(rows: &[Row]) -> Result<Map> {
    let mut solids = Map::new();
    for row in rows {
        let ids = on_row(row, |text| parse_ints(text, SOLID_FIELDS))?;
        match ids.as_slice() {
            [eid, _pid, nodes @ ..] => {
                let nodes: Vec<Value> = nodes.iter().copied().map(Value::from).collect();
                solids.insert(*eid, nodes);
            }
            v => {
                return Err(Error::MissingFields {
                    expected: 2,
                    found: v.len(),
                }
                .on_line(row.line))
            }
        }
    }
    Ok(map! { "elements" => map! { "solid" => solids } })
}

pub fn load_node_set(rows: &[Row]) -> Result<Map> {
    let mut nodesets = Map::new();
    for row in rows {
        let (nsid, load) = on_row(row, |text| {
            let mut load = parse_record(text, &LOAD_NODE_SET)?;
            Ok((pop_id(&mut load, "nsid")?, load))
        })?;
        nodesets.insert(nsid, load);
    }
    Ok(map! { "nodesets" => nodesets })
}
