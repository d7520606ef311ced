mod lines;
pub mod row;

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, span, trace, Level};

use crate::keyword::{cards, Error, Map, Model, Result};

use lines::{keyword_lines, Line};

/// Keywords that are known and deliberately skipped.
pub const IGNORED_KEYWORDS: &[&str] = &[
    "KEYWORD",
    "CONTROL_ACCURACY",
    "CONTROL_IMPLICIT_AUTO",
    "CONTROL_IMPLICIT_DYNAMICS",
    "CONTROL_IMPLICIT_GENERAL",
    "CONTROL_IMPLICIT_SOLUTION",
    "CONTROL_TERMINATION",
    "DATABASE_BNDOUT",
    "DATABASE_ELOUT",
    "DATABASE_GCEOUT",
    "DATABASE_GLSTAT",
    "DATABASE_MATSUM",
    "DATABASE_NCFORC",
    "DATABASE_NODFOR",
    "DATABASE_NODOUT",
    "DATABASE_RCFORC",
    "DATABASE_RWFORC",
    "DATABASE_SECFORC",
    "DATABASE_SLEOUT",
    "DATABASE_SPCFORC",
    "DATABASE_SWFORC",
    "DATABASE_BINARY_D",
    "DATABASE_EXTENT_BINARY",
    "ELEMENT_SHELL",
    "SECTION_SHELL_TITLE",
    "MAT_ELASTIC_TITLE",
    "MAT_PIECEWISE_LINEAR_PLASTICITY_TITLE",
    "PART",
    "SECTION_SOLID_TITLE",
    "SET_SEGMENT_TITLE",
    "LOAD_SEGMENT_SET_ID",
    "END",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub text: String,
}

/// A keyword header and the data rows that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub keyword: String,
    pub line: usize,
    pub rows: Vec<Row>,
}

impl Block {
    fn new(keyword: &str, line: usize) -> Self {
        Self {
            keyword: keyword.to_owned(),
            line,
            rows: Vec::new(),
        }
    }
}

/// Groups the lines of a keyword deck into blocks. Comment lines are dropped
/// wherever they appear.
pub fn blocks(buffer: &[u8]) -> Result<Vec<Block>> {
    let mut blocks: Vec<Block> = Vec::new();
    for line in keyword_lines(buffer) {
        match line? {
            (_, Line::Comment) => {}
            (number, Line::Header(keyword)) => blocks.push(Block::new(keyword, number)),
            (number, Line::Data(text)) => match blocks.last_mut() {
                Some(block) => block.rows.push(Row {
                    line: number,
                    text: text.to_owned(),
                }),
                None => return Err(Error::OrphanDataLine(number)),
            },
        }
    }
    trace!(blocks = blocks.len(), "assembled blocks");
    Ok(blocks)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Title,
    Node,
    DefineCurveTitle,
    BoundarySpcSetId,
    SetNodeListTitle,
    ElementSolid,
    LoadNodeSet,
}

impl Keyword {
    pub const ALL: [Keyword; 7] = [
        Keyword::Title,
        Keyword::Node,
        Keyword::DefineCurveTitle,
        Keyword::BoundarySpcSetId,
        Keyword::SetNodeListTitle,
        Keyword::ElementSolid,
        Keyword::LoadNodeSet,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Keyword::Title => "TITLE",
            Keyword::Node => "NODE",
            Keyword::DefineCurveTitle => "DEFINE_CURVE_TITLE",
            Keyword::BoundarySpcSetId => "BOUNDARY_SPC_SET_ID",
            Keyword::SetNodeListTitle => "SET_NODE_LIST_TITLE",
            Keyword::ElementSolid => "ELEMENT_SOLID",
            Keyword::LoadNodeSet => "LOAD_NODE_SET",
        }
    }

    /// Case insensitive lookup of a handled keyword.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(name))
    }

    pub fn parse(self, rows: &[Row]) -> Result<Map> {
        let parse: fn(&[Row]) -> Result<Map> = match self {
            Keyword::Title => cards::title,
            Keyword::Node => cards::node,
            Keyword::DefineCurveTitle => cards::define_curve_title,
            Keyword::BoundarySpcSetId => cards::boundary_spc_set_id,
            Keyword::SetNodeListTitle => cards::set_node_list_title,
            Keyword::ElementSolid => cards::element_solid,
            Keyword::LoadNodeSet => cards::load_node_set,
        };
        parse(rows)
    }
}

/// Parses keyword decks into a [`Model`].
///
/// Blocks are dispatched by [`Keyword`]. Anything else must be in the ignore
/// set, which starts from [`IGNORED_KEYWORDS`] and can be extended with
/// [`Parser::ignore`].
#[derive(Debug, Clone)]
pub struct Parser {
    ignored: HashSet<String>,
}

impl Default for Parser {
    fn default() -> Self {
        Self {
            ignored: IGNORED_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl Parser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, keyword: impl Into<String>) -> Self {
        self.ignored.insert(keyword.into());
        self
    }

    pub fn is_ignored(&self, keyword: &str) -> bool {
        self.ignored.contains(keyword)
    }

    /// Returns the fragment a block contributes, or `None` for ignored blocks.
    pub fn parse_block(&self, block: &Block) -> Result<Option<Map>> {
        let span = span!(Level::TRACE, "block", keyword = %block.keyword, line = block.line);
        let _s = span.enter();
        match Keyword::from_name(&block.keyword) {
            Some(keyword) => {
                trace!(rows = block.rows.len(), "parsing");
                keyword.parse(&block.rows).map(Some)
            }
            None if self.is_ignored(&block.keyword) => {
                debug!(keyword = %block.keyword, line = block.line, "ignoring block");
                Ok(None)
            }
            None => Err(Error::UnknownBlock(block.keyword.clone())),
        }
    }

    pub fn parse_bytes(&self, buffer: &[u8]) -> Result<Model> {
        let blocks = blocks(buffer)?;
        let mut model = Model::new();
        for block in &blocks {
            if let Some(fragment) = self.parse_block(block)? {
                model.merge(fragment)?;
            }
        }
        Ok(model)
    }

    pub fn parse_file(&self, filename: impl AsRef<Path>) -> Result<Model> {
        let bytes = std::fs::read(filename)?;
        self.parse_bytes(&bytes)
    }
}

pub fn parse_bytes(buffer: &[u8]) -> Result<Model> {
    Parser::default().parse_bytes(buffer)
}

pub fn parse_file(filename: impl AsRef<Path>) -> Result<Model> {
    Parser::default().parse_file(filename)
}
